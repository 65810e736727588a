//! Ordered string-keyed attribute storage.
//!
//! Raw detections arrive with arbitrary per-source columns ("FIRE_NAME",
//! "Planned Initiation Date", ...). Every entity that carries them exposes
//! the same bag: keys are unique, insertion order is preserved, and
//! overwriting a key keeps its first-seen position.

use serde::{Deserialize, Serialize};

/// An ordered `name -> value` attribute map.
///
/// Backed by a plain vector; bags are small (tens of entries) and ordered
/// iteration is the hot path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeBag {
  entries: Vec<(String, String)>,
}

impl AttributeBag {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self
      .entries
      .iter()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v.as_str())
  }

  /// Insert or overwrite. Returns the prior value if the key existed; an
  /// overwritten key keeps its original position.
  pub fn put(
    &mut self,
    key: impl Into<String>,
    value: impl Into<String>,
  ) -> Option<String> {
    let key = key.into();
    let value = value.into();
    match self.entries.iter_mut().find(|(k, _)| *k == key) {
      Some(entry) => Some(std::mem::replace(&mut entry.1, value)),
      None => {
        self.entries.push((key, value));
        None
      }
    }
  }

  pub fn remove(&mut self, key: &str) -> Option<String> {
    let idx = self.entries.iter().position(|(k, _)| k == key)?;
    Some(self.entries.remove(idx).1)
  }

  pub fn contains_key(&self, key: &str) -> bool {
    self.entries.iter().any(|(k, _)| k == key)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Entries in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(|(k, _)| k.as_str())
  }

  /// Union `other` into `self`; on key collision `other`'s value wins but
  /// the key keeps the position it already had in `self`.
  pub fn extend(&mut self, other: &AttributeBag) {
    for (k, v) in other.iter() {
      self.put(k, v);
    }
  }
}

impl FromIterator<(String, String)> for AttributeBag {
  fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
    let mut bag = AttributeBag::new();
    for (k, v) in iter {
      bag.put(k, v);
    }
    bag
  }
}
