//! Bidirectional many-to-many association table.
//!
//! The original design maintained both sides of Fire↔Event by hand, which
//! made symmetric upkeep a per-call-site obligation. Here a single mutator
//! updates both directions, so the two views can never disagree.

use std::collections::{BTreeMap, BTreeSet};

/// A symmetric many-to-many association between ids of type `A` and `B`.
/// Iteration order is deterministic on both sides.
#[derive(Debug, Clone)]
pub struct Assoc<A: Ord + Copy, B: Ord + Copy> {
  forward: BTreeMap<A, BTreeSet<B>>,
  reverse: BTreeMap<B, BTreeSet<A>>,
}

impl<A: Ord + Copy, B: Ord + Copy> Default for Assoc<A, B> {
  fn default() -> Self {
    Self::new()
  }
}

impl<A: Ord + Copy, B: Ord + Copy> Assoc<A, B> {
  pub fn new() -> Self {
    Self {
      forward: BTreeMap::new(),
      reverse: BTreeMap::new(),
    }
  }

  /// Associate `a` with `b`. Returns `false` if the pair already existed.
  pub fn link(&mut self, a: A, b: B) -> bool {
    let inserted = self.forward.entry(a).or_default().insert(b);
    self.reverse.entry(b).or_default().insert(a);
    inserted
  }

  /// Dissociate `a` from `b` on both sides. Returns `false` if the pair
  /// did not exist.
  pub fn unlink(&mut self, a: A, b: B) -> bool {
    let removed = self
      .forward
      .get_mut(&a)
      .is_some_and(|set| set.remove(&b));
    if let Some(set) = self.reverse.get_mut(&b) {
      set.remove(&a);
      if set.is_empty() {
        self.reverse.remove(&b);
      }
    }
    if self.forward.get(&a).is_some_and(BTreeSet::is_empty) {
      self.forward.remove(&a);
    }
    removed
  }

  pub fn contains(&self, a: A, b: B) -> bool {
    self.forward.get(&a).is_some_and(|set| set.contains(&b))
  }

  /// All `B`s associated with `a`, in id order.
  pub fn of(&self, a: A) -> Vec<B> {
    self
      .forward
      .get(&a)
      .map(|set| set.iter().copied().collect())
      .unwrap_or_default()
  }

  /// All `A`s associated with `b`, in id order.
  pub fn of_rev(&self, b: B) -> Vec<A> {
    self
      .reverse
      .get(&b)
      .map(|set| set.iter().copied().collect())
      .unwrap_or_default()
  }

  pub fn count_of(&self, a: A) -> usize {
    self.forward.get(&a).map_or(0, BTreeSet::len)
  }

  /// Remove every association of `a`, returning the `B`s it was linked to.
  pub fn remove_all(&mut self, a: A) -> Vec<B> {
    let bs = self.of(a);
    for &b in &bs {
      self.unlink(a, b);
    }
    bs
  }

  /// Remove every association of `b`, returning the `A`s it was linked to.
  pub fn remove_all_rev(&mut self, b: B) -> Vec<A> {
    let as_ = self.of_rev(b);
    for &a in &as_ {
      self.unlink(a, b);
    }
    as_
  }
}
