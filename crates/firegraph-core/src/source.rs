//! Data sources, the per-provider configuration entities.
//!
//! Sources are configuration, read-only to the aggregation core: the fields
//! here steer display-name assembly and ingestion policy but are written by
//! the (out-of-scope) admin surface.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{attrs::AttributeBag, weighting::Weighting};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
)]
pub struct SourceId(pub u64);

impl fmt::Display for SourceId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// How newly ingested data interacts with data already stored for the same
/// period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataPolicy {
  /// New data replaces existing data for the covered period.
  Replace,
  /// New data is appended alongside existing data.
  Append,
  /// IRWIN-style replace: match on incident identity rather than period.
  IrwinReplace,
}

/// The native reporting cadence of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
  Daily,
  Weekly,
  Monthly,
  Yearly,
}

/// One independent provider of fire detections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
  pub id:                SourceId,
  pub name:              String,
  /// Semicolon-delimited list of attribute keys consulted, in order, when
  /// assembling a fire's display name.
  pub fire_name_field:   String,
  pub granularity:       Granularity,
  pub new_data_policy:   DataPolicy,
  /// Fallback weighting used when a stream has no override for this source.
  pub default_weighting: Option<Weighting>,
  pub attrs:             AttributeBag,
  latest_data:           Option<DateTime<Utc>>,
}

impl Source {
  pub(crate) fn new(id: SourceId, name: impl Into<String>) -> Self {
    Self {
      id,
      name: name.into(),
      fire_name_field: String::new(),
      granularity: Granularity::Daily,
      new_data_policy: DataPolicy::Append,
      default_weighting: None,
      attrs: AttributeBag::new(),
      latest_data: None,
    }
  }

  /// The attribute keys consulted for display names, in configured order.
  pub fn fire_name_fields(&self) -> impl Iterator<Item = &str> {
    self
      .fire_name_field
      .split(';')
      .filter(|field| !field.is_empty())
  }

  /// High-water mark of ingested data for this source.
  pub fn latest_data(&self) -> Option<DateTime<Utc>> {
    self.latest_data
  }

  /// Advance the high-water mark; earlier instants are ignored so the mark
  /// never moves backwards.
  pub fn advance_latest_data(&mut self, instant: DateTime<Utc>) {
    match self.latest_data {
      Some(current) if current >= instant => {}
      _ => self.latest_data = Some(instant),
    }
  }
}
