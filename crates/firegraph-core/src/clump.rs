//! Clumps: spatially merged groups of same-source raw detections.

use std::fmt;

use chrono::{DateTime, Utc};
use geo::Geometry;
use serde::{Deserialize, Serialize};

use crate::{fire::FireId, raw_data::RawDataId, source::SourceId};

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
pub struct ClumpId(pub u64);

impl fmt::Display for ClumpId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// A same-source spatial aggregate of raw detections. Its shape and dates
/// are fixed at creation; only its parentage changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clump {
  pub id:     ClumpId,
  pub source: SourceId,
  pub shape:  Geometry<f64>,
  /// Burned area in square meters.
  pub area:   f64,
  pub start:  DateTime<Utc>,
  pub end:    DateTime<Utc>,
  pub(crate) fire:     Option<FireId>,
  pub(crate) raw_data: Vec<RawDataId>,
}

impl Clump {
  /// The fire this clump currently belongs to, if any.
  pub fn fire(&self) -> Option<FireId> {
    self.fire
  }

  /// The raw detections aggregated into this clump, in attachment order.
  pub fn raw_data(&self) -> &[RawDataId] {
    &self.raw_data
  }
}
