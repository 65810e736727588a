//! Raw detection records as ingested from a source.

use std::fmt;

use chrono::{DateTime, Utc};
use geo::Geometry;
use serde::{Deserialize, Serialize};

use crate::{attrs::AttributeBag, clump::ClumpId, source::SourceId};

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
pub struct RawDataId(pub u64);

impl fmt::Display for RawDataId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// One detection record exactly as a source reported it. Immutable after
/// ingestion apart from its clump parentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawData {
  pub id:     RawDataId,
  pub source: SourceId,
  pub shape:  Geometry<f64>,
  /// Burned area in square meters, as reported or derived at ingestion.
  pub area:   f64,
  pub start:  DateTime<Utc>,
  pub end:    DateTime<Utc>,
  pub attrs:  AttributeBag,
  /// The clump this record has been aggregated into, if any.
  pub(crate) clump: Option<ClumpId>,
}

impl RawData {
  pub fn clump(&self) -> Option<ClumpId> {
    self.clump
  }
}
