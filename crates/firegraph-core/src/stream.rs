//! Reconciliation streams and summary data layers.
//!
//! A stream names a reconciliation configuration: which sources participate,
//! with what weightings, in what order. The weighting order drives the output
//! order of [`build_slices`](crate::FireGraph::build_slices).

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  attrs::AttributeBag,
  source::SourceId,
  weighting::StreamWeighting,
};

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
pub struct StreamId(pub u64);

impl fmt::Display for StreamId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

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
pub struct LayerId(pub u64);

impl fmt::Display for LayerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// A named cross-source reconciliation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationStream {
  pub id:             StreamId,
  pub name:           String,
  pub auto_reconcile: bool,
  /// Per-source weighting overrides, in configured (stored) order.
  pub weightings:     Vec<StreamWeighting>,
  pub attrs:          AttributeBag,
}

impl ReconciliationStream {
  pub(crate) fn new(id: StreamId, name: impl Into<String>) -> Self {
    Self {
      id,
      name: name.into(),
      auto_reconcile: false,
      weightings: Vec::new(),
      attrs: AttributeBag::new(),
    }
  }

  /// The participating sources, in weighting order.
  pub fn sources(&self) -> impl Iterator<Item = SourceId> + '_ {
    self.weightings.iter().map(|w| w.source)
  }

  pub fn weighting_for_source(
    &self,
    source: SourceId,
  ) -> Option<&StreamWeighting> {
    self.weightings.iter().find(|w| w.source == source)
  }
}

/// An external summary dataset (land cover, fuel load, ...) associated with
/// one or more streams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryDataLayer {
  pub id:            LayerId,
  pub name:          String,
  pub data_location: String,
  pub start_date:    Option<NaiveDate>,
  pub end_date:      Option<NaiveDate>,
}

impl SummaryDataLayer {
  pub(crate) fn new(id: LayerId, name: impl Into<String>) -> Self {
    Self {
      id,
      name: name.into(),
      data_location: String::new(),
      start_date: None,
      end_date: None,
    }
  }
}
