//! Per-source ranking coefficients for cross-source reconciliation.
//!
//! A weighting either hangs off a source directly (the default, used as a
//! fallback) or off a (source, stream) pair inside a
//! [`ReconciliationStream`](crate::stream::ReconciliationStream) (the
//! override). The coefficients guide the external reconciliation ranking;
//! this crate only stores them and sorts by them.

use serde::{Deserialize, Serialize};

use crate::source::SourceId;

/// The ten reconciliation coefficients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Weighting {
  /// Fraction of real fires this source is expected to detect.
  pub detection_rate: f64,
  /// Fraction of this source's detections expected to be spurious.
  pub false_alarm_rate: f64,
  pub location_weight: f64,
  pub size_weight: f64,
  pub shape_weight: f64,
  pub growth_weight: f64,
  pub name_weight: f64,
  pub type_weight: f64,
  /// Positional uncertainty, in the coordinate system's units.
  pub location_uncertainty: f64,
  /// Uncertainty of the reported start date, in whole days.
  pub start_date_uncertainty: i32,
  /// Uncertainty of the reported end date, in whole days.
  pub end_date_uncertainty: i32,
}

/// A weighting bound to one source within one reconciliation stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamWeighting {
  pub source:  SourceId,
  pub weights: Weighting,
}
