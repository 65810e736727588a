//! Fires: cross-time aggregates of clumps from a single source.
//!
//! A fire's geometry, date range, and daily breakdown are all derived from
//! its member clumps and cached lazily. The caches are never serialized and
//! never observable in a stale state: any membership change clears them (or,
//! for additions, widens them in place) before the mutation returns.

use std::{cmp::Ordering, collections::BTreeSet, fmt};

use chrono::{DateTime, NaiveDate, Utc};
use geo::{Geometry, MultiPolygon, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{attrs::AttributeBag, clump::ClumpId, source::SourceId};

/// Display name used when no configured name field yields a value.
pub const UNKNOWN_FIRE_NAME: &str = "Unknown Fire";
/// Display name used for unnamed fires that carry a planned-initiation
/// attribute, marking them as prescribed burns.
pub const PRESCRIBED_FIRE_NAME: &str = "Unnamed Prescribed Fire";
/// The attribute whose presence marks an unnamed fire as prescribed.
pub const PLANNED_INITIATION_ATTR: &str = "Planned Initiation Date";

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
pub struct FireId(pub u64);

impl fmt::Display for FireId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// One calendar day of a fire's activity.
#[derive(Debug, Clone, PartialEq)]
pub struct FireDay {
  pub date:       NaiveDate,
  /// Sum of member clump areas active on this date, in square meters.
  pub area:       f64,
  pub shape:      Geometry<f64>,
  pub num_clumps: usize,
}

/// Derived whole-fire geometry and date range, cached on the fire.
#[derive(Debug, Clone)]
pub struct ClumpSummary {
  pub shape:    MultiPolygon<f64>,
  pub envelope: Rect<f64>,
  pub start:    DateTime<Utc>,
  pub end:      DateTime<Utc>,
}

/// A single-source fire: a set of clumps tracked across time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fire {
  pub id:        FireId,
  /// Stable external identity, independent of graph ids.
  pub unique_id: Uuid,
  pub source:    SourceId,
  /// Total burned area in square meters. Maintained arithmetically by
  /// membership changes and merges, so only the graph may write it.
  pub(crate) area: f64,
  pub probability: Option<f64>,
  pub fire_type: Option<String>,
  pub attrs:     AttributeBag,
  pub(crate) clumps: BTreeSet<ClumpId>,
  #[serde(skip)]
  pub(crate) summary: Option<ClumpSummary>,
  #[serde(skip)]
  pub(crate) days: Option<Vec<FireDay>>,
}

impl Fire {
  pub(crate) fn new(id: FireId, source: SourceId) -> Self {
    Self {
      id,
      unique_id: Uuid::new_v4(),
      source,
      area: 0.0,
      probability: None,
      fire_type: None,
      attrs: AttributeBag::new(),
      clumps: BTreeSet::new(),
      summary: None,
      days: None,
    }
  }

  /// Total burned area in square meters, the sum of member clump areas.
  pub fn area(&self) -> f64 {
    self.area
  }

  /// Member clumps, in id order.
  pub fn clumps(&self) -> impl Iterator<Item = ClumpId> + '_ {
    self.clumps.iter().copied()
  }

  pub fn num_clumps(&self) -> usize {
    self.clumps.len()
  }

  /// Drop every derived cache. Called on any membership change that cannot
  /// be folded into the caches in place.
  pub(crate) fn invalidate(&mut self) {
    self.summary = None;
    self.days = None;
  }

  /// Orders fires largest-area-first.
  pub fn by_area_desc(a: &Fire, b: &Fire) -> Ordering {
    b.area.total_cmp(&a.area)
  }
}

/// Assemble a display name from the attribute values of a fire's configured
/// name fields, in field order.
///
/// Blank values are dropped and the rest joined with " - ". If nothing
/// remains the sentinel depends on `prescribed`. An assembled name that does
/// not already mention "fire" or "complex" gets a " Fire" suffix, and the
/// whole thing is title-cased.
pub fn display_name_from(values: &[&str], prescribed: bool) -> String {
  let mut joined = values
    .iter()
    .map(|v| v.trim())
    .filter(|v| !v.is_empty())
    .collect::<Vec<_>>()
    .join(" - ");
  if joined.is_empty() {
    if prescribed {
      return PRESCRIBED_FIRE_NAME.to_string();
    }
    return UNKNOWN_FIRE_NAME.to_string();
  }
  let lowered = joined.to_lowercase();
  if !lowered.contains("fire") && !lowered.contains("complex") {
    joined.push_str(" Fire");
  }
  title_case(&joined)
}

/// Lowercase the whole string, then capitalize the first letter of each
/// whitespace-delimited token.
pub fn title_case(s: &str) -> String {
  let lowered = s.to_lowercase();
  let mut out = String::with_capacity(lowered.len());
  let mut at_word_start = true;
  for ch in lowered.chars() {
    if ch.is_whitespace() {
      at_word_start = true;
      out.push(ch);
    } else if at_word_start {
      out.extend(ch.to_uppercase());
      at_word_start = false;
    } else {
      out.push(ch);
    }
  }
  out
}
