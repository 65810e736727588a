//! Events: cross-source reconciled incidents.
//!
//! An event is the reconciled view over fires from multiple sources within
//! one stream. Unlike fires, an event's geometry and totals are stored
//! directly; reconciliation (out of scope here) writes them.

use std::fmt;

use chrono::{NaiveDate, Utc};
use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use firegraph_gis::area;

use crate::{attrs::AttributeBag, stream::StreamId};

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
pub struct EventId(pub u64);

impl fmt::Display for EventId {
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
pub struct EventDayId(pub u64);

impl fmt::Display for EventDayId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// The reconciled fields of an event, each attributed to the source that
/// won it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventField {
  Location,
  Size,
  Shape,
  Growth,
  Name,
  Type,
}

impl EventField {
  fn attr_key(self) -> &'static str {
    match self {
      EventField::Location => "fg_location_source",
      EventField::Size => "fg_size_source",
      EventField::Shape => "fg_shape_source",
      EventField::Growth => "fg_growth_source",
      EventField::Name => "fg_name_source",
      EventField::Type => "fg_type_source",
    }
  }
}

/// One calendar day of an event's reconciled activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDay {
  pub id:         EventDayId,
  pub date:       NaiveDate,
  /// Reconciled burned area for this date, in square meters.
  pub daily_area: f64,
  pub(crate) event: Option<EventId>,
}

impl EventDay {
  /// The event that owns this day, if it has been claimed.
  pub fn event(&self) -> Option<EventId> {
    self.event
  }

  pub fn daily_area_acres(&self) -> f64 {
    area::square_meters_to_acres(self.daily_area)
  }
}

/// A reconciled incident within one stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
  pub id:            EventId,
  /// Stable external identity, independent of graph ids.
  pub unique_id:     Uuid,
  pub stream:        StreamId,
  pub display_name:  String,
  pub outline_shape: MultiPolygon<f64>,
  /// Total burned area in square meters.
  pub total_area:    f64,
  pub start_date:    NaiveDate,
  pub end_date:      NaiveDate,
  pub probability:   f64,
  pub fire_type:     Option<String>,
  pub create_date:   NaiveDate,
  pub attrs:         AttributeBag,
  pub(crate) event_days: Vec<EventDayId>,
}

impl Event {
  pub(crate) fn new(id: EventId, stream: StreamId) -> Self {
    Self {
      id,
      unique_id: Uuid::new_v4(),
      stream,
      display_name: String::new(),
      outline_shape: MultiPolygon(Vec::new()),
      total_area: 0.0,
      start_date: NaiveDate::MIN,
      end_date: NaiveDate::MIN,
      probability: 0.0,
      fire_type: None,
      create_date: Utc::now().date_naive(),
      attrs: AttributeBag::new(),
      event_days: Vec::new(),
    }
  }

  /// This event's days, in assignment order.
  pub fn event_days(&self) -> &[EventDayId] {
    &self.event_days
  }

  pub fn total_area_acres(&self) -> f64 {
    area::square_meters_to_acres(self.total_area)
  }

  /// Record which source won a reconciled field.
  pub fn set_field_source(
    &mut self,
    field: EventField,
    source_name: impl Into<String>,
  ) {
    self.attrs.put(field.attr_key(), source_name);
  }

  /// The source that won a reconciled field, if recorded.
  pub fn field_source(&self, field: EventField) -> Option<&str> {
    self.attrs.get(field.attr_key())
  }
}
