//! Read-side queries and bulk deletions.
//!
//! Date-range queries against fires go through clump timestamps directly
//! rather than the derived summary, so scanning a large graph never forces
//! geometry unions.

use chrono::{DateTime, Days, NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::{
  clump::ClumpId,
  error::Result,
  event::EventId,
  fire::FireId,
  graph::FireGraph,
  raw_data::RawDataId,
  source::SourceId,
  stream::StreamId,
};

/// How far behind `as_of` [`FireGraph::top_events`] looks, in days.
const TOP_EVENTS_BACKWARD_DAYS: u64 = 2;
/// Minimum probability for [`FireGraph::top_events`].
const TOP_EVENTS_MIN_PROBABILITY: f64 = 0.75;

impl FireGraph {
  /// Look up a fire by its stable external identity.
  pub fn fire_by_unique_id(&self, unique_id: Uuid) -> Option<FireId> {
    self
      .fires
      .values()
      .find(|f| f.unique_id == unique_id)
      .map(|f| f.id)
  }

  /// Look up an event by its stable external identity.
  pub fn event_by_unique_id(&self, unique_id: Uuid) -> Option<EventId> {
    self
      .events
      .values()
      .find(|e| e.unique_id == unique_id)
      .map(|e| e.id)
  }

  /// The date range covered by a fire's clumps, without touching the
  /// geometry cache. `None` for a fire with no clumps.
  pub fn fire_clump_date_range(
    &self,
    fire: FireId,
  ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>> {
    let f = self.fire(fire)?;
    let mut range: Option<(DateTime<Utc>, DateTime<Utc>)> = None;
    for &id in &f.clumps {
      let c = self.clump(id)?;
      range = Some(match range {
        Some((start, end)) => (start.min(c.start), end.max(c.end)),
        None => (c.start, c.end),
      });
    }
    Ok(range)
  }

  /// Fires of `source` whose clump date range intersects `[start, end]`,
  /// in id order.
  pub fn fires_by_date(
    &self,
    source: SourceId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> Result<Vec<FireId>> {
    let mut out = Vec::new();
    for f in self.fires.values() {
      if f.source != source {
        continue;
      }
      if let Some((fire_start, fire_end)) = self.fire_clump_date_range(f.id)?
        && fire_start <= end
        && start <= fire_end
      {
        out.push(f.id);
      }
    }
    Ok(out)
  }

  /// All fires of `source`, in id order.
  pub fn fires_by_source(&self, source: SourceId) -> Vec<FireId> {
    self
      .fires
      .values()
      .filter(|f| f.source == source)
      .map(|f| f.id)
      .collect()
  }

  /// Events of `stream` whose date range intersects `[start, end]`, in id
  /// order.
  pub fn events_by_date(
    &self,
    stream: StreamId,
    start: NaiveDate,
    end: NaiveDate,
  ) -> Vec<EventId> {
    self
      .events
      .values()
      .filter(|e| {
        e.stream == stream && e.start_date <= end && start <= e.end_date
      })
      .map(|e| e.id)
      .collect()
  }

  /// The largest recent events of a stream: events whose range intersects
  /// the two days up to `as_of` with probability at least 0.75, largest
  /// total area first, at most `limit` of them.
  pub fn top_events(
    &self,
    stream: StreamId,
    limit: usize,
    as_of: NaiveDate,
  ) -> Vec<EventId> {
    self.top_events_within(
      stream,
      limit,
      as_of,
      TOP_EVENTS_BACKWARD_DAYS,
      TOP_EVENTS_MIN_PROBABILITY,
    )
  }

  /// [`top_events`](Self::top_events) with the window and probability
  /// threshold spelled out.
  pub fn top_events_within(
    &self,
    stream: StreamId,
    limit: usize,
    as_of: NaiveDate,
    backward_days: u64,
    min_probability: f64,
  ) -> Vec<EventId> {
    let window_start = as_of
      .checked_sub_days(Days::new(backward_days))
      .unwrap_or(NaiveDate::MIN);
    let mut candidates: Vec<_> = self
      .events
      .values()
      .filter(|e| {
        e.stream == stream
          && e.probability >= min_probability
          && e.start_date <= as_of
          && window_start <= e.end_date
      })
      .collect();
    candidates.sort_by(|a, b| b.total_area.total_cmp(&a.total_area));
    candidates.into_iter().take(limit).map(|e| e.id).collect()
  }

  /// Fires of `source` with no member clumps, in id order. Orphans appear
  /// when clumps are re-parented away without a cascade.
  pub fn orphaned_fires(&self, source: SourceId) -> Vec<FireId> {
    self
      .fires
      .values()
      .filter(|f| f.source == source && f.num_clumps() == 0)
      .map(|f| f.id)
      .collect()
  }

  /// Delete every clumpless fire of `source`. Returns how many were deleted
  /// directly (cascades may remove more entities).
  pub fn delete_orphaned_fires(&mut self, source: SourceId) -> Result<usize> {
    let orphans = self.orphaned_fires(source);
    let count = orphans.len();
    for fire in orphans {
      self.delete_fire(fire)?;
    }
    if count > 0 {
      info!(count, source = %source, "deleted orphaned fires");
    }
    Ok(count)
  }

  /// Raw detections of `source`, in id order.
  pub fn raw_data_by_source(&self, source: SourceId) -> Vec<RawDataId> {
    self
      .raw_data
      .values()
      .filter(|r| r.source == source)
      .map(|r| r.id)
      .collect()
  }

  /// Raw detections of `source` whose interval intersects
  /// `[start, end]`, in id order.
  pub fn raw_data_by_date(
    &self,
    source: SourceId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> Vec<RawDataId> {
    self
      .raw_data
      .values()
      .filter(|r| r.source == source && r.start <= end && start <= r.end)
      .map(|r| r.id)
      .collect()
  }

  /// Delete raw detections of `source` intersecting `[start, end]`,
  /// cascading as usual. Returns how many raw records matched.
  pub fn delete_raw_data_by_date(
    &mut self,
    source: SourceId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> Result<usize> {
    let matched = self.raw_data_by_date(source, start, end);
    let count = matched.len();
    for id in matched {
      self.delete_raw_data(id)?;
    }
    Ok(count)
  }

  /// Clumps of `source` whose interval intersects `[start, end]`, in id
  /// order.
  pub fn clumps_by_date(
    &self,
    source: SourceId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> Vec<ClumpId> {
    self
      .clumps
      .values()
      .filter(|c| c.source == source && c.start <= end && start <= c.end)
      .map(|c| c.id)
      .collect()
  }

  /// Delete clumps of `source` intersecting `[start, end]`, cascading as
  /// usual. Returns how many clumps matched.
  pub fn delete_clumps_by_date(
    &mut self,
    source: SourceId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> Result<usize> {
    let matched = self.clumps_by_date(source, start, end);
    let count = matched.len();
    for id in matched {
      self.delete_clump(id)?;
    }
    Ok(count)
  }

  /// Delete every fire of `source`, cascading as usual.
  pub fn delete_fires_by_source(&mut self, source: SourceId) -> Result<usize> {
    let matched = self.fires_by_source(source);
    let count = matched.len();
    for id in matched {
      self.delete_fire(id)?;
    }
    Ok(count)
  }
}
