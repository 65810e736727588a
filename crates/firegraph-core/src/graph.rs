//! The in-memory entity graph and its derived-geometry caches.
//!
//! All entities live in id-keyed `BTreeMap`s, so iteration over any entity
//! kind is deterministic. Relationships that are one-to-many (raw data in a
//! clump, clumps in a fire, days in an event) are owned by the parent;
//! many-to-many relationships (fires in events, layers in streams) go
//! through [`Assoc`] so both directions stay consistent.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use firegraph_gis as gis;
use geo::{Geometry, MultiPolygon, Rect};
use tracing::debug;

use crate::{
  assoc::Assoc,
  attrs::AttributeBag,
  cascade::EntityRef,
  clump::{Clump, ClumpId},
  error::{Error, Result},
  event::{Event, EventDay, EventDayId, EventId},
  fire::{self, ClumpSummary, Fire, FireDay, FireId},
  raw_data::{RawData, RawDataId},
  source::{Source, SourceId},
  stream::{LayerId, ReconciliationStream, StreamId, SummaryDataLayer},
  weighting::Weighting,
};

/// The complete aggregation state: every entity plus every relationship.
#[derive(Debug, Default)]
pub struct FireGraph {
  pub(crate) sources:    BTreeMap<SourceId, Source>,
  pub(crate) streams:    BTreeMap<StreamId, ReconciliationStream>,
  pub(crate) layers:     BTreeMap<LayerId, SummaryDataLayer>,
  pub(crate) raw_data:   BTreeMap<RawDataId, RawData>,
  pub(crate) clumps:     BTreeMap<ClumpId, Clump>,
  pub(crate) fires:      BTreeMap<FireId, Fire>,
  pub(crate) events:     BTreeMap<EventId, Event>,
  pub(crate) event_days: BTreeMap<EventDayId, EventDay>,

  pub(crate) event_fires:   Assoc<EventId, FireId>,
  pub(crate) stream_layers: Assoc<StreamId, LayerId>,

  next_id: u64,
  /// Journal of removed entities, drained by the persistence layer.
  pub(crate) deleted: Vec<EntityRef>,
}

impl FireGraph {
  pub fn new() -> Self {
    Self::default()
  }

  fn next_id(&mut self) -> u64 {
    self.next_id += 1;
    self.next_id
  }

  /// Drain the journal of entities removed since the last call.
  pub fn take_deleted(&mut self) -> Vec<EntityRef> {
    std::mem::take(&mut self.deleted)
  }

  // ─── creation ───

  pub fn create_source(&mut self, name: impl Into<String>) -> SourceId {
    let id = SourceId(self.next_id());
    self.sources.insert(id, Source::new(id, name));
    id
  }

  pub fn create_stream(&mut self, name: impl Into<String>) -> StreamId {
    let id = StreamId(self.next_id());
    self
      .streams
      .insert(id, ReconciliationStream::new(id, name));
    id
  }

  pub fn create_layer(&mut self, name: impl Into<String>) -> LayerId {
    let id = LayerId(self.next_id());
    self.layers.insert(id, SummaryDataLayer::new(id, name));
    id
  }

  pub fn create_raw_data(
    &mut self,
    source: SourceId,
    shape: Geometry<f64>,
    area: f64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    attrs: AttributeBag,
  ) -> Result<RawDataId> {
    self.source(source)?;
    let id = RawDataId(self.next_id());
    self.raw_data.insert(id, RawData {
      id,
      source,
      shape,
      area,
      start,
      end,
      attrs,
      clump: None,
    });
    Ok(id)
  }

  pub fn create_clump(
    &mut self,
    source: SourceId,
    shape: Geometry<f64>,
    area: f64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> Result<ClumpId> {
    self.source(source)?;
    let id = ClumpId(self.next_id());
    self.clumps.insert(id, Clump {
      id,
      source,
      shape,
      area,
      start,
      end,
      fire: None,
      raw_data: Vec::new(),
    });
    Ok(id)
  }

  pub fn create_fire(&mut self, source: SourceId) -> Result<FireId> {
    self.source(source)?;
    let id = FireId(self.next_id());
    self.fires.insert(id, Fire::new(id, source));
    Ok(id)
  }

  pub fn create_event(&mut self, stream: StreamId) -> Result<EventId> {
    self.stream(stream)?;
    let id = EventId(self.next_id());
    self.events.insert(id, Event::new(id, stream));
    Ok(id)
  }

  /// Create an unowned event day. Ownership is established through
  /// [`set_event_days`](Self::set_event_days).
  pub fn create_event_day(
    &mut self,
    date: NaiveDate,
    daily_area: f64,
  ) -> EventDayId {
    let id = EventDayId(self.next_id());
    self.event_days.insert(id, EventDay {
      id,
      date,
      daily_area,
      event: None,
    });
    id
  }

  // ─── lookup ───

  pub fn source(&self, id: SourceId) -> Result<&Source> {
    self.sources.get(&id).ok_or(Error::SourceNotFound(id))
  }

  pub fn source_mut(&mut self, id: SourceId) -> Result<&mut Source> {
    self.sources.get_mut(&id).ok_or(Error::SourceNotFound(id))
  }

  pub fn stream(&self, id: StreamId) -> Result<&ReconciliationStream> {
    self.streams.get(&id).ok_or(Error::StreamNotFound(id))
  }

  pub fn stream_mut(
    &mut self,
    id: StreamId,
  ) -> Result<&mut ReconciliationStream> {
    self.streams.get_mut(&id).ok_or(Error::StreamNotFound(id))
  }

  pub fn layer(&self, id: LayerId) -> Result<&SummaryDataLayer> {
    self.layers.get(&id).ok_or(Error::LayerNotFound(id))
  }

  pub fn layer_mut(&mut self, id: LayerId) -> Result<&mut SummaryDataLayer> {
    self.layers.get_mut(&id).ok_or(Error::LayerNotFound(id))
  }

  pub fn raw_datum(&self, id: RawDataId) -> Result<&RawData> {
    self.raw_data.get(&id).ok_or(Error::RawDataNotFound(id))
  }

  pub fn raw_datum_mut(&mut self, id: RawDataId) -> Result<&mut RawData> {
    self
      .raw_data
      .get_mut(&id)
      .ok_or(Error::RawDataNotFound(id))
  }

  pub fn clump(&self, id: ClumpId) -> Result<&Clump> {
    self.clumps.get(&id).ok_or(Error::ClumpNotFound(id))
  }

  pub fn clump_mut(&mut self, id: ClumpId) -> Result<&mut Clump> {
    self.clumps.get_mut(&id).ok_or(Error::ClumpNotFound(id))
  }

  pub fn fire(&self, id: FireId) -> Result<&Fire> {
    self.fires.get(&id).ok_or(Error::FireNotFound(id))
  }

  pub fn fire_mut(&mut self, id: FireId) -> Result<&mut Fire> {
    self.fires.get_mut(&id).ok_or(Error::FireNotFound(id))
  }

  pub fn event(&self, id: EventId) -> Result<&Event> {
    self.events.get(&id).ok_or(Error::EventNotFound(id))
  }

  pub fn event_mut(&mut self, id: EventId) -> Result<&mut Event> {
    self.events.get_mut(&id).ok_or(Error::EventNotFound(id))
  }

  pub fn event_day(&self, id: EventDayId) -> Result<&EventDay> {
    self
      .event_days
      .get(&id)
      .ok_or(Error::EventDayNotFound(id))
  }

  pub fn event_day_mut(&mut self, id: EventDayId) -> Result<&mut EventDay> {
    self
      .event_days
      .get_mut(&id)
      .ok_or(Error::EventDayNotFound(id))
  }

  pub fn sources(&self) -> impl Iterator<Item = &Source> {
    self.sources.values()
  }

  pub fn streams(&self) -> impl Iterator<Item = &ReconciliationStream> {
    self.streams.values()
  }

  pub fn fires(&self) -> impl Iterator<Item = &Fire> {
    self.fires.values()
  }

  pub fn events(&self) -> impl Iterator<Item = &Event> {
    self.events.values()
  }

  // ─── raw data and clump membership ───

  /// Attach a raw detection to a clump, detaching it from its previous
  /// clump if it had one.
  pub fn attach_raw_data(
    &mut self,
    raw: RawDataId,
    clump: ClumpId,
  ) -> Result<()> {
    self.clump(clump)?;
    let previous = self.raw_datum(raw)?.clump;
    if previous == Some(clump) {
      return Ok(());
    }
    if let Some(prev) = previous
      && let Some(prev_clump) = self.clumps.get_mut(&prev)
    {
      prev_clump.raw_data.retain(|&r| r != raw);
    }
    self.raw_datum_mut(raw)?.clump = Some(clump);
    self.clump_mut(clump)?.raw_data.push(raw);
    Ok(())
  }

  /// Add a clump to a fire, re-parenting it away from any previous fire.
  ///
  /// When the fire's whole-extent cache is populated it is widened in place
  /// rather than rebuilt; if that in-place union fails, the cache is dropped
  /// before the error propagates so no stale geometry survives.
  pub fn add_clump(&mut self, fire: FireId, clump: ClumpId) -> Result<()> {
    self.fire(fire)?;
    let (clump_shape, clump_area, clump_start, clump_end, previous) = {
      let c = self.clump(clump)?;
      (c.shape.clone(), c.area, c.start, c.end, c.fire)
    };
    if previous == Some(fire) {
      return Ok(());
    }
    if let Some(prev) = previous
      && let Some(prev_fire) = self.fires.get_mut(&prev)
    {
      prev_fire.clumps.remove(&clump);
      prev_fire.invalidate();
      prev_fire.area -= clump_area;
    }
    self.clump_mut(clump)?.fire = Some(fire);

    let f = self.fire_mut(fire)?;
    f.clumps.insert(clump);
    f.area += clump_area;
    // The daily breakdown cannot be widened in place.
    f.days = None;

    if let Some(summary) = f.summary.take() {
      let widened = widen_summary(summary, &clump_shape, clump_start, clump_end);
      match widened {
        Ok(summary) => f.summary = Some(summary),
        Err(e) => {
          f.summary = None;
          return Err(e.into());
        }
      }
    }
    Ok(())
  }

  /// Remove a clump from a fire without deleting either.
  pub fn remove_clump(&mut self, fire: FireId, clump: ClumpId) -> Result<()> {
    let clump_area = {
      let c = self.clump(clump)?;
      if c.fire != Some(fire) {
        return Ok(());
      }
      c.area
    };
    self.clump_mut(clump)?.fire = None;
    let f = self.fire_mut(fire)?;
    f.clumps.remove(&clump);
    f.area -= clump_area;
    f.invalidate();
    Ok(())
  }

  /// Detach every clump from a fire, returning the detached ids.
  pub fn disassociate_all_clumps(
    &mut self,
    fire: FireId,
  ) -> Result<Vec<ClumpId>> {
    let ids: Vec<ClumpId> = {
      let f = self.fire_mut(fire)?;
      let ids = std::mem::take(&mut f.clumps);
      f.area = 0.0;
      f.invalidate();
      ids.into_iter().collect()
    };
    for &id in &ids {
      if let Some(c) = self.clumps.get_mut(&id) {
        c.fire = None;
      }
    }
    Ok(ids)
  }

  // ─── derived fire geometry ───

  fn ensure_summary(&mut self, fire: FireId) -> Result<()> {
    if self.fire(fire)?.summary.is_some() {
      return Ok(());
    }
    let summary = self.compute_summary(fire)?;
    self.fire_mut(fire)?.summary = Some(summary);
    Ok(())
  }

  fn compute_summary(&self, fire: FireId) -> Result<ClumpSummary> {
    let f = self.fire(fire)?;
    if f.clumps.is_empty() {
      return Err(Error::NoClumps(fire));
    }
    let mut shapes = Vec::with_capacity(f.clumps.len());
    let mut start: Option<DateTime<Utc>> = None;
    let mut end: Option<DateTime<Utc>> = None;
    for &id in &f.clumps {
      let c = self.clump(id)?;
      shapes.push(&c.shape);
      start = Some(start.map_or(c.start, |s| s.min(c.start)));
      end = Some(end.map_or(c.end, |e| e.max(c.end)));
    }
    let unioned = gis::union_all(shapes)?;
    let shape = gis::to_multi_polygon(&unioned)?;
    let envelope = gis::envelope(&shape)?;
    let (Some(start), Some(end)) = (start, end) else {
      return Err(Error::NoClumps(fire));
    };
    debug!(fire = %fire, parts = shape.0.len(), "rebuilt fire summary");
    Ok(ClumpSummary {
      shape,
      envelope,
      start,
      end,
    })
  }

  fn ensure_days(&mut self, fire: FireId) -> Result<()> {
    if self.fire(fire)?.days.is_some() {
      return Ok(());
    }
    let days = self.compute_days(fire)?;
    self.fire_mut(fire)?.days = Some(days);
    Ok(())
  }

  fn compute_days(&self, fire: FireId) -> Result<Vec<FireDay>> {
    let f = self.fire(fire)?;
    if f.clumps.is_empty() {
      return Err(Error::NoClumps(fire));
    }
    let mut by_date: BTreeMap<NaiveDate, Vec<ClumpId>> = BTreeMap::new();
    for &id in &f.clumps {
      let c = self.clump(id)?;
      let mut date = c.start.date_naive();
      let last = c.end.date_naive();
      while date <= last {
        by_date.entry(date).or_default().push(id);
        let Some(next) = date.succ_opt() else { break };
        date = next;
      }
    }
    let mut days = Vec::with_capacity(by_date.len());
    for (date, clumps) in by_date {
      let mut shapes = Vec::with_capacity(clumps.len());
      let mut area = 0.0;
      for &id in &clumps {
        let c = self.clump(id)?;
        shapes.push(&c.shape);
        area += c.area;
      }
      let shape = gis::union_all(shapes)?;
      days.push(FireDay {
        date,
        area,
        shape,
        num_clumps: clumps.len(),
      });
    }
    Ok(days)
  }

  /// The fire's whole-extent outline, computing it if the cache is cold.
  pub fn fire_shape(&mut self, fire: FireId) -> Result<&MultiPolygon<f64>> {
    self.ensure_summary(fire)?;
    let f = self.fire(fire)?;
    f.summary
      .as_ref()
      .map(|s| &s.shape)
      .ok_or(Error::NoClumps(fire))
  }

  /// The bounding rectangle of the fire's whole extent.
  pub fn fire_envelope(&mut self, fire: FireId) -> Result<Rect<f64>> {
    self.ensure_summary(fire)?;
    let f = self.fire(fire)?;
    f.summary
      .as_ref()
      .map(|s| s.envelope)
      .ok_or(Error::NoClumps(fire))
  }

  pub fn fire_start(&mut self, fire: FireId) -> Result<DateTime<Utc>> {
    self.ensure_summary(fire)?;
    let f = self.fire(fire)?;
    f.summary
      .as_ref()
      .map(|s| s.start)
      .ok_or(Error::NoClumps(fire))
  }

  pub fn fire_end(&mut self, fire: FireId) -> Result<DateTime<Utc>> {
    self.ensure_summary(fire)?;
    let f = self.fire(fire)?;
    f.summary
      .as_ref()
      .map(|s| s.end)
      .ok_or(Error::NoClumps(fire))
  }

  /// Per-day breakdown of the fire's activity, computing it if the cache is
  /// cold. A clump contributes to every date its interval covers.
  pub fn fire_days(&mut self, fire: FireId) -> Result<&[FireDay]> {
    self.ensure_days(fire)?;
    let f = self.fire(fire)?;
    f.days
      .as_deref()
      .ok_or(Error::NoClumps(fire))
  }

  /// Assemble the fire's display name from the attribute values named by
  /// its source's configured name fields.
  pub fn fire_display_name(&self, fire: FireId) -> Result<String> {
    let f = self.fire(fire)?;
    let source = self.source(f.source)?;
    let values: Vec<&str> = source
      .fire_name_fields()
      .filter_map(|field| f.attrs.get(field))
      .collect();
    let prescribed = f.attrs.contains_key(fire::PLANNED_INITIATION_ATTR);
    Ok(fire::display_name_from(&values, prescribed))
  }

  // ─── events ───

  /// Replace an event's day set.
  ///
  /// Every incoming day must be unowned or already owned by this event;
  /// otherwise nothing is mutated and the owning event is named in the
  /// error. Days the event previously owned but which do not reappear are
  /// deleted.
  pub fn set_event_days(
    &mut self,
    event: EventId,
    days: Vec<EventDayId>,
  ) -> Result<()> {
    self.event(event)?;
    for &day in &days {
      let d = self.event_day(day)?;
      if let Some(owner) = d.event
        && owner != event
      {
        return Err(Error::EventDayOwned { day, owner });
      }
    }
    let incoming: BTreeSet<EventDayId> = days.iter().copied().collect();
    let previous = std::mem::take(&mut self.event_mut(event)?.event_days);
    for day in previous {
      if !incoming.contains(&day) && self.event_days.remove(&day).is_some() {
        self.deleted.push(EntityRef::EventDay(day));
      }
    }
    for &day in &days {
      self.event_day_mut(day)?.event = Some(event);
    }
    self.event_mut(event)?.event_days = days;
    Ok(())
  }

  /// Returns `false` if the fire was already a member.
  pub fn add_fire_to_event(
    &mut self,
    event: EventId,
    fire: FireId,
  ) -> Result<bool> {
    self.event(event)?;
    self.fire(fire)?;
    Ok(self.event_fires.link(event, fire))
  }

  pub fn remove_fire_from_event(
    &mut self,
    event: EventId,
    fire: FireId,
  ) -> Result<bool> {
    self.event(event)?;
    self.fire(fire)?;
    Ok(self.event_fires.unlink(event, fire))
  }

  /// The fires reconciled into an event, in id order.
  pub fn event_fires(&self, event: EventId) -> Vec<FireId> {
    self.event_fires.of(event)
  }

  /// The events a fire participates in, in id order.
  pub fn fire_events(&self, fire: FireId) -> Vec<EventId> {
    self.event_fires.of_rev(fire)
  }

  // ─── streams and layers ───

  pub fn add_layer_to_stream(
    &mut self,
    stream: StreamId,
    layer: LayerId,
  ) -> Result<bool> {
    self.stream(stream)?;
    self.layer(layer)?;
    Ok(self.stream_layers.link(stream, layer))
  }

  pub fn remove_layer_from_stream(
    &mut self,
    stream: StreamId,
    layer: LayerId,
  ) -> Result<bool> {
    self.stream(stream)?;
    self.layer(layer)?;
    Ok(self.stream_layers.unlink(stream, layer))
  }

  pub fn stream_layers(&self, stream: StreamId) -> Vec<LayerId> {
    self.stream_layers.of(stream)
  }

  /// The effective weighting for a source within a stream: the stream's
  /// override if configured, else the source's default, else all-zero.
  pub fn weighting_for_source(
    &self,
    stream: StreamId,
    source: SourceId,
  ) -> Result<Weighting> {
    let s = self.stream(stream)?;
    if let Some(override_) = s.weighting_for_source(source) {
      return Ok(override_.weights);
    }
    let src = self.source(source)?;
    Ok(src.default_weighting.unwrap_or_default())
  }
}

fn widen_summary(
  summary: ClumpSummary,
  shape: &Geometry<f64>,
  start: DateTime<Utc>,
  end: DateTime<Utc>,
) -> gis::Result<ClumpSummary> {
  let current = Geometry::MultiPolygon(summary.shape);
  let unioned = gis::union(&current, shape)?;
  let shape = gis::to_multi_polygon(&unioned)?;
  let envelope = gis::envelope(&shape)?;
  Ok(ClumpSummary {
    shape,
    envelope,
    start: summary.start.min(start),
    end: summary.end.max(end),
  })
}
