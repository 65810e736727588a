//! Cascading deletion.
//!
//! Deletion walks upward through the aggregation hierarchy: removing the
//! last child of a parent removes the parent too. Raw data cascades to its
//! clump, clumps to their fire, fires to their events. The one asymmetry is
//! at the top: deleting an event never deletes its fires, because fires are
//! source-level facts and events are only a reconciled view over them.
//!
//! Every removal is journaled in [`FireGraph::take_deleted`] so a
//! persistence layer can mirror the graph after the fact.

use tracing::debug;

use crate::{
  clump::ClumpId,
  error::Result,
  event::{EventDayId, EventId},
  fire::FireId,
  graph::FireGraph,
  raw_data::RawDataId,
  stream::{LayerId, StreamId},
};

/// A reference to any deletable entity, as recorded in the deletion
/// journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
  RawData(RawDataId),
  Clump(ClumpId),
  Fire(FireId),
  Event(EventId),
  EventDay(EventDayId),
  Stream(StreamId),
  Layer(LayerId),
}

impl FireGraph {
  /// Delete an entity and everything the cascade rules require.
  pub fn delete(&mut self, entity: EntityRef) -> Result<()> {
    match entity {
      EntityRef::RawData(id) => self.delete_raw_data(id),
      EntityRef::Clump(id) => self.delete_clump(id),
      EntityRef::Fire(id) => self.delete_fire(id),
      EntityRef::Event(id) => self.delete_event(id),
      EntityRef::EventDay(id) => self.delete_event_day(id),
      EntityRef::Stream(id) => self.delete_stream(id),
      EntityRef::Layer(id) => self.delete_layer(id),
    }
  }

  /// Delete one raw detection. If it empties its clump, the clump cascade
  /// runs too.
  pub fn delete_raw_data(&mut self, id: RawDataId) -> Result<()> {
    let Some(raw) = self.raw_data.remove(&id) else {
      return Ok(());
    };
    self.deleted.push(EntityRef::RawData(id));
    if let Some(clump_id) = raw.clump {
      let now_empty = match self.clumps.get_mut(&clump_id) {
        Some(clump) => {
          clump.raw_data.retain(|&r| r != id);
          clump.raw_data.is_empty()
        }
        None => false,
      };
      if now_empty {
        debug!(clump = %clump_id, "clump emptied by raw data deletion");
        self.delete_clump(clump_id)?;
      }
    }
    Ok(())
  }

  /// Delete a clump along with its raw detections. If it empties its fire,
  /// the fire cascade runs too.
  pub fn delete_clump(&mut self, id: ClumpId) -> Result<()> {
    let Some(clump) = self.clumps.remove(&id) else {
      return Ok(());
    };
    self.deleted.push(EntityRef::Clump(id));
    for raw_id in clump.raw_data {
      if self.raw_data.remove(&raw_id).is_some() {
        self.deleted.push(EntityRef::RawData(raw_id));
      }
    }
    if let Some(fire_id) = clump.fire {
      let now_empty = match self.fires.get_mut(&fire_id) {
        Some(fire) => {
          fire.clumps.remove(&id);
          fire.area -= clump.area;
          fire.invalidate();
          fire.clumps.is_empty()
        }
        None => false,
      };
      if now_empty {
        debug!(fire = %fire_id, "fire emptied by clump deletion");
        self.delete_fire(fire_id)?;
      }
    }
    Ok(())
  }

  /// Delete a fire. Surviving clumps are detached, not deleted. Events that
  /// lose their last fire are deleted.
  pub fn delete_fire(&mut self, id: FireId) -> Result<()> {
    let Some(fire) = self.fires.remove(&id) else {
      return Ok(());
    };
    self.deleted.push(EntityRef::Fire(id));
    for clump_id in fire.clumps {
      if let Some(clump) = self.clumps.get_mut(&clump_id) {
        clump.fire = None;
      }
    }
    let events = self.event_fires.remove_all_rev(id);
    for event_id in events {
      if self.event_fires.count_of(event_id) == 0 {
        debug!(event = %event_id, "event emptied by fire deletion");
        self.delete_event(event_id)?;
      }
    }
    Ok(())
  }

  /// Delete an event and its days. Member fires are detached, never
  /// deleted.
  pub fn delete_event(&mut self, id: EventId) -> Result<()> {
    let Some(event) = self.events.remove(&id) else {
      return Ok(());
    };
    self.deleted.push(EntityRef::Event(id));
    self.event_fires.remove_all(id);
    for day_id in event.event_days {
      if self.event_days.remove(&day_id).is_some() {
        self.deleted.push(EntityRef::EventDay(day_id));
      }
    }
    Ok(())
  }

  /// Delete one event day, detaching it from its owning event.
  pub fn delete_event_day(&mut self, id: EventDayId) -> Result<()> {
    let Some(day) = self.event_days.remove(&id) else {
      return Ok(());
    };
    self.deleted.push(EntityRef::EventDay(id));
    if let Some(event_id) = day.event
      && let Some(event) = self.events.get_mut(&event_id)
    {
      event.event_days.retain(|&d| d != id);
    }
    Ok(())
  }

  /// Delete a reconciliation stream. Its events are left in place; callers
  /// that want them gone delete them first.
  pub fn delete_stream(&mut self, id: StreamId) -> Result<()> {
    if self.streams.remove(&id).is_none() {
      return Ok(());
    }
    self.deleted.push(EntityRef::Stream(id));
    self.stream_layers.remove_all(id);
    Ok(())
  }

  /// Delete a summary data layer, detaching it from every stream.
  pub fn delete_layer(&mut self, id: LayerId) -> Result<()> {
    if self.layers.remove(&id).is_none() {
      return Ok(());
    }
    self.deleted.push(EntityRef::Layer(id));
    self.stream_layers.remove_all_rev(id);
    Ok(())
  }
}
