//! Error types for `firegraph-core`.

use thiserror::Error;

use crate::{
  clump::ClumpId,
  event::{EventDayId, EventId},
  fire::FireId,
  raw_data::RawDataId,
  source::SourceId,
  stream::{LayerId, StreamId},
};

#[derive(Debug, Error)]
pub enum Error {
  /// Cross-entity precondition violated: `merge_fires` inputs span two
  /// sources. Raised before any mutation.
  #[error("incompatible sources for merged fire: {0:?} and {1:?}")]
  IncompatibleSources(String, String),

  /// Cross-entity precondition violated: `merge_events` inputs span two
  /// reconciliation streams. Raised before any mutation.
  #[error("incompatible streams for merged event: {0:?} and {1:?}")]
  IncompatibleStreams(String, String),

  #[error("cannot merge zero {0}")]
  EmptyMerge(&'static str),

  /// An event day already belongs to another event; event days are never
  /// re-parented.
  #[error("event day {day} already belongs to event {owner}")]
  EventDayOwned { day: EventDayId, owner: EventId },

  /// Derived clump state was requested for a fire with no member clumps.
  #[error("fire {0} has no clumps to summarize")]
  NoClumps(FireId),

  #[error("source not found: {0}")]
  SourceNotFound(SourceId),

  #[error("stream not found: {0}")]
  StreamNotFound(StreamId),

  #[error("summary data layer not found: {0}")]
  LayerNotFound(LayerId),

  #[error("raw data not found: {0}")]
  RawDataNotFound(RawDataId),

  #[error("clump not found: {0}")]
  ClumpNotFound(ClumpId),

  #[error("fire not found: {0}")]
  FireNotFound(FireId),

  #[error("event not found: {0}")]
  EventNotFound(EventId),

  #[error("event day not found: {0}")]
  EventDayNotFound(EventDayId),

  /// A geometry union did not reduce to a polygonal result, or had no
  /// input. Caches are left untouched when this is raised.
  #[error(transparent)]
  Geometry(#[from] firegraph_gis::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
