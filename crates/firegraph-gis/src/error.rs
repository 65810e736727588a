//! Error types for `firegraph-gis`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("cannot union zero geometries")]
  EmptyUnion,

  #[error("{found} geometry returned from union; expected Polygon or MultiPolygon")]
  NonPolygonal { found: &'static str },

  #[error("geometry has no envelope")]
  EmptyEnvelope,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
