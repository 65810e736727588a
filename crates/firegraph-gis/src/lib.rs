//! Geometry primitives for the Firegraph aggregation engine.
//!
//! This crate is deliberately small: it wraps the [`geo`] algorithms the
//! engine needs (polygonal union, envelope, area) behind a surface that
//! makes the "union must reduce to a polygon" contract explicit. It knows
//! nothing about fires, events, or any other domain entity.

pub mod area;
pub mod error;
pub mod union;

pub use error::{Error, Result};
pub use union::{envelope, geometry_kind, to_multi_polygon, union, union_all};
