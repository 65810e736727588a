//! Core entity graph for cross-source wildfire reconciliation.
//!
//! This crate owns the aggregation chain: raw detections are grouped into
//! clumps (by an external clumping algorithm), clumps aggregate into
//! per-source fires with lazily-cached derived geometry, and fires reconcile
//! into cross-source events. The crate manages the resulting graph (merges,
//! cascading deletion, per-source event slices), not the decision heuristics
//! that produce it.
//!
//! Everything is synchronous and single-unit-of-work: the caller holds the
//! [`FireGraph`] exclusively for the duration of any operation, and deletions
//! are journaled as tombstones for the surrounding transaction boundary to
//! drain (see [`FireGraph::take_deleted`]).

pub mod assoc;
pub mod attrs;
pub mod cascade;
pub mod clump;
pub mod error;
pub mod event;
pub mod fire;
pub mod graph;
pub mod merge;
pub mod query;
pub mod raw_data;
pub mod slice;
pub mod source;
pub mod stream;
pub mod weighting;

pub use error::{Error, Result};
pub use graph::FireGraph;
