//! demandalloc-core: Core types and record formats for demand allocation
//!
//! This crate defines the foundational types for allocating customer demand
//! points onto a water-distribution network:
//! - Allocation rules: ordered `(max_distance, max_diameter)` eligibility pairs
//! - Customer points and their resolved connections
//! - The read-only network snapshot the engine consumes
//! - The fixed-layout binary record formats shared by every worker thread
//!
//! # Data flow
//!
//! The engine (demandalloc-engine) encodes a snapshot plus a customer point
//! list into flat binary buffers described by [`format`], builds a spatial
//! index over pipe segments, and searches each point against the shared
//! read-only buffers. Nothing in this crate mutates a snapshot; results come
//! back as fresh [`CustomerPoint`] instances carrying a [`Connection`].

mod customer;
mod error;
mod rules;
mod snapshot;

pub mod format;

pub use customer::{Connection, CustomerPoint};
pub use error::Error;
pub use rules::AllocationRule;
pub use snapshot::{NetworkSnapshot, NodeAsset, NodeKind, PipeAsset};

pub type Result<T> = std::result::Result<T, Error>;

/// A WGS84 coordinate pair, `[longitude, latitude]` in degrees.
pub type LngLat = [f64; 2];
