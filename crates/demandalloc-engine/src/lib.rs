//! demandalloc-engine: nearest-pipe allocation over encoded network buffers
//!
//! The engine takes a read-only network snapshot plus a customer point list,
//! encodes both into flat binary buffers (demandalloc-core's record formats),
//! builds an R-tree over every pipe segment, and snaps each point to the
//! closest rule-eligible pipe with an expanding-ring search. The winning
//! pipe's demand-bearing junction is resolved from its endpoint nodes.
//!
//! Everything downstream of the encoder is read-only, so the per-point search
//! is embarrassingly parallel: [`ExecutionStrategy::WorkerPool`] fans
//! contiguous point ranges out over a rayon pool against the same borrowed
//! buffers, and results are identical to a sequential run.
//!
//! ```no_run
//! use demandalloc_core::{AllocationRule, CustomerPoint, NetworkSnapshot};
//! use demandalloc_engine::{allocate, AllocationOptions};
//!
//! # fn demo(snapshot: NetworkSnapshot, points: Vec<CustomerPoint>) -> demandalloc_core::Result<()> {
//! let rules = vec![AllocationRule::new(200.0, 300.0)];
//! let result = allocate(&snapshot, &rules, &points, &AllocationOptions::default())?;
//! println!("allocated {} points", result.allocated.len());
//! # Ok(())
//! # }
//! ```

mod encoder;
mod executor;
mod geometry;
mod orchestrator;
mod search;
mod spatial;

pub use encoder::{encode, EncodedNetwork};
pub use executor::{CancellationToken, ExecutionStrategy};
pub use orchestrator::{allocate, AllocationOptions, AllocationResult};
pub use spatial::SegmentIndex;
