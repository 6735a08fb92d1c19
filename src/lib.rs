//! demandalloc: customer-point demand allocation for water networks
//!
//! Facade crate re-exporting the public surface of `demandalloc-core` and
//! `demandalloc-engine`. See the engine crate for the allocation algorithm.

pub use demandalloc_core::{
    AllocationRule, Connection, CustomerPoint, Error, NetworkSnapshot, NodeAsset, NodeKind,
    PipeAsset, Result,
};
pub use demandalloc_engine::{
    allocate, AllocationOptions, AllocationResult, CancellationToken, ExecutionStrategy,
};

pub use demandalloc_core::format;
