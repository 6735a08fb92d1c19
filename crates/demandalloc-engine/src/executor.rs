//! Execution strategies for the per-point search
//!
//! Each customer point's outcome depends only on its own coordinates and the
//! static encoded buffers, so the point range can be split into contiguous
//! chunks and searched from any number of threads borrowing the same
//! `EncodedNetwork`. Outcomes come back in input order either way, making the
//! two strategies observationally identical.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::encoder::EncodedNetwork;
use crate::search::find_connection;
use demandalloc_core::format;
use demandalloc_core::{AllocationRule, Connection, Error, Result};

/// How the orchestrator drives the search over the customer point range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Search every point on the calling thread.
    #[default]
    Sequential,
    /// Partition the point range into contiguous chunks over a rayon pool.
    /// `workers: None` sizes the pool automatically.
    WorkerPool { workers: Option<usize> },
}

/// Cooperative cancellation handle.
///
/// Cloned tokens share state; cancelling any clone aborts the run with
/// [`Error::Cancelled`] and no partial results are applied.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Outcome for one customer point: the connection and matching rule index,
/// or `None` when no rule yielded a connection.
pub(crate) type PointOutcome = Option<(Connection, usize)>;

/// Run the search over every encoded customer point, in input order.
pub(crate) fn run_search(
    encoded: &EncodedNetwork,
    rules: &[AllocationRule],
    strategy: &ExecutionStrategy,
    token: &CancellationToken,
) -> Result<Vec<PointOutcome>> {
    let count = encoded.customer_count();
    match strategy {
        ExecutionStrategy::Sequential => (0..count)
            .map(|i| search_one(encoded, rules, i, token))
            .collect(),
        ExecutionStrategy::WorkerPool { workers } => {
            let run = || parallel_search(encoded, rules, count, token);
            let outcome = match workers {
                Some(n) => {
                    let pool = rayon::ThreadPoolBuilder::new()
                        .num_threads(*n)
                        .build()
                        .map_err(|e| Error::Worker(e.to_string()))?;
                    catch_unwind(AssertUnwindSafe(|| pool.install(run)))
                }
                None => catch_unwind(AssertUnwindSafe(run)),
            };
            outcome.unwrap_or_else(|panic| Err(Error::Worker(panic_message(&panic))))
        }
    }
}

fn parallel_search(
    encoded: &EncodedNetwork,
    rules: &[AllocationRule],
    count: usize,
    token: &CancellationToken,
) -> Result<Vec<PointOutcome>> {
    let threads = rayon::current_num_threads().max(1);
    let chunk_size = count.div_ceil(threads).max(1);
    let indices: Vec<usize> = (0..count).collect();

    let chunks: Vec<Vec<PointOutcome>> = indices
        .par_chunks(chunk_size)
        .map(|chunk| {
            chunk
                .iter()
                .map(|&i| search_one(encoded, rules, i, token))
                .collect::<Result<Vec<PointOutcome>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(chunks.concat())
}

fn search_one(
    encoded: &EncodedNetwork,
    rules: &[AllocationRule],
    index: usize,
    token: &CancellationToken,
) -> Result<PointOutcome> {
    if token.is_cancelled() {
        return Err(Error::Cancelled);
    }
    let record = format::customer_at(&encoded.customer_points, index)
        .ok_or_else(|| Error::Worker(format!("customer record {index} out of bounds")))?;
    Ok(find_connection(encoded, record.coordinates, rules))
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
