//! Allocation orchestrator: the public entry point
//!
//! Encodes the snapshot and customer points once, drives the per-point search
//! under the selected execution strategy, and folds the outcomes into an
//! immutable result. Caller-supplied points are never mutated; every
//! allocated point in the result is a fresh copy carrying its connection.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::encoder::encode;
use crate::executor::{run_search, CancellationToken, ExecutionStrategy};
use demandalloc_core::{AllocationRule, CustomerPoint, NetworkSnapshot, Result};

/// Options for one allocation run.
#[derive(Debug, Clone, Default)]
pub struct AllocationOptions {
    pub strategy: ExecutionStrategy,
    pub cancellation: CancellationToken,
}

/// The immutable result of an allocation run.
#[derive(Debug, Clone)]
pub struct AllocationResult {
    /// Allocated points by id, each a fresh instance carrying its connection.
    /// Points that matched no rule are omitted.
    pub allocated: HashMap<String, CustomerPoint>,
    /// `rule_matches[i]` counts the points whose first successful rule was
    /// rule `i`; parallel to the input rule list.
    pub rule_matches: Vec<usize>,
}

impl AllocationResult {
    /// Total points allocated; always equals `rule_matches.iter().sum()`.
    pub fn allocated_count(&self) -> usize {
        self.allocated.len()
    }
}

/// Allocate every customer point to its nearest rule-eligible pipe.
///
/// Builds the encoded buffers and spatial index exactly once per call,
/// regardless of how many points or rules are supplied, then searches each
/// point under `options.strategy`. Results are independent of how work was
/// partitioned across threads.
pub fn allocate(
    snapshot: &NetworkSnapshot,
    rules: &[AllocationRule],
    points: &[CustomerPoint],
    options: &AllocationOptions,
) -> Result<AllocationResult> {
    let started = Instant::now();
    let encoded = encode(snapshot, points)?;
    debug!(elapsed_ms = started.elapsed().as_millis() as u64, "encoding done");

    let outcomes = run_search(&encoded, rules, &options.strategy, &options.cancellation)?;

    // The result is a mapping keyed by id. A duplicate id in the input list
    // collapses to its last occurrence before counting, so rule_matches
    // always sums to the number of allocated entries.
    let mut outcomes_by_id: HashMap<&str, (&CustomerPoint, _)> = HashMap::new();
    for (point, outcome) in points.iter().zip(outcomes) {
        if outcomes_by_id.insert(point.id(), (point, outcome)).is_some() {
            warn!(id = point.id(), "duplicate customer point id, keeping the last occurrence");
        }
    }

    let mut allocated = HashMap::new();
    let mut rule_matches = vec![0usize; rules.len()];
    for (id, (point, outcome)) in outcomes_by_id {
        if let Some((connection, rule)) = outcome {
            rule_matches[rule] += 1;
            allocated.insert(id.to_string(), point.with_connection(connection));
        }
    }

    info!(
        points = points.len(),
        allocated = allocated.len(),
        rules = rules.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "allocation finished"
    );

    Ok(AllocationResult {
        allocated,
        rule_matches,
    })
}
