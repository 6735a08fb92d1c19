//! Allocation search: expanding-ring nearest pipe with diameter filtering
//!
//! Pure function over the encoded buffers; no side effects, safe to run from
//! any number of threads. Correctness of the early return: rings are
//! processed in increasing radius order and a segment's distance is only
//! accepted within the ring whose outer bound covers it, so the first ring
//! that yields a junction-resolvable best candidate holds the globally
//! closest one.

use crate::encoder::EncodedNetwork;
use crate::geometry::{haversine_m, nearest_point_on_segment};
use demandalloc_core::format;
use demandalloc_core::{AllocationRule, Connection, LngLat};

/// Search ring growth step in meters.
pub(crate) const RING_STEP_M: f64 = 30.0;

struct Candidate {
    pipe: u32,
    snap: LngLat,
    distance: f64,
}

/// Find the first rule under which `point` connects to a pipe, returning the
/// connection and the zero-based index of the matching rule.
pub(crate) fn find_connection(
    encoded: &EncodedNetwork,
    point: LngLat,
    rules: &[AllocationRule],
) -> Option<(Connection, usize)> {
    if encoded.index.is_empty() {
        return None;
    }
    rules
        .iter()
        .enumerate()
        .find_map(|(i, rule)| search_rule(encoded, point, rule).map(|c| (c, i)))
}

/// Expanding-ring search for one rule.
fn search_rule(
    encoded: &EncodedNetwork,
    point: LngLat,
    rule: &AllocationRule,
) -> Option<Connection> {
    let mut processed = vec![false; encoded.index.len()];
    let mut best: Option<Candidate> = None;

    let mut radius = RING_STEP_M;
    loop {
        for hit in encoded.index.query_radius(point, radius) {
            let idx = hit as usize;
            if processed[idx] {
                continue;
            }
            let segment = format::segment_at(&encoded.segments, idx)?;
            let pipe = format::pipe_at(&encoded.pipes, segment.pipe as usize)?;
            if !rule.admits_diameter(pipe.diameter) {
                // Never eligible under this rule, drop it for good.
                processed[idx] = true;
                continue;
            }

            let (snap, distance) = nearest_point_on_segment(point, segment.start, segment.end);
            if distance > rule.max_distance || distance > radius {
                // Out of reach for this ring; a later ring may accept it.
                continue;
            }
            processed[idx] = true;

            if best.as_ref().map_or(true, |b| distance < b.distance) {
                best = Some(Candidate {
                    pipe: segment.pipe,
                    snap,
                    distance,
                });
            }
        }

        // A best candidate whose junction resolves ends the search. On
        // resolution failure the candidate is kept and rings keep expanding;
        // there is no fallback to a second-best candidate.
        if let Some(candidate) = &best {
            if let Some(connection) = resolve_junction(encoded, candidate) {
                return Some(connection);
            }
        }

        if radius >= rule.max_distance {
            return None;
        }
        radius += RING_STEP_M;
    }
}

/// Decide which endpoint of the candidate pipe receives the demand.
///
/// Reservoir and tank endpoints are discarded; with both endpoints being
/// junctions, the one geometrically closer to the snap point wins.
fn resolve_junction(encoded: &EncodedNetwork, candidate: &Candidate) -> Option<Connection> {
    let pipe = format::pipe_at(&encoded.pipes, candidate.pipe as usize)?;
    let start = format::node_at(&encoded.nodes, pipe.start_node as usize)?;
    let end = format::node_at(&encoded.nodes, pipe.end_node as usize)?;

    let junction = match (start.kind.accepts_demand(), end.kind.accepts_demand()) {
        (false, false) => return None,
        (true, false) => start,
        (false, true) => end,
        (true, true) => {
            let d_start = haversine_m(candidate.snap, start.coordinates);
            let d_end = haversine_m(candidate.snap, end.coordinates);
            if d_start <= d_end {
                start
            } else {
                end
            }
        }
    };

    Some(Connection {
        pipe_id: format::decode_id(&pipe.id),
        snap_point: candidate.snap,
        distance: candidate.distance,
        junction_id: format::decode_id(&junction.id),
    })
}
