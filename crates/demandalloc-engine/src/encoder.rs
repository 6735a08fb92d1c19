//! Graph & geometry encoder
//!
//! Flattens a network snapshot plus a customer point list into the four
//! fixed-layout buffers of `demandalloc_core::format` and builds the segment
//! R-tree. Cost is O(pipes + segments + nodes + customer points); the id to
//! index maps are per-call locals and die with the encoder.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::spatial::{SegmentEnvelope, SegmentIndex};
use demandalloc_core::format::{
    self, CustomerRecord, NodeRecord, PipeRecord, SegmentRecord,
};
use demandalloc_core::{CustomerPoint, Error, NetworkSnapshot, Result};

/// The encoded network: four read-only buffers plus the spatial index.
///
/// Rebuilt fresh on every orchestrator call and discarded afterward. All
/// fields are immutable once built, so any number of worker threads may read
/// them concurrently.
#[derive(Debug)]
pub struct EncodedNetwork {
    pub segments: Vec<u8>,
    pub pipes: Vec<u8>,
    pub nodes: Vec<u8>,
    pub customer_points: Vec<u8>,
    pub index: SegmentIndex,
}

impl EncodedNetwork {
    /// Number of encoded customer points.
    pub fn customer_count(&self) -> usize {
        format::record_count(&self.customer_points)
    }
}

/// Encode a snapshot and customer point list into buffers plus the R-tree.
///
/// Segment envelopes are inserted in segment-buffer order, so a tree hit is
/// directly usable as a segment-buffer index. A pipe endpoint id missing from
/// the snapshot fails the whole call with [`Error::UnknownNode`].
pub fn encode(snapshot: &NetworkSnapshot, points: &[CustomerPoint]) -> Result<EncodedNetwork> {
    let mut nodes = format::new_buffer();
    let mut node_index: HashMap<&str, u32> = HashMap::with_capacity(snapshot.nodes().len());
    for (i, node) in snapshot.nodes().iter().enumerate() {
        let id = encode_id_logged(&node.id, "node");
        nodes.extend_from_slice(
            &NodeRecord {
                coordinates: node.coordinates,
                kind: node.kind,
                id,
            }
            .to_bytes(),
        );
        node_index.insert(node.id.as_str(), i as u32);
    }
    format::set_record_count(&mut nodes, snapshot.nodes().len() as u32);

    let mut pipes = format::new_buffer();
    let mut segments = format::new_buffer();
    let mut envelopes = Vec::new();
    for (pipe_idx, pipe) in snapshot.pipes().iter().enumerate() {
        let start_node = *node_index.get(pipe.start_node.as_str()).ok_or_else(|| {
            Error::UnknownNode {
                pipe_id: pipe.id.clone(),
                node_id: pipe.start_node.clone(),
            }
        })?;
        let end_node = *node_index.get(pipe.end_node.as_str()).ok_or_else(|| {
            Error::UnknownNode {
                pipe_id: pipe.id.clone(),
                node_id: pipe.end_node.clone(),
            }
        })?;

        let id = encode_id_logged(&pipe.id, "pipe");
        pipes.extend_from_slice(
            &PipeRecord {
                id,
                diameter: pipe.diameter,
                start_node,
                end_node,
            }
            .to_bytes(),
        );

        for pair in pipe.vertices.windows(2) {
            let record = SegmentRecord {
                pipe: pipe_idx as u32,
                start: pair[0],
                end: pair[1],
            };
            envelopes.push(SegmentEnvelope::new(
                envelopes.len() as u32,
                record.start,
                record.end,
            ));
            segments.extend_from_slice(&record.to_bytes());
        }
    }
    format::set_record_count(&mut pipes, snapshot.pipes().len() as u32);
    format::set_record_count(&mut segments, envelopes.len() as u32);

    let mut customer_points = format::new_buffer();
    for point in points {
        let id = encode_id_logged(point.id(), "customer point");
        customer_points.extend_from_slice(
            &CustomerRecord {
                id,
                coordinates: point.coordinates(),
            }
            .to_bytes(),
        );
    }
    format::set_record_count(&mut customer_points, points.len() as u32);

    let segment_count = envelopes.len();
    let index = SegmentIndex::bulk_load(envelopes);

    debug!(
        pipes = snapshot.pipes().len(),
        segments = segment_count,
        nodes = snapshot.nodes().len(),
        customer_points = points.len(),
        "network encoded"
    );

    Ok(EncodedNetwork {
        segments,
        pipes,
        nodes,
        customer_points,
        index,
    })
}

fn encode_id_logged(id: &str, what: &'static str) -> [u8; format::ID_SLOT_SIZE] {
    let (slot, truncated) = format::encode_id(id);
    if truncated {
        warn!(id, what, "id longer than {} bytes, truncated", format::ID_SLOT_SIZE);
    }
    slot
}

#[cfg(test)]
mod tests {
    use super::*;
    use demandalloc_core::{NodeAsset, NodeKind, PipeAsset};

    fn junction(id: &str, coordinates: [f64; 2]) -> NodeAsset {
        NodeAsset {
            id: id.into(),
            kind: NodeKind::Junction,
            coordinates,
        }
    }

    fn two_junction_snapshot() -> NetworkSnapshot {
        let mut snapshot = NetworkSnapshot::new();
        snapshot.add_node(junction("j1", [0.0, 0.0]));
        snapshot.add_node(junction("j2", [0.002, 0.0]));
        snapshot.add_pipe(PipeAsset {
            id: "p1".into(),
            diameter: 12.0,
            start_node: "j1".into(),
            end_node: "j2".into(),
            vertices: vec![[0.0, 0.0], [0.001, 0.0], [0.002, 0.0]],
        });
        snapshot
    }

    #[test]
    fn test_encode_counts() {
        let snapshot = two_junction_snapshot();
        let points = vec![CustomerPoint::new("cp1", [0.001, 0.0002], 1.0, "")];
        let encoded = encode(&snapshot, &points).unwrap();

        assert_eq!(format::record_count(&encoded.pipes), 1);
        assert_eq!(format::record_count(&encoded.segments), 2);
        assert_eq!(format::record_count(&encoded.nodes), 2);
        assert_eq!(encoded.customer_count(), 1);
        assert_eq!(encoded.index.len(), 2);
    }

    #[test]
    fn test_segment_indices_line_up_with_buffer() {
        let snapshot = two_junction_snapshot();
        let encoded = encode(&snapshot, &[]).unwrap();

        let hits = encoded.index.query_radius([0.0005, 0.0], 100.0);
        assert!(!hits.is_empty());
        for hit in hits {
            let segment = format::segment_at(&encoded.segments, hit as usize).unwrap();
            assert_eq!(segment.pipe, 0);
        }
    }

    #[test]
    fn test_encode_resolves_node_indices() {
        let snapshot = two_junction_snapshot();
        let encoded = encode(&snapshot, &[]).unwrap();

        let pipe = format::pipe_at(&encoded.pipes, 0).unwrap();
        let start = format::node_at(&encoded.nodes, pipe.start_node as usize).unwrap();
        let end = format::node_at(&encoded.nodes, pipe.end_node as usize).unwrap();
        assert_eq!(format::decode_id(&start.id), "j1");
        assert_eq!(format::decode_id(&end.id), "j2");
        assert_eq!(pipe.diameter, 12.0);
    }

    #[test]
    fn test_unknown_endpoint_is_an_error() {
        let mut snapshot = NetworkSnapshot::new();
        snapshot.add_node(junction("j1", [0.0, 0.0]));
        snapshot.add_pipe(PipeAsset {
            id: "p1".into(),
            diameter: 12.0,
            start_node: "j1".into(),
            end_node: "missing".into(),
            vertices: vec![[0.0, 0.0], [0.001, 0.0]],
        });

        let err = encode(&snapshot, &[]).unwrap_err();
        assert!(matches!(err, Error::UnknownNode { .. }));
    }

    #[test]
    fn test_empty_snapshot_still_builds_index() {
        let encoded = encode(&NetworkSnapshot::new(), &[]).unwrap();
        assert!(encoded.index.is_empty());
        assert_eq!(format::record_count(&encoded.segments), 0);
        assert_eq!(encoded.customer_count(), 0);
    }

    #[test]
    fn test_single_vertex_pipe_has_no_segments() {
        let mut snapshot = NetworkSnapshot::new();
        snapshot.add_node(junction("j1", [0.0, 0.0]));
        snapshot.add_node(junction("j2", [0.001, 0.0]));
        snapshot.add_pipe(PipeAsset {
            id: "p1".into(),
            diameter: 12.0,
            start_node: "j1".into(),
            end_node: "j2".into(),
            vertices: vec![[0.0, 0.0]],
        });

        let encoded = encode(&snapshot, &[]).unwrap();
        assert_eq!(format::record_count(&encoded.pipes), 1);
        assert_eq!(format::record_count(&encoded.segments), 0);
        assert!(encoded.index.is_empty());
    }
}
