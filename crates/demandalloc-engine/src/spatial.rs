//! R-tree over pipe segment bounding boxes
//!
//! Built once per allocation call, in segment-buffer order, so a hit's
//! `segment` field is directly usable as a segment-buffer index. The tree is
//! never empty: encoding a network with zero pipe segments inserts a single
//! placeholder envelope which queries filter back out.

use rstar::{RTree, RTreeObject, AABB};

use crate::geometry::meters_per_degree;
use demandalloc_core::LngLat;

/// Sentinel segment index for the placeholder envelope.
const PLACEHOLDER: u32 = u32::MAX;

/// Bounding box of one pipe segment, tagged with its segment-buffer index.
#[derive(Debug, Clone)]
pub struct SegmentEnvelope {
    pub segment: u32,
    bounds: AABB<[f64; 2]>,
}

impl SegmentEnvelope {
    /// Envelope of the segment from `start` to `end`.
    pub fn new(segment: u32, start: LngLat, end: LngLat) -> Self {
        let bounds = AABB::from_corners(
            [start[0].min(end[0]), start[1].min(end[1])],
            [start[0].max(end[0]), start[1].max(end[1])],
        );
        Self { segment, bounds }
    }

    fn placeholder() -> Self {
        Self {
            segment: PLACEHOLDER,
            bounds: AABB::from_point([0.0, 0.0]),
        }
    }
}

impl RTreeObject for SegmentEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

/// Spatial index over all segments of all pipes.
#[derive(Debug)]
pub struct SegmentIndex {
    tree: RTree<SegmentEnvelope>,
    segment_count: usize,
}

impl SegmentIndex {
    /// Bulk-load the index from envelopes in segment-buffer order.
    ///
    /// An empty input still produces a one-entry tree (the placeholder), per
    /// the encoding invariant that the index is never empty.
    pub fn bulk_load(envelopes: Vec<SegmentEnvelope>) -> Self {
        let segment_count = envelopes.len();
        let items = if envelopes.is_empty() {
            vec![SegmentEnvelope::placeholder()]
        } else {
            envelopes
        };
        Self {
            tree: RTree::bulk_load(items),
            segment_count,
        }
    }

    /// Number of real (non-placeholder) segments indexed.
    pub fn len(&self) -> usize {
        self.segment_count
    }

    /// True when only the placeholder is present.
    pub fn is_empty(&self) -> bool {
        self.segment_count == 0
    }

    /// Segment indices whose bounding boxes intersect a disk of `radius_m`
    /// meters around `center`, as a lng/lat box buffered at the center's
    /// latitude.
    pub fn query_radius(&self, center: LngLat, radius_m: f64) -> Vec<u32> {
        let (m_per_deg_lng, m_per_deg_lat) = meters_per_degree(center[1]);
        let dlng = radius_m / m_per_deg_lng;
        let dlat = radius_m / m_per_deg_lat;
        let bounds = AABB::from_corners(
            [center[0] - dlng, center[1] - dlat],
            [center[0] + dlng, center[1] + dlat],
        );
        self.tree
            .locate_in_envelope_intersecting(&bounds)
            .map(|e| e.segment)
            .filter(|&s| s != PLACEHOLDER)
            .collect()
    }
}
