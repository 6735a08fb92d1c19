//! Read-only network snapshot consumed by the encoder
//!
//! The authoritative network model (topology, asset mutation, undo/redo)
//! lives elsewhere; the engine only reads a snapshot of it. A snapshot is a
//! flat collection of pipe and node assets whose iteration order is the
//! insertion order, which makes encoding deterministic within a call.

use serde::{Deserialize, Serialize};

use crate::LngLat;

/// Node type discriminator. Only junctions can receive demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Junction,
    Reservoir,
    Tank,
}

impl NodeKind {
    /// Returns true if a node of this kind can receive allocated demand.
    pub fn accepts_demand(&self) -> bool {
        matches!(self, NodeKind::Junction)
    }
}

/// A pipe asset: diameter, endpoint node references, and polyline geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeAsset {
    pub id: String,
    /// Diameter in millimeters.
    pub diameter: f64,
    /// Id of the node at the start of the geometry.
    pub start_node: String,
    /// Id of the node at the end of the geometry.
    pub end_node: String,
    /// Ordered line geometry, `[lng, lat]` per vertex.
    pub vertices: Vec<LngLat>,
}

/// A node asset: junction, reservoir, or tank at a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAsset {
    pub id: String,
    pub kind: NodeKind,
    pub coordinates: LngLat,
}

/// A read-only snapshot of the network: pipes and nodes in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pipes: Vec<PipeAsset>,
    nodes: Vec<NodeAsset>,
}

impl NetworkSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pipe(&mut self, pipe: PipeAsset) {
        self.pipes.push(pipe);
    }

    pub fn add_node(&mut self, node: NodeAsset) {
        self.nodes.push(node);
    }

    pub fn pipes(&self) -> &[PipeAsset] {
        &self.pipes
    }

    pub fn nodes(&self) -> &[NodeAsset] {
        &self.nodes
    }

    /// Linear scan; meant for spot lookups and tests. Code resolving many
    /// ids should build its own map, as the encoder does per call.
    pub fn node_by_id(&self, id: &str) -> Option<&NodeAsset> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Linear scan; see [`NetworkSnapshot::node_by_id`].
    pub fn pipe_by_id(&self, id: &str) -> Option<&PipeAsset> {
        self.pipes.iter().find(|p| p.id == id)
    }
}
