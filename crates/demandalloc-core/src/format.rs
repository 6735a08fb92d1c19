//! Fixed binary record formats for the encoded network buffers
//!
//! The encoder flattens a network snapshot and a customer point list into
//! four append-only buffers (segments, pipes, nodes, customer points). The
//! layouts are denormalized for zero-copy reads: records are fixed width,
//! little-endian, and reference each other by buffer-local index, never by
//! string id. Decoding is a pure function of `(buffer, index)` with no shared
//! mutable state, so the same buffer can be read from any number of threads.
//!
//! Every buffer starts with an 8-byte header:
//!
//! | offset | size | field |
//! |--------|------|-------------------|
//! | 0      | 4    | record count (u32) |
//! | 4      | 4    | reserved           |
//!
//! String ids live in fixed 32-byte slots, NUL-padded; ids longer than the
//! slot are truncated at a UTF-8 boundary (the encoder logs each truncation).

use crate::snapshot::NodeKind;
use crate::LngLat;

/// Buffer header size in bytes (record count + reserved).
pub const BUFFER_HEADER_SIZE: usize = 8;

/// Fixed id slot size in bytes.
pub const ID_SLOT_SIZE: usize = 32;

/// Segment record size: pipe index + two coordinate pairs.
pub const SEGMENT_RECORD_SIZE: usize = 36;

/// Pipe record size: id slot + diameter + two node indices.
pub const PIPE_RECORD_SIZE: usize = 48;

/// Node record size: coordinate pair + node kind + id slot.
pub const NODE_RECORD_SIZE: usize = 52;

/// Customer point record size: id slot + coordinate pair.
pub const CUSTOMER_RECORD_SIZE: usize = 48;

/// One straight piece of a pipe's polyline geometry.
///
/// `pipe` is the index of the owning record in the pipe buffer, valid by
/// construction for any buffer the encoder produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentRecord {
    /// Index of the owning pipe in the pipe buffer.
    pub pipe: u32,
    /// Segment start, `[lng, lat]`.
    pub start: LngLat,
    /// Segment end, `[lng, lat]`.
    pub end: LngLat,
}

impl SegmentRecord {
    /// Serialize to bytes.
    pub fn to_bytes(&self) -> [u8; SEGMENT_RECORD_SIZE] {
        let mut buf = [0u8; SEGMENT_RECORD_SIZE];
        buf[0..4].copy_from_slice(&self.pipe.to_le_bytes());
        buf[4..12].copy_from_slice(&self.start[0].to_le_bytes());
        buf[12..20].copy_from_slice(&self.start[1].to_le_bytes());
        buf[20..28].copy_from_slice(&self.end[0].to_le_bytes());
        buf[28..36].copy_from_slice(&self.end[1].to_le_bytes());
        buf
    }

    /// Parse from bytes. Returns `None` if the slice is too short.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < SEGMENT_RECORD_SIZE {
            return None;
        }
        Some(Self {
            pipe: u32::from_le_bytes(data[0..4].try_into().unwrap()),
            start: [
                f64::from_le_bytes(data[4..12].try_into().unwrap()),
                f64::from_le_bytes(data[12..20].try_into().unwrap()),
            ],
            end: [
                f64::from_le_bytes(data[20..28].try_into().unwrap()),
                f64::from_le_bytes(data[28..36].try_into().unwrap()),
            ],
        })
    }
}

/// A pipe: id, diameter, and the indices of its endpoint nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeRecord {
    /// Id in its fixed slot, NUL-padded.
    pub id: [u8; ID_SLOT_SIZE],
    /// Diameter in millimeters.
    pub diameter: f64,
    /// Index of the start node in the node buffer.
    pub start_node: u32,
    /// Index of the end node in the node buffer.
    pub end_node: u32,
}

impl PipeRecord {
    pub fn to_bytes(&self) -> [u8; PIPE_RECORD_SIZE] {
        let mut buf = [0u8; PIPE_RECORD_SIZE];
        buf[0..32].copy_from_slice(&self.id);
        buf[32..40].copy_from_slice(&self.diameter.to_le_bytes());
        buf[40..44].copy_from_slice(&self.start_node.to_le_bytes());
        buf[44..48].copy_from_slice(&self.end_node.to_le_bytes());
        buf
    }

    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < PIPE_RECORD_SIZE {
            return None;
        }
        Some(Self {
            id: data[0..32].try_into().unwrap(),
            diameter: f64::from_le_bytes(data[32..40].try_into().unwrap()),
            start_node: u32::from_le_bytes(data[40..44].try_into().unwrap()),
            end_node: u32::from_le_bytes(data[44..48].try_into().unwrap()),
        })
    }
}

/// A node: coordinates, kind, and id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRecord {
    /// Node position, `[lng, lat]`.
    pub coordinates: LngLat,
    pub kind: NodeKind,
    /// Id in its fixed slot, NUL-padded.
    pub id: [u8; ID_SLOT_SIZE],
}

impl NodeRecord {
    pub fn to_bytes(&self) -> [u8; NODE_RECORD_SIZE] {
        let mut buf = [0u8; NODE_RECORD_SIZE];
        buf[0..8].copy_from_slice(&self.coordinates[0].to_le_bytes());
        buf[8..16].copy_from_slice(&self.coordinates[1].to_le_bytes());
        buf[16..20].copy_from_slice(&node_kind_code(self.kind).to_le_bytes());
        buf[20..52].copy_from_slice(&self.id);
        buf
    }

    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < NODE_RECORD_SIZE {
            return None;
        }
        let kind = node_kind_from_code(u32::from_le_bytes(data[16..20].try_into().unwrap()))?;
        Some(Self {
            coordinates: [
                f64::from_le_bytes(data[0..8].try_into().unwrap()),
                f64::from_le_bytes(data[8..16].try_into().unwrap()),
            ],
            kind,
            id: data[20..52].try_into().unwrap(),
        })
    }
}

/// A customer point: id and coordinates, everything the search needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomerRecord {
    /// Id in its fixed slot, NUL-padded.
    pub id: [u8; ID_SLOT_SIZE],
    /// Point position, `[lng, lat]`.
    pub coordinates: LngLat,
}

impl CustomerRecord {
    pub fn to_bytes(&self) -> [u8; CUSTOMER_RECORD_SIZE] {
        let mut buf = [0u8; CUSTOMER_RECORD_SIZE];
        buf[0..32].copy_from_slice(&self.id);
        buf[32..40].copy_from_slice(&self.coordinates[0].to_le_bytes());
        buf[40..48].copy_from_slice(&self.coordinates[1].to_le_bytes());
        buf
    }

    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < CUSTOMER_RECORD_SIZE {
            return None;
        }
        Some(Self {
            id: data[0..32].try_into().unwrap(),
            coordinates: [
                f64::from_le_bytes(data[32..40].try_into().unwrap()),
                f64::from_le_bytes(data[40..48].try_into().unwrap()),
            ],
        })
    }
}

fn node_kind_code(kind: NodeKind) -> u32 {
    match kind {
        NodeKind::Junction => 0,
        NodeKind::Reservoir => 1,
        NodeKind::Tank => 2,
    }
}

fn node_kind_from_code(code: u32) -> Option<NodeKind> {
    match code {
        0 => Some(NodeKind::Junction),
        1 => Some(NodeKind::Reservoir),
        2 => Some(NodeKind::Tank),
        _ => None,
    }
}

/// Pack an id string into its fixed slot.
///
/// Returns the slot and whether the id was truncated. Truncation lands on a
/// UTF-8 character boundary so the decoded id is always a valid string.
pub fn encode_id(id: &str) -> ([u8; ID_SLOT_SIZE], bool) {
    let mut slot = [0u8; ID_SLOT_SIZE];
    let bytes = id.as_bytes();
    if bytes.len() <= ID_SLOT_SIZE {
        slot[..bytes.len()].copy_from_slice(bytes);
        return (slot, false);
    }
    let mut end = ID_SLOT_SIZE;
    while !id.is_char_boundary(end) {
        end -= 1;
    }
    slot[..end].copy_from_slice(&bytes[..end]);
    (slot, true)
}

/// Unpack an id slot back into a string, dropping the NUL padding.
pub fn decode_id(slot: &[u8; ID_SLOT_SIZE]) -> String {
    let end = slot.iter().position(|&b| b == 0).unwrap_or(ID_SLOT_SIZE);
    String::from_utf8_lossy(&slot[..end]).into_owned()
}

/// Start a new record buffer with a zeroed header.
pub fn new_buffer() -> Vec<u8> {
    vec![0u8; BUFFER_HEADER_SIZE]
}

/// Write the record count into a buffer's header.
pub fn set_record_count(buffer: &mut [u8], count: u32) {
    buffer[0..4].copy_from_slice(&count.to_le_bytes());
}

/// Read the record count from a buffer's header.
pub fn record_count(buffer: &[u8]) -> usize {
    if buffer.len() < BUFFER_HEADER_SIZE {
        return 0;
    }
    u32::from_le_bytes(buffer[0..4].try_into().unwrap()) as usize
}

fn record_slice(buffer: &[u8], index: usize, size: usize) -> Option<&[u8]> {
    if index >= record_count(buffer) {
        return None;
    }
    let offset = BUFFER_HEADER_SIZE + index * size;
    buffer.get(offset..offset + size)
}

/// Decode the segment at `index`. Pure over `(buffer, index)`.
pub fn segment_at(buffer: &[u8], index: usize) -> Option<SegmentRecord> {
    SegmentRecord::from_bytes(record_slice(buffer, index, SEGMENT_RECORD_SIZE)?)
}

/// Decode the pipe at `index`. Pure over `(buffer, index)`.
pub fn pipe_at(buffer: &[u8], index: usize) -> Option<PipeRecord> {
    PipeRecord::from_bytes(record_slice(buffer, index, PIPE_RECORD_SIZE)?)
}

/// Decode the node at `index`. Pure over `(buffer, index)`.
pub fn node_at(buffer: &[u8], index: usize) -> Option<NodeRecord> {
    NodeRecord::from_bytes(record_slice(buffer, index, NODE_RECORD_SIZE)?)
}

/// Decode the customer point at `index`. Pure over `(buffer, index)`.
pub fn customer_at(buffer: &[u8], index: usize) -> Option<CustomerRecord> {
    CustomerRecord::from_bytes(record_slice(buffer, index, CUSTOMER_RECORD_SIZE)?)
}
