//! Tests for the fixed binary record formats
//!
//! These pin down the byte layouts the worker threads rely on: little-endian
//! fields, fixed offsets, 8-byte count headers, and 32-byte id slots.

use demandalloc::format::{
    customer_at, decode_id, encode_id, new_buffer, node_at, pipe_at, record_count, segment_at,
    set_record_count, CustomerRecord, NodeRecord, PipeRecord, SegmentRecord, BUFFER_HEADER_SIZE,
    CUSTOMER_RECORD_SIZE, ID_SLOT_SIZE, NODE_RECORD_SIZE, PIPE_RECORD_SIZE, SEGMENT_RECORD_SIZE,
};
use demandalloc::NodeKind;

#[test]
fn test_layout_constants() {
    assert_eq!(BUFFER_HEADER_SIZE, 8);
    assert_eq!(ID_SLOT_SIZE, 32);
    assert_eq!(SEGMENT_RECORD_SIZE, 36);
    assert_eq!(PIPE_RECORD_SIZE, 48);
    assert_eq!(NODE_RECORD_SIZE, 52);
    assert_eq!(CUSTOMER_RECORD_SIZE, 48);
}

#[test]
fn test_segment_byte_offsets() {
    let record = SegmentRecord {
        pipe: 0x01020304,
        start: [1.0, 2.0],
        end: [3.0, 4.0],
    };
    let bytes = record.to_bytes();

    assert_eq!(&bytes[0..4], &0x01020304u32.to_le_bytes());
    assert_eq!(&bytes[4..12], &1.0f64.to_le_bytes());
    assert_eq!(&bytes[12..20], &2.0f64.to_le_bytes());
    assert_eq!(&bytes[20..28], &3.0f64.to_le_bytes());
    assert_eq!(&bytes[28..36], &4.0f64.to_le_bytes());
}

#[test]
fn test_pipe_byte_offsets() {
    let (id, _) = encode_id("main-7");
    let record = PipeRecord {
        id,
        diameter: 250.0,
        start_node: 5,
        end_node: 9,
    };
    let bytes = record.to_bytes();

    assert_eq!(&bytes[0..6], b"main-7");
    assert_eq!(bytes[6], 0); // NUL padding
    assert_eq!(&bytes[32..40], &250.0f64.to_le_bytes());
    assert_eq!(&bytes[40..44], &5u32.to_le_bytes());
    assert_eq!(&bytes[44..48], &9u32.to_le_bytes());
}

#[test]
fn test_node_kind_codes() {
    for (kind, code) in [
        (NodeKind::Junction, 0u32),
        (NodeKind::Reservoir, 1u32),
        (NodeKind::Tank, 2u32),
    ] {
        let (id, _) = encode_id("n");
        let record = NodeRecord {
            coordinates: [0.0, 0.0],
            kind,
            id,
        };
        let bytes = record.to_bytes();
        assert_eq!(&bytes[16..20], &code.to_le_bytes());
        assert_eq!(NodeRecord::from_bytes(&bytes).unwrap().kind, kind);
    }
}

#[test]
fn test_full_buffer_walk() {
    // Simulate an encoded customer point buffer and read it back.
    let points = [
        ("cp-1", [-71.06, 42.35]),
        ("cp-2", [-71.05, 42.36]),
        ("cp-3", [-71.04, 42.37]),
    ];

    let mut buffer = new_buffer();
    for (id, coordinates) in &points {
        let (slot, _) = encode_id(id);
        buffer.extend_from_slice(
            &CustomerRecord {
                id: slot,
                coordinates: *coordinates,
            }
            .to_bytes(),
        );
    }
    set_record_count(&mut buffer, points.len() as u32);

    assert_eq!(
        buffer.len(),
        BUFFER_HEADER_SIZE + points.len() * CUSTOMER_RECORD_SIZE
    );
    assert_eq!(record_count(&buffer), 3);

    for (i, (id, coordinates)) in points.iter().enumerate() {
        let record = customer_at(&buffer, i).unwrap();
        assert_eq!(decode_id(&record.id), *id);
        assert_eq!(record.coordinates, *coordinates);
    }
    assert!(customer_at(&buffer, 3).is_none());
}

#[test]
fn test_accessors_reject_out_of_range() {
    let buffer = new_buffer();
    assert!(segment_at(&buffer, 0).is_none());
    assert!(pipe_at(&buffer, 0).is_none());
    assert!(node_at(&buffer, 0).is_none());
    assert!(customer_at(&buffer, 0).is_none());
}

#[test]
fn test_count_header_bounds_reads() {
    // A buffer with room for two records but a declared count of one only
    // exposes the first record.
    let (id, _) = encode_id("cp");
    let record = CustomerRecord {
        id,
        coordinates: [0.0, 0.0],
    };
    let mut buffer = new_buffer();
    buffer.extend_from_slice(&record.to_bytes());
    buffer.extend_from_slice(&record.to_bytes());
    set_record_count(&mut buffer, 1);

    assert!(customer_at(&buffer, 0).is_some());
    assert!(customer_at(&buffer, 1).is_none());
}
