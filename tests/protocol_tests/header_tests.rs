//! Header Codec Tests
//!
//! Tests for the 24-byte header layout, magic validation and the
//! extras/key/value length arithmetic.

use memcwire::error::McError;
use memcwire::protocol::{
    decode_request_header, decode_response_header, encode_request, encode_response, Header,
    Magic, Opcode, Request, Response, Status, HEADER_LEN,
};

const MAX: u32 = 1_000_000;

// =============================================================================
// Helper Functions
// =============================================================================

fn header_bytes(packet: &[u8]) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    header.copy_from_slice(&packet[..HEADER_LEN]);
    header
}

/// Raw header with arbitrary lengths, bypassing the encoder
fn raw_header(magic: u8, key_len: u16, extras_len: u8, total: u32) -> [u8; HEADER_LEN] {
    let mut h = [0u8; HEADER_LEN];
    h[0] = magic;
    h[2..4].copy_from_slice(&key_len.to_be_bytes());
    h[4] = extras_len;
    h[8..12].copy_from_slice(&total.to_be_bytes());
    h
}

fn sample_request() -> Request {
    Request::new(Opcode::SET)
        .with_vbucket(0x0102)
        .with_opaque(0xdeadbeef)
        .with_cas(0x0102030405060708)
        .with_extras(vec![0xaa; 8])
        .with_key(b"hello".to_vec())
        .with_body(b"world!".to_vec())
}

// =============================================================================
// Layout Tests
// =============================================================================

#[test]
fn test_request_header_layout() {
    let packet = encode_request(&sample_request()).unwrap();
    let h = header_bytes(&packet);

    assert_eq!(h[0], 0x80);
    assert_eq!(h[1], 0x01);
    assert_eq!(&h[2..4], &[0x00, 0x05]);
    assert_eq!(h[4], 8);
    assert_eq!(h[5], 0);
    assert_eq!(&h[6..8], &[0x01, 0x02]);
    assert_eq!(&h[8..12], &19u32.to_be_bytes());
    assert_eq!(&h[12..16], &[0xde, 0xad, 0xbe, 0xef]);
    assert_eq!(&h[16..24], &[1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(packet.len(), HEADER_LEN + 19);
    assert_eq!(&packet[24..32], &[0xaa; 8]);
    assert_eq!(&packet[32..37], b"hello");
    assert_eq!(&packet[37..], b"world!");
}

#[test]
fn test_response_header_layout() {
    let res = Response::new(Status::KEY_ENOENT)
        .with_opcode(Opcode::GET)
        .with_opaque(7)
        .with_body(b"Not found".to_vec());
    let h = header_bytes(&encode_response(&res).unwrap());

    assert_eq!(h[0], 0x81);
    assert_eq!(h[1], 0x00);
    assert_eq!(&h[6..8], &[0x00, 0x01]);
    assert_eq!(&h[8..12], &9u32.to_be_bytes());
    assert_eq!(&h[12..16], &7u32.to_be_bytes());
}

#[test]
fn test_total_length_recomputed_from_buffers() {
    let mut req = sample_request();
    req.body = b"a much longer value than before".to_vec();

    let header = Header::for_request(&req).unwrap();
    assert_eq!(header.total_body_len as usize, req.body_len());
    assert_eq!(header.total_body_len, 8 + 5 + 31);
}

// =============================================================================
// Decode Tests
// =============================================================================

#[test]
fn test_decode_request_header() {
    let req = sample_request();
    let h = header_bytes(&encode_request(&req).unwrap());

    let decoded = decode_request_header(&h, MAX).unwrap();
    assert_eq!(decoded.opcode, Opcode::SET);
    assert_eq!(decoded.vbucket, 0x0102);
    assert_eq!(decoded.opaque, 0xdeadbeef);
    assert_eq!(decoded.cas, 0x0102030405060708);
    assert_eq!(decoded.extras.len(), 8);
    assert_eq!(decoded.key.len(), 5);
    assert_eq!(decoded.body.len(), 6);
}

#[test]
fn test_decode_response_header() {
    let res = Response::new(Status::KEY_EEXISTS)
        .with_opcode(Opcode::ADD)
        .with_opaque(99)
        .with_cas(42)
        .with_key(b"k".to_vec())
        .with_body(b"exists".to_vec());
    let h = header_bytes(&encode_response(&res).unwrap());

    let decoded = decode_response_header(&h, MAX).unwrap();
    assert_eq!(decoded.opcode, Opcode::ADD);
    assert_eq!(decoded.status, Status::KEY_EEXISTS);
    assert_eq!(decoded.opaque, 99);
    assert_eq!(decoded.cas, 42);
    assert!(decoded.extras.is_empty());
    assert_eq!(decoded.key.len(), 1);
    assert_eq!(decoded.body.len(), 6);
    assert!(!decoded.fatal);
}

#[test]
fn test_header_decode_roundtrip() {
    let req = sample_request();
    let header = Header::for_request(&req).unwrap();
    let decoded = Header::decode(&header.encode(), Magic::Request).unwrap();
    assert_eq!(decoded, header);
}

#[test]
fn test_direction_specific_field() {
    let req_header = Header::for_request(&sample_request()).unwrap();
    assert_eq!(req_header.vbucket(), Some(0x0102));
    assert_eq!(req_header.status(), None);

    let res_header = Header::for_response(&Response::new(Status::E2BIG)).unwrap();
    assert_eq!(res_header.status(), Some(Status::E2BIG));
    assert_eq!(res_header.vbucket(), None);
}

#[test]
fn test_decoded_lengths_match_total() {
    let h = raw_header(0x80, 10, 4, 100);
    let req = decode_request_header(&h, MAX).unwrap();
    assert_eq!(req.extras.len() + req.key.len() + req.body.len(), 100);
    assert_eq!(req.body.len(), 86);
}

// =============================================================================
// Magic Tests
// =============================================================================

#[test]
fn test_request_decode_rejects_response_magic() {
    let h = raw_header(0x81, 0, 0, 0);
    match decode_request_header(&h, MAX) {
        Err(McError::MagicMismatch { expected, found }) => {
            assert_eq!(expected, 0x80);
            assert_eq!(found, 0x81);
        }
        other => panic!("Expected MagicMismatch, got {:?}", other),
    }
}

#[test]
fn test_response_decode_rejects_other_magic() {
    for magic in [0x00u8, 0x80, 0x7f, 0xff] {
        let h = raw_header(magic, 0, 0, 0);
        match decode_response_header(&h, MAX) {
            Err(McError::MagicMismatch { found, .. }) => assert_eq!(found, magic),
            other => panic!("Expected MagicMismatch for 0x{:02x}, got {:?}", magic, other),
        }
    }
}

// =============================================================================
// Length Validation Tests
// =============================================================================

#[test]
fn test_total_smaller_than_key_and_extras_is_malformed() {
    let h = raw_header(0x80, 10, 8, 12);
    match decode_request_header(&h, MAX) {
        Err(McError::MalformedLength { total, key, extras }) => {
            assert_eq!((total, key, extras), (12, 10, 8));
        }
        other => panic!("Expected MalformedLength, got {:?}", other),
    }
}

#[test]
fn test_body_exactly_at_max_is_accepted() {
    let h = raw_header(0x80, 3, 0, 3 + 64);
    let req = decode_request_header(&h, 64).unwrap();
    assert_eq!(req.body.len(), 64);
}

#[test]
fn test_body_over_max_is_rejected() {
    let h = raw_header(0x80, 3, 0, 3 + 65);
    match decode_request_header(&h, 64) {
        Err(McError::OversizedBody { len, max }) => {
            assert_eq!(len, 65);
            assert_eq!(max, 64);
        }
        other => panic!("Expected OversizedBody, got {:?}", other),
    }
}

#[test]
fn test_huge_declared_body_is_rejected_without_allocation() {
    let h = raw_header(0x81, 0, 0, u32::MAX);
    assert!(matches!(
        decode_response_header(&h, MAX),
        Err(McError::OversizedBody { len: u32::MAX, .. })
    ));
}

#[test]
fn test_encode_rejects_oversized_extras() {
    let req = Request::new(Opcode::SET).with_extras(vec![0u8; 256]);
    match encode_request(&req) {
        Err(McError::FieldTooLarge { field, len, max }) => {
            assert_eq!(field, "extras");
            assert_eq!(len, 256);
            assert_eq!(max, 255);
        }
        other => panic!("Expected FieldTooLarge, got {:?}", other),
    }
}

#[test]
fn test_encode_rejects_oversized_key() {
    let req = Request::new(Opcode::GET).with_key(vec![b'k'; 65536]);
    assert!(matches!(
        encode_request(&req),
        Err(McError::FieldTooLarge { field: "key", .. })
    ));
}

#[test]
fn test_encode_accepts_maximum_key_and_extras() {
    let req = Request::new(Opcode::GET)
        .with_extras(vec![1u8; 255])
        .with_key(vec![b'k'; 65535]);
    let header = Header::for_request(&req).unwrap();
    assert_eq!(header.extras_len, 255);
    assert_eq!(header.key_len, 65535);
}

// =============================================================================
// Vocabulary Tests
// =============================================================================

#[test]
fn test_opcode_names() {
    assert_eq!(Opcode::STAT.name(), Some("STAT"));
    assert_eq!(Opcode(0x10), Opcode::STAT);
    assert_eq!(Opcode(0xee).name(), None);
    assert_eq!(format!("{:?}", Opcode(0xee)), "Opcode(0xee)");
    assert_eq!(format!("{}", Opcode::GETK), "GETK");
}

#[test]
fn test_unknown_opcode_passes_through() {
    let req = Request::new(Opcode(0xee));
    let h = header_bytes(&encode_request(&req).unwrap());
    assert_eq!(decode_request_header(&h, MAX).unwrap().opcode, Opcode(0xee));
}

#[test]
fn test_status_helpers() {
    assert!(Status::SUCCESS.is_success());
    assert!(!Status::KEY_ENOENT.is_success());
    assert_eq!(format!("{}", Status::NOT_STORED), "NOT_STORED");
    assert_eq!(format!("{:?}", Status(0x1234)), "Status(0x1234)");
}
