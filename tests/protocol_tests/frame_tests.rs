//! Frame Reader and Transmitter Tests
//!
//! Tests for reading packets from streams and writing them back out.

use std::io::{self, Cursor, Read, Write};

use memcwire::error::McError;
use memcwire::protocol::{
    encode_request, encode_response, read_frame, read_header, read_request, read_response,
    write_request, write_response, Opcode, Request, Response, Status, HEADER_LEN,
};

const MAX: u32 = 1_000_000;

// =============================================================================
// Helper Types
// =============================================================================

/// Writer that records each write call and flush separately
#[derive(Default)]
struct RecordingWriter {
    chunks: Vec<Vec<u8>>,
    flushes: usize,
}

impl RecordingWriter {
    fn bytes(&self) -> Vec<u8> {
        self.chunks.concat()
    }
}

impl Write for RecordingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.chunks.push(buf.to_vec());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

/// Reader that hands out one byte per call
struct TrickleReader(Cursor<Vec<u8>>);

impl Read for TrickleReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len().min(1);
        self.0.read(&mut buf[..len])
    }
}

/// Writer that refuses everything
struct BrokenWriter;

impl Write for BrokenWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn sample_request() -> Request {
    Request::new(Opcode::SET)
        .with_vbucket(3)
        .with_opaque(1234)
        .with_extras(vec![0, 0, 0, 1, 0, 0, 0, 0])
        .with_key(b"key".to_vec())
        .with_body(b"value".to_vec())
}

// =============================================================================
// Read Tests
// =============================================================================

#[test]
fn test_read_request() {
    let req = sample_request();
    let mut cursor = Cursor::new(encode_request(&req).unwrap());

    let decoded = read_request(&mut cursor, MAX).unwrap();
    assert_eq!(decoded, req);
    assert_eq!(cursor.position() as usize, HEADER_LEN + req.body_len());
}

#[test]
fn test_read_response() {
    let res = Response::new(Status::SUCCESS)
        .with_opcode(Opcode::GET)
        .with_opaque(5)
        .with_cas(77)
        .with_extras(vec![0, 0, 0, 9])
        .with_body(b"payload".to_vec());
    let mut cursor = Cursor::new(encode_response(&res).unwrap());

    let decoded = read_response(&mut cursor, MAX).unwrap();
    assert_eq!(decoded, res);
}

#[test]
fn test_read_two_packets_back_to_back() {
    let first = sample_request();
    let second = Request::new(Opcode::GET).with_key(b"other".to_vec());
    let mut bytes = encode_request(&first).unwrap();
    bytes.extend(encode_request(&second).unwrap());
    let mut cursor = Cursor::new(bytes);

    assert_eq!(read_request(&mut cursor, MAX).unwrap(), first);
    assert_eq!(read_request(&mut cursor, MAX).unwrap(), second);
    assert!(matches!(
        read_request(&mut cursor, MAX),
        Err(McError::ConnectionClosed)
    ));
}

#[test]
fn test_read_from_trickling_stream() {
    let req = sample_request();
    let mut reader = TrickleReader(Cursor::new(encode_request(&req).unwrap()));
    assert_eq!(read_request(&mut reader, MAX).unwrap(), req);
}

#[test]
fn test_read_frame_fills_sections_in_order() {
    let mut cursor = Cursor::new(b"EEKKKVVVV".to_vec());
    let mut extras = [0u8; 2];
    let mut key = [0u8; 3];
    let mut body = [0u8; 4];

    read_frame(&mut cursor, &mut extras, &mut key, &mut body).unwrap();
    assert_eq!(&extras, b"EE");
    assert_eq!(&key, b"KKK");
    assert_eq!(&body, b"VVVV");
}

#[test]
fn test_bad_magic_stops_after_header() {
    let res = Response::success().with_body(b"trailing".to_vec());
    let mut cursor = Cursor::new(encode_response(&res).unwrap());

    match read_request(&mut cursor, MAX) {
        Err(McError::MagicMismatch { found, .. }) => assert_eq!(found, 0x81),
        other => panic!("Expected MagicMismatch, got {:?}", other),
    }
    assert_eq!(cursor.position() as usize, HEADER_LEN);
}

#[test]
fn test_oversized_body_stops_after_header() {
    let req = Request::new(Opcode::SET).with_body(vec![7u8; 100]);
    let mut cursor = Cursor::new(encode_request(&req).unwrap());

    assert!(matches!(
        read_request(&mut cursor, 99),
        Err(McError::OversizedBody { len: 100, max: 99 })
    ));
    assert_eq!(cursor.position() as usize, HEADER_LEN);
}

#[test]
fn test_body_at_max_is_read() {
    let req = Request::new(Opcode::SET).with_body(vec![7u8; 100]);
    let mut cursor = Cursor::new(encode_request(&req).unwrap());
    assert_eq!(read_request(&mut cursor, 100).unwrap().body.len(), 100);
}

// =============================================================================
// Short Read Tests
// =============================================================================

#[test]
fn test_empty_stream_is_connection_closed() {
    let mut cursor = Cursor::new(Vec::new());
    assert!(matches!(
        read_header(&mut cursor),
        Err(McError::ConnectionClosed)
    ));
}

#[test]
fn test_partial_header_is_incomplete() {
    let mut cursor = Cursor::new(vec![0x80; 10]);
    match read_header(&mut cursor) {
        Err(McError::IncompleteFrame {
            section,
            expected,
            read,
        }) => {
            assert_eq!(section, "header");
            assert_eq!(expected, HEADER_LEN);
            assert_eq!(read, 10);
        }
        other => panic!("Expected IncompleteFrame, got {:?}", other),
    }
}

#[test]
fn test_truncated_key_is_incomplete() {
    let req = sample_request();
    let mut bytes = encode_request(&req).unwrap();
    // header + extras + 1 byte of the key
    bytes.truncate(HEADER_LEN + 8 + 1);
    let mut cursor = Cursor::new(bytes);

    match read_request(&mut cursor, MAX) {
        Err(McError::IncompleteFrame {
            section,
            expected,
            read,
        }) => {
            assert_eq!(section, "key");
            assert_eq!(expected, 3);
            assert_eq!(read, 1);
        }
        other => panic!("Expected IncompleteFrame, got {:?}", other),
    }
}

#[test]
fn test_truncated_value_is_incomplete() {
    let mut bytes = encode_request(&sample_request()).unwrap();
    bytes.pop();
    let mut cursor = Cursor::new(bytes);

    assert!(matches!(
        read_request(&mut cursor, MAX),
        Err(McError::IncompleteFrame { section: "value", expected: 5, read: 4 })
    ));
}

// =============================================================================
// Write Tests
// =============================================================================

#[test]
fn test_write_request_matches_encoding() {
    let req = sample_request();
    let mut writer = RecordingWriter::default();

    write_request(&mut writer, &req).unwrap();
    assert_eq!(writer.bytes(), encode_request(&req).unwrap());
    assert_eq!(writer.flushes, 1);
}

#[test]
fn test_write_skips_empty_sections() {
    let req = Request::new(Opcode::GET).with_key(b"k".to_vec());
    let mut writer = RecordingWriter::default();

    write_request(&mut writer, &req).unwrap();
    // header and key only
    assert_eq!(writer.chunks.len(), 2);
    assert_eq!(writer.chunks[0].len(), HEADER_LEN);
    assert_eq!(writer.chunks[1], b"k");
}

#[test]
fn test_write_response_all_sections() {
    let res = Response::success()
        .with_extras(vec![1, 2, 3, 4])
        .with_key(b"key".to_vec())
        .with_body(b"body".to_vec());
    let mut writer = RecordingWriter::default();

    write_response(&mut writer, &res).unwrap();
    assert_eq!(writer.chunks.len(), 4);
    assert_eq!(writer.flushes, 1);

    let decoded = read_response(&mut Cursor::new(writer.bytes()), MAX).unwrap();
    assert_eq!(decoded, res);
}

#[test]
fn test_write_failure_is_transport_error() {
    let err = write_request(&mut BrokenWriter, &sample_request()).unwrap_err();
    match err {
        McError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("Expected Io error, got {:?}", other),
    }
}

#[test]
fn test_write_into_full_buffer_is_transport_error() {
    let mut buf = [0u8; 10];
    let mut out = &mut buf[..];
    let err = write_request(&mut out, &sample_request()).unwrap_err();
    match err {
        McError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::WriteZero),
        other => panic!("Expected Io error, got {:?}", other),
    }
}
