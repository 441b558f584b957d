//! Frame reader
//!
//! Reads one packet from a blocking stream: the 24-byte header, then the
//! extras, key and value sections in wire order.

use std::io::{ErrorKind, Read};

use super::codec::{decode_request_header, decode_response_header, HEADER_LEN};
use super::{Request, Response};
use crate::error::{McError, Result};

/// Read into `buf` until it is full or the stream ends
///
/// Returns the number of bytes read; less than `buf.len()` means EOF.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut read = 0;
    while read < buf.len() {
        match reader.read(&mut buf[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(read)
}

fn read_section<R: Read>(reader: &mut R, buf: &mut [u8], section: &'static str) -> Result<()> {
    let read = fill(reader, buf)?;
    if read < buf.len() {
        return Err(McError::IncompleteFrame {
            section,
            expected: buf.len(),
            read,
        });
    }
    Ok(())
}

/// Read a raw header
///
/// A stream that ends before the first byte yields `ConnectionClosed`;
/// one that ends inside the header yields `IncompleteFrame`.
pub fn read_header<R: Read>(reader: &mut R) -> Result<[u8; HEADER_LEN]> {
    let mut header = [0u8; HEADER_LEN];
    match fill(reader, &mut header)? {
        0 => Err(McError::ConnectionClosed),
        HEADER_LEN => Ok(header),
        read => Err(McError::IncompleteFrame {
            section: "header",
            expected: HEADER_LEN,
            read,
        }),
    }
}

/// Fill pre-sized section buffers: extras, then key, then value
pub fn read_frame<R: Read>(
    reader: &mut R,
    extras: &mut [u8],
    key: &mut [u8],
    body: &mut [u8],
) -> Result<()> {
    read_section(reader, extras, "extras")?;
    read_section(reader, key, "key")?;
    read_section(reader, body, "value")?;
    Ok(())
}

/// Read a complete request packet
///
/// Blocks until a full packet is received or an error occurs. Nothing past
/// the header is read when the header itself is rejected.
pub fn read_request<R: Read>(reader: &mut R, max_body_len: u32) -> Result<Request> {
    let header = read_header(reader)?;
    let mut req = decode_request_header(&header, max_body_len)?;
    read_frame(reader, &mut req.extras, &mut req.key, &mut req.body)?;
    Ok(req)
}

/// Read a complete response packet
pub fn read_response<R: Read>(reader: &mut R, max_body_len: u32) -> Result<Response> {
    let header = read_header(reader)?;
    let mut res = decode_response_header(&header, max_body_len)?;
    read_frame(reader, &mut res.extras, &mut res.key, &mut res.body)?;
    Ok(res)
}
