//! Header codec
//!
//! Pure encoding and decoding of the fixed 24-byte packet header. No I/O
//! happens here; see `frame` and `transmit` for the stream side.
//!
//! ## Wire Format (all integers big-endian)
//! ```text
//! ┌────────┬────────┬──────────────┬────────────┬──────────┬─────────────────┐
//! │Magic(1)│Opcode(1)│ Key len (2) │ Extras (1) │ Rsvd (1) │ VBucket/Status  │
//! ├────────┴────────┴──────────────┴────────────┴──────────┴─────────────────┤
//! │ Total body length (4) = extras + key + value                             │
//! ├──────────────────────────────────────────────────────────────────────────┤
//! │ Opaque (4)                                                               │
//! ├──────────────────────────────────────────────────────────────────────────┤
//! │ CAS (8)                                                                  │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```

use bytes::{Buf, BufMut};

use super::{Opcode, Request, Response, Status};
use crate::error::{McError, Result};

/// Fixed header size for both directions
pub const HEADER_LEN: usize = 24;

/// First header byte; tells requests and responses apart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Magic {
    Request = 0x80,
    Response = 0x81,
}

/// A decoded packet header
///
/// Bytes 6-7 mean different things per direction, so they are only
/// reachable through [`Header::vbucket`] and [`Header::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub magic: Magic,
    pub opcode: Opcode,
    pub key_len: u16,
    pub extras_len: u8,
    vbucket_or_status: u16,
    pub total_body_len: u32,
    pub opaque: u32,
    pub cas: u64,
}

impl Header {
    /// Build the header for a request; lengths come from the actual buffers
    pub fn for_request(req: &Request) -> Result<Self> {
        let (extras_len, key_len, total_body_len) =
            section_lengths(&req.extras, &req.key, &req.body)?;
        Ok(Self {
            magic: Magic::Request,
            opcode: req.opcode,
            key_len,
            extras_len,
            vbucket_or_status: req.vbucket,
            total_body_len,
            opaque: req.opaque,
            cas: req.cas,
        })
    }

    /// Build the header for a response; lengths come from the actual buffers
    pub fn for_response(res: &Response) -> Result<Self> {
        let (extras_len, key_len, total_body_len) =
            section_lengths(&res.extras, &res.key, &res.body)?;
        Ok(Self {
            magic: Magic::Response,
            opcode: res.opcode,
            key_len,
            extras_len,
            vbucket_or_status: res.status.0,
            total_body_len,
            opaque: res.opaque,
            cas: res.cas,
        })
    }

    /// VBucket id, present on request headers only
    pub fn vbucket(&self) -> Option<u16> {
        match self.magic {
            Magic::Request => Some(self.vbucket_or_status),
            Magic::Response => None,
        }
    }

    /// Status code, present on response headers only
    pub fn status(&self) -> Option<Status> {
        match self.magic {
            Magic::Request => None,
            Magic::Response => Some(Status(self.vbucket_or_status)),
        }
    }

    /// Value length implied by the header
    ///
    /// Fails when the declared total is smaller than key + extras.
    pub fn value_len(&self) -> Result<u32> {
        self.total_body_len
            .checked_sub(self.key_len as u32)
            .and_then(|rest| rest.checked_sub(self.extras_len as u32))
            .ok_or(McError::MalformedLength {
                total: self.total_body_len,
                key: self.key_len,
                extras: self.extras_len,
            })
    }

    /// Encode to the 24-byte wire form
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        let mut out = &mut bytes[..];
        out.put_u8(self.magic as u8);
        out.put_u8(self.opcode.0);
        out.put_u16(self.key_len);
        out.put_u8(self.extras_len);
        out.put_u8(0);
        out.put_u16(self.vbucket_or_status);
        out.put_u32(self.total_body_len);
        out.put_u32(self.opaque);
        out.put_u64(self.cas);
        bytes
    }

    /// Decode a 24-byte header, checking the magic byte first
    pub fn decode(bytes: &[u8; HEADER_LEN], expected: Magic) -> Result<Self> {
        let mut buf = &bytes[..];

        let found = buf.get_u8();
        if found != expected as u8 {
            return Err(McError::MagicMismatch {
                expected: expected as u8,
                found,
            });
        }

        let opcode = Opcode(buf.get_u8());
        let key_len = buf.get_u16();
        let extras_len = buf.get_u8();
        buf.advance(1); // reserved
        let vbucket_or_status = buf.get_u16();
        let total_body_len = buf.get_u32();
        let opaque = buf.get_u32();
        let cas = buf.get_u64();

        Ok(Self {
            magic: expected,
            opcode,
            key_len,
            extras_len,
            vbucket_or_status,
            total_body_len,
            opaque,
            cas,
        })
    }
}

/// Check that each section fits its header field
fn section_lengths(extras: &[u8], key: &[u8], body: &[u8]) -> Result<(u8, u16, u32)> {
    let extras_len = u8::try_from(extras.len()).map_err(|_| McError::FieldTooLarge {
        field: "extras",
        len: extras.len(),
        max: u8::MAX as usize,
    })?;
    let key_len = u16::try_from(key.len()).map_err(|_| McError::FieldTooLarge {
        field: "key",
        len: key.len(),
        max: u16::MAX as usize,
    })?;
    let total = extras.len() + key.len() + body.len();
    let total_body_len = u32::try_from(total).map_err(|_| McError::FieldTooLarge {
        field: "body",
        len: total,
        max: u32::MAX as usize,
    })?;
    Ok((extras_len, key_len, total_body_len))
}

/// Validate the value length against `max_body_len`
///
/// Runs before any buffer is allocated.
fn checked_value_len(header: &Header, max_body_len: u32) -> Result<usize> {
    let value_len = header.value_len()?;
    if value_len > max_body_len {
        return Err(McError::OversizedBody {
            len: value_len,
            max: max_body_len,
        });
    }
    Ok(value_len as usize)
}

// =============================================================================
// Header -> packet skeletons
// =============================================================================

/// Decode a request header into a `Request` with zeroed, exactly-sized buffers
pub fn decode_request_header(bytes: &[u8; HEADER_LEN], max_body_len: u32) -> Result<Request> {
    let header = Header::decode(bytes, Magic::Request)?;
    let value_len = checked_value_len(&header, max_body_len)?;

    Ok(Request {
        opcode: header.opcode,
        vbucket: header.vbucket_or_status,
        opaque: header.opaque,
        cas: header.cas,
        extras: vec![0u8; header.extras_len as usize],
        key: vec![0u8; header.key_len as usize],
        body: vec![0u8; value_len],
    })
}

/// Decode a response header into a `Response` with zeroed, exactly-sized buffers
pub fn decode_response_header(bytes: &[u8; HEADER_LEN], max_body_len: u32) -> Result<Response> {
    let header = Header::decode(bytes, Magic::Response)?;
    let value_len = checked_value_len(&header, max_body_len)?;

    Ok(Response {
        opcode: header.opcode,
        status: Status(header.vbucket_or_status),
        opaque: header.opaque,
        cas: header.cas,
        extras: vec![0u8; header.extras_len as usize],
        key: vec![0u8; header.key_len as usize],
        body: vec![0u8; value_len],
        fatal: false,
    })
}

// =============================================================================
// Whole-packet encoding
// =============================================================================

/// Encode a request header plus its sections into one buffer
pub fn encode_request(req: &Request) -> Result<Vec<u8>> {
    let header = Header::for_request(req)?;
    Ok(assemble(&header, &req.extras, &req.key, &req.body))
}

/// Encode a response header plus its sections into one buffer
pub fn encode_response(res: &Response) -> Result<Vec<u8>> {
    let header = Header::for_response(res)?;
    Ok(assemble(&header, &res.extras, &res.key, &res.body))
}

fn assemble(header: &Header, extras: &[u8], key: &[u8], body: &[u8]) -> Vec<u8> {
    let mut packet = Vec::with_capacity(HEADER_LEN + header.total_body_len as usize);
    packet.put_slice(&header.encode());
    packet.put_slice(extras);
    packet.put_slice(key);
    packet.put_slice(body);
    packet
}
