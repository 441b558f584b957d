//! Packet transmitter
//!
//! Writes header and sections to a stream and flushes once per packet.
//! Any failed or short write is returned as-is and never retried.

use std::io::Write;

use super::codec::{Header, HEADER_LEN};
use super::{Request, Response};
use crate::error::Result;

fn write_packet<W: Write>(
    writer: &mut W,
    header: &[u8; HEADER_LEN],
    extras: &[u8],
    key: &[u8],
    body: &[u8],
) -> Result<()> {
    writer.write_all(header)?;
    for section in [extras, key, body] {
        if !section.is_empty() {
            writer.write_all(section)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write a request packet to a stream
pub fn write_request<W: Write>(writer: &mut W, req: &Request) -> Result<()> {
    let header = Header::for_request(req)?.encode();
    write_packet(writer, &header, &req.extras, &req.key, &req.body)
}

/// Write a response packet to a stream
pub fn write_response<W: Write>(writer: &mut W, res: &Response) -> Result<()> {
    let header = Header::for_response(res)?.encode();
    write_packet(writer, &header, &res.extras, &res.key, &res.body)
}
