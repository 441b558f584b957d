//! Protocol Module
//!
//! The memcached binary protocol framing, shared by client and server.
//!
//! ## Packet Format
//! ```text
//! ┌──────────────────┬──────────┬──────────┬──────────────┐
//! │   Header (24)    │  Extras  │   Key    │    Value     │
//! └──────────────────┴──────────┴──────────┴──────────────┘
//! ```
//!
//! ### Magic
//! - 0x80: request
//! - 0x81: response
//!
//! ### Invariant
//! `total body length == extras + key + value`. Encoding always derives it
//! from the buffers; decoding derives the value length by subtraction.

mod opcode;
mod status;
mod packet;
mod codec;
mod frame;
mod transmit;

pub use opcode::Opcode;
pub use status::Status;
pub use packet::{Request, Response};
pub use codec::{
    decode_request_header, decode_response_header, encode_request, encode_response, Header,
    Magic, HEADER_LEN,
};
pub use frame::{read_frame, read_header, read_request, read_response};
pub use transmit::{write_request, write_response};
