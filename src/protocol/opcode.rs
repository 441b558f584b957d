//! Opcode definitions
//!
//! Command identifiers carried in byte 1 of every header.

use std::fmt;

/// A command identifier
///
/// Kept as a newtype rather than a closed enum: the codec passes unknown
/// opcodes through untouched and leaves their meaning to the handler.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Opcode(pub u8);

impl Opcode {
    pub const GET: Opcode = Opcode(0x00);
    pub const SET: Opcode = Opcode(0x01);
    pub const ADD: Opcode = Opcode(0x02);
    pub const REPLACE: Opcode = Opcode(0x03);
    pub const DELETE: Opcode = Opcode(0x04);
    pub const INCREMENT: Opcode = Opcode(0x05);
    pub const DECREMENT: Opcode = Opcode(0x06);
    pub const QUIT: Opcode = Opcode(0x07);
    pub const FLUSH: Opcode = Opcode(0x08);
    pub const GETQ: Opcode = Opcode(0x09);
    pub const NOOP: Opcode = Opcode(0x0a);
    pub const VERSION: Opcode = Opcode(0x0b);
    pub const GETK: Opcode = Opcode(0x0c);
    pub const GETKQ: Opcode = Opcode(0x0d);
    pub const APPEND: Opcode = Opcode(0x0e);
    pub const PREPEND: Opcode = Opcode(0x0f);
    pub const STAT: Opcode = Opcode(0x10);
    pub const SETQ: Opcode = Opcode(0x11);
    pub const ADDQ: Opcode = Opcode(0x12);
    pub const REPLACEQ: Opcode = Opcode(0x13);
    pub const DELETEQ: Opcode = Opcode(0x14);
    pub const INCREMENTQ: Opcode = Opcode(0x15);
    pub const DECREMENTQ: Opcode = Opcode(0x16);
    pub const QUITQ: Opcode = Opcode(0x17);
    pub const FLUSHQ: Opcode = Opcode(0x18);
    pub const APPENDQ: Opcode = Opcode(0x19);
    pub const PREPENDQ: Opcode = Opcode(0x1a);
    pub const TOUCH: Opcode = Opcode(0x1c);

    /// Mnemonic for known opcodes, `None` otherwise
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Opcode::GET => "GET",
            Opcode::SET => "SET",
            Opcode::ADD => "ADD",
            Opcode::REPLACE => "REPLACE",
            Opcode::DELETE => "DELETE",
            Opcode::INCREMENT => "INCREMENT",
            Opcode::DECREMENT => "DECREMENT",
            Opcode::QUIT => "QUIT",
            Opcode::FLUSH => "FLUSH",
            Opcode::GETQ => "GETQ",
            Opcode::NOOP => "NOOP",
            Opcode::VERSION => "VERSION",
            Opcode::GETK => "GETK",
            Opcode::GETKQ => "GETKQ",
            Opcode::APPEND => "APPEND",
            Opcode::PREPEND => "PREPEND",
            Opcode::STAT => "STAT",
            Opcode::SETQ => "SETQ",
            Opcode::ADDQ => "ADDQ",
            Opcode::REPLACEQ => "REPLACEQ",
            Opcode::DELETEQ => "DELETEQ",
            Opcode::INCREMENTQ => "INCREMENTQ",
            Opcode::DECREMENTQ => "DECREMENTQ",
            Opcode::QUITQ => "QUITQ",
            Opcode::FLUSHQ => "FLUSHQ",
            Opcode::APPENDQ => "APPENDQ",
            Opcode::PREPENDQ => "PREPENDQ",
            Opcode::TOUCH => "TOUCH",
            _ => return None,
        };
        Some(name)
    }
}

impl From<u8> for Opcode {
    fn from(byte: u8) -> Self {
        Opcode(byte)
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> Self {
        opcode.0
    }
}

impl fmt::Debug for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "Opcode(0x{:02x})", self.0),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
