//! Response status codes
//!
//! Bytes 6-7 of a response header.

use std::fmt;

/// Response status code
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Status(pub u16);

impl Status {
    pub const SUCCESS: Status = Status(0x0000);
    pub const KEY_ENOENT: Status = Status(0x0001);
    pub const KEY_EEXISTS: Status = Status(0x0002);
    pub const E2BIG: Status = Status(0x0003);
    pub const EINVAL: Status = Status(0x0004);
    pub const NOT_STORED: Status = Status(0x0005);
    pub const DELTA_BADVAL: Status = Status(0x0006);
    pub const UNKNOWN_COMMAND: Status = Status(0x0081);
    pub const ENOMEM: Status = Status(0x0082);

    pub fn is_success(self) -> bool {
        self == Status::SUCCESS
    }

    fn name(self) -> Option<&'static str> {
        let name = match self {
            Status::SUCCESS => "SUCCESS",
            Status::KEY_ENOENT => "KEY_ENOENT",
            Status::KEY_EEXISTS => "KEY_EEXISTS",
            Status::E2BIG => "E2BIG",
            Status::EINVAL => "EINVAL",
            Status::NOT_STORED => "NOT_STORED",
            Status::DELTA_BADVAL => "DELTA_BADVAL",
            Status::UNKNOWN_COMMAND => "UNKNOWN_COMMAND",
            Status::ENOMEM => "ENOMEM",
            _ => return None,
        };
        Some(name)
    }
}

impl From<u16> for Status {
    fn from(code: u16) -> Self {
        Status(code)
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "Status(0x{:04x})", self.0),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
