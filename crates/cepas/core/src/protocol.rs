//! CEPAS command constants and purse layout offsets

use std::fmt;

/// A fixed, named APDU command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Apdu {
    name: &'static str,
    bytes: &'static [u8],
}

impl Apdu {
    /// Create a named command from its raw bytes
    pub const fn new(name: &'static str, bytes: &'static [u8]) -> Self {
        Self { name, bytes }
    }

    /// Human-readable command name
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Raw command bytes
    pub const fn as_bytes(&self) -> &'static [u8] {
        self.bytes
    }

    /// Length of the encoded command
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the command has no bytes at all
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Display for Apdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl AsRef<[u8]> for Apdu {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

/// SELECT the master file (3F00)
pub const SELECT_MF: Apdu = Apdu::new(
    "SELECT MF",
    &[0x00, 0xA4, 0x00, 0x00, 0x02, 0x3F, 0x00, 0x00],
);

/// SELECT the purse elementary file (4000)
pub const SELECT_EF: Apdu = Apdu::new(
    "SELECT EF",
    &[0x00, 0xA4, 0x00, 0x00, 0x02, 0x40, 0x00, 0x00],
);

/// READ PURSE record 3, expecting 0x3F bytes
pub const READ_PURSE: Apdu = Apdu::new("READ PURSE", &[0x90, 0x32, 0x03, 0x00, 0x00, 0x3F]);

/// Commands issued to read the purse, in order
pub const PURSE_SEQUENCE: [Apdu; 3] = [SELECT_MF, SELECT_EF, READ_PURSE];

/// Offset of the CAN within the purse data
pub const CAN_OFFSET: usize = 8;

/// Length of the raw CAN in bytes
pub const CAN_LEN: usize = 8;

/// Shortest purse payload that still contains a CAN
pub const MIN_PURSE_LEN: usize = CAN_OFFSET + CAN_LEN;
