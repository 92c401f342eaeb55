//! Card account number extraction

use std::fmt;

use crate::protocol::{CAN_LEN, CAN_OFFSET, MIN_PURSE_LEN};
use crate::{Error, Result};

/// Card account number, the 8 bytes at offset 8 of the purse data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Can([u8; CAN_LEN]);

impl Can {
    /// Extract the CAN from raw purse data
    pub fn from_purse(purse: &[u8]) -> Result<Self> {
        if purse.len() < MIN_PURSE_LEN {
            return Err(Error::MalformedPurse { len: purse.len() });
        }

        let mut can = [0u8; CAN_LEN];
        can.copy_from_slice(&purse[CAN_OFFSET..MIN_PURSE_LEN]);
        Ok(Self(can))
    }

    /// Raw CAN bytes
    pub const fn as_bytes(&self) -> &[u8; CAN_LEN] {
        &self.0
    }

    /// 16 lowercase hex digits, no separators
    pub fn ungrouped(&self) -> String {
        hex::encode(self.0)
    }

    /// Four space-separated blocks of 4 hex digits
    pub fn grouped(&self) -> String {
        self.0
            .chunks(2)
            .map(hex::encode)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Render grouped or ungrouped
    pub fn format(&self, grouped: bool) -> String {
        if grouped {
            self.grouped()
        } else {
            self.ungrouped()
        }
    }
}

impl fmt::Display for Can {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.grouped())
    }
}

/// Extract the CAN from purse data and render it
pub fn extract_can(purse: &[u8], grouped: bool) -> Result<String> {
    Can::from_purse(purse).map(|can| can.format(grouped))
}

/// Strip the block separators from a grouped CAN
pub fn ungroup(can: &str) -> String {
    can.split(' ').collect()
}
