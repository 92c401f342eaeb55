//! Error reported by reader drivers

use thiserror::Error;

/// Driver failure with a stable status code
///
/// Codes follow the reader-driver convention of negative status values, so
/// callers that log or persist the raw code keep a meaningful number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DriverError {
    /// Input/output error, e.g. the reader went away
    #[error("Input/output error")]
    Io,

    /// Invalid argument passed to the driver
    #[error("Invalid argument")]
    InvalidArgument,

    /// Operation not supported by the device
    #[error("Operation not supported by device")]
    DeviceNotSupported,

    /// No such device
    #[error("No such device")]
    NoSuchDevice,

    /// Buffer overflow
    #[error("Buffer overflow")]
    Overflow,

    /// Operation timed out
    #[error("Operation timed out")]
    Timeout,

    /// Operation aborted by the caller
    #[error("Operation aborted")]
    OperationAborted,

    /// Not implemented by the driver
    #[error("Not implemented")]
    NotImplemented,

    /// Target released
    #[error("Target released")]
    TargetReleased,

    /// RF transmission error, usually the card left the field
    #[error("RF transmission error")]
    RfTransmission,

    /// Software error in the driver
    #[error("Software error")]
    Soft,

    /// Reader chip reported an error
    #[error("Device's internal chip error")]
    Chip,

    /// Any other driver status code
    #[error("Driver error code: {0}")]
    Other(i32),
}

impl DriverError {
    /// Raw status code of this error
    pub const fn code(&self) -> i32 {
        match self {
            Self::Io => -1,
            Self::InvalidArgument => -2,
            Self::DeviceNotSupported => -3,
            Self::NoSuchDevice => -4,
            Self::Overflow => -5,
            Self::Timeout => -6,
            Self::OperationAborted => -7,
            Self::NotImplemented => -8,
            Self::TargetReleased => -10,
            Self::RfTransmission => -20,
            Self::Soft => -80,
            Self::Chip => -90,
            Self::Other(code) => *code,
        }
    }

    /// Map a raw status code back to an error
    pub const fn from_code(code: i32) -> Self {
        match code {
            -1 => Self::Io,
            -2 => Self::InvalidArgument,
            -3 => Self::DeviceNotSupported,
            -4 => Self::NoSuchDevice,
            -5 => Self::Overflow,
            -6 => Self::Timeout,
            -7 => Self::OperationAborted,
            -8 => Self::NotImplemented,
            -10 => Self::TargetReleased,
            -20 => Self::RfTransmission,
            -80 => Self::Soft,
            -90 => Self::Chip,
            other => Self::Other(other),
        }
    }

    /// Whether this is a timeout
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}
