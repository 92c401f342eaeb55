//! Error types for the card session protocol engine
//!
//! Every stage reports its first failure unmodified; the variants carry
//! enough context (failing command, driver status) for a front end to
//! explain what happened.

use std::time::Duration;

use crate::driver::DriverError;
use crate::modulation::Modulation;

/// Failure of a single command/response exchange
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransceiveError {
    /// Driver reported an error, including timeouts
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// Driver-reported length disagrees with the returned buffer
    #[error("Driver reported {reported} bytes but returned {received}")]
    LengthMismatch {
        /// Length reported by the driver
        reported: usize,
        /// Length of the buffer actually returned
        received: usize,
    },

    /// Response does not fit the receive buffer
    #[error("Response of {len} bytes exceeds receive capacity of {capacity}")]
    Overflow {
        /// Length of the returned buffer
        len: usize,
        /// Configured receive capacity
        capacity: usize,
    },
}

impl TransceiveError {
    /// Underlying driver error, if any
    pub const fn driver_error(&self) -> Option<DriverError> {
        match self {
            Self::Driver(e) => Some(*e),
            _ => None,
        }
    }
}

/// Core error type for all card session operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Driver context could not be created
    #[error("Couldn't init reader driver: {0}")]
    Init(#[source] DriverError),

    /// Reader device could not be opened
    #[error("Couldn't open reader device on {connstring:?}: {source}")]
    DeviceOpen {
        /// Connection string used
        connstring: String,
        /// Driver failure
        #[source]
        source: DriverError,
    },

    /// Reader device could not be put into initiator mode
    #[error("Couldn't init reader device on {connstring:?}: {source}")]
    DeviceInit {
        /// Connection string used
        connstring: String,
        /// Driver failure
        #[source]
        source: DriverError,
    },

    /// No compatible card was detected
    #[error("Couldn't establish initial connection with card ({modulation})")]
    NoTarget {
        /// Modulation that was polled for
        modulation: Modulation,
        /// Driver failure, if the driver reported one
        #[source]
        source: Option<DriverError>,
    },

    /// No card was presented before the detection deadline
    #[error("No card presented within {deadline:?}")]
    DetectTimeout {
        /// Deadline that expired
        deadline: Duration,
    },

    /// A command exchange failed
    #[error("{command} failed: {source}")]
    Transceive {
        /// Name of the failing command
        command: &'static str,
        /// Exchange failure
        #[source]
        source: TransceiveError,
    },

    /// Purse payload is too short to contain a CAN
    #[error("Malformed purse data: {len} bytes, need at least 16")]
    MalformedPurse {
        /// Length of the payload received
        len: usize,
    },
}

impl Error {
    /// Driver error at the root of this failure, if any
    pub const fn driver_error(&self) -> Option<DriverError> {
        match self {
            Self::Init(source)
            | Self::DeviceOpen { source, .. }
            | Self::DeviceInit { source, .. } => Some(*source),
            Self::NoTarget { source, .. } => *source,
            Self::Transceive { source, .. } => source.driver_error(),
            Self::DetectTimeout { .. } | Self::MalformedPurse { .. } => None,
        }
    }

    /// Whether the card most likely left the field mid-exchange
    pub const fn is_rf_transmission(&self) -> bool {
        matches!(self.driver_error(), Some(DriverError::RfTransmission))
    }

    /// Whether retrying (a new session, a new tap or a new purse read) can help
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::Init(_) | Self::MalformedPurse { .. })
    }

    /// Name of the command that failed, for exchange failures
    pub const fn command(&self) -> Option<&'static str> {
        match self {
            Self::Transceive { command, .. } => Some(*command),
            _ => None,
        }
    }
}

/// Result type for card session operations
pub type Result<T, E = Error> = core::result::Result<T, E>;
