//! Configuration for reader sessions and command exchanges

use std::time::Duration;

use crate::modulation::Modulation;

/// Default time to wait for a response to a single command
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Default receive buffer size for a single response
pub const DEFAULT_RX_CAPACITY: usize = 256;

/// Largest receive buffer a caller may ask for
pub const MAX_RX_CAPACITY: usize = 1024;

/// How the driver-reported response length is validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LengthPolicy {
    /// Reject responses whose reported length differs from the returned buffer
    Strict,
    /// Accept the returned buffer as-is, only driver errors fail
    #[default]
    Lenient,
}

/// Options applied to every command exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeOptions {
    /// Time to wait for a response
    pub timeout: Duration,
    /// Receive buffer size
    pub rx_capacity: usize,
    /// Response length validation
    pub length_policy: LengthPolicy,
}

impl Default for ExchangeOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            rx_capacity: DEFAULT_RX_CAPACITY,
            length_policy: LengthPolicy::default(),
        }
    }
}

impl ExchangeOptions {
    /// Create the default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response timeout
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the receive buffer size, capped at [`MAX_RX_CAPACITY`]
    pub const fn with_rx_capacity(mut self, rx_capacity: usize) -> Self {
        self.rx_capacity = if rx_capacity > MAX_RX_CAPACITY {
            MAX_RX_CAPACITY
        } else {
            rx_capacity
        };
        self
    }

    /// Set the length validation policy
    pub const fn with_length_policy(mut self, length_policy: LengthPolicy) -> Self {
        self.length_policy = length_policy;
        self
    }
}

/// Configuration for a complete CAN read
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReaderConfig {
    /// Reader-specific connection string, empty for the driver's default reader
    pub connstring: String,

    /// Modulation to poll for
    pub modulation: Modulation,

    /// Options for each command exchange
    pub exchange: ExchangeOptions,

    /// Give up waiting for a card after this long; wait forever when unset
    pub detect_timeout: Option<Duration>,
}

impl ReaderConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connection string
    pub fn with_connstring(mut self, connstring: impl Into<String>) -> Self {
        self.connstring = connstring.into();
        self
    }

    /// Set the modulation to poll for
    pub fn with_modulation(mut self, modulation: Modulation) -> Self {
        self.modulation = modulation;
        self
    }

    /// Set the exchange options
    pub fn with_exchange(mut self, exchange: ExchangeOptions) -> Self {
        self.exchange = exchange;
        self
    }

    /// Set the card detection deadline
    pub fn with_detect_timeout(mut self, detect_timeout: Option<Duration>) -> Self {
        self.detect_timeout = detect_timeout;
        self
    }
}
