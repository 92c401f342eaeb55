//! Reader driver capability
//!
//! A driver owns the low-level reader context and opens devices on it. A
//! device is an opened reader that can poll for passive targets and exchange
//! raw bytes with them. The session protocol engine only ever talks to a
//! reader through these traits.

pub mod error;

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
pub use error::DriverError;

use crate::modulation::Modulation;
use crate::target::Target;

/// Driver-level entry point: context creation and device lifecycle
pub trait Driver: fmt::Debug {
    /// Driver context, released last
    type Context: fmt::Debug;

    /// Device opened on a context
    type Device: Device;

    /// Create the driver context
    fn init(&mut self) -> Result<Self::Context, DriverError>;

    /// Open a device on `context` using a reader-specific connection string
    fn open(
        &mut self,
        context: &Self::Context,
        connstring: &str,
    ) -> Result<Self::Device, DriverError>;

    /// Close a device previously returned by [`Driver::open`]
    fn close(&mut self, device: &mut Self::Device);

    /// Release a context previously returned by [`Driver::init`]
    fn exit(&mut self, context: &mut Self::Context);
}

/// An opened reader device
pub trait Device: Send + fmt::Debug {
    /// Handle able to interrupt a blocking call from another thread
    type Abort: AbortHandle;

    /// Human-readable device name
    fn name(&self) -> String;

    /// Put the device into initiator (reader) mode
    fn initiator_init(&mut self) -> Result<(), DriverError>;

    /// Block until a passive target answering to `modulation` is in the field
    ///
    /// Returns `Ok(None)` when the driver gave up without finding a target.
    fn select_passive_target(
        &mut self,
        modulation: Modulation,
    ) -> Result<Option<Target>, DriverError>;

    /// Send `tx` to the selected target and wait up to `timeout` for a reply
    /// of at most `rx_capacity` bytes
    fn transceive_bytes(
        &mut self,
        tx: &[u8],
        rx_capacity: usize,
        timeout: Duration,
    ) -> Result<RawResponse, DriverError>;

    /// Handle that aborts the command currently blocking this device
    fn abort_handle(&self) -> Self::Abort;
}

/// Aborts a blocking device call from another thread
pub trait AbortHandle: Send + Sync + fmt::Debug {
    /// Request the pending command to return
    fn abort(&self) -> Result<(), DriverError>;
}

/// Bytes returned by a device together with the length it reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// Length reported by the driver
    pub reported_len: usize,
    /// Bytes actually handed back
    pub data: Bytes,
}

impl RawResponse {
    /// Response whose reported length matches its data
    pub fn new(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            reported_len: data.len(),
            data,
        }
    }

    /// Override the driver-reported length
    pub fn with_reported_len(mut self, reported_len: usize) -> Self {
        self.reported_len = reported_len;
        self
    }
}
