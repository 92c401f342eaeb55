//! Opened PC/SC reader

use std::ffi::CString;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use bytes::Bytes;
use cepas_core::{AbortHandle, Device, DriverError, Modulation, RawResponse, Target};
use pcsc::{Card, Context, Disposition, ReaderState, State};
use tracing::{debug, trace, warn};

use crate::config::PcscConfig;
use crate::error::PcscError;
use crate::reader::card_present;

/// Pseudo-APDU asking a contactless reader for the card UID
const GET_UID: [u8; 5] = [0xFF, 0xCA, 0x00, 0x00, 0x00];

/// Longest single status wait, bounding how late an abort is noticed
const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// An opened PC/SC reader
pub struct PcscDevice {
    /// PC/SC context, dropped when the device is closed
    context: Option<Context>,
    /// Card connection, if a target is selected
    card: Option<Card>,
    /// Reader name
    reader: CString,
    /// Configuration
    config: PcscConfig,
    /// Set by [`PcscAbort`], checked between status waits
    aborted: Arc<AtomicBool>,
}

impl fmt::Debug for PcscDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscDevice")
            .field("reader", &self.reader)
            .field("has_card", &self.card.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl PcscDevice {
    pub(crate) fn new(context: Context, reader: CString, config: PcscConfig) -> Self {
        Self {
            context: Some(context),
            card: None,
            reader,
            config,
            aborted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if a target is currently selected
    pub const fn has_card(&self) -> bool {
        self.card.is_some()
    }

    fn context(&self) -> Result<&Context, PcscError> {
        self.context.as_ref().ok_or(PcscError::ContextReleased)
    }

    /// Block until a responsive card is in the field, returning its ATR
    fn wait_for_card(&self) -> Result<Vec<u8>, PcscError> {
        let context = self.context()?;
        let mut reader_states = [ReaderState::new(self.reader.clone(), State::UNAWARE)];

        loop {
            // A cancel only interrupts a wait in progress, so honour an abort
            // that arrived between waits here
            if self.aborted.load(Ordering::SeqCst) {
                return Err(PcscError::Pcsc(pcsc::Error::Cancelled));
            }

            match context.get_status_change(STATUS_POLL_INTERVAL, &mut reader_states) {
                Ok(()) => {}
                Err(pcsc::Error::Timeout) => continue,
                Err(e) => return Err(e.into()),
            }

            let state = reader_states[0].event_state();
            if state.intersects(State::UNKNOWN | State::UNAVAILABLE) {
                return Err(PcscError::ReaderNotFound(self.name()));
            }
            if card_present(state) {
                return Ok(reader_states[0].atr().to_vec());
            }

            trace!(?state, "Waiting for a card");
            reader_states[0].sync_current_state();
        }
    }

    fn connect_card(&mut self) -> Result<(), PcscError> {
        let card = self.context()?.connect(
            &self.reader,
            self.config.share_mode.into(),
            self.config.protocols,
        )?;
        self.card = Some(card);
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(card) = self.card.take() {
            if let Err((_, e)) = card.disconnect(Disposition::LeaveCard) {
                warn!(error = %e, "Failed to disconnect card");
            }
        }
    }

    /// Disconnect the card and drop this device's hold on the context
    pub(crate) fn close(&mut self) {
        self.disconnect();
        self.context = None;
        debug!(reader = %self.name(), "Closed PC/SC reader");
    }
}

/// UID carried by a successful GET UID response
fn uid_from_response(response: &[u8]) -> Option<&[u8]> {
    match response {
        [uid @ .., 0x90, 0x00] => Some(uid),
        _ => None,
    }
}

/// Reject a response that arrived after the exchange deadline
fn check_deadline(elapsed: Duration, timeout: Duration) -> Result<(), DriverError> {
    if elapsed > timeout {
        debug!(?elapsed, ?timeout, "Response arrived after the deadline");
        return Err(DriverError::Timeout);
    }
    Ok(())
}

fn read_uid(card: &Card) -> Bytes {
    let mut buffer = [0u8; pcsc::MAX_BUFFER_SIZE];
    match card.transmit(&GET_UID, &mut buffer) {
        Ok(response) => uid_from_response(response).map_or_else(
            || {
                debug!(response = ?response, "Reader did not report a UID");
                Bytes::new()
            },
            Bytes::copy_from_slice,
        ),
        Err(e) => {
            debug!(error = %e, "Reader did not report a UID");
            Bytes::new()
        }
    }
}

impl Device for PcscDevice {
    type Abort = PcscAbort;

    fn name(&self) -> String {
        self.reader.to_string_lossy().into_owned()
    }

    fn initiator_init(&mut self) -> Result<(), DriverError> {
        let context = self.context()?;
        let mut reader_states = [ReaderState::new(self.reader.clone(), State::UNAWARE)];
        context
            .get_status_change(Duration::ZERO, &mut reader_states)
            .map_err(PcscError::from)?;

        if reader_states[0]
            .event_state()
            .intersects(State::UNKNOWN | State::UNAVAILABLE)
        {
            return Err(PcscError::ReaderNotFound(self.name()).into());
        }
        Ok(())
    }

    fn select_passive_target(
        &mut self,
        modulation: Modulation,
    ) -> Result<Option<Target>, DriverError> {
        // A fresh selection always starts from a new card connection
        self.disconnect();

        // PC/SC readers poll every family they support, the requested
        // modulation is echoed back on the target
        let atr = self.wait_for_card()?;
        match self.connect_card() {
            Ok(()) => {}
            Err(PcscError::Pcsc(pcsc::Error::NoSmartcard | pcsc::Error::RemovedCard)) => {
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        }

        let uid = match &self.card {
            Some(card) if self.config.fetch_uid => read_uid(card),
            _ => Bytes::new(),
        };

        Ok(Some(Target::new(modulation, uid).with_atr(atr)))
    }

    fn transceive_bytes(
        &mut self,
        tx: &[u8],
        rx_capacity: usize,
        timeout: Duration,
    ) -> Result<RawResponse, DriverError> {
        let card = self
            .card
            .as_ref()
            .ok_or_else(|| PcscError::NoCard(self.name()))?;

        let mut buffer = vec![0u8; rx_capacity];
        let started = Instant::now();
        match card.transmit(tx, &mut buffer).map(Bytes::copy_from_slice) {
            Ok(data) => {
                // PC/SC has no per-command timeout, the reader's own applies
                check_deadline(started.elapsed(), timeout)?;
                Ok(RawResponse::new(data))
            }
            Err(e) => {
                // If card was reset or removed, clear our reference
                if matches!(e, pcsc::Error::ResetCard | pcsc::Error::RemovedCard) {
                    self.card = None;
                }
                Err(PcscError::from(e).into())
            }
        }
    }

    fn abort_handle(&self) -> Self::Abort {
        // A new handle starts a new abortable operation
        self.aborted.store(false, Ordering::SeqCst);
        PcscAbort {
            context: self.context.clone(),
            aborted: Arc::clone(&self.aborted),
        }
    }
}

impl Drop for PcscDevice {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Cancels a blocking PC/SC call through the shared context
pub struct PcscAbort {
    context: Option<Context>,
    aborted: Arc<AtomicBool>,
}

impl fmt::Debug for PcscAbort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscAbort")
            .field("established", &self.context.is_some())
            .finish()
    }
}

impl AbortHandle for PcscAbort {
    fn abort(&self) -> Result<(), DriverError> {
        self.aborted.store(true, Ordering::SeqCst);
        let context = self.context.as_ref().ok_or(PcscError::ContextReleased)?;
        context.cancel().map_err(PcscError::from)?;
        Ok(())
    }
}
