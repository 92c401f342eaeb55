//! Passive target detection
//!
//! Detection blocks until a card enters the field. The driver primitive has
//! no timeout of its own, so [`detect_target_within`] runs it on a worker
//! thread and aborts it through the device's [`AbortHandle`] once the
//! deadline expires.

use std::thread;
use std::time::Duration;

use bytes::Bytes;
use crossbeam_channel::RecvTimeoutError;
use tracing::{debug, instrument, trace, warn};

use crate::driver::{AbortHandle, Device};
use crate::modulation::Modulation;
use crate::{Error, Result};

/// Delay between repeated aborts of a detection that outlived its deadline
const ABORT_RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// A detected passive target
///
/// The UID is not unique: two different cards may report the same one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    modulation: Modulation,
    uid: Bytes,
    atr: Option<Bytes>,
}

impl Target {
    /// Create a target descriptor
    pub fn new(modulation: Modulation, uid: impl Into<Bytes>) -> Self {
        Self {
            modulation,
            uid: uid.into(),
            atr: None,
        }
    }

    /// Attach the answer-to-reset reported by the reader
    pub fn with_atr(mut self, atr: impl Into<Bytes>) -> Self {
        self.atr = Some(atr.into());
        self
    }

    /// Modulation the target was selected with
    pub const fn modulation(&self) -> Modulation {
        self.modulation
    }

    /// Hardware UID, possibly empty if the reader could not report one
    pub fn uid(&self) -> &[u8] {
        &self.uid
    }

    /// Answer-to-reset, when the reader reports one
    pub fn atr(&self) -> Option<&[u8]> {
        self.atr.as_deref()
    }
}

/// Block until a target answering to `modulation` is presented
#[instrument(level = "debug", skip(device))]
pub fn detect_target<D: Device>(device: &mut D, modulation: Modulation) -> Result<Target> {
    debug!("Waiting for a card");
    match device.select_passive_target(modulation) {
        Ok(Some(target)) => Ok(target),
        Ok(None) => Err(Error::NoTarget {
            modulation,
            source: None,
        }),
        Err(source) => {
            debug!(error = %source, "Target selection failed");
            Err(Error::NoTarget {
                modulation,
                source: Some(source),
            })
        }
    }
}

/// Like [`detect_target`], but give up after `deadline`
///
/// On expiry the pending selection is aborted, repeatedly until the worker
/// gives up, and the worker is joined before returning, so the device is
/// free again when this returns.
#[instrument(level = "debug", skip(device))]
pub fn detect_target_within<D: Device>(
    device: &mut D,
    modulation: Modulation,
    deadline: Duration,
) -> Result<Target> {
    let abort = device.abort_handle();
    let (tx, rx) = crossbeam_channel::bounded(1);

    thread::scope(|scope| {
        scope.spawn(move || {
            let _ = tx.send(detect_target(device, modulation));
        });

        match rx.recv_timeout(deadline) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                warn!(?deadline, "No card presented, aborting detection");

                // An abort only interrupts a wait in progress, keep issuing it
                // until the worker reports back
                loop {
                    if let Err(e) = abort.abort() {
                        warn!(error = %e, "Failed to abort target detection");
                    }

                    match rx.recv_timeout(ABORT_RETRY_INTERVAL) {
                        // A card may have arrived while the abort was in flight
                        Ok(Ok(target)) => break Ok(target),
                        Ok(Err(_)) | Err(RecvTimeoutError::Disconnected) => {
                            break Err(Error::DetectTimeout { deadline });
                        }
                        Err(RecvTimeoutError::Timeout) => {
                            trace!("Detection still pending, aborting again");
                        }
                    }
                }
            }
            Err(RecvTimeoutError::Disconnected) => Err(Error::NoTarget {
                modulation,
                source: None,
            }),
        }
    })
}

/// Log a target's UID and return it unchanged
pub fn inspect_target(target: &Target) -> &Target {
    debug!(
        uid = %hex::encode(target.uid()),
        atr = ?target.atr().map(hex::encode),
        modulation = %target.modulation(),
        "Detected target (UID is not unique)"
    );
    target
}
