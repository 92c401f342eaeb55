//! Scripted reader driver for tests

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use crate::driver::{AbortHandle, Device, Driver, DriverError, RawResponse};
use crate::modulation::Modulation;
use crate::target::Target;

/// A recorded driver call
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Init,
    Open(String),
    InitiatorInit,
    Select(Modulation),
    Transceive(Vec<u8>),
    Abort,
    Close,
    Exit,
}

/// Shared, ordered record of driver calls
#[derive(Debug, Clone, Default)]
pub(crate) struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.lock().push(call);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.0.lock().clone()
    }

    pub(crate) fn count(&self, call: &Call) -> usize {
        self.0.lock().iter().filter(|c| *c == call).count()
    }

    pub(crate) fn transmitted(&self) -> Vec<Vec<u8>> {
        self.0
            .lock()
            .iter()
            .filter_map(|c| match c {
                Call::Transceive(tx) => Some(tx.clone()),
                _ => None,
            })
            .collect()
    }
}

/// What `select_passive_target` does
#[derive(Debug, Clone)]
pub(crate) enum TargetBehavior {
    Found(Vec<u8>),
    Absent,
    Fail(DriverError),
    BlockUntilAborted,
    /// Busy for the given time, then block until aborted. Aborts issued
    /// before the wait starts are lost.
    WaitAfter(Duration),
}

#[derive(Debug, Clone)]
pub(crate) struct MockAbort {
    log: CallLog,
    aborted: Arc<AtomicBool>,
    waiting: Arc<AtomicBool>,
    cancelled: Arc<AtomicBool>,
}

impl AbortHandle for MockAbort {
    fn abort(&self) -> Result<(), DriverError> {
        self.log.push(Call::Abort);
        self.aborted.store(true, Ordering::SeqCst);
        if self.waiting.load(Ordering::SeqCst) {
            self.cancelled.store(true, Ordering::SeqCst);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MockDevice {
    log: CallLog,
    initiator_init: Result<(), DriverError>,
    target: TargetBehavior,
    responses: VecDeque<Result<RawResponse, DriverError>>,
    aborted: Arc<AtomicBool>,
    waiting: Arc<AtomicBool>,
    cancelled: Arc<AtomicBool>,
}

impl Default for MockDevice {
    fn default() -> Self {
        Self {
            log: CallLog::default(),
            initiator_init: Ok(()),
            target: TargetBehavior::Found(vec![0x01, 0x02, 0x03, 0x04]),
            responses: VecDeque::new(),
            aborted: Arc::new(AtomicBool::new(false)),
            waiting: Arc::new(AtomicBool::new(false)),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl MockDevice {
    pub(crate) fn log(&self) -> &CallLog {
        &self.log
    }

    pub(crate) fn with_initiator_init_error(mut self, error: DriverError) -> Self {
        self.initiator_init = Err(error);
        self
    }

    pub(crate) fn with_target(mut self, target: TargetBehavior) -> Self {
        self.target = target;
        self
    }

    /// Queue the result of the next exchange
    pub(crate) fn with_response(mut self, response: Result<RawResponse, DriverError>) -> Self {
        self.responses.push_back(response);
        self
    }

    /// Queue successful SELECT MF and SELECT EF answers followed by `purse`
    pub(crate) fn with_purse(self, purse: &[u8]) -> Self {
        self.with_response(Ok(RawResponse::new(vec![0x90, 0x00])))
            .with_response(Ok(RawResponse::new(vec![0x90, 0x00])))
            .with_response(Ok(RawResponse::new(purse.to_vec())))
    }
}

impl Device for MockDevice {
    type Abort = MockAbort;

    fn name(&self) -> String {
        "mock reader".to_string()
    }

    fn initiator_init(&mut self) -> Result<(), DriverError> {
        self.log.push(Call::InitiatorInit);
        self.initiator_init
    }

    fn select_passive_target(
        &mut self,
        modulation: Modulation,
    ) -> Result<Option<Target>, DriverError> {
        self.log.push(Call::Select(modulation));
        match &self.target {
            TargetBehavior::Found(uid) => Ok(Some(Target::new(modulation, uid.clone()))),
            TargetBehavior::Absent => Ok(None),
            TargetBehavior::Fail(e) => Err(*e),
            TargetBehavior::BlockUntilAborted => {
                while !self.aborted.load(Ordering::SeqCst) {
                    thread::sleep(Duration::from_millis(1));
                }
                Err(DriverError::OperationAborted)
            }
            TargetBehavior::WaitAfter(busy) => {
                thread::sleep(*busy);
                self.cancelled.store(false, Ordering::SeqCst);
                self.waiting.store(true, Ordering::SeqCst);
                while !self.cancelled.load(Ordering::SeqCst) {
                    thread::sleep(Duration::from_millis(1));
                }
                self.waiting.store(false, Ordering::SeqCst);
                Err(DriverError::OperationAborted)
            }
        }
    }

    fn transceive_bytes(
        &mut self,
        tx: &[u8],
        _rx_capacity: usize,
        _timeout: Duration,
    ) -> Result<RawResponse, DriverError> {
        self.log.push(Call::Transceive(tx.to_vec()));
        self.responses.pop_front().unwrap_or(Err(DriverError::Timeout))
    }

    fn abort_handle(&self) -> Self::Abort {
        MockAbort {
            log: self.log.clone(),
            aborted: Arc::clone(&self.aborted),
            waiting: Arc::clone(&self.waiting),
            cancelled: Arc::clone(&self.cancelled),
        }
    }
}

/// Driver handing out a pre-scripted [`MockDevice`]
#[derive(Debug, Clone)]
pub(crate) struct MockDriver {
    log: CallLog,
    init: Result<(), DriverError>,
    open: Result<(), DriverError>,
    device: MockDevice,
}

impl MockDriver {
    pub(crate) fn new(device: MockDevice) -> Self {
        Self {
            log: device.log.clone(),
            init: Ok(()),
            open: Ok(()),
            device,
        }
    }

    pub(crate) fn log(&self) -> CallLog {
        self.log.clone()
    }

    pub(crate) fn with_init_error(mut self, error: DriverError) -> Self {
        self.init = Err(error);
        self
    }

    pub(crate) fn with_open_error(mut self, error: DriverError) -> Self {
        self.open = Err(error);
        self
    }
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new(MockDevice::default())
    }
}

/// Context token; the log tracks its release
#[derive(Debug)]
pub(crate) struct MockContext;

impl Driver for MockDriver {
    type Context = MockContext;
    type Device = MockDevice;

    fn init(&mut self) -> Result<Self::Context, DriverError> {
        self.log.push(Call::Init);
        self.init.map(|()| MockContext)
    }

    fn open(
        &mut self,
        _context: &Self::Context,
        connstring: &str,
    ) -> Result<Self::Device, DriverError> {
        self.log.push(Call::Open(connstring.to_string()));
        self.open.map(|()| self.device.clone())
    }

    fn close(&mut self, _device: &mut Self::Device) {
        self.log.push(Call::Close);
    }

    fn exit(&mut self, _context: &mut Self::Context) {
        self.log.push(Call::Exit);
    }
}
