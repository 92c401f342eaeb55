//! PC/SC implementation of the reader driver

use std::ffi::CString;
use std::fmt;
use std::time::Duration;

use cepas_core::{Driver, DriverError};
use pcsc::{Context, ReaderState, Scope, State};
use tracing::{debug, warn};

use crate::config::PcscConfig;
use crate::device::PcscDevice;
use crate::error::PcscError;
use crate::reader::PcscReader;
use crate::util::{ReaderSelector, parse_connstring, select_reader};

/// PC/SC driver context
pub struct PcscContext {
    context: Option<Context>,
}

impl fmt::Debug for PcscContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscContext")
            .field("established", &self.context.is_some())
            .finish()
    }
}

impl PcscContext {
    fn get(&self) -> Result<&Context, PcscError> {
        self.context.as_ref().ok_or(PcscError::ContextReleased)
    }

    fn release(&mut self) {
        let Some(context) = self.context.take() else {
            return;
        };

        match context.release() {
            Ok(()) => debug!("Released PC/SC context"),
            // Still referenced elsewhere, the last clone releases it on drop
            Err((_, e)) => warn!(error = %e, "PC/SC context still in use"),
        }
    }
}

/// Reader driver backed by the system PC/SC service
#[derive(Debug, Clone, Copy, Default)]
pub struct PcscDriver {
    config: PcscConfig,
}

impl PcscDriver {
    /// Create a new driver with the given configuration
    pub const fn new(config: PcscConfig) -> Self {
        Self { config }
    }

    /// Driver configuration
    pub const fn config(&self) -> &PcscConfig {
        &self.config
    }

    /// List all available readers and whether a card is in their field
    pub fn list_readers() -> Result<Vec<PcscReader>, PcscError> {
        let context = Context::establish(Scope::User)?;
        let readers = context.list_readers_owned()?;
        if readers.is_empty() {
            return Err(PcscError::NoReadersAvailable);
        }

        let mut reader_states: Vec<_> = readers
            .into_iter()
            .map(|name| ReaderState::new(name, State::UNAWARE))
            .collect();
        context.get_status_change(Duration::ZERO, &mut reader_states)?;

        Ok(reader_states
            .iter()
            .map(PcscReader::from_reader_state)
            .collect())
    }
}

impl Driver for PcscDriver {
    type Context = PcscContext;
    type Device = PcscDevice;

    fn init(&mut self) -> Result<Self::Context, DriverError> {
        let context = Context::establish(Scope::User).map_err(PcscError::from)?;
        debug!("Established PC/SC context");
        Ok(PcscContext {
            context: Some(context),
        })
    }

    fn open(
        &mut self,
        context: &Self::Context,
        connstring: &str,
    ) -> Result<Self::Device, DriverError> {
        let context = context.get()?;
        let readers: Vec<String> = context
            .list_readers_owned()
            .map_err(PcscError::from)?
            .iter()
            .map(|name| name.to_string_lossy().into_owned())
            .collect();

        let selector = parse_connstring(connstring);
        let name = select_reader(&readers, &selector).ok_or_else(|| match selector {
            ReaderSelector::First => PcscError::NoReadersAvailable,
            ReaderSelector::Named(name) => PcscError::ReaderNotFound(name.to_string()),
        })?;

        let reader =
            CString::new(name).map_err(|_| PcscError::ReaderNotFound(name.to_string()))?;

        debug!(reader = name, "Opening PC/SC reader");
        Ok(PcscDevice::new(context.clone(), reader, self.config))
    }

    fn close(&mut self, device: &mut Self::Device) {
        device.close();
    }

    fn exit(&mut self, context: &mut Self::Context) {
        context.release();
    }
}
