//! Reader session management
//!
//! A [`Session`] owns the driver context and the opened device. Dropping it
//! closes the device and then releases the context, on every exit path
//! including early returns and unwinding.

use std::fmt;

use tracing::{debug, info, instrument};

use crate::driver::{Device, Driver};
use crate::{Error, Result};

/// An open reader session
pub struct Session<D: Driver> {
    driver: D,
    context: D::Context,
    device: D::Device,
}

impl<D: Driver> fmt::Debug for Session<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("driver", &self.driver)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl<D: Driver> Session<D> {
    /// Acquire the driver context, open the device on `connstring` and put it
    /// into initiator mode
    #[instrument(level = "debug", skip(driver))]
    pub fn open(mut driver: D, connstring: &str) -> Result<Self> {
        let mut context = driver.init().map_err(Error::Init)?;

        let device = match driver.open(&context, connstring) {
            Ok(device) => device,
            Err(source) => {
                driver.exit(&mut context);
                return Err(Error::DeviceOpen {
                    connstring: connstring.to_string(),
                    source,
                });
            }
        };

        // From here on teardown is handled by Drop
        let mut session = Self {
            driver,
            context,
            device,
        };

        session
            .device
            .initiator_init()
            .map_err(|source| Error::DeviceInit {
                connstring: connstring.to_string(),
                source,
            })?;

        info!(device = %session.device.name(), "Opened NFC reader device");
        Ok(session)
    }

    /// The opened device
    pub const fn device(&mut self) -> &mut D::Device {
        &mut self.device
    }

    /// Human-readable name of the opened device
    pub fn device_name(&self) -> String {
        self.device.name()
    }
}

impl<D: Driver> Drop for Session<D> {
    fn drop(&mut self) {
        debug!("Closing reader device and releasing driver context");
        self.driver.close(&mut self.device);
        self.driver.exit(&mut self.context);
    }
}

/// Run `f` against the device of a freshly opened session
///
/// The session is torn down when `f` returns, whatever the outcome.
pub fn with_session<D, T, F>(driver: D, connstring: &str, f: F) -> Result<T>
where
    D: Driver,
    F: FnOnce(&mut D::Device) -> Result<T>,
{
    let mut session = Session::open(driver, connstring)?;
    f(session.device())
}
