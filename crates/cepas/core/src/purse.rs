//! CEPAS purse read sequence

use bytes::Bytes;
use derive_more::Deref;
use tracing::{debug, instrument};

use crate::config::ExchangeOptions;
use crate::driver::Device;
use crate::exchange::transceive;
use crate::protocol::{Apdu, READ_PURSE, SELECT_EF, SELECT_MF};
use crate::{Error, Result};

/// Raw READ PURSE response, uninterpreted
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct PurseData(Bytes);

impl PurseData {
    /// Wrap raw purse bytes
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self(data.into())
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Unwrap into the underlying buffer
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl AsRef<[u8]> for PurseData {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn step<D: Device>(device: &mut D, command: &Apdu, options: &ExchangeOptions) -> Result<Bytes> {
    transceive(device, command, options).map_err(|source| Error::Transceive {
        command: command.name(),
        source,
    })
}

/// Select the master file, then the purse file, then read the purse
///
/// The first failing exchange aborts the sequence; later commands are
/// never sent.
#[instrument(level = "debug", skip(device, options))]
pub fn read_purse<D: Device>(device: &mut D, options: &ExchangeOptions) -> Result<PurseData> {
    step(device, &SELECT_MF, options)?;
    step(device, &SELECT_EF, options)?;
    let purse = PurseData(step(device, &READ_PURSE, options)?);

    debug!(len = purse.len(), data = %hex::encode(&purse), "Read purse");
    Ok(purse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{DriverError, RawResponse};
    use crate::error::TransceiveError;
    use crate::mock::MockDevice;
    use crate::protocol::PURSE_SEQUENCE;

    #[test]
    fn test_sequence() {
        let payload: Vec<u8> = (0u8..24).collect();
        let mut device = MockDevice::default().with_purse(&payload);

        let purse = read_purse(&mut device, &ExchangeOptions::default()).unwrap();
        assert_eq!(purse.as_bytes(), payload.as_slice());

        let sent = device.log().transmitted();
        let expected: Vec<Vec<u8>> = PURSE_SEQUENCE
            .iter()
            .map(|c| c.as_bytes().to_vec())
            .collect();
        assert_eq!(sent, expected);
    }

    #[test]
    fn test_select_ef_failure_stops_sequence() {
        let mut device = MockDevice::default()
            .with_response(Ok(RawResponse::new(vec![0x90, 0x00])))
            .with_response(Err(DriverError::RfTransmission))
            .with_response(Ok(RawResponse::new(vec![0; 32])));

        let err = read_purse(&mut device, &ExchangeOptions::default()).unwrap_err();
        assert_eq!(
            err,
            Error::Transceive {
                command: "SELECT EF",
                source: TransceiveError::Driver(DriverError::RfTransmission),
            }
        );

        // READ PURSE was never issued
        assert_eq!(
            device.log().transmitted(),
            vec![SELECT_MF.as_bytes().to_vec(), SELECT_EF.as_bytes().to_vec()]
        );
    }

    #[test]
    fn test_select_mf_failure() {
        let mut device = MockDevice::default().with_response(Err(DriverError::Timeout));
        let err = read_purse(&mut device, &ExchangeOptions::default()).unwrap_err();
        assert_eq!(err.command(), Some("SELECT MF"));
        assert_eq!(device.log().transmitted().len(), 1);
    }

    #[test]
    fn test_short_purse_is_not_interpreted() {
        let mut device = MockDevice::default().with_purse(&[0x6A, 0x82]);
        let purse = read_purse(&mut device, &ExchangeOptions::default()).unwrap();
        assert_eq!(purse.len(), 2);
    }
}
