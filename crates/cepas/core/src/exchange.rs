//! Single command/response exchange with a selected target

use bytes::Bytes;
use tracing::{debug, instrument, trace};

use crate::config::{ExchangeOptions, LengthPolicy};
use crate::driver::Device;
use crate::error::TransceiveError;
use crate::protocol::Apdu;

/// Send `command` and wait for the response
///
/// The response length is validated according to `options.length_policy`.
/// No retries are attempted; a failed exchange leaves the card's file
/// selection in an unknown state.
#[instrument(level = "trace", skip(device, command, options), fields(command = %command))]
pub fn transceive<D: Device>(
    device: &mut D,
    command: &Apdu,
    options: &ExchangeOptions,
) -> Result<Bytes, TransceiveError> {
    trace!(tx = %hex::encode(command.as_bytes()), "Transmitting command");

    let raw = device
        .transceive_bytes(command.as_bytes(), options.rx_capacity, options.timeout)
        .inspect_err(|e| debug!(error = %e, code = e.code(), "Driver error during exchange"))?;

    let received = raw.data.len();
    if received > options.rx_capacity {
        return Err(TransceiveError::Overflow {
            len: received,
            capacity: options.rx_capacity,
        });
    }

    if options.length_policy == LengthPolicy::Strict && raw.reported_len != received {
        return Err(TransceiveError::LengthMismatch {
            reported: raw.reported_len,
            received,
        });
    }

    trace!(rx = %hex::encode(&raw.data), "Received response");
    Ok(raw.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{DriverError, RawResponse};
    use crate::mock::MockDevice;
    use crate::protocol::{SELECT_EF, SELECT_MF};

    #[test]
    fn test_transceive() {
        let mut device =
            MockDevice::default().with_response(Ok(RawResponse::new(vec![0x90, 0x00])));
        let response = transceive(&mut device, &SELECT_MF, &ExchangeOptions::default()).unwrap();
        assert_eq!(response.as_ref(), &[0x90, 0x00]);
        assert_eq!(device.log().transmitted(), vec![SELECT_MF.as_bytes().to_vec()]);
    }

    #[test]
    fn test_driver_error_propagates() {
        let mut device = MockDevice::default().with_response(Err(DriverError::Timeout));
        let err = transceive(&mut device, &SELECT_EF, &ExchangeOptions::default()).unwrap_err();
        assert_eq!(err, TransceiveError::Driver(DriverError::Timeout));
        assert!(err.driver_error().is_some_and(|e| e.is_timeout()));
    }

    #[test]
    fn test_length_policy() {
        let short = RawResponse::new(vec![0x90, 0x00]).with_reported_len(4);

        // Lenient accepts whatever the driver handed back
        let mut device = MockDevice::default().with_response(Ok(short.clone()));
        let response = transceive(&mut device, &SELECT_MF, &ExchangeOptions::default()).unwrap();
        assert_eq!(response.len(), 2);

        let strict = ExchangeOptions::new().with_length_policy(LengthPolicy::Strict);
        let mut device = MockDevice::default().with_response(Ok(short));
        let err = transceive(&mut device, &SELECT_MF, &strict).unwrap_err();
        assert_eq!(
            err,
            TransceiveError::LengthMismatch {
                reported: 4,
                received: 2
            }
        );
    }

    #[test]
    fn test_empty_response_is_valid_when_lenient() {
        let mut device = MockDevice::default().with_response(Ok(RawResponse::new(Vec::new())));
        let response = transceive(&mut device, &SELECT_MF, &ExchangeOptions::default()).unwrap();
        assert!(response.is_empty());
    }

    #[test]
    fn test_overflow() {
        let options = ExchangeOptions::new().with_rx_capacity(4);
        let mut device = MockDevice::default().with_response(Ok(RawResponse::new(vec![0; 8])));
        let err = transceive(&mut device, &SELECT_MF, &options).unwrap_err();
        assert_eq!(err, TransceiveError::Overflow { len: 8, capacity: 4 });
    }
}
