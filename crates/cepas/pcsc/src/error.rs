//! Error types for the PC/SC driver

use cepas_core::DriverError;

/// PC/SC-specific errors
#[derive(Debug, thiserror::Error)]
pub enum PcscError {
    /// PC/SC error
    #[error("PC/SC error: {0}")]
    Pcsc(#[from] pcsc::Error),

    /// No readers available
    #[error("No readers available")]
    NoReadersAvailable,

    /// Reader not found
    #[error("Reader not found: {0}")]
    ReaderNotFound(String),

    /// No card present in reader
    #[error("No card present in reader: {0}")]
    NoCard(String),

    /// Context was already released
    #[error("PC/SC context released")]
    ContextReleased,
}

impl From<PcscError> for DriverError {
    fn from(error: PcscError) -> Self {
        match error {
            PcscError::Pcsc(e) => match e {
                pcsc::Error::Timeout => Self::Timeout,
                pcsc::Error::Cancelled => Self::OperationAborted,
                // The card left the field mid-exchange
                pcsc::Error::RemovedCard | pcsc::Error::UnresponsiveCard => Self::RfTransmission,
                pcsc::Error::ResetCard | pcsc::Error::NoSmartcard => Self::TargetReleased,
                pcsc::Error::UnknownReader
                | pcsc::Error::ReaderUnavailable
                | pcsc::Error::NoReadersAvailable => Self::NoSuchDevice,
                pcsc::Error::NoService | pcsc::Error::ServiceStopped => Self::Io,
                pcsc::Error::InsufficientBuffer => Self::Overflow,
                pcsc::Error::InvalidParameter | pcsc::Error::InvalidValue => {
                    Self::InvalidArgument
                }
                pcsc::Error::UnsupportedFeature => Self::NotImplemented,
                pcsc::Error::UnsupportedCard => Self::DeviceNotSupported,
                pcsc::Error::CommError => Self::Chip,
                _ => Self::Soft,
            },
            PcscError::NoReadersAvailable | PcscError::ReaderNotFound(_) => Self::NoSuchDevice,
            PcscError::NoCard(_) => Self::TargetReleased,
            PcscError::ContextReleased => Self::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_error_mapping() {
        assert_eq!(
            DriverError::from(PcscError::Pcsc(pcsc::Error::RemovedCard)),
            DriverError::RfTransmission
        );
        assert_eq!(
            DriverError::from(PcscError::Pcsc(pcsc::Error::Cancelled)),
            DriverError::OperationAborted
        );
        assert_eq!(
            DriverError::from(PcscError::ReaderNotFound("ACR122".to_string())),
            DriverError::NoSuchDevice
        );
        assert_eq!(
            DriverError::from(PcscError::Pcsc(pcsc::Error::Timeout)),
            DriverError::Timeout
        );
    }
}
