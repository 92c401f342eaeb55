//! Modulation descriptors used when polling for passive targets

use derive_more::Display;

/// Modulation family of a passive target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum ModulationType {
    /// ISO/IEC 14443 type A
    #[display("ISO/IEC 14443A")]
    Iso14443a,
    /// ISO/IEC 14443 type B, the family CEPAS cards answer to
    #[default]
    #[display("ISO/IEC 14443B")]
    Iso14443b,
    /// JIS X 6319-4 (FeliCa)
    #[display("FeliCa")]
    Felica,
    /// Innovision Jewel
    #[display("Jewel")]
    Jewel,
    /// ISO/IEC 14443-2B ST SRx
    #[display("ISO/IEC 14443-2B ST SRx")]
    Iso14443b2sr,
}

/// Bit rate class of a passive target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Display)]
pub enum BaudRate {
    /// 106 kbit/s
    #[default]
    #[display("106 kbps")]
    Nbr106,
    /// 212 kbit/s
    #[display("212 kbps")]
    Nbr212,
    /// 424 kbit/s
    #[display("424 kbps")]
    Nbr424,
    /// 847 kbit/s
    #[display("847 kbps")]
    Nbr847,
}

impl BaudRate {
    /// Nominal bit rate in kbit/s
    pub const fn kbps(&self) -> u32 {
        match self {
            Self::Nbr106 => 106,
            Self::Nbr212 => 212,
            Self::Nbr424 => 424,
            Self::Nbr847 => 847,
        }
    }
}

/// Modulation type and bit rate requested from the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
#[display("{kind} @ {baud_rate}")]
pub struct Modulation {
    /// Modulation family
    pub kind: ModulationType,
    /// Bit rate class
    pub baud_rate: BaudRate,
}

impl Modulation {
    /// Create a new modulation descriptor
    pub const fn new(kind: ModulationType, baud_rate: BaudRate) -> Self {
        Self { kind, baud_rate }
    }

    /// ISO/IEC 14443B at 106 kbit/s
    pub const fn cepas() -> Self {
        Self::new(ModulationType::Iso14443b, BaudRate::Nbr106)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_cepas() {
        assert_eq!(Modulation::default(), Modulation::cepas());
        assert_eq!(Modulation::default().baud_rate.kbps(), 106);
    }

    #[test]
    fn test_display() {
        assert_eq!(Modulation::cepas().to_string(), "ISO/IEC 14443B @ 106 kbps");
        let felica = Modulation::new(ModulationType::Felica, BaudRate::Nbr212);
        assert_eq!(felica.to_string(), "FeliCa @ 212 kbps");
    }
}
