use super::{Setting, code_to_field};
use crate::error::InvalidConfigValue;
use crate::registers::{RLOAD_BITS, TIA_GAIN_BITS};

/// Internal TIA feedback resistances in ohms, indexed by gain ordinal minus one.
///
/// The external-resistor setting (ordinal 0) has no entry.
pub const TIA_GAIN_OHMS: [f32; 7] = [
    2_750.0, 3_500.0, 7_000.0, 14_000.0, 35_000.0, 120_000.0, 350_000.0,
];

/// Transimpedance amplifier feedback resistance (TIACN bits 2-4).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TiaGain {
    /// External feedback resistor between C1 and C2.
    #[default]
    External = 0,
    /// 2.75kΩ
    R2k75 = 1,
    /// 3.5kΩ
    R3k5 = 2,
    /// 7kΩ
    R7k = 3,
    /// 14kΩ
    R14k = 4,
    /// 35kΩ
    R35k = 5,
    /// 120kΩ
    R120k = 6,
    /// 350kΩ
    R350k = 7,
}

impl TiaGain {
    /// All gain settings in ordinal order.
    pub const ALL: [TiaGain; 8] = [
        Self::External,
        Self::R2k75,
        Self::R3k5,
        Self::R7k,
        Self::R14k,
        Self::R35k,
        Self::R120k,
        Self::R350k,
    ];

    /// Position of this setting in the gain table, equal to the unshifted field.
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Setting for an unshifted field value.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(usize::from(ordinal)).copied()
    }

    /// Feedback resistance in ohms, or `None` for the external resistor.
    pub fn ohms(self) -> Option<f32> {
        match self {
            Self::External => None,
            internal => Some(TIA_GAIN_OHMS[usize::from(internal.ordinal()) - 1]),
        }
    }
}

impl From<TiaGain> for u8 {
    /// Gain code in its TIACN bit position.
    fn from(value: TiaGain) -> Self {
        value.ordinal() << TIA_GAIN_BITS.start()
    }
}

impl TryFrom<u8> for TiaGain {
    type Error = InvalidConfigValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        code_to_field(value, TIA_GAIN_BITS)
            .and_then(Self::from_ordinal)
            .ok_or(InvalidConfigValue::new(Setting::TiaGain, value))
    }
}

/// Load resistance between the cell and the working electrode (TIACN bits 0-1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RLoad {
    /// 10Ω
    R10 = 0,
    /// 33Ω
    R33 = 1,
    /// 50Ω
    R50 = 2,
    /// 100Ω
    #[default]
    R100 = 3,
}

impl RLoad {
    /// All load settings in ordinal order.
    pub const ALL: [RLoad; 4] = [Self::R10, Self::R33, Self::R50, Self::R100];

    /// Load resistance in ohms.
    pub fn ohms(self) -> f32 {
        match self {
            Self::R10 => 10.0,
            Self::R33 => 33.0,
            Self::R50 => 50.0,
            Self::R100 => 100.0,
        }
    }
}

impl From<RLoad> for u8 {
    fn from(value: RLoad) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for RLoad {
    type Error = InvalidConfigValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        code_to_field(value, RLOAD_BITS)
            .and_then(|ordinal| Self::ALL.get(usize::from(ordinal)).copied())
            .ok_or(InvalidConfigValue::new(Setting::RLoad, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_codes_match_register_layout() {
        let codes = [0x00, 0x04, 0x08, 0x0C, 0x10, 0x14, 0x18, 0x1C];
        for (gain, code) in TiaGain::ALL.into_iter().zip(codes) {
            assert_eq!(u8::from(gain), code);
            assert_eq!(TiaGain::try_from(code), Ok(gain));
        }
    }

    #[test]
    fn gain_rejects_codes_outside_field() {
        for code in [0x01, 0x03, 0x1E, 0x20, 0x80, 0xFF] {
            assert_eq!(
                TiaGain::try_from(code),
                Err(InvalidConfigValue::new(Setting::TiaGain, code))
            );
        }
    }

    #[test]
    fn gain_ohms_follow_table() {
        assert_eq!(TiaGain::External.ohms(), None);
        assert_eq!(TiaGain::R2k75.ohms(), Some(2_750.0));
        assert_eq!(TiaGain::R35k.ohms(), Some(35_000.0));
        assert_eq!(TiaGain::R350k.ohms(), Some(350_000.0));
    }

    #[test]
    fn rload_codes() {
        assert_eq!(u8::from(RLoad::R50), 0x02);
        assert_eq!(RLoad::try_from(0x01), Ok(RLoad::R33));
        assert!(RLoad::try_from(0x04).is_err());
        assert_eq!(RLoad::default(), RLoad::R100);
    }
}
