use super::{Setting, code_to_field};
use crate::error::InvalidConfigValue;
use crate::registers::{FET_SHORT_BIT, OP_MODE_BITS};

/// Internal FET shorting the working and reference electrodes (MODECN bit 7).
///
/// Enable before deep sleep to keep the sensor biased at 0V while unpowered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FetShort {
    /// FET open.
    #[default]
    Disabled,
    /// FET closed.
    Enabled,
}

impl From<FetShort> for bool {
    fn from(value: FetShort) -> Self {
        matches!(value, FetShort::Enabled)
    }
}

impl From<bool> for FetShort {
    fn from(value: bool) -> Self {
        if value { Self::Enabled } else { Self::Disabled }
    }
}

impl From<FetShort> for u8 {
    fn from(value: FetShort) -> Self {
        u8::from(bool::from(value)) << FET_SHORT_BIT
    }
}

impl TryFrom<u8> for FetShort {
    type Error = InvalidConfigValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        code_to_field(value, FET_SHORT_BIT..=FET_SHORT_BIT)
            .map(|bit| Self::from(bit == 1))
            .ok_or(InvalidConfigValue::new(Setting::FetShort, value))
    }
}

/// Operating mode of the LMP91000 (MODECN bits 0-2).
///
/// Field values 4 and 5 are reserved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OperatingMode {
    /// Deep sleep.
    #[default]
    DeepSleep = 0x00,
    /// 2-lead ground-referred galvanic cell.
    Galvanic = 0x01,
    /// Standby.
    Standby = 0x02,
    /// 3-lead amperometric cell.
    Amperometric = 0x03,
    /// Temperature measurement with the TIA off.
    TemperatureTiaOff = 0x06,
    /// Temperature measurement with the TIA on.
    TemperatureTiaOn = 0x07,
}

impl From<OperatingMode> for u8 {
    fn from(value: OperatingMode) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for OperatingMode {
    type Error = InvalidConfigValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match code_to_field(value, OP_MODE_BITS) {
            Some(0x00) => Ok(Self::DeepSleep),
            Some(0x01) => Ok(Self::Galvanic),
            Some(0x02) => Ok(Self::Standby),
            Some(0x03) => Ok(Self::Amperometric),
            Some(0x06) => Ok(Self::TemperatureTiaOff),
            Some(0x07) => Ok(Self::TemperatureTiaOn),
            _ => Err(InvalidConfigValue::new(Setting::OperatingMode, value)),
        }
    }
}
