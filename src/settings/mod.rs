//! Typed values for each configurable field of the LMP91000.
//!
//! Each setting converts into its raw code with `u8::from`, in its register bit
//! position, and raw codes convert back with `TryFrom<u8>`. Codes outside the legal
//! set are rejected with [`InvalidConfigValue`] rather than clamped.
//!
//! The `Default` of each type is the chip's power-on value.
//!
//! [`InvalidConfigValue`]: crate::InvalidConfigValue

mod mode;
mod reference;
mod tia;

pub use mode::{FetShort, OperatingMode};
pub use reference::{BIAS_FRACTION, Bias, BiasSign, INT_Z_FRACTION, InternalZero, RefSource};
pub use tia::{RLoad, TIA_GAIN_OHMS, TiaGain};

use crate::error::InvalidConfigValue;
use crate::registers::{WRITE_LOCK, WRITE_UNLOCK};

/// Names of the configurable fields, used to report invalid codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Setting {
    /// TIACN gain, bits 2-4.
    TiaGain,
    /// TIACN load resistance, bits 0-1.
    RLoad,
    /// REFCN reference source, bit 7.
    RefSource,
    /// REFCN internal zero, bits 5-6.
    InternalZero,
    /// REFCN bias polarity, bit 4.
    BiasSign,
    /// REFCN bias percentage, bits 0-3.
    Bias,
    /// MODECN FET short, bit 7.
    FetShort,
    /// MODECN operating mode, bits 0-2.
    OperatingMode,
    /// LOCK register.
    Lock,
}

/// Write-protection state of TIACN and REFCN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockState {
    /// TIACN and REFCN accept writes.
    Unlocked,
    /// TIACN and REFCN are read-only.
    #[default]
    Locked,
}

impl From<LockState> for u8 {
    fn from(value: LockState) -> Self {
        match value {
            LockState::Unlocked => WRITE_UNLOCK,
            LockState::Locked => WRITE_LOCK,
        }
    }
}

impl TryFrom<u8> for LockState {
    type Error = InvalidConfigValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            WRITE_UNLOCK => Ok(Self::Unlocked),
            WRITE_LOCK => Ok(Self::Locked),
            _ => Err(InvalidConfigValue::new(Setting::Lock, value)),
        }
    }
}

/// Look up a shifted field value from a raw code.
///
/// Returns `None` if the code has bits set outside the field.
pub(crate) fn code_to_field(code: u8, bits: core::ops::RangeInclusive<usize>) -> Option<u8> {
    let (start, end) = (*bits.start(), *bits.end());
    let mask = (0xFFu8 >> (7 - (end - start))) << start;
    (code & !mask == 0).then_some(code >> start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::{BIAS_BITS, INT_Z_BITS, TIA_GAIN_BITS};

    #[test]
    fn code_to_field_masks_other_bits() {
        assert_eq!(code_to_field(0x1C, TIA_GAIN_BITS), Some(7));
        assert_eq!(code_to_field(0x1D, TIA_GAIN_BITS), None);
        assert_eq!(code_to_field(0x20, TIA_GAIN_BITS), None);
        assert_eq!(code_to_field(0x60, INT_Z_BITS), Some(3));
        assert_eq!(code_to_field(0x0F, BIAS_BITS), Some(15));
        assert_eq!(code_to_field(0x10, BIAS_BITS), None);
    }

    #[test]
    fn lock_state_codes() {
        assert_eq!(u8::from(LockState::Locked), 0x01);
        assert_eq!(u8::from(LockState::Unlocked), 0x00);
        assert_eq!(LockState::try_from(0x01), Ok(LockState::Locked));
        assert_eq!(
            LockState::try_from(0x02),
            Err(InvalidConfigValue::new(Setting::Lock, 0x02))
        );
        assert_eq!(LockState::default(), LockState::Locked);
    }
}
