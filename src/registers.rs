//! LMP91000 register map and bitfield helpers.
//!
//! The chip exposes five single-byte registers. TIACN and REFCN are only writable
//! while the LOCK register is cleared; writes to them while locked are silently
//! ignored by the chip.
//!
//! # Datasheet
//!
//! See section 7.6 (Register Maps) of the LMP91000 datasheet.

use core::ops::RangeInclusive;

use bit_field::BitField;

/// Fixed 7-bit I2C address of the LMP91000.
pub const I2C_ADDRESS: u8 = 0x48;

/// LOCK value that write-protects TIACN and REFCN (power-on default).
pub const WRITE_LOCK: u8 = 0x01;
/// LOCK value that allows writes to TIACN and REFCN.
pub const WRITE_UNLOCK: u8 = 0x00;

/// Addressable registers of the LMP91000.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Read-only status register.
    Status = 0x00,
    /// Protection register, write-locks TIACN and REFCN.
    Lock = 0x01,
    /// Transimpedance amplifier control register.
    TiaControl = 0x10,
    /// Reference control register.
    RefControl = 0x11,
    /// Mode control register.
    ModeControl = 0x12,
}

impl Register {
    /// Register address on the chip.
    pub const fn address(self) -> u8 {
        self as u8
    }

    /// True if writes to this register are dropped while the chip is locked.
    pub const fn is_write_protected(self) -> bool {
        matches!(self, Register::TiaControl | Register::RefControl)
    }
}

// TIACN
pub(crate) const TIA_GAIN_BITS: RangeInclusive<usize> = 2..=4;
pub(crate) const RLOAD_BITS: RangeInclusive<usize> = 0..=1;

// REFCN
pub(crate) const REF_SOURCE_BIT: usize = 7;
pub(crate) const INT_Z_BITS: RangeInclusive<usize> = 5..=6;
pub(crate) const BIAS_SIGN_BIT: usize = 4;
pub(crate) const BIAS_BITS: RangeInclusive<usize> = 0..=3;

// MODECN
pub(crate) const FET_SHORT_BIT: usize = 7;
pub(crate) const OP_MODE_BITS: RangeInclusive<usize> = 0..=2;

// STATUS
pub(crate) const STATUS_READY_BIT: usize = 0;

/// Replace the bits of `byte` in `bits` with `value`, leaving all other bits alone.
///
/// `value` is the field value, not shifted into position.
///
/// # Panics
///
/// Panics if `value` does not fit in the field. The typed settings always fit.
pub(crate) fn merge_field(byte: u8, bits: RangeInclusive<usize>, value: u8) -> u8 {
    let mut merged = byte;
    merged.set_bits(bits, value);
    merged
}

/// Set or clear a single bit of `byte`.
pub(crate) fn merge_bit(byte: u8, bit: usize, value: bool) -> u8 {
    let mut merged = byte;
    merged.set_bit(bit, value);
    merged
}

/// Extract the field in `bits` from `byte`, shifted down to bit 0.
pub(crate) fn field(byte: u8, bits: RangeInclusive<usize>) -> u8 {
    byte.get_bits(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_replaces_only_the_field() {
        assert_eq!(merge_field(0b0000_0011, TIA_GAIN_BITS, 0b101), 0b0001_0111);
        assert_eq!(merge_field(0b1111_1111, TIA_GAIN_BITS, 0), 0b1110_0011);
        assert_eq!(merge_field(0b0001_1100, RLOAD_BITS, 0b10), 0b0001_1110);
        assert_eq!(merge_field(0b1010_0000, OP_MODE_BITS, 0b111), 0b1010_0111);
    }

    #[test]
    fn merge_bit_sets_and_clears() {
        assert_eq!(merge_bit(0b0110_0101, REF_SOURCE_BIT, true), 0b1110_0101);
        assert_eq!(merge_bit(0b1111_1111, BIAS_SIGN_BIT, false), 0b1110_1111);
    }

    #[test]
    fn field_extracts_shifted_value() {
        assert_eq!(field(0b0110_1011, INT_Z_BITS), 0b11);
        assert_eq!(field(0b0110_1011, BIAS_BITS), 0b1011);
        assert_eq!(field(0b0001_1101, TIA_GAIN_BITS), 0b111);
    }

    #[test]
    #[should_panic]
    fn merge_rejects_oversized_value() {
        merge_field(0, RLOAD_BITS, 0b100);
    }

    #[test]
    fn register_addresses() {
        assert_eq!(Register::Status.address(), 0x00);
        assert_eq!(Register::Lock.address(), 0x01);
        assert_eq!(Register::TiaControl.address(), 0x10);
        assert_eq!(Register::RefControl.address(), 0x11);
        assert_eq!(Register::ModeControl.address(), 0x12);
        assert!(Register::TiaControl.is_write_protected());
        assert!(!Register::ModeControl.is_write_protected());
    }
}
