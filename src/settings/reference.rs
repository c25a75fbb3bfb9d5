use super::{Setting, code_to_field};
use crate::error::InvalidConfigValue;
use crate::registers::{BIAS_BITS, BIAS_SIGN_BIT, INT_Z_BITS, REF_SOURCE_BIT};

/// Cell bias as a fraction of the reference voltage, indexed by bias ordinal.
pub const BIAS_FRACTION: [f32; 14] = [
    0.0, 0.01, 0.02, 0.04, 0.06, 0.08, 0.10, 0.12, 0.14, 0.16, 0.18, 0.20, 0.22, 0.24,
];

/// Internal zero as a fraction of the reference voltage, indexed by zero ordinal.
///
/// The bypass setting (ordinal 3) has no entry.
pub const INT_Z_FRACTION: [f32; 3] = [0.20, 0.50, 0.67];

/// Source of the reference voltage (REFCN bit 7).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefSource {
    /// Supply voltage.
    #[default]
    Internal,
    /// Voltage on the VREF pin.
    External,
}

impl From<RefSource> for bool {
    fn from(value: RefSource) -> Self {
        matches!(value, RefSource::External)
    }
}

impl From<bool> for RefSource {
    fn from(value: bool) -> Self {
        if value { Self::External } else { Self::Internal }
    }
}

impl From<RefSource> for u8 {
    fn from(value: RefSource) -> Self {
        u8::from(bool::from(value)) << REF_SOURCE_BIT
    }
}

impl TryFrom<u8> for RefSource {
    type Error = InvalidConfigValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        code_to_field(value, REF_SOURCE_BIT..=REF_SOURCE_BIT)
            .map(|bit| Self::from(bit == 1))
            .ok_or(InvalidConfigValue::new(Setting::RefSource, value))
    }
}

/// Internal zero of the TIA as a fraction of the reference (REFCN bits 5-6).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum InternalZero {
    /// 20% of the reference.
    Pct20 = 0,
    /// 50% of the reference.
    #[default]
    Pct50 = 1,
    /// 67% of the reference.
    Pct67 = 2,
    /// Internal zero circuitry bypassed.
    Bypass = 3,
}

impl InternalZero {
    /// All zero settings in ordinal order.
    pub const ALL: [InternalZero; 4] = [Self::Pct20, Self::Pct50, Self::Pct67, Self::Bypass];

    /// Position of this setting in the zero table, equal to the unshifted field.
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Setting for an unshifted field value.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(usize::from(ordinal)).copied()
    }

    /// Internal zero as a fraction of the reference, or `None` when bypassed.
    pub fn fraction(self) -> Option<f32> {
        INT_Z_FRACTION.get(usize::from(self.ordinal())).copied()
    }
}

impl From<InternalZero> for u8 {
    fn from(value: InternalZero) -> Self {
        value.ordinal() << INT_Z_BITS.start()
    }
}

impl TryFrom<u8> for InternalZero {
    type Error = InvalidConfigValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        code_to_field(value, INT_Z_BITS)
            .and_then(Self::from_ordinal)
            .ok_or(InvalidConfigValue::new(Setting::InternalZero, value))
    }
}

/// Polarity of the cell bias (REFCN bit 4).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BiasSign {
    /// Working electrode below the reference electrode.
    #[default]
    Negative,
    /// Working electrode above the reference electrode.
    Positive,
}

impl From<BiasSign> for bool {
    fn from(value: BiasSign) -> Self {
        matches!(value, BiasSign::Positive)
    }
}

impl From<bool> for BiasSign {
    fn from(value: bool) -> Self {
        if value { Self::Positive } else { Self::Negative }
    }
}

impl From<BiasSign> for u8 {
    fn from(value: BiasSign) -> Self {
        u8::from(bool::from(value)) << BIAS_SIGN_BIT
    }
}

impl TryFrom<u8> for BiasSign {
    type Error = InvalidConfigValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        code_to_field(value, BIAS_SIGN_BIT..=BIAS_SIGN_BIT)
            .map(|bit| Self::from(bit == 1))
            .ok_or(InvalidConfigValue::new(Setting::BiasSign, value))
    }
}

/// Cell bias as a percentage of the reference (REFCN bits 0-3).
///
/// Field values 14 and 15 are reserved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Bias {
    /// 0%
    #[default]
    Pct0 = 0,
    /// 1%
    Pct1 = 1,
    /// 2%
    Pct2 = 2,
    /// 4%
    Pct4 = 3,
    /// 6%
    Pct6 = 4,
    /// 8%
    Pct8 = 5,
    /// 10%
    Pct10 = 6,
    /// 12%
    Pct12 = 7,
    /// 14%
    Pct14 = 8,
    /// 16%
    Pct16 = 9,
    /// 18%
    Pct18 = 10,
    /// 20%
    Pct20 = 11,
    /// 22%
    Pct22 = 12,
    /// 24%
    Pct24 = 13,
}

impl Bias {
    /// All bias settings in ordinal order.
    pub const ALL: [Bias; 14] = [
        Self::Pct0,
        Self::Pct1,
        Self::Pct2,
        Self::Pct4,
        Self::Pct6,
        Self::Pct8,
        Self::Pct10,
        Self::Pct12,
        Self::Pct14,
        Self::Pct16,
        Self::Pct18,
        Self::Pct20,
        Self::Pct22,
        Self::Pct24,
    ];

    /// Position of this setting in the bias table, equal to the field value.
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Setting for a field value.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(usize::from(ordinal)).copied()
    }

    /// Bias as a fraction of the reference voltage.
    pub fn fraction(self) -> f32 {
        BIAS_FRACTION[usize::from(self.ordinal())]
    }
}

impl From<Bias> for u8 {
    fn from(value: Bias) -> Self {
        value.ordinal()
    }
}

impl TryFrom<u8> for Bias {
    type Error = InvalidConfigValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        code_to_field(value, BIAS_BITS)
            .and_then(Self::from_ordinal)
            .ok_or(InvalidConfigValue::new(Setting::Bias, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_source_codes() {
        assert_eq!(u8::from(RefSource::Internal), 0x00);
        assert_eq!(u8::from(RefSource::External), 0x80);
        assert_eq!(RefSource::try_from(0x80), Ok(RefSource::External));
        assert!(RefSource::try_from(0x40).is_err());
    }

    #[test]
    fn internal_zero_codes_and_fractions() {
        let codes = [0x00, 0x20, 0x40, 0x60];
        for (zero, code) in InternalZero::ALL.into_iter().zip(codes) {
            assert_eq!(u8::from(zero), code);
            assert_eq!(InternalZero::try_from(code), Ok(zero));
        }
        assert_eq!(InternalZero::Pct67.fraction(), Some(0.67));
        assert_eq!(InternalZero::Bypass.fraction(), None);
        assert!(InternalZero::try_from(0x10).is_err());
    }

    #[test]
    fn bias_sign_codes() {
        assert_eq!(u8::from(BiasSign::Positive), 0x10);
        assert_eq!(BiasSign::try_from(0x00), Ok(BiasSign::Negative));
        assert!(BiasSign::try_from(0x11).is_err());
    }

    #[test]
    fn bias_codes_and_fractions() {
        for (ordinal, bias) in Bias::ALL.into_iter().enumerate() {
            assert_eq!(usize::from(u8::from(bias)), ordinal);
            assert_eq!(bias.fraction(), BIAS_FRACTION[ordinal]);
        }
        assert_eq!(Bias::try_from(0x03), Ok(Bias::Pct4));
        assert_eq!(Bias::Pct24.fraction(), 0.24);
    }

    #[test]
    fn bias_rejects_reserved_codes() {
        for code in [0x0E, 0x0F, 0x10] {
            assert_eq!(
                Bias::try_from(code),
                Err(InvalidConfigValue::new(Setting::Bias, code))
            );
        }
    }
}
