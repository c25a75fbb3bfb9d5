//! Whole-register views and batched configuration changes.

use crate::error::InvalidConfigValue;
use crate::registers::{
    BIAS_BITS, BIAS_SIGN_BIT, FET_SHORT_BIT, INT_Z_BITS, OP_MODE_BITS, REF_SOURCE_BIT, RLOAD_BITS,
    TIA_GAIN_BITS, field, merge_bit, merge_field,
};
use crate::settings::{
    Bias, BiasSign, FetShort, InternalZero, OperatingMode, RLoad, RefSource, Setting, TiaGain,
};

/// Contents of the TIACN register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TiaControl {
    /// TIA feedback resistance.
    pub gain: TiaGain,
    /// Load resistance.
    pub rload: RLoad,
}

impl TiaControl {
    /// Decode a TIACN byte. Bits 5-7 are reserved and ignored.
    pub fn from_byte(byte: u8) -> Self {
        // Both fields use every bit pattern, so decoding cannot fail.
        let gain = TiaGain::from_ordinal(field(byte, TIA_GAIN_BITS)).unwrap_or_default();
        let rload = RLoad::ALL[usize::from(field(byte, RLOAD_BITS))];
        Self { gain, rload }
    }

    /// Encode as a TIACN byte, reserved bits cleared.
    pub fn to_byte(&self) -> u8 {
        self.apply_to_byte(0)
    }

    /// Merge these settings into an existing TIACN byte.
    pub fn apply_to_byte(&self, byte: u8) -> u8 {
        let byte = merge_field(byte, TIA_GAIN_BITS, self.gain.ordinal());
        merge_field(byte, RLOAD_BITS, self.rload.into())
    }
}

/// Contents of the REFCN register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefControl {
    /// Reference voltage source.
    pub source: RefSource,
    /// Internal zero.
    pub int_z: InternalZero,
    /// Bias polarity.
    pub bias_sign: BiasSign,
    /// Bias magnitude.
    pub bias: Bias,
}

impl RefControl {
    /// Decode a REFCN byte.
    ///
    /// # Errors
    ///
    /// Fails if the bias field holds one of the reserved values 14 or 15.
    pub fn try_from_byte(byte: u8) -> Result<Self, InvalidConfigValue> {
        let bias_bits = field(byte, BIAS_BITS);
        let bias = Bias::from_ordinal(bias_bits)
            .ok_or(InvalidConfigValue::new(Setting::Bias, bias_bits))?;
        Ok(Self {
            source: (byte & (1 << REF_SOURCE_BIT) != 0).into(),
            int_z: InternalZero::ALL[usize::from(field(byte, INT_Z_BITS))],
            bias_sign: (byte & (1 << BIAS_SIGN_BIT) != 0).into(),
            bias,
        })
    }

    /// Encode as a REFCN byte.
    pub fn to_byte(&self) -> u8 {
        self.apply_to_byte(0)
    }

    /// Merge these settings into an existing REFCN byte.
    pub fn apply_to_byte(&self, byte: u8) -> u8 {
        let byte = merge_bit(byte, REF_SOURCE_BIT, self.source.into());
        let byte = merge_field(byte, INT_Z_BITS, self.int_z.ordinal());
        let byte = merge_bit(byte, BIAS_SIGN_BIT, self.bias_sign.into());
        merge_field(byte, BIAS_BITS, self.bias.ordinal())
    }
}

/// Contents of the MODECN register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeControl {
    /// Working electrode FET short.
    pub fet_short: FetShort,
    /// Operating mode.
    pub mode: OperatingMode,
}

impl ModeControl {
    /// Decode a MODECN byte.
    ///
    /// # Errors
    ///
    /// Fails if the mode field holds one of the reserved values 4 or 5.
    pub fn try_from_byte(byte: u8) -> Result<Self, InvalidConfigValue> {
        Ok(Self {
            fet_short: (byte & (1 << FET_SHORT_BIT) != 0).into(),
            mode: OperatingMode::try_from(field(byte, OP_MODE_BITS))?,
        })
    }

    /// Encode as a MODECN byte, reserved bits cleared.
    pub fn to_byte(&self) -> u8 {
        self.apply_to_byte(0)
    }

    /// Merge these settings into an existing MODECN byte.
    pub fn apply_to_byte(&self, byte: u8) -> u8 {
        let byte = merge_bit(byte, FET_SHORT_BIT, self.fet_short.into());
        merge_field(byte, OP_MODE_BITS, self.mode.into())
    }
}

/// Changes to apply to the LMP91000 in one go.
///
/// Fields left unset keep their current value on the chip. Apply with
/// [`Lmp91000::configure`], which takes care of unlocking the write-protected
/// registers and locking them again.
///
/// [`Lmp91000::configure`]: crate::Lmp91000::configure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration {
    gain: Option<TiaGain>,
    rload: Option<RLoad>,
    ref_source: Option<RefSource>,
    int_z: Option<InternalZero>,
    bias_sign: Option<BiasSign>,
    bias: Option<Bias>,
    fet_short: Option<FetShort>,
    mode: Option<OperatingMode>,
}

impl Configuration {
    /// Create an empty set of changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the TIA gain.
    pub fn with_gain(&mut self, gain: TiaGain) -> &mut Self {
        self.gain = Some(gain);
        self
    }

    /// Change the load resistance.
    pub fn with_rload(&mut self, rload: RLoad) -> &mut Self {
        self.rload = Some(rload);
        self
    }

    /// Change the reference source.
    pub fn with_ref_source(&mut self, source: RefSource) -> &mut Self {
        self.ref_source = Some(source);
        self
    }

    /// Change the internal zero.
    pub fn with_int_z(&mut self, int_z: InternalZero) -> &mut Self {
        self.int_z = Some(int_z);
        self
    }

    /// Change the bias polarity.
    pub fn with_bias_sign(&mut self, sign: BiasSign) -> &mut Self {
        self.bias_sign = Some(sign);
        self
    }

    /// Change the bias magnitude.
    pub fn with_bias(&mut self, bias: Bias) -> &mut Self {
        self.bias = Some(bias);
        self
    }

    /// Change the FET short.
    pub fn with_fet_short(&mut self, fet_short: FetShort) -> &mut Self {
        self.fet_short = Some(fet_short);
        self
    }

    /// Change the operating mode.
    pub fn with_mode(&mut self, mode: OperatingMode) -> &mut Self {
        self.mode = Some(mode);
        self
    }

    pub(crate) fn gain(&self) -> Option<TiaGain> {
        self.gain
    }

    pub(crate) fn int_z(&self) -> Option<InternalZero> {
        self.int_z
    }

    pub(crate) fn changes_tia_control(&self) -> bool {
        self.gain.is_some() || self.rload.is_some()
    }

    pub(crate) fn changes_ref_control(&self) -> bool {
        self.ref_source.is_some()
            || self.int_z.is_some()
            || self.bias_sign.is_some()
            || self.bias.is_some()
    }

    pub(crate) fn changes_mode_control(&self) -> bool {
        self.fet_short.is_some() || self.mode.is_some()
    }

    pub(crate) fn apply_to_tia_control(&self, mut byte: u8) -> u8 {
        if let Some(gain) = self.gain {
            byte = merge_field(byte, TIA_GAIN_BITS, gain.ordinal());
        }
        if let Some(rload) = self.rload {
            byte = merge_field(byte, RLOAD_BITS, rload.into());
        }
        byte
    }

    pub(crate) fn apply_to_ref_control(&self, mut byte: u8) -> u8 {
        if let Some(source) = self.ref_source {
            byte = merge_bit(byte, REF_SOURCE_BIT, source.into());
        }
        if let Some(int_z) = self.int_z {
            byte = merge_field(byte, INT_Z_BITS, int_z.ordinal());
        }
        if let Some(sign) = self.bias_sign {
            byte = merge_bit(byte, BIAS_SIGN_BIT, sign.into());
        }
        if let Some(bias) = self.bias {
            byte = merge_field(byte, BIAS_BITS, bias.ordinal());
        }
        byte
    }

    pub(crate) fn apply_to_mode_control(&self, mut byte: u8) -> u8 {
        if let Some(fet_short) = self.fet_short {
            byte = merge_bit(byte, FET_SHORT_BIT, fet_short.into());
        }
        if let Some(mode) = self.mode {
            byte = merge_field(byte, OP_MODE_BITS, mode.into());
        }
        byte
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tia_control_decodes_every_byte() {
        let tia = TiaControl::from_byte(0b1110_1101);
        assert_eq!(tia.gain, TiaGain::R7k);
        assert_eq!(tia.rload, RLoad::R33);
        assert_eq!(TiaControl::from_byte(0x03), TiaControl::default());
    }

    #[test]
    fn tia_control_preserves_reserved_bits() {
        let tia = TiaControl {
            gain: TiaGain::R350k,
            rload: RLoad::R10,
        };
        assert_eq!(tia.apply_to_byte(0b1110_0011), 0b1111_1100);
    }

    #[test]
    fn ref_control_decodes() {
        let refcn = RefControl::try_from_byte(0b1101_0101).unwrap();
        assert_eq!(refcn.source, RefSource::External);
        assert_eq!(refcn.int_z, InternalZero::Pct67);
        assert_eq!(refcn.bias_sign, BiasSign::Positive);
        assert_eq!(refcn.bias, Bias::Pct8);
        assert_eq!(refcn.apply_to_byte(0x00), 0b1101_0101);
        assert_eq!(RefControl::try_from_byte(0x20), Ok(RefControl::default()));
    }

    #[test]
    fn to_byte_encodes_power_on_defaults() {
        assert_eq!(TiaControl::default().to_byte(), 0x03);
        assert_eq!(RefControl::default().to_byte(), 0x20);
        assert_eq!(ModeControl::default().to_byte(), 0x00);
        let modecn = ModeControl {
            fet_short: FetShort::Enabled,
            mode: OperatingMode::TemperatureTiaOn,
        };
        assert_eq!(modecn.to_byte(), 0x87);
        assert_eq!(TiaControl::from_byte(0b1110_1101).to_byte(), 0b0000_1101);
    }

    #[test]
    fn ref_control_rejects_reserved_bias() {
        assert_eq!(
            RefControl::try_from_byte(0x2E),
            Err(InvalidConfigValue::new(Setting::Bias, 0x0E))
        );
    }

    #[test]
    fn mode_control_decodes() {
        let modecn = ModeControl::try_from_byte(0x83).unwrap();
        assert_eq!(modecn.fet_short, FetShort::Enabled);
        assert_eq!(modecn.mode, OperatingMode::Amperometric);
        assert!(ModeControl::try_from_byte(0x05).is_err());
    }

    #[test]
    fn configuration_only_touches_set_fields() {
        let mut cfg = Configuration::new();
        cfg.with_gain(TiaGain::R14k).with_bias(Bias::Pct2);
        assert!(cfg.changes_tia_control());
        assert!(cfg.changes_ref_control());
        assert!(!cfg.changes_mode_control());
        // RLoad bits kept.
        assert_eq!(cfg.apply_to_tia_control(0x02), 0x12);
        // Internal zero and sign kept, bias replaced.
        assert_eq!(cfg.apply_to_ref_control(0x3F), 0x32);
        assert_eq!(cfg.apply_to_mode_control(0x87), 0x87);
    }
}
