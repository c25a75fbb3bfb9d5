use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;

use super::Lmp91000;
use crate::error::Error;
use crate::registers::{
    BIAS_BITS, BIAS_SIGN_BIT, INT_Z_BITS, REF_SOURCE_BIT, Register, merge_bit, merge_field,
};
use crate::settings::{Bias, BiasSign, InternalZero, RefSource};

impl<I2C, MENB> Lmp91000<I2C, MENB>
where
    I2C: I2c,
    MENB: OutputPin,
{
    /// Select the reference voltage source, keeping the rest of REFCN.
    ///
    /// Like every REFCN setter, the chip must be unlocked first.
    pub fn set_ref_source(&mut self, source: RefSource) -> Result<(), Error<I2C::Error>> {
        self.modify(Register::RefControl, |b| {
            merge_bit(b, REF_SOURCE_BIT, source.into())
        })
    }

    /// Use the supply voltage as the reference.
    pub fn set_int_ref_source(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_ref_source(RefSource::Internal)
    }

    /// Use the voltage on VREF as the reference.
    pub fn set_ext_ref_source(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_ref_source(RefSource::External)
    }

    /// Set the internal zero of the TIA.
    ///
    /// The cached zero returned by [`Lmp91000::int_z`] is updated once the write
    /// succeeds.
    pub fn set_int_z(&mut self, int_z: InternalZero) -> Result<(), Error<I2C::Error>> {
        self.modify(Register::RefControl, |b| {
            merge_field(b, INT_Z_BITS, int_z.ordinal())
        })?;
        self.shadow.int_z = Some(int_z);
        Ok(())
    }

    /// Internal zero as a fraction of the reference, from the cached setting.
    ///
    /// Returns `None` if the zero is bypassed or has not been set through this
    /// driver. The chip is not read.
    pub fn int_z(&self) -> Option<f32> {
        self.shadow.int_z_fraction()
    }

    /// Cached internal zero setting, if one has been written through this driver.
    pub fn int_z_setting(&self) -> Option<InternalZero> {
        self.shadow.int_z
    }

    /// Set the polarity of the cell bias.
    pub fn set_bias_sign(&mut self, sign: BiasSign) -> Result<(), Error<I2C::Error>> {
        self.modify(Register::RefControl, |b| {
            merge_bit(b, BIAS_SIGN_BIT, sign.into())
        })
    }

    /// Bias the working electrode below the reference electrode.
    pub fn set_neg_bias(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_bias_sign(BiasSign::Negative)
    }

    /// Bias the working electrode above the reference electrode.
    pub fn set_pos_bias(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_bias_sign(BiasSign::Positive)
    }

    /// Set the magnitude of the cell bias.
    pub fn set_bias(&mut self, bias: Bias) -> Result<(), Error<I2C::Error>> {
        self.modify(Register::RefControl, |b| {
            merge_field(b, BIAS_BITS, bias.ordinal())
        })
    }
}
