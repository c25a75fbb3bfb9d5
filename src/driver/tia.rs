use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;

use super::Lmp91000;
use crate::error::Error;
use crate::registers::{RLOAD_BITS, Register, TIA_GAIN_BITS, merge_field};
use crate::settings::{RLoad, TiaGain};

impl<I2C, MENB> Lmp91000<I2C, MENB>
where
    I2C: I2c,
    MENB: OutputPin,
{
    /// Set the TIA feedback resistance.
    ///
    /// Only the gain bits of TIACN are changed; the load setting is kept. The chip
    /// must be unlocked first, otherwise the write is silently dropped (and the
    /// cached gain will disagree with the chip).
    ///
    /// The cached gain returned by [`Lmp91000::gain`] is updated once the write
    /// succeeds.
    ///
    /// # Datasheet
    ///
    /// See table 7-6 (TIACN) for the gain settings.
    pub fn set_gain(&mut self, gain: TiaGain) -> Result<(), Error<I2C::Error>> {
        self.modify(Register::TiaControl, |b| {
            merge_field(b, TIA_GAIN_BITS, gain.ordinal())
        })?;
        self.shadow.gain = Some(gain);
        Ok(())
    }

    /// Feedback resistance in ohms from the cached gain setting.
    ///
    /// Returns `None` if the gain is set to [`TiaGain::External`] or has not been
    /// set through this driver. The chip is not read; see the notes on
    /// [caching](Lmp91000#cached-settings).
    pub fn gain(&self) -> Option<f32> {
        self.shadow.gain_ohms()
    }

    /// Cached gain setting, if one has been written through this driver.
    pub fn gain_setting(&self) -> Option<TiaGain> {
        self.shadow.gain
    }

    /// Set the load resistance, keeping the gain bits of TIACN.
    ///
    /// The chip must be unlocked first.
    pub fn set_rload(&mut self, load: RLoad) -> Result<(), Error<I2C::Error>> {
        self.modify(Register::TiaControl, |b| merge_field(b, RLOAD_BITS, load.into()))
    }
}
