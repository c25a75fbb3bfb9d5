use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;

use super::Lmp91000;
use crate::error::Error;
use crate::registers::{FET_SHORT_BIT, OP_MODE_BITS, Register, merge_bit, merge_field};
use crate::settings::{FetShort, OperatingMode};

impl<I2C, MENB> Lmp91000<I2C, MENB>
where
    I2C: I2c,
    MENB: OutputPin,
{
    /// Open or close the FET shorting the working and reference electrodes.
    ///
    /// MODECN is not write-protected.
    pub fn set_fet(&mut self, selection: FetShort) -> Result<(), Error<I2C::Error>> {
        self.modify(Register::ModeControl, |b| {
            merge_bit(b, FET_SHORT_BIT, selection.into())
        })
    }

    /// Open the shorting FET.
    pub fn disable_fet(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_fet(FetShort::Disabled)
    }

    /// Close the shorting FET, typically before [`Lmp91000::sleep`].
    pub fn enable_fet(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_fet(FetShort::Enabled)
    }

    /// Set the operating mode, keeping the FET short setting.
    pub fn set_mode(&mut self, mode: OperatingMode) -> Result<(), Error<I2C::Error>> {
        debug!("mode {}", mode);
        self.modify(Register::ModeControl, |b| merge_field(b, OP_MODE_BITS, mode.into()))
    }

    /// Enter deep sleep.
    pub fn sleep(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_mode(OperatingMode::DeepSleep)
    }

    /// Configure for a 2-lead ground-referred galvanic cell.
    pub fn set_two_lead(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_mode(OperatingMode::Galvanic)
    }

    /// Enter standby.
    pub fn standby(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_mode(OperatingMode::Standby)
    }

    /// Configure for a 3-lead amperometric cell.
    pub fn set_three_lead(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_mode(OperatingMode::Amperometric)
    }

    /// Start measuring the cell current.
    ///
    /// Same as [`Lmp91000::set_three_lead`]: 3-lead amperometric mode.
    pub fn measure_cell(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_mode(OperatingMode::Amperometric)
    }
}
