//! Async driver for the LMP91000.
//!
//! [`Lmp91000`] mirrors the blocking [`crate::Lmp91000`] method for method, over
//! [`embedded_hal_async::i2c::I2c`]. The MENB pin is still a blocking
//! [`OutputPin`], as setting a GPIO level does not wait on anything.
//!
//! The same caveats apply: TIACN and REFCN must be unlocked before they are
//! written, and [`Lmp91000::gain`] and [`Lmp91000::int_z`] return cached values.

use bit_field::BitField;
use embedded_hal::digital::{Error as _, OutputPin};
use embedded_hal::i2c::{self, Error as _};
use embedded_hal_async::i2c::I2c;

use crate::analog::{self, AsyncAnalogRead};
use crate::config::{Configuration, ModeControl, RefControl, TiaControl};
use crate::driver::Shadow;
use crate::error::Error;
use crate::registers::{
    BIAS_BITS, BIAS_SIGN_BIT, FET_SHORT_BIT, I2C_ADDRESS, INT_Z_BITS, OP_MODE_BITS,
    REF_SOURCE_BIT, RLOAD_BITS, Register, STATUS_READY_BIT, TIA_GAIN_BITS, WRITE_LOCK, merge_bit,
    merge_field,
};
use crate::settings::{
    Bias, BiasSign, FetShort, InternalZero, LockState, OperatingMode, RLoad, RefSource, TiaGain,
};

/// Async driver for the LMP91000.
///
/// See [`crate::Lmp91000`] for usage notes.
#[derive(Debug)]
pub struct Lmp91000<I2C, MENB> {
    i2c: I2C,
    menb: MENB,
    temp_sensor: Option<u8>,
    shadow: Shadow,
}

impl<I2C, MENB> Lmp91000<I2C, MENB> {
    /// Create a driver from an async I2C bus and the pin wired to MENB.
    pub fn new(i2c: I2C, menb: MENB) -> Self {
        Self {
            i2c,
            menb,
            temp_sensor: None,
            shadow: Shadow::default(),
        }
    }

    /// Destroy the driver, returning the bus and the MENB pin.
    pub fn release(self) -> (I2C, MENB) {
        (self.i2c, self.menb)
    }

    /// Mutable access to the MENB pin.
    pub fn menb_mut(&mut self) -> &mut MENB {
        &mut self.menb
    }

    /// Remember the ADC pin wired to VOUT. Not used by the driver itself; pass it
    /// to [`Lmp91000::temperature`].
    pub fn set_temp_sensor(&mut self, pin: u8) {
        self.temp_sensor = Some(pin);
    }

    /// Pin set with [`Lmp91000::set_temp_sensor`], if any.
    pub fn temp_sensor(&self) -> Option<u8> {
        self.temp_sensor
    }

    /// Feedback resistance in ohms from the cached gain setting.
    pub fn gain(&self) -> Option<f32> {
        self.shadow.gain_ohms()
    }

    /// Cached gain setting.
    pub fn gain_setting(&self) -> Option<TiaGain> {
        self.shadow.gain
    }

    /// Internal zero as a fraction of the reference, from the cached setting.
    pub fn int_z(&self) -> Option<f32> {
        self.shadow.int_z_fraction()
    }

    /// Cached internal zero setting.
    pub fn int_z_setting(&self) -> Option<InternalZero> {
        self.shadow.int_z
    }

    /// Sample VOUT on `pin` with the given ADC, returning the raw code.
    pub async fn output<A: AsyncAnalogRead>(
        &self,
        adc: &mut A,
        pin: u8,
    ) -> Result<u16, A::Error> {
        adc.analog_read(pin).await
    }

    /// Convert an ADC code into a voltage in the unit of `adc_ref`.
    pub fn voltage(&self, adc_code: u16, adc_ref: f32, adc_bits: u8) -> f32 {
        analog::voltage(adc_code, adc_ref, adc_bits)
    }

    /// Convert an ADC code into the cell current using the cached gain.
    pub fn current(&self, adc_code: u16, adc_ref: f32, adc_bits: u8) -> Option<f32> {
        let gain = self.shadow.gain_ohms()?;
        Some(analog::current(self.voltage(adc_code, adc_ref, adc_bits), gain))
    }

    /// Convert an ADC code into the cell current through an external resistor.
    pub fn current_with_external_gain(
        &self,
        adc_code: u16,
        adc_ref: f32,
        adc_bits: u8,
        ext_gain: f32,
    ) -> f32 {
        analog::current(self.voltage(adc_code, adc_ref, adc_bits), ext_gain)
    }

    /// Sample the temperature sensor output on `pin` and convert it into °C.
    pub async fn temperature<A: AsyncAnalogRead>(
        &self,
        adc: &mut A,
        pin: u8,
        adc_ref: f32,
        adc_bits: u8,
    ) -> Result<f32, A::Error> {
        let code = self.output(adc, pin).await?;
        let millivolts = self.voltage(code, adc_ref, adc_bits) * 1000.0;
        Ok(analog::temperature_from_millivolts(millivolts))
    }
}

impl<I2C, MENB> Lmp91000<I2C, MENB>
where
    I2C: I2c,
    MENB: OutputPin,
{
    /// Read a register.
    pub async fn read(&mut self, register: Register) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(I2C_ADDRESS, &[register.address()], &mut buf)
            .await
            .map_err(Error::I2c)?;
        trace!("read {} = {=u8:#x}", register, buf[0]);
        Ok(buf[0])
    }

    /// Write a register.
    pub async fn write(&mut self, register: Register, data: u8) -> Result<(), Error<I2C::Error>> {
        trace!("write {} = {=u8:#x}", register, data);
        self.i2c
            .write(I2C_ADDRESS, &[register.address(), data])
            .await
            .map_err(Error::I2c)
    }

    async fn modify(
        &mut self,
        register: Register,
        f: impl FnOnce(u8) -> u8,
    ) -> Result<(), Error<I2C::Error>> {
        let current = self.read(register).await?;
        self.write(register, f(current)).await
    }

    /// Enable the I2C interface of the chip by driving MENB low.
    pub fn enable(&mut self) -> Result<(), Error<I2C::Error>> {
        self.menb.set_low().map_err(|e| Error::Pin(e.kind()))
    }

    /// Disable the I2C interface of the chip by driving MENB high.
    pub fn disable(&mut self) -> Result<(), Error<I2C::Error>> {
        self.menb.set_high().map_err(|e| Error::Pin(e.kind()))
    }

    /// Check the STATUS register for the ready flag. Known to be unreliable.
    pub async fn is_ready(&mut self) -> Result<bool, Error<I2C::Error>> {
        let status = self.read(Register::Status).await?;
        Ok(status.get_bit(STATUS_READY_BIT))
    }

    /// Check that an LMP91000 answers on the bus and reports ready.
    pub async fn probe(&mut self) -> Result<(), Error<I2C::Error>> {
        match self.is_ready().await {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!("LMP91000 not ready");
                Err(Error::NotPresent)
            }
            Err(Error::I2c(e)) if matches!(e.kind(), i2c::ErrorKind::NoAcknowledge(_)) => {
                warn!("LMP91000 did not acknowledge");
                Err(Error::NotPresent)
            }
            Err(e) => Err(e),
        }
    }

    /// Write-protect TIACN and REFCN.
    pub async fn lock(&mut self) -> Result<(), Error<I2C::Error>> {
        debug!("lock");
        self.write(Register::Lock, LockState::Locked.into()).await
    }

    /// Allow writes to TIACN and REFCN.
    pub async fn unlock(&mut self) -> Result<(), Error<I2C::Error>> {
        debug!("unlock");
        self.write(Register::Lock, LockState::Unlocked.into()).await
    }

    /// Read the write-protection state.
    pub async fn lock_state(&mut self) -> Result<LockState, Error<I2C::Error>> {
        let lock = self.read(Register::Lock).await?;
        Ok(if lock == WRITE_LOCK {
            LockState::Locked
        } else {
            LockState::Unlocked
        })
    }

    /// True if TIACN and REFCN are write-protected.
    pub async fn is_locked(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.lock_state().await? == LockState::Locked)
    }

    /// Apply a set of changes. See [`crate::Lmp91000::configure`].
    pub async fn configure(&mut self, config: &Configuration) -> Result<(), Error<I2C::Error>> {
        debug!("configure {}", config);
        if config.changes_tia_control() || config.changes_ref_control() {
            self.unlock().await?;
            if config.changes_tia_control() {
                self.modify(Register::TiaControl, |b| config.apply_to_tia_control(b))
                    .await?;
                self.shadow.record_gain(config);
            }
            if config.changes_ref_control() {
                self.modify(Register::RefControl, |b| config.apply_to_ref_control(b))
                    .await?;
                self.shadow.record_int_z(config);
            }
            self.lock().await?;
        }
        if config.changes_mode_control() {
            self.modify(Register::ModeControl, |b| config.apply_to_mode_control(b))
                .await?;
        }
        Ok(())
    }

    /// Read and decode TIACN from the chip.
    pub async fn read_tia_control(&mut self) -> Result<TiaControl, Error<I2C::Error>> {
        Ok(TiaControl::from_byte(self.read(Register::TiaControl).await?))
    }

    /// Read and decode REFCN from the chip.
    pub async fn read_ref_control(&mut self) -> Result<RefControl, Error<I2C::Error>> {
        Ok(RefControl::try_from_byte(self.read(Register::RefControl).await?)?)
    }

    /// Read and decode MODECN from the chip.
    pub async fn read_mode_control(&mut self) -> Result<ModeControl, Error<I2C::Error>> {
        Ok(ModeControl::try_from_byte(self.read(Register::ModeControl).await?)?)
    }

    /// Set the TIA feedback resistance, keeping the load bits.
    pub async fn set_gain(&mut self, gain: TiaGain) -> Result<(), Error<I2C::Error>> {
        self.modify(Register::TiaControl, |b| {
            merge_field(b, TIA_GAIN_BITS, gain.ordinal())
        })
        .await?;
        self.shadow.gain = Some(gain);
        Ok(())
    }

    /// Set the load resistance, keeping the gain bits.
    pub async fn set_rload(&mut self, load: RLoad) -> Result<(), Error<I2C::Error>> {
        self.modify(Register::TiaControl, |b| merge_field(b, RLOAD_BITS, load.into()))
            .await
    }

    /// Select the reference voltage source.
    pub async fn set_ref_source(&mut self, source: RefSource) -> Result<(), Error<I2C::Error>> {
        self.modify(Register::RefControl, |b| {
            merge_bit(b, REF_SOURCE_BIT, source.into())
        })
        .await
    }

    /// Use the supply voltage as the reference.
    pub async fn set_int_ref_source(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_ref_source(RefSource::Internal).await
    }

    /// Use the voltage on VREF as the reference.
    pub async fn set_ext_ref_source(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_ref_source(RefSource::External).await
    }

    /// Set the internal zero of the TIA.
    pub async fn set_int_z(&mut self, int_z: InternalZero) -> Result<(), Error<I2C::Error>> {
        self.modify(Register::RefControl, |b| {
            merge_field(b, INT_Z_BITS, int_z.ordinal())
        })
        .await?;
        self.shadow.int_z = Some(int_z);
        Ok(())
    }

    /// Set the polarity of the cell bias.
    pub async fn set_bias_sign(&mut self, sign: BiasSign) -> Result<(), Error<I2C::Error>> {
        self.modify(Register::RefControl, |b| {
            merge_bit(b, BIAS_SIGN_BIT, sign.into())
        })
        .await
    }

    /// Bias the working electrode below the reference electrode.
    pub async fn set_neg_bias(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_bias_sign(BiasSign::Negative).await
    }

    /// Bias the working electrode above the reference electrode.
    pub async fn set_pos_bias(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_bias_sign(BiasSign::Positive).await
    }

    /// Set the magnitude of the cell bias.
    pub async fn set_bias(&mut self, bias: Bias) -> Result<(), Error<I2C::Error>> {
        self.modify(Register::RefControl, |b| {
            merge_field(b, BIAS_BITS, bias.ordinal())
        })
        .await
    }

    /// Open or close the FET shorting the working and reference electrodes.
    pub async fn set_fet(&mut self, selection: FetShort) -> Result<(), Error<I2C::Error>> {
        self.modify(Register::ModeControl, |b| {
            merge_bit(b, FET_SHORT_BIT, selection.into())
        })
        .await
    }

    /// Open the shorting FET.
    pub async fn disable_fet(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_fet(FetShort::Disabled).await
    }

    /// Close the shorting FET.
    pub async fn enable_fet(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_fet(FetShort::Enabled).await
    }

    /// Set the operating mode, keeping the FET short setting.
    pub async fn set_mode(&mut self, mode: OperatingMode) -> Result<(), Error<I2C::Error>> {
        debug!("mode {}", mode);
        self.modify(Register::ModeControl, |b| merge_field(b, OP_MODE_BITS, mode.into()))
            .await
    }

    /// Enter deep sleep.
    pub async fn sleep(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_mode(OperatingMode::DeepSleep).await
    }

    /// Configure for a 2-lead ground-referred galvanic cell.
    pub async fn set_two_lead(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_mode(OperatingMode::Galvanic).await
    }

    /// Enter standby.
    pub async fn standby(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_mode(OperatingMode::Standby).await
    }

    /// Configure for a 3-lead amperometric cell.
    pub async fn set_three_lead(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_mode(OperatingMode::Amperometric).await
    }

    /// Start measuring the cell current (3-lead amperometric mode).
    pub async fn measure_cell(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_mode(OperatingMode::Amperometric).await
    }
}
