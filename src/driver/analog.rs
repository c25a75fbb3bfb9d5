use super::Lmp91000;
use crate::analog::{self, AnalogRead};

impl<I2C, MENB> Lmp91000<I2C, MENB> {
    /// Sample VOUT on `pin` with the given ADC, returning the raw code.
    ///
    /// No register access. The ADC error is returned as-is.
    pub fn output<A: AnalogRead>(&self, adc: &mut A, pin: u8) -> Result<u16, A::Error> {
        adc.analog_read(pin)
    }

    /// Convert an ADC code into a voltage in the unit of `adc_ref`.
    ///
    /// See [`analog::voltage`].
    pub fn voltage(&self, adc_code: u16, adc_ref: f32, adc_bits: u8) -> f32 {
        analog::voltage(adc_code, adc_ref, adc_bits)
    }

    /// Convert an ADC code into the cell current using the cached gain.
    ///
    /// The result is in the unit of `adc_ref` per ohm (amps for volts). Returns
    /// `None` when no internal gain is cached, either because the gain is
    /// [`TiaGain::External`] or because it was never set through this driver; use
    /// [`Lmp91000::current_with_external_gain`] then.
    ///
    /// [`TiaGain::External`]: crate::settings::TiaGain::External
    pub fn current(&self, adc_code: u16, adc_ref: f32, adc_bits: u8) -> Option<f32> {
        let gain = self.shadow.gain_ohms()?;
        Some(analog::current(self.voltage(adc_code, adc_ref, adc_bits), gain))
    }

    /// Convert an ADC code into the cell current through an external feedback
    /// resistor of `ext_gain` ohms.
    ///
    /// The cached gain is ignored.
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
    ///
    /// `adc_ref` must be in volts. The chip must already be in one of the
    /// temperature measurement modes, see
    /// [`OperatingMode::TemperatureTiaOn`](crate::settings::OperatingMode::TemperatureTiaOn).
    pub fn temperature<A: AnalogRead>(
        &self,
        adc: &mut A,
        pin: u8,
        adc_ref: f32,
        adc_bits: u8,
    ) -> Result<f32, A::Error> {
        let code = self.output(adc, pin)?;
        let millivolts = self.voltage(code, adc_ref, adc_bits) * 1000.0;
        Ok(analog::temperature_from_millivolts(millivolts))
    }
}
