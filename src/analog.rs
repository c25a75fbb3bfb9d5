//! Reading the LMP91000 outputs through an external ADC.
//!
//! The LMP91000 has no converter of its own. VOUT carries either the TIA output or,
//! in the temperature measurement modes, the internal temperature sensor. Both are
//! sampled by an ADC supplied by the caller through [`AnalogRead`].

/// Temperature sensor output in millivolts at 0°C.
pub const TEMP_INTERCEPT_MV: f32 = 1555.0;

/// Temperature sensor slope in millivolts per °C.
pub const TEMP_SLOPE_MV_PER_C: f32 = -8.0;

/// Blocking single-channel analog input.
///
/// `pin` is whatever identifies the channel to the implementor, typically the pin
/// number VOUT is wired to.
pub trait AnalogRead {
    /// Error type of the ADC.
    type Error;

    /// Take one sample from `pin`, returning the raw unsigned code.
    fn analog_read(&mut self, pin: u8) -> Result<u16, Self::Error>;
}

/// Async single-channel analog input.
#[cfg(feature = "async")]
#[allow(async_fn_in_trait)]
pub trait AsyncAnalogRead {
    /// Error type of the ADC.
    type Error;

    /// Take one sample from `pin`, returning the raw unsigned code.
    async fn analog_read(&mut self, pin: u8) -> Result<u16, Self::Error>;
}

/// Convert an ADC code into a voltage.
///
/// The result is in the unit of `adc_ref`. `adc_bits` is clamped to `1..=16`, the
/// widths a `u16` code can carry. The code is scaled before multiplying so that a
/// full-scale code returns exactly `adc_ref`.
pub fn voltage(adc_code: u16, adc_ref: f32, adc_bits: u8) -> f32 {
    let full_scale = ((1u32 << adc_bits.clamp(1, 16)) - 1) as f32;
    f32::from(adc_code) / full_scale * adc_ref
}

/// Convert the temperature sensor output into °C.
///
/// Applies the fixed linear model of the sensor, `(mV - 1555) / -8`.
pub fn temperature_from_millivolts(millivolts: f32) -> f32 {
    (millivolts - TEMP_INTERCEPT_MV) / TEMP_SLOPE_MV_PER_C
}

/// Convert a VOUT voltage into the cell current through a feedback resistance.
pub(crate) fn current(volts: f32, gain_ohms: f32) -> f32 {
    volts / gain_ohms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voltage_endpoints() {
        for (adc_ref, adc_bits) in [(3.3, 10), (5.0, 12), (2.048, 16), (1.1, 1)] {
            let full_scale = ((1u32 << adc_bits) - 1) as u16;
            assert_eq!(voltage(0, adc_ref, adc_bits), 0.0);
            assert_eq!(voltage(full_scale, adc_ref, adc_bits), adc_ref);
        }
    }

    #[test]
    fn voltage_midscale() {
        assert!((voltage(512, 1023.0, 10) - 512.0).abs() < 1e-3);
        assert!((voltage(2048, 4.095, 12) - 2.048).abs() < 1e-5);
    }

    #[test]
    fn voltage_clamps_bit_width() {
        assert_eq!(voltage(u16::MAX, 3.3, 24), 3.3);
        assert_eq!(voltage(1, 3.3, 0), 3.3);
    }

    #[test]
    fn temperature_model() {
        assert_eq!(temperature_from_millivolts(1555.0), 0.0);
        assert_eq!(temperature_from_millivolts(1395.0), 20.0);
        assert_eq!(temperature_from_millivolts(1715.0), -20.0);
        assert_eq!(temperature_from_millivolts(1875.0), -40.0);
    }
}
