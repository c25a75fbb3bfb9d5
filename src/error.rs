use embedded_hal::digital;

use crate::settings::Setting;

/// Wrapper for problems when communicating with the LMP91000.
///
/// `E` is the error type of the I2C bus the driver was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The I2C bus reported a failure (NACK, arbitration loss, timeout...).
    ///
    /// The state of the register being accessed is unknown afterwards. The driver
    /// does not retry.
    I2c(E),
    /// A setting code was outside its legal set.
    ///
    /// When this is returned by a setter, no register was written and the cached
    /// gain and zero settings are unchanged.
    InvalidConfigValue(InvalidConfigValue),
    /// The LMP91000 did not acknowledge its address or did not report ready.
    NotPresent,
    /// Driving the MENB (module enable) pin failed.
    Pin(digital::ErrorKind),
}

#[doc(hidden)]
impl<E> From<InvalidConfigValue> for Error<E> {
    fn from(value: InvalidConfigValue) -> Self {
        Self::InvalidConfigValue(value)
    }
}

/// A raw code that does not correspond to any value of a chip setting.
///
/// Returned by the `TryFrom<u8>` conversions of the types in [`settings`], and
/// when a register read back from the chip holds a reserved bit pattern.
///
/// [`settings`]: crate::settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidConfigValue {
    /// Setting the code was meant for.
    pub setting: Setting,
    /// The rejected code.
    pub value: u8,
}

impl InvalidConfigValue {
    pub(crate) fn new(setting: Setting, value: u8) -> Self {
        Self { setting, value }
    }
}

impl core::fmt::Display for InvalidConfigValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "invalid {:?} code {:#04x}", self.setting, self.value)
    }
}
