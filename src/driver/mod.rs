use bit_field::BitField;
use embedded_hal::digital::{Error as _, OutputPin};
use embedded_hal::i2c::{self, Error as _, I2c};

use crate::config::{Configuration, ModeControl, RefControl, TiaControl};
use crate::error::Error;
use crate::registers::{I2C_ADDRESS, Register, STATUS_READY_BIT, WRITE_LOCK};
use crate::settings::{InternalZero, LockState, TiaGain};

mod analog;
mod mode;
mod reference;
mod tia;

/// Driver for the LMP91000.
///
/// # Quick start
///
/// Create the driver with [`Lmp91000::new`], passing the I2C bus and the output pin
/// wired to MENB (module enable). Call [`Lmp91000::enable`] to bring the I2C
/// interface of the chip up, then configure it.
///
/// The TIACN and REFCN registers (gain, load, reference, bias) are write-protected
/// by default and silently ignore writes while locked. The driver does not check the
/// lock for you: call [`Lmp91000::unlock`] before changing those settings, and
/// [`Lmp91000::lock`] afterwards if you want them protected again.
/// [`Lmp91000::configure`] does this sequence for you.
///
/// ```
/// # use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
/// # use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
/// use lmp91000_hal::Lmp91000;
/// use lmp91000_hal::settings::{OperatingMode, TiaGain};
///
/// # let i2c = I2cMock::new(&[
/// #     I2cTransaction::write(0x48, vec![0x01, 0x00]),
/// #     I2cTransaction::write_read(0x48, vec![0x10], vec![0x03]),
/// #     I2cTransaction::write(0x48, vec![0x10, 0x0F]),
/// #     I2cTransaction::write(0x48, vec![0x01, 0x01]),
/// #     I2cTransaction::write_read(0x48, vec![0x12], vec![0x00]),
/// #     I2cTransaction::write(0x48, vec![0x12, 0x03]),
/// # ]);
/// # let menb = PinMock::new(&[PinTransaction::set(State::Low)]);
/// let mut afe = Lmp91000::new(i2c, menb);
/// afe.enable()?;
/// afe.unlock()?;
/// afe.set_gain(TiaGain::R7k)?;
/// afe.lock()?;
/// afe.set_mode(OperatingMode::Amperometric)?;
/// assert_eq!(afe.gain(), Some(7_000.0));
/// # let (mut i2c, mut menb) = afe.release();
/// # i2c.done();
/// # menb.done();
/// # Ok::<(), lmp91000_hal::Error<embedded_hal::i2c::ErrorKind>>(())
/// ```
///
/// # Cached settings
///
/// The driver keeps a copy of the last gain and internal zero it wrote, and
/// [`Lmp91000::gain`] and [`Lmp91000::int_z`] return that copy without reading the
/// chip. Changes made to the registers by other means (another driver instance, or
/// [`Lmp91000::write`]) are not reflected. Use [`Lmp91000::read_tia_control`] and
/// [`Lmp91000::read_ref_control`] to see what the chip actually holds.
///
/// The driver assumes it is the only user of the chip. Put it behind your own mutex
/// if several tasks need it.
#[derive(Debug)]
pub struct Lmp91000<I2C, MENB> {
    i2c: I2C,
    /// Module enable pin, active low.
    menb: MENB,
    /// Pin the ADC samples VOUT on for temperature readings.
    temp_sensor: Option<u8>,
    shadow: Shadow,
}

/// Last gain and internal zero written to the chip.
///
/// `None` until the corresponding setter succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Shadow {
    pub(crate) gain: Option<TiaGain>,
    pub(crate) int_z: Option<InternalZero>,
}

impl Shadow {
    pub(crate) fn gain_ohms(&self) -> Option<f32> {
        self.gain.and_then(TiaGain::ohms)
    }

    pub(crate) fn int_z_fraction(&self) -> Option<f32> {
        self.int_z.and_then(InternalZero::fraction)
    }

    /// Record the gain of a configuration once TIACN has been written.
    pub(crate) fn record_gain(&mut self, config: &Configuration) {
        if let Some(gain) = config.gain() {
            self.gain = Some(gain);
        }
    }

    /// Record the internal zero of a configuration once REFCN has been written.
    pub(crate) fn record_int_z(&mut self, config: &Configuration) {
        if let Some(int_z) = config.int_z() {
            self.int_z = Some(int_z);
        }
    }
}

impl<I2C, MENB> Lmp91000<I2C, MENB> {
    /// Create a driver from an I2C bus and the pin wired to MENB.
    ///
    /// No bus traffic happens and the pin is not driven. The cached gain and zero
    /// settings start out unset.
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

    /// Remember the ADC pin wired to VOUT for temperature readings.
    ///
    /// The driver does not use this value itself. Read it back with
    /// [`Lmp91000::temp_sensor`] and pass it as the `pin` argument of
    /// [`Lmp91000::temperature`].
    pub fn set_temp_sensor(&mut self, pin: u8) {
        self.temp_sensor = Some(pin);
    }

    /// Pin set with [`Lmp91000::set_temp_sensor`], if any.
    pub fn temp_sensor(&self) -> Option<u8> {
        self.temp_sensor
    }
}

impl<I2C, MENB> Lmp91000<I2C, MENB>
where
    I2C: I2c,
    MENB: OutputPin,
{
    ////////////////////////////////////////////////////////////////////////////////
    // Register access
    ////////////////////////////////////////////////////////////////////////////////

    /// Read a register.
    pub fn read(&mut self, register: Register) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(I2C_ADDRESS, &[register.address()], &mut buf)
            .map_err(Error::I2c)?;
        trace!("read {} = {=u8:#x}", register, buf[0]);
        Ok(buf[0])
    }

    /// Write a register.
    ///
    /// Writes to TIACN and REFCN are ignored by the chip while it is locked.
    pub fn write(&mut self, register: Register, data: u8) -> Result<(), Error<I2C::Error>> {
        trace!("write {} = {=u8:#x}", register, data);
        self.i2c
            .write(I2C_ADDRESS, &[register.address(), data])
            .map_err(Error::I2c)
    }

    /// Read-modify-write a register.
    fn modify(
        &mut self,
        register: Register,
        f: impl FnOnce(u8) -> u8,
    ) -> Result<(), Error<I2C::Error>> {
        let current = self.read(register)?;
        self.write(register, f(current))
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Power
    ////////////////////////////////////////////////////////////////////////////////

    /// Enable the I2C interface of the chip by driving MENB low.
    ///
    /// No register traffic.
    pub fn enable(&mut self) -> Result<(), Error<I2C::Error>> {
        self.menb.set_low().map_err(|e| Error::Pin(e.kind()))
    }

    /// Disable the I2C interface of the chip by driving MENB high.
    ///
    /// The analog front end keeps running in its current mode.
    pub fn disable(&mut self) -> Result<(), Error<I2C::Error>> {
        self.menb.set_high().map_err(|e| Error::Pin(e.kind()))
    }

    /// Check the STATUS register for the ready flag.
    ///
    /// <div class="warning">
    ///
    /// This check is known to be unreliable: on some evaluation boards the chip
    /// reports not-ready while it is in fact accepting commands. Treat `false` as a
    /// hint, not a verdict.
    ///
    /// </div>
    pub fn is_ready(&mut self) -> Result<bool, Error<I2C::Error>> {
        let status = self.read(Register::Status)?;
        Ok(status.get_bit(STATUS_READY_BIT))
    }

    /// Check that an LMP91000 answers on the bus and reports ready.
    ///
    /// # Errors
    ///
    /// [`Error::NotPresent`] if the address is not acknowledged or the chip is not
    /// ready. Other bus failures are returned as [`Error::I2c`]. The same caveat as
    /// [`Lmp91000::is_ready`] applies.
    pub fn probe(&mut self) -> Result<(), Error<I2C::Error>> {
        match self.is_ready() {
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

    ////////////////////////////////////////////////////////////////////////////////
    // Write protection
    ////////////////////////////////////////////////////////////////////////////////

    /// Write-protect TIACN and REFCN.
    pub fn lock(&mut self) -> Result<(), Error<I2C::Error>> {
        debug!("lock");
        self.write(Register::Lock, LockState::Locked.into())
    }

    /// Allow writes to TIACN and REFCN.
    pub fn unlock(&mut self) -> Result<(), Error<I2C::Error>> {
        debug!("unlock");
        self.write(Register::Lock, LockState::Unlocked.into())
    }

    /// Read the write-protection state.
    ///
    /// Only the exact lock value 0x01 counts as locked; any other LOCK contents
    /// read as [`LockState::Unlocked`].
    pub fn lock_state(&mut self) -> Result<LockState, Error<I2C::Error>> {
        let lock = self.read(Register::Lock)?;
        Ok(if lock == WRITE_LOCK {
            LockState::Locked
        } else {
            LockState::Unlocked
        })
    }

    /// True if TIACN and REFCN are write-protected.
    pub fn is_locked(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.lock_state()? == LockState::Locked)
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Whole-register access
    ////////////////////////////////////////////////////////////////////////////////

    /// Apply a set of changes.
    ///
    /// If any TIACN or REFCN setting is changed, the registers are unlocked, only
    /// the registers with changes are read, modified and written, and the chip is
    /// locked again (whatever its previous state). MODECN is written last, without
    /// touching the lock. Registers without changes see no traffic.
    ///
    /// The cached gain is updated as soon as TIACN has been written, and the cached
    /// zero as soon as REFCN has been written.
    /// On error the chip may be left unlocked and partially configured.
    pub fn configure(&mut self, config: &Configuration) -> Result<(), Error<I2C::Error>> {
        debug!("configure {}", config);
        if config.changes_tia_control() || config.changes_ref_control() {
            self.unlock()?;
            if config.changes_tia_control() {
                self.modify(Register::TiaControl, |b| config.apply_to_tia_control(b))?;
                self.shadow.record_gain(config);
            }
            if config.changes_ref_control() {
                self.modify(Register::RefControl, |b| config.apply_to_ref_control(b))?;
                self.shadow.record_int_z(config);
            }
            self.lock()?;
        }
        if config.changes_mode_control() {
            self.modify(Register::ModeControl, |b| config.apply_to_mode_control(b))?;
        }
        Ok(())
    }

    /// Read and decode TIACN from the chip.
    pub fn read_tia_control(&mut self) -> Result<TiaControl, Error<I2C::Error>> {
        Ok(TiaControl::from_byte(self.read(Register::TiaControl)?))
    }

    /// Read and decode REFCN from the chip.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfigValue`] if the bias field holds a reserved value.
    pub fn read_ref_control(&mut self) -> Result<RefControl, Error<I2C::Error>> {
        Ok(RefControl::try_from_byte(self.read(Register::RefControl)?)?)
    }

    /// Read and decode MODECN from the chip.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfigValue`] if the mode field holds a reserved value.
    pub fn read_mode_control(&mut self) -> Result<ModeControl, Error<I2C::Error>> {
        Ok(ModeControl::try_from_byte(self.read(Register::ModeControl)?)?)
    }
}
