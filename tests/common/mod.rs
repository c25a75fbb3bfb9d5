//! In-memory LMP91000 used by the integration tests.
//!
//! Holds the five registers with their power-on values and honours the write lock
//! on TIACN and REFCN, so tests can check what the chip ends up holding rather than
//! the exact bus traffic.
#![allow(dead_code)]

use std::convert::Infallible;

use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use lmp91000_hal::analog::AnalogRead;
use lmp91000_hal::registers::{I2C_ADDRESS, Register, WRITE_LOCK};

#[derive(Debug)]
pub struct FakeLmp91000 {
    pub status: u8,
    pub lock: u8,
    pub tiacn: u8,
    pub refcn: u8,
    pub modecn: u8,
    /// Address of the next register read.
    pointer: u8,
    /// Number of writes the chip dropped because it was locked.
    pub ignored_writes: usize,
}

impl Default for FakeLmp91000 {
    fn default() -> Self {
        Self {
            status: 0x01,
            lock: 0x01,
            tiacn: 0x03,
            refcn: 0x20,
            modecn: 0x00,
            pointer: 0x00,
            ignored_writes: 0,
        }
    }
}

impl FakeLmp91000 {
    pub fn register(&self, address: u8) -> u8 {
        match address {
            0x00 => self.status,
            0x01 => self.lock,
            0x10 => self.tiacn,
            0x11 => self.refcn,
            0x12 => self.modecn,
            _ => 0x00,
        }
    }

    fn store(&mut self, address: u8, data: u8) {
        let locked = self.lock == WRITE_LOCK;
        let writable = [
            Register::Lock,
            Register::TiaControl,
            Register::RefControl,
            Register::ModeControl,
        ];
        match writable.into_iter().find(|r| r.address() == address) {
            Some(r) if locked && r.is_write_protected() => self.ignored_writes += 1,
            Some(Register::Lock) => self.lock = data,
            Some(Register::TiaControl) => self.tiacn = data,
            Some(Register::RefControl) => self.refcn = data,
            Some(Register::ModeControl) => self.modecn = data,
            _ => self.ignored_writes += 1,
        }
    }

    pub fn handle(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), ErrorKind> {
        if address != I2C_ADDRESS {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations {
            match op {
                Operation::Write([pointer]) => self.pointer = *pointer,
                Operation::Write([register, data]) => self.store(*register, *data),
                Operation::Write(_) => return Err(ErrorKind::Other),
                Operation::Read(buf) => buf.fill(self.register(self.pointer)),
            }
        }
        Ok(())
    }
}

impl ErrorType for FakeLmp91000 {
    type Error = ErrorKind;
}

impl I2c for FakeLmp91000 {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.handle(address, operations)
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::i2c::I2c for FakeLmp91000 {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.handle(address, operations)
    }
}

/// MENB stand-in recording the last level driven.
#[derive(Debug, Default)]
pub struct FakePin {
    pub low: Option<bool>,
}

impl PinErrorType for FakePin {
    type Error = Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.low = Some(true);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.low = Some(false);
        Ok(())
    }
}

/// ADC returning fixed codes per pin.
#[derive(Debug, Default)]
pub struct FakeAdc {
    pub readings: Vec<(u8, u16)>,
}

impl FakeAdc {
    pub fn with_reading(pin: u8, code: u16) -> Self {
        Self {
            readings: vec![(pin, code)],
        }
    }
}

impl AnalogRead for FakeAdc {
    type Error = &'static str;

    fn analog_read(&mut self, pin: u8) -> Result<u16, Self::Error> {
        self.readings
            .iter()
            .find(|(p, _)| *p == pin)
            .map(|(_, code)| *code)
            .ok_or("no such pin")
    }
}

#[cfg(feature = "async")]
impl lmp91000_hal::analog::AsyncAnalogRead for FakeAdc {
    type Error = &'static str;

    async fn analog_read(&mut self, pin: u8) -> Result<u16, Self::Error> {
        AnalogRead::analog_read(self, pin)
    }
}
