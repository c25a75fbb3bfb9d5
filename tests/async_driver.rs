//! The async driver against the in-memory LMP91000.
#![cfg(feature = "async")]
mod common;

use common::{FakeAdc, FakeLmp91000, FakePin};
use embassy_futures::block_on;
use embedded_hal::i2c::ErrorKind;
use lmp91000_hal::asynch::Lmp91000;
use lmp91000_hal::settings::{Bias, InternalZero, LockState, OperatingMode, RLoad, TiaGain};
use lmp91000_hal::{Configuration, Error};

type TestResult = Result<(), Error<ErrorKind>>;

fn afe() -> Lmp91000<FakeLmp91000, FakePin> {
    Lmp91000::new(FakeLmp91000::default(), FakePin::default())
}

#[test]
fn lock_handshake() -> TestResult {
    block_on(async {
        let mut afe = afe();
        afe.probe().await?;
        assert_eq!(afe.lock_state().await?, LockState::Locked);

        // Dropped while locked.
        afe.set_gain(TiaGain::R7k).await?;
        assert_eq!(afe.read_tia_control().await?.gain, TiaGain::External);

        afe.unlock().await?;
        assert!(!afe.is_locked().await?);
        afe.set_gain(TiaGain::R7k).await?;
        afe.set_rload(RLoad::R33).await?;
        afe.lock().await?;

        let tia = afe.read_tia_control().await?;
        assert_eq!((tia.gain, tia.rload), (TiaGain::R7k, RLoad::R33));
        assert_eq!(afe.gain(), Some(7_000.0));
        Ok::<(), Error<ErrorKind>>(())
    })
}

#[test]
fn reference_and_mode() -> TestResult {
    block_on(async {
        let mut afe = afe();
        afe.unlock().await?;
        afe.set_ext_ref_source().await?;
        afe.set_int_z(InternalZero::Bypass).await?;
        afe.set_pos_bias().await?;
        afe.set_bias(Bias::Pct18).await?;
        afe.enable_fet().await?;
        afe.standby().await?;

        let refcn = afe.read_ref_control().await?;
        assert_eq!(refcn.int_z, InternalZero::Bypass);
        assert_eq!(refcn.bias, Bias::Pct18);
        assert_eq!(afe.int_z(), None);
        assert_eq!(afe.int_z_setting(), Some(InternalZero::Bypass));
        assert_eq!(afe.read_mode_control().await?.mode, OperatingMode::Standby);
        Ok::<(), Error<ErrorKind>>(())
    })
}

#[test]
fn configure_and_read_current() -> TestResult {
    block_on(async {
        let mut afe = afe();
        afe.enable()?;
        afe.configure(
            Configuration::new()
                .with_gain(TiaGain::R35k)
                .with_mode(OperatingMode::Amperometric),
        )
        .await?;
        assert!(afe.is_locked().await?);

        let mut adc = FakeAdc::with_reading(1, 1023);
        let code = afe.output(&mut adc, 1).await.unwrap();
        assert_eq!(afe.current(code, 3.5, 10), Some(3.5 / 35_000.0));
        assert_eq!(afe.current_with_external_gain(code, 3.5, 10, 7.0), 0.5);
        Ok::<(), Error<ErrorKind>>(())
    })
}

#[test]
fn temperature() {
    let afe = afe();
    let mut adc = FakeAdc::with_reading(4, 1395);
    let celsius = block_on(afe.temperature(&mut adc, 4, 4.095, 12)).unwrap();
    assert!((celsius - 20.0).abs() < 0.01);
}
