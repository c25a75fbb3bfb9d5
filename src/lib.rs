#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod analog;
#[cfg(feature = "async")]
pub mod asynch;
pub mod config;
mod driver;
mod error;
pub mod registers;
pub mod settings;

pub use config::Configuration;
pub use driver::Lmp91000;
pub use error::{Error, InvalidConfigValue};
