//! PC/SC reader driver for CEPAS card sessions
//!
//! This crate implements the [`Driver`](cepas_core::Driver) and
//! [`Device`](cepas_core::Device) traits from `cepas-core` on top of the
//! PC/SC API, so any contactless reader exposed through a PC/SC service
//! (pcsc-lite, WinSCard) can be used to read a CAN.
//!
//! # Connection strings
//!
//! - `""` or `"pcsc"`: the first reader reported by the service
//! - `"pcsc:<name>"` or `"<name>"`: the reader with that name, or failing
//!   an exact match, the first reader whose name contains it
//!
//! # Examples
//!
//! ```no_run
//! use cepas_core::{ReaderConfig, block_for_can};
//! use cepas_transport_pcsc::{PcscConfig, PcscDriver};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let driver = PcscDriver::new(PcscConfig::default());
//! let config = ReaderConfig::new().with_connstring("pcsc:ACR122");
//!
//! let can = block_for_can(driver, &config, true)?;
//! println!("Your CAN: {can}");
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

mod config;
mod device;
mod driver;
mod error;
mod reader;
mod util;

pub use config::{PcscConfig, ShareMode};
pub use device::{PcscAbort, PcscDevice};
pub use driver::{PcscContext, PcscDriver};
pub use error::PcscError;
pub use reader::PcscReader;

// Re-export some pcsc types for convenience
pub use pcsc::{Protocol, Protocols};
