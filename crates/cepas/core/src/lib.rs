//! Card session protocol engine for CEPAS contactless cards
//!
//! This crate talks to a CEPAS transit/payment card through a proximity-card
//! reader and extracts the card account number (CAN) from the purse file.
//!
//! ## Overview
//!
//! - [`Driver`] and [`Device`] describe the reader capability a backend must provide
//! - [`Session`] acquires the reader and guarantees teardown on every exit path
//! - [`detect_target`] blocks until a card is presented
//! - [`transceive`] performs a single command/response exchange
//! - [`read_purse`] runs the SELECT MF, SELECT EF, READ PURSE sequence
//! - [`extract_can`] turns the purse payload into a CAN string
//! - [`block_for_can`] composes all of the above under one session
//!
//! ```no_run
//! # fn run<D: cepas_core::Driver>(driver: D) -> cepas_core::Result<()> {
//! use cepas_core::{ReaderConfig, block_for_can};
//!
//! let can = block_for_can(driver, &ReaderConfig::default(), true)?;
//! println!("Your CAN: {can}");
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

pub use bytes::Bytes;

pub mod can;
pub mod config;
pub mod driver;
pub mod exchange;
pub mod modulation;
pub mod protocol;
pub mod purse;
pub mod reader;
pub mod session;
pub mod target;

mod error;
pub use error::{Error, Result, TransceiveError};

#[cfg(test)]
pub(crate) mod mock;

pub use can::{Can, extract_can};
pub use config::{ExchangeOptions, LengthPolicy, ReaderConfig};
pub use driver::{AbortHandle, Device, Driver, DriverError, RawResponse};
pub use exchange::transceive;
pub use modulation::{BaudRate, Modulation, ModulationType};
pub use protocol::Apdu;
pub use purse::{PurseData, read_purse};
pub use reader::{block_for_can, read_can};
pub use session::{Session, with_session};
pub use target::{Target, detect_target, detect_target_within, inspect_target};

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{
        AbortHandle, Bytes, Can, Device, Driver, DriverError, Error, ExchangeOptions,
        LengthPolicy, Modulation, RawResponse, ReaderConfig, Result, Session, Target,
    };
}
