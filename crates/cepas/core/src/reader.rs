//! End-to-end CAN read

use tracing::{info, instrument};

use crate::can::Can;
use crate::config::ReaderConfig;
use crate::driver::{Device, Driver};
use crate::purse::read_purse;
use crate::session::with_session;
use crate::target::{detect_target, detect_target_within, inspect_target};
use crate::Result;

/// Wait for a card on an open device and read its CAN
pub fn read_can<D: Device>(device: &mut D, config: &ReaderConfig) -> Result<Can> {
    let target = match config.detect_timeout {
        Some(deadline) => detect_target_within(device, config.modulation, deadline)?,
        None => detect_target(device, config.modulation)?,
    };
    inspect_target(&target);

    let purse = read_purse(device, &config.exchange)?;
    Can::from_purse(&purse)
}

/// Open the reader, wait for a card, read its CAN and close the reader again
///
/// The reader is released whatever the outcome. Returns the CAN grouped in
/// blocks of four digits when `grouped` is set.
#[instrument(skip(driver, config), fields(connstring = %config.connstring))]
pub fn block_for_can<D: Driver>(driver: D, config: &ReaderConfig, grouped: bool) -> Result<String> {
    let can = with_session(driver, &config.connstring, |device| read_can(device, config))?;
    info!("Read CAN from card");
    Ok(can.format(grouped))
}
