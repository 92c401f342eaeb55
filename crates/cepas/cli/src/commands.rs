//! Command handlers

use std::error::Error;

use cepas_core::{ReaderConfig, block_for_can};
use cepas_transport_pcsc::{PcscConfig, PcscDriver, PcscError};
use colored::Colorize;
use tracing::debug;

/// List all available readers
pub(crate) fn list_readers() -> Result<(), Box<dyn Error>> {
    let readers = match PcscDriver::list_readers() {
        Ok(readers) => readers,
        Err(PcscError::NoReadersAvailable) => {
            println!("No readers found!");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Available readers:");
    for (i, reader) in readers.iter().enumerate() {
        let status = if reader.has_card() {
            "card present".green()
        } else {
            "no card".yellow()
        };
        println!("{}. {} ({})", i + 1, reader.name(), status);
    }

    Ok(())
}

/// Wait for a card and print its CAN
pub(crate) fn read_command(
    pcsc_config: PcscConfig,
    config: &ReaderConfig,
    grouped: bool,
) -> Result<(), Box<dyn Error>> {
    debug!(?config, ?pcsc_config, "Reading CAN");
    println!("Tap a CEPAS card...");

    match block_for_can(PcscDriver::new(pcsc_config), config, grouped) {
        Ok(can) => {
            println!("Your CAN: {}", can.bold());
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", "NFC error occurred!".red());
            if e.is_rf_transmission() {
                eprintln!("RF transmission error. Did you remove the card too quickly?");
            } else if e.is_retryable() {
                eprintln!("Please try again.");
            }
            Err(e.into())
        }
    }
}
