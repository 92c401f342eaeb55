//! `cepas` command-line reader for the CAN of CEPAS cards

use std::env;
use std::time::Duration;

use cepas_core::{ExchangeOptions, LengthPolicy, ReaderConfig};
use cepas_transport_pcsc::{PcscConfig, ShareMode};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

mod commands;

use commands::{list_readers, read_command};

#[derive(Parser)]
#[command(version, about = "Read the card account number (CAN) of a CEPAS card")]
struct Cli {
    /// Reader to use, as a PC/SC reader name or `pcsc:<name>` (first reader if not specified)
    #[arg(short, long)]
    reader: Option<String>,

    /// Print the CAN without spaces between byte pairs
    #[arg(long)]
    no_spaces: bool,

    /// Timeout for each command exchange, in milliseconds
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,

    /// Give up waiting for a card after this many milliseconds (wait forever if not specified)
    #[arg(long)]
    detect_timeout_ms: Option<u64>,

    /// Reject responses whose reported length disagrees with the received data
    #[arg(long)]
    strict: bool,

    /// Claim the reader exclusively while reading
    #[arg(long)]
    exclusive: bool,

    /// Debug level output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available readers
    List,

    /// Wait for a card and print its CAN (default)
    Read,
}

impl Cli {
    fn reader_config(&self) -> ReaderConfig {
        let length_policy = if self.strict {
            LengthPolicy::Strict
        } else {
            LengthPolicy::Lenient
        };
        let exchange = ExchangeOptions::new()
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_length_policy(length_policy);

        ReaderConfig::new()
            .with_connstring(self.reader.clone().unwrap_or_default())
            .with_exchange(exchange)
            .with_detect_timeout(self.detect_timeout_ms.map(Duration::from_millis))
    }

    fn pcsc_config(&self) -> PcscConfig {
        let share_mode = if self.exclusive {
            ShareMode::Exclusive
        } else {
            ShareMode::Shared
        };
        PcscConfig::default().with_share_mode(share_mode)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    match cli.command.as_ref().unwrap_or(&Commands::Read) {
        Commands::List => list_readers()?,
        Commands::Read => read_command(cli.pcsc_config(), &cli.reader_config(), !cli.no_spaces)?,
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    let directives = env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, &directives))
        .with_ansi(true)
        .init();
}

/// `RUST_LOG`-style `directives` on top of a default level picked by `verbose`
fn log_filter(verbose: bool, directives: &str) -> EnvFilter {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives)
}
