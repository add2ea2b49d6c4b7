use clap::{Parser, Subcommand, ValueEnum};
use lanekit_core::{FirmwareComparison, FirmwareOutcome};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lanekit",
    about = "Drive point-of-sale peripherals through simulated device sessions",
    version,
    long_about = None,
)]
pub struct Cli {
    /// Path to a profile store TOML file; built-in demo profiles are used
    /// when omitted
    #[arg(long, short = 'p', global = true)]
    pub profiles: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch a barcode scanner and print each scan
    Watch {
        /// Logical profile name of the scanner
        profile: String,

        /// Number of simulated scans before disconnecting
        #[arg(long, default_value_t = 5)]
        scans: u32,

        /// Claim timeout in milliseconds
        #[arg(long, default_value_t = 1000)]
        claim_timeout_ms: u64,
    },

    /// Display live weight readings from a scale
    Weigh {
        /// Logical profile name of the scale
        profile: String,

        /// Number of weight readings before disconnecting
        #[arg(long, default_value_t = 6)]
        readings: u32,
    },

    /// Read RFID tags, once or continuously
    Rfid {
        /// Logical profile name of the reader
        profile: String,

        /// Run continuous read mode instead of a single inventory
        #[arg(long)]
        continuous: bool,

        /// Poll interval between continuous reads, in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,

        /// Number of continuous polling rounds before stopping
        #[arg(long, default_value_t = 3)]
        rounds: u32,
    },

    /// Compare a firmware image against the device and update it
    Firmware {
        /// Logical profile name of the scanner
        profile: String,

        /// Path to the firmware image file
        file: PathBuf,

        /// Comparison result the simulated device reports
        #[arg(long, value_enum, default_value = "older")]
        assume: ComparisonArg,

        /// Terminal outcome the simulated update ends with
        #[arg(long, value_enum, default_value = "complete")]
        outcome: OutcomeArg,

        /// Update even when the comparison result is inconclusive
        #[arg(long)]
        force: bool,
    },

    /// List the profiles in the store
    Profiles,
}

/// Simulated firmware comparison result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ComparisonArg {
    Older,
    Same,
    Newer,
    Different,
    Unknown,
}

impl From<ComparisonArg> for FirmwareComparison {
    fn from(arg: ComparisonArg) -> Self {
        match arg {
            ComparisonArg::Older => FirmwareComparison::Older,
            ComparisonArg::Same => FirmwareComparison::Same,
            ComparisonArg::Newer => FirmwareComparison::Newer,
            ComparisonArg::Different => FirmwareComparison::Different,
            ComparisonArg::Unknown => FirmwareComparison::Unknown,
        }
    }
}

/// Simulated firmware update terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutcomeArg {
    Complete,
    NotRestored,
    FailedOk,
    FailedUnrecoverable,
    FailedNeedsFirmware,
    FailedUnknown,
}

impl From<OutcomeArg> for FirmwareOutcome {
    fn from(arg: OutcomeArg) -> Self {
        match arg {
            OutcomeArg::Complete => FirmwareOutcome::Complete,
            OutcomeArg::NotRestored => FirmwareOutcome::CompleteDeviceNotRestored,
            OutcomeArg::FailedOk => FirmwareOutcome::FailedDeviceOk,
            OutcomeArg::FailedUnrecoverable => FirmwareOutcome::FailedDeviceUnrecoverable,
            OutcomeArg::FailedNeedsFirmware => FirmwareOutcome::FailedNeedsFirmware,
            OutcomeArg::FailedUnknown => FirmwareOutcome::FailedUnknown,
        }
    }
}
