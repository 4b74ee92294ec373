//! stickctl - hidstick joystick tool
//!
//! Inspects the report descriptor and input layout a capability profile
//! produces, previews calibration, edits the settings stored in an EEPROM
//! image, and drives an emulated device with configuration commands.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod completion;
mod error;
mod output;
mod profile;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::SettingsCommands;
use crate::commands::emulate::EmulateArgs;
use crate::error::CliError;
use crate::profile::CapabilityArgs;

#[derive(Parser, Debug)]
#[command(name = "stickctl")]
#[command(about = "hidstick joystick tool - descriptors, calibration and settings")]
#[command(version)]
#[command(long_about = "
stickctl works with hidstick joystick controllers without hardware attached.
It prints the HID report descriptor and input report layout for a capability
profile, previews axis calibration, edits the settings record of an EEPROM
image, and runs configuration commands against an emulated device.

Use --json for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output in JSON format for machine parsing
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// EEPROM image file backing the device settings
    #[arg(long, global = true, env = "STICKCTL_EEPROM")]
    eeprom: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the HID report descriptor for a profile
    Descriptor(CapabilityArgs),

    /// Print the input report layout for a profile
    Layout(CapabilityArgs),

    /// Normalise a raw reading against a calibration range
    Normalize {
        /// Raw reading
        #[arg(allow_negative_numbers = true)]
        value: i16,

        /// Physical minimum
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        min: i16,

        /// Physical maximum
        #[arg(long, default_value_t = 1023, allow_negative_numbers = true)]
        max: i16,
    },

    /// EEPROM settings commands
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Drive an emulated device and print the reports it sends
    Emulate(EmulateArgs),

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute_command(&cli) {
        if cli.json {
            output::print_error_json(&e);
        } else {
            output::print_error_human(&e);
        }

        let exit_code = e
            .downcast_ref::<CliError>()
            .map_or(1, CliError::exit_code);
        std::process::exit(exit_code);
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    let eeprom = cli.eeprom.as_deref();
    match &cli.command {
        Commands::Descriptor(args) => commands::descriptor::descriptor(args, cli.json),
        Commands::Layout(args) => commands::descriptor::layout(args, cli.json),
        Commands::Normalize { value, min, max } => {
            commands::normalize::execute(*value, *min, *max, cli.json)
        }
        Commands::Settings(cmd) => commands::settings::execute(cmd, eeprom, cli.json),
        Commands::Emulate(args) => commands::emulate::execute(args, eeprom, cli.json),
        Commands::Completion { shell } => {
            completion::generate_completion(*shell);
            Ok(())
        }
    }
}
