//! Emulated device sessions
//!
//! Builds a [`Joystick`] over a recording transport, applies the requested
//! control changes and configuration commands, and reports every HID report
//! the device emitted along the way.

use anyhow::Result;
use clap::Args;
use hidstick_device::actuator::mock::RecordingActuator;
use hidstick_device::{Command, CommandReport, Joystick};
use hidstick_hid_common::mock::MockTransport;
use hidstick_hid_joystick_protocol::{
    Axis, DecodedReport, GUI_REPORT_ID, SimulationControl, synthesize,
};
use hidstick_settings::{
    DEFAULT_STORAGE_CAPACITY, FileStorage, MemoryStorage, StorageMedium,
};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::error::CliError;
use crate::output;
use crate::profile::{CapabilityArgs, DeviceProfile};

#[derive(Args, Debug, Clone, Default)]
pub struct EmulateArgs {
    #[command(flatten)]
    pub capabilities: CapabilityArgs,

    /// Set a control to a raw value, e.g. x=512 or throttle=900
    #[arg(long = "set", value_parser = parse_assignment)]
    pub assignments: Vec<Assignment>,

    /// Press a button by zero-based index
    #[arg(id = "press", long = "press")]
    pub buttons: Vec<usize>,

    /// Hat switch angles in degrees, one per hat; -1 releases
    #[arg(id = "hat", long = "hat", allow_negative_numbers = true)]
    pub hats: Vec<i16>,

    /// Configuration command as NAME[:A0,A1,A2,A3], e.g. set_calibration:0,1023,1023,0
    #[arg(short, long = "command", value_parser = parse_command)]
    pub commands: Vec<CommandReport>,
}

/// A raw value for one positional axis or simulation control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    Axis(Axis, i16),
    Simulation(SimulationControl, i16),
}

pub fn parse_assignment(s: &str) -> Result<Assignment, String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CONTROL=VALUE, got '{s}'"))?;
    let value = value
        .trim()
        .parse::<i16>()
        .map_err(|e| format!("invalid value in '{s}': {e}"))?;
    let name = name.trim();
    if let Ok(axis) = name.parse::<Axis>() {
        return Ok(Assignment::Axis(axis, value));
    }
    name.parse::<SimulationControl>()
        .map(|control| Assignment::Simulation(control, value))
        .map_err(|e| e.to_string())
}

pub fn parse_command(s: &str) -> Result<CommandReport, String> {
    let (name, args) = match s.split_once(':') {
        Some((name, args)) => (name, Some(args)),
        None => (s, None),
    };
    let command = name.trim().parse::<Command>().map_err(|e| e.to_string())?;

    let mut values = [0i16; 4];
    if let Some(args) = args {
        let parsed = args
            .split(',')
            .map(|arg| arg.trim().parse::<i16>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid argument in '{s}': {e}"))?;
        if parsed.len() > values.len() {
            return Err(format!("at most 4 arguments allowed, got {}", parsed.len()));
        }
        for (slot, value) in values.iter_mut().zip(parsed) {
            *slot = value;
        }
    }
    Ok(CommandReport::new(command, values))
}

#[derive(Debug, Clone, Serialize)]
pub struct SentReportView {
    pub report_id: u8,
    pub kind: &'static str,
    pub hex: String,
}

/// Everything observed during one emulated session.
#[derive(Debug, Clone, Serialize)]
pub struct EmulationReport {
    pub descriptor_len: usize,
    pub report_size: usize,
    pub reports: Vec<SentReportView>,
    pub commands: Vec<&'static str>,
    pub fired: usize,
    /// Decoded last input report, if any was sent.
    pub state: Option<DecodedReport>,
}

/// Execute an emulated session
pub fn execute(args: &EmulateArgs, eeprom: Option<&Path>, json: bool) -> Result<()> {
    let profile = args.capabilities.resolve()?;
    let report = match eeprom {
        Some(path) => run(
            &profile,
            FileStorage::new(path, DEFAULT_STORAGE_CAPACITY),
            args,
        )?,
        None => run(&profile, MemoryStorage::default(), args)?,
    };
    output::print_emulation(&report, json);
    Ok(())
}

pub fn run<S: StorageMedium>(
    profile: &DeviceProfile,
    storage: S,
    args: &EmulateArgs,
) -> Result<EmulationReport, CliError> {
    let config = profile.capabilities;
    let descriptor_len = synthesize(&config)?.len();

    let mut joystick = Joystick::new(config, MockTransport::new(), storage)?;
    profile.apply_ranges(&mut joystick);
    joystick.begin(profile.auto_send)?;

    for assignment in &args.assignments {
        match *assignment {
            Assignment::Axis(axis, value) => joystick.set_axis(axis, value)?,
            Assignment::Simulation(control, value) => joystick.set_simulation(control, value)?,
        }
    }
    for button in &args.buttons {
        joystick.press_button(*button)?;
    }
    for (index, degrees) in args.hats.iter().enumerate() {
        joystick.set_hat_switch(index, *degrees)?;
    }
    if !profile.auto_send {
        joystick.send_state()?;
    }

    let mut actuator = RecordingActuator::new();
    let mut commands = Vec::new();
    for request in &args.commands {
        let encoded = request.encode().map_err(hidstick_device::DeviceError::from)?;
        joystick.transport_mut().queue_command(encoded);
        if let Some(command) = joystick.poll_commands(&mut actuator)? {
            debug!(?command, "emulated command processed");
            commands.push(command.name());
        }
    }

    let transport = joystick.transport();
    let reports = transport
        .sent_reports()
        .iter()
        .map(|sent| SentReportView {
            report_id: sent.report_id,
            kind: if sent.report_id == GUI_REPORT_ID {
                "response"
            } else {
                "input"
            },
            hex: output::hex(&sent.data),
        })
        .collect();
    let state = transport
        .last_report(config.report_id())
        .map(|sent| joystick.layout().decode(&sent.data))
        .transpose()?;

    Ok(EmulationReport {
        descriptor_len,
        report_size: joystick.layout().report_size(),
        reports,
        commands,
        fired: actuator.events().len(),
        state,
    })
}
