//! Descriptor and layout inspection

use anyhow::Result;
use hidstick_hid_joystick_protocol::{ReportLayout, synthesize};

use crate::error::CliError;
use crate::output;
use crate::profile::CapabilityArgs;

/// Synthesise and print the report descriptor
pub fn descriptor(args: &CapabilityArgs, json: bool) -> Result<()> {
    let config = args.resolve()?.capabilities;
    let descriptor = synthesize(&config).map_err(CliError::from)?;
    output::print_descriptor(&config, &descriptor, json);
    Ok(())
}

/// Print the input report layout
pub fn layout(args: &CapabilityArgs, json: bool) -> Result<()> {
    let config = args.resolve()?.capabilities;
    let layout = ReportLayout::new(&config);
    output::print_layout(&config, &layout, json);
    Ok(())
}
