//! HID report descriptor synthesis

use crate::{CapabilityConfig, DESCRIPTOR_CAPACITY, DescriptorError, DescriptorResult};
use hidstick_hid_common::{DescriptorNode, ReportWriter};
use tracing::debug;

/// Short-item prefixes and constant values used by the synthesizer.
pub mod items {
    pub const USAGE_PAGE: u8 = 0x05;
    pub const USAGE: u8 = 0x09;
    pub const USAGE_MINIMUM: u8 = 0x19;
    pub const USAGE_MAXIMUM: u8 = 0x29;
    pub const LOGICAL_MINIMUM_8: u8 = 0x15;
    pub const LOGICAL_MAXIMUM_8: u8 = 0x25;
    pub const LOGICAL_MINIMUM_16: u8 = 0x16;
    pub const LOGICAL_MAXIMUM_16: u8 = 0x26;
    pub const PHYSICAL_MINIMUM_8: u8 = 0x35;
    pub const PHYSICAL_MAXIMUM_16: u8 = 0x46;
    pub const UNIT_EXPONENT: u8 = 0x55;
    pub const UNIT: u8 = 0x65;
    pub const REPORT_SIZE: u8 = 0x75;
    pub const REPORT_ID: u8 = 0x85;
    pub const REPORT_COUNT: u8 = 0x95;
    pub const COLLECTION: u8 = 0xA1;
    pub const END_COLLECTION: u8 = 0xC0;
    pub const INPUT: u8 = 0x81;

    pub const PAGE_GENERIC_DESKTOP: u8 = 0x01;
    pub const PAGE_SIMULATION: u8 = 0x02;
    pub const PAGE_BUTTON: u8 = 0x09;

    pub const USAGE_POINTER: u8 = 0x01;
    pub const USAGE_HAT_SWITCH: u8 = 0x39;

    pub const COLLECTION_PHYSICAL: u8 = 0x00;
    pub const COLLECTION_APPLICATION: u8 = 0x01;

    /// Data, Variable, Absolute.
    pub const INPUT_DATA_VAR_ABS: u8 = 0x02;
    /// Constant, Variable, Absolute.
    pub const INPUT_CONST_VAR_ABS: u8 = 0x03;
    /// Data, Variable, Absolute, Null State.
    pub const INPUT_DATA_VAR_ABS_NULL: u8 = 0x42;

    /// English Rotation: Angular Position (degrees).
    pub const UNIT_ENG_ROT_ANGULAR: u8 = 0x14;
    pub const UNIT_NONE: u8 = 0x00;

    pub const HAT_PHYSICAL_MAXIMUM: u16 = 315;
}

/// A synthesised report descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    bytes: Vec<u8>,
}

impl Descriptor {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Bundles the descriptor with the transport's PID sub-descriptor for
    /// registration.
    pub fn into_node(self, pid_descriptor: Vec<u8>, pid_first: bool) -> DescriptorNode {
        DescriptorNode {
            descriptor: self.bytes,
            pid_descriptor,
            pid_first,
        }
    }

    /// Space separated upper-case hex, for logs and the CLI.
    pub fn to_hex(&self) -> String {
        self.bytes
            .iter()
            .map(|byte| format!("{byte:02X}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl AsRef<[u8]> for Descriptor {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Builds the report descriptor for `config`.
///
/// The output is one Generic Desktop application collection tagged with the
/// configured report id, holding, in order, the button block, the hat
/// block(s), the positional axis block and the simulation control block.
/// Blocks for absent features are omitted entirely.
///
/// # Errors
///
/// Returns [`crate::DescriptorError::CapacityExceeded`] if the descriptor
/// would exceed [`DESCRIPTOR_CAPACITY`]. This cannot happen for a validated
/// configuration.
///
/// # Examples
///
/// ```
/// use hidstick_hid_joystick_protocol::{synthesize, AxisSet, CapabilityConfig};
///
/// let config = CapabilityConfig::builder()
///     .buttons(8)
///     .axes(AxisSet::X | AxisSet::Y)
///     .build()?;
/// let descriptor = synthesize(&config)?;
/// assert_eq!(&descriptor.as_bytes()[..8], &[0x05, 0x01, 0x09, 0x04, 0xA1, 0x01, 0x85, 0x01]);
/// assert_eq!(descriptor.as_bytes().last(), Some(&0xC0));
/// # Ok::<(), hidstick_hid_joystick_protocol::DescriptorError>(())
/// ```
pub fn synthesize(config: &CapabilityConfig) -> DescriptorResult<Descriptor> {
    let mut writer = ReportWriter::with_capacity(DESCRIPTOR_CAPACITY);
    synthesize_into(config, &mut writer)?;

    // Copy into an exactly sized buffer.
    let bytes = writer.as_slice().to_vec();
    debug!(
        report_id = config.report_id(),
        len = bytes.len(),
        "synthesised report descriptor"
    );
    Ok(Descriptor { bytes })
}

/// Writes the descriptor for `config` into a caller-supplied writer.
///
/// # Errors
///
/// Returns [`crate::DescriptorError::CapacityExceeded`] when `writer` runs
/// out of room.
pub fn synthesize_into(config: &CapabilityConfig, writer: &mut ReportWriter) -> DescriptorResult<()> {
    use items::*;

    writer
        .write_bytes(&[USAGE_PAGE, PAGE_GENERIC_DESKTOP])?
        .write_bytes(&[USAGE, config.device_type().usage()])?
        .write_bytes(&[COLLECTION, COLLECTION_APPLICATION])?
        .write_bytes(&[REPORT_ID, config.report_id()])?;

    write_buttons(config, writer)?;

    let axis_count = config.axes().count();
    if axis_count > 0 || config.hat_switch_count() > 0 {
        writer.write_bytes(&[USAGE_PAGE, PAGE_GENERIC_DESKTOP])?;
    }

    write_hat_switches(config, writer)?;
    write_axes(config, writer)?;
    write_simulation(config, writer)?;

    writer.write_u8(END_COLLECTION)?;
    Ok(())
}

fn write_buttons(config: &CapabilityConfig, writer: &mut ReportWriter) -> DescriptorResult<()> {
    use items::*;

    let count = config.button_count();
    if count == 0 {
        return Ok(());
    }

    writer
        .write_bytes(&[USAGE_PAGE, PAGE_BUTTON])?
        .write_bytes(&[USAGE_MINIMUM, 0x01])?
        .write_bytes(&[USAGE_MAXIMUM, count])?
        .write_bytes(&[LOGICAL_MINIMUM_8, 0x00])?
        .write_bytes(&[LOGICAL_MAXIMUM_8, 0x01])?
        .write_bytes(&[REPORT_SIZE, 0x01])?
        .write_bytes(&[REPORT_COUNT, count])?
        .write_bytes(&[UNIT_EXPONENT, 0x00])?
        .write_bytes(&[UNIT, UNIT_NONE])?
        .write_bytes(&[INPUT, INPUT_DATA_VAR_ABS])?;

    let padding = config.button_padding_bits();
    if padding > 0 {
        write_padding(writer, padding)?;
    }
    Ok(())
}

fn write_hat_switches(
    config: &CapabilityConfig,
    writer: &mut ReportWriter,
) -> DescriptorResult<()> {
    match config.hat_switch_count() {
        0 => Ok(()),
        1 => {
            write_hat_switch(writer)?;
            write_padding(writer, 4)
        }
        _ => {
            write_hat_switch(writer)?;
            write_hat_switch(writer)
        }
    }
}

fn write_hat_switch(writer: &mut ReportWriter) -> DescriptorResult<()> {
    use items::*;

    writer
        .write_bytes(&[USAGE, USAGE_HAT_SWITCH])?
        .write_bytes(&[LOGICAL_MINIMUM_8, 0x00])?
        .write_bytes(&[LOGICAL_MAXIMUM_8, 0x07])?
        .write_bytes(&[PHYSICAL_MINIMUM_8, 0x00])?
        .write_u8(PHYSICAL_MAXIMUM_16)?
        .write_u16_le(HAT_PHYSICAL_MAXIMUM)?
        .write_bytes(&[UNIT, UNIT_ENG_ROT_ANGULAR])?
        .write_bytes(&[REPORT_SIZE, 0x04])?
        .write_bytes(&[REPORT_COUNT, 0x01])?
        .write_bytes(&[INPUT, INPUT_DATA_VAR_ABS_NULL])?;
    Ok(())
}

fn write_axes(config: &CapabilityConfig, writer: &mut ReportWriter) -> DescriptorResult<()> {
    use items::*;

    let axes = config.axes();
    if axes.is_empty() {
        return Ok(());
    }

    writer.write_bytes(&[USAGE, USAGE_POINTER])?;
    write_value_range(writer, axes.count())?;
    writer.write_bytes(&[COLLECTION, COLLECTION_PHYSICAL])?;
    for axis in axes.axes() {
        writer.write_bytes(&[USAGE, axis.usage()])?;
    }
    writer
        .write_bytes(&[INPUT, INPUT_DATA_VAR_ABS])?
        .write_u8(END_COLLECTION)?;
    Ok(())
}

fn write_simulation(config: &CapabilityConfig, writer: &mut ReportWriter) -> DescriptorResult<()> {
    use items::*;

    let simulation = config.simulation();
    if simulation.is_empty() {
        return Ok(());
    }

    writer.write_bytes(&[USAGE_PAGE, PAGE_SIMULATION])?;
    write_value_range(writer, simulation.count())?;
    writer.write_bytes(&[COLLECTION, COLLECTION_PHYSICAL])?;
    for control in simulation.controls() {
        writer.write_bytes(&[USAGE, control.usage()])?;
    }
    writer
        .write_bytes(&[INPUT, INPUT_DATA_VAR_ABS])?
        .write_u8(END_COLLECTION)?;
    Ok(())
}

/// Logical range, field size and count shared by axes and simulation
/// controls.
fn write_value_range(writer: &mut ReportWriter, count: usize) -> DescriptorResult<()> {
    use hidstick_calibration::{LOGICAL_MAXIMUM, LOGICAL_MINIMUM};
    use items::*;

    let count = u8::try_from(count).map_err(|e| {
        DescriptorError::InvalidConfig(format!("{count} fields in one block: {e}"))
    })?;
    writer
        .write_u8(LOGICAL_MINIMUM_16)?
        .write_i16_le(LOGICAL_MINIMUM)?
        .write_u8(LOGICAL_MAXIMUM_16)?
        .write_i16_le(LOGICAL_MAXIMUM)?
        .write_bytes(&[REPORT_SIZE, 0x10])?
        .write_bytes(&[REPORT_COUNT, count])?;
    Ok(())
}

fn write_padding(writer: &mut ReportWriter, bits: u8) -> DescriptorResult<()> {
    use items::*;

    writer
        .write_bytes(&[REPORT_SIZE, 0x01])?
        .write_bytes(&[REPORT_COUNT, bits])?
        .write_bytes(&[INPUT, INPUT_CONST_VAR_ABS])?;
    Ok(())
}
