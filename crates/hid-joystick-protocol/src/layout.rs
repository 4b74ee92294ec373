//! Input report layout derived from a capability configuration

use crate::{
    Axis, CapabilityConfig, DescriptorError, DescriptorResult, HatDirection, SimulationControl,
};
use hidstick_hid_common::ReportParser;
use serde::{Deserialize, Serialize};

/// What a run of report bytes carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "control")]
pub enum FieldKind {
    Buttons,
    HatSwitches,
    Axis(Axis),
    Simulation(SimulationControl),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutField {
    pub kind: FieldKind,
    pub offset: usize,
    pub len: usize,
}

/// Byte layout of the input report, excluding the report id.
///
/// Field order is buttons, the shared hat byte, positional axes (X..Rz),
/// then simulation controls (Rudder..Steering). Each axis and simulation
/// control is a little-endian `i16`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLayout {
    fields: Vec<LayoutField>,
    size: usize,
}

impl ReportLayout {
    pub fn new(config: &CapabilityConfig) -> Self {
        let mut fields = Vec::new();
        let mut offset = 0;
        let mut push = |kind, len| {
            fields.push(LayoutField { kind, offset, len });
            offset += len;
        };

        let button_bytes = config.button_bytes();
        if button_bytes > 0 {
            push(FieldKind::Buttons, button_bytes);
        }
        if config.hat_switch_count() > 0 {
            push(FieldKind::HatSwitches, 1);
        }
        for axis in config.axes().axes() {
            push(FieldKind::Axis(axis), 2);
        }
        for control in config.simulation().controls() {
            push(FieldKind::Simulation(control), 2);
        }

        Self {
            fields,
            size: offset,
        }
    }

    /// Number of bytes every input report carries.
    pub fn report_size(&self) -> usize {
        self.size
    }

    pub fn fields(&self) -> &[LayoutField] {
        &self.fields
    }

    pub fn field(&self, kind: FieldKind) -> Option<&LayoutField> {
        self.fields.iter().find(|field| field.kind == kind)
    }

    /// Splits a serialized input report back into its fields.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::ReportLengthMismatch`] when `data` is not
    /// exactly [`Self::report_size`] bytes long.
    pub fn decode(&self, data: &[u8]) -> DescriptorResult<DecodedReport> {
        if data.len() != self.size {
            return Err(DescriptorError::ReportLengthMismatch {
                expected: self.size,
                actual: data.len(),
            });
        }

        let mut parser = ReportParser::new(data);
        let mut report = DecodedReport::default();
        for field in &self.fields {
            match field.kind {
                FieldKind::Buttons => report.buttons = parser.read_bytes(field.len)?.to_vec(),
                FieldKind::HatSwitches => {
                    let byte = parser.read_u8()?;
                    report.hats = [
                        HatDirection::from_nibble(byte & 0x0F),
                        HatDirection::from_nibble(byte >> 4),
                    ];
                }
                FieldKind::Axis(axis) => report.axes.push((axis, parser.read_i16_le()?)),
                FieldKind::Simulation(control) => {
                    report.simulation.push((control, parser.read_i16_le()?));
                }
            }
        }
        Ok(report)
    }
}

/// Field values recovered from an input report.
///
/// When the device has a single hat switch the second entry of `hats`
/// reflects the padding nibble rather than a real control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedReport {
    pub buttons: Vec<u8>,
    pub hats: [HatDirection; 2],
    pub axes: Vec<(Axis, i16)>,
    pub simulation: Vec<(SimulationControl, i16)>,
}

impl DecodedReport {
    pub fn button(&self, index: usize) -> bool {
        self.buttons
            .get(index / 8)
            .is_some_and(|byte| byte & (1 << (index % 8)) != 0)
    }

    pub fn axis(&self, axis: Axis) -> Option<i16> {
        self.axes
            .iter()
            .find(|(candidate, _)| *candidate == axis)
            .map(|(_, value)| *value)
    }

    pub fn simulation(&self, control: SimulationControl) -> Option<i16> {
        self.simulation
            .iter()
            .find(|(candidate, _)| *candidate == control)
            .map(|(_, value)| *value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AxisSet, SimulationSet};

    #[test]
    fn test_eight_buttons_two_axes_is_five_bytes() -> DescriptorResult<()> {
        let config = CapabilityConfig::builder()
            .buttons(8)
            .axes(AxisSet::X | AxisSet::Y)
            .build()?;
        let layout = ReportLayout::new(&config);

        assert_eq!(layout.report_size(), 5);
        assert_eq!(
            layout.fields(),
            &[
                LayoutField {
                    kind: FieldKind::Buttons,
                    offset: 0,
                    len: 1
                },
                LayoutField {
                    kind: FieldKind::Axis(Axis::X),
                    offset: 1,
                    len: 2
                },
                LayoutField {
                    kind: FieldKind::Axis(Axis::Y),
                    offset: 3,
                    len: 2
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_hat_byte_follows_buttons() -> DescriptorResult<()> {
        let config = CapabilityConfig::builder()
            .buttons(12)
            .hat_switches(2)
            .simulation(SimulationSet::THROTTLE)
            .build()?;
        let layout = ReportLayout::new(&config);

        assert_eq!(layout.report_size(), 5);
        assert_eq!(
            layout.field(FieldKind::HatSwitches).map(|f| f.offset),
            Some(2)
        );
        assert_eq!(
            layout
                .field(FieldKind::Simulation(SimulationControl::Throttle))
                .map(|f| f.offset),
            Some(3)
        );
        Ok(())
    }

    #[test]
    fn test_full_layout_size() {
        let layout = ReportLayout::new(&CapabilityConfig::full());
        assert_eq!(layout.report_size(), 4 + 1 + 12 + 10);
        assert_eq!(layout.fields().len(), 13);
    }

    #[test]
    fn test_decode() -> DescriptorResult<()> {
        let config = CapabilityConfig::builder()
            .buttons(8)
            .hat_switches(1)
            .axes(AxisSet::X)
            .simulation(SimulationSet::BRAKE)
            .build()?;
        let layout = ReportLayout::new(&config);

        let report = layout.decode(&[0x09, 0x02, 0x01, 0x80, 0xFF, 0x7F])?;
        assert!(report.button(0));
        assert!(!report.button(1));
        assert!(report.button(3));
        assert_eq!(report.hats[0], HatDirection::Right);
        assert_eq!(report.axis(Axis::X), Some(-32767));
        assert_eq!(report.axis(Axis::Y), None);
        assert_eq!(report.simulation(SimulationControl::Brake), Some(32767));
        Ok(())
    }

    #[test]
    fn test_decode_rejects_wrong_length() -> DescriptorResult<()> {
        let config = CapabilityConfig::builder().buttons(8).build()?;
        let layout = ReportLayout::new(&config);
        assert_eq!(
            layout.decode(&[0, 0]),
            Err(DescriptorError::ReportLengthMismatch {
                expected: 1,
                actual: 2
            })
        );
        Ok(())
    }
}
