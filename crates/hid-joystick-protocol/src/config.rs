//! Capability configuration

use crate::{
    Axis, AxisSet, DEFAULT_REPORT_ID, DescriptorError, DescriptorResult, DeviceType, GUI_REPORT_ID,
    MAX_BUTTONS, MAX_HAT_SWITCHES, SimulationControl, SimulationSet,
};
use serde::{Deserialize, Serialize};

/// What the device exposes to the host.
///
/// Fixed for the lifetime of a device instance. Every value that passes
/// validation produces a descriptor within [`crate::DESCRIPTOR_CAPACITY`].
///
/// # Examples
///
/// ```
/// use hidstick_hid_joystick_protocol::{AxisSet, CapabilityConfig};
///
/// let config = CapabilityConfig::builder()
///     .buttons(8)
///     .axes(AxisSet::X | AxisSet::Y)
///     .build()?;
/// assert_eq!(config.button_count(), 8);
/// assert_eq!(config.hat_switch_count(), 0);
/// # Ok::<(), hidstick_hid_joystick_protocol::DescriptorError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCapabilityConfig", into = "RawCapabilityConfig")]
pub struct CapabilityConfig {
    report_id: u8,
    device_type: DeviceType,
    button_count: u8,
    hat_switch_count: u8,
    axes: AxisSet,
    simulation: SimulationSet,
}

impl CapabilityConfig {
    pub fn builder() -> CapabilityConfigBuilder {
        CapabilityConfigBuilder::default()
    }

    /// Fully featured joystick: 32 buttons, two hats, every axis and
    /// simulation control.
    pub fn full() -> Self {
        Self {
            report_id: DEFAULT_REPORT_ID,
            device_type: DeviceType::Joystick,
            button_count: MAX_BUTTONS,
            hat_switch_count: MAX_HAT_SWITCHES,
            axes: AxisSet::all(),
            simulation: SimulationSet::all(),
        }
    }

    pub fn report_id(&self) -> u8 {
        self.report_id
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    pub fn button_count(&self) -> u8 {
        self.button_count
    }

    pub fn hat_switch_count(&self) -> u8 {
        self.hat_switch_count
    }

    pub fn axes(&self) -> AxisSet {
        self.axes
    }

    pub fn simulation(&self) -> SimulationSet {
        self.simulation
    }

    /// Bytes occupied by the button bit array.
    pub fn button_bytes(&self) -> usize {
        usize::from(self.button_count).div_ceil(8)
    }

    /// Constant bits that pad the last button byte.
    pub fn button_padding_bits(&self) -> u8 {
        match self.button_count % 8 {
            0 => 0,
            used => 8 - used,
        }
    }

    fn validate(self) -> DescriptorResult<Self> {
        if self.report_id == 0 {
            return Err(DescriptorError::InvalidConfig(
                "report id 0 is reserved".to_string(),
            ));
        }
        if self.report_id == GUI_REPORT_ID {
            return Err(DescriptorError::InvalidConfig(format!(
                "report id {GUI_REPORT_ID} is reserved for command responses"
            )));
        }
        if self.button_count > MAX_BUTTONS {
            return Err(DescriptorError::InvalidConfig(format!(
                "{} buttons requested, at most {MAX_BUTTONS} supported",
                self.button_count
            )));
        }
        if self.hat_switch_count > MAX_HAT_SWITCHES {
            return Err(DescriptorError::InvalidConfig(format!(
                "{} hat switches requested, at most {MAX_HAT_SWITCHES} supported",
                self.hat_switch_count
            )));
        }
        Ok(self)
    }
}

impl Default for CapabilityConfig {
    fn default() -> Self {
        Self::full()
    }
}

/// Validating builder for [`CapabilityConfig`].
///
/// Starts from an empty device (no buttons, hats or axes) on the default
/// report id.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityConfigBuilder {
    inner: CapabilityConfig,
}

impl Default for CapabilityConfigBuilder {
    fn default() -> Self {
        Self {
            inner: CapabilityConfig {
                report_id: DEFAULT_REPORT_ID,
                device_type: DeviceType::Joystick,
                button_count: 0,
                hat_switch_count: 0,
                axes: AxisSet::empty(),
                simulation: SimulationSet::empty(),
            },
        }
    }
}

impl CapabilityConfigBuilder {
    pub fn report_id(mut self, report_id: u8) -> Self {
        self.inner.report_id = report_id;
        self
    }

    pub fn device_type(mut self, device_type: DeviceType) -> Self {
        self.inner.device_type = device_type;
        self
    }

    pub fn buttons(mut self, count: u8) -> Self {
        self.inner.button_count = count;
        self
    }

    pub fn hat_switches(mut self, count: u8) -> Self {
        self.inner.hat_switch_count = count;
        self
    }

    pub fn axes(mut self, axes: AxisSet) -> Self {
        self.inner.axes = axes;
        self
    }

    pub fn axis(mut self, axis: Axis) -> Self {
        self.inner.axes |= axis.flag();
        self
    }

    pub fn simulation(mut self, simulation: SimulationSet) -> Self {
        self.inner.simulation = simulation;
        self
    }

    pub fn simulation_control(mut self, control: SimulationControl) -> Self {
        self.inner.simulation |= control.flag();
        self
    }

    /// Validates and returns the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::InvalidConfig`] for a report id of 0 or
    /// [`GUI_REPORT_ID`], more than [`MAX_BUTTONS`] buttons, or more than
    /// [`MAX_HAT_SWITCHES`] hat switches.
    pub fn build(self) -> DescriptorResult<CapabilityConfig> {
        self.inner.validate()
    }
}

/// Serialized form of [`CapabilityConfig`], as written in device profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawCapabilityConfig {
    pub report_id: u8,
    pub device_type: DeviceType,
    pub buttons: u8,
    pub hat_switches: u8,
    pub axes: Vec<Axis>,
    pub simulation: Vec<SimulationControl>,
}

impl Default for RawCapabilityConfig {
    fn default() -> Self {
        CapabilityConfig::full().into()
    }
}

impl TryFrom<RawCapabilityConfig> for CapabilityConfig {
    type Error = DescriptorError;

    fn try_from(raw: RawCapabilityConfig) -> DescriptorResult<Self> {
        CapabilityConfig::builder()
            .report_id(raw.report_id)
            .device_type(raw.device_type)
            .buttons(raw.buttons)
            .hat_switches(raw.hat_switches)
            .axes(raw.axes.into_iter().collect())
            .simulation(raw.simulation.into_iter().collect())
            .build()
    }
}

impl From<CapabilityConfig> for RawCapabilityConfig {
    fn from(config: CapabilityConfig) -> Self {
        Self {
            report_id: config.report_id,
            device_type: config.device_type,
            buttons: config.button_count,
            hat_switches: config.hat_switch_count,
            axes: config.axes.axes().collect(),
            simulation: config.simulation.controls().collect(),
        }
    }
}
