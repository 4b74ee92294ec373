//! Device profiles
//!
//! A profile is a YAML document describing the emulated controller:
//!
//! ```yaml
//! capabilities:
//!   report_id: 1
//!   buttons: 8
//!   hat_switches: 1
//!   axes: [x, y]
//!   simulation: [throttle]
//! auto_send: true
//! ranges:
//!   axes:
//!     x: { minimum: 1023, maximum: 0 }
//!   simulation:
//!     throttle: { minimum: 100, maximum: 900 }
//! ```

use crate::error::CliError;
use clap::Args;
use hidstick_calibration::AxisRange;
use hidstick_device::Joystick;
use hidstick_hid_common::HidTransport;
use hidstick_hid_joystick_protocol::{
    Axis, CapabilityConfig, DeviceType, SimulationControl,
};
use hidstick_settings::StorageMedium;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

fn default_auto_send() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceProfile {
    #[serde(default)]
    pub capabilities: CapabilityConfig,
    #[serde(default = "default_auto_send")]
    pub auto_send: bool,
    #[serde(default)]
    pub ranges: ProfileRanges,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            capabilities: CapabilityConfig::default(),
            auto_send: default_auto_send(),
            ranges: ProfileRanges::default(),
        }
    }
}

/// Calibration ranges applied on top of the stored settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileRanges {
    pub axes: BTreeMap<Axis, AxisRange>,
    pub simulation: BTreeMap<SimulationControl, AxisRange>,
}

impl DeviceProfile {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CliError::ProfileNotFound(path.display().to_string()),
            _ => CliError::IoError(e),
        })?;
        let profile: Self = serde_yaml::from_str(&text)
            .map_err(|e| CliError::InvalidProfile(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "loaded device profile");
        Ok(profile)
    }

    pub fn apply_ranges<T: HidTransport, S: StorageMedium>(&self, joystick: &mut Joystick<T, S>) {
        for (axis, range) in &self.ranges.axes {
            joystick.set_axis_range(*axis, *range);
        }
        for (control, range) in &self.ranges.simulation {
            joystick.set_simulation_range(*control, *range);
        }
    }
}

/// Capability selection shared by the descriptor-oriented commands.
///
/// Flags override the profile. Without a profile, controls not named by a
/// flag are absent.
#[derive(Args, Debug, Clone, Default)]
pub struct CapabilityArgs {
    /// YAML device profile
    #[arg(short, long)]
    pub profile: Option<PathBuf>,

    /// Input report id (1-255, not 16)
    #[arg(long)]
    pub report_id: Option<u8>,

    /// Top-level usage: joystick, gamepad or multi-axis
    #[arg(long)]
    pub device_type: Option<DeviceType>,

    /// Number of buttons (0-32)
    #[arg(long)]
    pub buttons: Option<u8>,

    /// Number of hat switches (0-2)
    #[arg(long)]
    pub hats: Option<u8>,

    /// Comma-separated positional axes, e.g. x,y,rz
    #[arg(long, value_delimiter = ',')]
    pub axes: Option<Vec<Axis>>,

    /// Comma-separated simulation controls, e.g. throttle,brake
    #[arg(long, value_delimiter = ',')]
    pub simulation: Option<Vec<SimulationControl>>,
}

impl CapabilityArgs {
    pub fn resolve(&self) -> Result<DeviceProfile, CliError> {
        let mut profile = match &self.profile {
            Some(path) => DeviceProfile::load(path)?,
            None => DeviceProfile {
                capabilities: CapabilityConfig::builder().build()?,
                ..DeviceProfile::default()
            },
        };

        let base = profile.capabilities;
        profile.capabilities = CapabilityConfig::builder()
            .report_id(self.report_id.unwrap_or(base.report_id()))
            .device_type(self.device_type.unwrap_or(base.device_type()))
            .buttons(self.buttons.unwrap_or(base.button_count()))
            .hat_switches(self.hats.unwrap_or(base.hat_switch_count()))
            .axes(match &self.axes {
                Some(axes) => axes.iter().copied().collect(),
                None => base.axes(),
            })
            .simulation(match &self.simulation {
                Some(controls) => controls.iter().copied().collect(),
                None => base.simulation(),
            })
            .build()?;
        Ok(profile)
    }
}
