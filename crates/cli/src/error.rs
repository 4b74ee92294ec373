//! Error types for stickctl

use hidstick_calibration::CalibrationError;
use hidstick_device::DeviceError;
use hidstick_hid_joystick_protocol::DescriptorError;
use hidstick_settings::SettingsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("No EEPROM image configured; pass --eeprom or set STICKCTL_EEPROM")]
    NoStorage,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    #[error("Calibration error: {0}")]
    Calibration(#[from] CalibrationError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),
}

impl CliError {
    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::ProfileNotFound(_) => 3,
            CliError::InvalidProfile(_)
            | CliError::ValidationError(_)
            | CliError::Descriptor(_)
            | CliError::Calibration(_) => 4,
            CliError::NoStorage | CliError::Settings(_) => 5,
            CliError::IoError(_) | CliError::JsonError(_) | CliError::Device(_) => 1,
        }
    }
}
