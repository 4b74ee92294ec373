//! Device core for hidstick joysticks
//!
//! [`Joystick`] owns everything a running controller needs: the capability
//! configuration, the live [`RuntimeState`], the transport it reports
//! through and the settings store it persists to. Host configuration tools
//! talk to it through the command protocol in [`protocol`], dispatched by
//! the [`CommandInterpreter`].
//!
//! ## Control flow
//! 1. Construction loads settings, synthesises the report descriptor and
//!    registers it with the transport exactly once.
//! 2. Setters mutate runtime state and, with auto-send on, emit an input
//!    report immediately.
//! 3. [`Joystick::poll_commands`] consumes one inbound command record and
//!    answers it on the response report id.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod actuator;
pub mod interpreter;
pub mod joystick;
pub mod protocol;
pub mod state;

pub use actuator::{Actuator, NoopActuator};
pub use interpreter::CommandInterpreter;
pub use joystick::*;
pub use protocol::*;
pub use state::RuntimeState;

use hidstick_calibration::CalibrationError;
use hidstick_hid_common::HidCommonError;
use hidstick_hid_joystick_protocol::DescriptorError;
use hidstick_settings::SettingsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    #[error("HID error: {0}")]
    Hid(#[from] HidCommonError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Calibration error: {0}")]
    Calibration(#[from] CalibrationError),

    #[error("Report size mismatch: wrote {actual} bytes, layout expects {expected}")]
    ReportSizeMismatch { expected: usize, actual: usize },
}

pub type DeviceResult<T> = Result<T, DeviceError>;
