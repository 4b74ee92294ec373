//! HID joystick protocol for hidstick controllers
//!
//! This crate turns a [`CapabilityConfig`] into the two artefacts a host needs
//! to understand the device:
//!
//! - a binary HID report descriptor ([`synthesize`]), and
//! - the matching input report layout ([`ReportLayout`]) used by the runtime
//!   serializer.
//!
//! ## Feature taxonomy
//! - Up to 32 buttons
//! - Up to 2 hat switches sharing one report byte
//! - Six positional axes (X, Y, Z, Rx, Ry, Rz)
//! - Five simulation controls (rudder, throttle, accelerator, brake, steering)

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod descriptor;
pub mod layout;
pub mod types;

pub use config::*;
pub use descriptor::*;
pub use layout::*;
pub use types::*;

use hidstick_hid_common::HidCommonError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("Invalid capability configuration: {0}")]
    InvalidConfig(String),

    #[error("Descriptor capacity exceeded: {required} bytes required, capacity is {capacity}")]
    CapacityExceeded { capacity: usize, required: usize },

    #[error("Input report is {actual} bytes, layout expects {expected}")]
    ReportLengthMismatch { expected: usize, actual: usize },

    #[error("HID error: {0}")]
    HidError(String),
}

pub type DescriptorResult<T> = Result<T, DescriptorError>;

impl From<HidCommonError> for DescriptorError {
    fn from(e: HidCommonError) -> Self {
        match e {
            HidCommonError::BufferOverflow {
                capacity,
                requested,
            } => DescriptorError::CapacityExceeded {
                capacity,
                required: requested,
            },
            other => DescriptorError::HidError(other.to_string()),
        }
    }
}

/// Upper bound on the synthesised descriptor, in bytes.
pub const DESCRIPTOR_CAPACITY: usize = 150;
pub const MAX_BUTTONS: u8 = 32;
pub const MAX_HAT_SWITCHES: u8 = 2;

/// Report id reserved for responses to configuration commands.
pub const GUI_REPORT_ID: u8 = 16;

/// Report id used when a profile does not name one.
pub const DEFAULT_REPORT_ID: u8 = 1;
