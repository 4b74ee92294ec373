//! Persistent settings for hidstick controllers
//!
//! Settings live in a small non-volatile medium as a fixed 29-byte record
//! followed by a one-byte checksum. A missing, corrupted or undecodable
//! record falls back to [`Settings::defaults`].

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod record;
pub mod storage;
pub mod store;

pub use record::*;
pub use storage::*;
pub use store::*;

use hidstick_calibration::CalibrationError;
use hidstick_hid_common::HidCommonError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Access out of bounds: {len} bytes at address {address}, capacity is {capacity}")]
    OutOfBounds {
        address: usize,
        len: usize,
        capacity: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{field} tag is {len} bytes, at most {max} fit")]
    TagTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Invalid settings record: {0}")]
    Decode(String),

    #[error("Invalid calibration: {0}")]
    Calibration(#[from] CalibrationError),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

impl From<HidCommonError> for SettingsError {
    fn from(e: HidCommonError) -> Self {
        SettingsError::Decode(e.to_string())
    }
}

/// Address of the settings record within the medium.
pub const SETTINGS_ADDRESS: usize = 0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SettingsError::TagTooLong {
            field: "identity",
            len: 12,
            max: 9,
        };
        assert_eq!(err.to_string(), "identity tag is 12 bytes, at most 9 fit");

        let err = SettingsError::from(StorageError::OutOfBounds {
            address: 1020,
            len: 30,
            capacity: 1024,
        });
        assert_eq!(
            err.to_string(),
            "Storage error: Access out of bounds: 30 bytes at address 1020, capacity is 1024"
        );
    }
}
