//! Axis calibration for hidstick controllers
//!
//! Raw sensor readings are clamped against a per-axis physical range and then
//! rescaled onto the fixed logical range that the report descriptor declares.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod mapping;
pub mod types;

pub use mapping::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationError {
    #[error("Empty physical range: minimum and maximum are both {0}")]
    EmptyRange(i64),
}

pub type CalibrationResult<T> = Result<T, CalibrationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_types() {
        let err = CalibrationError::EmptyRange(512);
        assert_eq!(
            format!("{}", err),
            "Empty physical range: minimum and maximum are both 512"
        );
    }
}
