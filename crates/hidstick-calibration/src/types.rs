//! Calibration type definitions

use crate::mapping::{LOGICAL_MAXIMUM, LOGICAL_MINIMUM, saturate_i16};
use crate::{CalibrationError, CalibrationResult};
use serde::{Deserialize, Serialize};

/// Physical calibration range of one axis or simulation control.
///
/// Raw readings are clamped into the range before being rescaled onto
/// `[LOGICAL_MINIMUM, LOGICAL_MAXIMUM]`. A minimum greater than the maximum
/// marks the axis as inverted: the physical minimum still maps to the logical
/// minimum. The two bounds are never equal.
///
/// # Examples
///
/// ```
/// use hidstick_calibration::AxisRange;
///
/// let range = AxisRange::new(0, 1023)?;
/// assert_eq!(range.normalize(0), -32767);
/// assert_eq!(range.normalize(1023), 32767);
///
/// let inverted = AxisRange::new(1023, 0)?;
/// assert_eq!(inverted.normalize(1023), -32767);
/// # Ok::<(), hidstick_calibration::CalibrationError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAxisRange", into = "RawAxisRange")]
pub struct AxisRange {
    minimum: i16,
    maximum: i16,
}

/// Unvalidated serde form of [`AxisRange`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawAxisRange {
    pub minimum: i16,
    pub maximum: i16,
}

impl AxisRange {
    /// Factory range for a 10-bit ADC input.
    pub const DEFAULT: Self = Self {
        minimum: 0,
        maximum: 1023,
    };

    /// Creates a calibration range.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::EmptyRange`] when both bounds are equal;
    /// such a range cannot be rescaled.
    pub fn new(minimum: i16, maximum: i16) -> CalibrationResult<Self> {
        if minimum == maximum {
            return Err(CalibrationError::EmptyRange(i64::from(minimum)));
        }
        Ok(Self { minimum, maximum })
    }

    pub fn minimum(&self) -> i16 {
        self.minimum
    }

    pub fn maximum(&self) -> i16 {
        self.maximum
    }

    pub fn is_inverted(&self) -> bool {
        self.minimum > self.maximum
    }

    /// Returns `(low, high)` regardless of orientation.
    pub fn real_bounds(&self) -> (i16, i16) {
        (
            self.minimum.min(self.maximum),
            self.minimum.max(self.maximum),
        )
    }

    /// Clamps `value` into the range, reflects it when inverted, and rescales
    /// the result onto the logical report range.
    pub fn normalize(&self, value: i16) -> i16 {
        let (low, high) = self.real_bounds();
        let clamped = i64::from(value.clamp(low, high));
        let (low, high) = (i64::from(low), i64::from(high));

        let oriented = if self.is_inverted() {
            high - clamped + low
        } else {
            clamped
        };

        let logical_span = i64::from(LOGICAL_MAXIMUM) - i64::from(LOGICAL_MINIMUM);
        // low < high holds by construction
        let scaled = (oriented - low) * logical_span / (high - low) + i64::from(LOGICAL_MINIMUM);
        saturate_i16(scaled)
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<RawAxisRange> for AxisRange {
    type Error = CalibrationError;

    fn try_from(raw: RawAxisRange) -> CalibrationResult<Self> {
        Self::new(raw.minimum, raw.maximum)
    }
}

impl From<AxisRange> for RawAxisRange {
    fn from(range: AxisRange) -> Self {
        Self {
            minimum: range.minimum,
            maximum: range.maximum,
        }
    }
}

impl std::fmt::Display for AxisRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.minimum, self.maximum)
    }
}
