//! Integer range mapping

use crate::{CalibrationError, CalibrationResult};

/// Lowest value an axis or simulation field may carry in a report.
pub const LOGICAL_MINIMUM: i16 = -32767;

/// Highest value an axis or simulation field may carry in a report.
pub const LOGICAL_MAXIMUM: i16 = 32767;

/// Affinely maps `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// Uses `(value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min`
/// with truncating integer division, so both endpoints map exactly and values
/// in between round toward `out_min`. Values outside the input range are
/// extrapolated, not clamped.
///
/// # Errors
///
/// Returns [`CalibrationError::EmptyRange`] when `in_min == in_max`.
///
/// # Examples
///
/// ```
/// use hidstick_calibration::map_range;
///
/// assert_eq!(map_range(1023, 0, 1023, -32767, 32767), Ok(32767));
/// assert_eq!(map_range(512, 0, 1023, -32767, 32767), Ok(32));
/// ```
pub fn map_range(
    value: i64,
    in_min: i64,
    in_max: i64,
    out_min: i64,
    out_max: i64,
) -> CalibrationResult<i64> {
    let span = in_max - in_min;
    if span == 0 {
        return Err(CalibrationError::EmptyRange(in_min));
    }
    Ok((value - in_min) * (out_max - out_min) / span + out_min)
}

/// Like [`map_range`] for 16-bit values, saturating the result to `i16`.
///
/// # Errors
///
/// Returns [`CalibrationError::EmptyRange`] when `in_min == in_max`.
pub fn map_range_i16(
    value: i16,
    in_min: i16,
    in_max: i16,
    out_min: i16,
    out_max: i16,
) -> CalibrationResult<i16> {
    let mapped = map_range(
        i64::from(value),
        i64::from(in_min),
        i64::from(in_max),
        i64::from(out_min),
        i64::from(out_max),
    )?;
    Ok(saturate_i16(mapped))
}

pub(crate) fn saturate_i16(value: i64) -> i16 {
    i16::try_from(value).unwrap_or(if value < 0 { i16::MIN } else { i16::MAX })
}
