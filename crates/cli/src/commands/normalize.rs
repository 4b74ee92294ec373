//! Calibration preview

use anyhow::Result;
use hidstick_calibration::AxisRange;

use crate::error::CliError;
use crate::output;

/// Print the report value for a raw reading in `[min, max]`
pub fn execute(value: i16, min: i16, max: i16, json: bool) -> Result<()> {
    let range = AxisRange::new(min, max).map_err(CliError::from)?;
    output::print_normalized(&range, value, range.normalize(value), json);
    Ok(())
}
