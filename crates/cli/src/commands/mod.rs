//! Command implementations for stickctl

pub mod descriptor;
pub mod emulate;
pub mod normalize;
pub mod settings;

use clap::Subcommand;
use hidstick_calibration::AxisRange;

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show the settings stored in the EEPROM image
    Show,

    /// Overwrite the EEPROM image with factory defaults
    Reset,

    /// Change individual fields and save
    Set {
        /// Identity tag (at most 9 characters)
        #[arg(long)]
        identity: Option<String>,

        /// Version tag (at most 5 characters)
        #[arg(long)]
        version: Option<String>,

        /// X calibration as MIN:MAX, raw units
        #[arg(long, value_parser = parse_range, allow_hyphen_values = true)]
        x_range: Option<AxisRange>,

        /// Y calibration as MIN:MAX, raw units
        #[arg(long, value_parser = parse_range, allow_hyphen_values = true)]
        y_range: Option<AxisRange>,

        /// Enable or disable automatic recoil
        #[arg(long)]
        auto_recoil: Option<bool>,

        /// Milliseconds between trigger repeats
        #[arg(long)]
        repeat_rate: Option<u16>,

        /// Milliseconds before the trigger repeats
        #[arg(long)]
        hold_time: Option<u16>,
    },
}

/// Parses `MIN:MAX` into a calibration range.
pub fn parse_range(s: &str) -> Result<AxisRange, String> {
    let (min, max) = s
        .split_once(':')
        .ok_or_else(|| format!("expected MIN:MAX, got '{s}'"))?;
    let min = min
        .trim()
        .parse::<i16>()
        .map_err(|e| format!("invalid minimum '{min}': {e}"))?;
    let max = max
        .trim()
        .parse::<i16>()
        .map_err(|e| format!("invalid maximum '{max}': {e}"))?;
    AxisRange::new(min, max).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() -> Result<(), String> {
        assert_eq!(
            parse_range("1023:0")?,
            AxisRange::new(1023, 0).map_err(|e| e.to_string())?
        );
        assert_eq!(
            parse_range("-100: 100")?,
            AxisRange::new(-100, 100).map_err(|e| e.to_string())?
        );
        assert!(parse_range("5:5").is_err());
        assert!(parse_range("5").is_err());
        assert!(parse_range("a:5").is_err());
        Ok(())
    }
}
