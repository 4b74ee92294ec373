//! Settings record and its fixed byte encoding

use crate::{SettingsError, SettingsResult};
use hidstick_calibration::AxisRange;
use hidstick_hid_common::{ReportParser, ReportWriter};
use serde::{Deserialize, Serialize};

/// Width of the NUL-padded identity field.
pub const IDENTITY_FIELD_LEN: usize = 10;
/// Width of the NUL-padded version field.
pub const VERSION_FIELD_LEN: usize = 6;
/// Encoded size of a [`Settings`] record, without checksum.
pub const SETTINGS_PAYLOAD_LEN: usize = 29;
/// Persisted size: payload plus the trailing checksum byte.
pub const SETTINGS_RECORD_LEN: usize = SETTINGS_PAYLOAD_LEN + 1;

pub const DEFAULT_IDENTITY: &str = "HIDSTICK";
pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_TRIGGER_REPEAT_RATE: u16 = 100;
pub const DEFAULT_TRIGGER_HOLD_TIME: u16 = 1000;

/// Calibration and behaviour settings that survive a power cycle.
///
/// Encoded field order (all multi-byte values little-endian):
///
/// | Offset | Size | Field |
/// |---|---|---|
/// | 0 | 10 | identity, NUL padded |
/// | 10 | 6 | version, NUL padded |
/// | 16 | 2 | X minimum |
/// | 18 | 2 | X maximum |
/// | 20 | 2 | Y minimum |
/// | 22 | 2 | Y maximum |
/// | 24 | 1 | auto recoil (0 or 1) |
/// | 25 | 2 | trigger repeat rate |
/// | 27 | 2 | trigger hold time |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub identity: String,
    pub version: String,
    pub x_range: AxisRange,
    pub y_range: AxisRange,
    pub auto_recoil: bool,
    /// Milliseconds between automatic trigger repeats.
    pub trigger_repeat_rate: u16,
    /// Milliseconds the trigger must be held before repeating.
    pub trigger_hold_time: u16,
}

impl Settings {
    /// Compiled-in factory settings.
    pub fn defaults() -> Self {
        Self {
            identity: DEFAULT_IDENTITY.to_string(),
            version: DEFAULT_VERSION.to_string(),
            x_range: AxisRange::DEFAULT,
            y_range: AxisRange::DEFAULT,
            auto_recoil: true,
            trigger_repeat_rate: DEFAULT_TRIGGER_REPEAT_RATE,
            trigger_hold_time: DEFAULT_TRIGGER_HOLD_TIME,
        }
    }

    /// Encodes the record in its persisted field order, without checksum.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::TagTooLong`] if the identity or version tag
    /// does not fit its NUL-terminated field.
    pub fn encode(&self) -> SettingsResult<[u8; SETTINGS_PAYLOAD_LEN]> {
        SettingsPayload::from(self).encode()
    }

    /// Decodes a record produced by [`Settings::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Decode`] for a malformed payload and
    /// [`SettingsError::Calibration`] for an empty axis range.
    pub fn decode(bytes: &[u8]) -> SettingsResult<Self> {
        let payload = SettingsPayload::decode(bytes)?;
        let [x_min, x_max, y_min, y_max] = payload.bounds;
        Ok(Self {
            identity: payload.identity,
            version: payload.version,
            x_range: AxisRange::new(x_min, x_max)?,
            y_range: AxisRange::new(y_min, y_max)?,
            auto_recoil: payload.auto_recoil,
            trigger_repeat_rate: payload.trigger_repeat_rate,
            trigger_hold_time: payload.trigger_hold_time,
        })
    }

    /// Encodes the record with its trailing checksum.
    ///
    /// # Errors
    ///
    /// Same as [`Settings::encode`].
    pub fn to_record(&self) -> SettingsResult<[u8; SETTINGS_RECORD_LEN]> {
        let payload = self.encode()?;
        let mut record = [0u8; SETTINGS_RECORD_LEN];
        let (body, tail) = record.split_at_mut(SETTINGS_PAYLOAD_LEN);
        body.copy_from_slice(&payload);
        if let Some(slot) = tail.first_mut() {
            *slot = checksum(&payload);
        }
        Ok(record)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Field-level view of the 29-byte settings layout.
///
/// Unlike [`Settings`] the calibration bounds are plain integers, so the same
/// layout can carry values that are not valid physical ranges, such as the
/// logical-unit bounds reported to a configuration tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsPayload {
    pub identity: String,
    pub version: String,
    /// X minimum, X maximum, Y minimum, Y maximum.
    pub bounds: [i16; 4],
    pub auto_recoil: bool,
    pub trigger_repeat_rate: u16,
    pub trigger_hold_time: u16,
}

impl SettingsPayload {
    /// # Errors
    ///
    /// Returns [`SettingsError::TagTooLong`] if a tag does not fit its field.
    pub fn encode(&self) -> SettingsResult<[u8; SETTINGS_PAYLOAD_LEN]> {
        check_tag("identity", &self.identity, IDENTITY_FIELD_LEN)?;
        check_tag("version", &self.version, VERSION_FIELD_LEN)?;

        let mut writer = ReportWriter::with_capacity(SETTINGS_PAYLOAD_LEN);
        writer
            .write_padded(self.identity.as_bytes(), IDENTITY_FIELD_LEN)?
            .write_padded(self.version.as_bytes(), VERSION_FIELD_LEN)?;
        for bound in self.bounds {
            writer.write_i16_le(bound)?;
        }
        writer
            .write_u8(u8::from(self.auto_recoil))?
            .write_u16_le(self.trigger_repeat_rate)?
            .write_u16_le(self.trigger_hold_time)?;

        let mut out = [0u8; SETTINGS_PAYLOAD_LEN];
        if writer.len() != SETTINGS_PAYLOAD_LEN {
            return Err(SettingsError::Decode(format!(
                "encoded {} bytes, expected {SETTINGS_PAYLOAD_LEN}",
                writer.len()
            )));
        }
        out.copy_from_slice(writer.as_slice());
        Ok(out)
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::Decode`] for a short buffer, an unterminated
    /// or non-UTF-8 tag, or an auto-recoil byte other than 0 or 1.
    pub fn decode(bytes: &[u8]) -> SettingsResult<Self> {
        if bytes.len() < SETTINGS_PAYLOAD_LEN {
            return Err(SettingsError::Decode(format!(
                "record is {} bytes, expected {SETTINGS_PAYLOAD_LEN}",
                bytes.len()
            )));
        }

        let mut parser = ReportParser::new(bytes);
        let identity = read_tag("identity", parser.read_bytes(IDENTITY_FIELD_LEN)?)?;
        let version = read_tag("version", parser.read_bytes(VERSION_FIELD_LEN)?)?;
        let mut bounds = [0i16; 4];
        for bound in &mut bounds {
            *bound = parser.read_i16_le()?;
        }
        let auto_recoil = match parser.read_u8()? {
            0 => false,
            1 => true,
            other => {
                return Err(SettingsError::Decode(format!(
                    "auto recoil flag is {other:#04x}"
                )));
            }
        };

        Ok(Self {
            identity,
            version,
            bounds,
            auto_recoil,
            trigger_repeat_rate: parser.read_u16_le()?,
            trigger_hold_time: parser.read_u16_le()?,
        })
    }
}

impl From<&Settings> for SettingsPayload {
    fn from(settings: &Settings) -> Self {
        Self {
            identity: settings.identity.clone(),
            version: settings.version.clone(),
            bounds: [
                settings.x_range.minimum(),
                settings.x_range.maximum(),
                settings.y_range.minimum(),
                settings.y_range.maximum(),
            ],
            auto_recoil: settings.auto_recoil,
            trigger_repeat_rate: settings.trigger_repeat_rate,
            trigger_hold_time: settings.trigger_hold_time,
        }
    }
}

/// One-byte integrity check over a record payload.
///
/// Starts from the complement of the first byte and XORs in the complement
/// of every following byte.
///
/// ```
/// use hidstick_settings::checksum;
///
/// assert_eq!(checksum(&[0x00]), 0xFF);
/// assert_eq!(checksum(&[0x00, 0x00]), 0x00);
/// assert_eq!(checksum(&[0x0F, 0xF0]), 0xFF);
/// ```
pub fn checksum(bytes: &[u8]) -> u8 {
    match bytes.split_first() {
        Some((first, rest)) => rest.iter().fold(!first, |acc, byte| acc ^ !byte),
        None => 0,
    }
}

fn check_tag(field: &'static str, tag: &str, width: usize) -> SettingsResult<()> {
    let max = width - 1;
    if tag.len() > max || tag.as_bytes().contains(&0) {
        return Err(SettingsError::TagTooLong {
            field,
            len: tag.len(),
            max,
        });
    }
    Ok(())
}

fn read_tag(field: &str, raw: &[u8]) -> SettingsResult<String> {
    let end = raw
        .iter()
        .position(|byte| *byte == 0)
        .ok_or_else(|| SettingsError::Decode(format!("{field} tag is not NUL terminated")))?;
    let text = raw.get(..end).unwrap_or_default();
    String::from_utf8(text.to_vec())
        .map_err(|e| SettingsError::Decode(format!("{field} tag is not UTF-8: {e}")))
}
