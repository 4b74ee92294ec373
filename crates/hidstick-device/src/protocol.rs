//! Configuration command and response records

use hidstick_hid_common::{HidCommonError, HidCommonResult, ReportParser, ReportWriter};
use hidstick_settings::SETTINGS_PAYLOAD_LEN;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Size of an inbound command record: code plus four `i16` arguments.
pub const COMMAND_REPORT_LEN: usize = 9;
/// Size of an outbound response record: code, echoed argument, payload.
pub const RESPONSE_REPORT_LEN: usize = 3 + SETTINGS_PAYLOAD_LEN;

/// Configuration command codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Command {
    /// Report settings and send a fresh input report.
    ReadState = 0x01,
    /// X range from args 0..2, Y range from args 2..4, raw units.
    SetCalibration = 0x02,
    SetAutoRecoil = 0x03,
    SetTriggerRepeatRate = 0x04,
    SetTriggerHoldTime = 0x05,
    /// Correlation id used to match a host port to this device.
    SetUniqueId = 0x06,
    /// Liveness check answered with an echo. The code is local to hidstick;
    /// the configuration tool never sends it.
    Heartbeat = 0x0F,
    SaveSettings = 0x10,
    LoadSettings = 0x11,
    ResetSettings = 0x12,
    Fire = 0x13,
}

impl Command {
    pub const ALL: [Command; 11] = [
        Command::ReadState,
        Command::SetCalibration,
        Command::SetAutoRecoil,
        Command::SetTriggerRepeatRate,
        Command::SetTriggerHoldTime,
        Command::SetUniqueId,
        Command::Heartbeat,
        Command::SaveSettings,
        Command::LoadSettings,
        Command::ResetSettings,
        Command::Fire,
    ];

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.code() == code)
    }

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Command::ReadState => "read_state",
            Command::SetCalibration => "set_calibration",
            Command::SetAutoRecoil => "set_auto_recoil",
            Command::SetTriggerRepeatRate => "set_trigger_repeat_rate",
            Command::SetTriggerHoldTime => "set_trigger_hold_time",
            Command::SetUniqueId => "set_unique_id",
            Command::Heartbeat => "heartbeat",
            Command::SaveSettings => "save_settings",
            Command::LoadSettings => "load_settings",
            Command::ResetSettings => "reset_settings",
            Command::Fire => "fire",
        }
    }

    /// Whether the command answers with a settings snapshot.
    pub const fn responds_with_snapshot(self) -> bool {
        !matches!(
            self,
            Command::SetUniqueId | Command::Heartbeat | Command::Fire
        )
    }
}

/// Accepts a snake_case name or a decimal/`0x` hex code.
impl FromStr for Command {
    type Err = HidCommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.to_ascii_lowercase().replace('-', "_");
        let code = match name.strip_prefix("0x") {
            Some(hex) => u8::from_str_radix(hex, 16).ok(),
            None => name.parse::<u8>().ok(),
        };
        Self::ALL
            .into_iter()
            .find(|command| command.name() == name || Some(command.code()) == code)
            .ok_or_else(|| HidCommonError::InvalidReport(format!("unknown command '{s}'")))
    }
}

/// Inbound command record.
///
/// Code 0 means nothing is pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReport {
    pub command: u8,
    pub args: [i16; 4],
}

impl CommandReport {
    pub fn new(command: Command, args: [i16; 4]) -> Self {
        Self {
            command: command.code(),
            args,
        }
    }

    /// Parses a record; trailing bytes beyond the fixed layout are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`HidCommonError::InvalidReport`] when `data` is shorter than
    /// [`COMMAND_REPORT_LEN`].
    pub fn parse(data: &[u8]) -> HidCommonResult<Self> {
        if data.len() < COMMAND_REPORT_LEN {
            return Err(HidCommonError::InvalidReport(format!(
                "command record is {} bytes, expected {COMMAND_REPORT_LEN}",
                data.len()
            )));
        }

        let mut parser = ReportParser::new(data);
        let command = parser.read_u8()?;
        let mut args = [0i16; 4];
        for arg in &mut args {
            *arg = parser.read_i16_le()?;
        }
        Ok(Self { command, args })
    }

    /// # Errors
    ///
    /// Never fails in practice; the writer is sized for the record.
    pub fn encode(&self) -> HidCommonResult<[u8; COMMAND_REPORT_LEN]> {
        let mut writer = ReportWriter::with_capacity(COMMAND_REPORT_LEN);
        writer.write_u8(self.command)?;
        for arg in self.args {
            writer.write_i16_le(arg)?;
        }
        let mut out = [0u8; COMMAND_REPORT_LEN];
        out.copy_from_slice(writer.as_slice());
        Ok(out)
    }

    pub fn is_pending(&self) -> bool {
        self.command != 0
    }
}

/// Outbound response record, sent on the response report id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuiResponse {
    pub command: u8,
    /// Echo of the first command argument.
    pub arg: i16,
    /// Settings snapshot, or zeros for echo-only responses.
    pub payload: [u8; SETTINGS_PAYLOAD_LEN],
}

impl GuiResponse {
    /// Response carrying no payload.
    pub fn echo(request: &CommandReport) -> Self {
        Self {
            command: request.command,
            arg: request.args[0],
            payload: [0; SETTINGS_PAYLOAD_LEN],
        }
    }

    pub fn with_payload(request: &CommandReport, payload: [u8; SETTINGS_PAYLOAD_LEN]) -> Self {
        Self {
            payload,
            ..Self::echo(request)
        }
    }

    /// # Errors
    ///
    /// Never fails in practice; the writer is sized for the record.
    pub fn encode(&self) -> HidCommonResult<[u8; RESPONSE_REPORT_LEN]> {
        let mut writer = ReportWriter::with_capacity(RESPONSE_REPORT_LEN);
        writer
            .write_u8(self.command)?
            .write_i16_le(self.arg)?
            .write_bytes(&self.payload)?;
        let mut out = [0u8; RESPONSE_REPORT_LEN];
        out.copy_from_slice(writer.as_slice());
        Ok(out)
    }

    /// # Errors
    ///
    /// Returns [`HidCommonError::InvalidReport`] when `data` is shorter than
    /// [`RESPONSE_REPORT_LEN`].
    pub fn parse(data: &[u8]) -> HidCommonResult<Self> {
        if data.len() < RESPONSE_REPORT_LEN {
            return Err(HidCommonError::InvalidReport(format!(
                "response record is {} bytes, expected {RESPONSE_REPORT_LEN}",
                data.len()
            )));
        }
        let mut parser = ReportParser::new(data);
        Ok(Self {
            command: parser.read_u8()?,
            arg: parser.read_i16_le()?,
            payload: parser.read_array::<SETTINGS_PAYLOAD_LEN>()?,
        })
    }
}
