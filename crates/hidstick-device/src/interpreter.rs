//! Configuration command dispatch

use crate::{Actuator, Command, CommandReport, DeviceResult, GuiResponse, Joystick};
use hidstick_calibration::AxisRange;
use hidstick_hid_common::HidTransport;
use hidstick_hid_joystick_protocol::{Axis, GUI_REPORT_ID};
use hidstick_settings::StorageMedium;
use tracing::{debug, warn};

/// Single-slot mailbox for the inbound command record.
///
/// A newer record overwrites one that has not been processed yet; taking a
/// record clears the slot so each one is handled once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandInterpreter {
    pending: CommandReport,
}

impl CommandInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, report: CommandReport) {
        if self.pending.is_pending() {
            debug!(
                dropped = self.pending.command,
                "overwriting unprocessed command"
            );
        }
        self.pending = report;
    }

    pub fn pending(&self) -> &CommandReport {
        &self.pending
    }

    /// Returns the pending record and resets the slot to code 0.
    pub fn take(&mut self) -> Option<CommandReport> {
        if !self.pending.is_pending() {
            return None;
        }
        Some(std::mem::take(&mut self.pending))
    }
}

impl<T: HidTransport, S: StorageMedium> Joystick<T, S> {
    /// Parses a raw command record into the mailbox.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DeviceError::Hid`] if `data` is shorter than a
    /// command record; the mailbox is left untouched.
    pub fn submit_command(&mut self, data: &[u8]) -> DeviceResult<()> {
        let report = CommandReport::parse(data)?;
        self.commands.submit(report);
        Ok(())
    }

    pub fn pending_command(&self) -> &CommandReport {
        self.commands.pending()
    }

    /// Receives at most one record from the transport and processes it.
    ///
    /// Malformed records are logged and dropped.
    ///
    /// # Errors
    ///
    /// Propagates transport failures and errors from
    /// [`Joystick::process_command`].
    pub fn poll_commands(&mut self, actuator: &mut dyn Actuator) -> DeviceResult<Option<Command>> {
        if let Some(data) = self.transport_mut().receive_command()? {
            if let Err(e) = self.submit_command(&data) {
                warn!(error = %e, len = data.len(), "dropping malformed command record");
            }
        }
        self.process_command(actuator)
    }

    /// Handles the pending command, if any, and sends its response.
    ///
    /// Returns the command that ran. Unknown codes are consumed and ignored.
    ///
    /// # Errors
    ///
    /// Returns transport failures while sending the response or the input
    /// report requested by [`Command::ReadState`].
    pub fn process_command(
        &mut self,
        actuator: &mut dyn Actuator,
    ) -> DeviceResult<Option<Command>> {
        let Some(request) = self.commands.take() else {
            return Ok(None);
        };
        let Some(command) = Command::from_code(request.command) else {
            debug!(code = request.command, "ignoring unknown command");
            return Ok(None);
        };
        let [a0, a1, a2, a3] = request.args;
        debug!(?command, args = ?request.args, "processing command");

        match command {
            Command::ReadState => {}
            Command::SetCalibration => self.apply_calibration(a0, a1, a2, a3),
            Command::SetAutoRecoil => self.set_auto_recoil(a0 != 0),
            Command::SetTriggerRepeatRate => self.set_trigger_repeat_rate(arg_bits(a0)),
            Command::SetTriggerHoldTime => self.set_trigger_hold_time(arg_bits(a0)),
            Command::SetUniqueId => self.set_unique_id(arg_bits(a0)),
            Command::Heartbeat => {}
            Command::SaveSettings => {
                if let Err(e) = self.save_settings() {
                    warn!(error = %e, "failed to save settings");
                }
            }
            Command::LoadSettings => {
                if let Err(e) = self.load_settings() {
                    warn!(error = %e, "failed to load settings, keeping current values");
                }
            }
            Command::ResetSettings => self.load_default_settings(),
            Command::Fire => {
                if a0 > 0 {
                    actuator.fire(true, false);
                }
            }
        }

        if command.responds_with_snapshot() {
            let response = GuiResponse::with_payload(&request, self.snapshot_payload()?);
            self.send_response(&response)?;
        } else if command == Command::Heartbeat {
            self.send_response(&GuiResponse::echo(&request))?;
        }

        if command == Command::ReadState {
            self.send_state()?;
        }

        Ok(Some(command))
    }

    fn apply_calibration(&mut self, x_min: i16, x_max: i16, y_min: i16, y_max: i16) {
        match (AxisRange::new(x_min, x_max), AxisRange::new(y_min, y_max)) {
            (Ok(x), Ok(y)) => {
                self.set_axis_range(Axis::X, x);
                self.set_axis_range(Axis::Y, y);
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, x_min, x_max, y_min, y_max, "rejecting calibration");
            }
        }
    }

    fn send_response(&mut self, response: &GuiResponse) -> DeviceResult<()> {
        let bytes = response.encode()?;
        self.transport_mut().send_report(GUI_REPORT_ID, &bytes)?;
        Ok(())
    }
}

/// Command arguments travel as `i16`; unsigned settings take the same bits.
fn arg_bits(arg: i16) -> u16 {
    u16::from_le_bytes(arg.to_le_bytes())
}
