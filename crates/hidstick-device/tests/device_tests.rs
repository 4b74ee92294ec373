//! End-to-end tests for the joystick device core.
//!
//! Each test drives a [`Joystick`] over the mock transport and an in-memory
//! EEPROM, the same way firmware glue code would.

use hidstick_calibration::AxisRange;
use hidstick_device::actuator::mock::RecordingActuator;
use hidstick_device::{Command, CommandReport, DeviceResult, GuiResponse, Joystick};
use hidstick_hid_common::mock::MockTransport;
use hidstick_hid_joystick_protocol::{
    Axis, AxisSet, CapabilityConfig, GUI_REPORT_ID, SimulationControl, SimulationSet,
};
use hidstick_settings::{
    MemoryStorage, SETTINGS_RECORD_LEN, Settings, SettingsPayload, SettingsStore, checksum,
};
use insta::assert_snapshot;

type TestJoystick = Joystick<MockTransport, MemoryStorage>;

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn eight_button_stick() -> DeviceResult<TestJoystick> {
    let config = CapabilityConfig::builder()
        .buttons(8)
        .axes(AxisSet::X | AxisSet::Y)
        .build()?;
    Joystick::new(config, MockTransport::new(), MemoryStorage::default())
}

#[test]
fn test_eight_buttons_two_axes_report() -> DeviceResult<()> {
    let mut joystick = eight_button_stick()?;
    assert_eq!(joystick.layout().report_size(), 5);

    joystick.set_axis(Axis::X, 512)?;
    joystick.set_axis(Axis::Y, 1023)?;
    joystick.press_button(0)?;
    joystick.press_button(7)?;
    joystick.send_state()?;

    let sent = joystick.transport().sent_reports();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].report_id, 1);
    assert_eq!(sent[0].data, vec![0x81, 0x20, 0x00, 0xFF, 0x7F]);
    Ok(())
}

#[test]
fn test_press_release_restores_buttons() -> DeviceResult<()> {
    let mut joystick = eight_button_stick()?;
    joystick.press_button(1)?;
    let before = joystick.state().buttons().to_vec();

    joystick.press_button(3)?;
    assert!(joystick.state().button(3));
    joystick.release_button(3)?;

    assert_eq!(joystick.state().buttons(), before.as_slice());
    Ok(())
}

#[test]
fn test_auto_send_emits_one_report_per_setter() -> DeviceResult<()> {
    let config = CapabilityConfig::builder()
        .buttons(4)
        .hat_switches(1)
        .axes(AxisSet::Z)
        .simulation(SimulationSet::RUDDER)
        .build()?;
    let mut joystick = Joystick::new(config, MockTransport::new(), MemoryStorage::default())?;
    joystick.begin(true)?;

    joystick.press_button(2)?;
    joystick.set_hat_switch(0, 45)?;
    joystick.set_axis(Axis::Z, 1023)?;
    joystick.set_simulation(SimulationControl::Rudder, 0)?;
    // Range setters and ignored indices do not send.
    joystick.set_axis_range(Axis::Z, AxisRange::new(0, 2047)?);
    joystick.press_button(4)?;
    joystick.set_hat_switch(1, 90)?;

    let reports = joystick.transport().reports_with_id(1);
    assert_eq!(reports.len(), 5);
    assert_eq!(
        reports.last().map(|r| r.data.clone()),
        Some(vec![0x04, 0x01, 0xFF, 0x7F, 0x01, 0x80])
    );
    Ok(())
}

#[test]
fn test_manual_batch_update() -> DeviceResult<()> {
    let mut joystick = eight_button_stick()?;
    joystick.begin(true)?;
    joystick.set_auto_send(false);

    joystick.press_button(5)?;
    joystick.set_axis(Axis::X, 1023)?;
    joystick.send_state()?;

    let reports = joystick.transport().reports_with_id(1);
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[1].data, vec![0x20, 0xFF, 0x7F, 0x01, 0x80]);
    Ok(())
}

#[test]
fn test_settings_survive_device_restart() -> DeviceResult<()> {
    let mut joystick = eight_button_stick()?;
    joystick.submit_command(&CommandReport::new(Command::SetCalibration, [50, 950, 900, 80]).encode()?)?;
    joystick.process_command(&mut RecordingActuator::new())?;
    joystick.submit_command(&CommandReport::new(Command::SaveSettings, [0; 4]).encode()?)?;
    joystick.process_command(&mut RecordingActuator::new())?;

    let medium = joystick.medium().clone();
    let record = &medium.bytes()[..SETTINGS_RECORD_LEN];
    assert_eq!(
        record.last().copied(),
        Some(checksum(&record[..SETTINGS_RECORD_LEN - 1]))
    );

    let restarted = Joystick::new(*joystick.config(), MockTransport::new(), medium)?;
    assert_eq!(restarted.state().axis_range(Axis::X), AxisRange::new(50, 950)?);
    assert_eq!(restarted.state().axis_range(Axis::Y), AxisRange::new(900, 80)?);
    Ok(())
}

#[test]
fn test_corrupted_eeprom_boots_with_defaults() -> DeviceResult<()> {
    let mut joystick = eight_button_stick()?;
    joystick.set_trigger_hold_time(5);
    joystick.save_settings()?;

    let mut medium = joystick.medium().clone();
    medium.bytes_mut()[3] ^= 0x01;

    let restarted = Joystick::new(*joystick.config(), MockTransport::new(), medium)?;
    assert_eq!(restarted.settings_snapshot(), Settings::defaults());
    Ok(())
}

#[test]
fn test_snapshot_read_state_response() -> DeviceResult<()> {
    let mut joystick = eight_button_stick()?;
    joystick
        .transport_mut()
        .queue_command(CommandReport::new(Command::ReadState, [7, 0, 0, 0]).encode()?);
    joystick.poll_commands(&mut RecordingActuator::new())?;

    let response = joystick
        .transport()
        .last_report(GUI_REPORT_ID)
        .map(|r| hex(&r.data))
        .unwrap_or_default();
    assert_snapshot!(response, @"01 07 00 48 49 44 53 54 49 43 4B 00 00 31 2E 30 2E 30 00 01 80 FF 7F 01 80 FF 7F 01 64 00 E8 03");
    Ok(())
}

#[test]
fn test_stored_firmware_tags_are_not_reported() -> DeviceResult<()> {
    let mut store = SettingsStore::new(MemoryStorage::default());
    store.save(&Settings {
        identity: "OLDFW".into(),
        version: "0.1".into(),
        trigger_hold_time: 42,
        ..Settings::defaults()
    })?;

    let config = *eight_button_stick()?.config();
    let mut joystick = Joystick::new(config, MockTransport::new(), store.into_inner())?;
    assert_eq!(joystick.trigger_hold_time(), 42);

    let mut actuator = RecordingActuator::new();
    joystick.submit_command(&CommandReport::new(Command::ReadState, [0; 4]).encode()?)?;
    joystick.process_command(&mut actuator)?;
    let response = joystick
        .transport()
        .last_report(GUI_REPORT_ID)
        .map(|r| GuiResponse::parse(&r.data))
        .transpose()?
        .map(|r| r.payload)
        .unwrap_or_default();
    let payload = SettingsPayload::decode(&response)?;
    assert_eq!(payload.identity, "HIDSTICK");
    assert_eq!(payload.version, "1.0.0");
    assert_eq!(payload.trigger_hold_time, 42);

    joystick.submit_command(&CommandReport::new(Command::SaveSettings, [0; 4]).encode()?)?;
    joystick.process_command(&mut actuator)?;
    let saved = SettingsStore::new(joystick.medium().clone()).load(false)?;
    assert_eq!(saved.identity, "HIDSTICK");
    assert_eq!(saved.version, "1.0.0");
    assert_eq!(saved.trigger_hold_time, 42);
    Ok(())
}

#[test]
fn test_command_responses_use_response_report_id() -> DeviceResult<()> {
    let mut joystick = eight_button_stick()?;
    let mut actuator = RecordingActuator::new();

    for command in Command::ALL {
        joystick.transport_mut().clear_sent();
        joystick.submit_command(&CommandReport::new(command, [1, 0, 1, 2]).encode()?)?;
        assert_eq!(joystick.process_command(&mut actuator)?, Some(command));

        let responses = joystick.transport().reports_with_id(GUI_REPORT_ID);
        let expected = usize::from(command.responds_with_snapshot() || command == Command::Heartbeat);
        assert_eq!(responses.len(), expected, "{command:?}");
        for response in responses {
            assert_eq!(GuiResponse::parse(&response.data)?.command, command.code());
        }
    }

    assert_eq!(actuator.events().len(), 1);
    Ok(())
}
