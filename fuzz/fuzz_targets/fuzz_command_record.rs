//! Fuzzes command record parsing and dispatch on an emulated joystick.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_command_record
#![no_main]
use hidstick_device::actuator::mock::RecordingActuator;
use hidstick_device::{COMMAND_REPORT_LEN, CommandReport, Joystick};
use hidstick_hid_common::mock::MockTransport;
use hidstick_hid_joystick_protocol::CapabilityConfig;
use hidstick_settings::MemoryStorage;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must never panic on arbitrary bytes.
    let _ = CommandReport::parse(data);

    let Ok(mut joystick) = Joystick::new(
        CapabilityConfig::full(),
        MockTransport::new(),
        MemoryStorage::default(),
    ) else {
        return;
    };
    let mut actuator = RecordingActuator::new();
    for record in data.chunks(COMMAND_REPORT_LEN) {
        joystick.transport_mut().queue_command(record.to_vec());
        let _ = joystick.poll_commands(&mut actuator);
    }
    let _ = joystick.send_state();
});
