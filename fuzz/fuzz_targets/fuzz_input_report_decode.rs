//! Fuzzes input report decoding against every layout shape.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_input_report_decode
#![no_main]
use hidstick_hid_joystick_protocol::{AxisSet, CapabilityConfig, ReportLayout, SimulationSet};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((shape, report)) = data.split_first_chunk::<4>() else {
        return;
    };
    let Ok(config) = CapabilityConfig::builder()
        .buttons(shape[0] % 33)
        .hat_switches(shape[1] % 3)
        .axes(AxisSet::from_bits_truncate(shape[2]))
        .simulation(SimulationSet::from_bits_truncate(shape[3]))
        .build()
    else {
        return;
    };
    // Must never panic on arbitrary bytes.
    let _ = ReportLayout::new(&config).decode(report);
});
