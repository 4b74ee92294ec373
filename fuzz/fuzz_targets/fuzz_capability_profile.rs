//! Fuzzes YAML capability profiles through descriptor synthesis.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_capability_profile
#![no_main]
use hidstick_hid_joystick_protocol::{
    CapabilityConfig, DESCRIPTOR_CAPACITY, ReportLayout, synthesize,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = serde_yaml::from_str::<CapabilityConfig>(text) else {
        return;
    };
    // Every profile that validates must fit the descriptor buffer.
    let descriptor = synthesize(&config);
    assert!(descriptor.is_ok_and(|d| d.len() <= DESCRIPTOR_CAPACITY));
    let _ = ReportLayout::new(&config).report_size();
});
