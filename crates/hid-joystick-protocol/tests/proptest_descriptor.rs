//! Property tests for descriptor synthesis and report layout.

use hidstick_hid_joystick_protocol::{
    AxisSet, CapabilityConfig, DESCRIPTOR_CAPACITY, DeviceType, ReportLayout, SimulationSet,
    synthesize,
};
use proptest::prelude::*;

fn device_type_strategy() -> impl Strategy<Value = DeviceType> {
    prop_oneof![
        Just(DeviceType::Joystick),
        Just(DeviceType::Gamepad),
        Just(DeviceType::MultiAxis),
    ]
}

/// Walks short items and returns their prefix bytes.
fn item_prefixes(bytes: &[u8]) -> Vec<u8> {
    let mut prefixes = Vec::new();
    let mut index = 0;
    while let Some(prefix) = bytes.get(index).copied() {
        prefixes.push(prefix);
        let data_len = match prefix & 0x03 {
            3 => 4,
            n => usize::from(n),
        };
        index += 1 + data_len;
    }
    prefixes
}

prop_compose! {
    fn config_strategy()(
        report_id in (1u8..=255).prop_filter("response id is reserved", |id| *id != 16),
        device_type in device_type_strategy(),
        buttons in 0u8..=32,
        hats in 0u8..=2,
        axes in any::<u8>(),
        simulation in any::<u8>(),
    ) -> CapabilityConfig {
        CapabilityConfig::builder()
            .report_id(report_id)
            .device_type(device_type)
            .buttons(buttons)
            .hat_switches(hats)
            .axes(AxisSet::from_bits_truncate(axes))
            .simulation(SimulationSet::from_bits_truncate(simulation))
            .build()
            .unwrap_or_default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Every legal configuration fits the descriptor buffer.
    #[test]
    fn prop_descriptor_within_capacity(config in config_strategy()) {
        let descriptor = synthesize(&config).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(descriptor.len() <= DESCRIPTOR_CAPACITY);
    }

    /// The descriptor always opens the application collection with the
    /// configured report id and closes it at the end.
    #[test]
    fn prop_descriptor_framing(config in config_strategy()) {
        let bytes = synthesize(&config)
            .map_err(|e| TestCaseError::fail(e.to_string()))?
            .into_bytes();
        prop_assert_eq!(
            &bytes[..8],
            &[0x05, 0x01, 0x09, config.device_type().usage(), 0xA1, 0x01, 0x85, config.report_id()]
        );
        prop_assert_eq!(bytes.last().copied(), Some(0xC0));

        let prefixes = item_prefixes(&bytes);
        let opened = prefixes.iter().filter(|p| **p == 0xA1).count();
        let closed = prefixes.iter().filter(|p| **p == 0xC0).count();
        prop_assert_eq!(opened, closed);
    }

    /// Report size follows the field-size formula.
    #[test]
    fn prop_report_size_formula(config in config_strategy()) {
        let layout = ReportLayout::new(&config);
        let expected = usize::from(config.button_count()).div_ceil(8)
            + usize::from(config.hat_switch_count() > 0)
            + 2 * config.axes().count()
            + 2 * config.simulation().count();
        prop_assert_eq!(layout.report_size(), expected);
    }

    /// Layout fields tile the report without gaps or overlaps.
    #[test]
    fn prop_layout_fields_are_contiguous(config in config_strategy()) {
        let layout = ReportLayout::new(&config);
        let mut offset = 0;
        for field in layout.fields() {
            prop_assert_eq!(field.offset, offset);
            offset += field.len;
        }
        prop_assert_eq!(offset, layout.report_size());
    }

    /// Configurations outside the supported taxonomy are rejected.
    #[test]
    fn prop_rejects_excess_buttons(buttons in 33u8..=255) {
        prop_assert!(CapabilityConfig::builder().buttons(buttons).build().is_err());
    }
}
