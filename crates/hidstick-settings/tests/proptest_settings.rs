//! Property tests for the persisted settings record.

use hidstick_calibration::AxisRange;
use hidstick_settings::{
    MemoryStorage, SETTINGS_RECORD_LEN, Settings, SettingsStore, StorageMedium,
};
use proptest::prelude::*;

fn range_strategy() -> impl Strategy<Value = AxisRange> {
    (any::<i16>(), any::<i16>())
        .prop_filter_map("bounds must differ", |(min, max)| AxisRange::new(min, max).ok())
}

prop_compose! {
    fn settings_strategy()(
        identity in "[A-Z0-9-]{0,9}",
        version in "[0-9.]{0,5}",
        x_range in range_strategy(),
        y_range in range_strategy(),
        auto_recoil in any::<bool>(),
        trigger_repeat_rate in any::<u16>(),
        trigger_hold_time in any::<u16>(),
    ) -> Settings {
        Settings {
            identity,
            version,
            x_range,
            y_range,
            auto_recoil,
            trigger_repeat_rate,
            trigger_hold_time,
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Whatever is saved is loaded back unchanged.
    #[test]
    fn prop_save_load_round_trip(settings in settings_strategy()) {
        let mut store = SettingsStore::new(MemoryStorage::default());
        store.save(&settings).map_err(|e| TestCaseError::fail(e.to_string()))?;

        let loaded = store.load(false).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(loaded, settings);
    }

    /// Changing any single byte of the record, checksum included, makes the
    /// next load fall back to defaults.
    #[test]
    fn prop_single_byte_corruption_loads_defaults(
        settings in settings_strategy(),
        index in 0..SETTINGS_RECORD_LEN,
        flip in 1u8..=255,
    ) {
        let mut store = SettingsStore::new(MemoryStorage::default());
        store.save(&settings).map_err(|e| TestCaseError::fail(e.to_string()))?;
        store.medium_mut().bytes_mut()[index] ^= flip;

        let loaded = store.load(false).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(loaded, Settings::defaults());
    }

    /// Arbitrary medium contents never make loading fail.
    #[test]
    fn prop_garbage_never_errors(garbage in proptest::collection::vec(any::<u8>(), SETTINGS_RECORD_LEN)) {
        let mut medium = MemoryStorage::default();
        medium.write(0, &garbage).map_err(|e| TestCaseError::fail(e.to_string()))?;

        let store = SettingsStore::new(medium);
        prop_assert!(store.load(false).is_ok());
    }

    /// Decoding arbitrary bytes either fails cleanly or yields a record that
    /// re-encodes to the same bytes.
    #[test]
    fn prop_decode_is_canonical(bytes in proptest::collection::vec(any::<u8>(), 29)) {
        if let Ok(settings) = Settings::decode(&bytes) {
            let encoded = settings.encode().map_err(|e| TestCaseError::fail(e.to_string()))?;
            // Tag bytes after the terminator are not significant.
            prop_assert_eq!(&encoded[16..], &bytes[16..]);
        }
    }
}
