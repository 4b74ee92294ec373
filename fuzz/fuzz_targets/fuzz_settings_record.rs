//! Fuzzes the persisted settings decoder and checksum validation.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_settings_record
#![no_main]
use hidstick_settings::{
    MemoryStorage, SettingsPayload, SettingsStore, Settings, StorageMedium,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must never panic on arbitrary bytes.
    let _ = Settings::decode(data);
    let _ = SettingsPayload::decode(data);

    let mut medium = MemoryStorage::default();
    let len = data.len().min(medium.capacity());
    if medium.write(0, &data[..len]).is_err() {
        return;
    }
    // A corrupted EEPROM always loads as something usable.
    let store = SettingsStore::new(medium);
    assert!(store.load(false).is_ok());
});
