//! EEPROM settings commands

use anyhow::Result;
use hidstick_settings::{
    DEFAULT_STORAGE_CAPACITY, FileStorage, SETTINGS_ADDRESS, SETTINGS_RECORD_LEN, Settings,
    SettingsError, SettingsStore, StorageMedium, checksum,
};
use std::path::Path;
use tracing::info;

use crate::commands::SettingsCommands;
use crate::error::CliError;
use crate::output;

/// Opens the EEPROM image named by `--eeprom`.
pub fn open_storage(eeprom: Option<&Path>) -> Result<FileStorage, CliError> {
    let path = eeprom.ok_or(CliError::NoStorage)?;
    Ok(FileStorage::new(path, DEFAULT_STORAGE_CAPACITY))
}

/// Execute settings command
pub fn execute(cmd: &SettingsCommands, eeprom: Option<&Path>, json: bool) -> Result<()> {
    let storage = open_storage(eeprom)?;
    match cmd {
        SettingsCommands::Show => show(storage, json),
        SettingsCommands::Reset => reset(storage, json),
        SettingsCommands::Set {
            identity,
            version,
            x_range,
            y_range,
            auto_recoil,
            repeat_rate,
            hold_time,
        } => {
            let mut store = SettingsStore::new(storage);
            let mut settings = store.load(false).map_err(CliError::from)?;
            if let Some(identity) = identity {
                settings.identity.clone_from(identity);
            }
            if let Some(version) = version {
                settings.version.clone_from(version);
            }
            if let Some(range) = x_range {
                settings.x_range = *range;
            }
            if let Some(range) = y_range {
                settings.y_range = *range;
            }
            if let Some(enabled) = auto_recoil {
                settings.auto_recoil = *enabled;
            }
            if let Some(rate) = repeat_rate {
                settings.trigger_repeat_rate = *rate;
            }
            if let Some(hold) = hold_time {
                settings.trigger_hold_time = *hold;
            }

            store.save(&settings).map_err(CliError::from)?;
            info!(identity = %settings.identity, "settings updated");
            output::print_success("Settings saved", &settings, json);
            Ok(())
        }
    }
}

/// Whether the medium holds a record that loads as itself.
fn record_is_valid<S: StorageMedium>(storage: &S) -> Result<bool, CliError> {
    let mut record = [0u8; SETTINGS_RECORD_LEN];
    storage
        .read(SETTINGS_ADDRESS, &mut record)
        .map_err(SettingsError::from)?;
    let Some((stored, payload)) = record.split_last() else {
        return Ok(false);
    };
    Ok(*stored == checksum(payload) && Settings::decode(payload).is_ok())
}

fn show(storage: FileStorage, json: bool) -> Result<()> {
    let stored_valid = record_is_valid(&storage)?;
    let settings = SettingsStore::new(storage)
        .load(false)
        .map_err(CliError::from)?;
    output::print_settings(&settings, stored_valid, json);
    Ok(())
}

fn reset(storage: FileStorage, json: bool) -> Result<()> {
    let settings = Settings::defaults();
    SettingsStore::new(storage)
        .save(&settings)
        .map_err(CliError::from)?;
    output::print_success("Settings reset to defaults", &settings, json);
    Ok(())
}
