//! Checksummed load/save of the settings record

use crate::{
    SETTINGS_ADDRESS, SETTINGS_PAYLOAD_LEN, SETTINGS_RECORD_LEN, Settings, SettingsResult,
    StorageMedium, checksum,
};
use tracing::{debug, info, warn};

/// Loads and saves [`Settings`] on a [`StorageMedium`].
#[derive(Debug)]
pub struct SettingsStore<S> {
    medium: S,
}

impl<S: StorageMedium> SettingsStore<S> {
    pub fn new(medium: S) -> Self {
        Self { medium }
    }

    /// Reads the persisted record.
    ///
    /// Returns [`Settings::defaults`] when `force_defaults` is set, when the
    /// stored checksum does not match, or when the payload does not decode.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SettingsError::Storage`] if the medium cannot be read.
    pub fn load(&self, force_defaults: bool) -> SettingsResult<Settings> {
        let mut record = [0u8; SETTINGS_RECORD_LEN];
        self.medium.read(SETTINGS_ADDRESS, &mut record)?;

        if force_defaults {
            debug!("settings defaults requested");
            return Ok(Settings::defaults());
        }

        let (payload, tail) = record.split_at(SETTINGS_PAYLOAD_LEN);
        let stored = tail.first().copied().unwrap_or_default();
        let computed = checksum(payload);
        if stored != computed {
            warn!(
                stored = format_args!("{stored:#04x}"),
                computed = format_args!("{computed:#04x}"),
                "settings checksum mismatch, using defaults"
            );
            return Ok(Settings::defaults());
        }

        match Settings::decode(payload) {
            Ok(settings) => {
                debug!(identity = %settings.identity, "settings loaded");
                Ok(settings)
            }
            Err(e) => {
                warn!(error = %e, "stored settings do not decode, using defaults");
                Ok(Settings::defaults())
            }
        }
    }

    /// Encodes `settings`, appends the checksum and writes the record.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SettingsError::TagTooLong`] for an oversized tag and
    /// [`crate::SettingsError::Storage`] if the medium cannot be written.
    pub fn save(&mut self, settings: &Settings) -> SettingsResult<()> {
        let record = settings.to_record()?;
        self.medium.write(SETTINGS_ADDRESS, &record)?;
        info!(identity = %settings.identity, "settings saved");
        Ok(())
    }

    pub fn medium(&self) -> &S {
        &self.medium
    }

    pub fn medium_mut(&mut self) -> &mut S {
        &mut self.medium
    }

    pub fn into_inner(self) -> S {
        self.medium
    }
}
