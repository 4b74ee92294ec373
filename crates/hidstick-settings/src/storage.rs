//! Non-volatile storage media

use crate::StorageError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Value of an erased EEPROM cell.
pub const ERASED_BYTE: u8 = 0xFF;

/// Default medium size, matching a 1 KiB EEPROM.
pub const DEFAULT_STORAGE_CAPACITY: usize = 1024;

/// Byte-addressed non-volatile memory.
pub trait StorageMedium {
    /// Fills `buf` with the bytes starting at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::OutOfBounds`] when the range does not fit the
    /// medium, or [`StorageError::Io`] when the backing store fails.
    fn read(&self, address: usize, buf: &mut [u8]) -> Result<(), StorageError>;

    /// Writes `data` starting at `address`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`StorageMedium::read`].
    fn write(&mut self, address: usize, data: &[u8]) -> Result<(), StorageError>;

    fn capacity(&self) -> usize;
}

fn check_bounds(address: usize, len: usize, capacity: usize) -> Result<usize, StorageError> {
    address
        .checked_add(len)
        .filter(|end| *end <= capacity)
        .ok_or(StorageError::OutOfBounds {
            address,
            len,
            capacity,
        })
}

/// RAM-backed medium, initialised to the erased state.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    bytes: Vec<u8>,
}

impl MemoryStorage {
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![ERASED_BYTE; capacity],
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Direct access for tests that simulate corruption.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_CAPACITY)
    }
}

impl StorageMedium for MemoryStorage {
    fn read(&self, address: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        let end = check_bounds(address, buf.len(), self.bytes.len())?;
        buf.copy_from_slice(self.bytes.get(address..end).unwrap_or_default());
        Ok(())
    }

    fn write(&mut self, address: usize, data: &[u8]) -> Result<(), StorageError> {
        let end = check_bounds(address, data.len(), self.bytes.len())?;
        if let Some(target) = self.bytes.get_mut(address..end) {
            target.copy_from_slice(data);
        }
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.bytes.len()
    }
}

/// Medium backed by an image file on the host.
///
/// A missing file reads as an erased medium. Every write rewrites the whole
/// image through a temporary file and a rename, so a crash never leaves a
/// half-written image behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    capacity: usize,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_image(&self) -> Result<Vec<u8>, StorageError> {
        let mut image = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        image.resize(self.capacity, ERASED_BYTE);
        Ok(image)
    }

    fn store_image(&self, image: &[u8]) -> Result<(), StorageError> {
        let temp_path = self.path.with_extension("tmp");
        debug!(path = ?self.path, len = image.len(), "writing storage image");
        fs::write(&temp_path, image)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl StorageMedium for FileStorage {
    fn read(&self, address: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        let end = check_bounds(address, buf.len(), self.capacity)?;
        let image = self.load_image()?;
        buf.copy_from_slice(image.get(address..end).unwrap_or_default());
        Ok(())
    }

    fn write(&mut self, address: usize, data: &[u8]) -> Result<(), StorageError> {
        let end = check_bounds(address, data.len(), self.capacity)?;
        let mut image = self.load_image()?;
        if let Some(target) = image.get_mut(address..end) {
            target.copy_from_slice(data);
        }
        self.store_image(&image)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_storage_starts_erased() -> Result<(), StorageError> {
        let storage = MemoryStorage::new(16);
        let mut buf = [0u8; 4];
        storage.read(12, &mut buf)?;
        assert_eq!(buf, [ERASED_BYTE; 4]);
        assert_eq!(storage.capacity(), 16);
        Ok(())
    }

    #[test]
    fn test_memory_storage_write_read() -> Result<(), StorageError> {
        let mut storage = MemoryStorage::default();
        storage.write(10, &[1, 2, 3])?;

        let mut buf = [0u8; 5];
        storage.read(9, &mut buf)?;
        assert_eq!(buf, [ERASED_BYTE, 1, 2, 3, ERASED_BYTE]);
        Ok(())
    }

    #[test]
    fn test_memory_storage_bounds() {
        let mut storage = MemoryStorage::new(8);
        assert!(matches!(
            storage.write(6, &[0; 3]),
            Err(StorageError::OutOfBounds {
                address: 6,
                len: 3,
                capacity: 8
            })
        ));
        let mut buf = [0u8; 2];
        assert!(storage.read(usize::MAX, &mut buf).is_err());
        assert_eq!(storage.bytes(), &[ERASED_BYTE; 8]);
    }

    #[test]
    fn test_file_storage_missing_file_reads_erased() -> Result<(), StorageError> {
        let dir = TempDir::new()?;
        let storage = FileStorage::new(dir.path().join("eeprom.bin"), 64);

        let mut buf = [0u8; 3];
        storage.read(0, &mut buf)?;
        assert_eq!(buf, [ERASED_BYTE; 3]);
        Ok(())
    }

    #[test]
    fn test_file_storage_persists_across_instances() -> Result<(), StorageError> {
        let dir = TempDir::new()?;
        let path = dir.path().join("eeprom.bin");

        let mut storage = FileStorage::new(&path, 64);
        storage.write(4, &[0xAB, 0xCD])?;
        assert!(!path.with_extension("tmp").exists());
        assert_eq!(fs::read(&path)?.len(), 64);

        let reopened = FileStorage::new(&path, 64);
        let mut buf = [0u8; 4];
        reopened.read(3, &mut buf)?;
        assert_eq!(buf, [ERASED_BYTE, 0xAB, 0xCD, ERASED_BYTE]);
        Ok(())
    }

    #[test]
    fn test_file_storage_bounds() -> Result<(), StorageError> {
        let dir = TempDir::new()?;
        let mut storage = FileStorage::new(dir.path().join("eeprom.bin"), 8);
        assert!(matches!(
            storage.write(7, &[0, 0]),
            Err(StorageError::OutOfBounds { .. })
        ));
        Ok(())
    }
}
