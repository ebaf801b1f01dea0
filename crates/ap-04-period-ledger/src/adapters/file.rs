//! File-backed key-value store.
//!
//! Persists the ledger to a single binary file, giving durability across
//! process restarts without an embedded database. Suitable for the volumes
//! a fiscal pipeline sees (one entry per company per period).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore};

/// File-backed key-value store with per-record checksums.
///
/// On-disk record format, little-endian:
///
/// ```text
/// [key_len:u32][key][value_len:u32][value][crc32:u32]
/// ```
///
/// The CRC covers key and value bytes. Loading stops at the first record
/// that fails its checksum or runs past the end of the file, so a torn
/// write loses only the tail; every intact record before it survives.
pub struct FileBackedKVStore {
    data: HashMap<Vec<u8>, Vec<u8>>,
    path: PathBuf,
}

impl FileBackedKVStore {
    /// Open or create a file-backed store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();

        if let Ok(metadata) = std::fs::metadata(&path) {
            tracing::info!(
                "[ap-04] 💾 Found existing ledger file: {} ({} bytes)",
                path.display(),
                metadata.len()
            );
        } else {
            tracing::info!("[ap-04] 📁 No existing ledger file at {}", path.display());
        }

        let data = Self::load_from_file(&path).unwrap_or_default();

        if !data.is_empty() {
            tracing::info!(
                "[ap-04] 💾 Loaded {} entries from {}",
                data.len(),
                path.display()
            );
        } else {
            tracing::info!("[ap-04] 📁 Ledger file empty or not found");
        }

        Self { data, path }
    }

    fn load_from_file(path: &Path) -> Option<HashMap<Vec<u8>, Vec<u8>>> {
        use std::io::Read;

        let mut file = std::fs::File::open(path).ok()?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).ok()?;

        let mut data = HashMap::new();
        let mut cursor = 0;

        while cursor + 4 <= bytes.len() {
            let key_len = u32::from_le_bytes(bytes[cursor..cursor + 4].try_into().ok()?) as usize;
            cursor += 4;

            if cursor + key_len > bytes.len() {
                break;
            }
            let key = bytes[cursor..cursor + key_len].to_vec();
            cursor += key_len;

            if cursor + 4 > bytes.len() {
                break;
            }
            let value_len = u32::from_le_bytes(bytes[cursor..cursor + 4].try_into().ok()?) as usize;
            cursor += 4;

            if cursor + value_len > bytes.len() {
                break;
            }
            let value = bytes[cursor..cursor + value_len].to_vec();
            cursor += value_len;

            if cursor + 4 > bytes.len() {
                break;
            }
            let stored_crc = u32::from_le_bytes(bytes[cursor..cursor + 4].try_into().ok()?);
            cursor += 4;

            if Self::record_crc(&key, &value) != stored_crc {
                tracing::warn!(
                    "[ap-04] ⚠️ Checksum mismatch at byte {} of {}; dropping corrupt tail",
                    cursor,
                    path.display()
                );
                break;
            }

            data.insert(key, value);
        }

        Some(data)
    }

    fn record_crc(key: &[u8], value: &[u8]) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(key);
        hasher.update(value);
        hasher.finalize()
    }

    fn save_to_file(&self) -> Result<(), KVStoreError> {
        use std::io::Write;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| KVStoreError::Io {
                message: e.to_string(),
            })?;
        }

        let mut bytes = Vec::new();

        for (key, value) in &self.data {
            bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
            bytes.extend_from_slice(key);
            bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
            bytes.extend_from_slice(value);
            bytes.extend_from_slice(&Self::record_crc(key, value).to_le_bytes());
        }

        // Write atomically via temp file
        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(|e| KVStoreError::Io {
            message: e.to_string(),
        })?;
        file.write_all(&bytes).map_err(|e| KVStoreError::Io {
            message: e.to_string(),
        })?;
        file.sync_all().map_err(|e| KVStoreError::Io {
            message: e.to_string(),
        })?;

        std::fs::rename(&temp_path, &self.path).map_err(|e| KVStoreError::Io {
            message: e.to_string(),
        })?;

        Ok(())
    }
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.data.insert(key.to_vec(), value.to_vec());
        self.save_to_file()
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.data.remove(key);
        self.save_to_file()
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => {
                    self.data.insert(key, value);
                }
                BatchOperation::Delete { key } => {
                    self.data.remove(&key);
                }
            }
        }
        self.save_to_file()
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError> {
        let results: Vec<_> = self
            .data
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(results)
    }
}
