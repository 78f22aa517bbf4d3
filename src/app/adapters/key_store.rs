//! Init-once encryption key file
//!
//! The key is 32 random bytes stored as hex. The first process to run creates
//! the file; every later run (and any process racing the first) reads it.

use crate::constants::KEY_LENGTH_BYTES;
use crate::{Error, Result};
use rand::RngCore;
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Process-wide secret used to key surrogate identifiers
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey([u8; KEY_LENGTH_BYTES]);

impl EncryptionKey {
    pub fn from_bytes(bytes: [u8; KEY_LENGTH_BYTES]) -> Self {
        Self(bytes)
    }

    /// Fresh key from the thread-local CSPRNG
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LENGTH_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a key from its hex form, ignoring surrounding whitespace
    pub fn from_hex(text: &str) -> Result<Self> {
        let bytes = hex::decode(text.trim())
            .map_err(|e| Error::configuration(format!("Encryption key is not valid hex: {}", e)))?;

        let bytes: [u8; KEY_LENGTH_BYTES] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            Error::configuration(format!(
                "Encryption key must be {} bytes, found {}",
                KEY_LENGTH_BYTES,
                bytes.len()
            ))
        })?;

        Ok(Self(bytes))
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(..)")
    }
}

/// Key file access
pub struct KeyStore;

impl KeyStore {
    /// Read the key at `path`, creating it if the file does not exist
    ///
    /// # Errors
    /// * Returns `Error::Io` if the file or its directory cannot be read or written
    /// * Returns `Error::Configuration` if an existing key file is malformed
    pub fn load_or_create(path: &Path) -> Result<EncryptionKey> {
        if path.exists() {
            return Self::read(path);
        }

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(dir).map_err(|e| {
            Error::io(format!("Failed to create key directory {}", dir.display()), e)
        })?;

        // Written in full beside the target, then linked into place without
        // replacing, so readers never see a partial key file
        let key = EncryptionKey::generate();
        let mut staged = NamedTempFile::new_in(dir).map_err(|e| {
            Error::io(format!("Failed to stage key file in {}", dir.display()), e)
        })?;
        staged
            .write_all(key.to_hex().as_bytes())
            .and_then(|_| staged.as_file().sync_all())
            .map_err(|e| Error::io(format!("Failed to write key file {}", path.display()), e))?;

        match staged.persist_noclobber(path) {
            Ok(_) => {
                info!("Created encryption key file {}", path.display());
                Ok(key)
            }
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                debug!("Key file {} created concurrently, reading it", path.display());
                Self::read(path)
            }
            Err(e) => Err(Error::io(
                format!("Failed to create key file {}", path.display()),
                e.error,
            )),
        }
    }

    fn read(path: &Path) -> Result<EncryptionKey> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read key file {}", path.display()), e))?;
        debug!("Loaded encryption key from {}", path.display());
        EncryptionKey::from_hex(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_or_create_is_stable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("keys").join("encryption_key.key");

        let first = KeyStore::load_or_create(&path).unwrap();
        let second = KeyStore::load_or_create(&path).unwrap();

        assert_eq!(first, second);
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.len(), KEY_LENGTH_BYTES * 2);
    }

    #[test]
    fn test_concurrent_creation_agrees_on_one_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("encryption_key.key");

        let keys: Vec<EncryptionKey> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| KeyStore::load_or_create(&path).map_err(|e| e.to_string())))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap().unwrap())
                .collect()
        });

        assert!(keys.iter().all(|key| *key == keys[0]));
        assert_eq!(KeyStore::load_or_create(&path).unwrap(), keys[0]);

        // No staging files are left beside the key
        let entries = fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_malformed_key_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("encryption_key.key");

        fs::write(&path, "not hex").unwrap();
        assert!(matches!(
            KeyStore::load_or_create(&path),
            Err(Error::Configuration { .. })
        ));

        fs::write(&path, "abcd").unwrap();
        assert!(matches!(
            KeyStore::load_or_create(&path),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_hex_round_trip_with_whitespace() {
        let key = EncryptionKey::from_bytes([42u8; KEY_LENGTH_BYTES]);
        let parsed = EncryptionKey::from_hex(&format!("{}\n", key.to_hex())).unwrap();
        assert_eq!(parsed, key);
        assert_eq!(format!("{:?}", key), "EncryptionKey(..)");
    }
}
