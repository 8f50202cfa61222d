//! Durable storage for the refresh token. Only the refresh token is ever
//! persisted, under the single key `refreshToken`; access tokens stay in memory.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};

pub const STORAGE_KEY: &str = "refreshToken";
const STORAGE_FILE: &str = "session.json";

/// Persistent slot for the refresh token.
pub trait TokenStorage: Send + Sync + fmt::Debug {
    /// Reads the persisted refresh token.
    ///
    /// # Errors
    /// Returns an error if the backing store exists but cannot be read.
    fn load(&self) -> io::Result<Option<SecretString>>;

    /// Replaces the persisted refresh token.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be written.
    fn store(&self, token: &SecretString) -> io::Result<()>;

    /// Removes the persisted refresh token. Removing a missing token is not an error.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be written.
    fn clear(&self) -> io::Result<()>;
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    #[serde(rename = "refreshToken")]
    refresh_token: String,
}

/// Stores the refresh token as a small JSON document inside a state directory.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    #[must_use]
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(STORAGE_FILE),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> io::Result<Option<SecretString>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        };
        let stored: StoredSession = serde_json::from_str(&raw)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        if stored.refresh_token.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(SecretString::from(stored.refresh_token)))
    }

    fn store(&self, token: &SecretString) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_vec(&StoredSession {
            refresh_token: token.expose_secret().to_string(),
        })
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

        // Write then rename so a crash never leaves a truncated file behind.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, payload)?;
        restrict_permissions(&tmp)?;
        fs::rename(&tmp, &self.path)
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// In-process storage, used for ephemeral sessions and tests.
#[derive(Default)]
pub struct MemoryTokenStorage {
    slot: RwLock<Option<String>>,
}

impl MemoryTokenStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self {
            slot: RwLock::new(Some(token.to_string())),
        }
    }
}

impl fmt::Debug for MemoryTokenStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let present = self
            .slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some();
        f.debug_struct("MemoryTokenStorage")
            .field("present", &present)
            .finish()
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> io::Result<Option<SecretString>> {
        Ok(self
            .slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .map(SecretString::from))
    }

    fn store(&self, token: &SecretString) -> io::Result<()> {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) =
            Some(token.expose_secret().to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{FileTokenStorage, MemoryTokenStorage, STORAGE_KEY, TokenStorage};
    use secrecy::{ExposeSecret, SecretString};
    use std::fs;

    #[test]
    fn file_storage_round_trips_under_well_known_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileTokenStorage::new(&dir.path().join("nested"));

        assert!(storage.load().unwrap().is_none());

        storage.store(&SecretString::from("r1".to_string())).unwrap();
        let raw = fs::read_to_string(storage.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[STORAGE_KEY], "r1");

        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded.expose_secret(), "r1");
    }

    #[test]
    fn file_storage_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileTokenStorage::new(dir.path());

        storage.store(&SecretString::from("r1".to_string())).unwrap();
        storage.clear().unwrap();
        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn file_storage_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let storage = FileTokenStorage::new(dir.path());
        storage.store(&SecretString::from("r1".to_string())).unwrap();

        let mode = fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn file_storage_rejects_corrupt_documents() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileTokenStorage::new(dir.path());
        fs::write(storage.path(), "not json").unwrap();
        assert!(storage.load().is_err());
    }

    #[test]
    fn memory_storage_debug_hides_token() {
        let storage = MemoryTokenStorage::with_token("secret-refresh");
        let rendered = format!("{storage:?}");
        assert!(rendered.contains("present: true"));
        assert!(!rendered.contains("secret-refresh"));
    }
}
