//! Persistent storage for the session token.
//!
//! The file store keeps a single JSON document under a fixed key with
//! restricted permissions (0600). Tokens are never logged.

use std::fmt::{self, Debug, Formatter};
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Key under which the token is persisted in the session file.
pub const TOKEN_KEY: &str = "accessToken";

/// Storage backend for the session token.
///
/// Implementations must treat clearing an absent token as success.
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage exists but cannot be read.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Persist `token`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be written.
    fn save(&self, token: &str) -> Result<(), StoreError>;

    /// Remove the persisted token.
    ///
    /// # Errors
    ///
    /// Returns an error if existing storage cannot be removed.
    fn clear(&self) -> Result<(), StoreError>;
}

/// On-disk session document.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredSession {
    /// Bearer token exactly as returned by `/login`.
    #[serde(rename = "accessToken")]
    pub access_token: String,
    /// When the token was written.
    pub saved_at: DateTime<Utc>,
}

impl Debug for StoredSession {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("StoredSession")
            .field("access_token", &"<redacted>")
            .field("saved_at", &self.saved_at)
            .finish()
    }
}

/// Token store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store the session at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full session document, including when it was saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_record(&self) -> Result<Option<StoredSession>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let record: StoredSession =
            serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        if record.access_token.is_empty() {
            return Ok(None);
        }
        Ok(Some(record))
    }

    fn write_restricted(&self, contents: &str) -> Result<(), StoreError> {
        let write_error = |source: io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path).map_err(write_error)?;
        // `mode` only applies on creation; tighten files that already existed.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(write_error)?;
        }
        file.write_all(contents.as_bytes()).map_err(write_error)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.load_record()?.map(|record| record.access_token))
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        let record = StoredSession {
            access_token: token.to_string(),
            saved_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&record)
            .map_err(|source| StoreError::Serialize { source })?;
        self.write_restricted(&contents)?;
        tracing::debug!(path = %self.path.display(), "session token persisted");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "session file removed");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// In-process token store; nothing survives the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    /// Current stored value.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        (*self.slot()).clone()
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Debug for MemoryTokenStore {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("MemoryTokenStore")
            .field("has_token", &self.slot().is_some())
            .finish()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.current())
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileTokenStore {
        FileTokenStore::new(dir.path().join("nested").join("session.json"))
    }

    #[test]
    fn file_store_round_trips_token_under_fixed_key() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);
        assert_eq!(store.load()?, None);

        store.save("abc")?;
        assert_eq!(store.load()?.as_deref(), Some("abc"));

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(store.path())?)?;
        assert_eq!(raw[TOKEN_KEY], "abc");
        assert!(raw["saved_at"].is_string());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn file_store_restricts_permissions() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new()?;
        let store = store_in(&dir);
        store.save("abc")?;
        let mode = fs::metadata(store.path())?.permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn file_store_tightens_existing_file_permissions() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new()?;
        let store = store_in(&dir);
        if let Some(parent) = store.path().parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(store.path(), "{}")?;
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644))?;

        store.save("abc")?;
        let mode = fs::metadata(store.path())?.permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load()?.as_deref(), Some("abc"));
        Ok(())
    }

    #[test]
    fn file_store_clear_is_idempotent() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);
        store.clear()?;
        store.save("abc")?;
        store.clear()?;
        store.clear()?;
        assert_eq!(store.load()?, None);
        assert!(!store.path().exists());
        Ok(())
    }

    #[test]
    fn file_store_rejects_corrupt_file() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("session.json");
        fs::write(&path, "not json")?;
        let store = FileTokenStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Parse { .. })));
        Ok(())
    }

    #[test]
    fn file_store_treats_empty_token_as_absent() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("session.json");
        fs::write(
            &path,
            r#"{"accessToken": "", "saved_at": "2026-01-01T00:00:00Z"}"#,
        )?;
        assert_eq!(FileTokenStore::new(&path).load()?, None);
        Ok(())
    }

    #[test]
    fn memory_store_tracks_latest_write() -> anyhow::Result<()> {
        let store = MemoryTokenStore::with_token("first");
        assert_eq!(store.load()?.as_deref(), Some("first"));
        store.save("second")?;
        assert_eq!(store.current().as_deref(), Some("second"));
        store.clear()?;
        store.clear()?;
        assert_eq!(store.current(), None);
        Ok(())
    }

    #[test]
    fn stored_session_debug_redacts_token() {
        let record = StoredSession {
            access_token: "secret".into(),
            saved_at: Utc::now(),
        };
        assert!(!format!("{record:?}").contains("secret"));
    }
}
