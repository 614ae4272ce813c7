//! Bearer credential lifecycle.
//!
//! A [`Session`] is created once per process and handed to the API client.
//! It is issued at login, read by every privileged request, and revoked on
//! logout or on any 401 from a privileged call. Persistence is delegated to a
//! [`TokenStore`] so the same session logic runs against a file on disk or
//! an in-memory slot in tests.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use super::error::InfraError;

/// Key the token is stored under.
pub const TOKEN_KEY: &str = "access_token";

pub trait TokenStore: Send + Sync + fmt::Debug {
    fn load(&self) -> Result<Option<String>, InfraError>;
    fn save(&self, token: &str) -> Result<(), InfraError>;
    fn clear(&self) -> Result<(), InfraError>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    value: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, InfraError> {
        Ok(self
            .value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &str) -> Result<(), InfraError> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), InfraError> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// JSON key/value file that survives process restarts.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, InfraError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err.into()),
        };
        if data.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&data).map_err(|err| {
            InfraError::session_store(format!(
                "failed to parse {}: {err}",
                self.path.display()
            ))
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), InfraError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(entries)
            .map_err(|err| InfraError::session_store(format!("failed to encode: {err}")))?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    /// An unreadable file counts as holding no credential; the next save or
    /// clear rewrites it.
    fn load(&self) -> Result<Option<String>, InfraError> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(err @ InfraError::SessionStore { .. }) => {
                warn!(error = %err, "ignoring unreadable session file");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        Ok(entries.remove(TOKEN_KEY).filter(|token| !token.is_empty()))
    }

    fn save(&self, token: &str) -> Result<(), InfraError> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write_entries(&entries)
    }

    fn clear(&self) -> Result<(), InfraError> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.remove(TOKEN_KEY);
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(err.into()),
            };
        }
        self.write_entries(&entries)
    }
}

#[derive(Debug)]
pub struct Session {
    store: Box<dyn TokenStore>,
    token: Mutex<Option<String>>,
}

impl Session {
    /// Build a session from whatever `store` currently holds.
    pub fn restore(store: impl TokenStore + 'static) -> Result<Self, InfraError> {
        let token = store.load()?;
        Ok(Self {
            store: Box::new(store),
            token: Mutex::new(token),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            store: Box::new(MemoryTokenStore::new()),
            token: Mutex::new(None),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn bearer(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Persist `token` and start using it. Empty tokens are ignored.
    pub fn issue(&self, token: &str) -> Result<(), InfraError> {
        if token.is_empty() {
            return Ok(());
        }
        self.store.save(token)?;
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        debug!("session credential issued");
        Ok(())
    }

    /// Forget the credential. The in-memory copy is dropped even if the store
    /// fails to clear.
    pub fn revoke(&self) -> Result<(), InfraError> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        debug!("session credential revoked");
        self.store.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn session_lifecycle_in_memory() -> Result<(), InfraError> {
        let session = Session::in_memory();
        assert!(!session.is_authenticated());

        session.issue("tok")?;
        assert!(session.is_authenticated());
        assert_eq!(session.bearer().as_deref(), Some("tok"));

        session.revoke()?;
        assert!(!session.is_authenticated());
        assert_eq!(session.bearer(), None);
        Ok(())
    }

    #[test]
    fn empty_token_is_not_issued() -> Result<(), InfraError> {
        let session = Session::in_memory();
        session.issue("")?;
        assert!(!session.is_authenticated());
        Ok(())
    }

    #[test]
    fn restore_reads_existing_token() -> Result<(), InfraError> {
        let session = Session::restore(MemoryTokenStore::with_token("saved"))?;
        assert_eq!(session.bearer().as_deref(), Some("saved"));
        Ok(())
    }

    #[test]
    fn file_store_survives_reload() -> Result<(), InfraError> {
        let dir = TempDir::new()?;
        let path = dir.path().join("nested").join("session.json");

        let session = Session::restore(FileTokenStore::new(&path))?;
        assert!(!session.is_authenticated());
        session.issue("persisted")?;

        let raw = fs::read_to_string(&path)?;
        assert!(raw.contains("\"access_token\": \"persisted\""));

        let reloaded = Session::restore(FileTokenStore::new(&path))?;
        assert_eq!(reloaded.bearer().as_deref(), Some("persisted"));

        reloaded.revoke()?;
        assert!(!path.exists());
        assert!(!Session::restore(FileTokenStore::new(&path))?.is_authenticated());
        Ok(())
    }

    #[test]
    fn file_store_clear_keeps_other_keys() -> Result<(), InfraError> {
        let dir = TempDir::new()?;
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"access_token":"t","theme":"dark"}"#)?;

        let store = FileTokenStore::new(&path);
        store.clear()?;
        assert_eq!(store.load()?, None);
        assert!(fs::read_to_string(&path)?.contains("theme"));
        Ok(())
    }

    #[test]
    fn corrupt_file_reads_as_signed_out() -> Result<(), InfraError> {
        let dir = TempDir::new()?;
        let path = dir.path().join("session.json");
        fs::write(&path, "{truncated")?;

        let session = Session::restore(FileTokenStore::new(&path))?;
        assert!(!session.is_authenticated());

        session.issue("fresh")?;
        let reloaded = Session::restore(FileTokenStore::new(&path))?;
        assert_eq!(reloaded.bearer().as_deref(), Some("fresh"));
        Ok(())
    }
}
