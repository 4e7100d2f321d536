//! Credential storage.
//!
//! The API client reads the credential before every call and clears it when
//! the server answers 401. Writing it is left to the host's login flow.

use std::io;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::debug;

use crate::error::CredentialError;

const APP_DIR: &str = "notice-console";
const CREDENTIAL_FILE: &str = "credential";

pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Result<Option<String>, CredentialError>;

    fn set(&self, credential: &str) -> Result<(), CredentialError>;

    fn clear(&self) -> Result<(), CredentialError>;
}

/// Keeps the credential for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credential: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            credential: RwLock::new(Some(credential.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<String>, CredentialError> {
        Ok(self.credential.read().clone())
    }

    fn set(&self, credential: &str) -> Result<(), CredentialError> {
        *self.credential.write() = Some(credential.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        *self.credential.write() = None;
        Ok(())
    }
}

/// Persists the credential in a single file so it survives restarts.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform config directory (`~/.config/notice-console/credential` on Linux).
    pub fn in_config_dir() -> Result<Self, CredentialError> {
        let dir = dirs::config_dir().ok_or(CredentialError::NoLocation)?;
        Ok(Self::new(dir.join(APP_DIR).join(CREDENTIAL_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<String>, CredentialError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let credential = content.trim();
                Ok((!credential.is_empty()).then(|| credential.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, credential: &str) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, credential)?;
        debug!(path = %self.path.display(), "stored credential");
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "cleared credential");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
