use std::fs;
use std::path::{Path, PathBuf};

use super::credential::Credential;
use super::error::AuthError;

const TOKEN_FILE: &str = "token.json";

/// Storage abstraction for the persisted credential.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<Credential>, AuthError>;
    fn save(&self, credential: &Credential) -> Result<(), AuthError>;
    fn clear(&self) -> Result<(), AuthError>;
}

/// File-backed credential store.
///
/// Keeps a single human-diffable JSON record at `<dir>/token.json`. Saves go
/// through a temp file plus rename so a concurrent reader never observes a
/// half-written record, and a cancelled save leaves the previous record
/// intact. Missing or unreadable records read as "not logged in".
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    dir: PathBuf,
}

impl FileCredentialStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn new_default() -> Self {
        Self {
            dir: default_config_dir(),
        }
    }

    pub fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn temp_path(&self) -> PathBuf {
        self.dir.join(format!("{TOKEN_FILE}.{}.tmp", std::process::id()))
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credential>, AuthError> {
        let path = self.token_path();
        let raw = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                // A broken cache must never block re-authentication.
                tracing::warn!(path = %path.display(), error = %err, "credential file unreadable; treating as logged out");
                return Ok(None);
            }
        };
        match serde_json::from_str(&raw) {
            Ok(credential) => Ok(Some(credential)),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "credential file unparseable; treating as logged out");
                Ok(None)
            }
        }
    }

    fn save(&self, credential: &Credential) -> Result<(), AuthError> {
        fs::create_dir_all(&self.dir)?;
        let serialized = serde_json::to_string_pretty(credential)?;
        let temp = self.temp_path();
        fs::write(&temp, serialized)?;
        restrict_permissions(&temp)?;
        if let Err(err) = fs::rename(&temp, self.token_path()) {
            let _ = fs::remove_file(&temp);
            return Err(err.into());
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        match fs::remove_file(self.token_path()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Default per-user config directory (`~/.coremind`).
pub fn default_config_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".coremind"))
        .unwrap_or_else(|| PathBuf::from(".coremind"))
}
