//! Configuration: application paths, the credential store and pending logins
//!
//! Credentials live in a two-line text file (numeric API id, then API hash)
//! inside the per-user application directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Directory created under the user's home when `TGSEND_HOME` is unset
pub const APP_DIR_NAME: &str = ".telegram_file_sender";
pub const CREDENTIALS_FILE: &str = "config";
pub const SESSION_FILE: &str = "tgsend.session";
pub const LOCK_FILE: &str = "tgsend.lock";
pub const PENDING_LOGIN_FILE: &str = "pending_login.json";

/// Environment override for the application directory
pub const HOME_ENV: &str = "TGSEND_HOME";

/// Default number of dialogs fetched for listing and name resolution
pub const DEFAULT_DIALOG_LIMIT: usize = 100;

/// Telegram API credentials from https://my.telegram.org
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_id: i32,
    pub api_hash: String,
}

/// Locations of every file the tool reads or writes
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub dir: PathBuf,
    pub credentials: PathBuf,
    pub session: PathBuf,
    pub lock: PathBuf,
    pub pending_login: PathBuf,
}

impl AppPaths {
    /// Resolve paths from `TGSEND_HOME`, falling back to `~/.telegram_file_sender`
    pub fn resolve() -> Self {
        let dir = std::env::var(HOME_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_app_dir());
        Self::in_dir(dir)
    }

    pub fn in_dir<P: Into<PathBuf>>(dir: P) -> Self {
        let dir = dir.into();
        Self {
            credentials: dir.join(CREDENTIALS_FILE),
            session: dir.join(SESSION_FILE),
            lock: dir.join(LOCK_FILE),
            pending_login: dir.join(PENDING_LOGIN_FILE),
            dir,
        }
    }

    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    pub fn credential_store(&self) -> CredentialStore {
        CredentialStore::new(&self.credentials)
    }
}

fn default_app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Flat-file persistence for [`Credentials`]
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load stored credentials; `None` until the first `save`.
    pub fn load(&self) -> Result<Option<Credentials>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(Error::IoError(err)),
        };

        parse_credentials(&content)
    }

    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(
            &self.path,
            format!("{}\n{}\n", credentials.api_id, credentials.api_hash),
        )?;
        restrict_permissions(&self.path);

        debug!(path = %self.path.display(), "credentials saved");
        Ok(())
    }
}

fn parse_credentials(content: &str) -> Result<Option<Credentials>> {
    let mut lines = content.trim().lines().map(str::trim);
    let (Some(id_line), Some(hash_line)) = (lines.next(), lines.next()) else {
        warn!("credential file has fewer than two lines, ignoring it");
        return Ok(None);
    };

    if id_line.is_empty() || hash_line.is_empty() {
        return Ok(None);
    }

    let api_id = id_line.parse::<i32>().map_err(|_| {
        Error::InvalidArgument(format!("stored API ID '{id_line}' is not a number"))
    })?;

    Ok(Some(Credentials {
        api_id,
        api_hash: hash_line.to_string(),
    }))
}

/// A code request awaiting `auth --code`, kept between invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLogin {
    pub phone: String,
    pub phone_code_hash: String,
}

impl PendingLogin {
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(Error::IoError(err)),
        };

        match serde_json::from_str(&data) {
            Ok(pending) => Ok(Some(pending)),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable pending login");
                Ok(None)
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        restrict_permissions(path);
        Ok(())
    }

    pub fn clear(path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Error::IoError(err)),
        }
    }

    /// Stored hash for `phone`, if the pending request was made for it.
    pub fn hash_for(path: &Path, phone: &str) -> Result<Option<String>> {
        Ok(Self::load(path)?
            .filter(|pending| pending.phone == phone)
            .map(|pending| pending.phone_code_hash))
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(err) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        warn!(path = %path.display(), error = %err, "could not restrict credential file mode");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}
