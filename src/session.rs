//! Session management for the Telegram client
//!
//! Provides:
//! - File-based session locking so two tgsend processes never share a session
//! - Opening the SQLite session and spinning up the MTProto sender pool

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use grammers_client::Client;
use grammers_mtsender::SenderPool;
use grammers_session::storages::SqliteSession;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{Error, Result};

/// Session lock guard that ensures exclusive access to the Telegram session.
pub struct SessionLock {
    path: PathBuf,
    lock_file: Option<File>,
}

impl SessionLock {
    /// Acquire an exclusive lock on `path`, failing fast if another process holds it.
    pub fn acquire<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| Error::LockError(format!("Failed to open lock file: {}", e)))?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => {
                debug!(path = %path.display(), "session lock acquired");
                Ok(Self {
                    path,
                    lock_file: Some(lock_file),
                })
            }
            Err(_) => Err(Error::SessionLocked),
        }
    }

    /// Release the lock manually
    pub fn release(&mut self) {
        if let Some(file) = self.lock_file.take() {
            let _ = file.unlock();
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        self.release();
    }
}

/// A connected MTProto client backed by the on-disk session.
///
/// Dropping the connection stops the sender pool runner.
pub struct Connection {
    pub client: Client,
    runner: JoinHandle<()>,
}

impl Connection {
    pub fn open<P: AsRef<Path>>(session_path: P, api_id: i32) -> Result<Self> {
        let session_path = session_path.as_ref();
        let session = SqliteSession::open(session_path).map_err(|e| {
            Error::TelegramError(format!(
                "Failed to open session {}: {}",
                session_path.display(),
                e
            ))
        })?;
        let session = Arc::new(session);

        let pool = SenderPool::new(session, api_id);
        let client = Client::new(&pool);
        let SenderPool {
            runner,
            updates: _,
            handle: _,
        } = pool;

        let runner = tokio::spawn(async move {
            runner.run().await;
        });

        debug!(session = %session_path.display(), "sender pool started");
        Ok(Self { client, runner })
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.runner.abort();
    }
}

impl std::ops::Deref for Connection {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}
