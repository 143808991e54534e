//! Command implementations
//!
//! Each module corresponds to a subcommand in the CLI. Scripted commands
//! take a [`TelegramApi`] and return a serializable report; `main` turns
//! the report (or the error) into JSON.

pub mod auth;
pub mod config;
pub mod contacts;
pub mod interactive;
pub mod send;
pub mod status;

use std::ops::Deref;

use tracing::debug;

use crate::client::GrammersClient;
use crate::config::{AppPaths, Credentials};
use crate::error::{Error, Result};
use crate::session::SessionLock;
use crate::telegram::TelegramApi;

pub use auth::AuthReport;
pub use config::ConfigReport;
pub use contacts::ContactsReport;
pub use send::{Recipient, SendReport};
pub use status::StatusReport;

/// A connected client holding the session lock for its lifetime.
pub struct Session {
    client: GrammersClient,
    _lock: SessionLock,
}

impl Session {
    /// Lock the session file and connect with the stored credentials.
    pub fn open(paths: &AppPaths, credentials: &Credentials) -> Result<Self> {
        paths.ensure_dir()?;
        let lock = SessionLock::acquire(&paths.lock)?;
        let client = GrammersClient::connect(&paths.session, credentials)?;
        debug!(session = %paths.session.display(), "session opened");
        Ok(Self {
            client,
            _lock: lock,
        })
    }

    pub fn api(&self) -> &dyn TelegramApi {
        &self.client
    }
}

impl Deref for Session {
    type Target = GrammersClient;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

/// Stored credentials, or `no_credentials`.
pub fn require_credentials(paths: &AppPaths) -> Result<Credentials> {
    paths.credential_store().load()?.ok_or(Error::NoCredentials)
}

/// Fail with `not_authorized` unless the session is signed in.
pub async fn ensure_authorized(api: &dyn TelegramApi) -> Result<()> {
    if api.is_authorized().await? {
        Ok(())
    } else {
        Err(Error::NotAuthorized)
    }
}
