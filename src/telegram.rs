//! Telegram domain model and the client capability the commands depend on.
//!
//! [`TelegramApi`] is transport-agnostic; [`crate::client::GrammersClient`]
//! implements it over MTProto.

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// Progress callback: `(bytes_done, bytes_total)`.
pub type ProgressFn<'a> = &'a (dyn Fn(u64, u64) + Send + Sync);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogKind {
    User,
    Group,
    Channel,
    Chat,
}

impl DialogKind {
    /// Lowercase name used in JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogKind::User => "user",
            DialogKind::Group => "group",
            DialogKind::Channel => "channel",
            DialogKind::Chat => "chat",
        }
    }

    /// Icon + label shown in the picker.
    pub fn label(&self) -> &'static str {
        match self {
            DialogKind::User => "👤 User",
            DialogKind::Group => "👥 Group",
            DialogKind::Channel => "📢 Channel",
            DialogKind::Chat => "💬 Chat",
        }
    }
}

/// A conversation the account can send to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub id: i64,
    pub name: Option<String>,
    pub kind: DialogKind,
}

impl Dialog {
    pub fn new(id: i64, name: impl Into<String>, kind: DialogKind) -> Self {
        Self {
            id,
            name: Some(name.into()),
            kind,
        }
    }

    /// Name used for fuzzy matching; unnamed dialogs match as empty.
    pub fn search_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Name reported back to the user, falling back to the numeric id.
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.id.to_string(),
        }
    }
}

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub phone: Option<String>,
}

/// Result of submitting a login code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignIn {
    Authorized(Account),
    PasswordRequired,
}

/// Operations the command layer needs from a connected Telegram client.
#[async_trait]
pub trait TelegramApi: Send + Sync {
    async fn is_authorized(&self) -> Result<bool>;

    /// Request a login code; returns the phone-code hash that identifies the request.
    async fn send_code(&self, phone: &str) -> Result<String>;

    async fn sign_in(&self, phone: &str, code: &str, phone_code_hash: &str) -> Result<SignIn>;

    /// Complete a login that stopped at [`SignIn::PasswordRequired`].
    async fn check_password(&self, password: &str) -> Result<Account>;

    async fn get_me(&self) -> Result<Account>;

    /// Most recent dialogs first, at most `limit` of them.
    async fn list_dialogs(&self, limit: usize) -> Result<Vec<Dialog>>;

    async fn get_entity(&self, id: i64) -> Result<Dialog>;

    async fn send_file(&self, target: &Dialog, path: &Path, on_progress: ProgressFn<'_>)
        -> Result<()>;
}
