//! Telegram File Sender Library
//!
//! This library provides tools to:
//! - Pick a recipient from recent dialogs with a fuzzy-search terminal picker
//! - Upload a file to that recipient with a live progress bar
//! - Drive the same operations from scripts through JSON-printing commands
//! - Keep API credentials, the login session and pending code requests on disk

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod output;
pub mod picker;
pub mod session;
pub mod telegram;
pub mod text;
pub mod upload;

// Re-export common types
pub use config::{AppPaths, CredentialStore, Credentials};
pub use error::{Error, Result};
pub use session::{Connection, SessionLock};
pub use telegram::{Account, Dialog, DialogKind, SignIn, TelegramApi};
