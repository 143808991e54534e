//! Interactive contact picker
//!
//! A single-screen fuzzy finder: [`state`] holds the key-driven state machine,
//! [`render`] lays out the screen and [`terminal`] owns raw-mode I/O.

pub mod render;
pub mod state;
pub mod terminal;

pub use state::{Key, Outcome, PickerState};

use crate::error::{Error, Result};
use crate::telegram::Dialog;

/// The file being sent, shown above the search box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
}

/// Run the picker on a blocking thread and wait for its outcome.
pub async fn select_contact(dialogs: &[Dialog], file: Option<FileInfo>) -> Result<Outcome> {
    let dialogs = dialogs.to_vec();
    tokio::task::spawn_blocking(move || terminal::run(&dialogs, file.as_ref()))
        .await
        .map_err(|e| Error::IoError(std::io::Error::other(e)))?
}
