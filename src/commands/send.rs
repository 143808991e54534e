//! `send`: deliver a file to a recipient chosen by id or fuzzy name

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::DEFAULT_DIALOG_LIMIT;
use crate::error::{Error, Result};
use crate::fuzzy::{self, Resolution};
use crate::output::format_file_size;
use crate::telegram::{Dialog, TelegramApi};

use super::ensure_authorized;

/// Who to send to. An explicit id takes precedence over a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    Id(i64),
    Name(String),
}

impl Recipient {
    pub fn from_args(to: Option<String>, to_id: Option<i64>) -> Result<Self> {
        match (to_id, to) {
            (Some(id), _) => Ok(Recipient::Id(id)),
            (None, Some(name)) if !name.is_empty() => Ok(Recipient::Name(name)),
            _ => Err(Error::NoRecipient),
        }
    }
}

/// A regular file that exists on disk, checked before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl LocalFile {
    pub fn check(path: &Path) -> Result<Self> {
        let shown = path.display().to_string();
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::FileNotFound(shown))
            }
            Err(err) => return Err(Error::IoError(err)),
        };
        if !metadata.is_file() {
            return Err(Error::NotAFile(shown));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or(shown);
        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
        })
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FileSummary {
    pub name: String,
    pub size: u64,
    pub size_human: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RecipientSummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SendReport {
    pub success: bool,
    pub message: &'static str,
    pub file: FileSummary,
    pub recipient: RecipientSummary,
}

/// Look the recipient up, applying the fuzzy acceptance policy to names.
pub async fn resolve(api: &dyn TelegramApi, recipient: &Recipient) -> Result<Dialog> {
    let query = match recipient {
        Recipient::Id(id) => {
            return api.get_entity(*id).await.map_err(|err| match err {
                Error::EntityNotFound { .. } => err,
                other => Error::EntityNotFound {
                    id: *id,
                    reason: other.to_string(),
                },
            })
        }
        Recipient::Name(query) => query,
    };

    let dialogs = api.list_dialogs(DEFAULT_DIALOG_LIMIT).await?;
    let names: Vec<&str> = dialogs.iter().map(Dialog::search_name).collect();
    let matches = fuzzy::search(&names, query);

    match fuzzy::resolve(&matches) {
        Resolution::NoMatch => Err(Error::ContactNotFound(query.clone())),
        Resolution::Low(best) => Err(Error::LowMatchScore {
            query: query.clone(),
            best: dialogs[best.index].display_name(),
            score: best.score,
        }),
        Resolution::Accepted(best) => {
            debug!(query = %query, score = best.score, "recipient matched");
            Ok(dialogs[best.index].clone())
        }
    }
}

pub async fn run(
    api: &dyn TelegramApi,
    file: &LocalFile,
    recipient: &Recipient,
) -> Result<SendReport> {
    ensure_authorized(api).await?;
    let target = resolve(api, recipient).await?;

    api.send_file(&target, &file.path, &|_: u64, _: u64| {}).await?;
    info!(recipient = target.id, bytes = file.size, "file sent");

    Ok(SendReport {
        success: true,
        message: "File sent",
        file: FileSummary {
            name: file.name.clone(),
            size: file.size,
            size_human: format_file_size(file.size),
        },
        recipient: RecipientSummary {
            id: target.id,
            name: target.display_name(),
        },
    })
}
