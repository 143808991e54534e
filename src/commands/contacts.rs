//! `contacts`: list recent dialogs, optionally fuzzy-searched

use serde::Serialize;
use tracing::debug;

use crate::config::DEFAULT_DIALOG_LIMIT;
use crate::error::Result;
use crate::fuzzy;
use crate::telegram::{Dialog, DialogKind, TelegramApi};

use super::ensure_authorized;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Contact {
    pub id: i64,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: DialogKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u8>,
}

impl Contact {
    fn new(dialog: &Dialog, match_score: Option<u8>) -> Self {
        Self {
            id: dialog.id,
            name: dialog.name.clone(),
            kind: dialog.kind,
            match_score,
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ContactsReport {
    pub success: bool,
    pub count: usize,
    pub contacts: Vec<Contact>,
}

pub async fn run(
    api: &dyn TelegramApi,
    search: Option<&str>,
    limit: usize,
) -> Result<ContactsReport> {
    ensure_authorized(api).await?;

    let limit = if limit == 0 { DEFAULT_DIALOG_LIMIT } else { limit };
    let dialogs = api.list_dialogs(limit).await?;

    let contacts: Vec<Contact> = match search.filter(|q| !q.is_empty()) {
        Some(query) => {
            let names: Vec<&str> = dialogs.iter().map(Dialog::search_name).collect();
            fuzzy::search(&names, query)
                .into_iter()
                .map(|m| Contact::new(&dialogs[m.index], Some(m.score)))
                .collect()
        }
        None => dialogs.iter().map(|d| Contact::new(d, None)).collect(),
    };
    debug!(fetched = dialogs.len(), listed = contacts.len(), "contacts listed");

    Ok(ContactsReport {
        success: true,
        count: contacts.len(),
        contacts,
    })
}
