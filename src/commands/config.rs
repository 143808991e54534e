//! `config`: set or report stored API credentials

use serde::Serialize;
use tracing::info;

use crate::config::{CredentialStore, Credentials};
use crate::error::Result;

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ConfigReport {
    Saved {
        success: bool,
        message: &'static str,
    },
    Configured {
        success: bool,
        configured: bool,
        api_id: i32,
    },
    NotConfigured {
        success: bool,
        configured: bool,
        message: &'static str,
    },
}

/// Save credentials when both flags are given, otherwise report what is stored.
pub fn run(
    store: &CredentialStore,
    api_id: Option<i32>,
    api_hash: Option<&str>,
) -> Result<ConfigReport> {
    if let (Some(api_id), Some(api_hash)) = (api_id, api_hash) {
        store.save(&Credentials {
            api_id,
            api_hash: api_hash.to_string(),
        })?;
        info!(api_id, "credentials saved");
        return Ok(ConfigReport::Saved {
            success: true,
            message: "Credentials saved",
        });
    }

    Ok(match store.load()? {
        Some(credentials) => ConfigReport::Configured {
            success: true,
            configured: true,
            api_id: credentials.api_id,
        },
        None => ConfigReport::NotConfigured {
            success: true,
            configured: false,
            message: "No credentials configured. Use --api-id and --api-hash to configure.",
        },
    })
}
