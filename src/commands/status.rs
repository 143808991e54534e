//! `status`: are credentials stored and is the session signed in?

use serde::Serialize;

use crate::error::Result;
use crate::telegram::{Account, TelegramApi};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StatusReport {
    pub success: bool,
    pub configured: bool,
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Account>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl StatusReport {
    /// Report for a machine with no stored credentials; no connection is made.
    pub fn not_configured() -> Self {
        Self {
            success: true,
            configured: false,
            authenticated: false,
            user: None,
            message: Some("No API credentials configured"),
        }
    }
}

pub async fn run(api: &dyn TelegramApi) -> Result<StatusReport> {
    if !api.is_authorized().await? {
        return Ok(StatusReport {
            success: true,
            configured: true,
            authenticated: false,
            user: None,
            message: Some("Credentials configured but not authenticated"),
        });
    }

    let me = api.get_me().await?;
    Ok(StatusReport {
        success: true,
        configured: true,
        authenticated: true,
        user: Some(me),
        message: None,
    })
}
