//! `auth`: staged sign-in, one stage per invocation
//!
//! 1. no `--phone`: ask for it
//! 2. `--phone` only: request a login code and remember its hash
//! 3. `--phone --code`: sign in, using `--phone-code-hash` or the remembered hash
//! 4. two-factor accounts additionally need `--password`

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::cli::AuthArgs;
use crate::config::PendingLogin;
use crate::error::{Error, Result};
use crate::telegram::{Account, SignIn, TelegramApi};

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuthStatus {
    Authorized {
        user: Account,
    },
    NeedPhone {
        message: &'static str,
    },
    CodeSent {
        phone_code_hash: String,
        message: &'static str,
    },
    NeedPassword {
        message: &'static str,
    },
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AuthReport {
    pub success: bool,
    #[serde(flatten)]
    pub status: AuthStatus,
}

impl AuthReport {
    fn new(status: AuthStatus) -> Self {
        Self {
            success: true,
            status,
        }
    }

    fn authorized(user: Account) -> Self {
        Self::new(AuthStatus::Authorized { user })
    }
}

/// Advance the login by one stage. `pending` is where code requests are remembered.
pub async fn run(api: &dyn TelegramApi, args: &AuthArgs, pending: &Path) -> Result<AuthReport> {
    if api.is_authorized().await? {
        let me = api.get_me().await?;
        return Ok(AuthReport::authorized(me));
    }

    let Some(phone) = args.phone.as_deref() else {
        return Ok(AuthReport::new(AuthStatus::NeedPhone {
            message: "Provide phone number with --phone",
        }));
    };

    let Some(code) = args.code.as_deref() else {
        let phone_code_hash = api.send_code(phone).await.map_err(as_send_code_failure)?;
        PendingLogin {
            phone: phone.to_string(),
            phone_code_hash: phone_code_hash.clone(),
        }
        .save(pending)?;

        return Ok(AuthReport::new(AuthStatus::CodeSent {
            phone_code_hash,
            message: "Code sent to Telegram app. Provide code with --code",
        }));
    };

    let phone_code_hash = match args.phone_code_hash.clone() {
        Some(hash) => hash,
        None => PendingLogin::hash_for(pending, phone)?.ok_or_else(|| {
            Error::SignInFailed(
                "No pending code request for this phone. Run 'tgsend auth --phone PHONE' first \
                 or pass --phone-code-hash."
                    .to_string(),
            )
        })?,
    };
    debug!(phone, "signing in with login code");

    let user = match api.sign_in(phone, code, &phone_code_hash).await? {
        SignIn::Authorized(user) => user,
        SignIn::PasswordRequired => {
            let Some(password) = args.password.as_deref() else {
                return Ok(AuthReport::new(AuthStatus::NeedPassword {
                    message: "2FA is enabled. Provide password with --password",
                }));
            };
            api.check_password(password)
                .await
                .map_err(as_password_failure)?
        }
    };

    PendingLogin::clear(pending)?;
    info!(user_id = user.id, "authorized");
    Ok(AuthReport::authorized(user))
}

fn as_send_code_failure(err: Error) -> Error {
    match err {
        Error::SendCodeFailed(_) => err,
        other => Error::SendCodeFailed(other.to_string()),
    }
}

fn as_password_failure(err: Error) -> Error {
    match err {
        Error::PasswordFailed(_) => err,
        other => Error::PasswordFailed(other.to_string()),
    }
}
