//! grammers-backed implementation of [`TelegramApi`]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use grammers_client::types::peer::Peer;
use grammers_client::types::PasswordToken;
use grammers_client::{InputMessage, InvocationError};
use grammers_session::defs::PeerId;
use grammers_tl_types as tl;
use tracing::{debug, info, warn};

use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::session::Connection;
use crate::telegram::{Account, Dialog, DialogKind, ProgressFn, SignIn, TelegramApi};
use crate::upload::ProgressReader;

/// Live MTProto client plus the peers seen so far in this process.
pub struct GrammersClient {
    conn: Connection,
    api_id: i32,
    api_hash: String,
    peers: Mutex<HashMap<i64, Peer>>,
}

impl GrammersClient {
    /// Open the session file and start the sender pool.
    pub fn connect(session_path: &Path, credentials: &Credentials) -> Result<Self> {
        let conn = Connection::open(session_path, credentials.api_id)?;
        Ok(Self {
            conn,
            api_id: credentials.api_id,
            api_hash: credentials.api_hash.clone(),
            peers: Mutex::new(HashMap::new()),
        })
    }

    fn remember(&self, id: i64, peer: &Peer) {
        let mut peers = self.peers.lock().unwrap_or_else(|e| e.into_inner());
        peers.insert(id, peer.clone());
    }

    fn cached_peer(&self, id: i64) -> Option<Peer> {
        let peers = self.peers.lock().unwrap_or_else(|e| e.into_inner());
        peers.get(&id).cloned()
    }

    /// Walk every dialog until one with `id` turns up.
    async fn find_peer(&self, id: i64) -> Result<Option<Peer>> {
        if let Some(peer) = self.cached_peer(id) {
            return Ok(Some(peer));
        }

        let mut dialogs = self.conn.iter_dialogs();
        while let Some(dialog) = dialogs.next().await? {
            let peer_id = peer_id(&dialog.peer);
            self.remember(peer_id, &dialog.peer);
            if peer_id == id {
                return Ok(Some(dialog.peer.clone()));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl TelegramApi for GrammersClient {
    async fn is_authorized(&self) -> Result<bool> {
        Ok(self.conn.is_authorized().await?)
    }

    async fn send_code(&self, phone: &str) -> Result<String> {
        let request = tl::functions::auth::SendCode {
            phone_number: phone.to_string(),
            api_id: self.api_id,
            api_hash: self.api_hash.clone(),
            settings: empty_code_settings(),
        };

        let sent = self
            .conn
            .invoke(&request)
            .await
            .map_err(|e| Error::SendCodeFailed(e.to_string()))?;

        match sent {
            tl::enums::auth::SentCode::Code(code) => {
                info!("login code requested");
                Ok(code.phone_code_hash)
            }
            _ => Err(Error::SendCodeFailed(
                "Telegram did not issue a login code for this number".to_string(),
            )),
        }
    }

    async fn sign_in(&self, phone: &str, code: &str, phone_code_hash: &str) -> Result<SignIn> {
        let request = tl::functions::auth::SignIn {
            phone_number: phone.to_string(),
            phone_code_hash: phone_code_hash.to_string(),
            phone_code: Some(code.to_string()),
            email_verification: None,
        };

        match self.conn.invoke(&request).await {
            Ok(tl::enums::auth::Authorization::Authorization(auth)) => {
                info!("signed in with login code");
                Ok(SignIn::Authorized(account_from_raw(&auth.user)))
            }
            Ok(tl::enums::auth::Authorization::SignUpRequired(_)) => Err(Error::SignInFailed(
                "This phone number is not registered on Telegram".to_string(),
            )),
            Err(InvocationError::Rpc(rpc)) if rpc.name == "SESSION_PASSWORD_NEEDED" => {
                debug!("account has two-factor authentication enabled");
                Ok(SignIn::PasswordRequired)
            }
            Err(InvocationError::Rpc(rpc)) if rpc.name.starts_with("PHONE_CODE_") => {
                warn!(rpc = %rpc.name, "login code rejected");
                Err(Error::InvalidCode)
            }
            Err(e) => Err(Error::SignInFailed(e.to_string())),
        }
    }

    async fn check_password(&self, password: &str) -> Result<Account> {
        let info = self
            .conn
            .invoke(&tl::functions::account::GetPassword {})
            .await
            .map_err(|e| Error::PasswordFailed(e.to_string()))?;
        let tl::enums::account::Password::Password(info) = info;

        let user = self
            .conn
            .check_password(PasswordToken::new(info), password.as_bytes())
            .await
            .map_err(|e| Error::PasswordFailed(e.to_string()))?;

        info!("signed in with two-factor password");
        Ok(account_from_raw(&user.raw))
    }

    async fn get_me(&self) -> Result<Account> {
        let me = self.conn.get_me().await?;
        Ok(account_from_raw(&me.raw))
    }

    async fn list_dialogs(&self, limit: usize) -> Result<Vec<Dialog>> {
        let mut dialogs = self.conn.iter_dialogs();
        let mut out = Vec::new();

        while out.len() < limit {
            let Some(dialog) = dialogs.next().await? else {
                break;
            };
            let entry = dialog_from_peer(&dialog.peer);
            self.remember(entry.id, &dialog.peer);
            out.push(entry);
        }

        debug!(count = out.len(), limit, "dialogs fetched");
        Ok(out)
    }

    async fn get_entity(&self, id: i64) -> Result<Dialog> {
        match self.find_peer(id).await {
            Ok(Some(peer)) => Ok(dialog_from_peer(&peer)),
            Ok(None) => Err(Error::EntityNotFound {
                id,
                reason: "not found in your dialogs".to_string(),
            }),
            Err(e) => Err(Error::EntityNotFound {
                id,
                reason: e.to_string(),
            }),
        }
    }

    async fn send_file(
        &self,
        target: &Dialog,
        path: &Path,
        on_progress: ProgressFn<'_>,
    ) -> Result<()> {
        let peer = self.find_peer(target.id).await?.ok_or_else(|| Error::EntityNotFound {
            id: target.id,
            reason: "not found in your dialogs".to_string(),
        })?;

        let file = tokio::fs::File::open(path).await?;
        let size = file.metadata().await?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());

        let mut reader = ProgressReader::new(file, size, on_progress);
        let uploaded = self
            .conn
            .upload_stream(&mut reader, size as usize, name)
            .await?;

        self.conn
            .send_message(&peer, InputMessage::new().document(uploaded))
            .await?;
        Ok(())
    }
}

/// `codeSettings` with no flags set.
fn empty_code_settings() -> tl::enums::CodeSettings {
    tl::types::CodeSettings {
        allow_flashcall: false,
        current_number: false,
        allow_app_hash: false,
        allow_missed_call: false,
        allow_firebase: false,
        unknown_number: false,
        logout_tokens: None,
        token: None,
        app_sandbox: None,
    }
    .into()
}

fn account_from_raw(user: &tl::enums::User) -> Account {
    match user {
        tl::enums::User::User(u) => Account {
            id: u.id,
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            username: u.username.clone(),
            phone: u.phone.clone(),
        },
        tl::enums::User::Empty(u) => Account {
            id: u.id,
            first_name: None,
            last_name: None,
            username: None,
            phone: None,
        },
    }
}

/// Dialog id in the Bot API marked form: users positive, small groups `-id`,
/// channels and megagroups `-100…`.
fn peer_id(peer: &Peer) -> i64 {
    dialog_key(peer.id())
}

fn dialog_key(id: PeerId) -> i64 {
    id.bot_api_dialog_id()
}

fn dialog_from_peer(peer: &Peer) -> Dialog {
    let (name, kind) = match peer {
        Peer::User(u) => (Some(u.full_name()), DialogKind::User),
        Peer::Group(g) => {
            let kind = match &g.raw {
                tl::enums::Chat::Empty(_) => DialogKind::Chat,
                _ => DialogKind::Group,
            };
            (g.title().map(str::to_string), kind)
        }
        Peer::Channel(c) => (Some(c.title().to_string()), DialogKind::Channel),
    };

    Dialog {
        id: peer_id(peer),
        name: name.filter(|n| !n.trim().is_empty()),
        kind,
    }
}
