//! In-memory stand-in for a Telegram account

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use telegram_file_sender::config::AppPaths;
use telegram_file_sender::telegram::ProgressFn;
use telegram_file_sender::{Account, Dialog, DialogKind, Error, Result, SignIn, TelegramApi};

pub const ISSUED_HASH: &str = "hash-from-telegram";
pub const VALID_CODE: &str = "12345";
pub const PHONE: &str = "+15550001111";

#[derive(Debug, Clone)]
pub struct FakeState {
    pub authorized: bool,
    pub me: Account,
    pub dialogs: Vec<Dialog>,
    pub password: Option<String>,
    pub awaiting_password: bool,
    pub send_code_error: Option<String>,
    pub codes_requested: Vec<String>,
    pub sign_ins: Vec<(String, String, String)>,
    pub dialog_limits: Vec<usize>,
    pub sent_files: Vec<(i64, PathBuf)>,
    /// Byte counts `send_file` reports, in order; `None` reports half then all.
    pub progress_steps: Option<Vec<u64>>,
    pub send_file_error: Option<String>,
}

pub struct FakeTelegram {
    pub state: Mutex<FakeState>,
}

impl FakeTelegram {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                authorized: false,
                me: me(),
                dialogs: sample_dialogs(),
                password: None,
                awaiting_password: false,
                send_code_error: None,
                codes_requested: Vec::new(),
                sign_ins: Vec::new(),
                dialog_limits: Vec::new(),
                sent_files: Vec::new(),
                progress_steps: None,
                send_file_error: None,
            }),
        }
    }

    pub fn authorized() -> Self {
        let fake = Self::new();
        fake.state.lock().unwrap().authorized = true;
        fake
    }

    pub fn with_password(self, password: &str) -> Self {
        self.state.lock().unwrap().password = Some(password.to_string());
        self
    }

    pub fn with_dialogs(self, dialogs: Vec<Dialog>) -> Self {
        self.state.lock().unwrap().dialogs = dialogs;
        self
    }

    pub fn failing_send_code(self, reason: &str) -> Self {
        self.state.lock().unwrap().send_code_error = Some(reason.to_string());
        self
    }

    pub fn with_progress_steps(self, steps: &[u64]) -> Self {
        self.state.lock().unwrap().progress_steps = Some(steps.to_vec());
        self
    }

    /// Uploads report the first progress step, then fail with `reason`.
    pub fn failing_send_file(self, reason: &str) -> Self {
        self.state.lock().unwrap().send_file_error = Some(reason.to_string());
        self
    }

    pub fn snapshot(&self) -> FakeState {
        self.state.lock().unwrap().clone()
    }
}

#[async_trait]
impl TelegramApi for FakeTelegram {
    async fn is_authorized(&self) -> Result<bool> {
        Ok(self.state.lock().unwrap().authorized)
    }

    async fn send_code(&self, phone: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        if let Some(reason) = &state.send_code_error {
            return Err(Error::SendCodeFailed(reason.clone()));
        }
        state.codes_requested.push(phone.to_string());
        Ok(ISSUED_HASH.to_string())
    }

    async fn sign_in(&self, phone: &str, code: &str, phone_code_hash: &str) -> Result<SignIn> {
        let mut state = self.state.lock().unwrap();
        state
            .sign_ins
            .push((phone.to_string(), code.to_string(), phone_code_hash.to_string()));

        if phone_code_hash != ISSUED_HASH {
            return Err(Error::SignInFailed("PHONE_CODE_HASH_INVALID".into()));
        }
        if code != VALID_CODE {
            return Err(Error::InvalidCode);
        }
        if state.password.is_some() {
            state.awaiting_password = true;
            return Ok(SignIn::PasswordRequired);
        }
        state.authorized = true;
        Ok(SignIn::Authorized(state.me.clone()))
    }

    async fn check_password(&self, password: &str) -> Result<Account> {
        let mut state = self.state.lock().unwrap();
        if !state.awaiting_password {
            return Err(Error::PasswordFailed("no login awaiting a password".into()));
        }
        if state.password.as_deref() != Some(password) {
            return Err(Error::PasswordFailed("PASSWORD_HASH_INVALID".into()));
        }
        state.awaiting_password = false;
        state.authorized = true;
        Ok(state.me.clone())
    }

    async fn get_me(&self) -> Result<Account> {
        let state = self.state.lock().unwrap();
        if state.authorized {
            Ok(state.me.clone())
        } else {
            Err(Error::NotAuthorized)
        }
    }

    async fn list_dialogs(&self, limit: usize) -> Result<Vec<Dialog>> {
        let mut state = self.state.lock().unwrap();
        state.dialog_limits.push(limit);
        Ok(state.dialogs.iter().take(limit).cloned().collect())
    }

    async fn get_entity(&self, id: i64) -> Result<Dialog> {
        let state = self.state.lock().unwrap();
        state
            .dialogs
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| Error::EntityNotFound {
                id,
                reason: "not found in your dialogs".into(),
            })
    }

    async fn send_file(
        &self,
        target: &Dialog,
        path: &Path,
        on_progress: ProgressFn<'_>,
    ) -> Result<()> {
        let size = std::fs::metadata(path)?.len();
        let (steps, failure) = {
            let state = self.state.lock().unwrap();
            let steps = state
                .progress_steps
                .clone()
                .unwrap_or_else(|| vec![size / 2, size]);
            (steps, state.send_file_error.clone())
        };

        if let Some(reason) = failure {
            if let Some(first) = steps.first() {
                on_progress(*first, size);
            }
            return Err(Error::TelegramError(reason));
        }

        for done in steps {
            on_progress(done, size);
        }
        self.state
            .lock()
            .unwrap()
            .sent_files
            .push((target.id, path.to_path_buf()));
        Ok(())
    }
}

pub fn me() -> Account {
    Account {
        id: 777,
        first_name: Some("Test".into()),
        last_name: Some("User".into()),
        username: Some("test_user".into()),
        phone: Some("15550001111".into()),
    }
}

pub fn sample_dialogs() -> Vec<Dialog> {
    vec![
        Dialog::new(1, "Alice Smith", DialogKind::User),
        Dialog::new(2, "Bob Alison", DialogKind::User),
        Dialog::new(3, "Dmitry Popov", DialogKind::User),
        Dialog::new(-100123, "Rust Team", DialogKind::Group),
        Dialog::new(-100456, "Release Notes", DialogKind::Channel),
        Dialog::new(4, "Xavier", DialogKind::User),
    ]
}

/// Isolated application directory.
pub fn temp_paths() -> (TempDir, AppPaths) {
    let dir = tempfile::tempdir().unwrap();
    let paths = AppPaths::in_dir(dir.path());
    (dir, paths)
}

/// A file of `size` zero bytes inside `dir`.
pub fn write_file(dir: &Path, name: &str, size: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, vec![0u8; size]).unwrap();
    path
}
