//! Tests for the interactive login sequence

use std::collections::VecDeque;

use async_trait::async_trait;
use telegram_file_sender::commands::interactive::{self, Prompter, MAX_CODE_ATTEMPTS};
use telegram_file_sender::{Error, Result};

use crate::common::{me, FakeTelegram, PHONE, VALID_CODE};

/// Answers prompts from fixed queues.
#[derive(Default)]
struct Scripted {
    phone: String,
    codes: VecDeque<String>,
    password: String,
    password_prompts: usize,
    interrupt_at_code: bool,
}

impl Scripted {
    fn new(codes: &[&str]) -> Self {
        Self {
            phone: PHONE.to_string(),
            codes: codes.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl Prompter for Scripted {
    async fn phone(&mut self) -> Result<String> {
        Ok(self.phone.clone())
    }

    async fn code(&mut self) -> Result<String> {
        if self.interrupt_at_code {
            return Err(Error::Interrupted);
        }
        Ok(self.codes.pop_front().unwrap_or_default())
    }

    async fn password(&mut self) -> Result<String> {
        self.password_prompts += 1;
        Ok(self.password.clone())
    }
}

#[tokio::test]
async fn test_login_with_code() {
    let fake = FakeTelegram::new();
    let mut prompter = Scripted::new(&[VALID_CODE]);

    let account = interactive::login(&fake, &mut prompter).await.unwrap();

    assert_eq!(account, me());
    assert_eq!(prompter.password_prompts, 0);
    assert!(fake.snapshot().authorized);
}

#[tokio::test]
async fn test_login_retries_wrong_code() {
    let fake = FakeTelegram::new();
    let mut prompter = Scripted::new(&["11111", VALID_CODE]);

    interactive::login(&fake, &mut prompter).await.unwrap();

    let state = fake.snapshot();
    assert_eq!(state.codes_requested.len(), 1);
    assert_eq!(state.sign_ins.len(), 2);
}

#[tokio::test]
async fn test_login_gives_up_after_max_attempts() {
    let fake = FakeTelegram::new();
    let wrong = vec!["00000"; MAX_CODE_ATTEMPTS + 1];
    let mut prompter = Scripted::new(&wrong);

    let err = interactive::login(&fake, &mut prompter).await.unwrap_err();

    assert_eq!(err.code(), "invalid_code");
    assert_eq!(fake.snapshot().sign_ins.len(), MAX_CODE_ATTEMPTS);
}

#[tokio::test]
async fn test_login_with_two_factor() {
    let fake = FakeTelegram::new().with_password("hunter2");
    let mut prompter = Scripted::new(&[VALID_CODE]);
    prompter.password = "hunter2".into();

    let account = interactive::login(&fake, &mut prompter).await.unwrap();

    assert_eq!(account.id, 777);
    assert_eq!(prompter.password_prompts, 1);
}

#[tokio::test]
async fn test_login_stops_when_prompt_is_interrupted() {
    let fake = FakeTelegram::new();
    let mut prompter = Scripted::new(&[VALID_CODE]);
    prompter.interrupt_at_code = true;

    let err = interactive::login(&fake, &mut prompter).await.unwrap_err();

    assert!(matches!(err, Error::Interrupted));
    let state = fake.snapshot();
    assert_eq!(state.codes_requested.len(), 1);
    assert!(state.sign_ins.is_empty());
    assert!(!state.authorized);
}
