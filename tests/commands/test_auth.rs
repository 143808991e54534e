//! Tests for the staged auth command

use telegram_file_sender::cli::AuthArgs;
use telegram_file_sender::commands::auth::{self, AuthStatus};
use telegram_file_sender::config::PendingLogin;

use crate::common::{me, temp_paths, FakeTelegram, ISSUED_HASH, PHONE, VALID_CODE};

fn args(phone: Option<&str>, code: Option<&str>) -> AuthArgs {
    AuthArgs {
        phone: phone.map(Into::into),
        code: code.map(Into::into),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_already_authorized() {
    let (_dir, paths) = temp_paths();
    let fake = FakeTelegram::authorized();

    let report = auth::run(&fake, &args(Some(PHONE), None), &paths.pending_login)
        .await
        .unwrap();

    assert_eq!(report.status, AuthStatus::Authorized { user: me() });
    assert!(fake.snapshot().codes_requested.is_empty());
}

#[tokio::test]
async fn test_need_phone() {
    let (_dir, paths) = temp_paths();
    let report = auth::run(&FakeTelegram::new(), &AuthArgs::default(), &paths.pending_login)
        .await
        .unwrap();

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["status"], "need_phone");
    assert_eq!(value["message"], "Provide phone number with --phone");
}

#[tokio::test]
async fn test_code_sent_remembers_hash() {
    let (_dir, paths) = temp_paths();
    let fake = FakeTelegram::new();

    let report = auth::run(&fake, &args(Some(PHONE), None), &paths.pending_login)
        .await
        .unwrap();

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["status"], "code_sent");
    assert_eq!(value["phone_code_hash"], ISSUED_HASH);

    assert_eq!(fake.snapshot().codes_requested, vec![PHONE.to_string()]);
    assert_eq!(
        PendingLogin::hash_for(&paths.pending_login, PHONE).unwrap(),
        Some(ISSUED_HASH.to_string())
    );
}

#[tokio::test]
async fn test_code_completes_with_stored_hash() {
    let (_dir, paths) = temp_paths();
    let fake = FakeTelegram::new();

    auth::run(&fake, &args(Some(PHONE), None), &paths.pending_login)
        .await
        .unwrap();
    let report = auth::run(&fake, &args(Some(PHONE), Some(VALID_CODE)), &paths.pending_login)
        .await
        .unwrap();

    assert_eq!(report.status, AuthStatus::Authorized { user: me() });

    let state = fake.snapshot();
    // no second code request
    assert_eq!(state.codes_requested.len(), 1);
    assert_eq!(state.sign_ins[0].2, ISSUED_HASH);
    assert!(!paths.pending_login.exists());
}

#[tokio::test]
async fn test_explicit_hash_is_used() {
    let (_dir, paths) = temp_paths();
    let fake = FakeTelegram::new();

    let mut request = args(Some(PHONE), Some(VALID_CODE));
    request.phone_code_hash = Some(ISSUED_HASH.to_string());
    let report = auth::run(&fake, &request, &paths.pending_login).await.unwrap();

    assert!(matches!(report.status, AuthStatus::Authorized { .. }));
    assert!(fake.snapshot().codes_requested.is_empty());
}

#[tokio::test]
async fn test_code_without_any_hash_fails() {
    let (_dir, paths) = temp_paths();
    let fake = FakeTelegram::new();

    let err = auth::run(&fake, &args(Some(PHONE), Some(VALID_CODE)), &paths.pending_login)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "sign_in_failed");
    let state = fake.snapshot();
    assert!(state.codes_requested.is_empty());
    assert!(state.sign_ins.is_empty());
}

#[tokio::test]
async fn test_pending_hash_for_other_phone_is_ignored() {
    let (_dir, paths) = temp_paths();
    PendingLogin {
        phone: "+19998887777".into(),
        phone_code_hash: ISSUED_HASH.into(),
    }
    .save(&paths.pending_login)
    .unwrap();

    let err = auth::run(
        &FakeTelegram::new(),
        &args(Some(PHONE), Some(VALID_CODE)),
        &paths.pending_login,
    )
    .await
    .unwrap_err();
    assert_eq!(err.code(), "sign_in_failed");
}

#[tokio::test]
async fn test_invalid_code() {
    let (_dir, paths) = temp_paths();
    let fake = FakeTelegram::new();

    auth::run(&fake, &args(Some(PHONE), None), &paths.pending_login)
        .await
        .unwrap();
    let err = auth::run(&fake, &args(Some(PHONE), Some("00000")), &paths.pending_login)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "invalid_code");
    assert_eq!(err.to_string(), "Invalid code");
    // the request stays usable for another attempt
    assert!(paths.pending_login.exists());
}

#[tokio::test]
async fn test_two_factor_flow() {
    let (_dir, paths) = temp_paths();
    let fake = FakeTelegram::new().with_password("hunter2");

    auth::run(&fake, &args(Some(PHONE), None), &paths.pending_login)
        .await
        .unwrap();

    let report = auth::run(&fake, &args(Some(PHONE), Some(VALID_CODE)), &paths.pending_login)
        .await
        .unwrap();
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["status"], "need_password");
    assert_eq!(value["message"], "2FA is enabled. Provide password with --password");
    assert!(paths.pending_login.exists());

    let mut request = args(Some(PHONE), Some(VALID_CODE));
    request.password = Some("hunter2".into());
    let report = auth::run(&fake, &request, &paths.pending_login).await.unwrap();

    assert_eq!(report.status, AuthStatus::Authorized { user: me() });
    assert!(!paths.pending_login.exists());
}

#[tokio::test]
async fn test_wrong_password() {
    let (_dir, paths) = temp_paths();
    let fake = FakeTelegram::new().with_password("hunter2");

    let mut request = args(Some(PHONE), Some(VALID_CODE));
    request.phone_code_hash = Some(ISSUED_HASH.into());
    request.password = Some("wrong".into());
    let err = auth::run(&fake, &request, &paths.pending_login).await.unwrap_err();

    assert_eq!(err.code(), "password_failed");
    assert!(!fake.snapshot().authorized);
}

#[tokio::test]
async fn test_send_code_failure() {
    let (_dir, paths) = temp_paths();
    let fake = FakeTelegram::new().failing_send_code("PHONE_NUMBER_INVALID");

    let err = auth::run(&fake, &args(Some("123"), None), &paths.pending_login)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "send_code_failed");
    assert_eq!(err.to_string(), "PHONE_NUMBER_INVALID");
    assert!(!paths.pending_login.exists());
}
