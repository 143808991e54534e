//! Tests for the send command

use telegram_file_sender::commands::send::{self, LocalFile, Recipient};
use telegram_file_sender::{Dialog, DialogKind};

use crate::common::{temp_paths, write_file, FakeTelegram};

#[tokio::test]
async fn test_send_by_name() {
    let (dir, _paths) = temp_paths();
    let path = write_file(dir.path(), "report.pdf", 1536);
    let file = LocalFile::check(&path).unwrap();

    let fake = FakeTelegram::authorized();
    let report = send::run(&fake, &file, &Recipient::Name("alice".into()))
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        serde_json::json!({
            "success": true,
            "message": "File sent",
            "file": {"name": "report.pdf", "size": 1536, "size_human": "1.50 KB"},
            "recipient": {"id": 1, "name": "Alice Smith"}
        })
    );
    assert_eq!(fake.snapshot().sent_files, vec![(1, path)]);
}

#[tokio::test]
async fn test_send_by_id() {
    let (dir, _paths) = temp_paths();
    let path = write_file(dir.path(), "a.txt", 10);
    let file = LocalFile::check(&path).unwrap();

    let fake = FakeTelegram::authorized();
    let report = send::run(&fake, &file, &Recipient::Id(-100123)).await.unwrap();

    assert_eq!(report.recipient.id, -100123);
    assert_eq!(report.recipient.name, "Rust Team");
    // id lookups never list dialogs
    assert!(fake.snapshot().dialog_limits.is_empty());
}

#[tokio::test]
async fn test_unknown_id() {
    let (dir, _paths) = temp_paths();
    let file = LocalFile::check(&write_file(dir.path(), "a.txt", 10)).unwrap();

    let fake = FakeTelegram::authorized();
    let err = send::run(&fake, &file, &Recipient::Id(999)).await.unwrap_err();

    assert_eq!(err.code(), "entity_not_found");
    assert!(err.to_string().starts_with("Could not find entity with ID 999"));
    assert!(fake.snapshot().sent_files.is_empty());
}

#[tokio::test]
async fn test_contact_not_found() {
    let (dir, _paths) = temp_paths();
    let file = LocalFile::check(&write_file(dir.path(), "a.txt", 10)).unwrap();

    let fake = FakeTelegram::authorized();
    let err = send::run(&fake, &file, &Recipient::Name("qqqq".into()))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "contact_not_found");
    assert_eq!(err.to_string(), "No contact found matching 'qqqq'");
    assert_eq!(fake.snapshot().dialog_limits, vec![100]);
}

#[tokio::test]
async fn test_low_match_score() {
    let (dir, _paths) = temp_paths();
    let file = LocalFile::check(&write_file(dir.path(), "a.txt", 10)).unwrap();

    // "qzx" shares only the leading "x" with "Xavier": 2 * 1 / (3 + 1) = 50
    let fake = FakeTelegram::authorized();
    let err = send::run(&fake, &file, &Recipient::Name("qzx".into()))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "low_match_score");
    assert_eq!(
        err.to_string(),
        "No good match found for 'qzx'. Best match: 'Xavier' (score: 50)"
    );
    assert!(fake.snapshot().sent_files.is_empty());
}

#[tokio::test]
async fn test_unnamed_recipient_reported_by_id() {
    let (dir, _paths) = temp_paths();
    let file = LocalFile::check(&write_file(dir.path(), "a.txt", 1)).unwrap();

    let unnamed = Dialog {
        id: 55,
        name: None,
        kind: DialogKind::Chat,
    };
    let fake = FakeTelegram::authorized().with_dialogs(vec![unnamed]);
    let report = send::run(&fake, &file, &Recipient::Id(55)).await.unwrap();

    assert_eq!(report.recipient.name, "55");
}

#[tokio::test]
async fn test_requires_authorization() {
    let (dir, _paths) = temp_paths();
    let file = LocalFile::check(&write_file(dir.path(), "a.txt", 1)).unwrap();

    let fake = FakeTelegram::new();
    let err = send::run(&fake, &file, &Recipient::Id(1)).await.unwrap_err();
    assert_eq!(err.code(), "not_authorized");
}

#[test]
fn test_local_checks_come_first() {
    let (dir, _paths) = temp_paths();

    let err = LocalFile::check(&dir.path().join("nope.bin")).unwrap_err();
    assert_eq!(err.code(), "file_not_found");

    let err = Recipient::from_args(None, None).unwrap_err();
    assert_eq!(err.code(), "no_recipient");
    assert_eq!(
        err.to_string(),
        "Specify recipient with --to (name) or --to-id (Telegram ID)"
    );
}
