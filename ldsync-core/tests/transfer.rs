use std::sync::{Arc, Mutex};

use ldsync_core::archive::{FailureArchive, PreservedImport};
use ldsync_core::contract::{
    Credentials, ImportRequest, MockStringServer, ProjectLanguage, SessionToken,
};
use ldsync_core::transfer::{export_project, import_table, resubmit};
use ldsync_core::{Error, FieldList, Table};
use tempfile::tempdir;

fn credentials() -> Credentials {
    Credentials::new("translator", "secret")
}

fn logged_in_server() -> MockStringServer {
    let mut server = MockStringServer::new();
    server
        .expect_login()
        .times(1)
        .returning(|_| Ok(SessionToken::new("session")));
    server
}

#[tokio::test]
async fn test_export_requests_text_of_every_target_language() {
    let mut server = logged_in_server();
    server
        .expect_project_languages()
        .withf(|_, project| project == "Game")
        .returning(|_, _| {
            Ok(vec![
                ProjectLanguage { code: "svSE".into(), is_source: true },
                ProjectLanguage { code: "enUS".into(), is_source: false },
                ProjectLanguage { code: "deDE".into(), is_source: false },
            ])
        });
    server
        .expect_export_strings()
        .withf(|_, request| {
            request.fields.joined()
                == "path;identifierName;sourceLanguageText;text_enUS;text_deDE"
        })
        .returning(|_, _| Ok("Strings/¬¬a¬¬Hej¬¬Hi¬¬Hallo¬¬¯¯".to_string()));

    let table = export_project(&server, &credentials(), "Game").await.unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.value(0, "text_deDE"), Some("Hallo"));
    assert_eq!(table.value(0, "sourceLanguageText"), Some("Hej"));
}

#[tokio::test]
async fn test_export_of_malformed_payload_fails() {
    let mut server = logged_in_server();
    server.expect_project_languages().returning(|_, _| Ok(vec![]));
    server
        .expect_export_strings()
        .returning(|_, _| Ok("Strings/¬¬a¬¬¯¯".to_string()));

    let err = export_project(&server, &credentials(), "Game").await.unwrap_err();
    assert!(matches!(err, Error::MalformedPayload(_)), "got: {err:?}");
}

#[tokio::test]
async fn test_import_table_sends_ldc_without_creating_folders() {
    let table = Table::from_rows(
        FieldList::parse("path;identifierName;text_enUS"),
        vec![vec!["Strings/".into(), "str_1".into(), "Press Start".into()]],
    )
    .unwrap();

    let sent: Arc<Mutex<Vec<ImportRequest>>> = Arc::new(Mutex::new(Vec::new()));
    let sent_by_mock = sent.clone();
    let mut server = logged_in_server();
    server
        .expect_import_strings()
        .times(1)
        .returning(move |_, request| {
            sent_by_mock.lock().unwrap().push(request);
            Ok(())
        });

    let imported = import_table(&server, &credentials(), "Game", &table)
        .await
        .unwrap();

    assert_eq!(imported, 1);
    let sent = sent.lock().unwrap();
    assert_eq!(sent[0].payload, "Strings/¬¬str_1¬¬Press Start¬¬¯¯");
    assert_eq!(sent[0].fields.joined(), "path;identifierName;text_enUS");
    assert!(!sent[0].create_folders);
}

#[tokio::test]
async fn test_import_table_refuses_values_that_would_not_read_back() {
    let table = Table::from_rows(
        FieldList::parse("identifierName;text_enUS"),
        vec![vec!["str_1".into(), "Loading¬".into()]],
    )
    .unwrap();
    let mut server = MockStringServer::new();
    server.expect_login().times(0);
    server.expect_import_strings().times(0);

    let err = import_table(&server, &credentials(), "Game", &table)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MalformedPayload(_)), "got: {err:?}");
}

#[tokio::test]
async fn test_import_rejection_is_a_remote_error() {
    let table = Table::from_rows(
        FieldList::parse("identifierName"),
        vec![vec!["str_1".into()]],
    )
    .unwrap();
    let mut server = logged_in_server();
    server
        .expect_import_strings()
        .returning(|_, _| Err(Error::remote("Unknown field identifierName")));

    let err = import_table(&server, &credentials(), "Game", &table)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Remote(ref msg) if msg.contains("Unknown field")));
}

#[tokio::test]
async fn test_resubmit_sends_preserved_payload_unchanged() {
    let dir = tempdir().unwrap();
    let archive = FailureArchive::new(dir.path());
    let original = ImportRequest {
        project: "EnglishSource".into(),
        fields: FieldList::parse("folderPath;identifierName;sourceLanguageText"),
        payload: "Strings/¬¬btn_ok¬¬OK¬¬¯¯".into(),
        create_folders: true,
    };
    archive.preserve(&original).unwrap();

    let preserved: PreservedImport = archive.load().unwrap();
    let mut server = logged_in_server();
    let expected = original.clone();
    server
        .expect_import_strings()
        .times(1)
        .withf(move |_, request| *request == expected)
        .returning(|_, _| Ok(()));

    resubmit(&server, &credentials(), "EnglishSource", preserved)
        .await
        .unwrap();
}

#[test]
fn loading_an_empty_archive_fails() {
    let dir = tempdir().unwrap();
    let err = FailureArchive::new(dir.path()).load().unwrap_err();
    assert!(matches!(err, Error::Io(_)), "got: {err:?}");
}

#[test]
fn payload_is_not_left_behind_when_field_list_cannot_be_written() {
    let dir = tempdir().unwrap();
    let archive = FailureArchive::new(dir.path());
    std::fs::create_dir(archive.fields_path()).unwrap();

    let request = ImportRequest {
        project: "EnglishSource".into(),
        fields: FieldList::parse("folderPath;identifierName"),
        payload: "Strings/¬¬btn_ok¬¬¯¯".into(),
        create_folders: true,
    };
    let err = archive.preserve(&request).unwrap_err();

    assert!(matches!(err, Error::Io(_)), "got: {err:?}");
    assert!(!archive.payload_path().exists());
}
