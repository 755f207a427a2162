use ldsync_core::contract::{Credentials, ExportRequest, ImportRequest, ProjectLanguage, SessionToken};
use ldsync_core::message::{
    login_message, project_languages_message, string_export_message, string_import_message,
    Response,
};
use ldsync_core::FieldList;

#[test]
fn login_message_has_no_session_and_no_blank_lines() {
    let xml = login_message(&Credentials::new("translator", "p<ss")).unwrap();

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<EXECUTION client=\"API\" version=\"1.0\">"));
    assert!(xml.contains("<TASK name=\"Login\"><OBJECT name=\"Security\"/>"));
    assert!(xml.contains("<userName>translator</userName>"));
    assert!(xml.contains("<password>p&lt;ss</password>"));
    assert!(!xml.contains("secId"));
    assert!(!xml.contains("\n\n"));
}

#[test]
fn export_message_requests_ldc_for_the_strings_folder() {
    let request = ExportRequest::new(
        "SwedishSource",
        FieldList::parse("path;identifierName;text_enUS;status_enUS"),
    );
    let xml = string_export_message(&SessionToken::new("42"), &request).unwrap();

    assert!(xml.contains("<EXECUTION secId=\"42\" client=\"API\" version=\"1.0\">"));
    assert!(xml.contains("<TASK name=\"StringExport\">"));
    assert!(xml.contains(
        "<exportFields>path;identifierName;text_enUS;status_enUS</exportFields>"
    ));
    assert!(xml.contains("<projectName>SwedishSource</projectName>"));
    assert!(xml.contains("<folderPaths>Strings/</folderPaths>"));
    assert!(xml.contains("<responseType>ldc</responseType>"));
}

#[test]
fn import_message_escapes_payload_and_sets_merge_option() {
    let request = ImportRequest {
        project: "EnglishSource".into(),
        fields: FieldList::parse("folderPath;identifierName;sourceLanguageText"),
        payload: "Strings/¬¬a&b¬¬<OK>¬¬¯¯".into(),
        create_folders: true,
    };
    let xml = string_import_message(&SessionToken::new("7"), &request).unwrap();

    assert!(xml.contains("<importFields>folderPath;identifierName;sourceLanguageText</importFields>"));
    assert!(xml.contains("<fieldData>Strings/¬¬a&amp;b¬¬&lt;OK&gt;¬¬¯¯</fieldData>"));
    assert!(xml.contains("<stringMergeOption>3</stringMergeOption>"));
    assert!(xml.contains("<createFolders>true</createFolders>"));

    let plain = ImportRequest {
        create_folders: false,
        ..request
    };
    let xml = string_import_message(&SessionToken::new("7"), &plain).unwrap();
    assert!(!xml.contains("createFolders"));
}

#[test]
fn project_languages_message_names_the_project() {
    let xml = project_languages_message(&SessionToken::new("9"), "Game").unwrap();
    assert!(xml.contains("<TASK name=\"GetProjectLanguages\"><OBJECT name=\"Language\"/>"));
    assert!(xml.contains("<projectName>Game</projectName>"));
}

#[test]
fn committed_login_response_yields_sec_id() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<EXECUTION client="API" version="1.0" committed="true">
  <TASK name="Login">
    <DATASET><secId>ABC-123</secId></DATASET>
  </TASK>
</EXECUTION>"#;

    let response = Response::parse(xml).unwrap();
    assert!(response.committed);
    assert_eq!(response.sec_id.as_deref(), Some("ABC-123"));
    assert_eq!(response.message, None);
}

#[test]
fn rejected_response_carries_the_message() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<EXECUTION client="API" version="1.0" committed="false">
  <MESSAGE>Login failed for user &apos;translator&apos;</MESSAGE>
</EXECUTION>"#;

    let response = Response::parse(xml).unwrap();
    assert!(!response.committed);
    assert_eq!(response.diagnostic(), "Login failed for user 'translator'");
}

#[test]
fn language_datasets_become_project_languages() {
    let xml = r#"<EXECUTION committed="true">
  <TASK name="GetProjectLanguages">
    <DATASET><languageCode>sv</languageCode><countryCode>SE</countryCode><isSourceLanguage>true</isSourceLanguage></DATASET>
    <DATASET><languageCode>en</languageCode><countryCode>US</countryCode><isSourceLanguage>false</isSourceLanguage></DATASET>
    <DATASET><languageCode>fr</languageCode><countryCode>FR</countryCode><isSourceLanguage>false</isSourceLanguage></DATASET>
  </TASK>
</EXECUTION>"#;

    let languages = Response::parse(xml).unwrap().project_languages().unwrap();
    assert_eq!(
        languages,
        vec![
            ProjectLanguage { code: "svSE".into(), is_source: true },
            ProjectLanguage { code: "enUS".into(), is_source: false },
            ProjectLanguage { code: "frFR".into(), is_source: false },
        ]
    );
    assert_eq!(languages[1].text_field(), "text_enUS");
}

#[test]
fn incomplete_language_dataset_is_malformed() {
    let xml = r#"<EXECUTION committed="true"><DATASET><languageCode>en</languageCode></DATASET></EXECUTION>"#;
    let result = Response::parse(xml).unwrap().project_languages();
    assert!(matches!(result, Err(ldsync_core::Error::MalformedPayload(_))));
}
