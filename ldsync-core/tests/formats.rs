use std::str::FromStr;

use ldsync_core::formats::{read_csv, write_csv, write_json, write_table, OutputFormat};
use ldsync_core::{Error, FieldList, Table};

fn table() -> Table {
    Table::from_rows(
        FieldList::parse("path;identifierName;sourceLanguageText;text_enUS"),
        vec![
            vec![
                "Strings/".into(),
                "greeting".into(),
                "Hej".into(),
                "\"Hello\", he said".into(),
            ],
            vec!["Strings/".into(), "bye".into(), "Hej då".into(), "Bye".into()],
        ],
    )
    .unwrap()
}

#[test]
fn csv_quotes_every_value_without_header() {
    let mut out = Vec::new();
    write_csv(&table(), &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text,
        "\"Strings/\",\"greeting\",\"Hej\",\"\"\"Hello\"\", he said\"\n\
         \"Strings/\",\"bye\",\"Hej då\",\"Bye\"\n"
    );
}

#[test]
fn json_objects_keep_field_order_and_unicode() {
    let mut out = Vec::new();
    write_json(&table(), &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with(
        r#"[{"path":"Strings/","identifierName":"greeting","sourceLanguageText":"Hej","text_enUS":"\"Hello\", he said"}"#
    ));
    assert!(text.contains("Hej då"));

    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(2));
}

#[test]
fn csv_written_by_export_reads_back_for_import() {
    let original = table();
    let mut out = Vec::new();
    write_table(&original, OutputFormat::Csv, &mut out).unwrap();

    let read = read_csv(original.fields(), out.as_slice()).unwrap();
    assert_eq!(read, original);
}

#[test]
fn csv_row_with_wrong_column_count_is_rejected() {
    let fields = FieldList::parse("path;identifierName;text_enUS");
    let input = "\"Strings/\",\"a\",\"A\"\n\"Strings/\",\"b\"\n";

    let err = read_csv(&fields, input.as_bytes()).unwrap_err();
    assert!(
        matches!(
            err,
            Error::ColumnMismatch {
                line: 2,
                expected: 3,
                found: 2
            }
        ),
        "got: {err:?}"
    );
}

#[test]
fn output_format_accepts_only_csv_and_json() {
    assert_eq!(OutputFormat::from_str("csv").unwrap(), OutputFormat::Csv);
    assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
    assert!(matches!(
        OutputFormat::from_str("xlsx"),
        Err(Error::InvalidConfig(_))
    ));
}
