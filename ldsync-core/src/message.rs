//! LocDirect API messages.
//!
//! Requests are `EXECUTION` documents holding one `TASK`. The server rejects documents with
//! blank lines in them, so everything is written without indentation. Text content is
//! XML-escaped by the writer; an LDC payload therefore arrives unchanged after the server
//! unescapes it.
//!
//! Responses carry `committed="true"` on the root element when the task succeeded and a
//! `MESSAGE` element with a diagnostic when it did not.

use std::collections::HashMap;

use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Reader, Writer,
};

use crate::contract::{
    Credentials, ExportRequest, ImportRequest, ProjectLanguage, SessionToken, STRING_MERGE_OPTION,
};
use crate::error::{Error, Result};

const CLIENT: &str = "API";
const VERSION: &str = "1.0";

pub fn login_message(credentials: &Credentials) -> Result<String> {
    let mut w = start_execution(None)?;
    start_task(&mut w, "Login")?;
    w.write_event(Event::Empty(object("Security")))?;
    start(&mut w, "WHERE")?;
    text_element(&mut w, "userName", &credentials.user)?;
    text_element(&mut w, "password", credentials.password())?;
    end(&mut w, "WHERE")?;
    finish(w)
}

pub fn string_export_message(session: &SessionToken, request: &ExportRequest) -> Result<String> {
    let mut w = start_execution(Some(session))?;
    start_task(&mut w, "StringExport")?;
    w.write_event(Event::Start(object("String")))?;
    text_element(&mut w, "exportFields", &request.fields.joined())?;
    end(&mut w, "OBJECT")?;
    start(&mut w, "WHERE")?;
    text_element(&mut w, "projectName", &request.project)?;
    text_element(&mut w, "folderPaths", &request.folder_paths)?;
    text_element(&mut w, "responseType", "ldc")?;
    end(&mut w, "WHERE")?;
    finish(w)
}

pub fn string_import_message(session: &SessionToken, request: &ImportRequest) -> Result<String> {
    let mut w = start_execution(Some(session))?;
    start_task(&mut w, "StringImport")?;
    w.write_event(Event::Start(object("String")))?;
    text_element(&mut w, "importFields", &request.fields.joined())?;
    text_element(&mut w, "fieldData", &request.payload)?;
    end(&mut w, "OBJECT")?;
    start(&mut w, "WHERE")?;
    text_element(&mut w, "stringMergeOption", &STRING_MERGE_OPTION.to_string())?;
    text_element(&mut w, "projectName", &request.project)?;
    if request.create_folders {
        text_element(&mut w, "createFolders", "true")?;
    }
    end(&mut w, "WHERE")?;
    finish(w)
}

pub fn project_languages_message(session: &SessionToken, project: &str) -> Result<String> {
    let mut w = start_execution(Some(session))?;
    start_task(&mut w, "GetProjectLanguages")?;
    w.write_event(Event::Empty(object("Language")))?;
    start(&mut w, "WHERE")?;
    text_element(&mut w, "projectName", project)?;
    end(&mut w, "WHERE")?;
    finish(w)
}

fn start_execution(session: Option<&SessionToken>) -> Result<Writer<Vec<u8>>> {
    let mut w = Writer::new(Vec::new());
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    let mut root = BytesStart::new("EXECUTION");
    if let Some(session) = session {
        root.push_attribute(("secId", session.as_str()));
    }
    root.push_attribute(("client", CLIENT));
    root.push_attribute(("version", VERSION));
    w.write_event(Event::Start(root))?;
    Ok(w)
}

fn start_task(w: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    let mut task = BytesStart::new("TASK");
    task.push_attribute(("name", name));
    w.write_event(Event::Start(task))?;
    Ok(())
}

fn object(name: &str) -> BytesStart<'_> {
    let mut object = BytesStart::new("OBJECT");
    object.push_attribute(("name", name));
    object
}

fn start(w: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    w.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn end(w: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn text_element(w: &mut Writer<Vec<u8>>, name: &str, value: &str) -> Result<()> {
    start(w, name)?;
    w.write_event(Event::Text(BytesText::new(value)))?;
    end(w, name)
}

fn finish(mut w: Writer<Vec<u8>>) -> Result<String> {
    end(&mut w, "TASK")?;
    end(&mut w, "EXECUTION")?;
    String::from_utf8(w.into_inner())
        .map_err(|e| Error::malformed(format!("request message is not UTF-8: {e}")))
}

/// What ldsync reads back from a LocDirect response document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub committed: bool,
    pub sec_id: Option<String>,
    pub message: Option<String>,
    /// Child elements of every `DATASET`, element name to text.
    pub datasets: Vec<HashMap<String, String>>,
}

impl Response {
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut response = Response::default();
        let mut depth = 0usize;
        let mut current: Option<String> = None;
        let mut dataset: Option<HashMap<String, String>> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    if depth == 0 {
                        response.committed = is_committed(&e)?;
                    }
                    depth += 1;
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    if name == "DATASET" {
                        dataset = Some(HashMap::new());
                    }
                    current = Some(name);
                }
                Event::Empty(e) if depth == 0 => {
                    response.committed = is_committed(&e)?;
                }
                Event::Text(t) => {
                    let text = t.unescape()?.into_owned();
                    match current.as_deref() {
                        Some("secId") => response.sec_id = Some(text),
                        Some("MESSAGE") => response.message = Some(text),
                        Some(name) => {
                            if let Some(row) = dataset.as_mut() {
                                row.insert(name.to_string(), text);
                            }
                        }
                        None => {}
                    }
                }
                Event::End(e) => {
                    depth = depth.saturating_sub(1);
                    if e.local_name().as_ref() == b"DATASET" {
                        if let Some(row) = dataset.take() {
                            response.datasets.push(row);
                        }
                    }
                    current = None;
                }
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(response)
    }

    /// The server's diagnostic, or a placeholder when the response carried none.
    pub fn diagnostic(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "server gave no diagnostic message".to_string())
    }

    /// Interprets `DATASET` rows of a `GetProjectLanguages` response.
    pub fn project_languages(&self) -> Result<Vec<ProjectLanguage>> {
        self.datasets
            .iter()
            .map(|row| {
                let field = |name: &str| {
                    row.get(name).ok_or_else(|| {
                        Error::malformed(format!("language dataset is missing `{name}`"))
                    })
                };
                Ok(ProjectLanguage {
                    code: format!("{}{}", field("languageCode")?, field("countryCode")?),
                    is_source: field("isSourceLanguage")? == "true",
                })
            })
            .collect()
    }
}

fn is_committed(element: &BytesStart<'_>) -> Result<bool> {
    for attribute in element.attributes().with_checks(false) {
        let attribute = attribute.map_err(|e| Error::malformed(e.to_string()))?;
        if attribute.key.as_ref() == b"committed" {
            return Ok(attribute.unescape_value()? == "true");
        }
    }
    Ok(false)
}
