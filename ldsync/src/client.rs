#![doc = "HTTP client for the LocDirect API: implements the core `StringServer` contract over reqwest."]
//
//! # LocDirect client (CLI <-> Core)
//!
//! [`LocDirectClient`] posts the XML messages built by [`ldsync_core::message`] to one
//! LocDirect server address (for example `https://host:50700/api/v1`) and interprets the
//! responses. Every request is bounded by the configured timeout; a timeout or transport
//! failure is reported as [`Error::Remote`] and never retried.
//!
//! Export responses are the raw LDC blob on success. A response that is an XML document
//! instead is the server reporting an error, and its `MESSAGE` becomes the diagnostic.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use ldsync_core::contract::{
    Credentials, ExportRequest, ImportRequest, ProjectLanguage, SessionToken, StringServer,
};
use ldsync_core::message::{self, Response};
use ldsync_core::{Error, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub struct LocDirectClient {
    http: reqwest::Client,
    server: String,
}

impl LocDirectClient {
    pub fn new(server: impl Into<String>, timeout: Duration) -> Result<Self> {
        let server = server.into();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!(error = ?e, "Failed to build HTTP client");
                Error::remote(format!("could not build HTTP client: {e}"))
            })?;
        tracing::info!(server = %server, timeout_secs = timeout.as_secs(), "Initialized LocDirectClient");
        Ok(LocDirectClient { http, server })
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    async fn post(&self, message: String) -> Result<String> {
        let response = self
            .http
            .post(&self.server)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .body(message.into_bytes())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, server = %self.server, "Request to LocDirect failed");
                Error::remote(format!("request to {} failed: {e}", self.server))
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            tracing::error!(error = ?e, server = %self.server, "Failed to read response body");
            Error::remote(format!("could not read response from {}: {e}", self.server))
        })?;
        let text = String::from_utf8(body.to_vec())
            .map_err(|e| Error::remote(format!("response is not UTF-8: {e}")))?;

        if !status.is_success() {
            tracing::error!(status = %status, server = %self.server, "LocDirect returned HTTP error. Response body: {text}");
            return Err(Error::remote(format!("HTTP {status}: {text}")));
        }
        Ok(text)
    }
}

/// Reads the session token from a login reply.
pub fn login_reply(text: &str) -> Result<SessionToken> {
    let response = Response::parse(text)?;
    match (response.committed, response.sec_id.as_deref()) {
        (true, Some(sec_id)) => Ok(SessionToken::new(sec_id)),
        (true, None) => Err(Error::Authentication(
            "login committed but no secId was returned".to_string(),
        )),
        (false, _) => {
            tracing::error!(body = %text, "Login rejected");
            Err(Error::Authentication(response.diagnostic()))
        }
    }
}

/// An export reply is the LDC blob itself. An XML document in its place is an error report.
pub fn export_reply(text: String) -> Result<String> {
    if is_xml_document(&text) {
        let response = Response::parse(&text)?;
        tracing::error!(body = %text, "Export rejected");
        return Err(Error::remote(response.diagnostic()));
    }
    Ok(text)
}

/// Parses a reply whose task must have been committed.
pub fn committed_reply(text: &str) -> Result<Response> {
    let response = Response::parse(text)?;
    if response.committed {
        Ok(response)
    } else {
        tracing::error!(body = %text, "LocDirect did not commit the task");
        Err(Error::remote(response.diagnostic()))
    }
}

fn is_xml_document(body: &str) -> bool {
    let body = body.trim_start();
    body.starts_with("<?xml") || body.starts_with("<EXECUTION")
}

#[async_trait]
impl StringServer for LocDirectClient {
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken> {
        tracing::info!(user = %credentials.user, server = %self.server, "Logging in");
        let text = self.post(message::login_message(credentials)?).await?;
        let session = login_reply(&text)?;
        tracing::info!(user = %credentials.user, "Login succeeded");
        Ok(session)
    }

    async fn export_strings(&self, session: &SessionToken, request: ExportRequest) -> Result<String> {
        tracing::info!(project = %request.project, fields = %request.fields, "Exporting strings");
        let text = export_reply(
            self.post(message::string_export_message(session, &request)?)
                .await?,
        )?;
        tracing::info!(project = %request.project, bytes = text.len(), "Export received");
        Ok(text)
    }

    async fn import_strings(&self, session: &SessionToken, request: ImportRequest) -> Result<()> {
        tracing::info!(
            project = %request.project,
            fields = %request.fields,
            create_folders = request.create_folders,
            "Importing strings"
        );
        let text = self
            .post(message::string_import_message(session, &request)?)
            .await?;
        committed_reply(&text)?;
        tracing::info!(project = %request.project, "Import committed");
        Ok(())
    }

    async fn project_languages(
        &self,
        session: &SessionToken,
        project: &str,
    ) -> Result<Vec<ProjectLanguage>> {
        tracing::info!(project, "Fetching project languages");
        let response = self
            .post(message::project_languages_message(session, project)?)
            .await?;
        let languages = committed_reply(&response)?.project_languages()?;
        tracing::info!(project, count = languages.len(), "Fetched project languages");
        Ok(languages)
    }
}
