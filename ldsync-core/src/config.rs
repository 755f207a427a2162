use std::path::PathBuf;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::table::FieldList;

/// Status value LocDirect reports for a completed translation.
pub const DEFAULT_TRANSLATED_STATUS: &str = "3";

/// One project on one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEndpoint {
    pub server: String,
    pub project: String,
}

/// Everything a synchronisation run needs apart from credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Project whose translation becomes the source text downstream.
    pub from: ProjectEndpoint,
    /// Project receiving that text as its source language.
    pub to: ProjectEndpoint,
    /// Target language of `from` (e.g. `enUS`) that becomes the source language of `to`.
    pub language: String,
    /// Extra columns copied by name, such as `description` or custom fields.
    #[serde(default)]
    pub extra_fields: Vec<String>,
    #[serde(default = "default_translated_status")]
    pub translated_status: String,
    /// Where a rejected import payload is preserved.
    #[serde(default = "default_failure_dir")]
    pub failure_dir: PathBuf,
}

fn default_translated_status() -> String {
    DEFAULT_TRANSLATED_STATUS.to_string()
}

fn default_failure_dir() -> PathBuf {
    PathBuf::from(".")
}

impl SyncConfig {
    pub fn validate(&self) -> Result<()> {
        validate_language(&self.language)?;
        for field in &self.extra_fields {
            validate_field_name(field)?;
        }
        for endpoint in [&self.from, &self.to] {
            if endpoint.server.trim().is_empty() || endpoint.project.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "server and project must not be empty".to_string(),
                ));
            }
        }
        if self.translated_status.is_empty() {
            return Err(Error::InvalidConfig(
                "translated_status must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn trace_loaded(&self) {
        info!(
            from_server = %self.from.server,
            from_project = %self.from.project,
            to_server = %self.to.server,
            to_project = %self.to.project,
            language = %self.language,
            extra_fields = self.extra_fields.len(),
            "Loaded SyncConfig"
        );
        debug!(?self, "SyncConfig loaded (full debug)");
    }
}

/// Language codes are a language code followed by a country or script code, e.g. `enUS`.
pub fn validate_language(language: &str) -> Result<()> {
    let pattern = Regex::new(r"^[A-Za-z]{2,3}[A-Za-z0-9]{0,4}$").map_err(invalid_pattern)?;
    if pattern.is_match(language) {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "`{language}` is not a language code such as enUS"
        )))
    }
}

/// Field names travel semicolon-joined, so they may not contain `;` or whitespace.
pub fn validate_field_name(field: &str) -> Result<()> {
    let pattern = Regex::new(r"^[^;\s]+$").map_err(invalid_pattern)?;
    if pattern.is_match(field) {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!("`{field}` is not a valid field name")))
    }
}

/// Checks a user supplied field list before it is joined into `importFields`.
pub fn validate_field_list(fields: &FieldList) -> Result<()> {
    if fields.is_empty() {
        return Err(Error::InvalidConfig("no field names given".to_string()));
    }
    for field in fields.iter() {
        validate_field_name(field)?;
    }
    fields.ensure_unique()
}

fn invalid_pattern(e: regex::Error) -> Error {
    Error::InvalidConfig(format!("invalid validation pattern: {e}"))
}
