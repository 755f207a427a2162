//! Preservation of rejected import payloads.
//!
//! When the destination rejects an import, the exact LDC payload and its field list are
//! written to a failure directory so the batch can be inspected or resubmitted without
//! re-running the export and reconciliation.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::contract::ImportRequest;
use crate::error::{Error, Result};
use crate::table::FieldList;

pub const PAYLOAD_FILE: &str = "failed-import.ldc";
pub const FIELDS_FILE: &str = "failed-import.fields";

/// A payload and field list read back from a failure directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreservedImport {
    pub fields: FieldList,
    pub payload: String,
}

impl PreservedImport {
    pub fn into_request(self, project: impl Into<String>, create_folders: bool) -> ImportRequest {
        ImportRequest {
            project: project.into(),
            fields: self.fields,
            payload: self.payload,
            create_folders,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FailureArchive {
    dir: PathBuf,
}

impl FailureArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FailureArchive { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn payload_path(&self) -> PathBuf {
        self.dir.join(PAYLOAD_FILE)
    }

    pub fn fields_path(&self) -> PathBuf {
        self.dir.join(FIELDS_FILE)
    }

    /// Writes the payload byte for byte and returns the payload file's path.
    pub fn preserve(&self, request: &ImportRequest) -> Result<PathBuf> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| {
                error!(error = ?e, path = %self.dir.display(), "[ARCHIVE] Failed to create failure directory");
                e
            })?;
        }
        // Fields first: a payload file on disk always has its field list next to it.
        fs::write(self.fields_path(), request.fields.joined())?;
        let payload_path = self.payload_path();
        fs::write(&payload_path, request.payload.as_bytes())?;
        info!(
            path = %payload_path.display(),
            bytes = request.payload.len(),
            "[ARCHIVE] Preserved rejected import payload"
        );
        Ok(payload_path)
    }

    pub fn load(&self) -> Result<PreservedImport> {
        let payload_path = self.payload_path();
        let payload = fs::read_to_string(&payload_path).map_err(|e| {
            error!(error = ?e, path = %payload_path.display(), "[ARCHIVE] No preserved payload");
            e
        })?;
        let fields = FieldList::parse(fs::read_to_string(self.fields_path())?.trim());
        if fields.is_empty() {
            return Err(Error::malformed(format!(
                "{} holds no field names",
                self.fields_path().display()
            )));
        }
        Ok(PreservedImport { fields, payload })
    }
}
