//! Reconciler: turns an export of the source project into an import for the downstream
//! project.
//!
//! The source export has the schema `path;identifierName;text_<lang>;status_<lang>;<extras>`.
//! Rows whose `status_<lang>` equals the translated sentinel are renamed into the destination
//! schema `folderPath;identifierName;sourceLanguageText;<extras>`; every other row is dropped.
//!
//! Column renames are declared once in [`RENAMES`]; source columns are resolved to positions
//! a single time per table, so a misspelt or missing column fails the whole batch instead of
//! silently producing empty values.

use tracing::{debug, info};

use crate::config::{validate_field_name, validate_language, SyncConfig};
use crate::error::{Error, Result};
use crate::table::{FieldList, Record, Table};

/// Columns the reconciler knows by role. Language-dependent names are derived from the
/// configured language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Path,
    FolderPath,
    IdentifierName,
    LanguageText,
    LanguageStatus,
    SourceLanguageText,
}

impl Column {
    pub fn name(self, language: &str) -> String {
        match self {
            Column::Path => "path".to_string(),
            Column::FolderPath => "folderPath".to_string(),
            Column::IdentifierName => "identifierName".to_string(),
            Column::LanguageText => format!("text_{language}"),
            Column::LanguageStatus => format!("status_{language}"),
            Column::SourceLanguageText => "sourceLanguageText".to_string(),
        }
    }
}

/// `(source column, destination column)` pairs, in destination order.
pub const RENAMES: [(Column, Column); 3] = [
    (Column::Path, Column::FolderPath),
    (Column::IdentifierName, Column::IdentifierName),
    (Column::LanguageText, Column::SourceLanguageText),
];

/// Rows ready for import into the destination project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub table: Table,
    pub scanned: usize,
}

impl Batch {
    pub fn accepted(&self) -> usize {
        self.table.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// No row carried the translated status; nothing must be sent.
    NothingToSynchronise { scanned: usize },
    Ready(Batch),
}

#[derive(Debug, Clone)]
pub struct Reconciler {
    language: String,
    extra_fields: Vec<String>,
    translated_status: String,
}

impl Reconciler {
    pub fn new(
        language: impl Into<String>,
        extra_fields: Vec<String>,
        translated_status: impl Into<String>,
    ) -> Result<Self> {
        let language = language.into();
        validate_language(&language)?;
        for field in &extra_fields {
            validate_field_name(field)?;
        }
        let reconciler = Reconciler {
            language,
            extra_fields,
            translated_status: translated_status.into(),
        };
        reconciler.export_fields().ensure_unique()?;
        reconciler.import_fields().ensure_unique()?;
        Ok(reconciler)
    }

    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        Reconciler::new(
            config.language.clone(),
            config.extra_fields.clone(),
            config.translated_status.clone(),
        )
    }

    /// Field list to request from the source project.
    pub fn export_fields(&self) -> FieldList {
        FieldList::new(
            [
                Column::Path,
                Column::IdentifierName,
                Column::LanguageText,
                Column::LanguageStatus,
            ]
            .into_iter()
            .map(|column| column.name(&self.language))
            .chain(self.extra_fields.iter().cloned()),
        )
    }

    /// Field list of the produced batch.
    pub fn import_fields(&self) -> FieldList {
        FieldList::new(
            RENAMES
                .iter()
                .map(|(_, destination)| destination.name(&self.language))
                .chain(self.extra_fields.iter().cloned()),
        )
    }

    pub fn filter_and_map(&self, export: &Table) -> Result<Reconciliation> {
        let fields = export.fields();
        fields.ensure_unique()?;

        let status_column = self.resolve(fields, &Column::LanguageStatus.name(&self.language))?;
        let source_columns = RENAMES
            .iter()
            .map(|(source, _)| source.name(&self.language))
            .chain(self.extra_fields.iter().cloned())
            .map(|name| self.resolve(fields, &name))
            .collect::<Result<Vec<usize>>>()?;

        let mut batch = Table::new(self.import_fields());
        for record in export.rows() {
            if record[status_column] != self.translated_status {
                continue;
            }
            let mapped: Record = source_columns
                .iter()
                .map(|&column| record[column].clone())
                .collect();
            batch.push(mapped)?;
        }

        let scanned = export.len();
        debug!(
            scanned,
            accepted = batch.len(),
            status = %self.translated_status,
            "[RECONCILE] Filtered export by translated status"
        );

        if batch.is_empty() {
            info!(scanned, "[RECONCILE] No translated strings to synchronise");
            return Ok(Reconciliation::NothingToSynchronise { scanned });
        }
        info!(scanned, accepted = batch.len(), "[RECONCILE] Batch ready");
        Ok(Reconciliation::Ready(Batch {
            table: batch,
            scanned,
        }))
    }

    fn resolve(&self, fields: &FieldList, name: &str) -> Result<usize> {
        fields.position(name).ok_or_else(|| {
            Error::malformed(format!(
                "export is missing expected column `{name}` (fields: {fields})"
            ))
        })
    }
}
