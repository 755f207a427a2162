//! High-level pipeline: carries a translation of one project into another project as its
//! source language.
//!
//! A run performs, strictly in sequence:
//!   - login and `StringExport` on the source server
//!   - LDC decode of the export and reconciliation (status filter + column rename)
//!   - login and `StringImport` on the destination server, only when something matched
//!
//! # Major Types
//! - [`SyncOutcome`]: either a [`SyncReport`] of what was imported, or a no-op when nothing
//!   carried the translated status
//!
//! # Error Handling
//! - A malformed export aborts before the destination is contacted.
//! - A rejected import is never retried. The exact outgoing payload is preserved through
//!   [`FailureArchive`] first, then [`Error::ImportRejected`] is returned.
//!
//! # Navigation
//! - Main entrypoint: [`synchronise`]

use tracing::{error, info};

use crate::archive::FailureArchive;
use crate::config::SyncConfig;
use crate::contract::{Credentials, ExportRequest, ImportRequest, StringServer};
use crate::error::{Error, Result};
use crate::ldc::{Ldc, RecordCodec};
use crate::reconcile::{Reconciler, Reconciliation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Rows received from the source project.
    pub scanned: usize,
    /// Rows sent to the destination project.
    pub imported: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The source had no strings, or none carried the translated status.
    NothingToSynchronise { scanned: usize },
    Synchronised(SyncReport),
}

pub async fn synchronise<S, D>(
    config: &SyncConfig,
    credentials: &Credentials,
    source: &S,
    destination: &D,
) -> Result<SyncOutcome>
where
    S: StringServer + ?Sized,
    D: StringServer + ?Sized,
{
    synchronise_with_codec(config, credentials, source, destination, &Ldc).await
}

pub async fn synchronise_with_codec<S, D, C>(
    config: &SyncConfig,
    credentials: &Credentials,
    source: &S,
    destination: &D,
    codec: &C,
) -> Result<SyncOutcome>
where
    S: StringServer + ?Sized,
    D: StringServer + ?Sized,
    C: RecordCodec + Sync,
{
    config.validate()?;
    let reconciler = Reconciler::from_config(config)?;
    info!(
        from_project = %config.from.project,
        to_project = %config.to.project,
        language = %config.language,
        "[SYNC] Starting synchronisation"
    );

    // --- Step 1: Export from the source project ---
    info!(user = %credentials.user, server = %config.from.server, "[SYNC] Logging in on source server");
    let session = source.login(credentials).await.map_err(|e| {
        error!(error = %e, "[SYNC][ERROR] Login on source server failed");
        e
    })?;

    let export_fields = reconciler.export_fields();
    info!(fields = %export_fields, "[SYNC][EXPORT] Requesting fields");
    let blob = source
        .export_strings(
            &session,
            ExportRequest::new(config.from.project.clone(), export_fields.clone()),
        )
        .await
        .map_err(|e| {
            error!(error = %e, "[SYNC][ERROR][EXPORT] Export failed");
            e
        })?;

    if blob.is_empty() {
        info!("[SYNC] No strings in source project");
        return Ok(SyncOutcome::NothingToSynchronise { scanned: 0 });
    }

    // --- Step 2: Decode and reconcile ---
    let export = codec.decode_table(&export_fields, &blob).map_err(|e| {
        error!(error = %e, "[SYNC][ERROR] Export payload is malformed");
        e
    })?;
    let batch = match reconciler.filter_and_map(&export)? {
        Reconciliation::NothingToSynchronise { scanned } => {
            info!(scanned, "[SYNC] No strings to update");
            return Ok(SyncOutcome::NothingToSynchronise { scanned });
        }
        Reconciliation::Ready(batch) => batch,
    };

    let payload = codec.try_encode(&batch.table).map_err(|e| {
        error!(error = %e, "[SYNC][ERROR] Batch cannot be encoded for import");
        e
    })?;

    // --- Step 3: Import into the destination project ---
    info!(user = %credentials.user, server = %config.to.server, "[SYNC] Logging in on destination server");
    let session = destination.login(credentials).await.map_err(|e| {
        error!(error = %e, "[SYNC][ERROR] Login on destination server failed");
        e
    })?;

    let request = ImportRequest {
        project: config.to.project.clone(),
        fields: batch.table.fields().clone(),
        payload,
        create_folders: true,
    };
    info!(count = batch.accepted(), "[SYNC][IMPORT] Updating strings");

    match destination.import_strings(&session, request.clone()).await {
        Ok(()) => {
            info!(imported = batch.accepted(), "[SYNC][IMPORT] Strings imported");
            Ok(SyncOutcome::Synchronised(SyncReport {
                scanned: batch.scanned,
                imported: batch.accepted(),
            }))
        }
        Err(e) => {
            error!(error = %e, "[SYNC][ERROR][IMPORT] Import rejected");
            let archive = FailureArchive::new(&config.failure_dir);
            let artifact = match archive.preserve(&request) {
                Ok(path) => Some(path),
                Err(io) => {
                    error!(error = %io, dir = %archive.dir().display(), "[SYNC][ERROR] Could not preserve rejected payload");
                    None
                }
            };
            Err(Error::ImportRejected {
                message: e.to_string(),
                artifact,
            })
        }
    }
}
