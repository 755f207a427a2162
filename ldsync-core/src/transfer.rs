//! Single-project transfers: export a project's string table, import a table into a project,
//! and resubmit a preserved payload.

use tracing::{error, info};

use crate::archive::PreservedImport;
use crate::contract::{Credentials, ExportRequest, ImportRequest, StringServer};
use crate::error::Result;
use crate::ldc::{Ldc, RecordCodec};
use crate::table::{FieldList, Table};

/// Columns that precede the per-language text columns of a plain export.
pub const EXPORT_BASE_FIELDS: [&str; 3] = ["path", "identifierName", "sourceLanguageText"];

/// Exports path, identifier, source text and the text of every target language.
pub async fn export_project<S>(server: &S, credentials: &Credentials, project: &str) -> Result<Table>
where
    S: StringServer + ?Sized,
{
    info!(user = %credentials.user, "[EXPORT] Logging in");
    let session = server.login(credentials).await?;

    let languages = server.project_languages(&session, project).await?;
    let fields = FieldList::new(
        EXPORT_BASE_FIELDS
            .iter()
            .map(|name| name.to_string())
            .chain(
                languages
                    .iter()
                    .filter(|language| !language.is_source)
                    .map(|language| language.text_field()),
            ),
    );
    info!(fields = %fields, "[EXPORT] Reading fields");

    let blob = server
        .export_strings(&session, ExportRequest::new(project, fields.clone()))
        .await?;
    let table = Ldc.decode_table(&fields, &blob).map_err(|e| {
        error!(error = %e, "[EXPORT][ERROR] Export payload is malformed");
        e
    })?;
    info!(rows = table.len(), "[EXPORT] Export decoded");
    Ok(table)
}

/// Imports every row of `table`, without creating missing folders.
pub async fn import_table<S>(
    server: &S,
    credentials: &Credentials,
    project: &str,
    table: &Table,
) -> Result<usize>
where
    S: StringServer + ?Sized,
{
    let request = ImportRequest {
        project: project.to_string(),
        fields: table.fields().clone(),
        payload: Ldc.try_encode(table)?,
        create_folders: false,
    };
    send_import(server, credentials, request).await?;
    Ok(table.len())
}

/// Sends a payload preserved by a failed synchronisation again, unchanged.
pub async fn resubmit<S>(
    server: &S,
    credentials: &Credentials,
    project: &str,
    preserved: PreservedImport,
) -> Result<()>
where
    S: StringServer + ?Sized,
{
    send_import(server, credentials, preserved.into_request(project, true)).await
}

async fn send_import<S>(server: &S, credentials: &Credentials, request: ImportRequest) -> Result<()>
where
    S: StringServer + ?Sized,
{
    info!(user = %credentials.user, "[IMPORT] Logging in");
    let session = server.login(credentials).await?;

    info!(
        project = %request.project,
        fields = %request.fields,
        bytes = request.payload.len(),
        "[IMPORT] Sending data to server"
    );
    server.import_strings(&session, request).await.map_err(|e| {
        error!(error = %e, "[IMPORT][ERROR] Import rejected");
        e
    })?;
    info!("[IMPORT] Strings imported");
    Ok(())
}
