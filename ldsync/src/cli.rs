//! # ldsync CLI Interface (Module)
//!
//! Command parsing and orchestration for the `ldsync` binary. All business logic (codec,
//! reconciliation, pipelines) lives in `ldsync-core`; this module wires the parsed
//! arguments to [`LocDirectClient`] instances and the core pipelines.
//!
//! ## How To Use
//! - For command-line users: run the installed `ldsync` binary with `--help`.
//! - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
//!
//! ## Extending
//! When adding subcommands, update [`Commands`] and keep non-trivial logic in `ldsync-core`.
use crate::client::LocDirectClient;
use crate::load_config::{load_config, PASSWORD_ENV};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ldsync_core::archive::FailureArchive;
use ldsync_core::config::validate_field_list;
use ldsync_core::contract::Credentials;
use ldsync_core::formats::{read_csv, write_table, OutputFormat};
use ldsync_core::synchronise::{synchronise, SyncOutcome};
use ldsync_core::transfer::{export_project, import_table, resubmit};
use ldsync_core::{Error, FieldList};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI for ldsync: move string tables in and out of LocDirect projects.
#[derive(Parser)]
#[clap(
    name = "ldsync",
    version,
    about = "Export, import and synchronise LocDirect string tables"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

/// Server, project and login shared by the single-project commands.
#[derive(Args, Clone)]
pub struct Connection {
    /// User name
    #[clap(long, short = 'u')]
    pub user: String,
    /// Password
    #[clap(long, env = PASSWORD_ENV, hide_env_values = true)]
    pub password: String,
    /// Project name
    #[clap(long, short = 'p')]
    pub project: String,
    /// Server address, e.g. https://host:50700/api/v1
    #[clap(long, short = 's')]
    pub server: String,
    /// Request timeout in seconds
    #[clap(long, default_value_t = 60)]
    pub timeout_secs: u64,
}

impl Connection {
    fn credentials(&self) -> Credentials {
        Credentials::new(self.user.clone(), self.password.clone())
    }

    fn client(&self) -> Result<LocDirectClient> {
        LocDirectClient::new(self.server.clone(), Duration::from_secs(self.timeout_secs))
            .context("Failed to construct LocDirect client")
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Carry translated strings of one project into another project as its source text
    Sync {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Export path, identifier, source text and all target texts of a project
    Export {
        #[clap(flatten)]
        connection: Connection,
        /// csv or json
        #[clap(long, short = 'f', default_value = "csv")]
        format: String,
        /// Output file name
        #[clap(long, short = 'o')]
        output: PathBuf,
    },
    /// Import a header-less UTF-8 CSV file into a project
    Import {
        #[clap(flatten)]
        connection: Connection,
        /// CSV file name
        #[clap(long, short = 'i')]
        input: PathBuf,
        /// Comma separated fields for each column (e.g. path,identifierName,text_enUS)
        #[clap(long, short = 'f')]
        fields: String,
    },
    /// Send a payload preserved by a failed sync again
    Resubmit {
        #[clap(flatten)]
        connection: Connection,
        /// Directory holding failed-import.ldc and failed-import.fields
        #[clap(long, default_value = ".")]
        dir: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Sync { config } => {
            let config = load_config(config)?;
            tracing::info!(command = "sync", "Starting synchronisation process");
            let source = LocDirectClient::new(config.sync.from.server.clone(), config.timeout)?;
            let destination = LocDirectClient::new(config.sync.to.server.clone(), config.timeout)?;

            match synchronise(&config.sync, &config.credentials, &source, &destination).await {
                Ok(SyncOutcome::NothingToSynchronise { scanned }) => {
                    tracing::info!(command = "sync", scanned, "Nothing to synchronise");
                    println!("No strings to update ({scanned} scanned)");
                    Ok(())
                }
                Ok(SyncOutcome::Synchronised(report)) => {
                    tracing::info!(command = "sync", ?report, "Synchronisation complete");
                    println!("Updated {} of {} strings", report.imported, report.scanned);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "sync", error = %e, "Synchronisation failed");
                    Err(anyhow::Error::new(e).context("Synchronisation failed"))
                }
            }
        }
        Commands::Export {
            connection,
            format,
            output,
        } => {
            let format: OutputFormat = format.parse()?;
            let client = connection.client()?;
            let table = export_project(&client, &connection.credentials(), &connection.project)
                .await
                .context("Export failed")?;

            let file = File::create(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            write_table(&table, format, BufWriter::new(file))?;
            tracing::info!(command = "export", rows = table.len(), %format, output = %output.display(), "Export written");
            println!("File {} saved", output.display());
            Ok(())
        }
        Commands::Import {
            connection,
            input,
            fields,
        } => {
            let fields = FieldList::new(
                fields
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty()),
            );
            validate_field_list(&fields).context("Invalid --fields")?;
            let file = File::open(&input)
                .with_context(|| format!("Failed to open {}", input.display()))?;
            let table = read_csv(&fields, BufReader::new(file))
                .with_context(|| format!("Failed to read {}", input.display()))?;

            let client = connection.client()?;
            let imported =
                import_table(&client, &connection.credentials(), &connection.project, &table)
                    .await
                    .context("Import failed")?;
            tracing::info!(command = "import", imported, "Import complete");
            println!("{imported} strings imported");
            Ok(())
        }
        Commands::Resubmit { connection, dir } => {
            let preserved = FailureArchive::new(dir)
                .load()
                .context("Failed to load preserved payload")?;
            let client = connection.client()?;
            resubmit(&client, &connection.credentials(), &connection.project, preserved)
                .await
                .context("Resubmission failed")?;
            println!("Preserved payload imported");
            Ok(())
        }
    }
}

/// Tells the user how to resend a payload that a failed sync left on disk.
pub fn resubmit_hint(error: &anyhow::Error) -> Option<String> {
    match error.downcast_ref::<Error>()? {
        Error::ImportRejected {
            artifact: Some(path),
            ..
        } => {
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            Some(format!(
                "Rejected payload saved to {}. Fix the destination project, then run `ldsync resubmit --dir {}`.",
                path.display(),
                dir.display()
            ))
        }
        _ => None,
    }
}
