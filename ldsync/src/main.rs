use anyhow::Result;
use clap::Parser;
use ldsync::cli::{resubmit_hint, run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // LOCDIRECT_PASSWORD may come from .env
    dotenvy::dotenv().ok();

    // stdout is reserved for command results
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let result = run(cli).await;
    match &result {
        Ok(()) => tracing::info!("ldsync finished"),
        Err(e) => {
            tracing::error!(error = %e, "ldsync failed");
            if let Some(hint) = resubmit_hint(e) {
                eprintln!("{hint}");
            }
        }
    }
    result
}
