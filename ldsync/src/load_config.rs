//! `load_config` module: loads a static YAML config and injects the password from the
//! environment, producing the explicit configuration value a synchronisation run takes.
//!
//! # Responsibilities
//! - Parse the user-supplied YAML into type-safe structs
//! - Read the password from `LOCDIRECT_PASSWORD` (optionally via `.env`); it is never read
//!   from the YAML file
//! - Validate the result so a bad language code or field name fails before any network call
//!
//! # Errors
//! All errors use `anyhow::Error` for context-rich diagnostics and are surfaced at the CLI
//! boundary.
//!
//! Example file:
//!
//! ```yaml
//! user: api-user
//! timeout_secs: 60
//! sync:
//!   from: { server: "https://ld.example.com:50700/api/v1", project: SwedishSource }
//!   to: { server: "https://ld.example.com:50700/api/v1", project: EnglishSource }
//!   language: enUS
//!   extra_fields: [description]
//!   failure_dir: ./failed
//! ```
use anyhow::Result;
use ldsync_core::config::SyncConfig;
use ldsync_core::contract::Credentials;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

use crate::client::DEFAULT_TIMEOUT;

pub const PASSWORD_ENV: &str = "LOCDIRECT_PASSWORD";

#[derive(Debug)]
pub struct CliConfig {
    pub credentials: Credentials,
    pub timeout: Duration,
    pub sync: SyncConfig,
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    #[derive(Debug, Deserialize)]
    struct RawConfig {
        user: String,
        #[serde(default)]
        timeout_secs: Option<u64>,
        sync: SyncConfig,
    }

    let raw: RawConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if let Err(e) = raw.sync.validate() {
        error!(error = %e, "Config failed validation");
        return Err(anyhow::anyhow!("Invalid sync section: {e}"));
    }
    raw.sync.trace_loaded();

    let password = password_from_env()?;

    Ok(CliConfig {
        credentials: Credentials::new(raw.user, password),
        timeout: raw
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT),
        sync: raw.sync,
    })
}

pub fn password_from_env() -> Result<String> {
    match std::env::var(PASSWORD_ENV) {
        Ok(password) => {
            info!("{PASSWORD_ENV} found in env");
            Ok(password)
        }
        Err(e) => {
            error!(error = ?e, "{PASSWORD_ENV} environment variable not set");
            Err(anyhow::anyhow!(
                "{PASSWORD_ENV} environment variable not set: {e}"
            ))
        }
    }
}
