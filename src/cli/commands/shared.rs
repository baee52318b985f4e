//! Shared components for CLI commands
//!
//! Logging setup and configuration/folder resolution used by both the
//! score and check commands.

use crate::config::AppConfig;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Resolved run inputs: the persisted configuration plus effective folders
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: AppConfig,
    pub settings_dir: PathBuf,
    pub race_dir: PathBuf,
}

/// Set up structured logging to stderr
pub fn setup_logging(log_level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rally_scorer={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load the persisted configuration and apply command-line folder overrides
pub fn resolve_context(
    config_file: &Path,
    settings_dir: Option<&Path>,
    race_dir: Option<&Path>,
) -> Result<RunContext> {
    let config = AppConfig::load(config_file)?;
    info!("Configuration loaded from {}", config_file.display());

    let settings_dir = settings_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.settings_folder.clone());
    let race_dir = race_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.race_folder.clone());

    debug!(
        "Using settings folder '{}' and race folder '{}'",
        settings_dir.display(),
        race_dir.display()
    );

    Ok(RunContext {
        config,
        settings_dir,
        race_dir,
    })
}
