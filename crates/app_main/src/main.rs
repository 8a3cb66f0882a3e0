//! Folio - portfolio preference and cache core
//!
//! Command-line entry point.

mod app;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Folio preference and cache tool
#[derive(Parser, Debug)]
#[command(name = "folio", version)]
#[command(about = "Inspect and change portfolio preferences")]
pub struct Cli {
    /// Switch the interface language (en, zh, zh-TW)
    #[arg(long)]
    pub lang: Option<String>,

    /// Switch the theme (theme-light, theme-dark, theme-warm)
    #[arg(long)]
    pub theme: Option<String>,

    /// Toggle between the dark and light themes
    #[arg(long)]
    pub toggle_dark: bool,

    /// Mount the portfolio view and print loading flags until they settle
    #[arg(long)]
    pub simulate_loading: bool,

    /// Directory of the preference database
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // An explicit --config must load; the default file falls back to defaults
    let config_path = app_core::AppConfig::config_path();
    let (mut config, config_error) = match &cli.config {
        Some(path) => (app_core::AppConfig::load_from(path)?, None),
        None => app_core::AppConfig::load_or_default(&config_path),
    };
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = Some(dir.clone());
    }

    // Initialize logging and panic hook first
    let log_options = config.logging.log_options();
    let _guard = app_log::init(&log_options)?;

    if let Err(e) = app_log::cleanup_old_logs(&log_options.log_dir, config.logging.retain_days) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    tracing::info!("Folio starting...");

    if let Some(e) = config_error {
        tracing::warn!(
            path = %config_path.display(),
            "Ignoring unreadable configuration, using defaults: {}",
            e
        );
    }

    app::run(cli, config).await
}
