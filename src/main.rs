// Main entry point - Dependency injection and command dispatch
mod application;
mod dashboards;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::load_sync_config;
use crate::presentation::app_state::AppState;
use crate::presentation::cli::{Cli, Command};
use crate::presentation::handlers;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Command::Generate {
            out,
            manifest,
            prometheus_url,
        } => {
            let state = AppState::new(cli.root.unwrap_or_else(|| PathBuf::from(".")));
            handlers::generate(&state, &out, manifest.as_deref(), &prometheus_url)
        }
        Command::Sync { config } => {
            // Load configuration
            let sync_config = load_sync_config(&config)
                .with_context(|| format!("failed to load sync configuration {}", config))?;
            let charts = sync_config.chart_syncs()?;

            let root = cli
                .root
                .or_else(|| sync_config.root.map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("."));
            tracing::debug!(root = %root.display(), charts = charts.len(), "Sync configuration loaded");

            let state = AppState::new(root);
            handlers::sync(&state, &charts)
        }
        Command::List => {
            let state = AppState::new(PathBuf::from("."));
            handlers::list(&state);
            Ok(())
        }
    }
}
