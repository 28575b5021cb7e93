// Command-line interface
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::application::dashboard_service::DEFAULT_PROMETHEUS_URL;

/// Generate Grafana dashboards and sync Prometheus assets into Helm charts
#[derive(Parser, Debug)]
#[command(name = "kube-assets", version)]
pub struct Cli {
    /// Directory that relative paths resolve against (overrides the config `root`)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Enable debug logging unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Render every dashboard to JSON, optionally with the dashboards ConfigMap
    Generate {
        /// Output directory for dashboard JSON files
        #[arg(short, long, default_value = "dashboards")]
        out: PathBuf,

        /// Also write the grafana-dashboards ConfigMap to this path
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// URL of the Prometheus datasource in the ConfigMap
        #[arg(long, default_value = DEFAULT_PROMETHEUS_URL)]
        prometheus_url: String,
    },
    /// Copy rule files and the dashboards manifest into Helm charts
    Sync {
        /// Sync configuration file, extension optional
        #[arg(short, long, default_value = "config/sync")]
        config: String,
    },
    /// List the dashboards in the catalog
    List,
}
