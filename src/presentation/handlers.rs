// Command handlers
use crate::domain::chart::ChartSync;
use crate::presentation::app_state::AppState;
use std::path::Path;

pub fn generate(
    state: &AppState,
    out: &Path,
    manifest: Option<&Path>,
    prometheus_url: &str,
) -> anyhow::Result<()> {
    let written = state.dashboard_service.generate(out)?;
    if let Some(manifest) = manifest {
        state.dashboard_service.write_manifest(manifest, prometheus_url)?;
    }
    tracing::info!(count = written.len(), out = %out.display(), "Dashboards generated");
    Ok(())
}

pub fn sync(state: &AppState, charts: &[ChartSync]) -> anyhow::Result<()> {
    if charts.is_empty() {
        tracing::warn!("No charts configured, nothing to sync");
        return Ok(());
    }
    let written = state.sync_service.run(charts)?;
    tracing::info!(count = written.len(), "Charts synced");
    Ok(())
}

/// Print one `file  title` line per catalog dashboard.
pub fn list(state: &AppState) {
    for asset in state.dashboard_service.catalog() {
        println!("{:<50} {}", asset.file_name, asset.dashboard.title);
    }
}
