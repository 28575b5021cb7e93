// Dashboard service - Use case for rendering the dashboard catalog
use crate::application::asset_store::AssetStore;
use crate::domain::dashboard::{Dashboard, DashboardAsset};
use crate::infrastructure::manifest::{datasource_definition, import_envelope, ConfigMap};
use crate::domain::chart::DATASOURCE_KEY;
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DASHBOARDS_CONFIG_MAP: &str = "grafana-dashboards";
pub const DEFAULT_PROMETHEUS_URL: &str = "http://prometheus-k8s.monitoring.svc:9090";

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn AssetStore>,
    catalog: Vec<DashboardAsset>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn AssetStore>, catalog: Vec<DashboardAsset>) -> Self {
        Self { store, catalog }
    }

    pub fn catalog(&self) -> &[DashboardAsset] {
        &self.catalog
    }

    /// Validate a dashboard and render it as pretty-printed JSON.
    pub fn render_dashboard(&self, dashboard: &Dashboard) -> anyhow::Result<String> {
        dashboard.validate()?;
        let mut json = serde_json::to_string_pretty(dashboard)
            .with_context(|| format!("failed to serialize dashboard {:?}", dashboard.title))?;
        json.push('\n');
        Ok(json)
    }

    /// Write every catalog dashboard into `out_dir`, returning the written paths.
    pub fn generate(&self, out_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        self.store
            .create_dir_all(out_dir)
            .with_context(|| format!("failed to create {}", out_dir.display()))?;

        let mut written = Vec::with_capacity(self.catalog.len());
        for asset in &self.catalog {
            let json = self
                .render_dashboard(&asset.dashboard)
                .with_context(|| format!("failed to render {}", asset.file_name))?;
            let path = out_dir.join(&asset.file_name);
            self.store.write(&path, &json)?;
            tracing::info!(dashboard = %asset.dashboard.title, path = %path.display(), "Dashboard written");
            written.push(path);
        }

        Ok(written)
    }

    /// Render the `grafana-dashboards` ConfigMap holding every dashboard wrapped
    /// for import, plus the Prometheus datasource definition.
    pub fn build_manifest(&self, prometheus_url: &str) -> anyhow::Result<String> {
        let mut data = BTreeMap::new();
        for asset in &self.catalog {
            asset
                .dashboard
                .validate()
                .with_context(|| format!("failed to render {}", asset.file_name))?;
            let envelope = serde_json::to_string_pretty(&import_envelope(&asset.dashboard))?;
            data.insert(asset.file_name.clone(), envelope);
        }
        data.insert(
            DATASOURCE_KEY.to_string(),
            serde_json::to_string_pretty(&datasource_definition(prometheus_url))?,
        );

        let manifest = ConfigMap::new(DASHBOARDS_CONFIG_MAP, data);
        Ok(serde_yaml::to_string(&manifest)?)
    }

    pub fn write_manifest(&self, path: &Path, prometheus_url: &str) -> anyhow::Result<()> {
        let manifest = self.build_manifest(prometheus_url)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.store.create_dir_all(parent)?;
        }
        self.store
            .write(path, &manifest)
            .with_context(|| format!("failed to write manifest {}", path.display()))?;
        tracing::info!(path = %path.display(), dashboards = self.catalog.len(), "Manifest written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::asset_store::memory::MemoryStore;
    use crate::application::builders::{dashboard, row, single_stat};
    use crate::dashboards::catalog;
    use crate::domain::dashboard::Time;
    use crate::domain::target::Target;

    fn service(store: Arc<MemoryStore>) -> DashboardService {
        DashboardService::new(store, catalog())
    }

    #[test]
    fn test_generate_writes_every_dashboard() {
        let store = Arc::new(MemoryStore::default());
        let written = service(store.clone()).generate(Path::new("out")).unwrap();

        assert_eq!(written.len(), 9);
        assert_eq!(written[0], PathBuf::from("out/deployment-dashboard.json"));

        let pods = store.get("out/pods-dashboard.json").unwrap();
        let json: serde_json::Value = serde_json::from_str(&pods).unwrap();
        assert_eq!(json["title"], "Pods");
        assert!(pods.ends_with('\n'));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let first = Arc::new(MemoryStore::default());
        let second = Arc::new(MemoryStore::default());
        service(first.clone()).generate(Path::new("out")).unwrap();
        service(second.clone()).generate(Path::new("out")).unwrap();
        assert_eq!(
            first.get("out/nodes-dashboard.json"),
            second.get("out/nodes-dashboard.json")
        );
    }

    #[test]
    fn test_render_rejects_invalid_dashboard() {
        let store = Arc::new(MemoryStore::default());
        let duplicate = dashboard(
            "Broken",
            1,
            Time::last("6h"),
            vec![row(vec![
                single_stat("A", 1, vec![Target::new("up")]).into(),
                single_stat("B", 1, vec![Target::new("up")]).into(),
            ])],
        );
        let service = DashboardService::new(store.clone(), vec![DashboardAsset::new("broken.json", duplicate)]);

        let err = service.generate(Path::new("out")).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.json"));
        assert!(store.get("out/broken.json").is_none());
    }

    #[test]
    fn test_manifest_contains_envelopes_and_datasource() {
        let store = Arc::new(MemoryStore::default());
        let manifest = service(store).build_manifest(DEFAULT_PROMETHEUS_URL).unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&manifest).unwrap();

        assert_eq!(parsed["kind"].as_str(), Some("ConfigMap"));
        assert_eq!(parsed["metadata"]["name"].as_str(), Some("grafana-dashboards"));

        let data = parsed["data"].as_mapping().unwrap();
        assert_eq!(data.len(), 10);

        let deployment = parsed["data"]["deployment-dashboard.json"].as_str().unwrap();
        let envelope: serde_json::Value = serde_json::from_str(deployment).unwrap();
        assert_eq!(envelope["overwrite"], true);
        assert_eq!(envelope["inputs"][0]["name"], "DS_PROMETHEUS");
        assert_eq!(envelope["inputs"][0]["value"], "prometheus");
        assert_eq!(envelope["dashboard"]["title"], "Deployment");

        let datasource = parsed["data"][DATASOURCE_KEY].as_str().unwrap();
        let datasource: serde_json::Value = serde_json::from_str(datasource).unwrap();
        assert_eq!(datasource["url"], DEFAULT_PROMETHEUS_URL);
        assert_eq!(datasource["access"], "proxy");
    }

    #[test]
    fn test_write_manifest() {
        let store = Arc::new(MemoryStore::default());
        service(store.clone())
            .write_manifest(Path::new("manifests/grafana-dashboards.yaml"), "http://prom:9090")
            .unwrap();
        let written = store.get("manifests/grafana-dashboards.yaml").unwrap();
        assert!(written.contains("http://prom:9090"));
    }
}
