// Sync service - Use case for copying rule files and manifests into Helm charts
use crate::application::asset_store::AssetStore;
use crate::domain::chart::{ChartSync, SyncMode};
use crate::domain::template::{
    define_block, escape_delimiters, splice_values_section, substitute_job_label,
};
use anyhow::Context;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("{path} is not a YAML mapping")]
    NotAMapping { path: String },
}

#[derive(Clone)]
pub struct SyncService {
    store: Arc<dyn AssetStore>,
}

impl SyncService {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self { store }
    }

    /// Run every entry in order. The first failure aborts the run.
    pub fn run(&self, charts: &[ChartSync]) -> anyhow::Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(charts.len());
        for (index, chart) in charts.iter().enumerate() {
            let path = self.sync_chart(chart).with_context(|| {
                format!(
                    "chart sync #{} ({} -> {}) failed",
                    index + 1,
                    chart.source.display(),
                    chart.destination.display()
                )
            })?;
            tracing::info!(source = %chart.source.display(), output = %path.display(), "Chart synced");
            written.push(path);
        }
        Ok(written)
    }

    pub fn sync_chart(&self, chart: &ChartSync) -> anyhow::Result<PathBuf> {
        let source = self.store.read_to_string(&chart.source)?;
        let output = chart.output_path();

        let contents = match &chart.mode {
            SyncMode::ValuesSection { search_var, file_name } => {
                let values = self.store.read_to_string(&chart.destination)?;
                splice_values_section(&values, search_var, file_name, &source)
            }
            SyncMode::RuleTemplate { job_label } => {
                let mut body = escape_delimiters(&source);
                if let Some(job) = job_label {
                    body = substitute_job_label(&body, job);
                }
                define_block(&chart.source_name(), &body)
            }
            SyncMode::DashboardTemplate { template_name, drop_keys } => {
                let body = strip_manifest_keys(&chart.source, &source, drop_keys)?;
                define_block(template_name, &escape_delimiters(&body))
            }
        };

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.store.create_dir_all(parent)?;
        }
        self.store.write(&output, &contents)?;
        tracing::debug!(bytes = contents.len(), path = %output.display(), "Template written");
        Ok(output)
    }
}

/// Re-serialize the manifest's `data` mapping (or the whole document when it
/// has none) without `drop_keys`. Remaining keys keep their order.
fn strip_manifest_keys(path: &Path, source: &str, drop_keys: &[String]) -> anyhow::Result<String> {
    let document: Value = serde_yaml::from_str(source)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let not_a_mapping = || SyncError::NotAMapping {
        path: path.display().to_string(),
    };
    let top = document.as_mapping().ok_or_else(not_a_mapping)?;
    let data = match top.get("data") {
        Some(Value::Mapping(data)) => data,
        _ => top,
    };

    let kept: Mapping = data
        .iter()
        .filter(|(key, _)| {
            key.as_str()
                .is_none_or(|key| !drop_keys.iter().any(|drop| drop == key))
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    for key in drop_keys {
        if !data.contains_key(key.as_str()) {
            tracing::warn!(key = %key, path = %path.display(), "Key to drop not present in manifest");
        }
    }

    Ok(serde_yaml::to_string(&kept)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::asset_store::memory::MemoryStore;
    use crate::domain::chart::DATASOURCE_KEY;

    const RULES: &str = "groups:\n- name: kubelet.rules\n  rules:\n  - alert: K8SKubeletDown\n    expr: up{job=\"kubelet\"} == 0\n    annotations:\n      summary: \"{{ $labels.instance }} down\"\n  - alert: Other\n    expr: absent(up{job=\"apiserver\"})\n";

    fn rule_chart(job_label: Option<&str>) -> ChartSync {
        ChartSync::new(
            "rules/kubelet.rules.yaml",
            "helm/exporter-kubelets",
            SyncMode::RuleTemplate {
                job_label: job_label.map(str::to_string),
            },
        )
    }

    #[test]
    fn test_values_section() {
        let store = Arc::new(MemoryStore::with_files(&[
            ("rules/node.rules.yaml", "groups:\n- name: node\n"),
            ("helm/exporter-node/values.yaml", "replicaCount: 1\nruleFiles:\n  old: stale\n"),
        ]));
        let chart = ChartSync::new(
            "rules/node.rules.yaml",
            "helm/exporter-node/values.yaml",
            SyncMode::ValuesSection {
                search_var: "ruleFiles".to_string(),
                file_name: "node".to_string(),
            },
        );

        SyncService::new(store.clone()).run(&[chart]).unwrap();

        assert_eq!(
            store.get("helm/exporter-node/values.yaml").unwrap(),
            "replicaCount: 1\nruleFiles:\n  node.rules: |-\n    groups:\n    - name: node\n"
        );
    }

    #[test]
    fn test_rule_template_keeps_matching_job() {
        let store = Arc::new(MemoryStore::with_files(&[("rules/kubelet.rules.yaml", RULES)]));
        let written = SyncService::new(store.clone())
            .run(&[rule_chart(Some("kubelet"))])
            .unwrap();

        assert_eq!(
            written,
            [PathBuf::from("helm/exporter-kubelets/templates/kubelet.rules.yaml")]
        );
        let output = store
            .get("helm/exporter-kubelets/templates/kubelet.rules.yaml")
            .unwrap();
        assert!(output.starts_with("{{ define \"kubelet.rules.yaml.tpl\" }}\n"));
        assert!(output.ends_with("{{ end }}"));
        assert!(output.contains(r#"up{job="kubelet"} == 0"#));
        assert!(output.contains(r#"absent(up{job="kubelet"})"#));
        assert!(output.contains("{{`{{ $labels.instance }}`}}"));
    }

    #[test]
    fn test_rule_template_rewrites_job() {
        let store = Arc::new(MemoryStore::with_files(&[("rules/kubelet.rules.yaml", RULES)]));
        SyncService::new(store.clone())
            .run(&[rule_chart(Some("foo"))])
            .unwrap();

        let output = store
            .get("helm/exporter-kubelets/templates/kubelet.rules.yaml")
            .unwrap();
        assert_eq!(output.matches(r#"job="foo""#).count(), 2);
        assert!(!output.contains(r#"job="kubelet""#));
    }

    #[test]
    fn test_rule_template_without_job_label() {
        let store = Arc::new(MemoryStore::with_files(&[("rules/kubelet.rules.yaml", RULES)]));
        SyncService::new(store.clone()).run(&[rule_chart(None)]).unwrap();

        let output = store
            .get("helm/exporter-kubelets/templates/kubelet.rules.yaml")
            .unwrap();
        assert!(output.contains(r#"absent(up{job="apiserver"})"#));
    }

    #[test]
    fn test_dashboard_template_drops_datasource() {
        let manifest = "apiVersion: v1\nkind: ConfigMap\ndata:\n  b.json: '{\"title\": \"{{ b }}\"}'\n  prometheus-datasource.json: '{}'\n  a.json: '{}'\nmetadata:\n  name: grafana-dashboards\n";
        let store = Arc::new(MemoryStore::with_files(&[("manifests/grafana-dashboards.yaml", manifest)]));
        let chart = ChartSync::new(
            "manifests/grafana-dashboards.yaml",
            "helm/grafana",
            SyncMode::DashboardTemplate {
                template_name: "dashboards".to_string(),
                drop_keys: vec![DATASOURCE_KEY.to_string()],
            },
        );

        SyncService::new(store.clone()).run(&[chart]).unwrap();

        let output = store.get("helm/grafana/templates/dashboards.yaml").unwrap();
        assert!(output.starts_with("{{ define \"dashboards.tpl\" }}\n"));
        assert!(!output.contains(DATASOURCE_KEY));
        assert!(!output.contains("apiVersion"));
        assert!(output.contains("{{`{{ b }}`}}"));
        let b = output.find("b.json").unwrap();
        let a = output.find("a.json").unwrap();
        assert!(b < a);
    }

    #[test]
    fn test_dashboard_template_top_level_mapping() {
        let manifest = "a.json: '{}'\nprometheus-datasource.json: '{}'\n";
        let store = Arc::new(MemoryStore::with_files(&[("dashboards.yaml", manifest)]));
        let chart = ChartSync::new(
            "dashboards.yaml",
            "helm/grafana",
            SyncMode::DashboardTemplate {
                template_name: "dashboards".to_string(),
                drop_keys: vec![DATASOURCE_KEY.to_string()],
            },
        );

        SyncService::new(store.clone()).run(&[chart]).unwrap();

        let output = store.get("helm/grafana/templates/dashboards.yaml").unwrap();
        let body = output
            .strip_prefix("{{ define \"dashboards.tpl\" }}\n")
            .and_then(|rest| rest.strip_suffix("{{ end }}"))
            .unwrap();
        let kept: Mapping = serde_yaml::from_str(body).unwrap();
        let keys: Vec<_> = kept.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, ["a.json"]);
    }

    #[test]
    fn test_dashboard_template_rejects_scalar_document() {
        let store = Arc::new(MemoryStore::with_files(&[("dashboards.yaml", "just text\n")]));
        let chart = ChartSync::new(
            "dashboards.yaml",
            "helm/grafana",
            SyncMode::DashboardTemplate {
                template_name: "dashboards".to_string(),
                drop_keys: Vec::new(),
            },
        );

        let err = SyncService::new(store).run(&[chart]).unwrap_err();
        assert!(err.root_cause().to_string().contains("not a YAML mapping"));
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let store = Arc::new(MemoryStore::with_files(&[("rules/kubelet.rules.yaml", RULES)]));
        let service = SyncService::new(store.clone());
        let path = "helm/exporter-kubelets/templates/kubelet.rules.yaml";

        service.run(&[rule_chart(Some("kubelet"))]).unwrap();
        let first = store.get(path).unwrap();
        service.run(&[rule_chart(Some("kubelet"))]).unwrap();
        assert_eq!(store.get(path).unwrap(), first);
    }

    #[test]
    fn test_values_section_rerun_is_byte_identical() {
        let store = Arc::new(MemoryStore::with_files(&[
            ("rules/node.rules.yaml", "groups:\n- name: node\n"),
            ("helm/exporter-node/values.yaml", "replicaCount: 1\nruleFiles:\n  old: stale\n"),
        ]));
        let service = SyncService::new(store.clone());
        let chart = ChartSync::new(
            "rules/node.rules.yaml",
            "helm/exporter-node/values.yaml",
            SyncMode::ValuesSection {
                search_var: "ruleFiles".to_string(),
                file_name: "node".to_string(),
            },
        );
        let path = "helm/exporter-node/values.yaml";

        service.run(&[chart.clone()]).unwrap();
        let first = store.get(path).unwrap();
        service.run(&[chart]).unwrap();
        assert_eq!(store.get(path).unwrap(), first);
    }

    #[test]
    fn test_dashboard_template_rerun_is_byte_identical() {
        let manifest = "data:\n  a.json: '{\"title\": \"{{ a }}\"}'\n  prometheus-datasource.json: '{}'\n";
        let store = Arc::new(MemoryStore::with_files(&[("dashboards.yaml", manifest)]));
        let service = SyncService::new(store.clone());
        let chart = ChartSync::new(
            "dashboards.yaml",
            "helm/grafana",
            SyncMode::DashboardTemplate {
                template_name: "dashboards".to_string(),
                drop_keys: vec![DATASOURCE_KEY.to_string()],
            },
        );
        let path = "helm/grafana/templates/dashboards.yaml";

        service.run(&[chart.clone()]).unwrap();
        let first = store.get(path).unwrap();
        service.run(&[chart]).unwrap();
        assert_eq!(store.get(path).unwrap(), first);
    }

    #[test]
    fn test_missing_source_aborts_run() {
        let store = Arc::new(MemoryStore::with_files(&[("rules/kubelet.rules.yaml", RULES)]));
        let missing = ChartSync::new(
            "rules/missing.rules.yaml",
            "helm/missing",
            SyncMode::RuleTemplate { job_label: None },
        );

        let err = SyncService::new(store.clone())
            .run(&[missing, rule_chart(None)])
            .unwrap_err();

        assert!(format!("{:#}", err).contains("rules/missing.rules.yaml"));
        assert!(store
            .get("helm/exporter-kubelets/templates/kubelet.rules.yaml")
            .is_none());
    }
}
