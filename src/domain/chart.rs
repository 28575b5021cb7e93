// Chart sync entries: where a rule file or manifest is copied into a Helm chart
use std::path::{Path, PathBuf};

pub const DATASOURCE_KEY: &str = "prometheus-datasource.json";

/// How the source content lands in the chart.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncMode {
    /// Replace everything from the `<search_var>:` line of a values file onward.
    ValuesSection { search_var: String, file_name: String },
    /// Wrap a rule file in a named template under `templates/`.
    RuleTemplate { job_label: Option<String> },
    /// Re-serialize a dashboards manifest, minus `drop_keys`, as a named template.
    DashboardTemplate {
        template_name: String,
        drop_keys: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSync {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub mode: SyncMode,
}

impl ChartSync {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>, mode: SyncMode) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            mode,
        }
    }

    /// File name of the source, used as the template name for rule files.
    pub fn source_name(&self) -> String {
        self.source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Name passed to `{{ define }}`, without the `.tpl` suffix.
    pub fn template_name(&self) -> Option<String> {
        match &self.mode {
            SyncMode::ValuesSection { .. } => None,
            SyncMode::RuleTemplate { .. } => Some(self.source_name()),
            SyncMode::DashboardTemplate { template_name, .. } => Some(template_name.clone()),
        }
    }

    /// The file this entry writes.
    pub fn output_path(&self) -> PathBuf {
        match &self.mode {
            SyncMode::ValuesSection { .. } => self.destination.clone(),
            SyncMode::RuleTemplate { .. } => templates_dir(&self.destination).join(self.source_name()),
            SyncMode::DashboardTemplate { template_name, .. } => {
                templates_dir(&self.destination).join(format!("{}.yaml", template_name))
            }
        }
    }
}

fn templates_dir(chart: &Path) -> PathBuf {
    chart.join("templates")
}
