use crate::domain::chart::{ChartSync, SyncMode, DATASOURCE_KEY};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "KUBE_ASSETS";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SyncConfig {
    /// Directory that relative chart paths resolve against.
    pub root: Option<String>,
    #[serde(default)]
    pub charts: Vec<ChartConfig>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChartMode {
    ValuesSection,
    RuleTemplate,
    DashboardTemplate,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    pub source: String,
    pub destination: String,
    pub mode: ChartMode,
    pub job_label: Option<String>,
    pub search_var: Option<String>,
    pub file_name: Option<String>,
    pub template_name: Option<String>,
    pub drop_keys: Option<Vec<String>>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("chart {chart:?}: {mode:?} mode requires `{field}`")]
    MissingField {
        chart: String,
        mode: ChartMode,
        field: &'static str,
    },
}

pub fn load_sync_config(path: &str) -> anyhow::Result<SyncConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()?;

    Ok(settings.try_deserialize()?)
}

impl SyncConfig {
    pub fn chart_syncs(&self) -> Result<Vec<ChartSync>, ConfigError> {
        self.charts.iter().cloned().map(ChartSync::try_from).collect()
    }
}

impl TryFrom<ChartConfig> for ChartSync {
    type Error = ConfigError;

    fn try_from(chart: ChartConfig) -> Result<Self, Self::Error> {
        let required = |value: Option<String>, field: &'static str| {
            value.ok_or_else(|| ConfigError::MissingField {
                chart: chart.source.clone(),
                mode: chart.mode,
                field,
            })
        };

        let mode = match chart.mode {
            ChartMode::ValuesSection => SyncMode::ValuesSection {
                search_var: required(chart.search_var.clone(), "search_var")?,
                file_name: required(chart.file_name.clone(), "file_name")?,
            },
            ChartMode::RuleTemplate => SyncMode::RuleTemplate {
                job_label: chart.job_label.clone(),
            },
            ChartMode::DashboardTemplate => SyncMode::DashboardTemplate {
                template_name: required(chart.template_name.clone(), "template_name")?,
                drop_keys: chart
                    .drop_keys
                    .clone()
                    .unwrap_or_else(|| vec![DATASOURCE_KEY.to_string()]),
            },
        };

        Ok(ChartSync::new(chart.source, chart.destination, mode))
    }
}
