// Mapper from dashboards to the Kubernetes manifest Grafana imports
use crate::application::builders::DATASOURCE_INPUT;
use crate::domain::dashboard::Dashboard;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMap {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub data: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
}

impl ConfigMap {
    pub fn new(name: impl Into<String>, data: BTreeMap<String, String>) -> Self {
        Self {
            api_version: "v1".to_string(),
            kind: "ConfigMap".to_string(),
            metadata: ObjectMeta { name: name.into() },
            data,
        }
    }
}

/// Body Grafana's import API expects: the dashboard plus input bindings.
#[derive(Debug, Serialize)]
pub struct ImportEnvelope<'a> {
    pub dashboard: &'a Dashboard,
    pub inputs: Vec<ImportInput>,
    pub overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportInput {
    pub name: String,
    pub plugin_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceDefinition {
    pub access: String,
    pub basic_auth: bool,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

/// Bind the dashboard's datasource input to the `prometheus` datasource.
pub fn import_envelope(dashboard: &Dashboard) -> ImportEnvelope<'_> {
    ImportEnvelope {
        dashboard,
        inputs: vec![ImportInput {
            name: DATASOURCE_INPUT.to_string(),
            plugin_id: "prometheus".to_string(),
            kind: "datasource".to_string(),
            value: "prometheus".to_string(),
        }],
        overwrite: true,
    }
}

pub fn datasource_definition(url: &str) -> DatasourceDefinition {
    DatasourceDefinition {
        access: "proxy".to_string(),
        basic_auth: false,
        name: "prometheus".to_string(),
        kind: "prometheus".to_string(),
        url: url.to_string(),
    }
}
