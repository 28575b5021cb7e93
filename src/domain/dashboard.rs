// Dashboard domain model
use super::panel::Panel;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DashboardError {
    #[error("dashboard {dashboard:?} declares {count} inputs, expected exactly one datasource")]
    InputCount { dashboard: String, count: usize },
    #[error("dashboard {dashboard:?} input {name:?} is of type {kind:?}, expected datasource")]
    InputNotDatasource {
        dashboard: String,
        name: String,
        kind: String,
    },
    #[error("panel {panel_id} in {dashboard:?} uses datasource {found:?}, expected {expected:?}")]
    ForeignDatasource {
        dashboard: String,
        panel_id: u32,
        found: Option<String>,
        expected: String,
    },
    #[error("panel id {panel_id} appears more than once in {dashboard:?}")]
    DuplicatePanelId { dashboard: String, panel_id: u32 },
    #[error("panel {panel_id} in {dashboard:?} has a target without refId")]
    MissingRefId { dashboard: String, panel_id: u32 },
    #[error("panel {panel_id} in {dashboard:?} has a target without a positive step")]
    InvalidStep { dashboard: String, panel_id: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardInput {
    pub name: String,
    pub label: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub plugin_id: String,
    pub plugin_name: String,
}

impl DashboardInput {
    /// Placeholder the panels reference, e.g. `${DS_PROMETHEUS}`.
    pub fn placeholder(&self) -> String {
        format!("${{{}}}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Time {
    pub from: String,
    pub to: String,
}

impl Time {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Range ending now, e.g. `Time::last("6h")` covers `now-6h` to `now`.
    pub fn last(duration: &str) -> Self {
        Self::new(format!("now-{}", duration), "now")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePicker {
    pub refresh_intervals: Vec<String>,
    pub time_options: Vec<String>,
}

impl Default for TimePicker {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            refresh_intervals: strings(&["5s", "10s", "30s", "1m", "5m", "15m", "30m", "1h", "2h", "1d"]),
            time_options: strings(&["5m", "15m", "1h", "6h", "12h", "24h", "2d", "7d", "30d"]),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Annotations {
    pub list: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Templating {
    pub list: Vec<TemplateVariable>,
}

impl Templating {
    pub fn new(list: Vec<TemplateVariable>) -> Self {
        Self { list }
    }
}

/// A dashboard variable populated from a datasource query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVariable {
    pub all_value: Option<String>,
    pub current: BTreeMap<String, String>,
    pub datasource: Option<String>,
    pub hide: u8,
    pub include_all: bool,
    pub label: Option<String>,
    pub multi: bool,
    pub name: String,
    pub options: Vec<String>,
    pub query: String,
    pub refresh: u8,
    pub regex: String,
    pub sort: u8,
    pub tag_values_query: Option<String>,
    pub tags: Vec<String>,
    pub tags_query: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub use_tags: bool,
}

impl TemplateVariable {
    pub fn query(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            all_value: None,
            current: BTreeMap::new(),
            datasource: None,
            hide: 0,
            include_all: false,
            label: None,
            multi: false,
            name: name.into(),
            options: Vec::new(),
            query: query.into(),
            refresh: 1,
            regex: String::new(),
            sort: 0,
            tag_values_query: Some(String::new()),
            tags: Vec::new(),
            tags_query: String::new(),
            kind: "query".to_string(),
            use_tags: false,
        }
    }

    pub fn all_value(mut self, all_value: impl Into<String>) -> Self {
        self.all_value = Some(all_value.into());
        self
    }

    pub fn datasource(mut self, datasource: impl Into<String>) -> Self {
        self.datasource = Some(datasource.into());
        self
    }

    pub fn include_all(mut self, include_all: bool) -> Self {
        self.include_all = include_all;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn tag_values_query(mut self, query: Option<String>) -> Self {
        self.tag_values_query = query;
        self
    }

    pub fn tags_query(mut self, query: impl Into<String>) -> Self {
        self.tags_query = query.into();
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub collapse: bool,
    pub editable: Option<bool>,
    pub height: Option<u32>,
    pub panels: Vec<Panel>,
    pub repeat: Option<String>,
    pub show_title: bool,
    pub title: String,
    pub title_size: String,
}

impl Row {
    pub fn new(panels: Vec<Panel>) -> Self {
        Self {
            collapse: false,
            editable: Some(true),
            height: Some(250),
            panels,
            repeat: None,
            show_title: false,
            title: "New row".to_string(),
            title_size: "h6".to_string(),
        }
    }

    pub fn editable(mut self, editable: Option<bool>) -> Self {
        self.editable = editable;
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn unset_height(mut self) -> Self {
        self.height = None;
        self
    }

    pub fn show_title(mut self, show_title: bool) -> Self {
        self.show_title = show_title;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn title_size(mut self, size: impl Into<String>) -> Self {
        self.title_size = size.into();
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(rename = "__inputs")]
    pub inputs: Vec<DashboardInput>,
    pub annotations: Annotations,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub editable: bool,
    pub gnet_id: Option<u32>,
    pub graph_tooltip: u8,
    pub hide_controls: bool,
    pub id: Option<u32>,
    pub refresh: Option<String>,
    pub rows: Vec<Row>,
    pub schema_version: u32,
    pub shared_crosshair: bool,
    pub style: String,
    pub tags: Vec<String>,
    pub templating: Templating,
    pub time: Time,
    #[serde(rename = "timepicker")]
    pub time_picker: TimePicker,
    pub timezone: String,
    pub title: String,
    pub version: u32,
}

impl Dashboard {
    pub fn new(title: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            inputs: Vec::new(),
            annotations: Annotations::default(),
            description: None,
            editable: true,
            gnet_id: None,
            graph_tooltip: 0,
            hide_controls: false,
            id: None,
            refresh: Some("10s".to_string()),
            rows,
            schema_version: 12,
            shared_crosshair: false,
            style: "dark".to_string(),
            tags: Vec::new(),
            templating: Templating::default(),
            time: Time::last("1h"),
            time_picker: TimePicker::default(),
            timezone: "utc".to_string(),
            title: title.into(),
            version: 0,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn gnet_id(mut self, gnet_id: u32) -> Self {
        self.gnet_id = Some(gnet_id);
        self
    }

    pub fn graph_tooltip(mut self, graph_tooltip: u8) -> Self {
        self.graph_tooltip = graph_tooltip;
        self
    }

    pub fn inputs(mut self, inputs: Vec<DashboardInput>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn refresh(mut self, refresh: Option<String>) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn schema_version(mut self, schema_version: u32) -> Self {
        self.schema_version = schema_version;
        self
    }

    pub fn templating(mut self, templating: Templating) -> Self {
        self.templating = templating;
        self
    }

    pub fn time(mut self, time: Time) -> Self {
        self.time = time;
        self
    }

    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.rows.iter().flat_map(|row| row.panels.iter())
    }

    /// Check the authoring invariants every generated dashboard must hold.
    pub fn validate(&self) -> Result<(), DashboardError> {
        let dashboard = self.title.clone();

        let input = match self.inputs.as_slice() {
            [input] => input,
            inputs => {
                return Err(DashboardError::InputCount {
                    dashboard,
                    count: inputs.len(),
                })
            }
        };
        if input.kind != "datasource" {
            return Err(DashboardError::InputNotDatasource {
                dashboard,
                name: input.name.clone(),
                kind: input.kind.clone(),
            });
        }

        let expected = input.placeholder();
        let mut seen = HashSet::new();
        for panel in self.panels() {
            let panel_id = panel.id();
            if panel.datasource() != Some(expected.as_str()) {
                return Err(DashboardError::ForeignDatasource {
                    dashboard,
                    panel_id,
                    found: panel.datasource().map(str::to_string),
                    expected,
                });
            }
            if !seen.insert(panel_id) {
                return Err(DashboardError::DuplicatePanelId { dashboard, panel_id });
            }
            for target in panel.targets() {
                if target.ref_id.as_deref().is_none_or(str::is_empty) {
                    return Err(DashboardError::MissingRefId { dashboard, panel_id });
                }
                if target.step.is_none_or(|step| step == 0) {
                    return Err(DashboardError::InvalidStep { dashboard, panel_id });
                }
            }
        }

        Ok(())
    }
}

/// A dashboard together with the file name it is rendered to.
#[derive(Debug, Clone)]
pub struct DashboardAsset {
    pub file_name: String,
    pub dashboard: Dashboard,
}

impl DashboardAsset {
    pub fn new(file_name: impl Into<String>, dashboard: Dashboard) -> Self {
        Self {
            file_name: file_name.into(),
            dashboard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::panel::SingleStat;
    use crate::domain::target::Target;

    fn prometheus_input() -> DashboardInput {
        DashboardInput {
            name: "DS_PROMETHEUS".to_string(),
            label: "prometheus".to_string(),
            description: String::new(),
            kind: "datasource".to_string(),
            plugin_id: "prometheus".to_string(),
            plugin_name: "Prometheus".to_string(),
        }
    }

    fn stat(id: u32) -> Panel {
        SingleStat::new("stat", id, vec![Target::new("up").ref_id("A").step(600)])
            .datasource("${DS_PROMETHEUS}")
            .into()
    }

    fn dashboard(panels: Vec<Panel>) -> Dashboard {
        Dashboard::new("Test", vec![Row::new(panels)]).inputs(vec![prometheus_input()])
    }

    #[test]
    fn test_valid_dashboard() {
        assert_eq!(dashboard(vec![stat(1), stat(2)]).validate(), Ok(()));
    }

    #[test]
    fn test_duplicate_panel_id() {
        let err = dashboard(vec![stat(1), stat(1)]).validate().unwrap_err();
        assert_eq!(
            err,
            DashboardError::DuplicatePanelId {
                dashboard: "Test".to_string(),
                panel_id: 1
            }
        );
    }

    #[test]
    fn test_missing_input() {
        let err = dashboard(vec![stat(1)]).inputs(vec![]).validate().unwrap_err();
        assert!(matches!(err, DashboardError::InputCount { count: 0, .. }));
    }

    #[test]
    fn test_foreign_datasource() {
        let panel: Panel = SingleStat::new("stat", 3, vec![])
            .datasource("prometheus")
            .into();
        let err = dashboard(vec![panel]).validate().unwrap_err();
        assert!(matches!(err, DashboardError::ForeignDatasource { panel_id: 3, .. }));
    }

    #[test]
    fn test_unmerged_target() {
        let panel: Panel = SingleStat::new("stat", 4, vec![Target::new("up")])
            .datasource("${DS_PROMETHEUS}")
            .into();
        let err = dashboard(vec![panel]).validate().unwrap_err();
        assert!(matches!(err, DashboardError::MissingRefId { panel_id: 4, .. }));
    }

    #[test]
    fn test_query_input_rejected() {
        let input = DashboardInput {
            kind: "query".to_string(),
            ..prometheus_input()
        };
        let err = dashboard(vec![stat(1)]).inputs(vec![input]).validate().unwrap_err();
        assert_eq!(
            err,
            DashboardError::InputNotDatasource {
                dashboard: "Test".to_string(),
                name: "DS_PROMETHEUS".to_string(),
                kind: "query".to_string(),
            }
        );
    }

    #[test]
    fn test_zero_step_rejected() {
        let panel: Panel = SingleStat::new("stat", 5, vec![Target::new("up").ref_id("A").step(0)])
            .datasource("${DS_PROMETHEUS}")
            .into();
        let err = dashboard(vec![panel]).validate().unwrap_err();
        assert!(matches!(err, DashboardError::InvalidStep { panel_id: 5, .. }));
    }

    #[test]
    fn test_time_last() {
        assert_eq!(Time::last("6h"), Time::new("now-6h", "now"));
    }

    #[test]
    fn test_inputs_serialize_under_dunder_key() {
        let json = serde_json::to_value(dashboard(vec![])).unwrap();
        assert_eq!(json["__inputs"][0]["pluginId"], "prometheus");
        assert_eq!(json["__inputs"][0]["type"], "datasource");
        assert_eq!(json["timepicker"]["time_options"][3], "6h");
        assert!(json.get("description").is_none());
    }
}
