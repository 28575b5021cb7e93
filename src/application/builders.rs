// Project defaults layered over the dashboard model
//
// Every dashboard in the catalog is built through these functions so they all
// share one Prometheus datasource input and the same target defaults.
use crate::domain::dashboard::{Dashboard, DashboardInput, Row, TemplateVariable, Time};
use crate::domain::panel::{Gauge, Graph, Panel, SingleStat, YAxes, YAxis};
use crate::domain::target::{Target, TargetDefaults};

pub const DATASOURCE_INPUT: &str = "DS_PROMETHEUS";
pub const DATASOURCE: &str = "${DS_PROMETHEUS}";
pub const SCHEMA_VERSION: u32 = 14;

pub fn prometheus_input() -> DashboardInput {
    DashboardInput {
        name: DATASOURCE_INPUT.to_string(),
        label: "prometheus".to_string(),
        description: String::new(),
        kind: "datasource".to_string(),
        plugin_id: "prometheus".to_string(),
        plugin_name: "Prometheus".to_string(),
    }
}

pub fn dashboard(title: &str, version: u32, time: Time, rows: Vec<Row>) -> Dashboard {
    Dashboard::new(title, rows)
        .version(version)
        .time(time)
        .schema_version(SCHEMA_VERSION)
        .refresh(None)
        .timezone("browser")
        .inputs(vec![prometheus_input()])
}

pub fn row(panels: Vec<Panel>) -> Row {
    Row::new(panels)
        .unset_height()
        .title("Dashboard Row")
        .show_title(false)
        .title_size("h6")
        .editable(None)
}

pub fn single_stat_target_defaults() -> TargetDefaults {
    TargetDefaults {
        interval_factor: 2,
        legend_format: None,
        ref_id: "A".to_string(),
        step: 600,
    }
}

pub fn graph_target_defaults() -> TargetDefaults {
    TargetDefaults {
        legend_format: Some(String::new()),
        ..single_stat_target_defaults()
    }
}

fn merge_targets(targets: Vec<Target>, defaults: &TargetDefaults) -> Vec<Target> {
    targets
        .into_iter()
        .map(|target| target.merge_defaults(defaults))
        .collect()
}

pub fn single_stat(title: &str, id: u32, targets: Vec<Target>) -> SingleStat {
    SingleStat::new(title, id, merge_targets(targets, &single_stat_target_defaults()))
        .datasource(DATASOURCE)
        .gauge(Gauge::shown())
        .hide_time_override(None)
}

pub fn graph(id: u32, title: &str, targets: Vec<Target>, y_axes: YAxes) -> Graph {
    Graph::new(title, id, merge_targets(targets, &graph_target_defaults()), y_axes)
        .datasource(DATASOURCE)
        .dashes(false)
        .null_point_mode("connected")
}

pub fn y_axis() -> YAxis {
    YAxis::default()
        .format("none")
        .label("")
        .min(Some(0.0))
        .show(true)
}

/// Query variable bound to the project datasource.
pub fn query_variable(name: &str, label: &str, query: &str) -> TemplateVariable {
    TemplateVariable::query(name, query)
        .label(label)
        .datasource(DATASOURCE)
}
