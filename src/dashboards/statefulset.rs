// StatefulSet dashboard: resource usage and replica state of one statefulset
use super::{null_as, RED_TO_GREEN};
use crate::application::builders::{dashboard, graph, query_variable, row, single_stat, y_axis};
use crate::domain::dashboard::{Dashboard, Templating, Time};
use crate::domain::panel::{Gauge, Panel, SparkLine, XAxis, YAxes};
use crate::domain::target::Target;

const POD_SELECTOR: &str =
    r#"{namespace="$statefulset_namespace",pod_name=~"$statefulset_name.*"}"#;
const SET_SELECTOR: &str =
    r#"{statefulset="$statefulset_name",namespace="$statefulset_namespace"}"#;

pub fn build() -> Dashboard {
    let templating = Templating::new(vec![
        query_variable(
            "statefulset_namespace",
            "Namespace",
            "label_values(kube_statefulset_metadata_generation, namespace)",
        )
        .all_value(".*")
        .tag_values_query(None),
        query_variable(
            "statefulset_name",
            "StatefulSet",
            r#"label_values(kube_statefulset_metadata_generation{namespace="$statefulset_namespace"}, statefulset)"#,
        )
        .tags_query("statefulset"),
    ]);

    dashboard(
        "StatefulSet",
        1,
        Time::last("6h"),
        vec![
            row(usage_panels()).height(200),
            row(replica_stats()).height(100),
            row(vec![replicas_graph()]).height(350),
        ],
    )
    .graph_tooltip(1)
    .templating(templating)
}

fn usage_panels() -> Vec<Panel> {
    let cpu = single_stat(
        "CPU",
        8,
        vec![Target::new(format!(
            "sum(rate(container_cpu_usage_seconds_total{}[3m]))",
            POD_SELECTOR
        ))],
    )
    .gauge(Gauge::hidden())
    .postfix("cores")
    .span(4)
    .value_font_size("110%");

    let memory = single_stat(
        "Memory",
        9,
        vec![Target::new(format!(
            "sum(container_memory_usage_bytes{}) / 1024^3",
            POD_SELECTOR
        ))],
    )
    .postfix("GB")
    .prefix_font_size("80%")
    .gauge(Gauge::hidden())
    .span(4)
    .value_font_size("110%");

    let network = single_stat(
        "Network",
        7,
        vec![Target::new(format!(
            "sum(rate(container_network_transmit_bytes_total{sel}[3m])) + \
             sum(rate(container_network_receive_bytes_total{sel}[3m]))",
            sel = POD_SELECTOR
        ))],
    )
    .format("Bps")
    .gauge(Gauge::default().threshold_markers(false))
    .postfix("")
    .span(4);

    [cpu, memory, network]
        .into_iter()
        .map(|stat| {
            null_as(stat.colors(RED_TO_GREEN), "N/A")
                .sparkline(SparkLine::shown())
                .into()
        })
        .collect()
}

fn replica_stats() -> Vec<Panel> {
    let stat = |title: &str, id, aggregate: &str, metric: &str, gauge: Gauge| {
        let expr = format!("{}({}{}) without (instance, pod)", aggregate, metric, SET_SELECTOR);
        single_stat(title, id, vec![Target::new(expr)])
            .gauge(gauge)
            .span(3)
            .colors(RED_TO_GREEN)
    };

    let desired = single_stat(
        "Desired Replicas",
        5,
        vec![Target::new(format!(
            "max(kube_statefulset_replicas{}) without (instance, pod)",
            SET_SELECTOR
        ))
        .metric("kube_statefulset_replicas")],
    )
    .span(3)
    .colors(RED_TO_GREEN)
    .gauge(Gauge::hidden().threshold_markers(false));

    [
        desired,
        stat(
            "Available Replicas",
            6,
            "min",
            "kube_statefulset_status_replicas",
            Gauge::hidden(),
        ),
        stat(
            "Observed Generation",
            3,
            "max",
            "kube_statefulset_status_observed_generation",
            Gauge::default(),
        ),
        stat(
            "Metadata Generation",
            2,
            "max",
            "kube_statefulset_metadata_generation",
            Gauge::hidden(),
        ),
    ]
    .into_iter()
    .map(|stat| null_as(stat, "N/A").into())
    .collect()
}

fn replicas_graph() -> Panel {
    let targets = vec![
        Target::new(format!(
            "min(kube_statefulset_status_replicas{}) without (instance, pod)",
            SET_SELECTOR
        ))
        .legend_format("available")
        .ref_id("B")
        .step(30),
        Target::new(format!(
            "max(kube_statefulset_replicas{}) without (instance, pod)",
            SET_SELECTOR
        ))
        .legend_format("desired")
        .ref_id("E")
        .step(30),
    ];

    graph(
        1,
        "Replicas",
        targets,
        YAxes(
            y_axis().min(None),
            y_axis().format("short").min(None).show(false),
        ),
    )
    .dash_length(10)
    .space_length(10)
    .x_axis(XAxis::time())
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replicas_graph_tracks_available_and_desired() {
        let dash = build();
        let graph = dash.panels().find(|p| p.title() == "Replicas").unwrap();
        let refs: Vec<_> = graph
            .targets()
            .iter()
            .map(|t| t.ref_id.as_deref().unwrap())
            .collect();
        assert_eq!(refs, ["B", "E"]);
        assert!(graph.targets().iter().all(|t| t.step == Some(30)));
    }

    #[test]
    fn test_templating_variables() {
        let json = serde_json::to_value(build()).unwrap();
        let list = json["templating"]["list"].as_array().unwrap();
        assert_eq!(list[0]["name"], "statefulset_namespace");
        assert_eq!(list[0]["allValue"], ".*");
        assert_eq!(list[1]["tagsQuery"], "statefulset");
    }
}
