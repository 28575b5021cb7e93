// Pods: per-container memory, CPU and network of one pod
use crate::application::builders::{dashboard, graph, query_variable, row, y_axis};
use crate::domain::dashboard::{Dashboard, Row, Templating, Time};
use crate::domain::panel::{Graph, Legend, YAxes, YAxis};
use crate::domain::target::Target;

pub fn build() -> Dashboard {
    let templating = Templating::new(vec![
        query_variable("namespace", "Namespace", "label_values(kube_pod_info, namespace)")
            .all_value(".*")
            .include_all(true),
        query_variable(
            "pod",
            "Pod",
            r#"label_values(kube_pod_info{namespace=~"$namespace"}, pod)"#,
        ),
        query_variable(
            "container",
            "Container",
            r#"label_values(kube_pod_container_info{namespace="$namespace", pod="$pod"}, container)"#,
        )
        .all_value(".*")
        .include_all(true),
    ]);

    dashboard(
        "Pods",
        1,
        Time::last("6h"),
        vec![
            pod_row("Row", memory_usage()),
            pod_row("Row", cpu_usage()),
            pod_row("New Row", network_io()),
        ],
    )
    .graph_tooltip(1)
    .templating(templating)
}

fn pod_row(title: &str, graph: Graph) -> Row {
    row(vec![graph.into()]).height(250).title(title)
}

fn pod_graph(id: u32, title: &str, targets: Vec<Target>, left: YAxis) -> Graph {
    graph(id, title, targets, YAxes(left, y_axis().format("short").min(None)))
        .dash_length(10)
        .space_length(10)
        .is_new(false)
        .span(12)
        .legend(Legend::table_right())
}

fn memory_usage() -> Graph {
    let targets = vec![
        Target::new(
            r#"sum by(container_name) (container_memory_usage_bytes{pod_name="$pod", container_name=~"$container", container_name!="POD"})"#,
        )
        .interval("10s")
        .interval_factor(1)
        .legend_format("Current: {{ container_name }}")
        .metric("container_memory_usage_bytes")
        .step(15),
        Target::new(
            r#"kube_pod_container_resource_requests_memory_bytes{pod="$pod", container=~"$container"}"#,
        )
        .interval("10s")
        .legend_format("Requested: {{ container }}")
        .metric("kube_pod_container_resource_requests_memory_bytes")
        .ref_id("B")
        .step(20),
    ];
    pod_graph(1, "Memory Usage", targets, y_axis().format("bytes").min(None))
}

fn cpu_usage() -> Graph {
    let targets = vec![
        Target::new(
            r#"sum by (container_name)(rate(container_cpu_usage_seconds_total{image!="",container_name!="POD",pod_name="$pod"}[1m]))"#,
        )
        .legend_format("{{ container_name }}")
        .step(30),
    ];
    pod_graph(2, "CPU Usage", targets, y_axis().format("short").min(None))
}

fn network_io() -> Graph {
    let targets = vec![
        Target::new(
            r#"sort_desc(sum by (pod_name) (rate(container_network_receive_bytes_total{pod_name="$pod"}[1m])))"#,
        )
        .legend_format("{{ pod_name }}")
        .step(30),
    ];
    pod_graph(3, "Network I/O", targets, y_axis().format("bytes").min(None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphs_use_table_legend() {
        let json = serde_json::to_value(build()).unwrap();
        for row in json["rows"].as_array().unwrap() {
            let graph = &row["panels"][0];
            assert_eq!(graph["type"], "graph");
            assert_eq!(graph["span"], 12);
            assert_eq!(graph["legend"]["alignAsTable"], true);
            assert_eq!(graph["legend"]["rightSide"], true);
        }
    }

    #[test]
    fn test_memory_targets_keep_explicit_settings() {
        let dash = build();
        let memory = dash.panels().find(|p| p.id() == 1).unwrap();
        let current = &memory.targets()[0];
        assert_eq!(current.interval_factor, Some(1));
        assert_eq!(current.step, Some(15));
        assert_eq!(current.ref_id.as_deref(), Some("A"));
        let requested = &memory.targets()[1];
        assert_eq!(requested.interval_factor, Some(2));
        assert_eq!(requested.ref_id.as_deref(), Some("B"));
    }
}
