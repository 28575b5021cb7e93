// Deployment dashboard: resource usage and replica state of one deployment
use super::{null_as, RED_TO_GREEN};
use crate::application::builders::{dashboard, graph, query_variable, row, single_stat, y_axis};
use crate::domain::dashboard::{Dashboard, Templating, Time};
use crate::domain::panel::{Gauge, Panel, SparkLine, XAxis, YAxes};
use crate::domain::target::Target;

pub fn build() -> Dashboard {
    let templating = Templating::new(vec![
        query_variable(
            "deployment_namespace",
            "Namespace",
            "label_values(kube_deployment_metadata_generation, namespace)",
        )
        .all_value(".*")
        .tag_values_query(None),
        query_variable(
            "deployment_name",
            "Deployment",
            r#"label_values(kube_deployment_metadata_generation{namespace="$deployment_namespace"}, deployment)"#,
        )
        .tags_query("deployment"),
    ]);

    dashboard(
        "Deployment",
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
        vec![Target::new(
            r#"sum(rate(container_cpu_usage_seconds_total{namespace="$deployment_namespace",pod_name=~"$deployment_name.*"}[3m]))"#,
        )],
    )
    .gauge(Gauge::hidden())
    .postfix("cores")
    .span(4)
    .value_font_size("110%")
    .colors(RED_TO_GREEN)
    .sparkline(SparkLine::shown());

    let memory = single_stat(
        "Memory",
        9,
        vec![Target::new(
            r#"sum(container_memory_usage_bytes{namespace="$deployment_namespace",pod_name=~"$deployment_name.*"}) / 1024^3"#,
        )
        .interval_factor(2)
        .ref_id("A")
        .step(600)],
    )
    .postfix("GB")
    .prefix_font_size("80%")
    .gauge(Gauge::hidden())
    .span(4)
    .value_font_size("110%")
    .colors(RED_TO_GREEN)
    .sparkline(SparkLine::shown());

    let network = single_stat(
        "Network",
        7,
        vec![Target::new(concat!(
            r#"sum(rate(container_network_transmit_bytes_total{namespace="$deployment_namespace",pod_name=~"$deployment_name.*"}[3m])) + "#,
            r#"sum(rate(container_network_receive_bytes_total{namespace="$deployment_namespace",pod_name=~"$deployment_name.*"}[3m]))"#,
        ))],
    )
    .format("Bps")
    .gauge(Gauge::hidden().threshold_markers(false))
    .postfix("")
    .span(4)
    .colors(RED_TO_GREEN)
    .sparkline(SparkLine::shown());

    vec![
        null_as(cpu, "N/A").into(),
        null_as(memory, "N/A").into(),
        null_as(network, "N/A").into(),
    ]
}

fn replica_stats() -> Vec<Panel> {
    let desired = single_stat(
        "Desired Replicas",
        5,
        vec![Target::new(
            r#"max(kube_deployment_spec_replicas{deployment="$deployment_name",namespace="$deployment_namespace"}) without (instance, pod)"#,
        )
        .metric("kube_deployment_spec_replicas")],
    )
    .span(3)
    .gauge(Gauge::hidden().threshold_markers(false));

    let available = single_stat(
        "Available Replicas",
        6,
        vec![Target::new(
            r#"min(kube_deployment_status_replicas_available{deployment="$deployment_name",namespace="$deployment_namespace"}) without (instance, pod)"#,
        )],
    )
    .span(3)
    .gauge(Gauge::hidden());

    let observed = single_stat(
        "Observed Generation",
        3,
        vec![Target::new(
            r#"max(kube_deployment_status_observed_generation{deployment="$deployment_name",namespace="$deployment_namespace"}) without (instance, pod)"#,
        )],
    )
    .span(3)
    .gauge(Gauge::default());

    let metadata = single_stat(
        "Metadata Generation",
        2,
        vec![Target::new(
            r#"max(kube_deployment_metadata_generation{deployment="$deployment_name",namespace="$deployment_namespace"}) without (instance, pod)"#,
        )],
    )
    .span(3)
    .gauge(Gauge::hidden());

    [desired, available, observed, metadata]
        .into_iter()
        .map(|stat| null_as(stat.colors(RED_TO_GREEN), "N/A").into())
        .collect()
}

fn replicas_graph() -> Panel {
    let selector = r#"{deployment="$deployment_name",namespace="$deployment_namespace"}) without (instance, pod)"#;
    let series = [
        ("max(kube_deployment_status_replicas", "current replicas", "A"),
        ("min(kube_deployment_status_replicas_available", "available", "B"),
        ("max(kube_deployment_status_replicas_unavailable", "unavailable", "C"),
        ("min(kube_deployment_status_replicas_updated", "updated", "D"),
        ("max(kube_deployment_spec_replicas", "desired", "E"),
    ];
    let targets = series
        .into_iter()
        .map(|(metric, legend, ref_id)| {
            Target::new(format!("{}{}", metric, selector))
                .legend_format(legend)
                .ref_id(ref_id)
                .step(30)
        })
        .collect();

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
