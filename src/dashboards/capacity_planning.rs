// Kubernetes Capacity Planning: node-level CPU, memory, disk, network and pods
use super::null_as;
use crate::application::builders::{dashboard, graph, row, single_stat, y_axis};
use crate::domain::dashboard::{Dashboard, Row, Time};
use crate::domain::panel::{Gauge, Graph, Panel, SeriesOverride, SingleStat, Tooltip, YAxes};
use crate::domain::target::Target;

pub fn build() -> Dashboard {
    dashboard(
        "Kubernetes Capacity Planning",
        4,
        Time::last("1h"),
        vec![
            planning_row(250, vec![idle_cpu(), system_load()]),
            planning_row(250, vec![memory_usage(), memory_stat()]),
            planning_row(246, vec![disk_io(), disk_space_stat()]),
            planning_row(250, vec![network("Network Received", 8, "receive", "A"), network("Network Transmitted", 10, "transmit", "B")]),
            planning_row(276, vec![pod_utilization(), pod_stat()]),
        ],
    )
    .gnet_id(22)
    .editable(false)
}

fn planning_row(height: u32, panels: Vec<Panel>) -> Row {
    row(panels).height(height).title("New Row").editable(Some(false))
}

fn locked_graph(id: u32, title: &str, targets: Vec<Target>, y_axes: YAxes) -> Graph {
    graph(id, title, targets, y_axes)
        .dash_length(10)
        .space_length(10)
        .is_new(false)
        .editable(false)
        .tooltip(Tooltip::default().ms_resolution(false))
}

fn locked_stat(id: u32, title: &str, target: Target, thresholds: &str) -> SingleStat {
    let stat = single_stat(title, id, vec![target])
        .editable(false)
        .span(3)
        .format("percent")
        .thresholds(thresholds);
    null_as(stat, "N/A")
}

fn idle_cpu() -> Panel {
    locked_graph(
        3,
        "Idle CPU",
        vec![
            Target::new(r#"sum(rate(node_cpu{mode="idle"}[2m])) * 100"#)
                .hide(false)
                .interval_factor(10)
                .step(50),
        ],
        YAxes(
            y_axis().format("percent").label("cpu usage"),
            y_axis().format("short").min(None),
        ),
    )
    .span(6)
    .into()
}

fn system_load() -> Panel {
    let targets = [("1", "A"), ("5", "B"), ("15", "C")]
        .into_iter()
        .map(|(minutes, ref_id)| {
            Target::new(format!("sum(node_load{})", minutes))
                .interval_factor(4)
                .legend_format(format!("load {}m", minutes))
                .ref_id(ref_id)
                .step(20)
        })
        .collect();

    locked_graph(
        9,
        "System Load",
        targets,
        YAxes(
            y_axis().format("percentunit").min(None),
            y_axis().format("short").min(None),
        ),
    )
    .span(6)
    .into()
}

fn memory_usage() -> Panel {
    let series = [
        (
            "sum(node_memory_MemTotal) - sum(node_memory_MemFree) - sum(node_memory_Buffers) - sum(node_memory_Cached)",
            "memory usage",
            "A",
        ),
        ("sum(node_memory_Buffers)", "memory buffers", "B"),
        ("sum(node_memory_Cached)", "memory cached", "C"),
        ("sum(node_memory_MemFree)", "memory free", "D"),
    ];
    let targets = series
        .into_iter()
        .map(|(expr, legend, ref_id)| {
            Target::new(expr)
                .legend_format(legend)
                .metric("memo")
                .ref_id(ref_id)
                .step(10)
        })
        .collect();

    locked_graph(
        4,
        "Memory Usage",
        targets,
        YAxes(
            y_axis().format("bytes"),
            y_axis().format("short").min(None),
        ),
    )
    .span(9)
    .stack(true)
    .series_overrides(vec![SeriesOverride::new(
        r#"node_memory_SwapFree{instance="172.17.0.1:9100",job="prometheus"}"#,
        2,
    )])
    .tooltip(Tooltip::individual())
    .into()
}

fn memory_stat() -> Panel {
    locked_stat(
        5,
        "Memory Usage",
        Target::new(
            "((sum(node_memory_MemTotal) - sum(node_memory_MemFree) - sum(node_memory_Buffers) - sum(node_memory_Cached)) / sum(node_memory_MemTotal)) * 100",
        )
        .step(60),
        "80, 90",
    )
    .into()
}

fn disk_io() -> Panel {
    let series = [
        ("sum(rate(node_disk_bytes_read[5m]))", "read", "A"),
        ("sum(rate(node_disk_bytes_written[5m]))", "written", "B"),
        ("sum(rate(node_disk_io_time_ms[5m]))", "io time", "C"),
    ];
    let targets = series
        .into_iter()
        .map(|(expr, legend, ref_id)| {
            Target::new(expr)
                .interval_factor(4)
                .legend_format(legend)
                .ref_id(ref_id)
                .step(20)
        })
        .collect();

    locked_graph(
        6,
        "Disk I/O",
        targets,
        YAxes(
            y_axis().format("bytes").min(None),
            y_axis().format("ms").min(None),
        ),
    )
    .span(9)
    .series_overrides(vec![
        SeriesOverride::new("read", 1),
        SeriesOverride::new(r#"{instance="172.17.0.1:9100"}"#, 2),
        SeriesOverride::new("io time", 2),
    ])
    .into()
}

fn disk_space_stat() -> Panel {
    locked_stat(
        12,
        "Disk Space Usage",
        Target::new(
            r#"(sum(node_filesystem_size{device!="rootfs"}) - sum(node_filesystem_free{device!="rootfs"})) / sum(node_filesystem_size{device!="rootfs"})"#,
        )
        .step(60),
        "0.75, 0.9",
    )
    .format("percentunit")
    .value_name("current")
    .gauge(Gauge::shown().max_value(1))
    .into()
}

fn network(title: &str, id: u32, direction: &str, ref_id: &str) -> Panel {
    let expr = format!(r#"sum(rate(node_network_{direction}_bytes{{device!~"lo"}}[5m]))"#);
    locked_graph(
        id,
        title,
        vec![Target::new(expr).hide(false).ref_id(ref_id).step(10)],
        YAxes(
            y_axis().format("bytes").min(None),
            y_axis().format("bytes").min(None),
        ),
    )
    .span(6)
    .series_overrides(vec![SeriesOverride::new("transmitted", 2)])
    .into()
}

fn pod_utilization() -> Panel {
    let targets = vec![
        Target::new("sum(kube_pod_info)")
            .time_series()
            .legend_format("Current number of Pods")
            .step(10),
        Target::new("sum(kube_node_status_capacity_pods)")
            .time_series()
            .legend_format("Maximum capacity of pods")
            .ref_id("B")
            .step(10),
    ];

    graph(
        11,
        "Cluster Pod Utilization",
        targets,
        YAxes(
            y_axis().format("short").min(None),
            y_axis().format("short").min(None),
        ),
    )
    .span(9)
    .editable(false)
    .space_length(11)
    .tooltip(Tooltip::individual())
    .into()
}

fn pod_stat() -> Panel {
    locked_stat(
        7,
        "Pod Utilization",
        Target::new(
            "100 - (sum(kube_node_status_capacity_pods) - sum(kube_pod_info)) / sum(kube_node_status_capacity_pods) * 100",
        )
        .time_series()
        .legend_format("")
        .step(60),
        "80, 90",
    )
    .value_name("current")
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_is_locked() {
        let dash = build();
        assert!(!dash.editable);
        assert_eq!(dash.gnet_id, Some(22));
        assert_eq!(dash.time.from, "now-1h");
        assert!(dash.rows.iter().all(|r| r.editable == Some(false)));
    }

    #[test]
    fn test_disk_space_gauge_max() {
        let json = serde_json::to_value(build()).unwrap();
        let stat = &json["rows"][2]["panels"][1];
        assert_eq!(stat["id"], 12);
        assert_eq!(stat["gauge"]["maxValue"], 1);
        assert_eq!(stat["format"], "percentunit");
    }

    #[test]
    fn test_system_load_series() {
        let dash = build();
        let load = dash.panels().find(|p| p.id() == 9).unwrap();
        let exprs: Vec<_> = load.targets().iter().map(|t| t.expr.as_str()).collect();
        assert_eq!(exprs, ["sum(node_load1)", "sum(node_load5)", "sum(node_load15)"]);
    }
}
