// Kubernetes Cluster Status: health, control plane and capacity at a glance
use super::{null_as, RED_TO_GREEN};
use crate::application::builders::{dashboard, row, single_stat};
use crate::domain::dashboard::{Dashboard, Row, Time};
use crate::domain::panel::{Gauge, Panel, SingleStat};
use crate::domain::target::Target;

pub fn build() -> Dashboard {
    dashboard(
        "Kubernetes Cluster Status",
        3,
        Time::last("6h"),
        vec![
            titled_row("Cluster Health", 129, cluster_health()),
            titled_row("Control Plane Status", 168, control_plane()),
            titled_row("Capacity Planning", 158, capacity()),
        ],
    )
}

fn titled_row(title: &str, height: u32, panels: Vec<Panel>) -> Row {
    row(panels).height(height).title(title).show_title(true)
}

fn stat(id: u32, title: &str, expr: &str, thresholds: &str) -> SingleStat {
    single_stat(title, id, vec![Target::new(expr).time_series()]).thresholds(thresholds)
}

fn cluster_health() -> Vec<Panel> {
    let control_plane_up = stat(
        5,
        "Control Plane UP",
        r#"sum(up{job=~"apiserver|kube-scheduler|kube-controller-manager"} == 0)"#,
        "1, 3",
    )
    .value_name("total");
    let alerts = stat(
        6,
        "Alerts Firing",
        r#"sum(ALERTS{alertstate="firing",alertname!="DeadMansSwitch"})"#,
        "3, 5",
    )
    .value_name("current");

    vec![
        null_as(control_plane_up.gauge(Gauge::hidden()).color_value(true), "UP").into(),
        null_as(alerts.gauge(Gauge::hidden()).color_value(true), "0").into(),
    ]
}

fn control_plane() -> Vec<Panel> {
    let up_ratio = |id, title: &str, job: &str| {
        let expr = format!(
            r#"(sum(up{{job="{job}"}} == 1) / count(up{{job="{job}"}})) * 100"#,
        );
        let stat = stat(id, title, &expr, "50, 80")
            .format("percent")
            .colors(RED_TO_GREEN)
            .span(3)
            .value_name("current");
        Panel::from(null_as(stat, "N/A"))
    };

    let crashlooping = stat(
        4,
        "Crashlooping Control Plane Pods",
        r#"count(increase(kube_pod_container_status_restarts{namespace=~"kube-system|tectonic-system"}[1h]) > 5)"#,
        "1, 3",
    )
    .color_value(true)
    .gauge(Gauge::hidden())
    .span(3)
    .value_name("current");

    vec![
        up_ratio(1, "API Servers UP", "apiserver"),
        up_ratio(2, "Controller Managers UP", "kube-controller-manager"),
        up_ratio(3, "Schedulers UP", "kube-scheduler"),
        null_as(crashlooping, "0").into(),
    ]
}

fn capacity() -> Vec<Panel> {
    let utilization = [
        (
            8,
            "CPU Utilization",
            r#"sum(100 - (avg by (instance) (rate(node_cpu{job="node-exporter",mode="idle"}[5m])) * 100)) / count(node_cpu{job="node-exporter",mode="idle"})"#,
        ),
        (
            7,
            "Memory Utilization",
            "((sum(node_memory_MemTotal) - sum(node_memory_MemFree) - sum(node_memory_Buffers) - sum(node_memory_Cached)) / sum(node_memory_MemTotal)) * 100",
        ),
        (
            9,
            "Filesystem Utilization",
            r#"(sum(node_filesystem_size{device!="rootfs"}) - sum(node_filesystem_free{device!="rootfs"})) / sum(node_filesystem_size{device!="rootfs"})"#,
        ),
        (
            10,
            "Pod Utilization",
            "100 - (sum(kube_node_status_capacity_pods) - sum(kube_pod_info)) / sum(kube_node_status_capacity_pods) * 100",
        ),
    ];

    utilization
        .into_iter()
        .map(|(id, title, expr)| {
            let stat = stat(id, title, expr, "80, 90").format("percent").span(3);
            null_as(stat, "N/A").into()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_show_titles() {
        let dash = build();
        let titles: Vec<_> = dash.rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Cluster Health", "Control Plane Status", "Capacity Planning"]
        );
        assert!(dash.rows.iter().all(|r| r.show_title));
    }

    #[test]
    fn test_up_ratio_queries() {
        let dash = build();
        let schedulers = dash.panels().find(|p| p.id() == 3).unwrap();
        assert_eq!(
            schedulers.targets()[0].expr,
            r#"(sum(up{job="kube-scheduler"} == 1) / count(up{job="kube-scheduler"})) * 100"#
        );
    }
}
