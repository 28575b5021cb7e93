// Kubernetes Cluster Health: counters that should all read zero
use crate::application::builders::{dashboard, row, single_stat};
use crate::domain::dashboard::{Dashboard, Row, Time};
use crate::domain::panel::{Gauge, Panel, RangeMap, SingleStat, ValueMap};
use crate::domain::target::Target;

pub fn build() -> Dashboard {
    dashboard(
        "Kubernetes Cluster Health",
        9,
        Time::last("6h"),
        vec![
            health_row(254, vec![
                control_plane_down(),
                counter(2, "Alerts Firing", r#"sum(ALERTS{alertstate="firing",alertname!="DeadMansSwitch"})"#, "1, 3", "0"),
                counter(3, "Alerts Pending", r#"sum(ALERTS{alertstate="pending",alertname!="DeadMansSwitch"})"#, "3, 5", "0"),
                counter(4, "Crashlooping Pods", "count(increase(kube_pod_container_status_restarts[1h]) > 5)", "1, 3", "0"),
            ]),
            health_row(250, vec![
                counter(5, "Node Not Ready", r#"sum(kube_node_status_condition{condition="Ready",status!="true"})"#, "1, 3", "N/A"),
                counter(6, "Node Disk Pressure", r#"sum(kube_node_status_condition{condition="DiskPressure",status="true"})"#, "1, 3", "N/A"),
                counter(7, "Node Memory Pressure", r#"sum(kube_node_status_condition{condition="MemoryPressure",status="true"})"#, "1, 3", "N/A"),
                counter(8, "Nodes Unschedulable", "sum(kube_node_spec_unschedulable)", "1, 3", "N/A"),
            ]),
        ],
    )
}

fn health_row(height: u32, panels: Vec<Panel>) -> Row {
    row(panels).height(height).title("Row")
}

fn stat(id: u32, title: &str, expr: &str, thresholds: &str) -> SingleStat {
    single_stat(title, id, vec![Target::new(expr).time_series().legend_format("")])
        .gauge(Gauge::default())
        .span(3)
        .color_value(true)
        .thresholds(thresholds)
        .range_maps(vec![RangeMap::null_as("N/A")])
}

fn counter(id: u32, title: &str, expr: &str, thresholds: &str, null_text: &str) -> Panel {
    stat(id, title, expr, thresholds)
        .value_name("current")
        .value_maps(vec![ValueMap::null_as(null_text)])
        .into()
}

fn control_plane_down() -> Panel {
    stat(
        1,
        "Control Plane Components Down",
        r#"sum(up{job=~"apiserver|kube-scheduler|kube-controller-manager"} == 0)"#,
        "1, 3",
    )
    .value_maps(vec![
        ValueMap::null_as("Everything UP and healthy"),
        ValueMap::equals("", ""),
    ])
    .into()
}
