// Nodes: overview of a single server selected by instance
use super::null_as;
use crate::application::builders::{dashboard, graph, row, single_stat, y_axis, DATASOURCE};
use crate::domain::dashboard::{Dashboard, Row, TemplateVariable, Templating, Time};
use crate::domain::panel::{Gauge, Graph, Panel, SeriesOverride, SingleStat, Tooltip, YAxes};
use crate::domain::target::Target;

const SERVER: &str = r#"instance="$server""#;

pub fn build() -> Dashboard {
    let server = TemplateVariable::query("server", "label_values(node_boot_time, instance)")
        .datasource(DATASOURCE);

    dashboard(
        "Nodes",
        2,
        Time::last("1h"),
        vec![
            server_row(vec![idle_cpu(), system_load()]),
            server_row(vec![memory_usage(), memory_stat()]),
            server_row(vec![disk_io(), disk_space_stat()]),
            server_row(vec![
                network("Network Received", 8, "receive", "A"),
                network("Network Transmitted", 10, "transmit", "B"),
            ]),
        ],
    )
    .description("Dashboard to get an overview of one server")
    .gnet_id(22)
    .editable(false)
    .templating(Templating::new(vec![server]))
}

fn server_row(panels: Vec<Panel>) -> Row {
    row(panels).height(250).title("New Row").editable(Some(false))
}

fn server_graph(id: u32, title: &str, targets: Vec<Target>, y_axes: YAxes) -> Graph {
    graph(id, title, targets, y_axes)
        .dash_length(10)
        .space_length(10)
        .is_new(false)
        .editable(false)
        .tooltip(Tooltip::default().ms_resolution(false))
}

fn server_stat(id: u32, title: &str, expr: String, thresholds: &str) -> SingleStat {
    let stat = single_stat(title, id, vec![Target::new(expr).step(60)])
        .editable(false)
        .span(3)
        .format("percent")
        .thresholds(thresholds);
    null_as(stat, "N/A")
}

fn idle_cpu() -> Panel {
    let expr = format!(r#"100 - (avg by (cpu) (irate(node_cpu{{mode="idle", {SERVER}}}[5m])) * 100)"#);
    server_graph(
        3,
        "Idle CPU",
        vec![
            Target::new(expr)
                .hide(false)
                .interval_factor(10)
                .legend_format("{{cpu}}")
                .step(50),
        ],
        YAxes(
            y_axis().format("percent").label("cpu usage").max(Some(100.0)),
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
            Target::new(format!("node_load{minutes}{{{SERVER}}}"))
                .interval_factor(4)
                .legend_format(format!("load {minutes}m"))
                .ref_id(ref_id)
                .step(20)
        })
        .collect();

    server_graph(
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
    let used = format!(
        "node_memory_MemTotal{{{SERVER}}} - node_memory_MemFree{{{SERVER}}} - \
         node_memory_Buffers{{{SERVER}}} - node_memory_Cached{{{SERVER}}}"
    );
    let series = [
        (used, "memory used", "C"),
        (format!("node_memory_Buffers{{{SERVER}}}"), "memory buffers", "E"),
        (format!("node_memory_Cached{{{SERVER}}}"), "memory cached", "F"),
        (format!("node_memory_MemFree{{{SERVER}}}"), "memory free", "D"),
    ];
    let targets = series
        .into_iter()
        .map(|(expr, legend, ref_id)| {
            Target::new(expr)
                .legend_format(legend)
                .ref_id(ref_id)
                .step(10)
        })
        .collect();

    server_graph(
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
    let expr = format!(
        "((node_memory_MemTotal{{{SERVER}}} - node_memory_MemFree{{{SERVER}}}  - \
         node_memory_Buffers{{{SERVER}}} - node_memory_Cached{{{SERVER}}}) / \
         node_memory_MemTotal{{{SERVER}}}) * 100"
    );
    server_stat(5, "Memory Usage", expr, "80, 90").into()
}

fn disk_io() -> Panel {
    let series = [
        ("node_disk_bytes_read", "read", "A"),
        ("node_disk_bytes_written", "written", "B"),
        ("node_disk_io_time_ms", "io time", "C"),
    ];
    let targets = series
        .into_iter()
        .map(|(metric, legend, ref_id)| {
            Target::new(format!("sum by (instance) (rate({metric}{{{SERVER}}}[2m]))"))
                .interval_factor(4)
                .legend_format(legend)
                .ref_id(ref_id)
                .step(20)
        })
        .collect();

    server_graph(
        6,
        "Disk I/O",
        targets,
        YAxes(
            y_axis().format("bytes").min(None),
            y_axis().format("ms").min(None),
        ),
    )
    .is_new(true)
    .span(9)
    .series_overrides(vec![
        SeriesOverride::new("read", 1),
        SeriesOverride::new(r#"{instance="172.17.0.1:9100"}"#, 2),
        SeriesOverride::new("io time", 2),
    ])
    .into()
}

fn disk_space_stat() -> Panel {
    let filter = format!(r#"{{device!="rootfs",{SERVER}}}"#);
    let expr = format!(
        "(sum(node_filesystem_size{filter}) - sum(node_filesystem_free{filter})) / \
         sum(node_filesystem_size{filter})"
    );
    server_stat(7, "Disk Space Usage", expr, "0.75, 0.9")
        .format("percentunit")
        .value_name("current")
        .gauge(Gauge::shown().max_value(1))
        .into()
}

fn network(title: &str, id: u32, direction: &str, ref_id: &str) -> Panel {
    let expr = format!(r#"rate(node_network_{direction}_bytes{{{SERVER},device!~"lo"}}[5m])"#);
    server_graph(
        id,
        title,
        vec![
            Target::new(expr)
                .hide(false)
                .legend_format("{{device}}")
                .ref_id(ref_id)
                .step(10),
        ],
        YAxes(
            y_axis().format("bytes").min(None),
            y_axis().format("bytes").min(None),
        ),
    )
    .span(6)
    .series_overrides(vec![SeriesOverride::new("transmitted", 2)])
    .into()
}
