// Kubernetes Resource Requests: requested versus allocatable CPU and memory
use super::null_as;
use crate::application::builders::{dashboard, graph, row, single_stat, y_axis};
use crate::domain::dashboard::{Dashboard, Row, Time};
use crate::domain::panel::{SparkLine, Tooltip, YAxes};
use crate::domain::target::Target;

const CPU_DESCRIPTION: &str = "This represents the total [CPU resource requests](https://kubernetes.io/docs/concepts/configuration/manage-compute-resources-container/#meaning-of-cpu) in the cluster.\nFor comparison the total [allocatable CPU cores](https://github.com/kubernetes/community/blob/master/contributors/design-proposals/node-allocatable.md) is also shown.";
const MEMORY_DESCRIPTION: &str = "This represents the total [memory resource requests](https://kubernetes.io/docs/concepts/configuration/manage-compute-resources-container/#meaning-of-memory) in the cluster.\nFor comparison the total [allocatable memory](https://github.com/kubernetes/community/blob/master/contributors/design-proposals/node-allocatable.md) is also shown.";

/// One resource tracked by the dashboard, e.g. `cpu_cores` or `memory_bytes`.
struct Resource<'a> {
    title: &'a str,
    metric: &'a str,
    legend: &'a str,
    axis_format: &'a str,
    description: &'a str,
}

pub fn build() -> Dashboard {
    let cpu = Resource {
        title: "CPU Cores",
        metric: "cpu_cores",
        legend: "CPU Cores",
        axis_format: "short",
        description: CPU_DESCRIPTION,
    };
    let memory = Resource {
        title: "Memory",
        metric: "memory_bytes",
        legend: "Memory",
        axis_format: "bytes",
        description: MEMORY_DESCRIPTION,
    };

    dashboard(
        "Kubernetes Resource Requests",
        2,
        Time::last("3h"),
        vec![requests_row(&cpu, 1), requests_row(&memory, 3)],
    )
    .editable(false)
}

/// Graph of allocatable against requested, next to a usage percentage.
fn requests_row(resource: &Resource, graph_id: u32) -> Row {
    let allocatable = format!(
        "min(sum(kube_node_status_allocatable_{}) by (instance))",
        resource.metric
    );
    let requested = format!(
        "max(sum(kube_pod_container_resource_requests_{}) by (instance))",
        resource.metric
    );

    let history = graph(
        graph_id,
        resource.title,
        vec![
            Target::new(&allocatable)
                .hide(false)
                .legend_format(format!("Allocatable {}", resource.legend))
                .step(20),
            Target::new(&requested)
                .hide(false)
                .legend_format(format!("Requested {}", resource.legend))
                .ref_id("B")
                .step(20),
        ],
        YAxes(
            y_axis()
                .format(resource.axis_format)
                .label(resource.title)
                .min(None),
            y_axis().format("short").min(None),
        ),
    )
    .description(resource.description)
    .dash_length(10)
    .space_length(10)
    .is_new(false)
    .editable(false)
    .line_width(1)
    .null_point_mode("null")
    .span(9)
    .tooltip(Tooltip::individual());

    let usage = single_stat(
        resource.title,
        graph_id + 1,
        vec![
            Target::new(format!("{} / {} * 100", requested, allocatable))
                .legend_format("")
                .step(240),
        ],
    )
    .format("percent")
    .editable(false)
    .span(3)
    .sparkline(SparkLine::shown())
    .value_font_size("110%")
    .thresholds("80, 90");

    row(vec![history.into(), null_as(usage, "N/A").into()])
        .height(300)
        .title(resource.title)
        .editable(Some(false))
}
