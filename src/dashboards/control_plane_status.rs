// Kubernetes Control Plane Status: component availability and API server load
use super::{null_as, RED_TO_GREEN};
use crate::application::builders::{dashboard, graph, row, single_stat, y_axis};
use crate::domain::dashboard::{Dashboard, Time};
use crate::domain::panel::{Graph, Panel, SingleStat, Tooltip, YAxes, YAxis};
use crate::domain::target::Target;

pub fn build() -> Dashboard {
    let availability = vec![
        up_percentage(1, "API Servers UP", "apiserver"),
        up_percentage(2, "Controller Managers UP", "kube-controller-manager"),
        up_percentage(3, "Schedulers UP", "kube-scheduler"),
        null_as(
            percent_stat(
                4,
                "API Server Request Error Rate",
                Target::new(
                    r#"max(sum by(instance) (rate(apiserver_request_count{code=~"5.."}[5m])) / sum by(instance) (rate(apiserver_request_count[5m]))) * 100"#,
                )
                .legend_format(""),
                "5, 10",
            ),
            "0",
        )
        .into(),
    ];

    let request_latency = status_graph(
        7,
        "API Server Request Latency",
        vec![
            Target::new("sum by(verb) (rate(apiserver_latency_seconds:quantile[5m]) >= 0)")
                .time_series()
                .step(30),
        ],
        short_axis(),
    );

    let scheduling_latency = status_graph(
        5,
        "End to End Scheduling Latency",
        vec![
            Target::new("cluster:scheduler_e2e_scheduling_latency_seconds:quantile")
                .time_series()
                .step(60),
        ],
        short_axis().format("dtdurations"),
    )
    .span(6);

    let request_rates = status_graph(
        6,
        "API Server Request Rates",
        vec![
            Target::new(r#"sum by(instance) (rate(apiserver_request_count{code!~"2.."}[5m]))"#)
                .time_series()
                .legend_format("Error Rate")
                .step(60),
            Target::new("sum by(instance) (rate(apiserver_request_count[5m]))")
                .time_series()
                .legend_format("Request Rate")
                .ref_id("B")
                .step(60),
        ],
        short_axis(),
    )
    .span(6);

    dashboard(
        "Kubernetes Control Plane Status",
        3,
        Time::last("6h"),
        vec![
            row(availability),
            row(vec![request_latency.into()]),
            row(vec![scheduling_latency.into(), request_rates.into()]),
        ],
    )
}

fn percent_stat(id: u32, title: &str, target: Target, thresholds: &str) -> SingleStat {
    single_stat(title, id, vec![target.time_series()])
        .format("percent")
        .span(3)
        .thresholds(thresholds)
}

fn up_percentage(id: u32, title: &str, job: &str) -> Panel {
    let expr = format!(r#"(sum(up{{job="{job}"}} == 1) / sum(up{{job="{job}"}})) * 100"#);
    let stat = percent_stat(id, title, Target::new(expr), "50, 80").colors(RED_TO_GREEN);
    null_as(stat, "N/A").into()
}

fn short_axis() -> YAxis {
    y_axis().format("short").min(None)
}

fn status_graph(id: u32, title: &str, targets: Vec<Target>, right: YAxis) -> Graph {
    graph(id, title, targets, YAxes(short_axis(), right))
        .dash_length(10)
        .space_length(10)
        .is_new(false)
        .line_width(1)
        .null_point_mode("null")
        .tooltip(Tooltip::individual())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_rates_has_two_series() {
        let dash = build();
        let rates = dash.panels().find(|p| p.id() == 6).unwrap();
        let legends: Vec<_> = rates
            .targets()
            .iter()
            .map(|t| t.legend_format.as_deref().unwrap())
            .collect();
        assert_eq!(legends, ["Error Rate", "Request Rate"]);
    }

    #[test]
    fn test_scheduling_latency_axis() {
        let json = serde_json::to_value(build()).unwrap();
        let graph = &json["rows"][2]["panels"][0];
        assert_eq!(graph["yaxes"][1]["format"], "dtdurations");
        assert_eq!(graph["tooltip"]["value_type"], "individual");
        assert_eq!(graph["span"], 6);
    }
}
