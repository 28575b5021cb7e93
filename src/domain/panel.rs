// Panel models: singlestat and graph, plus their display options
use super::color::{Rgb, Rgba, GREEN, ORANGE, RED};
use super::target::Target;
use serde::Serialize;
use std::collections::BTreeMap;

/// A visualization unit inside a row.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Panel {
    #[serde(rename = "singlestat")]
    SingleStat(SingleStat),
    #[serde(rename = "graph")]
    Graph(Graph),
}

impl Panel {
    pub fn id(&self) -> u32 {
        match self {
            Panel::SingleStat(stat) => stat.id,
            Panel::Graph(graph) => graph.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Panel::SingleStat(stat) => &stat.title,
            Panel::Graph(graph) => &graph.title,
        }
    }

    pub fn datasource(&self) -> Option<&str> {
        match self {
            Panel::SingleStat(stat) => stat.datasource.as_deref(),
            Panel::Graph(graph) => graph.datasource.as_deref(),
        }
    }

    pub fn targets(&self) -> &[Target] {
        match self {
            Panel::SingleStat(stat) => &stat.targets,
            Panel::Graph(graph) => &graph.targets,
        }
    }
}

impl From<SingleStat> for Panel {
    fn from(stat: SingleStat) -> Self {
        Panel::SingleStat(stat)
    }
}

impl From<Graph> for Panel {
    fn from(graph: Graph) -> Self {
        Panel::Graph(graph)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gauge {
    pub max_value: i64,
    pub min_value: i64,
    pub show: bool,
    pub threshold_labels: bool,
    pub threshold_markers: bool,
}

impl Default for Gauge {
    fn default() -> Self {
        Self {
            max_value: 100,
            min_value: 0,
            show: false,
            threshold_labels: false,
            threshold_markers: true,
        }
    }
}

impl Gauge {
    pub fn shown() -> Self {
        Self::default().show(true)
    }

    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }

    pub fn max_value(mut self, max_value: i64) -> Self {
        self.max_value = max_value;
        self
    }

    pub fn threshold_markers(mut self, markers: bool) -> Self {
        self.threshold_markers = markers;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SparkLine {
    pub fill_color: Rgba,
    pub full: bool,
    pub line_color: Rgb,
    pub show: bool,
}

impl Default for SparkLine {
    fn default() -> Self {
        Self {
            fill_color: Rgba(31, 118, 189, 0.18),
            full: false,
            line_color: Rgb(31, 120, 193),
            show: false,
        }
    }
}

impl SparkLine {
    pub fn shown() -> Self {
        Self {
            show: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueMap {
    pub op: String,
    pub text: String,
    pub value: String,
}

impl ValueMap {
    /// Render a missing value as `text`.
    pub fn null_as(text: impl Into<String>) -> Self {
        Self {
            op: "=".to_string(),
            text: text.into(),
            value: "null".to_string(),
        }
    }

    pub fn equals(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            op: "=".to_string(),
            text: text.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeMap {
    pub from: String,
    pub text: String,
    pub to: String,
}

impl RangeMap {
    pub fn null_as(text: impl Into<String>) -> Self {
        Self {
            from: "null".to_string(),
            text: text.into(),
            to: "null".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingType {
    pub name: String,
    pub value: u8,
}

impl MappingType {
    pub const VALUE_TO_TEXT: u8 = 1;
    pub const RANGE_TO_TEXT: u8 = 2;

    pub fn standard() -> Vec<MappingType> {
        vec![
            MappingType {
                name: "value to text".to_string(),
                value: Self::VALUE_TO_TEXT,
            },
            MappingType {
                name: "range to text".to_string(),
                value: Self::RANGE_TO_TEXT,
            },
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleStat {
    pub cache_timeout: Option<String>,
    pub color_background: bool,
    pub color_value: bool,
    pub colors: Vec<Rgba>,
    pub datasource: Option<String>,
    pub decimals: Option<u32>,
    pub description: Option<String>,
    pub editable: bool,
    pub format: String,
    pub gauge: Gauge,
    pub hide_time_override: Option<bool>,
    pub id: u32,
    pub interval: Option<String>,
    pub mapping_type: u8,
    pub mapping_types: Vec<MappingType>,
    pub max_data_points: u32,
    pub null_point_mode: String,
    pub null_text: Option<String>,
    pub postfix: Option<String>,
    pub postfix_font_size: String,
    pub prefix: Option<String>,
    pub prefix_font_size: String,
    pub range_maps: Vec<RangeMap>,
    pub span: Option<u32>,
    pub sparkline: SparkLine,
    pub targets: Vec<Target>,
    pub thresholds: String,
    pub title: String,
    pub transparent: Option<bool>,
    pub value_font_size: String,
    pub value_maps: Vec<ValueMap>,
    pub value_name: String,
}

impl SingleStat {
    pub fn new(title: impl Into<String>, id: u32, targets: Vec<Target>) -> Self {
        Self {
            cache_timeout: None,
            color_background: false,
            color_value: false,
            colors: vec![GREEN, ORANGE, RED],
            datasource: None,
            decimals: None,
            description: None,
            editable: true,
            format: "none".to_string(),
            gauge: Gauge::default(),
            hide_time_override: Some(false),
            id,
            interval: None,
            mapping_type: MappingType::VALUE_TO_TEXT,
            mapping_types: MappingType::standard(),
            max_data_points: 100,
            null_point_mode: "connected".to_string(),
            null_text: None,
            postfix: None,
            postfix_font_size: "50%".to_string(),
            prefix: None,
            prefix_font_size: "50%".to_string(),
            range_maps: Vec::new(),
            span: None,
            sparkline: SparkLine::default(),
            targets,
            thresholds: String::new(),
            title: title.into(),
            transparent: None,
            value_font_size: "80%".to_string(),
            value_maps: Vec::new(),
            value_name: "avg".to_string(),
        }
    }

    pub fn color_value(mut self, color_value: bool) -> Self {
        self.color_value = color_value;
        self
    }

    pub fn colors(mut self, colors: [Rgba; 3]) -> Self {
        self.colors = colors.to_vec();
        self
    }

    pub fn datasource(mut self, datasource: impl Into<String>) -> Self {
        self.datasource = Some(datasource.into());
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn gauge(mut self, gauge: Gauge) -> Self {
        self.gauge = gauge;
        self
    }

    pub fn hide_time_override(mut self, hide: Option<bool>) -> Self {
        self.hide_time_override = hide;
        self
    }

    pub fn postfix(mut self, postfix: impl Into<String>) -> Self {
        self.postfix = Some(postfix.into());
        self
    }

    pub fn prefix_font_size(mut self, size: impl Into<String>) -> Self {
        self.prefix_font_size = size.into();
        self
    }

    pub fn range_maps(mut self, range_maps: Vec<RangeMap>) -> Self {
        self.range_maps = range_maps;
        self
    }

    pub fn span(mut self, span: u32) -> Self {
        self.span = Some(span);
        self
    }

    pub fn sparkline(mut self, sparkline: SparkLine) -> Self {
        self.sparkline = sparkline;
        self
    }

    pub fn thresholds(mut self, thresholds: impl Into<String>) -> Self {
        self.thresholds = thresholds.into();
        self
    }

    pub fn value_font_size(mut self, size: impl Into<String>) -> Self {
        self.value_font_size = size.into();
        self
    }

    pub fn value_maps(mut self, value_maps: Vec<ValueMap>) -> Self {
        self.value_maps = value_maps;
        self
    }

    pub fn value_name(mut self, value_name: impl Into<String>) -> Self {
        self.value_name = value_name.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub align_as_table: bool,
    pub avg: bool,
    pub current: bool,
    pub hide_empty: bool,
    pub hide_zero: bool,
    pub max: bool,
    pub min: bool,
    pub right_side: bool,
    pub show: bool,
    pub side_width: Option<u32>,
    pub total: bool,
    pub values: bool,
}

impl Default for Legend {
    fn default() -> Self {
        Self {
            align_as_table: false,
            avg: false,
            current: false,
            hide_empty: false,
            hide_zero: false,
            max: false,
            min: false,
            right_side: false,
            show: true,
            side_width: None,
            total: false,
            values: false,
        }
    }
}

impl Legend {
    /// Table legend on the right listing average and current values.
    pub fn table_right() -> Self {
        Self {
            align_as_table: true,
            avg: true,
            current: true,
            right_side: true,
            values: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub ms_resolution: bool,
    pub shared: bool,
    pub sort: u8,
    #[serde(rename = "value_type")]
    pub value_type: String,
}

impl Default for Tooltip {
    fn default() -> Self {
        Self {
            ms_resolution: true,
            shared: true,
            sort: 0,
            value_type: "cumulative".to_string(),
        }
    }
}

impl Tooltip {
    pub fn ms_resolution(mut self, ms_resolution: bool) -> Self {
        self.ms_resolution = ms_resolution;
        self
    }

    pub fn value_type(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = value_type.into();
        self
    }

    pub fn individual() -> Self {
        Self::default().ms_resolution(false).value_type("individual")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    pub threshold1: Option<f64>,
    #[serde(rename = "threshold1Color")]
    pub threshold1_color: Rgba,
    pub threshold2: Option<f64>,
    #[serde(rename = "threshold2Color")]
    pub threshold2_color: Rgba,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            threshold1: None,
            threshold1_color: Rgba(216, 200, 27, 0.27),
            threshold2: None,
            threshold2_color: Rgba(234, 112, 112, 0.22),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XAxis {
    pub mode: String,
    pub name: Option<String>,
    pub values: Vec<String>,
    pub show: bool,
}

impl Default for XAxis {
    fn default() -> Self {
        Self::time()
    }
}

impl XAxis {
    pub fn time() -> Self {
        Self {
            mode: "time".to_string(),
            name: None,
            values: Vec::new(),
            show: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YAxis {
    pub decimals: Option<u32>,
    pub format: String,
    pub label: Option<String>,
    pub log_base: u32,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub show: bool,
}

impl Default for YAxis {
    fn default() -> Self {
        Self {
            decimals: None,
            format: "short".to_string(),
            label: None,
            log_base: 1,
            max: None,
            min: Some(0.0),
            show: true,
        }
    }
}

impl YAxis {
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn min(mut self, min: Option<f64>) -> Self {
        self.min = min;
        self
    }

    pub fn max(mut self, max: Option<f64>) -> Self {
        self.max = max;
        self
    }

    pub fn show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }
}

/// Left and right y axes. Grafana expects exactly this pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YAxes(pub YAxis, pub YAxis);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesOverride {
    pub alias: String,
    pub yaxis: u8,
}

impl SeriesOverride {
    pub fn new(alias: impl Into<String>, yaxis: u8) -> Self {
        Self {
            alias: alias.into(),
            yaxis,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    pub alias_colors: BTreeMap<String, String>,
    pub bars: bool,
    pub dash_length: Option<u32>,
    pub dashes: bool,
    pub datasource: Option<String>,
    pub description: Option<String>,
    pub editable: bool,
    pub error: bool,
    pub fill: u32,
    pub grid: Grid,
    pub id: u32,
    pub is_new: bool,
    pub legend: Legend,
    pub lines: bool,
    #[serde(rename = "linewidth")]
    pub line_width: u32,
    pub null_point_mode: String,
    pub percentage: bool,
    #[serde(rename = "pointradius")]
    pub point_radius: u32,
    pub points: bool,
    pub renderer: String,
    pub series_overrides: Vec<SeriesOverride>,
    pub space_length: Option<u32>,
    pub span: Option<u32>,
    pub stack: bool,
    pub stepped_line: bool,
    pub targets: Vec<Target>,
    pub time_from: Option<String>,
    pub time_shift: Option<String>,
    pub title: String,
    pub tooltip: Tooltip,
    pub transparent: bool,
    #[serde(rename = "xaxis")]
    pub x_axis: XAxis,
    #[serde(rename = "yaxes")]
    pub y_axes: YAxes,
}

impl Graph {
    pub fn new(title: impl Into<String>, id: u32, targets: Vec<Target>, y_axes: YAxes) -> Self {
        Self {
            alias_colors: BTreeMap::new(),
            bars: false,
            dash_length: None,
            dashes: false,
            datasource: None,
            description: None,
            editable: true,
            error: false,
            fill: 1,
            grid: Grid::default(),
            id,
            is_new: true,
            legend: Legend::default(),
            lines: true,
            line_width: 2,
            null_point_mode: "connected".to_string(),
            percentage: false,
            point_radius: 5,
            points: false,
            renderer: "flot".to_string(),
            series_overrides: Vec::new(),
            space_length: None,
            span: None,
            stack: false,
            stepped_line: false,
            targets,
            time_from: None,
            time_shift: None,
            title: title.into(),
            tooltip: Tooltip::default(),
            transparent: false,
            x_axis: XAxis::default(),
            y_axes,
        }
    }

    pub fn dash_length(mut self, dash_length: u32) -> Self {
        self.dash_length = Some(dash_length);
        self
    }

    pub fn dashes(mut self, dashes: bool) -> Self {
        self.dashes = dashes;
        self
    }

    pub fn datasource(mut self, datasource: impl Into<String>) -> Self {
        self.datasource = Some(datasource.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn is_new(mut self, is_new: bool) -> Self {
        self.is_new = is_new;
        self
    }

    pub fn legend(mut self, legend: Legend) -> Self {
        self.legend = legend;
        self
    }

    pub fn line_width(mut self, line_width: u32) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn null_point_mode(mut self, mode: impl Into<String>) -> Self {
        self.null_point_mode = mode.into();
        self
    }

    pub fn series_overrides(mut self, overrides: Vec<SeriesOverride>) -> Self {
        self.series_overrides = overrides;
        self
    }

    pub fn space_length(mut self, space_length: u32) -> Self {
        self.space_length = Some(space_length);
        self
    }

    pub fn span(mut self, span: u32) -> Self {
        self.span = Some(span);
        self
    }

    pub fn stack(mut self, stack: bool) -> Self {
        self.stack = stack;
        self
    }

    pub fn tooltip(mut self, tooltip: Tooltip) -> Self {
        self.tooltip = tooltip;
        self
    }

    pub fn x_axis(mut self, x_axis: XAxis) -> Self {
        self.x_axis = x_axis;
        self
    }
}
