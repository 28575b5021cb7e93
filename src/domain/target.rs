// Query targets attached to panels
use serde::Serialize;

/// A single PromQL query bound to a panel, with display metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub expr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_factor: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,
}

/// Values filled into a target wherever the caller left a field unset.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetDefaults {
    pub interval_factor: u32,
    pub legend_format: Option<String>,
    pub ref_id: String,
    pub step: u32,
}

impl Target {
    pub fn new(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            format: None,
            hide: None,
            interval: None,
            interval_factor: None,
            legend_format: None,
            metric: None,
            ref_id: None,
            step: None,
        }
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Shorthand for the `time_series` result format.
    pub fn time_series(self) -> Self {
        self.format("time_series")
    }

    pub fn hide(mut self, hide: bool) -> Self {
        self.hide = Some(hide);
        self
    }

    pub fn interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = Some(interval.into());
        self
    }

    pub fn interval_factor(mut self, factor: u32) -> Self {
        self.interval_factor = Some(factor);
        self
    }

    pub fn legend_format(mut self, legend: impl Into<String>) -> Self {
        self.legend_format = Some(legend.into());
        self
    }

    pub fn metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = Some(metric.into());
        self
    }

    pub fn ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = Some(ref_id.into());
        self
    }

    pub fn step(mut self, step: u32) -> Self {
        self.step = Some(step);
        self
    }

    /// Fill unset fields from `defaults`. Fields the caller set are kept.
    pub fn merge_defaults(self, defaults: &TargetDefaults) -> Self {
        Self {
            interval_factor: self.interval_factor.or(Some(defaults.interval_factor)),
            legend_format: self.legend_format.or_else(|| defaults.legend_format.clone()),
            ref_id: self.ref_id.or_else(|| Some(defaults.ref_id.clone())),
            step: self.step.or(Some(defaults.step)),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> TargetDefaults {
        TargetDefaults {
            interval_factor: 2,
            legend_format: Some(String::new()),
            ref_id: "A".to_string(),
            step: 600,
        }
    }

    #[test]
    fn test_merge_fills_missing_fields() {
        let target = Target::new("sum(up)").merge_defaults(&defaults());

        assert_eq!(target.interval_factor, Some(2));
        assert_eq!(target.legend_format.as_deref(), Some(""));
        assert_eq!(target.ref_id.as_deref(), Some("A"));
        assert_eq!(target.step, Some(600));
    }

    #[test]
    fn test_merge_keeps_caller_fields() {
        let target = Target::new("sum(up)")
            .ref_id("C")
            .step(30)
            .legend_format("unavailable")
            .merge_defaults(&defaults());

        assert_eq!(target.ref_id.as_deref(), Some("C"));
        assert_eq!(target.step, Some(30));
        assert_eq!(target.legend_format.as_deref(), Some("unavailable"));
        assert_eq!(target.interval_factor, Some(2));
    }

    #[test]
    fn test_unset_fields_are_omitted_from_json() {
        let json = serde_json::to_value(Target::new("up").time_series()).unwrap();
        assert_eq!(json, serde_json::json!({"expr": "up", "format": "time_series"}));
    }
}
