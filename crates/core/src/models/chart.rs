use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

use super::analysis::FieldAnalysis;
use crate::errors::CoreError;

/// Layout template applied to every generated chart.
pub const CHART_TEMPLATE: &str = "plotly_white";

/// Supported chart kinds.
///
/// Declaration order is recommendation priority, so ordered collections of
/// `ChartType` iterate line → bar → pie → scatter → heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Bar,
    Pie,
    Scatter,
    Heatmap,
}

impl ChartType {
    pub const ALL: [ChartType; 5] = [
        ChartType::Line,
        ChartType::Bar,
        ChartType::Pie,
        ChartType::Scatter,
        ChartType::Heatmap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::Bar => "bar",
            ChartType::Pie => "pie",
            ChartType::Scatter => "scatter",
            ChartType::Heatmap => "heatmap",
        }
    }
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ChartType::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| CoreError::ValidationError(format!("Unknown chart type: {s}")))
    }
}

/// What the caller asked for: let the recommender choose, or one fixed type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartRequest {
    Auto,
    Specific(ChartType),
}

impl FromStr for ChartRequest {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(ChartRequest::Auto)
        } else {
            s.parse().map(ChartRequest::Specific)
        }
    }
}

/// One renderable series. Serialized in Plotly's trace shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar {
        x: Vec<Value>,
        y: Vec<Value>,
        name: String,
    },
    Scatter {
        x: Vec<Value>,
        y: Vec<Value>,
        /// "lines", "markers" or "lines+markers"
        mode: String,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line: Option<LineStyle>,
    },
    Pie {
        labels: Vec<Value>,
        values: Vec<Value>,
        title: String,
    },
    Heatmap {
        z: Vec<Vec<f64>>,
        x: Vec<String>,
        y: Vec<String>,
        colorscale: String,
        zmid: f64,
        zmin: f64,
        zmax: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

/// A complete chart: layout plus traces. The frontend only renders it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis_title: Option<String>,
    pub template: String,
    pub traces: Vec<Trace>,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_axis_title: None,
            y_axis_title: None,
            template: CHART_TEMPLATE.to_string(),
            traces: Vec::new(),
        }
    }

    pub fn with_axes(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_axis_title = Some(x.into());
        self.y_axis_title = Some(y.into());
        self
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }
}

/// A successfully built chart with a one-sentence description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub spec: ChartSpec,
    pub description: String,
}

/// Either a rendered chart or the reason it could not be built.
///
/// A failed chart never aborts the rest of the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartOutcome {
    Rendered(ChartPayload),
    Failed { error: String },
}

impl ChartOutcome {
    pub fn payload(&self) -> Option<&ChartPayload> {
        match self {
            ChartOutcome::Rendered(p) => Some(p),
            ChartOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ChartOutcome::Rendered(_) => None,
            ChartOutcome::Failed { error } => Some(error),
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, ChartOutcome::Rendered(_))
    }
}

impl From<Result<ChartPayload, CoreError>> for ChartOutcome {
    fn from(result: Result<ChartPayload, CoreError>) -> Self {
        match result {
            Ok(payload) => ChartOutcome::Rendered(payload),
            Err(e) => ChartOutcome::Failed {
                error: e.to_string(),
            },
        }
    }
}

/// Everything `recommend_charts` returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRecommendation {
    /// One entry per recommended or requested type, in priority order
    pub charts: BTreeMap<ChartType, ChartOutcome>,
    pub field_analysis: FieldAnalysis,
    pub textual_recommendations: Vec<String>,
}

impl ChartRecommendation {
    pub fn chart(&self, chart_type: ChartType) -> Option<&ChartOutcome> {
        self.charts.get(&chart_type)
    }

    pub fn chart_types(&self) -> Vec<ChartType> {
        self.charts.keys().copied().collect()
    }
}
