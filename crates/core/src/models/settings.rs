use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Tunables for the whole library. Every section falls back to its
/// defaults when missing from a config document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub forecast: ForecastSettings,
    pub charts: ChartSettings,
    /// Generative-AI trend analysis; disabled when `None`.
    pub analyst: Option<AnalystSettings>,
}

impl Settings {
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    /// Distinct calendar days required before a regression is attempted.
    pub min_distinct_days: usize,

    /// Absolute slope (records/day) beyond which a trend is not "stable".
    pub slope_threshold: f64,

    /// Relative band used when all history falls on a single day.
    pub single_day_band: f64,

    /// Largest horizon accepted by the prediction report.
    pub max_horizon_days: u32,

    /// Only records this many days before "today" feed the prediction report.
    pub history_window_days: i64,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            min_distinct_days: 7,
            slope_threshold: 0.1,
            single_day_band: 0.2,
            max_horizon_days: 365,
            history_window_days: 180,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Leading values inspected to classify a field.
    pub sample_size: usize,

    /// Cap on auto-recommended chart types.
    pub max_recommendations: usize,

    /// Numeric fields considered for the correlation heatmap.
    pub heatmap_field_limit: usize,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            sample_size: 5,
            max_recommendations: 3,
            heatmap_field_limit: 5,
        }
    }
}

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalystSettings {
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_output_tokens() -> u32 {
    2048
}

impl AnalystSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }

    /// Read `GEMINI_API_KEY` (required) and `GEMINI_MODEL` (optional).
    pub fn from_env() -> Result<Self, CoreError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CoreError::MissingConfig("GEMINI_API_KEY".into()))?;
        let mut settings = Self::new(api_key);
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            if !model.trim().is_empty() {
                settings.model = model;
            }
        }
        Ok(settings)
    }
}

// Hand-written so the key never shows up in debug logs.
impl std::fmt::Debug for AnalystSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalystSettings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}
