use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of the fitted daily-count trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Increasing => write!(f, "increasing"),
            Trend::Decreasing => write!(f, "decreasing"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

/// Number of records that fell on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// Result of a trend forecast.
///
/// `predicted_counts`, `future_dates` and `confidence_interval` always have
/// exactly `horizon_days` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Predicted record count per future day, never negative
    pub predicted_counts: Vec<f64>,

    /// The calendar days following the last historical day
    pub future_dates: Vec<NaiveDate>,

    /// Trend label derived from the fitted slope
    pub trend: Trend,

    /// `[low, high]` per predicted point; `low` is clamped at zero
    pub confidence_interval: Vec<[f64; 2]>,

    /// Fitted slope in records/day (0.0 for the single-day fallback)
    pub slope: f64,

    /// Sample standard deviation of the historical daily counts
    pub historical_std: f64,
}

impl Forecast {
    pub fn horizon_days(&self) -> usize {
        self.predicted_counts.len()
    }
}
