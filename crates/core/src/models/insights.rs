use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use super::chart::ChartSpec;
use super::forecast::Forecast;

/// Aggregate view of the variant history, fed to the AI analyst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSummary {
    pub total_variants: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// Variants per day that had at least one variant
    pub daily_average: f64,
    /// Up to 10 genes, most frequent first
    pub top_genes: Vec<(String, usize)>,
    pub impact_distribution: Vec<(String, usize)>,
    pub clinical_significance_distribution: Vec<(String, usize)>,
    /// Variants in the 30 days before "today", divided by 30
    pub recent_daily_average: f64,
}

impl DataSummary {
    /// Plain-text block embedded in the analysis prompt.
    pub fn to_prompt_text(&self) -> String {
        if self.total_variants == 0 {
            return "No data available for analysis".to_string();
        }

        let fmt_date = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
        let mut out = String::new();
        let _ = writeln!(out, "Historical Data Summary:");
        let _ = writeln!(out, "- Total variants analyzed: {}", self.total_variants);
        let _ = writeln!(
            out,
            "- Date range: {} to {}",
            fmt_date(self.first_date),
            fmt_date(self.last_date)
        );
        let _ = writeln!(out, "- Daily average variants: {:.1}", self.daily_average);
        write_distribution(&mut out, "Top Genes by Frequency", &self.top_genes);
        write_distribution(&mut out, "Impact Distribution", &self.impact_distribution);
        write_distribution(
            &mut out,
            "Clinical Significance Distribution",
            &self.clinical_significance_distribution,
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "Recent Trends (last 30 days):");
        let _ = writeln!(
            out,
            "- Average daily variants: {:.1}",
            self.recent_daily_average
        );
        out
    }
}

fn write_distribution(out: &mut String, heading: &str, entries: &[(String, usize)]) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{heading}:");
    if entries.is_empty() {
        let _ = writeln!(out, "- none");
    }
    for (label, count) in entries {
        let _ = writeln!(out, "- {label}: {count}");
    }
}

/// Structured insights returned by the AI analyst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    #[serde(default)]
    pub key_trends: Vec<String>,
    #[serde(default)]
    pub significant_genes: Vec<String>,
    #[serde(default)]
    pub clinical_patterns: Vec<String>,
    #[serde(default)]
    pub drug_implications: Vec<String>,
    #[serde(default = "unknown_risk")]
    pub risk_assessment: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

fn unknown_risk() -> String {
    "unknown".to_string()
}

impl TrendAnalysis {
    /// Returned whenever the analyst fails or answers with something that
    /// is not the expected JSON object.
    pub fn fallback() -> Self {
        Self {
            key_trends: vec!["Analysis completed but formatting issue occurred".into()],
            significant_genes: Vec::new(),
            clinical_patterns: Vec::new(),
            drug_implications: Vec::new(),
            risk_assessment: "Unable to assess".into(),
            recommendations: vec!["Review data manually".into()],
        }
    }
}

/// Charts attached to a trend prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendCharts {
    pub trend_chart: ChartSpec,
    pub gene_chart: ChartSpec,
}

/// Full output of `VariantInsights::predict_variant_trends`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPrediction {
    pub id: uuid::Uuid,
    pub created_at: DateTime<Utc>,
    pub horizon_days: u32,
    pub forecast: Forecast,
    /// `None` when no analyst is configured
    pub analysis: Option<TrendAnalysis>,
    pub charts: TrendCharts,
    pub confidence_score: f64,
    pub total_variants_analyzed: usize,
}
