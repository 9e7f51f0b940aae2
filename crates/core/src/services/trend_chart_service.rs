use serde_json::Value;

use crate::models::chart::{ChartSpec, LineStyle, Trace};
use crate::models::forecast::{DailyCount, Forecast};
use crate::models::insights::TrendCharts;
use crate::models::variant::VariantRecord;
use crate::services::summary_service::{ranked_counts, TOP_GENES};

/// Builds the two charts that accompany a trend prediction:
/// - historical daily counts with the forecast overlaid
/// - the most frequent genes in the history
#[derive(Debug, Clone, Default)]
pub struct TrendChartService;

impl TrendChartService {
    pub fn new() -> Self {
        Self
    }

    pub fn trend_charts(
        &self,
        daily: &[DailyCount],
        forecast: &Forecast,
        records: &[VariantRecord],
    ) -> TrendCharts {
        TrendCharts {
            trend_chart: self.trend_chart(daily, forecast),
            gene_chart: self.gene_chart(records),
        }
    }

    pub fn trend_chart(&self, daily: &[DailyCount], forecast: &Forecast) -> ChartSpec {
        let historical = Trace::Scatter {
            x: daily.iter().map(|d| Value::from(d.date.to_string())).collect(),
            y: daily.iter().map(|d| Value::from(d.count)).collect(),
            mode: "lines+markers".to_string(),
            name: "Historical Data".to_string(),
            line: Some(LineStyle {
                color: "blue".to_string(),
                dash: None,
            }),
        };

        let predicted = Trace::Scatter {
            x: forecast
                .future_dates
                .iter()
                .map(|d| Value::from(d.to_string()))
                .collect(),
            y: forecast
                .predicted_counts
                .iter()
                .map(|&c| Value::from(c))
                .collect(),
            mode: "lines".to_string(),
            name: "Predictions".to_string(),
            line: Some(LineStyle {
                color: "red".to_string(),
                dash: Some("dash".to_string()),
            }),
        };

        ChartSpec::new("Cancer Variant Discovery Trends")
            .with_axes("Date", "Number of Variants")
            .with_trace(historical)
            .with_trace(predicted)
    }

    pub fn gene_chart(&self, records: &[VariantRecord]) -> ChartSpec {
        let mut genes = ranked_counts(records.iter().filter_map(|r| r.gene.as_deref()));
        genes.truncate(TOP_GENES);
        let (x, y): (Vec<Value>, Vec<Value>) = genes
            .into_iter()
            .map(|(gene, count)| (Value::from(gene), Value::from(count)))
            .unzip();

        ChartSpec::new("Top 10 Genes by Variant Frequency")
            .with_axes("Gene", "Variant Count")
            .with_trace(Trace::Bar {
                x,
                y,
                name: "Variant Count".to_string(),
            })
    }
}
