use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::math::stats::pearson;
use crate::models::analysis::{FieldAnalysis, FieldKind, NestedFieldHint, ValueRange};
use crate::models::chart::{
    ChartOutcome, ChartPayload, ChartRecommendation, ChartRequest, ChartSpec, ChartType, Trace,
};
use crate::models::dataset::ChartableDataset;
use crate::models::settings::ChartSettings;

/// Picks chart types for an arbitrary field → values mapping and builds
/// renderable chart specifications for them.
///
/// All numbers are computed here; the frontend only renders.
/// Field types are inferred from the first `sample_size` values only; a
/// field that changes type after the sample window is classified by its
/// sample.
#[derive(Debug, Clone, Default)]
pub struct ChartService {
    settings: ChartSettings,
}

impl ChartService {
    pub fn new(settings: ChartSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    /// Parse `requested` ("auto" or a chart type name) and build the charts.
    ///
    /// Unknown type names fall back to a bar chart.
    pub fn recommend_charts(
        &self,
        dataset: &ChartableDataset,
        requested: &str,
    ) -> ChartRecommendation {
        let request = requested.parse().unwrap_or_else(|_| {
            warn!(requested, "unknown chart type requested, falling back to bar");
            ChartRequest::Specific(ChartType::Bar)
        });
        self.recommend(dataset, request)
    }

    /// Build every recommended (or the one requested) chart.
    ///
    /// Each chart is built independently; a chart that lacks the fields it
    /// needs is reported inline and does not affect the others.
    pub fn recommend(
        &self,
        dataset: &ChartableDataset,
        request: ChartRequest,
    ) -> ChartRecommendation {
        let analysis = self.analyze_fields(dataset);
        let types = match request {
            ChartRequest::Auto => self.recommend_types(&analysis),
            ChartRequest::Specific(t) => vec![t],
        };

        let charts: BTreeMap<ChartType, ChartOutcome> = types
            .into_iter()
            .map(|t| (t, self.build_chart(dataset, t, &analysis).into()))
            .collect();

        let failed = charts.values().filter(|c| !c.is_rendered()).count();
        debug!(
            fields = dataset.len(),
            charts = charts.len(),
            failed,
            "chart recommendation built"
        );

        ChartRecommendation {
            charts,
            textual_recommendations: Self::textual_recommendations(&analysis),
            field_analysis: analysis,
        }
    }

    // ── Field classification ────────────────────────────────────────

    /// Classify every field from its leading sample, in insertion order.
    pub fn analyze_fields(&self, dataset: &ChartableDataset) -> FieldAnalysis {
        let mut analysis = FieldAnalysis::default();

        for field in dataset.fields() {
            if field.values.is_empty() {
                continue;
            }
            let name = field.name.clone();
            analysis.dimensions.insert(name.clone(), field.values.len());

            let sample = &field.values[..self.settings.sample_size.min(field.values.len())];
            let Some(kind) = classify_sample(sample) else {
                debug!(field = %name, "field left unclassified (mixed sample)");
                continue;
            };
            analysis.data_types.insert(name.clone(), kind);

            match kind {
                FieldKind::Numeric => {
                    if let Some(range) = value_range(&field.values) {
                        analysis.value_ranges.insert(name.clone(), range);
                    }
                    analysis.numeric_fields.push(name);
                }
                FieldKind::Categorical => {
                    // Date strings stay categorical; they are additionally
                    // offered as a time axis.
                    if sample.iter().filter_map(Value::as_str).all(is_temporal) {
                        analysis.temporal_fields.push(name.clone());
                    }
                    analysis.categorical_fields.push(name);
                }
                FieldKind::Complex => {
                    let nested: BTreeSet<String> = sample
                        .iter()
                        .filter_map(Value::as_object)
                        .flat_map(|obj| obj.keys().cloned())
                        .collect();
                    analysis.relationships.push(NestedFieldHint {
                        field: name.clone(),
                        nested_fields: nested.into_iter().collect(),
                    });
                    analysis.complex_fields.push(name);
                }
            }
        }

        analysis
    }

    // ── Recommendation policy ───────────────────────────────────────

    /// Ordered, capped list of chart types suited to `analysis`.
    pub fn recommend_types(&self, analysis: &FieldAnalysis) -> Vec<ChartType> {
        let numeric = analysis.numeric_fields.len();
        let categorical = analysis.categorical_fields.len();
        let mut types = Vec::new();

        if !analysis.temporal_fields.is_empty() {
            types.push(ChartType::Line);
        }
        if categorical > 0 {
            types.push(ChartType::Bar);
        }
        if categorical == 1 && numeric >= 1 {
            types.push(ChartType::Pie);
        }
        if numeric >= 2 {
            types.push(ChartType::Scatter);
        }
        if numeric >= 3 {
            types.push(ChartType::Heatmap);
        }
        if types.is_empty() {
            types.push(ChartType::Bar);
        }

        types.truncate(self.settings.max_recommendations);
        types
    }

    /// Advice strings shown next to the charts.
    pub fn textual_recommendations(analysis: &FieldAnalysis) -> Vec<String> {
        let mut out = Vec::new();
        if !analysis.temporal_fields.is_empty() {
            out.push("Consider time-series analysis for temporal trends".to_string());
        }
        if !analysis.categorical_fields.is_empty() {
            out.push("Use bar or pie charts for categorical data distributions".to_string());
        }
        if analysis.numeric_fields.len() >= 2 {
            out.push(
                "Explore scatter plots to identify relationships between variables".to_string(),
            );
        }
        if analysis.numeric_fields.len() >= 3 {
            out.push("Consider correlation analysis and heatmaps".to_string());
        }
        if !analysis.relationships.is_empty() {
            out.push(
                "Nested data structures may benefit from hierarchical visualizations".to_string(),
            );
        }
        out
    }

    // ── Chart construction ──────────────────────────────────────────

    pub fn build_chart(
        &self,
        dataset: &ChartableDataset,
        chart_type: ChartType,
        analysis: &FieldAnalysis,
    ) -> Result<ChartPayload, CoreError> {
        match chart_type {
            ChartType::Bar => bar_chart(dataset, analysis),
            ChartType::Pie => pie_chart(dataset, analysis),
            ChartType::Line => line_chart(dataset, analysis),
            ChartType::Scatter => scatter_chart(dataset, analysis),
            ChartType::Heatmap => self.heatmap_chart(dataset, analysis),
        }
    }

    /// Pearson correlation matrix over the first `heatmap_field_limit`
    /// numeric fields.
    ///
    /// Fields holding any non-number are skipped. Ragged input is aligned on
    /// the most common length (ties go to the length seen first); fields of
    /// any other length are left out.
    fn heatmap_chart(
        &self,
        dataset: &ChartableDataset,
        analysis: &FieldAnalysis,
    ) -> Result<ChartPayload, CoreError> {
        let candidates: Vec<(&str, Vec<f64>)> = analysis
            .numeric_fields
            .iter()
            .take(self.settings.heatmap_field_limit)
            .filter_map(|name| {
                let numbers = dataset
                    .get(name)?
                    .iter()
                    .map(Value::as_f64)
                    .collect::<Option<Vec<f64>>>()?;
                Some((name.as_str(), numbers))
            })
            .collect();

        let mut length_counts: Vec<(usize, usize)> = Vec::new();
        for (_, numbers) in &candidates {
            match length_counts.iter_mut().find(|(len, _)| *len == numbers.len()) {
                Some((_, count)) => *count += 1,
                None => length_counts.push((numbers.len(), 1)),
            }
        }
        // max_by_key keeps the last maximum; reverse so the first seen wins
        let aligned_len = length_counts
            .iter()
            .rev()
            .max_by_key(|(_, count)| *count)
            .map(|(len, _)| *len);

        let columns: Vec<(&str, Vec<f64>)> = candidates
            .into_iter()
            .filter(|(_, numbers)| Some(numbers.len()) == aligned_len)
            .collect();

        if columns.len() < 2 {
            return Err(CoreError::insufficient_fields(
                ChartType::Heatmap,
                "need at least two numeric fields of equal length",
            ));
        }

        let n = columns.len();
        let mut matrix = vec![vec![0.0; n]; n];
        for i in 0..n {
            matrix[i][i] = 1.0;
            for j in (i + 1)..n {
                let r = pearson(&columns[i].1, &columns[j].1).unwrap_or(0.0);
                matrix[i][j] = r;
                matrix[j][i] = r;
            }
        }

        let labels: Vec<String> = columns.iter().map(|(name, _)| name.to_string()).collect();
        let spec = ChartSpec::new("Correlation Heatmap").with_trace(Trace::Heatmap {
            z: matrix,
            x: labels.clone(),
            y: labels,
            colorscale: "RdBu".to_string(),
            zmid: 0.0,
            zmin: -1.0,
            zmax: 1.0,
        });

        Ok(ChartPayload {
            chart_type: ChartType::Heatmap,
            spec,
            description: "Heatmap showing correlations between numerical variables".to_string(),
        })
    }
}

fn bar_chart(dataset: &ChartableDataset, analysis: &FieldAnalysis) -> Result<ChartPayload, CoreError> {
    let (cat, num) = category_and_measure(analysis, ChartType::Bar)?;
    let (cat_title, num_title) = (title_case(cat), title_case(num));

    let spec = ChartSpec::new(format!("{num_title} by {cat_title}"))
        .with_axes(cat_title, num_title.clone())
        .with_trace(Trace::Bar {
            x: column(dataset, cat),
            y: column(dataset, num),
            name: num_title,
        });

    Ok(ChartPayload {
        chart_type: ChartType::Bar,
        spec,
        description: format!("Bar chart showing {num} distribution across {cat} categories"),
    })
}

fn pie_chart(dataset: &ChartableDataset, analysis: &FieldAnalysis) -> Result<ChartPayload, CoreError> {
    let (cat, num) = category_and_measure(analysis, ChartType::Pie)?;
    let num_title = title_case(num);

    let spec = ChartSpec::new(format!("{num_title} Distribution")).with_trace(Trace::Pie {
        labels: column(dataset, cat),
        values: column(dataset, num),
        title: num_title,
    });

    Ok(ChartPayload {
        chart_type: ChartType::Pie,
        spec,
        description: format!("Pie chart showing proportional distribution of {num} by {cat}"),
    })
}

fn line_chart(dataset: &ChartableDataset, analysis: &FieldAnalysis) -> Result<ChartPayload, CoreError> {
    let x_field = analysis
        .temporal_fields
        .iter()
        .map(String::as_str)
        .find(|f| dataset.get(f).is_some())
        .or_else(|| dataset.field_names().next());
    let y_field = analysis.numeric_fields.first().map(String::as_str);

    let (Some(x), Some(y)) = (x_field, y_field) else {
        return Err(CoreError::insufficient_fields(
            ChartType::Line,
            "need an x-axis field and a numeric field",
        ));
    };
    let (x_title, y_title) = (title_case(x), title_case(y));

    let spec = ChartSpec::new(format!("{y_title} Over Time"))
        .with_axes(x_title, y_title.clone())
        .with_trace(Trace::Scatter {
            x: column(dataset, x),
            y: column(dataset, y),
            mode: "lines+markers".to_string(),
            name: y_title,
            line: None,
        });

    Ok(ChartPayload {
        chart_type: ChartType::Line,
        spec,
        description: format!("Line chart showing {y} trends over {x}"),
    })
}

fn scatter_chart(
    dataset: &ChartableDataset,
    analysis: &FieldAnalysis,
) -> Result<ChartPayload, CoreError> {
    let [x, y, ..] = analysis.numeric_fields.as_slice() else {
        return Err(CoreError::insufficient_fields(
            ChartType::Scatter,
            "need at least two numeric fields",
        ));
    };
    let (x_title, y_title) = (title_case(x), title_case(y));

    let spec = ChartSpec::new(format!("{y_title} vs {x_title}"))
        .with_axes(x_title, y_title)
        .with_trace(Trace::Scatter {
            x: column(dataset, x),
            y: column(dataset, y),
            mode: "markers".to_string(),
            name: format!("{x} vs {y}"),
            line: None,
        });

    Ok(ChartPayload {
        chart_type: ChartType::Scatter,
        spec,
        description: format!("Scatter plot showing relationship between {x} and {y}"),
    })
}

// ── Helpers ─────────────────────────────────────────────────────────

/// First categorical and first numeric field, as bar and pie charts pair them.
fn category_and_measure(
    analysis: &FieldAnalysis,
    chart_type: ChartType,
) -> Result<(&str, &str), CoreError> {
    match (
        analysis.categorical_fields.first(),
        analysis.numeric_fields.first(),
    ) {
        (Some(cat), Some(num)) => Ok((cat.as_str(), num.as_str())),
        _ => Err(CoreError::insufficient_fields(
            chart_type,
            "need at least one categorical and one numeric field",
        )),
    }
}

fn column(dataset: &ChartableDataset, name: &str) -> Vec<Value> {
    dataset.get(name).map(<[Value]>::to_vec).unwrap_or_default()
}

fn classify_sample(sample: &[Value]) -> Option<FieldKind> {
    if sample.is_empty() {
        return None;
    }
    if sample.iter().all(Value::is_number) {
        return Some(FieldKind::Numeric);
    }
    if sample.iter().all(Value::is_string) {
        return Some(FieldKind::Categorical);
    }
    if sample.iter().all(Value::is_object) {
        return Some(FieldKind::Complex);
    }
    None
}

/// ISO-8601 date, naive datetime, or RFC 3339 timestamp.
fn is_temporal(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").is_ok()
        || DateTime::parse_from_rfc3339(s).is_ok()
}

/// Range over the whole sequence; values outside the sample that are not
/// numbers are skipped.
fn value_range(values: &[Value]) -> Option<ValueRange> {
    let numbers: Vec<f64> = values.iter().filter_map(Value::as_f64).collect();
    if numbers.is_empty() {
        return None;
    }
    let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
    let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = numbers.iter().sum::<f64>() / numbers.len() as f64;
    Some(ValueRange { min, max, mean })
}

/// "gene_count" → "Gene_Count": upper-case the first letter of each run of
/// letters, lower-case the rest.
pub(crate) fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
