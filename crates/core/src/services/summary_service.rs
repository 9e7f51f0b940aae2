use chrono::{Days, NaiveDate};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

use crate::models::dataset::ChartableDataset;
use crate::models::insights::DataSummary;
use crate::models::variant::VariantRecord;

/// Window for the "recent trends" line of the summary.
const RECENT_WINDOW_DAYS: u64 = 30;

/// Genes listed in the summary and the gene frequency chart.
pub const TOP_GENES: usize = 10;

/// Records considered by the statistics dataset.
const STATISTICS_RECORD_LIMIT: usize = 1000;

/// Genes kept in the statistics dataset.
const STATISTICS_GENE_LIMIT: usize = 20;

/// Aggregates variant history into summaries and chartable datasets.
#[derive(Debug, Clone, Default)]
pub struct SummaryService;

impl SummaryService {
    pub fn new() -> Self {
        Self
    }

    /// Summarise `records` as seen on `today`.
    pub fn summarize(&self, records: &[VariantRecord], today: NaiveDate) -> DataSummary {
        let distinct_days: BTreeSet<NaiveDate> = records.iter().map(|r| r.date).collect();
        let daily_average = if distinct_days.is_empty() {
            0.0
        } else {
            records.len() as f64 / distinct_days.len() as f64
        };

        let recent_start = today
            .checked_sub_days(Days::new(RECENT_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MIN);
        let recent = records.iter().filter(|r| r.date >= recent_start).count();

        let mut top_genes = ranked_counts(records.iter().filter_map(|r| r.gene.as_deref()));
        top_genes.truncate(TOP_GENES);

        DataSummary {
            total_variants: records.len(),
            first_date: distinct_days.first().copied(),
            last_date: distinct_days.last().copied(),
            daily_average,
            top_genes,
            impact_distribution: ranked_counts(records.iter().filter_map(|r| r.impact.as_deref())),
            clinical_significance_distribution: ranked_counts(
                records
                    .iter()
                    .filter_map(|r| r.clinical_significance.as_deref()),
            ),
            recent_daily_average: recent as f64 / RECENT_WINDOW_DAYS as f64,
        }
    }

    /// Step function of the amount of history behind a prediction.
    pub fn confidence_score(record_count: usize) -> f64 {
        match record_count {
            0..=13 => 0.3,
            14..=29 => 0.6,
            30..=89 => 0.8,
            _ => 0.9,
        }
    }

    /// Impact, gene and chromosome counts over the first 1000 records,
    /// shaped for the chart recommender.
    ///
    /// Labels keep first-seen order; genes are capped at 20.
    pub fn variant_statistics_dataset(&self, records: &[VariantRecord]) -> ChartableDataset {
        let sample = &records[..records.len().min(STATISTICS_RECORD_LIMIT)];

        let impacts = first_seen_counts(sample.iter().filter_map(|r| r.impact.as_deref()));
        let mut genes = first_seen_counts(sample.iter().filter_map(|r| r.gene.as_deref()));
        genes.truncate(STATISTICS_GENE_LIMIT);
        let chromosomes = first_seen_counts(
            sample
                .iter()
                .map(|r| r.chromosome.as_str())
                .filter(|c| !c.is_empty()),
        );

        let mut dataset = ChartableDataset::new();
        for (label_field, count_field, counts) in [
            ("impacts", "impact_counts", impacts),
            ("genes", "gene_counts", genes),
            ("chromosomes", "chromosome_counts", chromosomes),
        ] {
            let (labels, values): (Vec<Value>, Vec<Value>) = counts
                .into_iter()
                .map(|(label, count)| (Value::from(label), Value::from(count)))
                .unzip();
            dataset.insert(label_field, labels);
            dataset.insert(count_field, values);
        }
        dataset
    }
}

/// Frequency table, most frequent first; ties ordered by label.
pub(crate) fn ranked_counts<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// Frequency table in first-seen order.
fn first_seen_counts<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        match index.get(label) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(label, order.len());
                order.push((label.to_string(), 1));
            }
        }
    }
    order
}
