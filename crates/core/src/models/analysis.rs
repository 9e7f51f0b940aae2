use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Classification of a dataset field, inferred from a small sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Numeric,
    Categorical,
    Complex,
}

/// Min/max/mean of a numeric field over its whole sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Sub-keys seen in the sampled records of a complex field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedFieldHint {
    pub field: String,
    pub nested_fields: Vec<String>,
}

/// Per-field classification used to pick and build charts.
///
/// The `*_fields` lists keep dataset insertion order. Fields whose sample
/// is mixed or empty appear in none of them. `temporal_fields` is a subset
/// of `categorical_fields`: string fields whose sample is all dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldAnalysis {
    pub data_types: BTreeMap<String, FieldKind>,
    pub dimensions: BTreeMap<String, usize>,
    pub value_ranges: BTreeMap<String, ValueRange>,
    pub numeric_fields: Vec<String>,
    pub categorical_fields: Vec<String>,
    pub temporal_fields: Vec<String>,
    pub complex_fields: Vec<String>,
    pub relationships: Vec<NestedFieldHint>,
}

impl FieldAnalysis {
    pub fn kind_of(&self, field: &str) -> Option<FieldKind> {
        self.data_types.get(field).copied()
    }
}
