use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Comparison applied by a [`FieldFilter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    #[default]
    Exact,
    Contains,
    In,
    Lt,
    Gt,
    Lte,
    Gte,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    #[serde(default)]
    pub operator: FilterOperator,
    /// Scalar, or an array for `in`
    pub value: Value,
}

/// A natural-language search turned into filter criteria.
///
/// When the model's answer cannot be used, `filters` is empty,
/// `search_terms` holds the query's words and `error` says why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredQuery {
    #[serde(default)]
    pub filters: BTreeMap<String, FieldFilter>,
    #[serde(default)]
    pub search_terms: Vec<String>,
    /// Field names, `-` prefixed for descending
    #[serde(default)]
    pub ordering: Vec<String>,
    #[serde(default)]
    pub interpretation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StructuredQuery {
    pub fn keyword_fallback(query: &str, error: impl ToString) -> Self {
        Self {
            filters: BTreeMap::new(),
            search_terms: query.split_whitespace().map(str::to_string).collect(),
            ordering: Vec::new(),
            interpretation: "Unable to parse query".to_string(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}
