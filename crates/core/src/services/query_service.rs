use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::query::StructuredQuery;
use crate::providers::traits::{GenerationParams, TextGenerator};
use super::json_reply;

const PARSE_TEMPERATURE: f32 = 0.1;
const SUGGEST_TEMPERATURE: f32 = 0.5;

/// Most suggestions returned by `suggest_queries`.
pub const MAX_SUGGESTIONS: usize = 5;

/// Turns natural-language searches over the variant catalog into filter
/// criteria, and proposes completions for partial searches.
///
/// Never fails: a search that cannot be translated degrades to a keyword
/// search, and failed suggestions are an empty list.
pub struct QueryService {
    generator: Arc<dyn TextGenerator>,
    params: GenerationParams,
}

impl QueryService {
    pub fn new(generator: Arc<dyn TextGenerator>, params: GenerationParams) -> Self {
        Self { generator, params }
    }

    pub async fn parse_query(&self, query: &str, available_fields: &[&str]) -> StructuredQuery {
        let params = GenerationParams {
            temperature: PARSE_TEMPERATURE,
            ..self.params
        };
        let result = self
            .generator
            .generate_text(&Self::query_prompt(query, available_fields), params)
            .await
            .and_then(|text| json_reply::parse_object::<StructuredQuery>(&text));

        match result {
            Ok(parsed) => {
                info!(filters = parsed.filters.len(), "natural-language query parsed");
                parsed
            }
            Err(e) => {
                warn!(error = %e, "query not understood, falling back to keyword search");
                StructuredQuery::keyword_fallback(query, e)
            }
        }
    }

    /// Up to five completions of `partial`; `context` is passed to the model
    /// verbatim.
    pub async fn suggest_queries(&self, partial: &str, context: &Value) -> Vec<String> {
        let params = GenerationParams {
            temperature: SUGGEST_TEMPERATURE,
            ..self.params
        };
        let result = self
            .generator
            .generate_text(&Self::suggest_prompt(partial, context), params)
            .await
            .and_then(|text| json_reply::parse_array::<Value>(&text));

        match result {
            Ok(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) if !s.trim().is_empty() => Some(s),
                    _ => None,
                })
                .take(MAX_SUGGESTIONS)
                .collect(),
            Err(e) => {
                warn!(error = %e, "query suggestions unavailable");
                Vec::new()
            }
        }
    }

    // ── Prompts ─────────────────────────────────────────────────────

    pub fn query_prompt(query: &str, available_fields: &[&str]) -> String {
        let fields = serde_json::to_string_pretty(available_fields).unwrap_or_default();
        format!(
            "You are a database query assistant for a genetic variant database.\n\
             \n\
             User Query: \"{query}\"\n\
             \n\
             Available Fields:\n\
             {fields}\n\
             \n\
             Convert this natural language query into structured filter criteria.\n\
             \n\
             Common filter patterns:\n\
             - \"pathogenic variants\" -> clinical_significance in [pathogenic, likely_pathogenic]\n\
             - \"BRCA genes\" -> gene_symbol in [BRCA1, BRCA2]\n\
             - \"rare variants\" -> gnomad_af lt 0.01\n\
             - \"high impact\" -> impact exact HIGH\n\
             \n\
             Return JSON with this structure:\n\
             {{\n\
             \x20   \"filters\": {{\"field_name\": {{\"operator\": \"exact|contains|in|lt|gt|lte|gte\", \"value\": \"value or array\"}}}},\n\
             \x20   \"search_terms\": [\"list of search terms\"],\n\
             \x20   \"ordering\": [\"field_name\", \"-field_name\"],\n\
             \x20   \"interpretation\": \"what the query means in plain language\"\n\
             }}\n\
             \n\
             Only include filters you are confident about."
        )
    }

    pub fn suggest_prompt(partial: &str, context: &Value) -> String {
        let context = serde_json::to_string_pretty(context).unwrap_or_default();
        format!(
            "Suggest {MAX_SUGGESTIONS} natural language query completions for a genetic \
             variant database search.\n\
             \n\
             Partial Query: \"{partial}\"\n\
             \n\
             Context: {context}\n\
             \n\
             Suggestions should complete the user's thought and be specific and \
             actionable.\n\
             \n\
             Return as a JSON array of strings."
        )
    }
}
