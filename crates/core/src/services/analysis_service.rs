use std::sync::Arc;
use tracing::{info, warn};

use crate::errors::CoreError;
use crate::models::insights::{DataSummary, TrendAnalysis};
use crate::providers::traits::{GenerationParams, TextGenerator};
use super::json_reply;

/// Asks a generative-AI provider for qualitative insights on the variant
/// history.
///
/// Never fails: provider errors and unparseable answers both degrade to
/// `TrendAnalysis::fallback()`.
pub struct AnalysisService {
    generator: Arc<dyn TextGenerator>,
    params: GenerationParams,
}

impl AnalysisService {
    pub fn new(generator: Arc<dyn TextGenerator>, params: GenerationParams) -> Self {
        Self { generator, params }
    }

    pub fn provider_name(&self) -> &str {
        self.generator.name()
    }

    pub async fn analyze(&self, summary: &DataSummary) -> TrendAnalysis {
        let prompt = Self::build_prompt(summary);
        let result = self
            .generator
            .generate_text(&prompt, self.params)
            .await
            .and_then(|text| Self::parse_analysis(&text));

        match result {
            Ok(analysis) => {
                info!(provider = self.generator.name(), "trend analysis received");
                analysis
            }
            Err(e) => {
                warn!(provider = self.generator.name(), error = %e, "trend analysis unavailable, using fallback");
                TrendAnalysis::fallback()
            }
        }
    }

    pub fn build_prompt(summary: &DataSummary) -> String {
        format!(
            "Analyze the following cancer variant data trends and provide insights in JSON format:\n\
             \n\
             {}\n\
             Provide a JSON response with these keys:\n\
             - key_trends: array of 3-5 key trends\n\
             - significant_genes: array of top 5 genes showing increased variant frequency\n\
             - clinical_patterns: array of clinical significance patterns observed\n\
             - drug_implications: array of drug response implications\n\
             - risk_assessment: string describing risk level (low/medium/high)\n\
             - recommendations: array of 3-5 recommendations for monitoring\n\
             \n\
             Return ONLY valid JSON, no markdown or extra text.",
            summary.to_prompt_text()
        )
    }

    /// Parse the JSON object spanning the first `{` to the last `}` of
    /// `text`.
    pub fn parse_analysis(text: &str) -> Result<TrendAnalysis, CoreError> {
        json_reply::parse_object(text)
    }
}
