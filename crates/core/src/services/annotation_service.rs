use std::sync::Arc;
use tracing::info;

use crate::errors::CoreError;
use crate::models::interpretation::LiteratureContext;
use crate::models::variant::VariantRecord;
use crate::providers::traits::{GenerationParams, TextGenerator};
use super::interpretation_service::or_unknown;
use super::json_reply;

const ANNOTATION_TEMPERATURE: f32 = 0.3;

/// Research-oriented annotations: literature context and pathway roles.
pub struct AnnotationService {
    generator: Arc<dyn TextGenerator>,
    params: GenerationParams,
}

impl AnnotationService {
    pub fn new(generator: Arc<dyn TextGenerator>, params: GenerationParams) -> Self {
        Self {
            generator,
            params: GenerationParams {
                temperature: ANNOTATION_TEMPERATURE,
                ..params
            },
        }
    }

    /// Known associations, findings, pathways and open questions.
    ///
    /// An answer that is not the requested JSON object is an error.
    pub async fn literature_context(
        &self,
        variant: &VariantRecord,
    ) -> Result<LiteratureContext, CoreError> {
        let text = self
            .generator
            .generate_text(&Self::literature_prompt(variant), self.params)
            .await?;
        let context: LiteratureContext = json_reply::parse_object(&text)?;
        info!(
            pathways = context.pathways.len(),
            associations = context.associations.len(),
            "literature context received"
        );
        Ok(context)
    }

    /// Free-text explanation of the pathways the variant's gene acts in.
    pub async fn pathway_analysis(&self, variant: &VariantRecord) -> Result<String, CoreError> {
        self.generator
            .generate_text(&Self::pathway_prompt(variant), self.params)
            .await
    }

    pub fn literature_prompt(variant: &VariantRecord) -> String {
        format!(
            "You are a genomics researcher. Provide literature-based context for this \
             variant:\n\
             \n\
             Variant: {locus}\n\
             Gene: {gene}\n\
             Consequence: {consequence}\n\
             \n\
             Format as JSON with:\n\
             - associations: array of known associations\n\
             - research_findings: array of key research findings\n\
             - pathways: array of biological pathways involved\n\
             - disease_associations: array of disease associations\n\
             - research_gaps: array of areas needing more research\n\
             - summary: brief summary paragraph",
            locus = variant.locus(),
            gene = or_unknown(variant.gene.as_deref()),
            consequence = or_unknown(variant.consequence.as_deref()),
        )
    }

    pub fn pathway_prompt(variant: &VariantRecord) -> String {
        format!(
            "Analyze the role of this variant in biological pathways:\n\
             \n\
             Variant: {locus}\n\
             Gene: {gene}\n\
             Consequence: {consequence}\n\
             \n\
             Explain which pathways the gene affects, how the variant changes pathway \
             function, the downstream effects and the therapeutic implications.",
            locus = variant.locus(),
            gene = or_unknown(variant.gene.as_deref()),
            consequence = or_unknown(variant.consequence.as_deref()),
        )
    }
}
