use chrono::Utc;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::interpretation::{PatientSummary, VariantInterpretation, VariantSummaryReport};
use crate::models::variant::VariantRecord;
use crate::providers::traits::{GenerationParams, TextGenerator};
use super::json_reply;

const SUMMARY_TEMPERATURE: f32 = 0.3;
const CLINICAL_TEMPERATURE: f32 = 0.2;
const PATIENT_TEMPERATURE: f32 = 0.4;

pub const NO_CLINICAL_DATA: &str = "No clinical significance data available for this variant.";

/// Generative-AI interpretation of single variants, for clinicians and
/// for patients.
///
/// Provider failures are returned as errors. Answers that are not the
/// requested JSON are kept as free text instead.
pub struct InterpretationService {
    generator: Arc<dyn TextGenerator>,
    params: GenerationParams,
}

impl InterpretationService {
    pub fn new(generator: Arc<dyn TextGenerator>, params: GenerationParams) -> Self {
        Self { generator, params }
    }

    fn params(&self, temperature: f32) -> GenerationParams {
        GenerationParams {
            temperature,
            ..self.params
        }
    }

    /// Structured clinical interpretation of `variant`.
    pub async fn summarize_variant(
        &self,
        variant: &VariantRecord,
    ) -> Result<VariantSummaryReport, CoreError> {
        let text = self
            .generator
            .generate_text(
                &Self::summary_prompt(variant),
                self.params(SUMMARY_TEMPERATURE),
            )
            .await?;

        let interpretation = json_reply::parse_object(&text).unwrap_or_else(|e| {
            debug!(error = %e, "variant interpretation was not JSON, keeping free text");
            VariantInterpretation::from_unstructured(&text)
        });

        Ok(VariantSummaryReport {
            variant_id: variant.variant_id.clone(),
            generated_at: Utc::now(),
            interpretation,
        })
    }

    /// Plain-prose explanation of the clinical significance for clinicians.
    ///
    /// Variants without a clinical significance call get a fixed answer
    /// and never reach the provider.
    pub async fn explain_clinical_significance(
        &self,
        variant: &VariantRecord,
    ) -> Result<String, CoreError> {
        if variant.clinical_significance.is_none() {
            return Ok(NO_CLINICAL_DATA.to_string());
        }
        self.generator
            .generate_text(
                &Self::clinical_prompt(variant),
                self.params(CLINICAL_TEMPERATURE),
            )
            .await
    }

    /// Jargon-free explanation written for the patient.
    pub async fn patient_summary(&self, variant: &VariantRecord) -> Result<PatientSummary, CoreError> {
        let text = self
            .generator
            .generate_text(
                &Self::patient_prompt(variant),
                self.params(PATIENT_TEMPERATURE),
            )
            .await?;

        Ok(json_reply::parse_object(&text).unwrap_or_else(|e| {
            warn!(error = %e, "patient summary was not JSON, keeping free text");
            PatientSummary::from_unstructured(&text)
        }))
    }

    // ── Prompts ─────────────────────────────────────────────────────

    pub fn summary_prompt(variant: &VariantRecord) -> String {
        let gnomad = variant
            .gnomad_af
            .map(|af| af.to_string())
            .unwrap_or_else(|| "Not available".to_string());

        format!(
            "You are a genetic counselor and variant interpretation expert. Analyze the \
             following genetic variant and provide an accurate summary.\n\
             \n\
             Variant Information:\n\
             {locus}\
             - Consequence: {consequence}\n\
             - Impact: {impact}\n\
             - gnomAD Frequency: {gnomad}\n\
             \n\
             Clinical Significance:\n\
             {clinical}\n\
             \n\
             Drug Responses:\n\
             {drugs}\n\
             \n\
             Format your response as JSON with these keys:\n\
             - summary: brief overview (2-3 sentences)\n\
             - functional_impact: explanation of the functional impact\n\
             - clinical_interpretation: clinical significance explanation\n\
             - population_context: population frequency context\n\
             - drug_implications: drug response implications\n\
             - key_points: array of 3-5 key points for clinicians\n\
             - confidence_level: confidence in the interpretation (high/medium/low)\n\
             \n\
             Be accurate and evidence-based, and use accessible language.",
            locus = locus_block(variant),
            consequence = or_unknown(variant.consequence.as_deref()),
            impact = or_unknown(variant.impact.as_deref()),
            clinical = clinical_block(variant),
            drugs = drug_block(variant),
        )
    }

    pub fn clinical_prompt(variant: &VariantRecord) -> String {
        format!(
            "Explain the clinical significance of this variant in plain language for \
             healthcare providers:\n\
             \n\
             Variant: {locus}\n\
             Gene: {gene}\n\
             \n\
             Clinical Significance:\n\
             {clinical}\n\
             \n\
             Cover what the classification means, how confident it is, what it means for \
             patient care, and any caveats.",
            locus = variant.locus(),
            gene = or_unknown(variant.gene.as_deref()),
            clinical = clinical_block(variant),
        )
    }

    pub fn patient_prompt(variant: &VariantRecord) -> String {
        format!(
            "You are a genetic counselor explaining a genetic variant to a patient in \
             simple, empathetic language.\n\
             \n\
             Variant: {locus}\n\
             Gene: {gene}\n\
             Impact: {impact}\n\
             \n\
             Clinical Significance:\n\
             {clinical}\n\
             \n\
             Avoid jargon and be supportive. Format as JSON with:\n\
             - simple_explanation: what the variant is in simple terms\n\
             - what_it_means: what this means for the patient\n\
             - next_steps: suggested next steps\n\
             - questions_to_ask: 3-5 questions the patient might ask their doctor",
            locus = variant.locus(),
            gene = or_unknown(variant.gene.as_deref()),
            impact = or_unknown(variant.impact.as_deref()),
            clinical = clinical_block(variant),
        )
    }
}

pub(crate) fn or_unknown(value: Option<&str>) -> &str {
    value.unwrap_or("Unknown")
}

fn locus_block(variant: &VariantRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "- Chromosome: {}", variant.chromosome);
    if let Some(position) = variant.position {
        let _ = writeln!(out, "- Position: {position}");
    }
    if let Some(reference) = &variant.reference_allele {
        let _ = writeln!(out, "- Reference Allele: {reference}");
    }
    if let Some(alternate) = &variant.alternate_allele {
        let _ = writeln!(out, "- Alternate Allele: {alternate}");
    }
    let _ = writeln!(out, "- Gene Symbol: {}", or_unknown(variant.gene.as_deref()));
    out
}

fn clinical_block(variant: &VariantRecord) -> String {
    match &variant.clinical_significance {
        Some(significance) => format!("- Significance: {significance}"),
        None => "No clinical significance data available.".to_string(),
    }
}

fn drug_block(variant: &VariantRecord) -> String {
    if variant.drug_responses.is_empty() {
        return "No drug response data available.".to_string();
    }
    variant
        .drug_responses
        .iter()
        .map(|dr| {
            format!(
                "- Drug: {}\n  Response Type: {}\n  Evidence Level: {}\n  Cancer Type: {}",
                dr.drug,
                dr.response_type,
                dr.evidence_level.as_deref().unwrap_or("N/A"),
                dr.cancer_type.as_deref().unwrap_or("N/A"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
