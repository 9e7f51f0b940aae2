use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Clinician-facing interpretation of a single variant.
///
/// Models are loose with shapes (a list where a sentence was asked for, or
/// the reverse), so every field accepts either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantInterpretation {
    #[serde(default, deserialize_with = "lenient::text")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub functional_impact: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub clinical_interpretation: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub population_context: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub drug_implications: String,
    #[serde(default, deserialize_with = "lenient::list")]
    pub key_points: Vec<String>,
    /// "high", "medium" or "low"
    #[serde(default = "medium", deserialize_with = "lenient::text")]
    pub confidence_level: String,
    /// The unparsed answer, kept only when it was not the expected JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

const SEE_FULL: &str = "See full explanation";
const SUMMARY_CHARS: usize = 500;
const UNSTRUCTURED_KEY_POINTS: usize = 5;

fn medium() -> String {
    "medium".to_string()
}

impl VariantInterpretation {
    /// Wrap a free-text answer: its head becomes the summary and its first
    /// lines the key points.
    pub fn from_unstructured(text: &str) -> Self {
        Self {
            summary: text.chars().take(SUMMARY_CHARS).collect(),
            functional_impact: SEE_FULL.to_string(),
            clinical_interpretation: SEE_FULL.to_string(),
            population_context: SEE_FULL.to_string(),
            drug_implications: SEE_FULL.to_string(),
            key_points: text
                .lines()
                .take(UNSTRUCTURED_KEY_POINTS)
                .map(str::to_string)
                .collect(),
            confidence_level: medium(),
            raw_response: Some(text.to_string()),
        }
    }
}

/// Interpretation stamped with the variant it describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSummaryReport {
    pub variant_id: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub interpretation: VariantInterpretation,
}

/// Plain-language explanation written for the patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    #[serde(default, deserialize_with = "lenient::text")]
    pub simple_explanation: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub what_it_means: String,
    #[serde(default, deserialize_with = "lenient::list")]
    pub next_steps: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub questions_to_ask: Vec<String>,
}

impl PatientSummary {
    pub fn from_unstructured(text: &str) -> Self {
        Self {
            simple_explanation: text.to_string(),
            what_it_means: "Please consult with your healthcare provider".to_string(),
            next_steps: vec!["Schedule a consultation with a genetic counselor".to_string()],
            questions_to_ask: Vec::new(),
        }
    }
}

/// Research context for a variant and its gene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiteratureContext {
    #[serde(default, deserialize_with = "lenient::list")]
    pub associations: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub research_findings: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub pathways: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub disease_associations: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub research_gaps: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub summary: String,
}

/// One exchange with the chat assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user: String,
    pub assistant: String,
}

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn item_text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// A string, or a list joined by newlines.
    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => String::new(),
            Value::String(s) => s,
            Value::Array(items) => items.iter().map(item_text).collect::<Vec<_>>().join("\n"),
            other => other.to_string(),
        })
    }

    /// A list, or a single string promoted to a one-element list.
    pub fn list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => Vec::new(),
            Value::String(s) if s.trim().is_empty() => Vec::new(),
            Value::Array(items) => items.iter().map(item_text).collect(),
            other => vec![item_text(&other)],
        })
    }
}
