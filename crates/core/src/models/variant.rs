use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::Timestamped;

/// A catalogued variant as seen by the analytics layer.
///
/// Only the fields the trend summary and statistics charts look at are kept;
/// the catalog itself owns the full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantRecord {
    /// Catalog identifier, if the record came from the catalog
    #[serde(default)]
    pub variant_id: Option<String>,

    /// Day the variant entered the catalog
    pub date: NaiveDate,

    /// Chromosome label (e.g., "17", "X")
    pub chromosome: String,

    /// 1-based genomic position
    #[serde(default)]
    pub position: Option<u64>,

    #[serde(default)]
    pub reference_allele: Option<String>,

    #[serde(default)]
    pub alternate_allele: Option<String>,

    /// Sequence Ontology consequence term (e.g., "missense_variant")
    #[serde(default)]
    pub consequence: Option<String>,

    /// HGNC gene symbol, if annotated
    pub gene: Option<String>,

    /// Predicted impact (HIGH / MODERATE / LOW / MODIFIER)
    pub impact: Option<String>,

    /// gnomAD allele frequency
    pub gnomad_af: Option<f64>,

    /// First clinical significance call, if any
    pub clinical_significance: Option<String>,

    #[serde(default)]
    pub drug_responses: Vec<DrugResponse>,
}

impl VariantRecord {
    /// Minimal record: a date and a chromosome, nothing annotated yet.
    pub fn new(date: NaiveDate, chromosome: impl Into<String>) -> Self {
        Self {
            variant_id: None,
            date,
            chromosome: chromosome.into(),
            position: None,
            reference_allele: None,
            alternate_allele: None,
            consequence: None,
            gene: None,
            impact: None,
            gnomad_af: None,
            clinical_significance: None,
            drug_responses: Vec::new(),
        }
    }

    pub fn with_gene(mut self, gene: impl Into<String>) -> Self {
        self.gene = Some(gene.into());
        self
    }

    pub fn with_impact(mut self, impact: impl Into<String>) -> Self {
        self.impact = Some(impact.into());
        self
    }

    pub fn with_clinical_significance(mut self, significance: impl Into<String>) -> Self {
        self.clinical_significance = Some(significance.into());
        self
    }

    pub fn with_variant_id(mut self, id: impl Into<String>) -> Self {
        self.variant_id = Some(id.into());
        self
    }

    pub fn with_locus(
        mut self,
        position: u64,
        reference: impl Into<String>,
        alternate: impl Into<String>,
    ) -> Self {
        self.position = Some(position);
        self.reference_allele = Some(reference.into());
        self.alternate_allele = Some(alternate.into());
        self
    }

    pub fn with_consequence(mut self, consequence: impl Into<String>) -> Self {
        self.consequence = Some(consequence.into());
        self
    }

    pub fn with_gnomad_af(mut self, af: f64) -> Self {
        self.gnomad_af = Some(af);
        self
    }

    pub fn with_drug_response(mut self, response: DrugResponse) -> Self {
        self.drug_responses.push(response);
        self
    }

    /// `chrom:pos ref>alt`, shortened to whatever is known.
    pub fn locus(&self) -> String {
        let mut out = self.chromosome.clone();
        if let Some(position) = self.position {
            out.push_str(&format!(":{position}"));
        }
        if let (Some(reference), Some(alternate)) = (&self.reference_allele, &self.alternate_allele)
        {
            out.push_str(&format!(" {reference}>{alternate}"));
        }
        out
    }
}

impl Timestamped for VariantRecord {
    fn calendar_day(&self) -> NaiveDate {
        self.date
    }
}

/// A drug response annotation attached to a variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugResponse {
    pub drug: String,
    pub response_type: String,
    pub evidence_level: Option<String>,
    #[serde(default)]
    pub cancer_type: Option<String>,
}

impl DrugResponse {
    pub fn new(drug: impl Into<String>, response_type: impl Into<String>) -> Self {
        Self {
            drug: drug.into(),
            response_type: response_type.into(),
            evidence_level: None,
            cancer_type: None,
        }
    }

    pub fn with_evidence_level(mut self, level: impl Into<String>) -> Self {
        self.evidence_level = Some(level.into());
        self
    }

    pub fn with_cancer_type(mut self, cancer_type: impl Into<String>) -> Self {
        self.cancer_type = Some(cancer_type.into());
        self
    }
}
