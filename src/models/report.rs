//! Compiled drug report: the document persisted as JSON and rendered to PDF.
//!
//! Section keys are fixed. Missing source data shows up as fallback text,
//! never as a missing key. `label_information` is the only optional section.

use serde::Serialize;

use super::drug::{ActiveIngredient, Package};
use super::insight::InsightSet;
use super::label::LabelRecord;

/// Report-type tag written into every report's meta section.
pub const REPORT_TYPE: &str = "Drug Deck";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    pub meta: ReportMeta,
    pub drug_information: DrugInformation,
    pub manufacturer_information: ManufacturerInformation,
    pub clinical_information: ClinicalInformation,
    pub market_information: MarketInformation,
    pub ai_insights: InsightSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_information: Option<LabelRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMeta {
    pub report_id: String,
    pub ndc_code: String,
    pub generated_date: String,
    pub report_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrugInformation {
    pub brand_name: String,
    pub generic_name: String,
    pub dosage_form: String,
    pub route: Vec<String>,
    pub active_ingredients: Vec<ActiveIngredient>,
    pub marketing_start_date: String,
    pub marketing_category: String,
    pub application_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManufacturerInformation {
    pub labeler_name: String,
    pub manufacturer_name: String,
    pub is_original_packager: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicalInformation {
    pub indications: String,
    pub contraindications: String,
    pub warnings: String,
    pub adverse_reactions: String,
    pub drug_interactions: String,
}

impl ClinicalInformation {
    /// `(heading, text)` pairs in report order.
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("Indications", &self.indications),
            ("Contraindications", &self.contraindications),
            ("Warnings", &self.warnings),
            ("Adverse Reactions", &self.adverse_reactions),
            ("Drug Interactions", &self.drug_interactions),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketInformation {
    pub product_type: String,
    pub marketing_status: String,
    pub listing_expiration_date: String,
    pub packaging: Vec<Package>,
}
