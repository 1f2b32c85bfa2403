//! Report compilation: merges the base record, the optional FDA label and the
//! generated insights into a `ReportDocument`. Pure, no I/O.

use chrono::{Local, NaiveDateTime};

use crate::models::{
    ClinicalInformation, DrugInformation, DrugRecord, InsightSet, LabelRecord,
    ManufacturerInformation, MarketInformation, ReportDocument, ReportMeta, REPORT_TYPE, UNKNOWN,
};
use crate::ndc::NdcCode;

/// Clinical text when no label was found at all.
pub const NOT_IN_BASIC_DATA: &str =
    "Information not available in the basic data. See AI Insights section.";

/// Clinical text when the label lacks the section.
pub const NOT_IN_FDA_LABEL: &str =
    "Information not available in the FDA label. See AI Insights section.";

/// Marketing status for finished products. Everything else is "Unknown".
pub const STATUS_ACTIVE: &str = "Active";

/// Compile a report stamped with the current local time.
pub fn compile(
    record: &DrugRecord,
    label: Option<&LabelRecord>,
    insights: &InsightSet,
    ndc: &NdcCode,
) -> ReportDocument {
    compile_at(record, label, insights, ndc, Local::now().naive_local())
}

/// Compile a report with an explicit generation timestamp.
pub fn compile_at(
    record: &DrugRecord,
    label: Option<&LabelRecord>,
    insights: &InsightSet,
    ndc: &NdcCode,
    generated_at: NaiveDateTime,
) -> ReportDocument {
    ReportDocument {
        meta: meta(ndc, generated_at),
        drug_information: drug_information(record),
        manufacturer_information: manufacturer_information(record),
        clinical_information: clinical_information(label),
        market_information: market_information(record),
        ai_insights: insights.clone(),
        label_information: label.cloned(),
    }
}

fn meta(ndc: &NdcCode, generated_at: NaiveDateTime) -> ReportMeta {
    ReportMeta {
        report_id: format!("drug_{}_{}", ndc, generated_at.format("%Y%m%d%H%M%S")),
        ndc_code: ndc.to_string(),
        generated_date: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        report_type: REPORT_TYPE.to_string(),
    }
}

fn drug_information(record: &DrugRecord) -> DrugInformation {
    DrugInformation {
        brand_name: record.brand_name.clone(),
        generic_name: record.generic_name.clone(),
        dosage_form: record.dosage_form.clone(),
        route: record.route.clone(),
        active_ingredients: record.active_ingredients.clone(),
        marketing_start_date: record.marketing_start_date.clone(),
        marketing_category: record.marketing_category.clone(),
        application_number: record.application_number.clone(),
    }
}

fn manufacturer_information(record: &DrugRecord) -> ManufacturerInformation {
    ManufacturerInformation {
        labeler_name: record.labeler_name.clone(),
        manufacturer_name: record.manufacturer_name.clone(),
        is_original_packager: record.is_original_packager,
    }
}

fn clinical_information(label: Option<&LabelRecord>) -> ClinicalInformation {
    let section = |name: &str| label_section(label, name);
    ClinicalInformation {
        indications: section("indications_and_usage"),
        contraindications: section("contraindications"),
        warnings: section("warnings"),
        adverse_reactions: section("adverse_reactions"),
        drug_interactions: section("drug_interactions"),
    }
}

fn label_section(label: Option<&LabelRecord>, name: &str) -> String {
    let Some(label) = label else {
        return NOT_IN_BASIC_DATA.to_string();
    };
    label
        .first_text(name)
        .unwrap_or_else(|| NOT_IN_FDA_LABEL.to_string())
}

fn market_information(record: &DrugRecord) -> MarketInformation {
    MarketInformation {
        product_type: record.product_type.clone(),
        marketing_status: if record.finished { STATUS_ACTIVE } else { UNKNOWN }.to_string(),
        listing_expiration_date: record.listing_expiration_date.clone(),
        packaging: record.packaging.clone(),
    }
}
