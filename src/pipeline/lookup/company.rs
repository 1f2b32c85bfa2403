//! Best-effort company-name refinement from label text.
//!
//! Labels usually carry "To report SUSPECTED ADVERSE REACTIONS, contact
//! <Company> at <phone>" in the adverse reactions section. When present, the
//! company named there is more precise than the harmonized manufacturer field.
//! Marker matching is fragile, so this never touches the primary merge.

use crate::models::{DrugRecord, LabelRecord};

const CONTACT_MARKER: &str = "SUSPECTED ADVERSE REACTIONS, contact ";
const AT_MARKER: &str = " at ";

/// Company name for the record, refined from the label when the marker matches.
pub fn refine_company_name(record: &DrugRecord, label: Option<&LabelRecord>) -> String {
    let base = record.manufacturer_name.clone();
    let Some(text) = label.and_then(|l| l.first_text("adverse_reactions")) else {
        return base;
    };

    match extract_contact(&text) {
        Some(company) => {
            tracing::info!(company = %company, "Company name extracted from label");
            company
        }
        None => {
            tracing::debug!("No company contact marker in adverse reactions text");
            base
        }
    }
}

/// Text between the contact marker and the following " at ", trimmed.
fn extract_contact(text: &str) -> Option<String> {
    let (_, after) = text.split_once(CONTACT_MARKER)?;
    let (company, _) = after.split_once(AT_MARKER)?;
    let company = company.trim();
    (!company.is_empty()).then(|| company.to_string())
}
