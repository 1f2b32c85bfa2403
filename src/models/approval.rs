//! Drugs@FDA approval record (openFDA `drugsfda.json`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalRecord {
    pub application_number: Option<String>,
    pub sponsor_name: Option<String>,
    pub products: Vec<ApprovalProduct>,
    pub submissions: Vec<ApprovalSubmission>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalProduct {
    pub brand_name: Option<String>,
    pub dosage_form: Option<String>,
    pub route: Option<String>,
    pub marketing_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalSubmission {
    pub submission_type: Option<String>,
    pub submission_number: Option<String>,
    pub submission_status: Option<String>,
    pub submission_status_date: Option<String>,
}

impl ApprovalRecord {
    /// Status date of the original approval (`ORIG` submission), if listed.
    pub fn original_approval_date(&self) -> Option<&str> {
        self.submissions
            .iter()
            .find(|s| s.submission_type.as_deref() == Some("ORIG"))
            .and_then(|s| s.submission_status_date.as_deref())
    }
}
