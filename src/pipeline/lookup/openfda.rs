//! openFDA label and approval lookups.
//!
//! Both queries filter on `openfda.product_ndc`, ask for a single result and
//! are best-effort: any failure is logged and reported as "no data" so the
//! report degrades to fallback text instead of aborting.

use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::Value;

use super::FdaError;
use crate::models::{ApprovalRecord, LabelRecord};
use crate::ndc::NdcCode;

/// openFDA drug endpoints used by the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FdaEndpoint {
    /// Structured product labels (`label.json`)
    Label,
    /// Drugs@FDA approvals (`drugsfda.json`)
    DrugsFda,
}

impl FdaEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Label => "label.json",
            Self::DrugsFda => "drugsfda.json",
        }
    }
}

/// Remote source of openFDA results (allows mocking).
pub trait FdaSource {
    /// First result of a product-code query, `None` when nothing matched.
    fn first_result(&self, endpoint: FdaEndpoint, ndc: &NdcCode)
        -> Result<Option<Value>, FdaError>;
}

/// Response envelope shared by openFDA endpoints.
#[derive(Deserialize)]
struct OpenFdaResponse {
    #[serde(default)]
    results: Vec<Value>,
}

/// Blocking HTTP client for `api.fda.gov`.
pub struct OpenFdaClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OpenFdaClient {
    pub fn new(base_url: &str, api_key: Option<String>, timeout_secs: u64) -> Result<Self, FdaError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FdaError::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
            timeout_secs,
        })
    }

    fn url(&self, endpoint: FdaEndpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }
}

impl FdaSource for OpenFdaClient {
    fn first_result(
        &self,
        endpoint: FdaEndpoint,
        ndc: &NdcCode,
    ) -> Result<Option<Value>, FdaError> {
        let url = self.url(endpoint);
        let search = format!("openfda.product_ndc:{ndc}");
        let mut query: Vec<(&str, &str)> = vec![("search", &search), ("limit", "1")];
        if let Some(key) = self.api_key.as_deref() {
            query.push(("api_key", key));
        }
        tracing::debug!(url = %url, search = %search, "openFDA request");

        let started = Instant::now();
        let response = self.client.get(&url).query(&query).send().map_err(|e| {
            if e.is_connect() {
                FdaError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                FdaError::Timeout(self.timeout_secs)
            } else {
                FdaError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        tracing::info!(
            endpoint = endpoint.path(),
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "openFDA response received"
        );

        // openFDA answers 404 when a search matches nothing
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FdaError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OpenFdaResponse = response
            .json()
            .map_err(|e| FdaError::ResponseParsing(e.to_string()))?;

        Ok(parsed.results.into_iter().next())
    }
}

/// Fetch the FDA label for a product. Failures and empty results are `None`.
pub fn fetch_label(ndc: &NdcCode, remote: &dyn FdaSource) -> Option<LabelRecord> {
    tracing::info!(ndc = %ndc, "Fetching FDA label");
    match remote.first_result(FdaEndpoint::Label, ndc) {
        Ok(Some(value)) => {
            let label = LabelRecord::from_value(value);
            match &label {
                Some(l) => tracing::info!(ndc = %ndc, sections = l.len(), "FDA label found"),
                None => tracing::warn!(ndc = %ndc, "FDA label result was empty"),
            }
            label
        }
        Ok(None) => {
            tracing::warn!(ndc = %ndc, "No FDA label found");
            None
        }
        Err(e) => {
            tracing::error!(ndc = %ndc, error = %e, "Error fetching FDA label");
            None
        }
    }
}

/// Fetch the Drugs@FDA approval record for a product. Failures are `None`.
pub fn fetch_approval(ndc: &NdcCode, remote: &dyn FdaSource) -> Option<ApprovalRecord> {
    tracing::info!(ndc = %ndc, "Fetching drug approval info");
    match remote.first_result(FdaEndpoint::DrugsFda, ndc) {
        Ok(Some(value)) => match serde_json::from_value::<ApprovalRecord>(value) {
            Ok(approval) => {
                tracing::info!(
                    ndc = %ndc,
                    application = approval.application_number.as_deref().unwrap_or("unknown"),
                    "Drug approval info found"
                );
                Some(approval)
            }
            Err(e) => {
                tracing::error!(ndc = %ndc, error = %e, "Malformed drug approval record");
                None
            }
        },
        Ok(None) => {
            tracing::warn!(ndc = %ndc, "No drug approval info found");
            None
        }
        Err(e) => {
            tracing::error!(ndc = %ndc, error = %e, "Error fetching drug approval info");
            None
        }
    }
}

/// Mock openFDA source for testing: canned result or error per endpoint.
#[derive(Default)]
pub struct MockFdaSource {
    label: Option<Value>,
    approval: Option<Value>,
    fail: bool,
    calls: std::cell::RefCell<Vec<(FdaEndpoint, String)>>,
}

impl MockFdaSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: Value) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_approval(mut self, approval: Value) -> Self {
        self.approval = Some(approval);
        self
    }

    /// Every request fails with a 503.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Requests seen so far, in order.
    pub fn calls(&self) -> Vec<(FdaEndpoint, String)> {
        self.calls.borrow().clone()
    }
}

impl FdaSource for MockFdaSource {
    fn first_result(
        &self,
        endpoint: FdaEndpoint,
        ndc: &NdcCode,
    ) -> Result<Option<Value>, FdaError> {
        self.calls.borrow_mut().push((endpoint, ndc.to_string()));
        if self.fail {
            return Err(FdaError::Status {
                status: 503,
                body: "Service Unavailable".into(),
            });
        }
        Ok(match endpoint {
            FdaEndpoint::Label => self.label.clone(),
            FdaEndpoint::DrugsFda => self.approval.clone(),
        })
    }
}
