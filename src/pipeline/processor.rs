//! Drug report orchestrator.
//!
//! Single entry point that drives the full pipeline for one NDC:
//! normalize → base record → label → approval → insights → compile →
//! company refinement → JSON artifact → PDF artifact.
//!
//! Remote collaborators sit behind traits (`FdaSource`, `InsightProvider`) so
//! the orchestrator is testable with mock implementations.

use std::path::PathBuf;
use std::time::Instant;

use crate::config::AppConfig;
use crate::models::{ApprovalRecord, DrugRecord, ReportDocument};
use crate::ndc::{normalize, NdcCode};
use crate::pipeline::insights::{build_provider, InsightProvider};
use crate::pipeline::lookup::{
    fetch_approval, fetch_label, find_base_record, refine_company_name, FdaError, FdaSource,
    LocalDataset, LookupError, OpenFdaClient,
};
use crate::pipeline::report::{
    compile, render_pdf, write_json_report, write_pdf_report, PersistenceError,
};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Run-level failures. Everything not listed here degrades to fallback text
/// or a per-artifact error in the outcome.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("openFDA client initialization failed: {0}")]
    RemoteInit(#[from] FdaError),
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Everything a run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub ndc: NdcCode,
    pub drug: DrugRecord,
    pub label_found: bool,
    pub approval: Option<ApprovalRecord>,
    pub report: ReportDocument,
    /// JSON artifact path, or why it could not be written.
    pub json: Result<PathBuf, PersistenceError>,
    /// PDF artifact path, or why it could not be rendered or written.
    pub pdf: Result<PathBuf, PersistenceError>,
}

impl RunOutcome {
    pub fn all_artifacts_written(&self) -> bool {
        self.json.is_ok() && self.pdf.is_ok()
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct ReportProcessor {
    dataset: LocalDataset,
    remote: Box<dyn FdaSource>,
    insights: Box<dyn InsightProvider>,
    output_dir: PathBuf,
    refine_company_name: bool,
}

impl ReportProcessor {
    pub fn new(
        dataset: LocalDataset,
        remote: Box<dyn FdaSource>,
        insights: Box<dyn InsightProvider>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            dataset,
            remote,
            insights,
            output_dir: output_dir.into(),
            refine_company_name: true,
        }
    }

    pub fn with_company_refinement(mut self, enabled: bool) -> Self {
        self.refine_company_name = enabled;
        self
    }

    /// Full pipeline for one raw NDC string.
    ///
    /// Only a missing base record (or an unreadable dataset) fails the run.
    /// Artifact failures are reported per artifact in the outcome.
    pub fn run(&self, raw_ndc: &str) -> Result<RunOutcome, ProcessingError> {
        let run_started = Instant::now();
        let ndc = normalize(raw_ndc);
        tracing::info!(
            ndc = %ndc,
            raw = %raw_ndc,
            format = ndc.format().as_str(),
            "Processing NDC"
        );
        if !ndc.format().is_known() {
            tracing::warn!(ndc = %ndc, "NDC is not 10 or 11 digits, searching as entered");
        }

        let started = Instant::now();
        let drug = find_base_record(&ndc, &self.dataset)?;
        log_stage("lookup", started);

        let started = Instant::now();
        let label = fetch_label(&ndc, self.remote.as_ref());
        log_stage("label", started);

        let started = Instant::now();
        let approval = fetch_approval(&ndc, self.remote.as_ref());
        if let Some(date) = approval.as_ref().and_then(ApprovalRecord::original_approval_date) {
            tracing::info!(ndc = %ndc, approved = %date, "Original approval date");
        }
        log_stage("approval", started);

        let started = Instant::now();
        let insights = self.insights.generate(&drug);
        tracing::info!(
            provider = self.insights.name(),
            generated = insights.len(),
            "Insights ready"
        );
        log_stage("insights", started);

        let started = Instant::now();
        let mut report = compile(&drug, label.as_ref(), &insights, &ndc);
        if self.refine_company_name {
            let company = refine_company_name(&drug, label.as_ref());
            if company != report.manufacturer_information.manufacturer_name {
                tracing::info!(
                    from = %report.manufacturer_information.manufacturer_name,
                    to = %company,
                    "Manufacturer name refined from label"
                );
                report.manufacturer_information.manufacturer_name = company;
            }
        }
        log_stage("compile", started);

        let started = Instant::now();
        let json = write_json_report(&report, &self.output_dir, &ndc);
        if let Err(e) = &json {
            tracing::error!(ndc = %ndc, error = %e, "JSON report not written");
        }
        log_stage("json", started);

        let started = Instant::now();
        let pdf = render_pdf(&report)
            .and_then(|bytes| write_pdf_report(&bytes, &self.output_dir, &ndc));
        if let Err(e) = &pdf {
            tracing::error!(ndc = %ndc, error = %e, "PDF report not written");
        }
        log_stage("pdf", started);

        tracing::info!(
            ndc = %ndc,
            elapsed_ms = run_started.elapsed().as_millis() as u64,
            "Processing complete"
        );

        Ok(RunOutcome {
            ndc,
            drug,
            label_found: label.is_some(),
            approval,
            report,
            json,
            pdf,
        })
    }
}

fn log_stage(stage: &'static str, started: Instant) {
    tracing::info!(
        stage,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Stage finished"
    );
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Build a `ReportProcessor` with production implementations.
///
/// - Dataset: `config.data_file`
/// - Remote: `OpenFdaClient` against `config.fda`
/// - Insights: provider selected by `config.insights`
pub fn build_processor(config: &AppConfig) -> Result<ReportProcessor, ProcessingError> {
    let remote = OpenFdaClient::new(
        &config.fda.base_url,
        config.fda.api_key.clone(),
        config.fda.timeout_secs,
    )?;
    let insights = build_provider(config);
    let dataset = LocalDataset::new(&config.data_file);

    tracing::info!(
        data_file = %dataset.path().display(),
        output_dir = %config.output_dir.display(),
        insights = insights.name(),
        "Report processor ready"
    );

    Ok(ReportProcessor::new(
        dataset,
        Box::new(remote),
        insights,
        &config.output_dir,
    )
    .with_company_refinement(config.refine_company_name))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
