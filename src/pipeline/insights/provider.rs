use std::time::Instant;

use super::prompt::{build_insight_prompt, INSIGHT_SYSTEM_PROMPT};
use super::LlmClient;
use crate::models::{DrugRecord, InsightKind, InsightSet};

/// Produces the narrative sections of a report. Never fails as a whole:
/// kinds that could not be generated are left out of the set.
pub trait InsightProvider {
    fn generate(&self, record: &DrugRecord) -> InsightSet;

    /// Short provider name for logs.
    fn name(&self) -> &'static str;
}

/// Fixed text for every kind. Used offline and as the fallback provider.
pub struct PlaceholderInsights;

impl PlaceholderInsights {
    pub fn text(kind: InsightKind) -> &'static str {
        match kind {
            InsightKind::DrugSummary => "This is a summary of the drug.",
            InsightKind::MechanismOfAction => "This is the mechanism of action.",
            InsightKind::SideEffects => "These are the side effects.",
            InsightKind::MarketTrends => "These are the market trends.",
            InsightKind::PatientJourney => "This is the patient journey.",
        }
    }
}

impl InsightProvider for PlaceholderInsights {
    fn generate(&self, _record: &DrugRecord) -> InsightSet {
        InsightKind::ALL
            .into_iter()
            .map(|kind| (kind, Self::text(kind).to_string()))
            .collect()
    }

    fn name(&self) -> &'static str {
        "placeholder"
    }
}

/// One prompt per insight kind, sent sequentially through an LLM client.
pub struct LlmInsightProvider {
    client: Box<dyn LlmClient>,
    model: String,
}

impl LlmInsightProvider {
    pub fn new(client: Box<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

impl InsightProvider for LlmInsightProvider {
    fn generate(&self, record: &DrugRecord) -> InsightSet {
        let mut insights = InsightSet::new();

        for kind in InsightKind::ALL {
            let prompt = build_insight_prompt(kind, record);
            let started = Instant::now();
            match self.client.generate(&self.model, &prompt, INSIGHT_SYSTEM_PROMPT) {
                Ok(text) if !text.trim().is_empty() => {
                    tracing::info!(
                        kind = %kind,
                        chars = text.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Insight generated"
                    );
                    insights.insert(kind, text.trim().to_string());
                }
                Ok(_) => {
                    tracing::warn!(kind = %kind, "Insight provider returned empty text");
                }
                Err(e) => {
                    tracing::warn!(kind = %kind, error = %e, "Insight generation failed");
                }
            }
        }

        tracing::info!(
            generated = insights.len(),
            requested = InsightKind::ALL.len(),
            "Insights complete"
        );
        insights
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}
