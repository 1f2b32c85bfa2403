pub mod gemini;
pub mod ollama;
pub mod prompt;
pub mod provider;

pub use gemini::*;
pub use ollama::*;
pub use prompt::*;
pub use provider::*;

use thiserror::Error;

use crate::config::AppConfig;
use crate::models::InsightProviderKind;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Insight provider is not reachable at {0}")]
    Connection(String),

    #[error("Insight provider returned error (status {status}): {body}")]
    Provider { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Insight provider returned no text")]
    EmptyResponse,

    #[error("No API key configured for the {0} insight provider")]
    MissingApiKey(String),
}

/// Text-generation backend (allows mocking).
pub trait LlmClient {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, InsightError>;
}

/// Build the insight provider selected by configuration.
///
/// A remote provider that cannot be constructed (no API key, broken HTTP
/// client) is logged and replaced by placeholder text, so a misconfigured
/// provider never blocks a report.
pub fn build_provider(config: &AppConfig) -> Box<dyn InsightProvider> {
    let provider = config.insights.provider;
    let model = config.insights_model().to_string();
    let base_url = config.insights_base_url();
    let timeout = config.insights.timeout_secs;

    let client: Result<Box<dyn LlmClient>, InsightError> = match provider {
        InsightProviderKind::Placeholder => return Box::new(PlaceholderInsights),
        InsightProviderKind::Gemini => match config.insights_api_key() {
            Some(key) => GeminiClient::new(base_url, key, timeout)
                .map(|c| Box::new(c) as Box<dyn LlmClient>),
            None => Err(InsightError::MissingApiKey(provider.to_string())),
        },
        InsightProviderKind::Ollama => {
            OllamaClient::new(base_url, timeout).map(|c| Box::new(c) as Box<dyn LlmClient>)
        }
    };

    match client {
        Ok(client) => {
            tracing::info!(provider = %provider, model = %model, "Insight provider ready");
            Box::new(LlmInsightProvider::new(client, model))
        }
        Err(e) => {
            tracing::warn!(provider = %provider, error = %e, "Falling back to placeholder insights");
            Box::new(PlaceholderInsights)
        }
    }
}
