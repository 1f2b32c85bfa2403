use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{InsightError, LlmClient};

/// Ollama HTTP client for local LLM inference.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, InsightError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| InsightError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl LlmClient for OllamaClient {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, InsightError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model,
            prompt,
            system,
            stream: false,
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                InsightError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                InsightError::HttpClient(format!("Request timed out after {}s", self.timeout_secs))
            } else {
                InsightError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InsightError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| InsightError::ResponseParsing(e.to_string()))?;

        Ok(parsed.response)
    }
}

/// Mock LLM client for testing. Returns a configurable response.
pub struct MockLlmClient {
    response: String,
    fail_when_prompt_contains: Option<String>,
    prompts: std::cell::RefCell<Vec<String>>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            fail_when_prompt_contains: None,
            prompts: std::cell::RefCell::new(Vec::new()),
        }
    }

    /// Fail any request whose prompt contains `needle`.
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_when_prompt_contains = Some(needle.to_string());
        self
    }

    /// Prompts received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, _model: &str, prompt: &str, _system: &str) -> Result<String, InsightError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        if let Some(needle) = &self.fail_when_prompt_contains {
            if prompt.contains(needle.as_str()) {
                return Err(InsightError::Provider {
                    status: 500,
                    body: "mock failure".into(),
                });
            }
        }
        Ok(self.response.clone())
    }
}
