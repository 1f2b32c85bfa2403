//! Google Generative Language (`generateContent`) client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{InsightError, LlmClient};

pub struct GeminiClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self, InsightError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| InsightError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        })
    }

    fn url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// The key travels in a header so it never appears in URLs or logs.
    fn request(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
    ) -> reqwest::blocking::RequestBuilder {
        self.client
            .post(self.url(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(prompt, system))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

fn request_body<'a>(prompt: &'a str, system: &'a str) -> GenerateContentRequest<'a> {
    let system_instruction = (!system.trim().is_empty()).then(|| Content {
        role: None,
        parts: vec![Part { text: system }],
    });
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part { text: prompt }],
        }],
        system_instruction,
    }
}

impl LlmClient for GeminiClient {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, InsightError> {
        let response = self
            .request(model, prompt, system)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    InsightError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    InsightError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
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

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| InsightError::ResponseParsing(e.to_string()))?;

        parsed.text().ok_or(InsightError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_targets_generate_content() {
        let client = GeminiClient::new(
            "https://generativelanguage.googleapis.com/v1beta/",
            "key",
            30,
        )
        .unwrap();
        assert_eq!(
            client.url("gemini-1.5-pro"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn api_key_is_sent_as_header_not_query() {
        let client = GeminiClient::new("https://example.test/v1beta", "secret-key", 30).unwrap();
        let request = client
            .request("gemini-1.5-pro", "Explain", "Be factual")
            .build()
            .unwrap();
        assert_eq!(request.headers()["x-goog-api-key"], "secret-key");
        assert!(request.url().query().is_none());
        assert!(!request.url().as_str().contains("secret-key"));
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(request_body("Explain", "Be factual")).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "Explain"}]}],
                "systemInstruction": {"parts": [{"text": "Be factual"}]}
            })
        );
    }

    #[test]
    fn blank_system_prompt_is_omitted() {
        let body = serde_json::to_value(request_body("Explain", "  ")).unwrap();
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn response_text_joins_first_candidate_parts() {
        let parsed: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "Hello "}, {"text": "world"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(parsed.text().as_deref(), Some("Hello world"));
    }

    #[test]
    fn empty_or_blocked_response_has_no_text() {
        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.text().is_none());

        // Safety-blocked candidates come back without content
        let blocked: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"finishReason": "SAFETY"}]})).unwrap();
        assert!(blocked.text().is_none());
    }
}
