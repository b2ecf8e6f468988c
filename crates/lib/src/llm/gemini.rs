//! Gemini generateContent client (REST, non-streaming).

use crate::llm::{LlmBackend, LlmError};
use async_trait::async_trait;
use serde::Deserialize;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Client for the Gemini generateContent API.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Build a client for the given key and model (default `gemini-1.5-flash`).
    /// Fails when the underlying HTTP client cannot be constructed.
    pub fn new(api_key: String, model: Option<String>) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder().build()?;
        let model = model
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Ok(Self {
            api_key,
            model,
            base_url: GEMINI_API_BASE.to_string(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// POST {base}/{model}:generateContent — single-turn completion for one prompt.
    pub async fn generate_content(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = serde_json::json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
        });
        let res = self.client.post(&url).json(&body).send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("{} {}", status, body)));
        }
        let data: GenerateContentResponse = res.json().await?;
        let text = data.text();
        if text.is_empty() {
            return Err(LlmError::Api(
                "response contained no candidate text".to_string(),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl LlmBackend for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.generate_content(prompt).await
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate: all parts concatenated in order.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_concatenates_first_candidate_parts() {
        let raw = r#"{
            "candidates": [
                {
                    "content": {
                        "role": "model",
                        "parts": [{ "text": "Seven days" }, { "text": " after one year." }]
                    },
                    "finishReason": "STOP"
                }
            ],
            "usageMetadata": { "promptTokenCount": 42 }
        }"#;
        let data: GenerateContentResponse = serde_json::from_str(raw).expect("parse response");
        assert_eq!(data.text(), "Seven days after one year.");
    }

    #[test]
    fn empty_response_yields_empty_text() {
        let data: GenerateContentResponse = serde_json::from_str("{}").expect("parse response");
        assert_eq!(data.text(), "");
    }

    #[test]
    fn default_model_applies_when_unset_or_blank() {
        let client = GeminiClient::new("key".to_string(), None).expect("build client");
        assert_eq!(client.model(), "gemini-1.5-flash");
        let client =
            GeminiClient::new("key".to_string(), Some("  ".to_string())).expect("build client");
        assert_eq!(client.model(), "gemini-1.5-flash");
        let client = GeminiClient::new("key".to_string(), Some("gemini-1.5-pro".to_string()))
            .expect("build client");
        assert_eq!(client.model(), "gemini-1.5-pro");
    }
}
