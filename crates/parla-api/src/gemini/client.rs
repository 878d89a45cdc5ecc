use std::{fmt, time::Duration};

use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::instrument;

use super::{GeminiError, parse, prompts::Prompt};
use crate::metrics::record_ai_call;

const API_KEY_HEADER: &str = "x-goog-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Thin `generateContent` client.
///
/// Calls are instrumented with the model name and latency; prompt contents
/// and the API key are never logged.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key, sent in the `x-goog-api-key` header
    /// * `model` - Model name, e.g. `gemini-2.5-flash`
    /// * `base_url` - API root up to and including the version segment
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, GeminiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Send `prompt` and return the reply text, trimmed.
    #[instrument(level = "info", skip(self, prompt), fields(model = %self.model, json = prompt.json))]
    pub async fn generate_text(&self, prompt: &Prompt) -> Result<String, GeminiError> {
        let started = std::time::Instant::now();
        let result = self.send(prompt).await;
        record_ai_call(if prompt.json { "json" } else { "text" }, result.is_ok());

        match &result {
            Ok(text) => tracing::info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                response_len = text.len(),
                "AI call completed"
            ),
            Err(e) => tracing::warn!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %e,
                "AI call failed"
            ),
        }

        result
    }

    /// Send `prompt` and parse the reply into `T`.
    pub async fn generate_json<T: DeserializeOwned>(&self, prompt: &Prompt) -> Result<T, GeminiError> {
        let text = self.generate_text(prompt).await?;
        parse::parse_json(&text)
    }

    async fn send(&self, prompt: &Prompt) -> Result<String, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateContentRequest::from(prompt);

        let res = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let message = extract_error_message(&body).unwrap_or(body);
            return Err(GeminiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = res.json().await?;
        if let Some(usage) = &body.usage_metadata {
            tracing::debug!(
                prompt_tokens = ?usage.prompt_token_count,
                completion_tokens = ?usage.candidates_token_count,
                total_tokens = ?usage.total_token_count,
                "AI usage"
            );
        }

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(GeminiError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

impl From<&Prompt> for GenerateContentRequest {
    fn from(prompt: &Prompt) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.text.clone()),
                }],
            }],
            system_instruction: prompt.system.as_ref().map(|system| Content {
                role: None,
                parts: vec![Part {
                    text: Some(system.clone()),
                }],
            }),
            generation_config: GenerationConfig {
                temperature: prompt.temperature,
                response_mime_type: prompt.json.then(|| "application/json".to_string()),
            },
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
    #[serde(default)]
    total_token_count: Option<u32>,
}

/// Pull `error.message` out of an API error body.
fn extract_error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorWrap {
        error: ErrorBody,
    }
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_str::<ErrorWrap>(body)
        .ok()
        .map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::prompts;

    #[test]
    fn test_request_shape() {
        let prompt = prompts::vocabulary_enrichment("apple", "quả táo");
        let body = serde_json::to_value(GenerateContentRequest::from(&prompt)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert!(
            body["contents"][0]["parts"][0]["text"]
                .as_str()
                .unwrap()
                .contains("apple")
        );
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_request_with_system_instruction() {
        let prompt = prompts::chat(
            prompts::ChatMode::Conversation,
            parla_core::ProficiencyLevel::A1,
            "hello",
        );
        let body = serde_json::to_value(GenerateContentRequest::from(&prompt)).unwrap();

        assert!(body["systemInstruction"]["parts"][0]["text"].is_string());
        assert!(body["systemInstruction"].get("role").is_none());
        assert!(body["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("API key not valid")
        );
        assert_eq!(extract_error_message("<html>"), None);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = GeminiClient::new("super-secret", "gemini-2.5-flash", "http://localhost/v1beta/")
            .unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("gemini-2.5-flash"));
        assert_eq!(client.base_url, "http://localhost/v1beta");
    }
}
