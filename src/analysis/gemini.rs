//! Google Gemini `generateContent` client for compliance analysis.
//!
//! Requires GEMINI_API_KEY (or API_KEY). One request per analysis: no retry,
//! no caching.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use super::config::GeminiConfig;
use super::prompts::render_compliance_prompt;
use super::schema::compliance_response_schema;
use super::{AnalysisFailure, AnalysisResult, Analyzer, ClientError, FailureKind};

/// Gemini-backed [`Analyzer`].
pub struct GeminiClient {
    config: GeminiConfig,
    api_key: String,
    client: Client,
    schema: Value,
}

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl GenerateRequest {
    /// Build the compliance request for `text` against `schema`.
    pub fn compliance(text: &str, schema: &Value, temperature: Option<f32>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: render_compliance_prompt(text),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema.clone(),
                temperature,
            },
        }
    }

    /// The request a client built from `config` would send, without needing
    /// a credential.
    pub fn for_config(text: &str, config: &GeminiConfig) -> Self {
        Self::compliance(text, &compliance_response_schema(), config.temperature)
    }

    /// The rendered prompt carried by this request.
    pub fn prompt(&self) -> &str {
        self.contents
            .first()
            .and_then(|c| c.parts.first())
            .map(|p| p.text.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Detailed failure, logged and then collapsed into an [`AnalysisFailure`].
#[derive(Debug, Error)]
enum GeminiError {
    #[error("HTTP request failed: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("Gemini API error ({status}): {body}")]
    Api { status: StatusCode, body: String },

    #[error("Gemini API error: {0}")]
    ErrorBody(String),

    #[error("Gemini returned no text (reason: {})", .0.as_deref().unwrap_or("unknown"))]
    Empty(Option<String>),

    #[error("failed to parse Gemini response envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("failed to parse analysis JSON: {0}")]
    Json(#[source] serde_json::Error),
}

impl GeminiError {
    fn kind(&self) -> FailureKind {
        match self {
            GeminiError::Connection(_) => FailureKind::Transport,
            GeminiError::Api { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN =>
            {
                FailureKind::Authentication
            }
            GeminiError::Api { .. } | GeminiError::ErrorBody(_) => FailureKind::Provider,
            GeminiError::Empty(_) => FailureKind::EmptyResponse,
            GeminiError::Envelope(_) | GeminiError::Json(_) => FailureKind::Parse,
        }
    }
}

impl GeminiClient {
    /// Create a client, failing fast when no API key is configured.
    pub fn new(config: GeminiConfig) -> Result<Self, ClientError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ClientError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            api_key,
            client,
            schema: compliance_response_schema(),
        })
    }

    /// Build the request that would be sent for `text`.
    pub fn build_request(&self, text: &str) -> GenerateRequest {
        GenerateRequest::compliance(text, &self.schema, self.config.temperature)
    }

    async fn generate(&self, text: &str) -> Result<AnalysisResult, GeminiError> {
        let request = self.build_request(text);
        let url = self.config.generate_content_url();

        debug!(model = %self.config.model, chars = text.chars().count(), "Sending compliance request");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(GeminiError::Connection)?;

        let status = resp.status();
        let body = resp.text().await.map_err(GeminiError::Connection)?;

        if !status.is_success() {
            return Err(GeminiError::Api { status, body });
        }

        let envelope: GenerateResponse =
            serde_json::from_str(&body).map_err(GeminiError::Envelope)?;
        let text = extract_text(envelope)?;

        parse_result(&text)
    }
}

/// Concatenate the first candidate's text parts.
fn extract_text(envelope: GenerateResponse) -> Result<String, GeminiError> {
    if let Some(error) = envelope.error {
        return Err(GeminiError::ErrorBody(error.message));
    }

    let block_reason = envelope.prompt_feedback.and_then(|f| f.block_reason);
    let candidate = envelope
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GeminiError::Empty(block_reason))?;

    let finish_reason = candidate.finish_reason;
    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GeminiError::Empty(finish_reason));
    }

    Ok(text)
}

fn parse_result(text: &str) -> Result<AnalysisResult, GeminiError> {
    serde_json::from_str(text.trim()).map_err(GeminiError::Json)
}

#[async_trait]
impl Analyzer for GeminiClient {
    async fn analyze_compliance(&self, text: &str) -> Result<AnalysisResult, AnalysisFailure> {
        let outcome = self.generate(text).await;
        if let Ok(result) = &outcome {
            debug!(
                compliant = result.is_compliant,
                phrases = result.detected_phrases.len(),
                "Compliance analysis complete"
            );
        }
        outcome.map_err(|e| {
            error!(model = %self.config.model, "Error calling Gemini API: {}", e);
            AnalysisFailure::new(e.kind())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    const PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn client_for(server: &ServerGuard) -> GeminiClient {
        let config = GeminiConfig::default()
            .with_endpoint(&server.url())
            .with_api_key("test-key");
        GeminiClient::new(config).unwrap()
    }

    fn candidate_body(inner: &str) -> String {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": inner }] },
                "finishReason": "STOP"
            }]
        })
        .to_string()
    }

    #[test]
    fn missing_api_key_fails_construction() {
        let err = GeminiClient::new(GeminiConfig::default()).err().unwrap();
        assert!(matches!(err, ClientError::MissingApiKey));

        let blank = GeminiConfig::default().with_api_key("   ");
        assert!(matches!(
            GeminiClient::new(blank),
            Err(ClientError::MissingApiKey)
        ));
    }

    #[test]
    fn request_declares_json_schema() {
        let client = GeminiClient::new(GeminiConfig::default().with_api_key("k")).unwrap();
        let request = client.build_request("テスト");
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            body["generationConfig"]["responseSchema"],
            compliance_response_schema()
        );
        assert!(body["generationConfig"].get("temperature").is_none());
        assert!(request.prompt().contains("---\nテスト\n---"));
    }

    #[test]
    fn offline_request_matches_client_request() {
        let config = GeminiConfig {
            temperature: Some(0.3),
            ..GeminiConfig::default()
        };
        let text = "この動画はディープフェイクを含みます。";

        let offline = serde_json::to_value(GenerateRequest::for_config(text, &config)).unwrap();
        assert_eq!(offline["generationConfig"]["temperature"], json!(0.3f32));

        let client = GeminiClient::new(config.with_api_key("k")).unwrap();
        let sent = serde_json::to_value(client.build_request(text)).unwrap();
        assert_eq!(offline, sent);
    }

    #[tokio::test]
    async fn configured_model_selects_endpoint_path() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-pro:generateContent")
            .with_status(200)
            .with_body(candidate_body(
                r#"{"isCompliant":false,"reason":"r","detectedPhrases":[]}"#,
            ))
            .expect(1)
            .create_async()
            .await;
        let default_path = server
            .mock("POST", PATH)
            .expect(0)
            .create_async()
            .await;

        let config = GeminiConfig::default()
            .with_endpoint(&server.url())
            .with_model("gemini-2.5-pro")
            .with_api_key("test-key");
        let result = GeminiClient::new(config)
            .unwrap()
            .analyze_compliance("x")
            .await
            .unwrap();

        assert!(!result.is_compliant);
        mock.assert_async().await;
        default_path.assert_async().await;
    }

    #[tokio::test]
    async fn parses_verdict_from_candidate_text() {
        let mut server = Server::new_async().await;
        let text = "この画像はAI生成です。";
        let mock = server
            .mock("POST", PATH)
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(regex::escape(text)),
                Matcher::PartialJson(json!({
                    "generationConfig": { "responseMimeType": "application/json" }
                })),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(candidate_body(
                "\n  {\"isCompliant\":true,\"reason\":\"明記あり\",\"detectedPhrases\":[\"AI生成\"]}  \n",
            ))
            .expect(1)
            .create_async()
            .await;

        let result = client_for(&server).analyze_compliance(text).await.unwrap();

        mock.assert_async().await;
        assert!(result.is_compliant);
        assert_eq!(result.detected_phrases, vec!["AI生成"]);
    }

    #[tokio::test]
    async fn joins_split_text_parts() {
        let mut server = Server::new_async().await;
        let body = json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "{\"isCompliant\":false," },
                    { "text": "\"reason\":\"明記なし\",\"detectedPhrases\":[]}" }
                ]}
            }]
        });
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(body.to_string())
            .create_async()
            .await;

        let result = client_for(&server)
            .analyze_compliance("これは普通の画像です。")
            .await
            .unwrap();
        assert!(!result.is_compliant);
        assert!(result.detected_phrases.is_empty());
    }

    #[tokio::test]
    async fn identical_text_is_not_cached() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(candidate_body(
                r#"{"isCompliant":false,"reason":"r","detectedPhrases":[]}"#,
            ))
            .expect(2)
            .create_async()
            .await;

        let client = client_for(&server);
        client.analyze_compliance("同じ").await.unwrap();
        client.analyze_compliance("同じ").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn classifies_auth_rejection() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(403)
            .with_body(r#"{"error":{"code":403,"message":"API key not valid"}}"#)
            .create_async()
            .await;

        let err = client_for(&server).analyze_compliance("x").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Authentication);
        assert!(!err.to_string().contains("API key not valid"));
    }

    #[tokio::test]
    async fn classifies_server_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(500)
            .with_body("internal")
            .create_async()
            .await;

        let err = client_for(&server).analyze_compliance("x").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Provider);
    }

    #[tokio::test]
    async fn classifies_invalid_json_as_parse() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(candidate_body("not json at all"))
            .create_async()
            .await;

        let err = client_for(&server).analyze_compliance("x").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Parse);
    }

    #[tokio::test]
    async fn schema_incomplete_json_is_a_parse_failure() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(candidate_body(r#"{"isCompliant":true}"#))
            .create_async()
            .await;

        let err = client_for(&server).analyze_compliance("x").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Parse);
    }

    #[tokio::test]
    async fn blocked_prompt_is_empty_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
            .create_async()
            .await;

        let err = client_for(&server).analyze_compliance("x").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::EmptyResponse);
    }

    #[tokio::test]
    async fn unreachable_provider_is_transport() {
        let config = GeminiConfig::default()
            .with_endpoint("http://127.0.0.1:1")
            .with_api_key("test-key");
        let client = GeminiClient::new(config).unwrap();

        let err = client.analyze_compliance("x").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Transport);
    }
}
