//! Compliance analysis via a hosted generative-AI provider.
//!
//! The [`Analyzer`] trait is the seam between the interaction controller and
//! the provider; [`GeminiClient`] is the production implementation.

mod config;
mod gemini;
mod prompts;
mod schema;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::GeminiConfig;
pub use gemini::{GeminiClient, GenerateRequest};
pub use prompts::{render_compliance_prompt, COMPLIANCE_PROMPT};
pub use schema::compliance_response_schema;

/// Verdict returned by the provider for one piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Whether the text explicitly discloses AI generation or deepfake use.
    pub is_compliant: bool,
    /// Free-text justification from the model.
    pub reason: String,
    /// Phrases supporting compliance. Empty when not compliant.
    pub detected_phrases: Vec<String>,
}

/// Coarse classification of why an analysis failed.
///
/// The detailed cause is logged by the client; callers only see the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Could not reach the provider (DNS, TLS, timeout, connection reset).
    Transport,
    /// Provider rejected the credential (HTTP 401/403).
    Authentication,
    /// Provider answered with a non-success status or an error body.
    Provider,
    /// Provider answered without any candidate text (e.g. blocked prompt).
    EmptyResponse,
    /// Candidate text was not a JSON object of the declared shape.
    Parse,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Transport => "transport",
            FailureKind::Authentication => "authentication",
            FailureKind::Provider => "provider",
            FailureKind::EmptyResponse => "empty response",
            FailureKind::Parse => "parse",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error surfaced by an [`Analyzer`] when no verdict could be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to analyze text with the Gemini API ({kind})")]
pub struct AnalysisFailure {
    kind: FailureKind,
}

impl AnalysisFailure {
    pub fn new(kind: FailureKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }
}

/// Errors raised while constructing an analysis client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("API key not set (set GEMINI_API_KEY or API_KEY, or api_key under [gemini])")]
    MissingApiKey,

    #[error("failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Something that can judge a piece of text for disclosure compliance.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Analyze `text` and return the provider's verdict.
    ///
    /// Implementations do not validate `text`; the caller is responsible for
    /// rejecting empty input.
    async fn analyze_compliance(&self, text: &str) -> Result<AnalysisResult, AnalysisFailure>;
}
