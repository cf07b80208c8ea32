//! Gemini client configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the Gemini analysis client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API base URL (without the `/v1beta/...` path)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key. Never written back out.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Sampling temperature; provider default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            temperature: None,
        }
    }
}

impl GeminiConfig {
    /// Apply process environment overrides.
    ///
    /// Supported env vars:
    /// - `GEMINI_API_KEY`: API key (preferred)
    /// - `API_KEY`: API key, used when `GEMINI_API_KEY` is unset or blank
    /// - `GEMINI_MODEL`: Model name
    /// - `GEMINI_ENDPOINT`: API base URL
    /// - `GEMINI_TIMEOUT_SECS`: Request timeout in seconds
    /// - `GEMINI_TEMPERATURE`: Sampling temperature
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|k| !k.trim().is_empty());
        if let Some(key) = non_blank("GEMINI_API_KEY").or_else(|| non_blank("API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(val) = lookup("GEMINI_MODEL") {
            self.model = val;
        }
        if let Some(val) = lookup("GEMINI_ENDPOINT") {
            self.endpoint = val;
        }
        if let Some(val) = lookup("GEMINI_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.timeout_secs = n;
            }
        }
        if let Some(val) = lookup("GEMINI_TEMPERATURE") {
            if let Ok(t) = val.parse() {
                self.temperature = Some(t);
            }
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Full `generateContent` URL for the configured model.
    pub fn generate_content_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}
