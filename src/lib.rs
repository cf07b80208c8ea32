//! disclosure-check - AI-generation disclosure compliance checker.
//!
//! Sends user text to Google Gemini with a fixed prompt and a declared JSON
//! output schema, and tracks the verdict in a small interaction controller
//! that a front-end can observe.

pub mod analysis;
pub mod config;
pub mod controller;

pub use analysis::{
    AnalysisFailure, AnalysisResult, Analyzer, ClientError, FailureKind, GeminiClient, GeminiConfig,
};
pub use config::Config;
pub use controller::{InteractionController, InteractionState, Outcome};
