//! Interaction controller: UI-facing state and the analyze action.
//!
//! Front-ends observe state through [`InteractionController::subscribe`]
//! rather than polling. No lock is held across the provider call, so
//! overlapping `analyze` calls are possible and the last one to resolve wins.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, error};

use crate::analysis::{AnalysisResult, Analyzer};

/// Shown when `analyze` is triggered with empty or whitespace-only text.
pub const VALIDATION_MESSAGE: &str = "解析するテキストを入力してください。";

/// Shown for any analysis failure. The underlying cause only goes to logs.
pub const FAILURE_MESSAGE: &str =
    "解析中にエラーが発生しました。しばらくしてから再度お試しください。";

/// Result slot of the interaction state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Verdict from the most recent successful analysis.
    Verdict(AnalysisResult),
    /// User-facing error message.
    Error(String),
}

/// Snapshot of everything a front-end renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    pub text: String,
    pub busy: bool,
    pub outcome: Option<Outcome>,
}

impl InteractionState {
    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.outcome {
            Some(Outcome::Verdict(result)) => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            Some(Outcome::Error(message)) => Some(message),
            _ => None,
        }
    }
}

/// Callback invoked with a fresh snapshot after every state change.
pub type StateObserver = Box<dyn Fn(&InteractionState) + Send + Sync>;

/// Owns the interaction state and drives an [`Analyzer`].
pub struct InteractionController<A> {
    analyzer: A,
    state: Mutex<InteractionState>,
    observers: Vec<StateObserver>,
}

impl<A: Analyzer> InteractionController<A> {
    pub fn new(analyzer: A) -> Self {
        Self {
            analyzer,
            state: Mutex::new(InteractionState::default()),
            observers: Vec::new(),
        }
    }

    /// Register an observer. Observers run synchronously, outside the state lock.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(&InteractionState) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// Current state snapshot.
    pub fn state(&self) -> InteractionState {
        self.lock().clone()
    }

    pub fn text(&self) -> String {
        self.lock().text.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.lock().busy
    }

    pub fn result(&self) -> Option<AnalysisResult> {
        self.lock().result().cloned()
    }

    pub fn error_message(&self) -> Option<String> {
        self.lock().error_message().map(str::to_string)
    }

    /// Replace the input text as-is.
    pub fn set_text(&self, raw: impl Into<String>) {
        let raw = raw.into();
        self.update(|state| state.text = raw);
    }

    /// Run one analysis of the current text.
    ///
    /// Empty input sets [`VALIDATION_MESSAGE`] without calling the analyzer.
    /// Otherwise the state goes busy, the previous outcome is cleared, and the
    /// verdict or [`FAILURE_MESSAGE`] is stored once the analyzer returns.
    pub async fn analyze(&self) {
        let text = self.text();
        if text.trim().is_empty() {
            debug!("Rejected empty input");
            self.update(|state| state.outcome = Some(Outcome::Error(VALIDATION_MESSAGE.into())));
            return;
        }

        self.update(|state| {
            state.busy = true;
            state.outcome = None;
        });

        let outcome = match self.analyzer.analyze_compliance(&text).await {
            Ok(result) => Outcome::Verdict(result),
            Err(e) => {
                error!("API Error: {}", e);
                Outcome::Error(FAILURE_MESSAGE.into())
            }
        };

        self.update(|state| {
            state.outcome = Some(outcome);
            state.busy = false;
        });
    }

    fn lock(&self) -> MutexGuard<'_, InteractionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, mutate: impl FnOnce(&mut InteractionState)) {
        let snapshot = {
            let mut state = self.lock();
            mutate(&mut state);
            state.clone()
        };
        for observer in &self.observers {
            observer(&snapshot);
        }
    }
}
