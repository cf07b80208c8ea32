//! Shared rendering helpers for CLI commands.

use std::sync::Mutex;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use disclosure_check::{AnalysisResult, InteractionState, Outcome};

/// Print a verdict in human-readable form.
pub fn print_verdict(result: &AnalysisResult) {
    if result.is_compliant {
        println!("{} {}", style("✓").green(), style("準拠").green().bold());
    } else {
        println!("{} {}", style("✗").red(), style("非準拠").red().bold());
    }
    println!("  {:<8} {}", "理由:", result.reason);
    if result.detected_phrases.is_empty() {
        println!("  {:<8} {}", "検出:", style("なし").dim());
    } else {
        println!("  {:<8}", "検出:");
        for phrase in &result.detected_phrases {
            println!("    - {}", style(phrase).cyan());
        }
    }
}

/// Print a user-facing error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("!").yellow(), message);
}

/// Render whatever outcome the state currently holds.
pub fn print_outcome(state: &InteractionState) {
    match &state.outcome {
        Some(Outcome::Verdict(result)) => print_verdict(result),
        Some(Outcome::Error(message)) => print_error(message),
        None => {}
    }
}

/// Observer that shows a spinner on stderr while the controller is busy.
pub fn busy_spinner() -> impl Fn(&InteractionState) + Send + Sync + 'static {
    let active: Mutex<Option<ProgressBar>> = Mutex::new(None);
    move |state: &InteractionState| {
        let mut active = match active.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if state.busy {
            if active.is_none() {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::with_template("{spinner:.cyan} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                pb.set_message("解析中...");
                pb.enable_steady_tick(Duration::from_millis(100));
                *active = Some(pb);
            }
        } else if let Some(pb) = active.take() {
            pb.finish_and_clear();
        }
    }
}
