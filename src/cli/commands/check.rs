//! One-shot check command.

use std::path::PathBuf;

use tokio::io::AsyncReadExt;
use tracing::debug;

use disclosure_check::analysis::GenerateRequest;
use disclosure_check::{Config, GeminiClient, InteractionController, Outcome};

use crate::cli::helpers;

/// Output and exit-status switches for `check`.
pub struct CheckOptions {
    pub json: bool,
    pub strict: bool,
    pub dry_run: bool,
}

/// Analyze text from an argument, a file, or stdin.
pub async fn cmd_check(
    config: &Config,
    text: Option<String>,
    file: Option<PathBuf>,
    options: CheckOptions,
) -> anyhow::Result<()> {
    let text = read_input(text, file).await?;

    if options.dry_run {
        let request = GenerateRequest::for_config(&text, &config.gemini);
        eprintln!("POST {}", config.gemini.generate_content_url());
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    let client = GeminiClient::new(config.gemini.clone())?;
    let mut controller = InteractionController::new(client);
    if !options.json {
        controller.subscribe(helpers::busy_spinner());
    }

    controller.set_text(text);
    controller.analyze().await;

    match controller.state().outcome {
        Some(Outcome::Verdict(result)) => {
            if options.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                helpers::print_verdict(&result);
            }
            if options.strict && !result.is_compliant {
                std::process::exit(2);
            }
            Ok(())
        }
        Some(Outcome::Error(message)) => {
            helpers::print_error(&message);
            std::process::exit(1);
        }
        None => Ok(()),
    }
}

async fn read_input(text: Option<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        debug!("Reading text from {}", path.display());
        return Ok(tokio::fs::read_to_string(&path).await?);
    }

    let mut buf = String::new();
    tokio::io::stdin().read_to_string(&mut buf).await?;
    Ok(buf)
}
