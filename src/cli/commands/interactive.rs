//! Interactive session command.

use std::io::Write;

use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};

use disclosure_check::{Config, GeminiClient, InteractionController};

use crate::cli::helpers;

const QUIT: &str = ":q";

/// Read text line by line; an empty line analyzes what has been typed so far.
pub async fn cmd_interactive(config: &Config) -> anyhow::Result<()> {
    let client = GeminiClient::new(config.gemini.clone())?;
    let mut controller = InteractionController::new(client);
    controller.subscribe(helpers::busy_spinner());

    println!("{}", style("AI表示義務チェッカー").bold());
    println!(
        "  テキストを入力し、空行で解析します。{} で終了します。",
        style(QUIT).cyan()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut buffer: Vec<String> = Vec::new();

    loop {
        print!("{} ", style(">").dim());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim() == QUIT {
            return Ok(());
        }

        if line.is_empty() {
            controller.analyze().await;
            helpers::print_outcome(&controller.state());
            buffer.clear();
            controller.set_text(String::new());
            continue;
        }

        buffer.push(line);
        controller.set_text(buffer.join("\n"));
    }

    // EOF with pending input: analyze it once before leaving.
    if !buffer.is_empty() {
        println!();
        controller.analyze().await;
        helpers::print_outcome(&controller.state());
    }

    Ok(())
}
