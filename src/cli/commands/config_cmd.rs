//! Configuration and schema inspection commands.

use console::style;

use disclosure_check::analysis::compliance_response_schema;
use disclosure_check::Config;

/// Show the effective configuration.
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    let gemini = &config.gemini;

    println!("\n{}", style("Gemini Configuration").bold());
    println!("{}", "-".repeat(40));
    println!(
        "{:<20} {}",
        "Config File:",
        config
            .source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(defaults)".to_string())
    );
    println!("{:<20} {}", "Endpoint:", gemini.endpoint);
    println!("{:<20} {}", "Model:", gemini.model);
    println!(
        "{:<20} {}",
        "API Key:",
        if gemini.api_key.is_some() {
            "Set"
        } else {
            "Not set"
        }
    );
    println!("{:<20} {}s", "Timeout:", gemini.timeout_secs);
    match gemini.temperature {
        Some(t) => println!("{:<20} {:.2}", "Temperature:", t),
        None => println!("{:<20} provider default", "Temperature:"),
    }

    if gemini.api_key.is_none() {
        println!(
            "\n{} Set GEMINI_API_KEY (or API_KEY). Get a key from https://ai.google.dev/",
            style("!").yellow()
        );
    }

    Ok(())
}

/// Print the response schema declared to the provider.
pub fn cmd_schema() -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&compliance_response_schema())?
    );
    Ok(())
}
