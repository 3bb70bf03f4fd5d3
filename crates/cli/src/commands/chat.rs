//! `reverie chat`: interactive or single-message journal chat.

use reverie_chat::{ChatSession, SessionSettings};
use reverie_config::AppConfig;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;

    // Check for API key early, give a clear error
    if !config.has_api_key() && config.default_provider != "ollama" {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    REVERIE_API_KEY     = 'sk-...'         (generic)");
        eprintln!("    OPENAI_API_KEY      = 'sk-...'         (for OpenAI direct)");
        eprintln!("    OPENROUTER_API_KEY  = 'sk-or-v1-...'   (for OpenRouter)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let index = Arc::new(super::open_journal(&config).await?);
    let entries = index.len().await;

    let router = reverie_providers::build_from_config(&config);
    let provider = router.require_default()?;

    let mut session =
        ChatSession::start(index, provider, SessionSettings::from(&config)).await?;

    if let Some(msg) = message {
        // Single message mode
        session.send(&msg, print_token).await?;
        println!();
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  Reverie: chat with your journal");
    println!();
    println!("  Provider:  {}", config.default_provider);
    println!("  Model:     {}", config.default_model);
    println!("  Journal:   {} ({} threads)", config.journal.resolved_dir().display(), entries);
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type '/reset' to start over, 'exit' or Ctrl+D to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "" => {}
            "exit" | "quit" => break,
            "/reset" => {
                session.reset();
                debug!(session = %session.id(), "Reset requested");
                println!("  (conversation reset)");
            }
            _ => {
                print!("  Reverie > ");
                match session.send(input, print_token).await {
                    Ok(_) => println!(),
                    Err(e) => {
                        println!();
                        warn!(session = %session.id(), error = %e, "Turn failed");
                        eprintln!("  [Error] {e}");
                    }
                }
                println!();
            }
        }
        prompt()?;
    }

    println!();
    println!("  Goodbye!");
    println!();
    Ok(())
}

fn print_token(token: &str) {
    print!("{token}");
    let _ = std::io::stdout().flush();
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}
