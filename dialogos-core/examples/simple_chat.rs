//! Simple chat example demonstrating basic usage
//!
//! Runs a short two-turn conversation against the OpenAI API.
//! Requires OPENAI_API_KEY to be set.

use std::sync::Arc;

use dialogos_core::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = DialogosConfig::load()?;
    let store = Arc::new(SessionStore::new(config.history.max_entries));
    let provider = Arc::new(OpenAIProvider::from_config(&config.completion)?);
    let engine = ChatEngine::new(&config, store, provider)?;

    println!("Dialogos Simple Chat");
    println!("====================\n");

    let first = engine.ask("What is 2+2?", None, false).await?;
    println!("> What is 2+2?");
    println!("{}\n", first.reply);

    // Same session: the engine remembers the previous turn
    let second = engine
        .ask(
            "Now explain why, as if I were five.",
            Some(&first.session_id),
            false,
        )
        .await?;
    println!("> Now explain why, as if I were five.");
    println!("{}\n", second.reply);

    // A refined answer: drafted loose, rewritten tight
    let refined = engine
        .ask(
            "Summarize our conversation so far.",
            Some(&first.session_id),
            true,
        )
        .await?;
    println!("> Summarize our conversation so far. (refined)");
    println!("{}\n", refined.reply);

    println!("session: {}", first.session_id);
    println!("tracked sessions: {}", engine.session_count());

    engine.clear_session(&first.session_id);

    Ok(())
}
