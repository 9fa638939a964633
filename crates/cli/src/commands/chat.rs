//! `sahayak chat`: interactive session in the terminal.

use sahayak_agent::{RuleBasedExtractor, Session};
use sahayak_config::AppConfig;
use sahayak_core::event::EventBus;
use sahayak_core::session::Language;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{self, AsyncBufReadExt, BufReader};

pub async fn run(language: Option<String>, confidence: f32) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if let Some(code) = language {
        config.session.language =
            Language::from_code(&code).ok_or_else(|| format!("Unsupported language '{code}'"))?;
    }

    let catalog = Arc::new(super::load_catalog(&config)?);
    let gateway = Arc::new(sahayak_tools::default_gateway(
        catalog.clone(),
        Duration::from_secs(config.tools.timeout_secs),
    ));
    let extractor = Arc::new(RuleBasedExtractor::new(&config.vocabulary)?);

    let event_bus = Arc::new(EventBus::default());
    let mut session = Session::new(config.session.clone(), gateway, extractor)
        .with_event_bus(event_bus.clone());

    let mut events = event_bus.subscribe_session(session.id().to_string());
    tokio::spawn(async move {
        while let Some(event) = events.next().await {
            tracing::debug!(
                session_id = events.session_id(),
                event = event.kind(),
                missed = events.missed(),
                detail = ?event,
                "Domain event"
            );
        }
    });
    tracing::debug!(subscribers = event_bus.subscriber_count(), "Event logging attached");

    println!();
    println!("  Sahayak: welfare scheme assistant");
    println!();
    println!("  Language:  {}", config.session.language.code());
    println!("  Schemes:   {}", catalog.len());
    println!("  Session:   {}", session.id());
    println!();
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();
    println!("  Sahayak > {}", session.greeting());
    println!();

    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit" | "/exit" | "/quit") {
            break;
        }

        match session.handle_turn(line, confidence).await {
            Ok(reply) => {
                println!();
                println!("  Sahayak > {reply}");
                println!();
            }
            Err(e) => {
                eprintln!("  [Error] {e}");
                break;
            }
        }

        if session.is_concluded() {
            if let Some(outcome) = session.outcome() {
                println!("  Session ended: {outcome}");
            }
            break;
        }
    }

    println!();
    Ok(())
}
