//! `chatroute chat`: Interactive chat session.

use std::io::Write;
use std::path::{Path, PathBuf};
use chatroute_agent::{ConversationRouter, History};
use chatroute_config::AppConfig;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::warn;

/// What a line of input asks the REPL to do.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Skip,
    Quit,
    Clear,
    ShowHistory,
    Message(&'a str),
}

fn parse_line(line: &str) -> Line<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Line::Skip;
    }
    match line.to_lowercase().as_str() {
        "quit" | "exit" | "bye" | "/quit" | "/exit" => Line::Quit,
        "/clear" => Line::Clear,
        "/history" => Line::ShowHistory,
        _ => Line::Message(line),
    }
}

pub async fn run(history_file: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let history_file = history_file.or_else(|| config.assistant.history_file.clone());

    let mut router = ConversationRouter::from_config(&config);
    if let Some(path) = &history_file {
        router = router.with_history(load_history(path, config.assistant.history_capacity));
    }

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║          chatroute — Interactive Chat         ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", config.default_provider);
    println!("  Model:     {}", config.default_model);
    println!(
        "  Context:   search {}, weather {}",
        status(config.search_key().is_some()),
        status(config.weather_key().is_some()),
    );
    if !router.completer().is_configured() {
        println!("  Warning:   no completion API key, replies will be placeholders");
    }
    if let Some(path) = &history_file {
        println!("  History:   {} ({} turns)", path.display(), router.history().len());
    }
    println!();
    println!("  Ask about the weather, search the web, or just chat.");
    println!("  Type 'quit', 'exit' or 'bye' to leave; /clear and /history manage history.");
    println!();

    let mut lines = BufReader::new(io::stdin()).lines();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(raw) = lines.next_line().await? else {
            break; // EOF (Ctrl+D)
        };

        match parse_line(&raw) {
            Line::Skip => continue,
            Line::Quit => break,
            Line::Clear => {
                router.clear_history();
                println!("  History cleared.\n");
            }
            Line::ShowHistory => {
                if router.history().is_empty() {
                    println!("  (no turns yet)\n");
                }
                for (i, turn) in router.history().iter().enumerate() {
                    println!("  [{}] You > {}", i + 1, turn.user());
                    println!("      Assistant > {}", turn.assistant());
                }
                println!();
            }
            Line::Message(text) => {
                eprint!("  ...");
                let reply = router.process(text).await;
                eprint!("\r     \r");

                println!();
                for line in reply.lines() {
                    println!("  Assistant > {line}");
                }
                println!();

                if let Some(path) = &history_file {
                    if let Err(e) = router.save_history(path) {
                        warn!(error = %e, "Could not save history");
                    }
                }
            }
        }
    }

    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}

/// A history file that cannot be read starts the session empty.
fn load_history(path: &Path, capacity: usize) -> History {
    History::load(path, capacity).unwrap_or_else(|e| {
        warn!(error = %e, "Could not load history, starting fresh");
        History::new(capacity)
    })
}

fn status(present: bool) -> &'static str {
    if present { "on" } else { "off (no key)" }
}
