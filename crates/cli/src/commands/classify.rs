//! `chatroute classify`: Show the routing decision for a message.

use chatroute_agent::{Intent, IntentClassifier};
use chatroute_config::AppConfig;

pub async fn run(text: String) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let classifier = IntentClassifier::new(&config.assistant.default_city);

    let intent = classifier.classify(&text);
    println!("  Intent:     {}", intent.kind());
    match &intent {
        Intent::Weather { city } => println!("  City:       {city}"),
        Intent::Search { query } => println!("  Query:      {query}"),
        Intent::Chat => {}
    }

    Ok(())
}
