//! `chatroute ask`: Single-message mode.

use chatroute_agent::ConversationRouter;
use chatroute_config::AppConfig;

pub async fn run(message: String) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let mut router = ConversationRouter::from_config(&config);

    eprint!("  Thinking...");
    let reply = router.process(&message).await;
    eprint!("\r              \r");
    println!("{reply}");

    Ok(())
}
