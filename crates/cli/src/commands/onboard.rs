//! `chatroute onboard`: First-time setup.

use chatroute_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("🦀 chatroute — First-Time Setup");
    println!("===============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Created config.toml at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Add your keys to {} or export them:", config_path.display());
    println!("        OPENAI_API_KEY   completion");
    println!("        SERPER_API_KEY   web search");
    println!("        WEATHER_API_KEY  current weather");
    println!("   2. Run: chatroute doctor");
    println!("   3. Run: chatroute chat\n");

    Ok(())
}
