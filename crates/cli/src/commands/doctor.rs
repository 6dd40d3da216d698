//! `chatroute doctor`: Diagnose configuration and credentials.

use chatroute_config::AppConfig;
use chatroute_core::Provider;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 chatroute Doctor — Configuration Check");
    println!("=========================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file, using defaults — run `chatroute onboard`");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!("\n  ⚠️  Fix the config file and run doctor again.");
            return Ok(());
        }
    };

    if let Some(provider) = chatroute_providers::build_from_config(&config).default() {
        println!(
            "  ✅ Completion provider ready: {} ({})",
            config.default_provider, config.default_model
        );
        match provider.health_check().await {
            Ok(true) => println!("  ✅ Completion endpoint reachable"),
            Ok(false) => {
                println!("  ⚠️  Completion endpoint answered with an error — check the key and URL");
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Completion endpoint unreachable: {e}");
                issues += 1;
            }
        }
    } else {
        println!("  ❌ No completion API key — set OPENAI_API_KEY or api_key in config.toml");
        issues += 1;
    }

    if config.search_key().is_some() {
        println!("  ✅ Search key configured");
    } else {
        println!("  ⚠️  No search key — set SERPER_API_KEY; search questions get a placeholder");
        issues += 1;
    }

    if config.weather_key().is_some() {
        println!("  ✅ Weather key configured");
    } else {
        println!("  ⚠️  No weather key — set WEATHER_API_KEY; weather questions get a placeholder");
        issues += 1;
    }

    if let Some(path) = &config.assistant.history_file {
        println!("  ✅ History file: {}", path.display());
    }

    println!(
        "  ℹ️  History keeps {} turns, replays the last {}",
        config.assistant.history_capacity,
        config.effective_history_window()
    );

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
