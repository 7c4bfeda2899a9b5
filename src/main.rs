//! Grok Weather Agent - command-line entry point.
//!
//! Usage:
//!   grok-weather-agent [CITY]       ask the agent for the weather (default: Auckland)
//!   grok-weather-agent --check-env  report whether XAI_API_KEY is available

use std::process::ExitCode;

use grok_weather_agent::{config, logging, weather::WeatherAgent, Config};
use tracing::{error, info, warn};

const DEFAULT_CITY: &str = "Auckland";

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = config::load_dotenv();

    let arg = std::env::args().nth(1);
    if arg.as_deref() == Some("--check-env") {
        check_env(matches!(dotenv, Ok(Some(_))));
        return ExitCode::SUCCESS;
    }

    // Variables from .env may set AGENT_LOG_FILE, so logging starts right after loading it.
    logging::init(&config::log_file_from_env());
    match &dotenv {
        Ok(Some(_)) => info!("✓ Environment variables loaded from .env file"),
        Ok(None) => {}
        Err(e) => warn!("Failed to load .env file: {}", e),
    }

    match run(arg.as_deref().unwrap_or(DEFAULT_CITY)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(city: &str) -> anyhow::Result<()> {
    let config = Config::from_env().map_err(|e| {
        for hint in e.hints() {
            error!("{}", hint);
            println!("{}", hint);
        }
        error!("Invalid configuration: {}", e);
        e
    })?;
    info!("Loaded configuration: model={}", config.model);

    let agent = WeatherAgent::new(&config)?;
    agent.run_demo(city).await?;

    Ok(())
}

fn check_env(dotenv_loaded: bool) {
    if dotenv_loaded {
        println!("✓ Environment variables loaded from .env file");
    }
    let key = config::api_key_from_env();
    println!("XAI_API_KEY exists: {}", key.is_some());
    if let Some(key) = key {
        println!("XAI_API_KEY: {}", config::key_preview(&key));
    }
}
