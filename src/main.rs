//! Autofill Bridge
//!
//! Main entry point for the autofill bridge CLI.

mod cli;
mod fixture_vault;
mod logging;
mod stdio_bridge;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::BufReader;
use tracing::{info, warn};

use autofill_config::{Config, ConfigLoader, ConfigValidator};
use autofill_core::StatsSnapshot;
use autofill_userscript::AutofillUserScript;

use cli::{Cli, Commands};
use fixture_vault::FixtureVault;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // An explicit path must exist; the default one is optional.
    let config_path = cli.config.clone().unwrap_or_else(cli::default_config_path);
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load(path)?,
        None => ConfigLoader::load_or_default(&config_path)?,
    };

    match cli.command.unwrap_or(Commands::Serve {
        fixture: None,
        reply_timeout_ms: None,
    }) {
        Commands::Serve {
            fixture,
            reply_timeout_ms,
        } => {
            if let Some(fixture) = fixture {
                config.vault.fixture = Some(fixture);
            }
            if let Some(timeout) = reply_timeout_ms {
                config.bridge.reply_timeout_ms = timeout;
            }
            logging::init_tracing(&config.logging)?;
            serve(config).await
        }
        Commands::CheckConfig => check_config(&config_path, &config),
    }
}

async fn serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting autofill-bridge v{}", env!("CARGO_PKG_VERSION"));

    let result = ConfigValidator::validate(&config);
    for warning in &result.warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    result.into_result()?;

    let prompt_delay = Duration::from_millis(config.vault.prompt_delay_ms);
    let vault = match &config.vault.fixture {
        Some(path) => {
            let path = ConfigLoader::expand_path(&path.to_string_lossy());
            info!("Loading vault fixture from {}", path);
            FixtureVault::load(Path::new(&path), prompt_delay)?
        }
        None => FixtureVault::empty(prompt_delay),
    };

    let script = Arc::new(AutofillUserScript::new(Arc::new(vault), &config.bridge));
    match script.reply_timeout() {
        Some(timeout) => info!("Reply timeout: {} ms", timeout.as_millis()),
        None => info!("Reply timeout disabled"),
    }

    stdio_bridge::run(
        script.clone(),
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;

    log_summary(&script.replies().stats());
    Ok(())
}

fn log_summary(stats: &StatsSnapshot) {
    info!(
        registered = stats.registered,
        answered = stats.answered,
        superseded = stats.superseded,
        cancelled = stats.cancelled,
        missed = stats.missed,
        "autofill-bridge stopped"
    );
}

fn check_config(path: &Path, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("Configuration: {}", path.display());

    let result = ConfigValidator::validate(config);
    for warning in &result.warnings {
        println!("  warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("  error: {}: {}", error.path, error.message);
    }

    result.into_result()?;
    println!("Configuration is valid");
    Ok(())
}
