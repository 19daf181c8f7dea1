use std::process::ExitCode;

use clap::Parser;

use chain_analytics::cli::{execute, Cli, Explorers};
use chain_analytics::config::{self, AppConfig};
use chain_analytics::explorer::ethereum::PLACEHOLDER_API_KEY;
use chain_analytics::explorer::{BitcoinExplorer, EthereumExplorer};
use chain_analytics::observability::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = config::resolve_config(cli.config.as_deref())?;
    logging::init(&config.observability);
    tracing::debug!(
        config_file = ?cli.config,
        bitcoin_url = %config.bitcoin.base_url,
        ethereum_url = %config.ethereum.base_url,
        ethereum_key_set = config.ethereum.api_key.is_some(),
        "Configuration resolved"
    );

    let explorers = build_explorers(&config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&cli.command, &explorers, &mut out).await?;
    Ok(())
}

/// The only place the placeholder key is supplied.
fn build_explorers(config: &AppConfig) -> Result<Explorers, Box<dyn std::error::Error>> {
    let api_key = match &config.ethereum.api_key {
        Some(key) => key.clone(),
        None => {
            tracing::debug!("No Ethereum API key configured, falling back to placeholder");
            PLACEHOLDER_API_KEY.to_string()
        }
    };

    Ok(Explorers {
        bitcoin: BitcoinExplorer::new(&config.bitcoin)?,
        ethereum: EthereumExplorer::new(&config.ethereum, api_key)?,
    })
}
