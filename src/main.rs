#![allow(clippy::uninlined_format_args)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use product_scout_lib::api::run_server;
use product_scout_lib::client::{DEFAULT_API_URL, SearchClient, render_cards};
use product_scout_lib::infrastructure::config::AppConfig;
use product_scout_lib::infrastructure::logging::{init_logging_with_config, log_system_info};

#[derive(Debug, Parser)]
#[command(name = "product-scout", version, about = "Keyword search scraper for e-commerce listings")]
struct Cli {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(long, global = true, env = "PRODUCT_SCOUT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Port to listen on, overriding configuration
        #[arg(long)]
        port: Option<u16>,
    },
    /// Query a running service and print the results
    Search {
        keyword: String,
        #[arg(long, env = "PRODUCT_SCOUT_API_URL", default_value = DEFAULT_API_URL)]
        api_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
                config.validate()?;
            }
            init_logging_with_config(&config.logging)?;
            log_system_info();
            run_server(config).await
        }
        Commands::Search { keyword, api_url } => {
            // Keep the terminal for the cards
            config.logging.level = "warn".to_string();
            init_logging_with_config(&config.logging)?;

            let client = SearchClient::new(api_url)?;
            info!("Querying {}", client.api_url());
            let result = client.search(&keyword).await?;
            print!("{}", render_cards(&result));
            Ok(())
        }
    }
}
