//! CLI commands and handlers
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use crate::application::services::StockStatsService;
use crate::config::Config;
use crate::infrastructure::feed::create_feed;
use crate::infrastructure::http::server;
use crate::shared::errors::AppError;
use crate::shared::types::{parse_ticker, parse_window};

#[derive(Parser, Debug)]
#[command(name = "stockstats")]
#[command(version, about = "Windowed average price and Pearson correlation over a stock price feed")]
pub struct Cli {
    /// Path to config file (optional)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Serve prices from a JSON fixture file instead of the HTTP feed
    #[arg(long, global = true)]
    pub fixture: Option<PathBuf>,

    /// Lookback window in minutes (overrides config)
    #[arg(short, long, global = true)]
    pub minutes: Option<u32>,

    /// Log filter, e.g. "debug" or "stockstats=trace" (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Average price of one ticker over the window
    Average {
        ticker: String,
    },

    /// Pearson correlation between two tickers over the window
    Correlation {
        ticker_a: String,
        ticker_b: String,
    },

    /// Correlation matrix over a set of tickers
    Matrix {
        #[arg(required = true, num_args = 1..)]
        tickers: Vec<String>,
    },

    /// List the tickers known to the feed
    Stocks,

    /// Run the REST API
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

pub struct CommandExecutor;

impl CommandExecutor {
    /// Execute the selected command
    pub async fn execute(cli: Cli, config: Config) -> Result<(), AppError> {
        let feed = create_feed(&config, cli.fixture.as_deref())?;
        let service = StockStatsService::new(feed);
        let minutes = cli.minutes.unwrap_or(config.defaults.minutes);

        match cli.command {
            Commands::Average { ticker } => {
                let ticker = parse_ticker(&ticker)?;
                print_json(&service.average(&ticker, parse_window(minutes)?).await?)
            }
            Commands::Correlation { ticker_a, ticker_b } => {
                let ticker_a = parse_ticker(&ticker_a)?;
                let ticker_b = parse_ticker(&ticker_b)?;
                print_json(&service.correlation(&ticker_a, &ticker_b, parse_window(minutes)?).await?)
            }
            Commands::Matrix { tickers } => {
                let tickers = tickers
                    .iter()
                    .map(|t| parse_ticker(t))
                    .collect::<Result<Vec<_>, _>>()?;
                print_json(&service.correlation_matrix(&tickers, parse_window(minutes)?).await)
            }
            Commands::Stocks => print_json(&service.list_tickers().await?),
            Commands::Serve { host, port } => {
                let host = host.unwrap_or(config.server.host);
                let port = port.unwrap_or(config.server.port);
                server::serve(service, &host, port).await
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
