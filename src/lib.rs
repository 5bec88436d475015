//! Stockstats - windowed average price and Pearson correlation over a stock price feed
//! Built with Domain-Driven Design principles

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export main types for convenience
pub use application::StockStatsService;
pub use domain::price::{PriceFeed, PriceObservation, PriceSeries, PriceSeriesFetcher};
pub use domain::statistics::{AverageResult, CorrelationMatrix, CorrelationResult};
pub use shared::errors::{AppError, FeedError, StatsError};
