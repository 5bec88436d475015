//! Common types used across the application

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::shared::errors::AppError;

/// Lookback window requested from the feed, in minutes
pub type Window = NonZeroU32;

/// Instrument listing as published by the feed: display name -> ticker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerListing {
    pub stocks: BTreeMap<String, String>,
}

/// Validate and normalize a ticker symbol supplied by a caller
pub fn parse_ticker(raw: &str) -> Result<String, AppError> {
    let ticker = raw.trim();
    if ticker.is_empty() {
        return Err(AppError::InvalidRequest("ticker must not be empty".to_string()));
    }
    if !ticker.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-') {
        return Err(AppError::InvalidRequest(format!("invalid ticker: {}", ticker)));
    }
    Ok(ticker.to_string())
}

/// Validate a lookback window; zero minutes is rejected
pub fn parse_window(minutes: u32) -> Result<Window, AppError> {
    NonZeroU32::new(minutes)
        .ok_or_else(|| AppError::InvalidRequest("minutes must be greater than 0".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ticker() {
        assert_eq!(parse_ticker(" NVDA ").unwrap(), "NVDA");
        assert_eq!(parse_ticker("BRK.B").unwrap(), "BRK.B");
        assert!(parse_ticker("").is_err());
        assert!(parse_ticker("   ").is_err());
        assert!(parse_ticker("AA/PL").is_err());
    }

    #[test]
    fn test_parse_window() {
        assert_eq!(parse_window(30).unwrap().get(), 30);
        assert!(parse_window(0).is_err());
    }
}
