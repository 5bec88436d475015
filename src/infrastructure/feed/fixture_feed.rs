use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use std::fs;

use crate::domain::price::PriceFeed;
use crate::shared::errors::{AppError, FeedError};
use crate::shared::types::{TickerListing, Window};

/// Price feed serving canned payloads, for offline runs and tests.
///
/// Payloads are returned verbatim, so malformed ones can be scripted too.
#[derive(Default)]
pub struct FixturePriceFeed {
    payloads: HashMap<String, Value>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    calls: Mutex<HashMap<String, usize>>,
}

impl FixturePriceFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `{ "<TICKER>": [ { "price": .., "lastUpdatedAt": .. }, .. ], .. }`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::ConfigError(format!("Failed to read fixture {}: {}", path.display(), e))
        })?;
        let payloads: HashMap<String, Value> = serde_json::from_str(&content).map_err(|e| {
            AppError::ConfigError(format!("Failed to parse fixture {}: {}", path.display(), e))
        })?;

        Ok(Self {
            payloads,
            ..Self::default()
        })
    }

    /// Serve `payload` verbatim for `ticker`
    pub fn with_payload(mut self, ticker: &str, payload: Value) -> Self {
        self.payloads.insert(ticker.to_string(), payload);
        self
    }

    /// Serve `prices` for `ticker`, one observation per minute
    pub fn with_prices(self, ticker: &str, prices: &[f64]) -> Self {
        let start = fixture_epoch();
        let history: Vec<Value> = prices
            .iter()
            .enumerate()
            .map(|(i, price)| {
                let at = start + ChronoDuration::minutes(i as i64);
                json!({ "price": price, "lastUpdatedAt": at.to_rfc3339() })
            })
            .collect();
        self.with_payload(ticker, Value::Array(history))
    }

    /// Every fetch of `ticker` fails at the transport level
    pub fn with_failure(mut self, ticker: &str) -> Self {
        self.failing.insert(ticker.to_string());
        self
    }

    /// Sleep before answering each fetch
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of price history fetches made for `ticker`
    pub fn call_count(&self, ticker: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(ticker)
            .copied()
            .unwrap_or(0)
    }
}

fn fixture_epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(1_746_676_800, 0)
        .single()
        .unwrap_or_default()
}

#[async_trait]
impl PriceFeed for FixturePriceFeed {
    async fn fetch_price_history(&self, ticker: &str, _minutes: Window) -> Result<Value, FeedError> {
        *self
            .calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(ticker.to_string())
            .or_insert(0) += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(ticker) {
            return Err(FeedError::Status(503));
        }

        self.payloads
            .get(ticker)
            .cloned()
            .ok_or(FeedError::Status(404))
    }

    async fn list_tickers(&self) -> Result<TickerListing, FeedError> {
        let stocks: BTreeMap<String, String> = self
            .payloads
            .keys()
            .chain(self.failing.iter())
            .map(|t| (t.clone(), t.clone()))
            .collect();
        Ok(TickerListing { stocks })
    }
}
