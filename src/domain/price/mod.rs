//! Price domain - observations, series and the feed they come from

mod price_feed;
mod price_fetcher;

pub use price_feed::PriceFeed;
pub use price_fetcher::PriceSeriesFetcher;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped price sample from the feed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub price: f64,
    #[serde(rename = "lastUpdatedAt", alias = "observedAt")]
    pub observed_at: DateTime<Utc>,
}

impl PriceObservation {
    pub fn new(price: f64, observed_at: DateTime<Utc>) -> Self {
        Self { price, observed_at }
    }
}

/// Observations for one ticker over one window, in the order the feed returned them.
///
/// The order is never re-sorted: charting consumers rely on the arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub ticker: String,
    pub observations: Vec<PriceObservation>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, observations: Vec<PriceObservation>) -> Self {
        Self {
            ticker: ticker.into(),
            observations,
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Prices in series order
    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations.iter().map(|o| o.price)
    }
}
