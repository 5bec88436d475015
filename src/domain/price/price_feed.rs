//! Price feed interface

use async_trait::async_trait;
use serde_json::Value;

use crate::shared::errors::FeedError;
use crate::shared::types::{TickerListing, Window};

/// External price feed provider.
///
/// Implementations own transport concerns (auth tokens, timeouts). They return the
/// raw payload; shape validation is done by [`super::PriceSeriesFetcher`].
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Fetch the raw price history of `ticker` over the last `minutes`
    async fn fetch_price_history(&self, ticker: &str, minutes: Window) -> Result<Value, FeedError>;

    /// List the instruments the feed knows about
    async fn list_tickers(&self) -> Result<TickerListing, FeedError>;
}
