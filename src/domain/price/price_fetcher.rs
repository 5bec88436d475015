//! Fetches price history through a [`PriceFeed`] and normalizes it into a [`PriceSeries`]

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::{PriceFeed, PriceObservation, PriceSeries};
use crate::shared::errors::StatsError;
use crate::shared::types::{TickerListing, Window};

/// Wraps the external feed call. No retries and no caching: every call re-fetches.
#[derive(Clone)]
pub struct PriceSeriesFetcher {
    feed: Arc<dyn PriceFeed>,
}

impl PriceSeriesFetcher {
    pub fn new(feed: Arc<dyn PriceFeed>) -> Self {
        Self { feed }
    }

    /// Fetch and normalize the series of `ticker` over the last `minutes`
    pub async fn fetch(&self, ticker: &str, minutes: Window) -> Result<PriceSeries, StatsError> {
        debug!(ticker, minutes = minutes.get(), "fetching price history");

        let payload = self
            .feed
            .fetch_price_history(ticker, minutes)
            .await
            .map_err(|e| {
                warn!(ticker, error = %e, "price feed call failed");
                StatsError::feed_unavailable(ticker, e.to_string())
            })?;

        let series = normalize(ticker, payload)?;
        debug!(ticker, observations = series.len(), "price history fetched");
        Ok(series)
    }

    pub async fn list_tickers(&self) -> Result<TickerListing, StatsError> {
        self.feed
            .list_tickers()
            .await
            .map_err(|e| StatsError::feed_unavailable("listing", e.to_string()))
    }
}

/// Turn a raw feed payload into a series, keeping the order the feed returned.
///
/// Accepts either a sequence of observations or a single `{ "stock": {..} }` object
/// carrying the latest price.
pub fn normalize(ticker: &str, payload: Value) -> Result<PriceSeries, StatsError> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("stock") {
            Some(latest @ Value::Object(_)) => vec![latest],
            _ => {
                return Err(StatsError::feed_unavailable(
                    ticker,
                    "expected a sequence of price observations",
                ))
            }
        },
        _ => {
            return Err(StatsError::feed_unavailable(
                ticker,
                "expected a sequence of price observations",
            ))
        }
    };

    let observations = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| parse_observation(ticker, index, item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PriceSeries::new(ticker, observations))
}

fn parse_observation(ticker: &str, index: usize, item: Value) -> Result<PriceObservation, StatsError> {
    let observation: PriceObservation = serde_json::from_value(item).map_err(|e| {
        StatsError::feed_unavailable(ticker, format!("malformed observation #{}: {}", index, e))
    })?;

    if !observation.price.is_finite() {
        return Err(StatsError::feed_unavailable(
            ticker,
            format!("non-finite price in observation #{}", index),
        ));
    }

    Ok(observation)
}
