//! Application services and use cases

use std::sync::Arc;

use tracing::info;

use crate::domain::price::{PriceFeed, PriceSeriesFetcher};
use crate::domain::statistics::{AverageResult, CorrelationMatrix, CorrelationResult};
use crate::shared::errors::StatsError;
use crate::shared::types::{TickerListing, Window};

/// Fetches the series each request needs and runs the statistics over them
#[derive(Clone)]
pub struct StockStatsService {
    fetcher: PriceSeriesFetcher,
}

impl StockStatsService {
    pub fn new(feed: Arc<dyn PriceFeed>) -> Self {
        Self {
            fetcher: PriceSeriesFetcher::new(feed),
        }
    }

    /// Average price of one ticker over the window
    pub async fn average(&self, ticker: &str, minutes: Window) -> Result<AverageResult, StatsError> {
        let series = self.fetcher.fetch(ticker, minutes).await?;
        let result = AverageResult::from_series(series)?;
        info!(ticker, average = result.average_price, "average computed");
        Ok(result)
    }

    /// Correlation of two tickers; both series are fetched concurrently
    pub async fn correlation(
        &self,
        ticker_a: &str,
        ticker_b: &str,
        minutes: Window,
    ) -> Result<CorrelationResult, StatsError> {
        let (series_a, series_b) = tokio::try_join!(
            self.fetcher.fetch(ticker_a, minutes),
            self.fetcher.fetch(ticker_b, minutes),
        )?;

        let result = CorrelationResult::from_series(series_a, series_b)?;
        info!(ticker_a, ticker_b, correlation = result.correlation, "correlation computed");
        Ok(result)
    }

    /// Pairwise correlation matrix; failing pairs degrade to `0.0` instead of failing the call
    pub async fn correlation_matrix(&self, tickers: &[String], minutes: Window) -> CorrelationMatrix {
        let matrix = CorrelationMatrix::build(&self.fetcher, tickers, minutes).await;
        info!(
            tickers = matrix.size(),
            failed_pairs = matrix.failures.len(),
            "correlation matrix computed"
        );
        matrix
    }

    pub async fn list_tickers(&self) -> Result<TickerListing, StatsError> {
        self.fetcher.list_tickers().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::feed::FixturePriceFeed;
    use serde_json::json;
    use std::time::Duration;

    fn window() -> Window {
        Window::new(30).unwrap()
    }

    fn service(feed: FixturePriceFeed) -> (StockStatsService, Arc<FixturePriceFeed>) {
        let feed = Arc::new(feed);
        (StockStatsService::new(feed.clone()), feed)
    }

    #[tokio::test]
    async fn test_average() {
        let (service, _) = service(FixturePriceFeed::new().with_prices("AAPL", &[10.0, 20.0]));

        let result = service.average("AAPL", window()).await.unwrap();

        assert_eq!(result.ticker, "AAPL");
        assert_eq!(result.average_price, 15.0);
        assert_eq!(result.series.len(), 2);
    }

    #[tokio::test]
    async fn test_average_errors_propagate() {
        let feed = FixturePriceFeed::new()
            .with_payload("EMPTY", json!([]))
            .with_failure("DOWN");
        let (service, _) = service(feed);

        assert_eq!(
            service.average("EMPTY", window()).await,
            Err(StatsError::InsufficientData { required: 1, actual: 0 })
        );
        assert!(matches!(
            service.average("DOWN", window()).await,
            Err(StatsError::FeedUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_correlation_scenario() {
        let feed = FixturePriceFeed::new()
            .with_prices("A", &[1.0, 2.0, 3.0, 4.0, 5.0])
            .with_prices("B", &[2.0, 4.0, 6.0, 8.0, 10.0]);
        let (service, _) = service(feed);

        let result = service.correlation("A", "B", window()).await.unwrap();

        assert_eq!(result.correlation, 1.0);
        assert_eq!(result.averages["A"].average_price, 3.0);
        assert_eq!(result.averages["B"].average_price, 6.0);
    }

    #[tokio::test]
    async fn test_correlation_errors_propagate() {
        let feed = FixturePriceFeed::new()
            .with_prices("A", &[1.0, 2.0, 3.0])
            .with_prices("FLAT", &[4.0, 4.0, 4.0])
            .with_failure("DOWN");
        let (service, _) = service(feed);

        assert!(matches!(
            service.correlation("A", "DOWN", window()).await,
            Err(StatsError::FeedUnavailable { ref ticker, .. }) if ticker == "DOWN"
        ));
        assert_eq!(
            service.correlation("A", "FLAT", window()).await,
            Err(StatsError::DegenerateSeries { ticker: "FLAT".to_string() })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_correlation_fetches_concurrently() {
        let feed = FixturePriceFeed::new()
            .with_prices("A", &[1.0, 2.0, 3.0])
            .with_prices("B", &[3.0, 2.0, 1.0])
            .with_delay(Duration::from_millis(100));
        let (service, _) = service(feed);

        let started = tokio::time::Instant::now();
        let result = service.correlation("A", "B", window()).await.unwrap();

        assert_eq!(result.correlation, -1.0);
        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_matrix_fetches_each_ticker_once() {
        let feed = FixturePriceFeed::new()
            .with_prices("A", &[1.0, 2.0, 3.0, 4.0])
            .with_prices("B", &[2.0, 4.0, 6.0, 8.0])
            .with_prices("C", &[4.0, 3.0, 2.0, 1.0]);
        let (service, feed) = service(feed);
        let tickers: Vec<String> = ["A", "B", "C", "A"].iter().map(|s| s.to_string()).collect();

        let matrix = service.correlation_matrix(&tickers, window()).await;

        assert_eq!(matrix.tickers, vec!["A", "B", "C"]);
        assert_eq!(matrix.get("A", "B"), Some(1.0));
        assert_eq!(matrix.get("A", "C"), Some(-1.0));
        assert_eq!(matrix.get("B", "C"), Some(-1.0));
        for ticker in ["A", "B", "C"] {
            assert_eq!(feed.call_count(ticker), 1);
        }
    }

    #[tokio::test]
    async fn test_matrix_isolates_failed_ticker() {
        let feed = FixturePriceFeed::new()
            .with_prices("A", &[1.0, 2.0, 3.0])
            .with_prices("B", &[1.0, 3.0, 2.0])
            .with_failure("DOWN")
            .with_payload("BAD", json!({ "unexpected": true }));
        let (service, _) = service(feed);
        let tickers: Vec<String> = ["A", "DOWN", "B", "BAD"].iter().map(|s| s.to_string()).collect();

        let matrix = service.correlation_matrix(&tickers, window()).await;

        assert_eq!(matrix.get("A", "B"), Some(0.5));
        for other in ["A", "B", "BAD"] {
            assert_eq!(matrix.get("DOWN", other), Some(0.0));
        }
        assert_eq!(matrix.get("BAD", "A"), Some(0.0));
        assert_eq!(matrix.get("DOWN", "DOWN"), Some(1.0));
        assert_eq!(matrix.get("BAD", "BAD"), Some(1.0));
        assert_eq!(matrix.failures.len(), 5);
    }
}
