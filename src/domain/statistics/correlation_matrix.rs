//! N x N correlation matrix over a set of tickers

use std::collections::{BTreeMap, HashMap};

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use super::{correlation, AverageResult};
use crate::domain::price::{PriceSeries, PriceSeriesFetcher};
use crate::shared::errors::StatsError;
use crate::shared::types::Window;
use crate::shared::utils::dedup_preserving_order;

/// A pair whose correlation could not be computed and was recorded as `0.0`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairFailure {
    pub ticker_a: String,
    pub ticker_b: String,
    pub reason: String,
}

/// Symmetric matrix of pairwise correlations.
///
/// `values[i][j]` is the correlation of `tickers[i]` and `tickers[j]`. The diagonal
/// is fixed at `1.0`; a pair that failed for any reason holds `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub tickers: Vec<String>,
    pub values: Vec<Vec<f64>>,
    pub averages: BTreeMap<String, AverageResult>,
    pub failures: Vec<PairFailure>,
}

impl CorrelationMatrix {
    /// Fetch each distinct ticker once, concurrently, then assemble the matrix.
    ///
    /// The fetched series live only for the duration of this call.
    pub async fn build(
        fetcher: &PriceSeriesFetcher,
        tickers: &[String],
        minutes: Window,
    ) -> Self {
        let tickers = dedup_preserving_order(tickers);
        info!(
            tickers = tickers.len(),
            minutes = minutes.get(),
            "building correlation matrix"
        );

        let fetched = join_all(tickers.iter().map(|ticker| fetcher.fetch(ticker, minutes))).await;
        let series: HashMap<String, Result<PriceSeries, StatsError>> =
            tickers.iter().cloned().zip(fetched).collect();

        Self::from_series(&tickers, &series)
    }

    /// Assemble the matrix from already fetched series; `tickers` must be distinct.
    ///
    /// A ticker missing from `series` is treated as a failed fetch.
    pub fn from_series(
        tickers: &[String],
        series: &HashMap<String, Result<PriceSeries, StatsError>>,
    ) -> Self {
        let size = tickers.len();
        let mut values = vec![vec![0.0; size]; size];
        let mut failures = Vec::new();

        for i in 0..size {
            values[i][i] = 1.0;
            for j in (i + 1)..size {
                let result = match (lookup(series, &tickers[i]), lookup(series, &tickers[j])) {
                    (Ok(a), Ok(b)) => correlation(a, b),
                    (Err(e), _) | (_, Err(e)) => Err(e),
                };

                let value = result.unwrap_or_else(|e| {
                    warn!(
                        ticker_a = %tickers[i],
                        ticker_b = %tickers[j],
                        error = %e,
                        "pairwise correlation failed, using 0.0"
                    );
                    failures.push(PairFailure {
                        ticker_a: tickers[i].clone(),
                        ticker_b: tickers[j].clone(),
                        reason: e.to_string(),
                    });
                    0.0
                });

                values[i][j] = value;
                values[j][i] = value;
            }
        }

        let averages = tickers
            .iter()
            .filter_map(|ticker| {
                let series = lookup(series, ticker).ok()?;
                match AverageResult::from_series(series.clone()) {
                    Ok(average) => Some((ticker.clone(), average)),
                    Err(e) => {
                        warn!(ticker = %ticker, error = %e, "no average for ticker");
                        None
                    }
                }
            })
            .collect();

        Self {
            tickers: tickers.to_vec(),
            values,
            averages,
            failures,
        }
    }

    pub fn size(&self) -> usize {
        self.tickers.len()
    }

    /// Correlation of two tickers, `None` if either is not part of the matrix
    pub fn get(&self, ticker_a: &str, ticker_b: &str) -> Option<f64> {
        let i = self.index_of(ticker_a)?;
        let j = self.index_of(ticker_b)?;
        Some(self.values[i][j])
    }

    fn index_of(&self, ticker: &str) -> Option<usize> {
        self.tickers.iter().position(|t| t == ticker)
    }
}

fn lookup<'a>(
    series: &'a HashMap<String, Result<PriceSeries, StatsError>>,
    ticker: &str,
) -> Result<&'a PriceSeries, StatsError> {
    match series.get(ticker) {
        Some(Ok(series)) => Ok(series),
        Some(Err(e)) => Err(e.clone()),
        None => Err(StatsError::feed_unavailable(ticker, "series not fetched")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PriceObservation;
    use chrono::Utc;

    fn series(ticker: &str, prices: &[f64]) -> PriceSeries {
        let now = Utc::now();
        PriceSeries::new(
            ticker,
            prices.iter().map(|p| PriceObservation::new(*p, now)).collect(),
        )
    }

    fn tickers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn fetched(entries: Vec<(&str, Result<PriceSeries, StatsError>)>) -> HashMap<String, Result<PriceSeries, StatsError>> {
        entries.into_iter().map(|(t, s)| (t.to_string(), s)).collect()
    }

    #[test]
    fn test_matrix_diagonal_and_symmetry() {
        let names = tickers(&["A", "B", "C"]);
        let data = fetched(vec![
            ("A", Ok(series("A", &[1.0, 2.0, 3.0, 4.0, 5.0]))),
            ("B", Ok(series("B", &[2.0, 4.0, 6.0, 8.0, 10.0]))),
            ("C", Ok(series("C", &[2.0, 1.0, 4.0, 3.0, 5.0]))),
        ]);

        let matrix = CorrelationMatrix::from_series(&names, &data);

        assert_eq!(matrix.size(), 3);
        for t in &names {
            assert_eq!(matrix.get(t, t), Some(1.0));
        }
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(matrix.values[i][j], matrix.values[j][i]);
            }
        }
        assert_eq!(matrix.get("A", "B"), Some(1.0));
        assert_eq!(matrix.get("A", "C"), Some(0.8));
        assert_eq!(matrix.get("C", "B"), Some(0.8));
        assert!(matrix.failures.is_empty());
        assert_eq!(matrix.averages["A"].average_price, 3.0);
        assert_eq!(matrix.averages["B"].average_price, 6.0);
    }

    #[test]
    fn test_failed_ticker_only_zeroes_its_pairs() {
        let names = tickers(&["A", "DOWN", "B"]);
        let data = fetched(vec![
            ("A", Ok(series("A", &[1.0, 2.0, 3.0]))),
            ("DOWN", Err(StatsError::feed_unavailable("DOWN", "status 503"))),
            ("B", Ok(series("B", &[3.0, 2.0, 1.0]))),
        ]);

        let matrix = CorrelationMatrix::from_series(&names, &data);

        assert_eq!(matrix.get("A", "B"), Some(-1.0));
        assert_eq!(matrix.get("A", "DOWN"), Some(0.0));
        assert_eq!(matrix.get("DOWN", "B"), Some(0.0));
        assert_eq!(matrix.get("DOWN", "DOWN"), Some(1.0));
        assert_eq!(matrix.failures.len(), 2);
        assert!(!matrix.averages.contains_key("DOWN"));
        assert_eq!(matrix.averages.len(), 2);
    }

    #[test]
    fn test_degenerate_and_short_pairs_become_zero() {
        let names = tickers(&["FLAT", "ONE", "UP"]);
        let data = fetched(vec![
            ("FLAT", Ok(series("FLAT", &[5.0, 5.0, 5.0]))),
            ("ONE", Ok(series("ONE", &[9.0]))),
            ("UP", Ok(series("UP", &[1.0, 2.0, 3.0]))),
        ]);

        let matrix = CorrelationMatrix::from_series(&names, &data);

        assert_eq!(matrix.get("FLAT", "UP"), Some(0.0));
        assert_eq!(matrix.get("ONE", "UP"), Some(0.0));
        assert_eq!(matrix.get("FLAT", "ONE"), Some(0.0));
        assert_eq!(matrix.failures.len(), 3);
        // Averages are still available for every successfully fetched ticker.
        assert_eq!(matrix.averages["FLAT"].average_price, 5.0);
        assert_eq!(matrix.averages["ONE"].average_price, 9.0);
    }

    #[test]
    fn test_empty_series_has_no_average() {
        let names = tickers(&["EMPTY", "UP"]);
        let data = fetched(vec![
            ("EMPTY", Ok(series("EMPTY", &[]))),
            ("UP", Ok(series("UP", &[1.0, 2.0]))),
        ]);

        let matrix = CorrelationMatrix::from_series(&names, &data);

        assert_eq!(matrix.get("EMPTY", "UP"), Some(0.0));
        assert!(!matrix.averages.contains_key("EMPTY"));
    }

    #[test]
    fn test_single_ticker_matrix() {
        let names = tickers(&["A"]);
        let data = fetched(vec![("A", Ok(series("A", &[1.0, 2.0])))]);

        let matrix = CorrelationMatrix::from_series(&names, &data);

        assert_eq!(matrix.values, vec![vec![1.0]]);
        assert_eq!(matrix.get("A", "Z"), None);
    }
}
