//! Pearson correlation between two price series

use std::collections::BTreeMap;

use serde::Serialize;

use super::AverageResult;
use crate::domain::price::PriceSeries;
use crate::shared::errors::StatsError;
use crate::shared::utils::round_to;

pub const CORRELATION_DECIMALS: i32 = 4;
pub const MIN_CORRELATION_OBSERVATIONS: usize = 2;

/// Correlation of two tickers plus the average of each full series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationResult {
    pub ticker_a: String,
    pub ticker_b: String,
    pub correlation: f64,
    pub averages: BTreeMap<String, AverageResult>,
}

impl CorrelationResult {
    pub fn from_series(series_a: PriceSeries, series_b: PriceSeries) -> Result<Self, StatsError> {
        let correlation = correlation(&series_a, &series_b)?;

        let ticker_a = series_a.ticker.clone();
        let ticker_b = series_b.ticker.clone();
        let mut averages = BTreeMap::new();
        for series in [series_a, series_b] {
            let result = AverageResult::from_series(series)?;
            averages.insert(result.ticker.clone(), result);
        }

        Ok(Self {
            ticker_a,
            ticker_b,
            correlation,
            averages,
        })
    }
}

/// Sample Pearson correlation (Bessel-corrected), rounded to 4 decimal places.
///
/// The series are aligned by position, not by timestamp: only the first
/// `n = min(len_a, len_b)` observations of each are used. The result is only
/// meaningful when both feeds sample at the same cadence within the window.
///
/// Fails with `InsufficientData` when `n < 2` and with `DegenerateSeries` when
/// either truncated series has zero variance.
pub fn correlation(series_a: &PriceSeries, series_b: &PriceSeries) -> Result<f64, StatsError> {
    let n = series_a.len().min(series_b.len());
    if n < MIN_CORRELATION_OBSERVATIONS {
        return Err(StatsError::InsufficientData {
            required: MIN_CORRELATION_OBSERVATIONS,
            actual: n,
        });
    }

    let xs: Vec<f64> = series_a.prices().take(n).collect();
    let ys: Vec<f64> = series_b.prices().take(n).collect();
    ensure_varies(&series_a.ticker, &xs)?;
    ensure_varies(&series_b.ticker, &ys)?;

    let mean_x = mean(&xs);
    let mean_y = mean(&ys);
    let dof = (n - 1) as f64;

    let covariance = xs
        .iter()
        .zip(&ys)
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum::<f64>()
        / dof;
    let std_x = sample_std(&xs, mean_x, dof);
    let std_y = sample_std(&ys, mean_y, dof);

    if std_x == 0.0 || !std_x.is_finite() {
        return Err(degenerate(&series_a.ticker));
    }
    if std_y == 0.0 || !std_y.is_finite() {
        return Err(degenerate(&series_b.ticker));
    }

    let r = covariance / (std_x * std_y);
    if !r.is_finite() {
        return Err(degenerate(&series_a.ticker));
    }

    Ok(round_to(r, CORRELATION_DECIMALS))
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std(values: &[f64], mean: f64, dof: f64) -> f64 {
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / dof).sqrt()
}

// Constant prices: mean may carry rounding error, so compare the raw values.
fn ensure_varies(ticker: &str, values: &[f64]) -> Result<(), StatsError> {
    match values.split_first() {
        Some((first, rest)) if rest.iter().all(|v| v == first) => Err(degenerate(ticker)),
        _ => Ok(()),
    }
}

fn degenerate(ticker: &str) -> StatsError {
    StatsError::DegenerateSeries {
        ticker: ticker.to_string(),
    }
}
