//! Arithmetic mean of a price series

use serde::Serialize;

use crate::domain::price::PriceSeries;
use crate::shared::errors::StatsError;
use crate::shared::utils::round_to;

pub const AVERAGE_DECIMALS: i32 = 6;

/// Average price of one ticker, together with the series it was computed from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageResult {
    pub ticker: String,
    pub average_price: f64,
    pub series: PriceSeries,
}

impl AverageResult {
    pub fn from_series(series: PriceSeries) -> Result<Self, StatsError> {
        let average_price = average(&series)?;
        Ok(Self {
            ticker: series.ticker.clone(),
            average_price,
            series,
        })
    }
}

/// Mean price over all observations, rounded to 6 decimal places.
///
/// An empty series has no mean and fails with `InsufficientData`.
pub fn average(series: &PriceSeries) -> Result<f64, StatsError> {
    if series.is_empty() {
        return Err(StatsError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }

    let mean = series.prices().sum::<f64>() / series.len() as f64;
    Ok(round_to(mean, AVERAGE_DECIMALS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PriceObservation;
    use chrono::Utc;

    fn series(prices: &[f64]) -> PriceSeries {
        let now = Utc::now();
        PriceSeries::new(
            "TEST",
            prices.iter().map(|p| PriceObservation::new(*p, now)).collect(),
        )
    }

    #[test]
    fn test_average_empty_series() {
        assert_eq!(
            average(&series(&[])),
            Err(StatsError::InsufficientData { required: 1, actual: 0 })
        );
    }

    #[test]
    fn test_average_values() {
        assert_eq!(average(&series(&[10.0])).unwrap(), 10.0);
        assert_eq!(average(&series(&[10.0, 20.0])).unwrap(), 15.0);
        assert_eq!(average(&series(&[1.0, 2.0, 3.0, 4.0, 5.0])).unwrap(), 3.0);
    }

    #[test]
    fn test_average_is_rounded() {
        assert_eq!(average(&series(&[1.0, 1.0, 2.0])).unwrap(), 1.333333);
        assert_eq!(average(&series(&[231.95, 124.9512345])).unwrap(), 178.450617);
    }

    #[test]
    fn test_average_result_keeps_series() {
        let result = AverageResult::from_series(series(&[2.0, 4.0])).unwrap();
        assert_eq!(result.ticker, "TEST");
        assert_eq!(result.average_price, 3.0);
        assert_eq!(result.series.len(), 2);
    }
}
