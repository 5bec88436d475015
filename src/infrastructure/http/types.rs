//! REST API request and response types
//!
//! Response field names follow the dashboard's wire format (camelCase).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::price::PriceObservation;
use crate::domain::statistics::{AverageResult, CorrelationMatrix, CorrelationResult, PairFailure};

#[derive(Debug, Deserialize)]
pub struct AverageQuery {
    pub minutes: Option<String>,
    pub aggregation: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageResponse {
    pub average_stock_price: f64,
    pub price_history: Vec<PriceObservation>,
}

impl From<AverageResult> for AverageResponse {
    fn from(result: AverageResult) -> Self {
        Self {
            average_stock_price: result.average_price,
            price_history: result.series.observations,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub average_price: f64,
    pub price_history: Vec<PriceObservation>,
}

impl From<AverageResult> for StockSummary {
    fn from(result: AverageResult) -> Self {
        Self {
            average_price: result.average_price,
            price_history: result.series.observations,
        }
    }
}

fn summaries(averages: BTreeMap<String, AverageResult>) -> BTreeMap<String, StockSummary> {
    averages
        .into_iter()
        .map(|(ticker, average)| (ticker, average.into()))
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationResponse {
    pub correlation: f64,
    pub stocks: BTreeMap<String, StockSummary>,
}

impl From<CorrelationResult> for CorrelationResponse {
    fn from(result: CorrelationResult) -> Self {
        Self {
            correlation: result.correlation,
            stocks: summaries(result.averages),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixResponse {
    pub tickers: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
    pub stocks: BTreeMap<String, StockSummary>,
    pub failures: Vec<PairFailure>,
}

impl From<CorrelationMatrix> for MatrixResponse {
    fn from(matrix: CorrelationMatrix) -> Self {
        Self {
            tickers: matrix.tickers,
            matrix: matrix.values,
            stocks: summaries(matrix.averages),
            failures: matrix.failures,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
