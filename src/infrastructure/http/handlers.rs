//! REST API endpoint handlers
//!
//! - `GET /stocks/:ticker?minutes=M&aggregation=average`
//! - `GET /stockcorrelation?minutes=M&ticker=A&ticker=B`
//! - `GET /stockcorrelation/matrix?minutes=M&ticker=A&ticker=B&ticker=C`

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use super::types::*;
use crate::application::services::StockStatsService;
use crate::shared::errors::{AppError, StatsError};
use crate::shared::types::{parse_ticker, parse_window, TickerListing, Window};

/// Shared state for API handlers
pub struct ApiState {
    pub service: StockStatsService,
}

impl ApiState {
    pub fn new(service: StockStatsService) -> Self {
        Self { service }
    }
}

/// Error carried back to the client as `{ "error": message }`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<StatsError> for ApiError {
    fn from(err: StatsError) -> Self {
        let status = match err {
            StatsError::FeedUnavailable { .. } => StatusCode::BAD_GATEWAY,
            StatsError::InsufficientData { .. } | StatsError::DegenerateSeries { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Stats(e) => e.into(),
            AppError::InvalidRequest(message) => Self::bad_request(message),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = %self.status, "{}", self.message);
        }
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

fn parse_minutes(raw: Option<&str>) -> Result<Window, ApiError> {
    let raw = raw.ok_or_else(|| ApiError::bad_request("minutes is required"))?;
    let minutes: u32 = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("invalid minutes: {}", raw)))?;
    Ok(parse_window(minutes)?)
}

/// Values of the repeated `ticker` parameter, plus the `minutes` parameter
fn tickers_and_minutes(params: &[(String, String)]) -> Result<(Vec<String>, Window), ApiError> {
    let tickers = params
        .iter()
        .filter(|(key, _)| key == "ticker")
        .map(|(_, value)| parse_ticker(value))
        .collect::<Result<Vec<_>, _>>()?;
    let minutes = params
        .iter()
        .find(|(key, _)| key == "minutes")
        .map(|(_, value)| value.as_str());
    Ok((tickers, parse_minutes(minutes)?))
}

// ============================================================================
// Health Check
// ============================================================================

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// ============================================================================
// Stocks
// ============================================================================

pub async fn list_stocks(State(state): State<Arc<ApiState>>) -> Result<Json<TickerListing>, ApiError> {
    Ok(Json(state.service.list_tickers().await?))
}

pub async fn average_price(
    State(state): State<Arc<ApiState>>,
    Path(ticker): Path<String>,
    Query(query): Query<AverageQuery>,
) -> Result<Json<AverageResponse>, ApiError> {
    if query.aggregation.as_deref() != Some("average") {
        return Err(ApiError::bad_request("Only 'average' aggregation is supported"));
    }
    let ticker = parse_ticker(&ticker)?;
    let minutes = parse_minutes(query.minutes.as_deref())?;

    let result = state.service.average(&ticker, minutes).await?;
    Ok(Json(result.into()))
}

// ============================================================================
// Correlation
// ============================================================================

pub async fn stock_correlation(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<CorrelationResponse>, ApiError> {
    let (tickers, minutes) = tickers_and_minutes(&params)?;
    let [ticker_a, ticker_b] = tickers.as_slice() else {
        return Err(ApiError::bad_request("Provide exactly 2 tickers for correlation"));
    };

    let result = state.service.correlation(ticker_a, ticker_b, minutes).await?;
    Ok(Json(result.into()))
}

pub async fn correlation_matrix(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<MatrixResponse>, ApiError> {
    let (tickers, minutes) = tickers_and_minutes(&params)?;
    if tickers.is_empty() {
        return Err(ApiError::bad_request("Provide at least 1 ticker for the matrix"));
    }

    let matrix = state.service.correlation_matrix(&tickers, minutes).await;
    Ok(Json(matrix.into()))
}
