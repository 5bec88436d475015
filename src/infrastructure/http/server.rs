//! HTTP server for the REST API

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers::{self, ApiState};
use crate::application::services::StockStatsService;
use crate::shared::errors::AppError;

/// Build the router with all routes
pub fn router(service: StockStatsService) -> Router {
    let state = Arc::new(ApiState::new(service));

    // The dashboard is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/stocks", get(handlers::list_stocks))
        .route("/stocks/:ticker", get(handlers::average_price))
        .route("/stockcorrelation", get(handlers::stock_correlation))
        .route("/stockcorrelation/matrix", get(handlers::correlation_matrix))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serve the API until Ctrl-C
pub async fn serve(service: StockStatsService, host: &str, port: u16) -> Result<(), AppError> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| AppError::ConfigError(format!("Invalid address {}:{}: {}", host, port, e)))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::ServerError(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Stock statistics API listening on http://{}", addr);
    info!("  GET /stocks/{{ticker}}?minutes=M&aggregation=average");
    info!("  GET /stockcorrelation?minutes=M&ticker=A&ticker=B");
    info!("  GET /stockcorrelation/matrix?minutes=M&ticker=A&ticker=B&ticker=C");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("API server shutting down");
        })
        .await
        .map_err(|e| AppError::ServerError(e.to_string()))
}
