//! Price feed transports

pub mod fixture_feed;
pub mod http_feed;

pub use fixture_feed::FixturePriceFeed;
pub use http_feed::HttpPriceFeed;

use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::domain::price::PriceFeed;
use crate::shared::errors::AppError;

/// Fixture file if one is given, the HTTP feed otherwise
pub fn create_feed(config: &Config, fixture: Option<&Path>) -> Result<Arc<dyn PriceFeed>, AppError> {
    match fixture {
        Some(path) => Ok(Arc::new(FixturePriceFeed::from_file(path)?)),
        None => Ok(Arc::new(HttpPriceFeed::new(&config.feed, &config.auth)?)),
    }
}
