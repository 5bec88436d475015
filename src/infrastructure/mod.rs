//! Infrastructure layer - feed transports and the REST surface

pub mod feed;
pub mod http;

pub use feed::{create_feed, FixturePriceFeed, HttpPriceFeed};
