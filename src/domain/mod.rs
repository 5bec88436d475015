//! Domain layer - price series and the statistics computed over them

pub mod price;
pub mod statistics;
