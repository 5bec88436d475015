//! Statistics domain - averages and Pearson correlation over price series

mod average;
mod correlation;
mod correlation_matrix;

pub use average::{average, AverageResult, AVERAGE_DECIMALS};
pub use correlation::{correlation, CorrelationResult, CORRELATION_DECIMALS, MIN_CORRELATION_OBSERVATIONS};
pub use correlation_matrix::{CorrelationMatrix, PairFailure};
