//! Utility functions and helpers

use std::collections::HashSet;

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Drop repeated entries, keeping the first occurrence of each
pub fn dedup_preserving_order(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(item.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456789, 6), 1.234568);
        assert_eq!(round_to(0.99996, 4), 1.0);
        assert_eq!(round_to(-0.123449, 4), -0.1234);
    }

    #[test]
    fn test_dedup_preserving_order() {
        let items: Vec<String> = ["MSFT", "AAPL", "MSFT", "NVDA", "AAPL"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(dedup_preserving_order(&items), vec!["MSFT", "AAPL", "NVDA"]);
    }
}
