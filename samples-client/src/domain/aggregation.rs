use std::collections::BTreeMap;

/// Reserved key holding the sum over every sensor.
pub const TOTAL_KEY: &str = "total";

/// Cumulative energy per sensor for one aggregation level.
///
/// `totals` is ordered by key so rendering is stable. `count` is the number of
/// samples consumed, not the number of readings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationResult {
    pub totals: BTreeMap<String, f64>,
    pub count: usize,
}

impl AggregationResult {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.totals.get(key).copied()
    }

    pub fn total(&self) -> f64 {
        self.get(TOTAL_KEY).unwrap_or(0.0)
    }
}
