use samples_client::domain::{AggregationLevel, AggregationResult};

/// Render one summary line: `<key>: <value> kWh, ` per key in ascending key
/// order, then `<level>, count: <n>`.
pub fn format_summary(result: &AggregationResult, level: AggregationLevel) -> String {
    let mut line = String::new();

    for (key, value) in &result.totals {
        line.push_str(&format!("{key}: {value:.4} kWh, "));
    }
    line.push_str(&format!("{level}, count: {}", result.count));

    line
}
