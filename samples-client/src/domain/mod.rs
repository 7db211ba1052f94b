pub mod aggregation;
pub mod query;
pub mod sample;

pub use aggregation::{AggregationResult, TOTAL_KEY};
pub use query::{AggregationLevel, Query, Scope, SensorType};
pub use sample::{Reading, Sample};
