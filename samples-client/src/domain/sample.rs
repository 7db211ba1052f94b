use time::OffsetDateTime;

/// One sensor value inside a sample, either energy (kWh) or power (W).
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub sensor_id: String,
    pub value: f64,
}

impl Reading {
    pub fn new(sensor_id: impl Into<String>, value: f64) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            value,
        }
    }
}

/// A single telemetry sample as returned by `/v2/samples`.
///
/// `system_temperature` is only present when the request asks for it; the
/// summary requests restrict the field set to timestamp, power and energy.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub resource_type: String,
    pub id: String,
    pub timestamp: OffsetDateTime,
    pub system_temperature: Option<f64>,
    pub energy: Vec<Reading>,
    pub power: Vec<Reading>,
}
