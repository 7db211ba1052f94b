use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::error::ConfigError;

/// Time bucket granularity understood by the samples API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum AggregationLevel {
    #[default]
    #[serde(rename = "days_1")]
    Days1,
    #[serde(rename = "hours_1")]
    Hours1,
    #[serde(rename = "minutes_15")]
    Minutes15,
    #[serde(rename = "minutes_1")]
    Minutes1,
}

impl AggregationLevel {
    pub const ALL: [AggregationLevel; 4] = [
        AggregationLevel::Days1,
        AggregationLevel::Hours1,
        AggregationLevel::Minutes15,
        AggregationLevel::Minutes1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Days1 => "days_1",
            Self::Hours1 => "hours_1",
            Self::Minutes15 => "minutes_15",
            Self::Minutes1 => "minutes_1",
        }
    }
}

impl fmt::Display for AggregationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidAggregationLevel(s.to_string()))
    }
}

/// Metering channel classification: the main meter or a current transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    #[default]
    Main,
    Ct,
}

impl SensorType {
    pub const ALL: [SensorType; 2] = [SensorType::Main, SensorType::Ct];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Ct => "ct",
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidSensorType(s.to_string()))
    }
}

/// What the samples are filtered by. A data logger and a site are mutually
/// exclusive on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    DataLogger(String),
    Site(String),
}

impl Scope {
    /// Picks the data logger when both ids are present. Empty ids count as absent.
    pub fn from_ids(logger: Option<&str>, site: Option<&str>) -> Result<Self, ConfigError> {
        fn non_empty(id: Option<&str>) -> Option<&str> {
            id.map(str::trim).filter(|id| !id.is_empty())
        }

        match (non_empty(logger), non_empty(site)) {
            (Some(logger), _) => Ok(Self::DataLogger(logger.to_string())),
            (None, Some(site)) => Ok(Self::Site(site.to_string())),
            (None, None) => Err(ConfigError::MissingScope),
        }
    }

    /// Query parameter name and value for this scope.
    pub fn filter(&self) -> (&'static str, &str) {
        match self {
            Self::DataLogger(id) => ("filter[data_logger]", id),
            Self::Site(id) => ("filter[site]", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub base_url: String,
    pub scope: Scope,
    pub sensor_type: Option<SensorType>,
    /// Epoch seconds, inclusive lower bound.
    pub time_from: i64,
    /// Epoch seconds, upper bound.
    pub time_to: i64,
    pub aggregation_level: AggregationLevel,
}

impl Query {
    pub fn new(
        base_url: impl Into<String>,
        scope: Scope,
        sensor_type: Option<SensorType>,
        time_from: i64,
        time_to: i64,
        aggregation_level: AggregationLevel,
    ) -> Result<Self, ConfigError> {
        if time_from > time_to {
            return Err(ConfigError::InvertedRange {
                from: time_from,
                to: time_to,
            });
        }

        Ok(Self {
            base_url: base_url.into(),
            scope,
            sensor_type,
            time_from,
            time_to,
            aggregation_level,
        })
    }

    /// Same filters, different granularity.
    pub fn for_level(&self, aggregation_level: AggregationLevel) -> Self {
        Self {
            aggregation_level,
            ..self.clone()
        }
    }
}
