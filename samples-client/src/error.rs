use thiserror::Error;

/// Problems with the invocation itself, detected before any request is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Please enter a logger id --logger=<LOGGER_ID> or a site id --site=<SITE_ID>")]
    MissingScope,
    #[error("Please use a valid energy type [main ct]")]
    InvalidSensorType(String),
    #[error("unknown aggregation level '{0}', expected one of days_1, hours_1, minutes_15, minutes_1")]
    InvalidAggregationLevel(String),
    #[error("lower bound {from} is after upper bound {to}")]
    InvertedRange { from: i64, to: i64 },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("failed to decode samples page from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
