use std::fmt;

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use clap::Parser;
use samples_client::{
    domain::{AggregationLevel, Query, Scope, SensorType},
    ConfigError,
};
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Parser, Debug)]
#[command(
    name = "energy-summary",
    version,
    about = "Per-sensor energy totals for each aggregation level of the samples API"
)]
pub struct Cli {
    /// The lower date, YYYY-M-D (default: the day before yesterday)
    #[arg(long)]
    pub from: Option<String>,
    /// The upper date, YYYY-M-D (default: yesterday)
    #[arg(long)]
    pub to: Option<String>,
    /// Id of the data-logger
    #[arg(long)]
    pub logger: Option<String>,
    /// Id of the site
    #[arg(long)]
    pub site: Option<String>,
    /// The identifier of the timezone, e.g. Europe/Berlin
    #[arg(long, default_value = "UTC")]
    pub tz: String,
    /// Sensor type: main or ct
    #[arg(long = "type", default_value = "main")]
    pub sensor_type: String,
}

/// Usage problems. The binary prints these and exits successfully.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("unknown timezone '{0}', use an IANA name such as Europe/Berlin")]
    InvalidTimezone(String),
    #[error("invalid date '{0}', expected YYYY-M-D")]
    InvalidDate(String),
    #[error("midnight of {date} does not exist in {tz}")]
    NoMidnight { date: NaiveDate, tz: Tz },
}

/// Local-midnight bounds of the requested range.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub lower: DateTime<Tz>,
    pub upper: DateTime<Tz>,
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SHOWN: &str = "%Y-%m-%d %H:%M:%S %z %Z";
        write!(f, "{} {}", self.lower.format(SHOWN), self.upper.format(SHOWN))
    }
}

/// Validated flags. Needs no configuration, so usage errors are reported
/// before the config file is read.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub window: Window,
    pub scope: Scope,
    pub sensor_type: SensorType,
}

impl Invocation {
    /// Filters shared by every level; the level itself is set per task.
    pub fn query(&self, base_url: &str) -> Result<Query, ConfigError> {
        Query::new(
            base_url,
            self.scope.clone(),
            Some(self.sensor_type),
            self.window.lower.timestamp(),
            self.window.upper.timestamp(),
            AggregationLevel::default(),
        )
    }
}

impl Cli {
    /// Validate the flags and resolve the date window. Nothing here touches
    /// the network or the config file.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<Invocation, CliError> {
        let scope = Scope::from_ids(self.logger.as_deref(), self.site.as_deref())?;
        let sensor_type: SensorType = self.sensor_type.parse()?;
        let tz: Tz = self
            .tz
            .parse()
            .map_err(|_| CliError::InvalidTimezone(self.tz.clone()))?;

        let today = now.with_timezone(&tz).date_naive();
        let from = match &self.from {
            Some(raw) => parse_date(raw)?,
            None => days_before(today, 2)?,
        };
        let to = match &self.to {
            Some(raw) => parse_date(raw)?,
            None => days_before(today, 1)?,
        };

        let window = Window {
            lower: local_midnight(&tz, from)?,
            upper: local_midnight(&tz, to)?,
        };

        if window.lower > window.upper {
            return Err(ConfigError::InvertedRange {
                from: window.lower.timestamp(),
                to: window.upper.timestamp(),
            }
            .into());
        }

        Ok(Invocation {
            window,
            scope,
            sensor_type,
        })
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| CliError::InvalidDate(raw.to_string()))
}

fn days_before(date: NaiveDate, days: u64) -> Result<NaiveDate, CliError> {
    date.checked_sub_days(Days::new(days))
        .ok_or_else(|| CliError::InvalidDate(date.to_string()))
}

fn local_midnight(tz: &Tz, date: NaiveDate) -> Result<DateTime<Tz>, CliError> {
    date.and_hms_opt(0, 0, 0)
        .and_then(|midnight| tz.from_local_datetime(&midnight).earliest())
        .ok_or(CliError::NoMidnight { date, tz: *tz })
}
