use samples_client::{api::DEFAULT_MAX_PAGES, domain::AggregationLevel};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::orchestrator::FailurePolicy;

pub const CONFIG_ENV: &str = "ENERGY_SUMMARY_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "energy-summary.toml";
pub const DEFAULT_BASE_URL: &str = "https://api.internetofefficiency.com";

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Deadline for a single page request.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Upper bound on pages followed per aggregation level.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            max_pages: default_max_pages(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_levels")]
    pub levels: Vec<AggregationLevel>,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

fn default_levels() -> Vec<AggregationLevel> {
    AggregationLevel::ALL.to_vec()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            levels: default_levels(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub run: RunConfig,
}

impl AppConfig {
    /// Reads the TOML file named by `ENERGY_SUMMARY_CONFIG`, falling back to
    /// `energy-summary.toml`. A missing file means built-in defaults.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        if !Path::new(&path).exists() {
            tracing::debug!(path = %path, "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;

        if cfg.run.levels.is_empty() {
            anyhow::bail!("run.levels must name at least one aggregation level");
        }
        if cfg.api.request_timeout_ms == 0 {
            anyhow::bail!("api.request_timeout_ms must be positive");
        }

        Ok(cfg)
    }
}
