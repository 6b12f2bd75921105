//! Configuration management for the client.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use listview_engine::{Viewport, DEFAULT_OVERSCAN, DEFAULT_ROW_HEIGHT, DEFAULT_SCORE_CAPACITY};
use serde::Serialize;

use crate::remote::dataset::DEFAULT_RECORD_COUNT;
use crate::remote::RemoteConfig;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Number of records the simulated store generates
    pub record_count: usize,
    /// RNG seed for the dataset, latency and failures (0 picks a random seed)
    pub seed: u64,
    pub latency_min_ms: u64,
    pub latency_max_ms: u64,
    /// Probability in `[0, 1]` that an update fails with a server error
    pub failure_rate: f64,
    /// Quiet interval before search input is committed
    pub debounce_ms: u64,
    pub viewport_height: f64,
    pub row_height: f64,
    pub overscan: usize,
    pub score_cache_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            record_count: DEFAULT_RECORD_COUNT,
            seed: 0,
            latency_min_ms: 500,
            latency_max_ms: 800,
            failure_rate: 0.1,
            debounce_ms: 400,
            viewport_height: 600.0,
            row_height: DEFAULT_ROW_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
            score_cache_capacity: DEFAULT_SCORE_CAPACITY,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to [`Config::default`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            record_count: var_or("LISTVIEW_RECORD_COUNT", defaults.record_count)?,
            seed: var_or("LISTVIEW_SEED", defaults.seed)?,
            latency_min_ms: var_or("LISTVIEW_LATENCY_MIN_MS", defaults.latency_min_ms)?,
            latency_max_ms: var_or("LISTVIEW_LATENCY_MAX_MS", defaults.latency_max_ms)?,
            failure_rate: var_or("LISTVIEW_FAILURE_RATE", defaults.failure_rate)?,
            debounce_ms: var_or("LISTVIEW_DEBOUNCE_MS", defaults.debounce_ms)?,
            viewport_height: var_or("LISTVIEW_VIEWPORT_HEIGHT", defaults.viewport_height)?,
            row_height: var_or("LISTVIEW_ROW_HEIGHT", defaults.row_height)?,
            overscan: var_or("LISTVIEW_OVERSCAN", defaults.overscan)?,
            score_cache_capacity: var_or(
                "LISTVIEW_SCORE_CACHE_CAPACITY",
                defaults.score_cache_capacity,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.latency_min_ms > self.latency_max_ms {
            return Err(ConfigError::Invalid {
                name: "LISTVIEW_LATENCY_MIN_MS",
                value: format!("{} > max {}", self.latency_min_ms, self.latency_max_ms),
            });
        }
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(ConfigError::Invalid {
                name: "LISTVIEW_FAILURE_RATE",
                value: self.failure_rate.to_string(),
            });
        }
        self.viewport()?;
        Ok(())
    }

    pub fn remote(&self) -> RemoteConfig {
        RemoteConfig {
            latency_min: Duration::from_millis(self.latency_min_ms),
            latency_max: Duration::from_millis(self.latency_max_ms),
            failure_rate: self.failure_rate,
            seed: self.seed,
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn viewport(&self) -> Result<Viewport, ConfigError> {
        Viewport::new(self.viewport_height, self.row_height, self.overscan).map_err(|err| {
            // Row height is checked first, so a valid one means the height failed.
            let name = if self.row_height.is_finite() && self.row_height > 0.0 {
                "LISTVIEW_VIEWPORT_HEIGHT"
            } else {
                "LISTVIEW_ROW_HEIGHT"
            };
            ConfigError::Invalid {
                name,
                value: err.to_string(),
            }
        })
    }
}

fn var_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => {
            let parsed = value.trim().parse();
            parsed.map_err(|_| ConfigError::Invalid { name, value })
        }
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}
