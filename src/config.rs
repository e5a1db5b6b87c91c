use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use thiserror::Error;

#[cfg(test)]
use once_cell::sync::Lazy;
#[cfg(test)]
pub(crate) static ENV_MUTEX: Lazy<std::sync::Mutex<()>> = Lazy::new(|| std::sync::Mutex::new(()));

/// Worker settings loaded from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    catalog_base_url: String,
    catalog_connect_timeout: Duration,
    catalog_total_timeout: Duration,
    politeness_delay: Duration,
    collections: Vec<String>,
    profile_dir: Option<PathBuf>,
    output_path: PathBuf,
    checkpoint_interval: usize,
    max_films: Option<usize>,
    max_strategies: Option<usize>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl Config {
    /// Load and validate worker settings from environment variables.
    ///
    /// Every variable has a default; the catalog URL points at the public
    /// Media History Digital Library search host unless overridden.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a numeric value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let catalog_base_url = env::var("SCOUT_CATALOG_BASE_URL")
            .unwrap_or_else(|_| "https://lantern.mediahist.org/".to_string());
        let catalog_connect_timeout = parse_duration_ms("SCOUT_CATALOG_CONNECT_TIMEOUT_MS", 3000)?;
        let catalog_total_timeout = parse_duration_ms("SCOUT_CATALOG_TOTAL_TIMEOUT_MS", 30000)?;

        // Courtesy interval between catalog calls, not backoff.
        let politeness_delay = parse_duration_ms("SCOUT_POLITENESS_DELAY_MS", 1500)?;

        let collections = parse_csv("SCOUT_COLLECTIONS", "Hollywood Studio System");
        let profile_dir = env::var("SCOUT_PROFILE_DIR").ok().map(PathBuf::from);
        let output_path = PathBuf::from(
            env::var("SCOUT_OUTPUT_PATH").unwrap_or_else(|_| "research-results.json".to_string()),
        );
        let checkpoint_interval = parse_usize("SCOUT_CHECKPOINT_INTERVAL", 5)?;

        // Zero means unlimited for both caps.
        let max_films = non_zero(parse_usize("SCOUT_MAX_FILMS", 0)?);
        let max_strategies = non_zero(parse_usize("SCOUT_MAX_STRATEGIES", 0)?);

        Ok(Self {
            catalog_base_url,
            catalog_connect_timeout,
            catalog_total_timeout,
            politeness_delay,
            collections,
            profile_dir,
            output_path,
            checkpoint_interval,
            max_films,
            max_strategies,
        })
    }

    #[must_use]
    pub fn catalog_base_url(&self) -> &str {
        &self.catalog_base_url
    }

    #[must_use]
    pub fn catalog_connect_timeout(&self) -> Duration {
        self.catalog_connect_timeout
    }

    #[must_use]
    pub fn catalog_total_timeout(&self) -> Duration {
        self.catalog_total_timeout
    }

    #[must_use]
    pub fn politeness_delay(&self) -> Duration {
        self.politeness_delay
    }

    #[must_use]
    pub fn collections(&self) -> &[String] {
        &self.collections
    }

    #[must_use]
    pub fn profile_dir(&self) -> Option<&Path> {
        self.profile_dir.as_deref()
    }

    #[must_use]
    pub fn output_path(&self) -> &PathBuf {
        &self.output_path
    }

    #[must_use]
    pub fn checkpoint_interval(&self) -> usize {
        self.checkpoint_interval
    }

    #[must_use]
    pub fn max_films(&self) -> Option<usize> {
        self.max_films
    }

    #[must_use]
    pub fn max_strategies(&self) -> Option<usize> {
        self.max_strategies
    }
}

fn non_zero(value: usize) -> Option<usize> {
    (value > 0).then_some(value)
}

fn parse_duration_ms(name: &'static str, default_ms: u64) -> Result<Duration, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default_ms.to_string());
    let ms = raw.parse::<u64>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })?;
    Ok(Duration::from_millis(ms))
}

fn parse_usize(name: &'static str, default: usize) -> Result<usize, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<usize>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_csv(name: &'static str, default: &str) -> Vec<String> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
