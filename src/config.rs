use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `api_base` (handy for pointing at a test server).
pub const API_BASE_ENV: &str = "EVENT_STARS_API_BASE";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the events resource, e.g. `http://localhost:8080/api/events`.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// When set, logs are also written to a daily-rotated file in this directory.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_api_base() -> String { "http://localhost:8080/api/events".into() }
fn default_request_timeout() -> u64 { 10 }
fn default_user_agent() -> String { concat!("event-stars/", env!("CARGO_PKG_VERSION")).into() }

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
            log_dir: None,
        }
    }
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&s)?;
        Ok(cfg)
    }

    /// Apply `EVENT_STARS_API_BASE` if it is set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base) = std::env::var(API_BASE_ENV) {
            if !base.trim().is_empty() {
                self.api_base = base.trim().to_string();
            }
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.api_base)
            .map_err(|e| anyhow!("invalid api_base '{}': {}", self.api_base, e))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(anyhow!("api_base must be http or https, got '{}'", parsed.scheme()));
        }
        if parsed.cannot_be_a_base() {
            return Err(anyhow!("api_base '{}' cannot be used as a base URL", self.api_base));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    /// Default per-user config location, e.g. `~/.config/event-stars/config.toml`.
    pub fn default_user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("event-stars").join("config.toml"))
    }

    /// Resolve the config to use: an explicit path must load; otherwise the
    /// user config, then the repository example, then built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(p) = explicit {
            return Ok((Self::from_path(p)?, Some(p.to_path_buf())));
        }
        let candidates = Self::default_user_path()
            .into_iter()
            .chain(std::iter::once(PathBuf::from("config/example-config.toml")));
        for candidate in candidates {
            if candidate.exists() {
                return Ok((Self::from_path(&candidate)?, Some(candidate)));
            }
        }
        Ok((Self::default(), None))
    }
}
