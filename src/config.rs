use std::time::Duration;

use crate::consts::{
    DATAMUSE_API_URL, DEFAULT_API_PORT, DEFAULT_BIND_ADDR, DEFAULT_LOG_FILTER,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};

/// Runtime settings, read from the environment (and `.env`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub datamuse_url: String,
    pub request_timeout: Duration,
    pub bind_addr: String,
    pub port: u16,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            datamuse_url: DATAMUSE_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_API_PORT,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Settings {
    /// Load `.env` if present, then read settings from the process environment
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset or unparsable values keep defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let datamuse_url = lookup("DATAMUSE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.datamuse_url);
        let request_timeout = lookup("REQUEST_TIMEOUT_SECS")
            .and_then(|secs| secs.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);
        let bind_addr = lookup("BIND_ADDR").unwrap_or(defaults.bind_addr);
        let port: u16 = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let log_filter = lookup("RUST_LOG")
            .or_else(|| lookup("LOG_FILTER"))
            .unwrap_or(defaults.log_filter);

        Self {
            datamuse_url,
            request_timeout,
            bind_addr,
            port,
            log_filter,
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}
