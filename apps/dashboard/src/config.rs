use std::time::Duration;

use anyhow::{ensure, Context, Result};

const DEFAULT_API_URL: &str = "http://localhost:8888/data";
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Dashboard configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub poll_interval: Duration,
    /// Per-request timeout; `None` leaves it to the transport.
    pub request_timeout: Option<Duration>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let poll_interval_ms = parse_millis(&lookup, "POLL_INTERVAL_MS")?
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);
        ensure!(poll_interval_ms > 0, "POLL_INTERVAL_MS must be greater than zero");

        let request_timeout = parse_millis(&lookup, "REQUEST_TIMEOUT_MS")?.map(Duration::from_millis);

        Ok(Config {
            api_url: lookup("SENSOR_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            poll_interval: Duration::from_millis(poll_interval_ms),
            request_timeout,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_millis(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .with_context(|| format!("{key} must be a whole number of milliseconds, got '{raw}'"))
        })
        .transpose()
}
