/// Read side of the sensor API: the only place the dashboard talks HTTP.
use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::sensors::{is_known, sensor_info, SensorInfo, SENSORS};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned status {0}")]
    Status(u16),

    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The latest snapshot as served by `GET /data`.
///
/// Measurements are kept as raw JSON so keys the dashboard does not know
/// about still render under their own name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reading {
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub values: BTreeMap<String, Value>,
}

impl Reading {
    /// Rows to display: every known sensor in table order (present or not),
    /// then any unrecognized keys sorted by name.
    pub fn measurements(&self) -> Vec<(SensorInfo<'_>, Option<String>)> {
        let known = SENSORS
            .iter()
            .map(|info| (*info, self.values.get(info.key).and_then(display_value)));
        let extra = self
            .values
            .iter()
            .filter(|(key, _)| !is_known(key))
            .map(|(key, value)| (sensor_info(key), display_value(value)));

        known.chain(extra).collect()
    }
}

/// `None` for anything that counts as "no measurement".
fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Anything that can produce the latest reading. `Ok(None)` means the API has no data yet.
#[async_trait]
pub trait ReadingSource: Send + Sync + 'static {
    async fn fetch_latest(&self) -> Result<Option<Reading>, FetchError>;
}

/// `ReadingSource` over the sensor API's `GET /data`.
#[derive(Clone)]
pub struct HttpReadingSource {
    client: Client,
    url: String,
}

impl HttpReadingSource {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ReadingSource for HttpReadingSource {
    async fn fetch_latest(&self) -> Result<Option<Reading>, FetchError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!("GET {} -> {} bytes", self.url, body.len());

        parse_latest(&body)
    }
}

/// Decodes a `GET /data` body: a snapshot object or the literal `null`.
fn parse_latest(body: &str) -> Result<Option<Reading>, FetchError> {
    Ok(serde_json::from_str(body)?)
}
