use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// One immutable row of `sensor_data` as returned by `GET /data`.
/// The auto-increment `id` is a storage detail and is not exposed.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Snapshot {
    pub mq2: Option<String>,
    pub mq135: Option<String>,
    pub lm35dz: Option<String>,
    pub dm436: Option<String>,
    pub relay: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /data`. Every field is optional; a missing key and an explicit
/// `null` both mean "no measurement".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewReading {
    #[serde(default, deserialize_with = "measurement")]
    pub mq2: Option<String>,
    #[serde(default, deserialize_with = "measurement")]
    pub mq135: Option<String>,
    #[serde(default, deserialize_with = "measurement")]
    pub lm35dz: Option<String>,
    #[serde(default, deserialize_with = "measurement")]
    pub dm436: Option<String>,
    #[serde(default, deserialize_with = "measurement")]
    pub relay: Option<String>,
}

impl NewReading {
    /// Stamps the reading with a store-assigned creation time.
    pub fn into_snapshot(self, created_at: DateTime<Utc>) -> Snapshot {
        Snapshot {
            mq2: self.mq2,
            mq135: self.mq135,
            lm35dz: self.lm35dz,
            dm436: self.dm436,
            relay: self.relay,
            created_at,
        }
    }
}

/// Sensors post either strings or bare JSON scalars. Columns are VARCHAR, so
/// scalars are kept in their textual form; booleans follow MySQL's TRUE = 1.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawMeasurement {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

fn measurement<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawMeasurement>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        RawMeasurement::Text(s) => s,
        RawMeasurement::Number(n) => n.to_string(),
        RawMeasurement::Flag(true) => "1".to_string(),
        RawMeasurement::Flag(false) => "0".to_string(),
    }))
}
