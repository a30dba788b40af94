//! Data models for farms, sensors and readings.
//!
//! Persisted records are kept apart from the request shapes that create or
//! patch them. A sensor carries only its owning farm's id, and a reading
//! does not serialize its sensor, so no JSON cycle can form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---

/// Top-level owner of sensors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Farm {
    // ---
    pub id: Uuid,
    pub name: String,
    pub location: String,
}

/// A typed measurement device belonging to exactly one farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sensor {
    // ---
    pub id: Uuid,
    #[serde(rename = "type")]
    pub sensor_type: String,
    pub location: String,
    pub farm_id: Uuid,
}

/// A single timestamped observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reading {
    // ---
    pub id: Uuid,
    #[serde(with = "utc_seconds")]
    #[sqlx(rename = "recorded_at")]
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    #[serde(skip)]
    pub sensor_id: Uuid,
}

impl Reading {
    pub fn new(sensor_id: Uuid, timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            value,
            sensor_id,
        }
    }
}

/// Body of `POST /api/farms`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewFarm {
    pub name: Option<String>,
    pub location: Option<String>,
}

/// Body of `PUT /api/farms/{id}`. Blank fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FarmUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
}

/// Body of `POST /api/sensors`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSensor {
    #[serde(rename = "type")]
    pub sensor_type: Option<String>,
    pub location: Option<String>,
    pub farm_id: Option<Uuid>,
}

/// Body of `PUT /api/sensors/{id}`. Blank fields are ignored; a supplied
/// `farm_id` moves the sensor to that farm.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SensorUpdate {
    #[serde(rename = "type")]
    pub sensor_type: Option<String>,
    pub location: Option<String>,
    pub farm_id: Option<Uuid>,
}

/// A single reading to record against an existing sensor.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReading {
    pub sensor_id: Option<Uuid>,
    #[serde(with = "utc_seconds")]
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Return the supplied value only if it has non-whitespace content.
pub(crate) fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}

/// `YYYY-MM-DDTHH:MM:SSZ` on the way out, any RFC 3339 string on the way in.
mod utc_seconds {
    // ---
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
