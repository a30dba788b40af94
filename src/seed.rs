//! Demo data for a fresh store.
//!
//! Enabled with `SEED_DEMO_DATA=true`. Does nothing once any farm exists, so
//! restarts never duplicate the demo farm.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::services::{farms, readings, sensors};
use crate::{AppError, NewFarm, NewReading, NewSensor, Store};

// ---

const DEMO_READING_HOURS: i64 = 10;

/// Seed one farm with a soil-moisture and a temperature sensor and ten
/// hourly readings each. Returns `false` if the store already had farms.
pub async fn seed_demo_data(store: &dyn Store, now: DateTime<Utc>) -> Result<bool, AppError> {
    // ---
    if store.count_farms().await? > 0 {
        info!("Store already has farms, skipping demo seed");
        return Ok(false);
    }

    let farm = farms::create(
        store,
        NewFarm {
            name: Some("Demo Farm".to_string()),
            location: Some("Nairobi".to_string()),
        },
    )
    .await?;

    let soil = sensors::create(
        store,
        NewSensor {
            sensor_type: Some("soil_moisture".to_string()),
            location: Some("field-1".to_string()),
            farm_id: Some(farm.id),
        },
    )
    .await?;
    let temperature = sensors::create(
        store,
        NewSensor {
            sensor_type: Some("temperature".to_string()),
            location: Some("greenhouse-1".to_string()),
            farm_id: Some(farm.id),
        },
    )
    .await?;

    let mut recorded = 0;
    for i in 0..DEMO_READING_HOURS {
        let timestamp = now - Duration::hours(i);
        for (sensor_id, value) in [
            (temperature.id, 20.0 + i as f64),
            (soil.id, 0.2 + i as f64 * 0.1),
        ] {
            let req = NewReading {
                sensor_id: Some(sensor_id),
                timestamp,
                value,
            };
            readings::create(store, req).await?;
            recorded += 1;
        }
    }

    info!(farm_id = %farm.id, "Seeded demo farm with {} readings", recorded);
    Ok(true)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::services;
    use crate::MemoryStore;

    #[tokio::test]
    async fn test_seed_once() {
        // ---
        let store = MemoryStore::new();
        let now = Utc::now();

        assert!(seed_demo_data(&store, now).await.unwrap());
        assert!(!seed_demo_data(&store, now).await.unwrap());

        let farms = services::farms::list(&store).await.unwrap();
        assert_eq!(farms.len(), 1);
        assert_eq!(farms[0].name, "Demo Farm");

        let sensors = services::sensors::by_farm(&store, farms[0].id).await.unwrap();
        assert_eq!(sensors.len(), 2);

        let readings = services::readings::by_farm(&store, farms[0].id, 1, now)
            .await
            .unwrap();
        assert_eq!(readings.len(), 20);
    }

    #[tokio::test]
    async fn test_seed_values() {
        // ---
        let store = MemoryStore::new();
        let now = Utc::now();
        seed_demo_data(&store, now).await.unwrap();

        let sensors = services::sensors::list(&store).await.unwrap();
        let temperature = sensors
            .iter()
            .find(|s| s.sensor_type == "temperature")
            .unwrap();

        let readings = services::readings::by_sensor(&store, temperature.id, 1, now)
            .await
            .unwrap();
        let values: Vec<f64> = readings.iter().map(|r| r.value).collect();
        let expected: Vec<f64> = (0..10).map(|i| 20.0 + i as f64).collect();
        assert_eq!(values, expected);
    }
}
