//! Window queries and synthetic generation over the store.

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info};
use uuid::Uuid;

use crate::readings::{synthesize, validate_days, window_cutoff};
use crate::services::sensors;
use crate::{AppError, NewReading, Reading, Store};

// ---

/// Readings from every sensor of `farm_id` newer than `now - days`.
///
/// `days` is validated before the store is touched. An unknown farm yields
/// an empty list.
pub async fn by_farm(
    store: &dyn Store,
    farm_id: Uuid,
    days: i64,
    now: DateTime<Utc>,
) -> Result<Vec<Reading>, AppError> {
    // ---
    let cutoff = window_cutoff(now, days)?;
    let readings = store.readings_for_farm_since(farm_id, cutoff).await?;
    debug!(%farm_id, days, "Farm window returned {} readings", readings.len());
    Ok(readings)
}

/// Readings of `sensor_id` newer than `now - days`. An unknown sensor
/// yields an empty list.
pub async fn by_sensor(
    store: &dyn Store,
    sensor_id: Uuid,
    days: i64,
    now: DateTime<Utc>,
) -> Result<Vec<Reading>, AppError> {
    // ---
    let cutoff = window_cutoff(now, days)?;
    let readings = store.readings_for_sensor_since(sensor_id, cutoff).await?;
    debug!(%sensor_id, days, "Sensor window returned {} readings", readings.len());
    Ok(readings)
}

/// Record one reading. The sensor must be named and must exist.
pub async fn create(store: &dyn Store, req: NewReading) -> Result<Reading, AppError> {
    // ---
    let sensor_id = req
        .sensor_id
        .ok_or_else(|| AppError::Validation("Sensor is required".into()))?;
    let sensor = sensors::get(store, sensor_id).await?;

    let reading = Reading::new(sensor.id, req.timestamp, req.value);
    store.insert_readings(std::slice::from_ref(&reading)).await?;

    debug!(%sensor_id, "Recorded reading {}", reading.id);
    Ok(reading)
}

/// Fabricate `days * 24` hourly readings for a sensor, persist them in one
/// batch and return them newest first.
///
/// The sensor is resolved before `days` is checked, so an unknown sensor is
/// always NotFound. `days` must lie in `1..=max_days`.
pub async fn generate<R>(
    store: &dyn Store,
    sensor_id: Uuid,
    days: i64,
    max_days: i64,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<Vec<Reading>, AppError>
where
    R: Rng + Send + ?Sized,
{
    // ---
    let sensor = sensors::get(store, sensor_id).await?;
    let days = validate_days(days)?;
    if days > max_days {
        return Err(AppError::Validation(format!(
            "days must not exceed {max_days}"
        )));
    }

    let readings = synthesize(&sensor, days, now, rng);
    store.insert_readings(&readings).await?;

    info!(
        %sensor_id,
        sensor_type = %sensor.sensor_type,
        "Generated {} readings over {} days",
        readings.len(),
        days
    );
    Ok(readings)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::{Farm, MemoryStore, Sensor, StoreResult};
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use rand::{rngs::StdRng, SeedableRng};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    async fn store_with_sensor(sensor_type: &str) -> (MemoryStore, Farm, Sensor) {
        // ---
        let store = MemoryStore::new();
        let farm = Farm {
            id: Uuid::new_v4(),
            name: "Demo Farm".to_string(),
            location: "Nairobi".to_string(),
        };
        let sensor = Sensor {
            id: Uuid::new_v4(),
            sensor_type: sensor_type.to_string(),
            location: "field-1".to_string(),
            farm_id: farm.id,
        };
        store.insert_farm(&farm).await.unwrap();
        store.insert_sensor(&sensor).await.unwrap();
        (store, farm, sensor)
    }

    /// Store that fails the test if any method is reached.
    struct Untouchable;

    #[async_trait]
    impl Store for Untouchable {
        async fn count_farms(&self) -> StoreResult<i64> {
            unreachable!("store accessed")
        }
        async fn list_farms(&self) -> StoreResult<Vec<Farm>> {
            unreachable!("store accessed")
        }
        async fn get_farm(&self, _: Uuid) -> StoreResult<Option<Farm>> {
            unreachable!("store accessed")
        }
        async fn insert_farm(&self, _: &Farm) -> StoreResult<()> {
            unreachable!("store accessed")
        }
        async fn update_farm(&self, _: &Farm) -> StoreResult<()> {
            unreachable!("store accessed")
        }
        async fn delete_farm(&self, _: Uuid) -> StoreResult<bool> {
            unreachable!("store accessed")
        }
        async fn list_sensors(&self) -> StoreResult<Vec<Sensor>> {
            unreachable!("store accessed")
        }
        async fn get_sensor(&self, _: Uuid) -> StoreResult<Option<Sensor>> {
            unreachable!("store accessed")
        }
        async fn sensors_by_farm(&self, _: Uuid) -> StoreResult<Vec<Sensor>> {
            unreachable!("store accessed")
        }
        async fn insert_sensor(&self, _: &Sensor) -> StoreResult<()> {
            unreachable!("store accessed")
        }
        async fn update_sensor(&self, _: &Sensor) -> StoreResult<()> {
            unreachable!("store accessed")
        }
        async fn delete_sensor(&self, _: Uuid) -> StoreResult<bool> {
            unreachable!("store accessed")
        }
        async fn insert_readings(&self, _: &[Reading]) -> StoreResult<()> {
            unreachable!("store accessed")
        }
        async fn readings_for_sensor_since(
            &self,
            _: Uuid,
            _: DateTime<Utc>,
        ) -> StoreResult<Vec<Reading>> {
            unreachable!("store accessed")
        }
        async fn readings_for_farm_since(
            &self,
            _: Uuid,
            _: DateTime<Utc>,
        ) -> StoreResult<Vec<Reading>> {
            unreachable!("store accessed")
        }
    }

    #[tokio::test]
    async fn test_non_positive_days_never_reach_store() {
        // ---
        for days in [0, -1] {
            let err = by_sensor(&Untouchable, Uuid::new_v4(), days, fixed_now())
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));

            let err = by_farm(&Untouchable, Uuid::new_v4(), days, fixed_now())
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_by_sensor_excludes_cutoff_and_older() {
        // ---
        let (store, _, sensor) = store_with_sensor("temperature").await;
        let now = fixed_now();
        let cutoff = now - Duration::days(7);

        let at_cutoff = Reading::new(sensor.id, cutoff, 1.0);
        let before = Reading::new(sensor.id, cutoff - Duration::seconds(1), 2.0);
        let inside = Reading::new(sensor.id, cutoff + Duration::seconds(1), 3.0);
        let latest = Reading::new(sensor.id, now, 4.0);
        store
            .insert_readings(&[at_cutoff, before, inside.clone(), latest.clone()])
            .await
            .unwrap();

        let got = by_sensor(&store, sensor.id, 7, now).await.unwrap();
        assert_eq!(got, vec![latest, inside]);
    }

    #[tokio::test]
    async fn test_by_farm_spans_all_sensors_of_farm() {
        // ---
        let (store, farm, s1) = store_with_sensor("temperature").await;
        let s2 = Sensor {
            id: Uuid::new_v4(),
            sensor_type: "humidity".to_string(),
            location: "barn".to_string(),
            farm_id: farm.id,
        };
        store.insert_sensor(&s2).await.unwrap();
        let now = fixed_now();
        store
            .insert_readings(&[
                Reading::new(s1.id, now - Duration::hours(1), 20.0),
                Reading::new(s2.id, now - Duration::hours(2), 55.0),
                Reading::new(s2.id, now - Duration::days(3), 60.0),
            ])
            .await
            .unwrap();

        let got = by_farm(&store, farm.id, 1, now).await.unwrap();
        let values: Vec<f64> = got.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![20.0, 55.0]);

        assert_eq!(by_farm(&store, farm.id, 7, now).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_ids_yield_empty() {
        // ---
        let (store, _, _) = store_with_sensor("temperature").await;

        assert!(by_farm(&store, Uuid::new_v4(), 7, fixed_now())
            .await
            .unwrap()
            .is_empty());
        assert!(by_sensor(&store, Uuid::new_v4(), 7, fixed_now())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_create_requires_resolvable_sensor() {
        // ---
        let (store, _, sensor) = store_with_sensor("humidity").await;
        let now = fixed_now();

        let missing = NewReading {
            sensor_id: None,
            timestamp: now,
            value: 50.0,
        };
        let err = create(&store, missing).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let unknown = NewReading {
            sensor_id: Some(Uuid::new_v4()),
            timestamp: now,
            value: 50.0,
        };
        let err = create(&store, unknown).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        assert!(by_sensor(&store, sensor.id, 1, now).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_records_reading() {
        // ---
        let (store, _, sensor) = store_with_sensor("humidity").await;
        let now = fixed_now();

        let req = NewReading {
            sensor_id: Some(sensor.id),
            timestamp: now - Duration::minutes(5),
            value: 61.5,
        };
        let reading = create(&store, req).await.unwrap();

        assert_eq!(reading.sensor_id, sensor.id);
        assert_eq!(by_sensor(&store, sensor.id, 1, now).await.unwrap(), vec![reading]);
    }

    #[tokio::test]
    async fn test_generate_persists_hourly_batch() {
        // ---
        let (store, _, sensor) = store_with_sensor("soil_moisture").await;
        let mut rng = StdRng::seed_from_u64(3);
        let now = fixed_now();

        let readings = generate(&store, sensor.id, 2, 365, now, &mut rng)
            .await
            .unwrap();

        assert_eq!(readings.len(), 48);
        assert_eq!(readings[0].timestamp, now);
        assert_eq!(readings[47].timestamp, now - Duration::hours(47));
        assert!(readings.iter().all(|r| (0.2..0.8).contains(&r.value)));

        // Window of 2 days from the same instant keeps every generated reading
        let stored = by_sensor(&store, sensor.id, 2, now).await.unwrap();
        assert_eq!(stored, readings);
    }

    #[tokio::test]
    async fn test_generate_unknown_sensor_is_not_found() {
        // ---
        let store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(3);

        let err = generate(&store, Uuid::new_v4(), 0, 365, fixed_now(), &mut rng)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_generate_rejects_days_out_of_bounds() {
        // ---
        let (store, _, sensor) = store_with_sensor("pressure").await;
        let mut rng = StdRng::seed_from_u64(3);

        for days in [0, -2, 31] {
            let err = generate(&store, sensor.id, days, 30, fixed_now(), &mut rng)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "days={days}");
        }
        assert!(by_sensor(&store, sensor.id, 30, fixed_now())
            .await
            .unwrap()
            .is_empty());
    }
}
