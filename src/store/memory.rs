//! In-process [`Store`] backed by vectors behind a mutex.
//!
//! Used by tests and by `STORE_BACKEND=memory`. Vectors keep insertion
//! order, which is what ties fall back to in window queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::Store;
use crate::{Farm, Reading, Sensor, StoreError, StoreResult};

// ---

#[derive(Debug, Default)]
struct Tables {
    farms: Vec<Farm>,
    sensors: Vec<Sensor>,
    readings: Vec<Reading>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first; `sort_by` is stable so equal timestamps keep insertion order.
fn newest_first(mut readings: Vec<Reading>) -> Vec<Reading> {
    readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    readings
}

#[async_trait]
impl Store for MemoryStore {
    // ---
    async fn count_farms(&self) -> StoreResult<i64> {
        Ok(self.tables.lock().await.farms.len() as i64)
    }

    async fn list_farms(&self) -> StoreResult<Vec<Farm>> {
        Ok(self.tables.lock().await.farms.clone())
    }

    async fn get_farm(&self, id: Uuid) -> StoreResult<Option<Farm>> {
        let t = self.tables.lock().await;
        Ok(t.farms.iter().find(|f| f.id == id).cloned())
    }

    async fn insert_farm(&self, farm: &Farm) -> StoreResult<()> {
        // ---
        let mut t = self.tables.lock().await;
        if t.farms.iter().any(|f| f.id == farm.id) {
            return Err(StoreError::Constraint(format!("duplicate farm id {}", farm.id)));
        }
        t.farms.push(farm.clone());
        Ok(())
    }

    async fn update_farm(&self, farm: &Farm) -> StoreResult<()> {
        // ---
        let mut t = self.tables.lock().await;
        if let Some(slot) = t.farms.iter_mut().find(|f| f.id == farm.id) {
            *slot = farm.clone();
        }
        Ok(())
    }

    async fn delete_farm(&self, id: Uuid) -> StoreResult<bool> {
        // ---
        let mut t = self.tables.lock().await;
        let before = t.farms.len();
        t.farms.retain(|f| f.id != id);
        if t.farms.len() == before {
            return Ok(false);
        }

        let doomed: Vec<Uuid> = t
            .sensors
            .iter()
            .filter(|s| s.farm_id == id)
            .map(|s| s.id)
            .collect();
        t.sensors.retain(|s| s.farm_id != id);
        t.readings.retain(|r| !doomed.contains(&r.sensor_id));
        Ok(true)
    }

    async fn list_sensors(&self) -> StoreResult<Vec<Sensor>> {
        Ok(self.tables.lock().await.sensors.clone())
    }

    async fn get_sensor(&self, id: Uuid) -> StoreResult<Option<Sensor>> {
        let t = self.tables.lock().await;
        Ok(t.sensors.iter().find(|s| s.id == id).cloned())
    }

    async fn sensors_by_farm(&self, farm_id: Uuid) -> StoreResult<Vec<Sensor>> {
        let t = self.tables.lock().await;
        Ok(t.sensors.iter().filter(|s| s.farm_id == farm_id).cloned().collect())
    }

    async fn insert_sensor(&self, sensor: &Sensor) -> StoreResult<()> {
        // ---
        let mut t = self.tables.lock().await;
        if !t.farms.iter().any(|f| f.id == sensor.farm_id) {
            return Err(StoreError::Constraint(format!(
                "sensor references missing farm {}",
                sensor.farm_id
            )));
        }
        t.sensors.push(sensor.clone());
        Ok(())
    }

    async fn update_sensor(&self, sensor: &Sensor) -> StoreResult<()> {
        // ---
        let mut t = self.tables.lock().await;
        if !t.farms.iter().any(|f| f.id == sensor.farm_id) {
            return Err(StoreError::Constraint(format!(
                "sensor references missing farm {}",
                sensor.farm_id
            )));
        }
        if let Some(slot) = t.sensors.iter_mut().find(|s| s.id == sensor.id) {
            *slot = sensor.clone();
        }
        Ok(())
    }

    async fn delete_sensor(&self, id: Uuid) -> StoreResult<bool> {
        // ---
        let mut t = self.tables.lock().await;
        let before = t.sensors.len();
        t.sensors.retain(|s| s.id != id);
        if t.sensors.len() == before {
            return Ok(false);
        }
        t.readings.retain(|r| r.sensor_id != id);
        Ok(true)
    }

    async fn insert_readings(&self, readings: &[Reading]) -> StoreResult<()> {
        // ---
        let mut t = self.tables.lock().await;
        if let Some(orphan) = readings
            .iter()
            .find(|r| !t.sensors.iter().any(|s| s.id == r.sensor_id))
        {
            return Err(StoreError::Constraint(format!(
                "reading references missing sensor {}",
                orphan.sensor_id
            )));
        }
        t.readings.extend_from_slice(readings);
        Ok(())
    }

    async fn readings_for_sensor_since(
        &self,
        sensor_id: Uuid,
        after: DateTime<Utc>,
    ) -> StoreResult<Vec<Reading>> {
        // ---
        let t = self.tables.lock().await;
        let hits = t
            .readings
            .iter()
            .filter(|r| r.sensor_id == sensor_id && r.timestamp > after)
            .cloned()
            .collect();
        Ok(newest_first(hits))
    }

    async fn readings_for_farm_since(
        &self,
        farm_id: Uuid,
        after: DateTime<Utc>,
    ) -> StoreResult<Vec<Reading>> {
        // ---
        let t = self.tables.lock().await;
        let sensor_ids: Vec<Uuid> = t
            .sensors
            .iter()
            .filter(|s| s.farm_id == farm_id)
            .map(|s| s.id)
            .collect();
        let hits = t
            .readings
            .iter()
            .filter(|r| sensor_ids.contains(&r.sensor_id) && r.timestamp > after)
            .cloned()
            .collect();
        Ok(newest_first(hits))
    }
}
