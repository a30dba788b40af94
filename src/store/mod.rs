//! Entity store contract and its implementations.
//!
//! Services only see [`Store`]; `main` picks [`PgStore`] or [`MemoryStore`]
//! from configuration. Both apply the same cascade rules: deleting a farm
//! removes its sensors, deleting a sensor removes its readings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Farm, Reading, Sensor, StoreResult};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

// ---

/// Keyed storage for farms, sensors and readings.
///
/// Window queries return readings with `timestamp > after`, newest first.
#[async_trait]
pub trait Store: Send + Sync {
    // ---
    async fn count_farms(&self) -> StoreResult<i64>;
    async fn list_farms(&self) -> StoreResult<Vec<Farm>>;
    async fn get_farm(&self, id: Uuid) -> StoreResult<Option<Farm>>;
    async fn insert_farm(&self, farm: &Farm) -> StoreResult<()>;
    async fn update_farm(&self, farm: &Farm) -> StoreResult<()>;
    /// Returns `false` if no farm had this id.
    async fn delete_farm(&self, id: Uuid) -> StoreResult<bool>;

    async fn list_sensors(&self) -> StoreResult<Vec<Sensor>>;
    async fn get_sensor(&self, id: Uuid) -> StoreResult<Option<Sensor>>;
    async fn sensors_by_farm(&self, farm_id: Uuid) -> StoreResult<Vec<Sensor>>;
    async fn insert_sensor(&self, sensor: &Sensor) -> StoreResult<()>;
    async fn update_sensor(&self, sensor: &Sensor) -> StoreResult<()>;
    /// Returns `false` if no sensor had this id.
    async fn delete_sensor(&self, id: Uuid) -> StoreResult<bool>;

    /// Insert all readings or none of them.
    async fn insert_readings(&self, readings: &[Reading]) -> StoreResult<()>;
    async fn readings_for_sensor_since(
        &self,
        sensor_id: Uuid,
        after: DateTime<Utc>,
    ) -> StoreResult<Vec<Reading>>;
    async fn readings_for_farm_since(
        &self,
        farm_id: Uuid,
        after: DateTime<Utc>,
    ) -> StoreResult<Vec<Reading>>;
}
