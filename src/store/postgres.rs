//! PostgreSQL [`Store`] built on a `sqlx` connection pool.
//!
//! Cascades are enforced by `ON DELETE CASCADE` foreign keys created in
//! [`schema`](crate::schema). Bulk reading inserts run as a single statement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::Store;
use crate::{Farm, Reading, Sensor, StoreResult};

// ---

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    // ---
    async fn count_farms(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM farms")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_farms(&self) -> StoreResult<Vec<Farm>> {
        let farms = sqlx::query_as::<_, Farm>(
            "SELECT id, name, location FROM farms ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(farms)
    }

    async fn get_farm(&self, id: Uuid) -> StoreResult<Option<Farm>> {
        let farm = sqlx::query_as::<_, Farm>("SELECT id, name, location FROM farms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(farm)
    }

    async fn insert_farm(&self, farm: &Farm) -> StoreResult<()> {
        sqlx::query("INSERT INTO farms (id, name, location) VALUES ($1, $2, $3)")
            .bind(farm.id)
            .bind(&farm.name)
            .bind(&farm.location)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_farm(&self, farm: &Farm) -> StoreResult<()> {
        sqlx::query("UPDATE farms SET name = $2, location = $3 WHERE id = $1")
            .bind(farm.id)
            .bind(&farm.name)
            .bind(&farm.location)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_farm(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM farms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_sensors(&self) -> StoreResult<Vec<Sensor>> {
        let sensors = sqlx::query_as::<_, Sensor>(
            "SELECT id, sensor_type, location, farm_id FROM sensors ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(sensors)
    }

    async fn get_sensor(&self, id: Uuid) -> StoreResult<Option<Sensor>> {
        let sensor = sqlx::query_as::<_, Sensor>(
            "SELECT id, sensor_type, location, farm_id FROM sensors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(sensor)
    }

    async fn sensors_by_farm(&self, farm_id: Uuid) -> StoreResult<Vec<Sensor>> {
        let sensors = sqlx::query_as::<_, Sensor>(
            r#"
            SELECT id, sensor_type, location, farm_id
            FROM sensors
            WHERE farm_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(farm_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(sensors)
    }

    async fn insert_sensor(&self, sensor: &Sensor) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO sensors (id, sensor_type, location, farm_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(sensor.id)
        .bind(&sensor.sensor_type)
        .bind(&sensor.location)
        .bind(sensor.farm_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_sensor(&self, sensor: &Sensor) -> StoreResult<()> {
        sqlx::query(
            "UPDATE sensors SET sensor_type = $2, location = $3, farm_id = $4 WHERE id = $1",
        )
        .bind(sensor.id)
        .bind(&sensor.sensor_type)
        .bind(&sensor.location)
        .bind(sensor.farm_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_sensor(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM sensors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_readings(&self, readings: &[Reading]) -> StoreResult<()> {
        // ---
        if readings.is_empty() {
            return Ok(());
        }

        let ids: Vec<Uuid> = readings.iter().map(|r| r.id).collect();
        let sensor_ids: Vec<Uuid> = readings.iter().map(|r| r.sensor_id).collect();
        let timestamps: Vec<DateTime<Utc>> = readings.iter().map(|r| r.timestamp).collect();
        let values: Vec<f64> = readings.iter().map(|r| r.value).collect();

        // One statement over parallel arrays keeps the batch atomic
        sqlx::query(
            r#"
            INSERT INTO readings (id, sensor_id, recorded_at, value)
            SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::timestamptz[], $4::float8[])
            "#,
        )
        .bind(&ids)
        .bind(&sensor_ids)
        .bind(&timestamps)
        .bind(&values)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Inserted {} readings", readings.len());
        Ok(())
    }

    async fn readings_for_sensor_since(
        &self,
        sensor_id: Uuid,
        after: DateTime<Utc>,
    ) -> StoreResult<Vec<Reading>> {
        let readings = sqlx::query_as::<_, Reading>(
            r#"
            SELECT id, recorded_at, value, sensor_id
            FROM readings
            WHERE sensor_id = $1 AND recorded_at > $2
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(sensor_id)
        .bind(after)
        .fetch_all(&self.pool)
        .await?;
        Ok(readings)
    }

    async fn readings_for_farm_since(
        &self,
        farm_id: Uuid,
        after: DateTime<Utc>,
    ) -> StoreResult<Vec<Reading>> {
        let readings = sqlx::query_as::<_, Reading>(
            r#"
            SELECT r.id, r.recorded_at, r.value, r.sensor_id
            FROM readings r
            JOIN sensors s ON s.id = r.sensor_id
            WHERE s.farm_id = $1 AND r.recorded_at > $2
            ORDER BY r.recorded_at DESC
            "#,
        )
        .bind(farm_id)
        .bind(after)
        .fetch_all(&self.pool)
        .await?;
        Ok(readings)
    }
}
