//! Database schema management for `agrisense`.
//!
//! Ensures required tables and indexes exist before serving requests.
//! Applied once on startup from `main.rs` (EMBP: single gateway call).

use anyhow::Result;
use sqlx::PgPool;

// ---

/// Create or update the database schema (idempotent).
///
/// Creates `farms`, `sensors` and `readings`. Sensors cascade from their
/// farm and readings cascade from their sensor. Safe to call on every
/// startup; no-op if objects already exist.
///
/// Errors are propagated if any SQL execution fails.
pub async fn create_schema(pool: &PgPool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS farms (
            id          UUID        PRIMARY KEY,
            name        TEXT        NOT NULL,
            location    TEXT        NOT NULL,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sensors (
            id          UUID        PRIMARY KEY,
            sensor_type TEXT        NOT NULL,
            location    TEXT        NOT NULL,
            farm_id     UUID        NOT NULL REFERENCES farms (id) ON DELETE CASCADE,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Readings are never deduplicated; several may share a timestamp
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS readings (
            id          UUID             PRIMARY KEY,
            sensor_id   UUID             NOT NULL REFERENCES sensors (id) ON DELETE CASCADE,
            recorded_at TIMESTAMPTZ      NOT NULL,
            value       DOUBLE PRECISION NOT NULL
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_sensors_farm_id
            ON sensors (farm_id);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_readings_sensor_time
            ON readings (sensor_id, recorded_at DESC);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
