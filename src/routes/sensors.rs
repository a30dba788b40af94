use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::{AppState, DaysQuery};
use crate::services::{readings, sensors};
use crate::{AppError, Config, NewSensor, Reading, Sensor, SensorUpdate};

// ---

const DEFAULT_WINDOW_DAYS: i64 = 7;
const DEFAULT_GENERATE_DAYS: i64 = 10;

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/api/sensors", get(list_sensors).post(create_sensor))
        .route(
            "/api/sensors/{id}",
            get(get_sensor).put(update_sensor).delete(delete_sensor),
        )
        .route("/api/sensors/{id}/readings", get(sensor_readings))
        .route(
            "/api/sensors/{id}/generate-readings",
            post(generate_readings),
        )
        .route("/api/sensors/farm/{farm_id}", get(sensors_of_farm))
}

async fn list_sensors(State(state): State<AppState>) -> Result<Json<Vec<Sensor>>, AppError> {
    Ok(Json(sensors::list(state.store.as_ref()).await?))
}

async fn get_sensor(
    ApiPath(id): ApiPath<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Sensor>, AppError> {
    Ok(Json(sensors::get(state.store.as_ref(), id).await?))
}

async fn create_sensor(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewSensor>,
) -> Result<(StatusCode, Json<Sensor>), AppError> {
    // ---
    let sensor = sensors::create(state.store.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(sensor)))
}

async fn update_sensor(
    ApiPath(id): ApiPath<Uuid>,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SensorUpdate>,
) -> Result<Json<Sensor>, AppError> {
    Ok(Json(sensors::update(state.store.as_ref(), id, req).await?))
}

async fn delete_sensor(
    ApiPath(id): ApiPath<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    // ---
    sensors::delete(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn sensors_of_farm(
    ApiPath(farm_id): ApiPath<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Sensor>>, AppError> {
    Ok(Json(sensors::by_farm(state.store.as_ref(), farm_id).await?))
}

async fn sensor_readings(
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<DaysQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Reading>>, AppError> {
    // ---
    let days = params.days.unwrap_or(DEFAULT_WINDOW_DAYS);
    info!("GET /api/sensors/{}/readings - days={}", id, days);

    let readings = readings::by_sensor(state.store.as_ref(), id, days, Utc::now()).await?;
    Ok(Json(readings))
}

async fn generate_readings(
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<DaysQuery>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<Reading>>), AppError> {
    // ---
    let days = params.days.unwrap_or(DEFAULT_GENERATE_DAYS);
    info!("POST /api/sensors/{}/generate-readings - days={}", id, days);

    let mut rng = generator_rng(&state.config);
    let readings = readings::generate(
        state.store.as_ref(),
        id,
        days,
        i64::from(state.config.max_generate_days),
        Utc::now(),
        &mut rng,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(readings)))
}

/// Seeded when `GENERATOR_SEED` is configured, OS entropy otherwise.
fn generator_rng(config: &Config) -> StdRng {
    match config.generator_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
