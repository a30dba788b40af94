use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::{AppState, DaysQuery};
use crate::services::{farms, readings};
use crate::{AppError, Farm, FarmUpdate, NewFarm, Reading};

// ---

const DEFAULT_WINDOW_DAYS: i64 = 7;

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/api/farms", get(list_farms).post(create_farm))
        .route(
            "/api/farms/{id}",
            get(get_farm).put(update_farm).delete(delete_farm),
        )
        .route("/api/farms/{id}/readings", get(farm_readings))
}

async fn list_farms(State(state): State<AppState>) -> Result<Json<Vec<Farm>>, AppError> {
    Ok(Json(farms::list(state.store.as_ref()).await?))
}

async fn get_farm(
    ApiPath(id): ApiPath<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Farm>, AppError> {
    Ok(Json(farms::get(state.store.as_ref(), id).await?))
}

async fn create_farm(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewFarm>,
) -> Result<(StatusCode, Json<Farm>), AppError> {
    // ---
    let farm = farms::create(state.store.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(farm)))
}

async fn update_farm(
    ApiPath(id): ApiPath<Uuid>,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<FarmUpdate>,
) -> Result<Json<Farm>, AppError> {
    Ok(Json(farms::update(state.store.as_ref(), id, req).await?))
}

async fn delete_farm(
    ApiPath(id): ApiPath<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    // ---
    farms::delete(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn farm_readings(
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<DaysQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Reading>>, AppError> {
    // ---
    let days = params.days.unwrap_or(DEFAULT_WINDOW_DAYS);
    info!("GET /api/farms/{}/readings - days={}", id, days);

    let readings = readings::by_farm(state.store.as_ref(), id, days, Utc::now()).await?;
    Ok(Json(readings))
}
