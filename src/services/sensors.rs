//! Sensor CRUD. Every sensor must point at an existing farm.

use tracing::info;
use uuid::Uuid;

use crate::services::farms;
use crate::{non_blank, AppError, NewSensor, Sensor, SensorUpdate, Store};

// ---

pub async fn list(store: &dyn Store) -> Result<Vec<Sensor>, AppError> {
    Ok(store.list_sensors().await?)
}

pub async fn get(store: &dyn Store, id: Uuid) -> Result<Sensor, AppError> {
    store
        .get_sensor(id)
        .await?
        .ok_or_else(|| AppError::not_found("Sensor", id))
}

/// Sensors owned by a farm. Fails with NotFound if the farm does not exist.
pub async fn by_farm(store: &dyn Store, farm_id: Uuid) -> Result<Vec<Sensor>, AppError> {
    // ---
    farms::get(store, farm_id).await?;
    Ok(store.sensors_by_farm(farm_id).await?)
}

/// Create a sensor under the farm named by `req.farm_id`.
pub async fn create(store: &dyn Store, req: NewSensor) -> Result<Sensor, AppError> {
    // ---
    let farm_id = req
        .farm_id
        .ok_or_else(|| AppError::Validation("farm_id is required to create a sensor".into()))?;
    let farm = farms::get(store, farm_id).await?;

    let sensor = Sensor {
        id: Uuid::new_v4(),
        sensor_type: req.sensor_type.unwrap_or_default(),
        location: req.location.unwrap_or_default(),
        farm_id: farm.id,
    };
    store.insert_sensor(&sensor).await?;

    info!(sensor_id = %sensor.id, farm_id = %farm.id, "Created {} sensor", sensor.sensor_type);
    Ok(sensor)
}

/// Overwrite non-blank fields; a supplied `farm_id` must resolve.
pub async fn update(store: &dyn Store, id: Uuid, req: SensorUpdate) -> Result<Sensor, AppError> {
    // ---
    let mut sensor = get(store, id).await?;

    if let Some(sensor_type) = non_blank(req.sensor_type.as_ref()) {
        sensor.sensor_type = sensor_type.to_string();
    }
    if let Some(location) = non_blank(req.location.as_ref()) {
        sensor.location = location.to_string();
    }
    if let Some(farm_id) = req.farm_id {
        sensor.farm_id = farms::get(store, farm_id).await?.id;
    }

    store.update_sensor(&sensor).await?;
    Ok(sensor)
}

pub async fn delete(store: &dyn Store, id: Uuid) -> Result<(), AppError> {
    // ---
    if !store.delete_sensor(id).await? {
        return Err(AppError::not_found("Sensor", id));
    }
    info!(sensor_id = %id, "Deleted sensor");
    Ok(())
}
