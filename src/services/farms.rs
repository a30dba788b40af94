//! Farm CRUD.

use tracing::info;
use uuid::Uuid;

use crate::{non_blank, AppError, Farm, FarmUpdate, NewFarm, Store};

// ---

pub async fn list(store: &dyn Store) -> Result<Vec<Farm>, AppError> {
    Ok(store.list_farms().await?)
}

pub async fn get(store: &dyn Store, id: Uuid) -> Result<Farm, AppError> {
    store
        .get_farm(id)
        .await?
        .ok_or_else(|| AppError::not_found("Farm", id))
}

/// Create a farm. Name and location must both have non-whitespace content.
pub async fn create(store: &dyn Store, req: NewFarm) -> Result<Farm, AppError> {
    // ---
    let name = non_blank(req.name.as_ref())
        .ok_or_else(|| AppError::Validation("Farm name is required".into()))?;
    let location = non_blank(req.location.as_ref())
        .ok_or_else(|| AppError::Validation("Farm location is required".into()))?;

    let farm = Farm {
        id: Uuid::new_v4(),
        name: name.to_string(),
        location: location.to_string(),
    };
    store.insert_farm(&farm).await?;

    info!(farm_id = %farm.id, "Created farm '{}'", farm.name);
    Ok(farm)
}

/// Overwrite only the fields supplied with non-blank values.
pub async fn update(store: &dyn Store, id: Uuid, req: FarmUpdate) -> Result<Farm, AppError> {
    // ---
    let mut farm = get(store, id).await?;

    if let Some(name) = non_blank(req.name.as_ref()) {
        farm.name = name.to_string();
    }
    if let Some(location) = non_blank(req.location.as_ref()) {
        farm.location = location.to_string();
    }

    store.update_farm(&farm).await?;
    Ok(farm)
}

/// Delete a farm together with its sensors.
pub async fn delete(store: &dyn Store, id: Uuid) -> Result<(), AppError> {
    // ---
    if !store.delete_farm(id).await? {
        return Err(AppError::not_found("Farm", id));
    }
    info!(farm_id = %id, "Deleted farm");
    Ok(())
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::services::sensors;
    use crate::{MemoryStore, NewSensor};

    fn new_farm(name: &str, location: &str) -> NewFarm {
        NewFarm {
            name: Some(name.to_string()),
            location: Some(location.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        // ---
        let store = MemoryStore::new();
        let farm = create(&store, new_farm("Green Acres", "Nakuru")).await.unwrap();

        assert_eq!(get(&store, farm.id).await.unwrap(), farm);
        assert_eq!(list(&store).await.unwrap(), vec![farm]);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_fields() {
        // ---
        let store = MemoryStore::new();
        let bad = [
            new_farm("", "Nakuru"),
            new_farm("   ", "Nakuru"),
            new_farm("Green Acres", ""),
            new_farm("Green Acres", "\t\n"),
            NewFarm::default(),
        ];

        for req in bad {
            let err = create(&store, req).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
        }
        assert!(list(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        // ---
        let store = MemoryStore::new();
        let err = get(&store, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_location_only() {
        // ---
        let store = MemoryStore::new();
        let farm = create(&store, new_farm("Green Acres", "Nakuru")).await.unwrap();

        let patch = FarmUpdate {
            name: None,
            location: Some("Eldoret".to_string()),
        };
        let updated = update(&store, farm.id, patch).await.unwrap();

        assert_eq!(updated.name, "Green Acres");
        assert_eq!(updated.location, "Eldoret");
        assert_eq!(get(&store, farm.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_ignores_blank_fields() {
        // ---
        let store = MemoryStore::new();
        let farm = create(&store, new_farm("Green Acres", "Nakuru")).await.unwrap();

        let patch = FarmUpdate {
            name: Some("  ".to_string()),
            location: Some(String::new()),
        };
        let updated = update(&store, farm.id, patch).await.unwrap();

        assert_eq!(updated, farm);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        // ---
        let store = MemoryStore::new();
        let err = update(&store, Uuid::new_v4(), FarmUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_sensors() {
        // ---
        let store = MemoryStore::new();
        let farm = create(&store, new_farm("Green Acres", "Nakuru")).await.unwrap();
        let keep = create(&store, new_farm("Other", "Kisumu")).await.unwrap();

        for (farm_id, sensor_type) in [
            (farm.id, "temperature"),
            (farm.id, "humidity"),
            (keep.id, "pressure"),
        ] {
            let req = NewSensor {
                sensor_type: Some(sensor_type.to_string()),
                location: Some("field".to_string()),
                farm_id: Some(farm_id),
            };
            sensors::create(&store, req).await.unwrap();
        }

        delete(&store, farm.id).await.unwrap();

        let remaining = sensors::list(&store).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].farm_id, keep.id);
        assert!(matches!(
            delete(&store, farm.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
