//! `agrisense`: farms, their sensors, and time-series sensor readings.
//!
//! The crate follows the Explicit Module Boundary Pattern (EMBP): sibling
//! modules import shared types from this root rather than from each other's
//! files, so moving a type only touches the re-export here.

pub mod config;
pub mod error;
pub mod models;
pub mod readings;
pub mod routes;
pub mod schema;
pub mod seed;
pub mod services;
pub mod store;

pub use config::{Config, StoreBackend};
pub use error::{AppError, StoreError, StoreResult};
pub use models::{
    Farm, FarmUpdate, NewFarm, NewReading, NewSensor, Reading, Sensor, SensorUpdate,
};
pub(crate) use models::non_blank;
pub use routes::{router, AppState};
pub use store::{MemoryStore, PgStore, Store};
