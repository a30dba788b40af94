//! Configuration loader for the `agrisense` backend service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase.
//!
use std::{env, net::SocketAddr};

use anyhow::{anyhow, Result};

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u32 {
    ($get:expr, $var_name:expr, $default:expr) => {
        $get($var_name)
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse an optional boolean environment variable with a default value.
macro_rules! parse_env_bool {
    ($get:expr, $var_name:expr, $default:expr) => {
        match $get($var_name).as_deref() {
            None => $default,
            Some("1") | Some("true") | Some("yes") => true,
            Some("0") | Some("false") | Some("no") => false,
            Some(other) => return Err(anyhow!("Invalid {}: {}", $var_name, other)),
        }
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($get:expr, $var_name:expr) => {
        $get($var_name).ok_or_else(|| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Largest accepted `MAX_GENERATE_DAYS`, ten years of hourly readings.
pub const GENERATE_DAYS_CEILING: u32 = 3650;

/// Which [`Store`](crate::Store) implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Storage backend selection.
    pub backend: StoreBackend,

    /// PostgreSQL connection string. Always set for the Postgres backend.
    pub db_url: Option<String>,

    /// Maximum number of database connections in the pool.
    pub db_pool_max: u32,

    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,

    /// Seed the demo farm on startup when the store is empty.
    pub seed_demo_data: bool,

    /// Fixed RNG seed for synthetic reading generation.
    pub generator_seed: Option<u64>,

    /// Upper bound on the `days` parameter of reading generation.
    pub max_generate_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            db_url: None,
            db_pool_max: 5,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            seed_demo_data: false,
            generator_seed: None,
            max_generate_days: 365,
        }
    }
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `DATABASE_URL` – PostgreSQL connection string (Postgres backend only)
///
/// Optional:
/// - `STORE_BACKEND` – `postgres` or `memory` (default: `postgres`)
/// - `DB_POOL_MAX` – max DB connections (default: 5)
/// - `BIND_ADDR` – listen address (default: `0.0.0.0:8080`)
/// - `SEED_DEMO_DATA` – seed the demo farm (default: false)
/// - `GENERATOR_SEED` – fixed seed for synthetic readings (default: unset)
/// - `MAX_GENERATE_DAYS` – generator upper bound (default: 365)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    load_from(|key| env::var(key).ok())
}

/// Load configuration through an arbitrary variable lookup.
pub fn load_from<F>(get: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    // ---
    let backend = match get("STORE_BACKEND").as_deref() {
        None | Some("postgres") => StoreBackend::Postgres,
        Some("memory") => StoreBackend::Memory,
        Some(other) => return Err(anyhow!("Invalid STORE_BACKEND: {}", other)),
    };

    let db_url = match backend {
        StoreBackend::Postgres => Some(require_env!(get, "DATABASE_URL")),
        StoreBackend::Memory => get("DATABASE_URL"),
    };

    let bind_addr = match get("BIND_ADDR") {
        Some(v) => v
            .parse::<SocketAddr>()
            .map_err(|e| anyhow!("Invalid BIND_ADDR: {}", e))?,
        None => SocketAddr::from(([0, 0, 0, 0], 8080)),
    };

    let generator_seed = get("GENERATOR_SEED")
        .map(|v| v.parse::<u64>())
        .transpose()
        .map_err(|e| anyhow!("Invalid GENERATOR_SEED: {}", e))?;

    let db_pool_max = parse_env_u32!(get, "DB_POOL_MAX", 5);
    let max_generate_days = parse_env_u32!(get, "MAX_GENERATE_DAYS", 365);
    let seed_demo_data = parse_env_bool!(get, "SEED_DEMO_DATA", false);

    if max_generate_days == 0 || max_generate_days > GENERATE_DAYS_CEILING {
        return Err(anyhow!(
            "Invalid MAX_GENERATE_DAYS: {} (expected 1..={})",
            max_generate_days,
            GENERATE_DAYS_CEILING
        ));
    }

    Ok(Config {
        backend,
        db_url,
        db_pool_max,
        bind_addr,
        seed_demo_data,
        generator_seed,
        max_generate_days,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    ///
    /// Masks sensitive information like database passwords while showing
    /// all configuration values that were loaded.
    pub fn log_config(&self) {
        // ---
        let masked_db_url = self
            .db_url
            .as_deref()
            .map(mask_password)
            .unwrap_or_else(|| "<unset>".to_string());

        tracing::info!("Configuration loaded:");
        tracing::info!("  STORE_BACKEND     : {:?}", self.backend);
        tracing::info!("  DATABASE_URL      : {}", masked_db_url);
        tracing::info!("  DB_POOL_MAX       : {}", self.db_pool_max);
        tracing::info!("  BIND_ADDR         : {}", self.bind_addr);
        tracing::info!("  SEED_DEMO_DATA    : {}", self.seed_demo_data);
        tracing::info!("  GENERATOR_SEED    : {:?}", self.generator_seed);
        tracing::info!("  MAX_GENERATE_DAYS : {}", self.max_generate_days);
    }
}

/// Replace the password segment of a connection URL with `****`.
fn mask_password(db_url: &str) -> String {
    // ---
    if let Some(at_pos) = db_url.rfind('@') {
        if let Some(colon_pos) = db_url[..at_pos].rfind(':') {
            // `postgres://user@host` carries no password, only the scheme colon
            if !db_url[colon_pos..].starts_with("://") {
                return format!("{}:****{}", &db_url[..colon_pos], &db_url[at_pos..]);
            }
        }
    }
    db_url.to_string()
}
