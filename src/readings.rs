//! Time-series core: window cutoffs and synthetic reading generation.
//!
//! Everything here is pure. The current instant and the random source are
//! passed in, so callers decide between wall-clock/OS entropy and fixed
//! values.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::{AppError, Reading, Sensor};

// ---

pub const HOURS_PER_DAY: i64 = 24;
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Reject a non-positive day count.
pub fn validate_days(days: i64) -> Result<i64, AppError> {
    // ---
    if days <= 0 {
        return Err(AppError::Validation("days must be greater than 0".into()));
    }
    Ok(days)
}

/// Start of a `days`-wide window ending at `now`. Readings must be strictly
/// newer than this instant to fall inside the window.
pub fn window_cutoff(now: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>, AppError> {
    // ---
    let days = validate_days(days)?;
    Duration::try_days(days)
        .and_then(|span| now.checked_sub_signed(span))
        .ok_or_else(|| AppError::Validation(format!("days out of range: {days}")))
}

/// True if `ts` lies strictly after `cutoff`.
pub fn in_window(ts: DateTime<Utc>, cutoff: DateTime<Utc>) -> bool {
    ts > cutoff
}

/// Draw a plausible value for a sensor type. Matching is case-insensitive;
/// unknown types fall back to `[0, 100)`.
pub fn sample_value<R: Rng + ?Sized>(sensor_type: &str, rng: &mut R) -> f64 {
    // ---
    let range = match sensor_type.to_lowercase().as_str() {
        "temperature" => 15.0..35.0,  // °C
        "humidity" => 30.0..80.0,     // %
        "pressure" => 1000.0..1030.0, // hPa
        "soil_moisture" => 0.2..0.8,  // fraction
        "wind_speed" => 0.0..10.0,    // m/s
        _ => 0.0..100.0,
    };
    rng.random_range(range)
}

/// Build one reading per hour for `days * 24` hours, walking backward from
/// `now`. Entry `i` is stamped `now - i hours`, so the newest comes first.
/// Generation stops early at the earliest instant `DateTime` can represent.
pub fn synthesize<R: Rng + ?Sized>(
    sensor: &Sensor,
    days: i64,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Reading> {
    // ---
    let total_hours = days.saturating_mul(HOURS_PER_DAY).max(0);

    (0..total_hours)
        .map_while(|i| {
            let ts = i
                .checked_mul(SECONDS_PER_HOUR)
                .and_then(Duration::try_seconds)
                .and_then(|back| now.checked_sub_signed(back))?;
            Some(Reading::new(sensor.id, ts, sample_value(&sensor.sensor_type, rng)))
        })
        .collect()
}
