use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One durable measurement row.
///
/// The database assigns `id` and `timestamp`; every other column mirrors an
/// [`Observation`](verdant_core::Observation) field and is NULL when the
/// sensor produced nothing that cycle. Rows are append-only: this system
/// never updates or deletes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Measurement {
    /// Auto-increment primary key
    pub id: i64,

    /// Server-assigned insertion time (UTC, from `CURRENT_TIMESTAMP`)
    pub timestamp: NaiveDateTime,

    pub photo_path: Option<String>,
    pub lux: Option<f64>,
    pub plant_height: Option<f64>,
    pub air_temperature: Option<f64>,
    pub temperature_soil: Option<f64>,
    pub air_humidity: Option<f64>,
    pub soil_moisture: Option<f64>,
    pub air_pressure: Option<f64>,
    pub water_level: Option<f64>,
    pub ultraviolet: Option<f64>,
}
