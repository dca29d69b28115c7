#![allow(async_fn_in_trait)]

//! Measurement repository: the writer's view of the database.

use sqlx::SqlitePool;

use verdant_core::Observation;

use crate::error::StorageResult;
use crate::models::Measurement;

/// Repository trait for measurement rows.
///
/// Uses native async trait methods (Edition 2024); the writer is generic
/// over this trait so tests can substitute implementations.
pub trait MeasurementRepository: Send + Sync {
    /// Insert one row for the observation, binding absent fields to NULL.
    /// Returns the new row id. Each insert commits on its own, with no
    /// batching, so at most one observation can be lost on a crash.
    async fn insert(&self, observation: &Observation) -> StorageResult<i64>;

    /// Most recent rows, newest first.
    async fn find_recent(&self, limit: i64) -> StorageResult<Vec<Measurement>>;

    /// Total number of rows.
    async fn count(&self) -> StorageResult<i64>;
}

/// SQLite implementation of [`MeasurementRepository`].
pub struct SqliteMeasurementRepository {
    pool: SqlitePool,
}

impl SqliteMeasurementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl MeasurementRepository for SqliteMeasurementRepository {
    async fn insert(&self, observation: &Observation) -> StorageResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO measurements (
                photo_path, lux, plant_height,
                air_temperature, temperature_soil,
                air_humidity, soil_moisture,
                air_pressure, water_level, ultraviolet
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&observation.photo_path)
        .bind(observation.lux)
        .bind(observation.plant_height)
        .bind(observation.air_temperature)
        .bind(observation.temperature_soil)
        .bind(observation.air_humidity)
        .bind(observation.soil_moisture)
        .bind(observation.air_pressure)
        .bind(observation.water_level)
        .bind(observation.ultraviolet)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn find_recent(&self, limit: i64) -> StorageResult<Vec<Measurement>> {
        let rows = sqlx::query_as::<_, Measurement>(
            r#"
            SELECT id, timestamp, photo_path, lux, plant_height,
                   air_temperature, temperature_soil, air_humidity,
                   soil_moisture, air_pressure, water_level, ultraviolet
            FROM measurements
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn count(&self) -> StorageResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM measurements")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
