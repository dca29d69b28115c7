//! Integration tests for the database connection and measurement repository.
//!
//! Run with: cargo test --package verdant-storage --test integration_database

use verdant_core::Observation;
use verdant_storage::connection::{Database, DatabaseConfig};
use verdant_storage::repository::{MeasurementRepository, SqliteMeasurementRepository};

fn full_observation() -> Observation {
    Observation {
        air_temperature: Some(21.37),
        air_pressure: Some(1004.61),
        air_humidity: Some(48.25),
        temperature_soil: Some(23.562),
        water_level: Some(256.0),
        soil_moisture: Some(-1.0),
        ultraviolet: Some(123.0),
        lux: Some(400.0 / 1.2),
        photo_path: Some("images/plant_001.jpg".to_string()),
        plant_height: Some(17.5),
    }
}

#[tokio::test]
async fn test_in_memory_database() {
    let db = Database::in_memory().await.unwrap();
    db.health_check().await.unwrap();
    db.close().await;
}

#[tokio::test]
async fn test_schema_creation_is_idempotent() {
    let db = Database::in_memory().await.unwrap();

    db.ensure_schema().await.unwrap();
    db.ensure_schema().await.unwrap();

    for table in ["measurements", "ideal_conditions"] {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name = ?",
        )
        .bind(table)
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(count, 1, "table {table} should exist exactly once");
    }

    db.close().await;
}

#[tokio::test]
async fn test_ideal_conditions_is_created_but_empty() {
    let db = Database::in_memory().await.unwrap();

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ideal_conditions")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);

    db.close().await;
}

#[tokio::test]
async fn test_full_observation_round_trips_exactly() {
    let db = Database::in_memory().await.unwrap();
    let repo = SqliteMeasurementRepository::new(db.pool().clone());

    let observation = full_observation();
    let id = repo.insert(&observation).await.unwrap();

    let rows = repo.find_recent(10).await.unwrap();
    assert_eq!(rows.len(), 1);

    let row = &rows[0];
    assert_eq!(row.id, id);
    assert_eq!(row.air_temperature, Some(21.37));
    assert_eq!(row.air_pressure, Some(1004.61));
    assert_eq!(row.air_humidity, Some(48.25));
    assert_eq!(row.temperature_soil, Some(23.562));
    assert_eq!(row.water_level, Some(256.0));
    assert_eq!(row.soil_moisture, Some(-1.0));
    assert_eq!(row.ultraviolet, Some(123.0));
    assert_eq!(row.lux, Some(400.0 / 1.2));
    assert_eq!(row.photo_path.as_deref(), Some("images/plant_001.jpg"));
    assert_eq!(row.plant_height, Some(17.5));

    db.close().await;
}

#[tokio::test]
async fn test_absent_fields_are_stored_as_null() {
    let db = Database::in_memory().await.unwrap();
    let repo = SqliteMeasurementRepository::new(db.pool().clone());

    // Only two fields present, everything else must come back as NULL.
    let observation = Observation {
        temperature_soil: Some(23.562),
        lux: Some(333.33),
        ..Default::default()
    };
    repo.insert(&observation).await.unwrap();

    let row = repo.find_recent(1).await.unwrap().remove(0);
    assert_eq!(row.temperature_soil, Some(23.562));
    assert_eq!(row.lux, Some(333.33));
    assert_eq!(row.air_temperature, None);
    assert_eq!(row.air_pressure, None);
    assert_eq!(row.air_humidity, None);
    assert_eq!(row.water_level, None);
    assert_eq!(row.soil_moisture, None);
    assert_eq!(row.ultraviolet, None);
    assert_eq!(row.photo_path, None);
    assert_eq!(row.plant_height, None);

    db.close().await;
}

#[tokio::test]
async fn test_zero_is_stored_as_zero_not_null() {
    let db = Database::in_memory().await.unwrap();
    let repo = SqliteMeasurementRepository::new(db.pool().clone());

    let observation = Observation {
        water_level: Some(0.0),
        ..Default::default()
    };
    repo.insert(&observation).await.unwrap();

    let row = repo.find_recent(1).await.unwrap().remove(0);
    assert_eq!(row.water_level, Some(0.0));
    assert_eq!(row.soil_moisture, None);

    db.close().await;
}

#[tokio::test]
async fn test_each_insert_creates_exactly_one_row() {
    let db = Database::in_memory().await.unwrap();
    let repo = SqliteMeasurementRepository::new(db.pool().clone());

    let first = repo.insert(&full_observation()).await.unwrap();
    let second = repo.insert(&full_observation()).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(repo.count().await.unwrap(), 2);

    let rows = repo.find_recent(10).await.unwrap();
    assert_eq!(rows.len(), 2);
    // Newest first.
    assert_eq!(rows[0].id, second);
    assert_eq!(rows[1].id, first);

    db.close().await;
}

#[tokio::test]
async fn test_concurrent_inserts_are_serialized_by_the_pool() {
    let db = Database::in_memory().await.unwrap();

    const NUM_TASKS: usize = 8;
    let mut handles = vec![];

    for i in 0..NUM_TASKS {
        let repo = SqliteMeasurementRepository::new(db.pool().clone());
        handles.push(tokio::spawn(async move {
            let observation = Observation {
                lux: Some(i as f64),
                ..Default::default()
            };
            repo.insert(&observation).await.unwrap()
        }));
    }

    let ids: Vec<i64> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let mut unique = ids.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), NUM_TASKS);

    let repo = SqliteMeasurementRepository::new(db.pool().clone());
    assert_eq!(repo.count().await.unwrap(), NUM_TASKS as i64);

    db.close().await;
}

#[tokio::test]
async fn test_rows_survive_reopen_of_file_backed_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sensors.db");
    let path = path.to_str().unwrap();

    {
        let db = Database::new(DatabaseConfig::new(path)).await.unwrap();
        let repo = SqliteMeasurementRepository::new(db.pool().clone());
        repo.insert(&full_observation()).await.unwrap();
        db.close().await;
    }

    let db = Database::new(DatabaseConfig::new(path)).await.unwrap();
    let repo = SqliteMeasurementRepository::new(db.pool().clone());
    assert_eq!(repo.count().await.unwrap(), 1);
    db.close().await;
}
