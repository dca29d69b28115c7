//! Verdant daemon: lifecycle supervisor for the collector/writer pipeline.
//!
//! Starts the two workers, waits for an interrupt, then requests a
//! cooperative stop and joins both before closing the database.

mod config;

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use verdant_core::constants::OBSERVATION_CHANNEL_CAPACITY;
use verdant_hardware::{
    Bme680Chip, ClimateSensor, Collector, CollectorConfig, LinuxI2c, RetryPolicy, SoilProbe,
};
use verdant_storage::{Database, DatabaseConfig, MeasurementWriter, SqliteMeasurementRepository};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; env vars may also be set externally.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    info!(version = verdant_core::VERSION, "verdant starting");

    let db = Database::new(DatabaseConfig::new(&config.database_path))
        .await
        .with_context(|| format!("failed to open database at {}", config.database_path))?;
    db.health_check().await.context("database health check failed")?;
    info!(path = %config.database_path, "database ready");

    // The raw-register sensors share this gateway; the bus itself failing
    // to open leaves nothing to collect from, so it is a startup error.
    let bus = LinuxI2c::open(&config.i2c_bus)
        .with_context(|| format!("failed to open I2C bus {}", config.i2c_bus))?;

    // The climate chip failing is a per-sensor condition: disable it for
    // the process lifetime and keep collecting from everything else.
    let climate = match Bme680Chip::open(&config.i2c_bus) {
        Ok(chip) => ClimateSensor::new(chip, RetryPolicy::default()),
        Err(e) => {
            warn!(error = %e, "climate chip unavailable; continuing without it");
            ClimateSensor::disabled(RetryPolicy::default())
        }
    };

    let (observation_tx, observation_rx) = mpsc::channel(OBSERVATION_CHANNEL_CAPACITY);
    let (stop_tx, stop_rx) = watch::channel(false);

    let collector = Collector::new(
        bus,
        climate,
        SoilProbe::new(&config.w1_device),
        CollectorConfig {
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            ..Default::default()
        },
        observation_tx,
        stop_rx.clone(),
    );

    let writer = MeasurementWriter::new(
        SqliteMeasurementRepository::new(db.pool().clone()),
        observation_rx,
        stop_rx,
    );

    let collector_task = tokio::spawn(collector.run());
    let writer_task = tokio::spawn(writer.run());

    shutdown_signal().await;
    info!("shutdown signal received; stopping workers");
    let _ = stop_tx.send(true);

    // Join order is irrelevant, but both must finish before clean exit.
    if let Err(e) = collector_task.await {
        warn!(error = %e, "collector task did not join cleanly");
    }
    if let Err(e) = writer_task.await {
        warn!(error = %e, "writer task did not join cleanly");
    }

    db.close().await;
    info!("clean exit");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
