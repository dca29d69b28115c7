//! Collection worker: polls every sensor on a fixed interval and publishes
//! merged observations to the handoff channel.
//!
//! The collector owns the bus and all reader state; nothing else touches
//! the hardware while it runs. Each cycle it samples the readers in a fixed
//! order with settling delays in between, merges whatever succeeded into
//! one [`Observation`], and hands it off with a non-blocking send so a slow
//! writer can never stall polling. Shutdown is cooperative: the stop signal
//! is observed at cycle boundaries and during the inter-cycle sleep, never
//! mid-transfer.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use verdant_core::constants::{DEFAULT_INTER_READ_DELAY, DEFAULT_POLL_INTERVAL};
use verdant_core::Observation;

use crate::analog::AnalogMux;
use crate::bus::I2cBus;
use crate::climate::{ClimateChip, ClimateSensor};
use crate::light::LightSensor;
use crate::soil::SoilProbe;

/// Timing configuration for the collection loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Pause between cycle starts. Sampling time is subtracted before
    /// sleeping, clamped to zero.
    pub poll_interval: Duration,

    /// Delay between consecutive readers within a cycle.
    pub inter_read_delay: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            inter_read_delay: DEFAULT_INTER_READ_DELAY,
        }
    }
}

/// The collection worker.
///
/// Generic over the bus gateway and the climate chip so tests can run the
/// full loop against mocks.
pub struct Collector<B, C> {
    bus: B,
    climate: ClimateSensor<C>,
    analog: AnalogMux,
    soil: SoilProbe,
    light: LightSensor,
    config: CollectorConfig,
    tx: mpsc::Sender<Observation>,
    stop: watch::Receiver<bool>,
}

impl<B: I2cBus, C: ClimateChip> Collector<B, C> {
    pub fn new(
        bus: B,
        climate: ClimateSensor<C>,
        soil: SoilProbe,
        config: CollectorConfig,
        tx: mpsc::Sender<Observation>,
        stop: watch::Receiver<bool>,
    ) -> Self {
        Self {
            bus,
            climate,
            analog: AnalogMux::new(),
            soil,
            light: LightSensor::new(),
            config,
            tx,
            stop,
        }
    }

    /// Run the collection loop until a stop is requested.
    ///
    /// A stop that arrives mid-cycle lets the cycle finish (including the
    /// publish) before the loop exits; the bus is released on return.
    pub async fn run(mut self) {
        info!(
            interval_secs = self.config.poll_interval.as_secs(),
            climate_available = self.climate.is_available(),
            "collector started"
        );

        loop {
            if *self.stop.borrow() {
                break;
            }

            let cycle_start = Instant::now();
            let observation = self.sample_cycle().await;

            if observation.is_empty() {
                debug!("cycle produced no readings");
            } else {
                debug!(fields = observation.field_count(), "cycle complete");
                match self.tx.try_send(observation) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        warn!("observation channel full; dropping newest record");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        warn!("observation channel closed; stopping collector");
                        break;
                    }
                }
            }

            let remaining = self
                .config
                .poll_interval
                .saturating_sub(cycle_start.elapsed());

            tokio::select! {
                _ = self.stop.wait_for(|stopped| *stopped) => break,
                _ = tokio::time::sleep(remaining) => {}
            }
        }

        // Dropping self releases the bus handle.
        info!("collector stopped; releasing bus");
    }

    /// Sample every reader once, in fixed order, and merge the results.
    ///
    /// A reader failure leaves its fields absent and never prevents the
    /// remaining readers from being sampled.
    async fn sample_cycle(&mut self) -> Observation {
        let mut observation = Observation::default();

        if let Some(sample) = self.climate.sample().await {
            observation.air_temperature = Some(sample.temperature);
            observation.air_pressure = Some(sample.pressure);
            observation.air_humidity = Some(sample.humidity);
        }
        tokio::time::sleep(self.config.inter_read_delay).await;

        if let Some(sample) = self.analog.sample(&mut self.bus).await {
            observation.water_level = Some(f64::from(sample.water_level));
            observation.soil_moisture = Some(f64::from(sample.soil_moisture));
            observation.ultraviolet = Some(f64::from(sample.ultraviolet));
        }
        tokio::time::sleep(self.config.inter_read_delay).await;

        if let Some(celsius) = self.soil.sample().await {
            observation.temperature_soil = Some(celsius);
        }
        tokio::time::sleep(self.config.inter_read_delay).await;

        if let Some(lux) = self.light.sample(&mut self.bus) {
            observation.lux = Some(lux);
        }

        observation
    }
}
