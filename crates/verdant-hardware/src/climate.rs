//! Climate sensor reader (temperature, pressure, humidity).
//!
//! The chip's register map and compensation math live behind the
//! [`ClimateChip`] port trait; the production implementation delegates to
//! the `bme680` driver crate. What this module owns is the *policy*: one
//! configuration pass at startup, a bounded data-ready poll per sample, and
//! permanent disablement when the chip cannot be brought up.

use std::time::Duration;

use tracing::warn;

use crate::error::{HardwareError, Result};

/// One successful climate measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateSample {
    /// Temperature in °C.
    pub temperature: f64,

    /// Barometric pressure in hPa.
    pub pressure: f64,

    /// Relative humidity in %.
    pub humidity: f64,
}

/// Port trait for the climate chip.
///
/// Implementations hide the chip-specific transport; the reader drives them
/// through a trigger/poll protocol. See [`Bme680Chip`] for the production
/// implementation and [`crate::mock::MockClimateChip`] for tests.
pub trait ClimateChip: Send {
    /// Apply oversampling/filter configuration. Called once at startup.
    fn configure(&mut self) -> Result<()>;

    /// Start a one-shot measurement.
    fn trigger_measurement(&mut self) -> Result<()>;

    /// Poll for a finished measurement. `Ok(None)` means data is not ready
    /// yet; the reader will retry within its bounded budget.
    fn try_read(&mut self) -> Result<Option<ClimateSample>>;
}

/// Bounded retry budget for a data-ready poll loop.
///
/// Expressed as an explicit attempt count and backoff so the loop is
/// testable under tokio's paused clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of poll attempts before giving up.
    pub max_attempts: u32,

    /// Pause between consecutive attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Climate sensor reader.
///
/// Wraps a [`ClimateChip`] and owns the sampling policy. Construction
/// configures the chip once; if that fails the sensor is disabled for the
/// process lifetime and every subsequent [`sample`](Self::sample) returns
/// absent without touching the transport again.
#[derive(Debug)]
pub struct ClimateSensor<C> {
    chip: Option<C>,
    retry: RetryPolicy,
}

impl<C: ClimateChip> ClimateSensor<C> {
    /// Configure the chip and build the reader.
    ///
    /// A configuration failure is logged and downgrades the reader to the
    /// disabled state; it is never propagated.
    pub fn new(mut chip: C, retry: RetryPolicy) -> Self {
        match chip.configure() {
            Ok(()) => Self {
                chip: Some(chip),
                retry,
            },
            Err(e) => {
                warn!(sensor = "climate", error = %e, "initialization failed; sensor disabled for process lifetime");
                Self { chip: None, retry }
            }
        }
    }

    /// Build a reader with no chip at all (e.g. the device node could not
    /// be opened). Sampling always returns absent.
    pub fn disabled(retry: RetryPolicy) -> Self {
        Self { chip: None, retry }
    }

    /// Whether the chip came up at startup.
    pub fn is_available(&self) -> bool {
        self.chip.is_some()
    }

    /// Take one sample: trigger a measurement, then poll data-ready within
    /// the retry budget. Absent on any failure, with the cause logged.
    pub async fn sample(&mut self) -> Option<ClimateSample> {
        let retry = self.retry;
        let chip = self.chip.as_mut()?;

        match Self::poll(chip, retry).await {
            Ok(sample) => Some(sample),
            Err(e) => {
                warn!(sensor = "climate", error = %e, "sample failed");
                None
            }
        }
    }

    async fn poll(chip: &mut C, retry: RetryPolicy) -> Result<ClimateSample> {
        chip.trigger_measurement()?;

        for attempt in 1..=retry.max_attempts {
            if let Some(sample) = chip.try_read()? {
                return Ok(sample);
            }
            if attempt < retry.max_attempts {
                tokio::time::sleep(retry.backoff).await;
            }
        }

        Err(HardwareError::not_ready(retry.max_attempts))
    }
}

/// Production climate chip: a BME680 driven by the `bme680` crate.
///
/// The driver owns its transport, so this type holds its own handle to the
/// bus device node. That stays within the single-owner rule: the collector
/// owns the whole sensor suite and samples sequentially, so no two handles
/// are ever in flight at once.
pub struct Bme680Chip {
    dev: bme680::Bme680<linux_embedded_hal::I2cdev, linux_embedded_hal::Delay>,
    delay: linux_embedded_hal::Delay,
}

impl Bme680Chip {
    /// Open the chip at its secondary address (0x77) on the given bus
    /// device node.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::InitializationFailed`] if the node cannot
    /// be opened or the chip does not answer.
    pub fn open(bus_path: &str) -> Result<Self> {
        let i2c = linux_embedded_hal::I2cdev::new(bus_path).map_err(|e| {
            HardwareError::initialization_failed(format!("open {bus_path}: {e}"))
        })?;

        let mut delay = linux_embedded_hal::Delay {};
        let dev = bme680::Bme680::init(i2c, &mut delay, bme680::I2CAddress::Secondary)
            .map_err(|e| HardwareError::initialization_failed(format!("bme680 init: {e:?}")))?;

        Ok(Self { dev, delay })
    }
}

impl ClimateChip for Bme680Chip {
    fn configure(&mut self) -> Result<()> {
        let settings = bme680::SettingsBuilder::new()
            .with_humidity_oversampling(bme680::OversamplingSetting::OS2x)
            .with_pressure_oversampling(bme680::OversamplingSetting::OS4x)
            .with_temperature_oversampling(bme680::OversamplingSetting::OS8x)
            .with_temperature_filter(bme680::IIRFilterSize::Size3)
            .with_gas_measurement(Duration::from_millis(150), 320, 20)
            .with_run_gas(true)
            .build();

        self.dev
            .set_sensor_settings(&mut self.delay, settings)
            .map_err(|e| HardwareError::initialization_failed(format!("bme680 settings: {e:?}")))
    }

    fn trigger_measurement(&mut self) -> Result<()> {
        self.dev
            .set_sensor_mode(&mut self.delay, bme680::PowerMode::ForcedMode)
            .map_err(|e| HardwareError::transfer(format!("bme680 trigger: {e:?}")))
    }

    fn try_read(&mut self) -> Result<Option<ClimateSample>> {
        let (data, state) = self
            .dev
            .get_sensor_data(&mut self.delay)
            .map_err(|e| HardwareError::transfer(format!("bme680 read: {e:?}")))?;

        if matches!(state, bme680::FieldDataCondition::NewData) {
            Ok(Some(ClimateSample {
                temperature: f64::from(data.temperature_celsius()),
                pressure: f64::from(data.pressure_hpa()),
                humidity: f64::from(data.humidity_percent()),
            }))
        } else {
            Ok(None)
        }
    }
}
