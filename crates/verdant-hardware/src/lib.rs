//! Hardware layer for the Verdant sensor-collection daemon.
//!
//! This crate owns everything between the physical buses and the
//! observation channel: the register-level bus gateway, one reader per
//! sensor, and the collection worker that drives them.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────┐   ┌───────────┐   ┌───────────┐   ┌───────────┐
//! │ Climate   │   │ Analog    │   │ Soil      │   │ Light     │
//! │ (BME680)  │   │ (ADS1115) │   │ (DS18B20) │   │ (BH1750)  │
//! └─────┬─────┘   └─────┬─────┘   └─────┬─────┘   └─────┬─────┘
//!       │               │               │               │
//!       │         ┌─────┴───────────────┴───────────────┘
//!       │         │  I2cBus gateway        w1 sysfs path
//!       │         │
//! ┌─────┴─────────┴────────────────────────────────────────────┐
//! │ Collector: fixed-order sampling, inter-read delays, merge, │
//! │ non-blocking publish, cooperative stop                     │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Failure model
//!
//! Every reader failure is local: the reading is reported absent for the
//! cycle, the cause is logged, and the remaining readers still run. A
//! sensor that fails to initialize at startup is disabled for the process
//! lifetime; nothing in this crate ever terminates the process.
//!
//! # Testing
//!
//! The [`mock`] module provides scripted stand-ins for the bus and the
//! climate chip, and the retry loops run against tokio's clock so tests
//! with a paused runtime complete instantly.

pub mod analog;
pub mod bus;
pub mod climate;
pub mod collector;
pub mod error;
pub mod light;
pub mod mock;
pub mod soil;

pub use analog::{AnalogMux, AnalogSample};
pub use bus::{I2cBus, LinuxI2c};
pub use climate::{Bme680Chip, ClimateChip, ClimateSample, ClimateSensor, RetryPolicy};
pub use collector::{Collector, CollectorConfig};
pub use error::{HardwareError, Result};
pub use light::LightSensor;
pub use soil::{parse_w1_payload, SoilProbe};
