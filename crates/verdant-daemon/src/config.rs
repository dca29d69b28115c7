use anyhow::{Context, Result};

use verdant_core::constants::{DEFAULT_DATABASE_PATH, DEFAULT_I2C_BUS, DEFAULT_W1_DEVICE};

/// Daemon configuration, read from the environment.
///
/// Everything is optional with sensible defaults; the daemon runs with no
/// configuration at all on a stock Raspberry Pi style setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path of the SQLite database file.
    pub database_path: String,

    /// Seconds between collection cycle starts.
    pub poll_interval_secs: u64,

    /// Linux I2C bus device node.
    pub i2c_bus: String,

    /// sysfs path of the one-wire soil probe.
    pub w1_device: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::build(|key| std::env::var(key).ok())
    }

    fn build(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let poll_interval_secs = get("VERDANT_POLL_INTERVAL_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .context("VERDANT_POLL_INTERVAL_SECS must be a positive integer")?;

        Ok(Self {
            database_path: get("VERDANT_DB_PATH")
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
            poll_interval_secs,
            i2c_bus: get("VERDANT_I2C_BUS").unwrap_or_else(|| DEFAULT_I2C_BUS.to_string()),
            w1_device: get("VERDANT_W1_DEVICE").unwrap_or_else(|| DEFAULT_W1_DEVICE.to_string()),
        })
    }
}
