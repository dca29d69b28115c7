//! Default tuning constants shared by the collector and writer workers.
//!
//! All of these can be overridden through daemon configuration; the values
//! here are the defaults the daemon falls back to.

use std::time::Duration;

/// Default pause between collection cycles.
///
/// Measured from the start of one cycle to the start of the next; the
/// collector subtracts the time spent sampling before sleeping.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Default delay inserted between consecutive sensor reads within a cycle.
///
/// Gives the shared bus time to settle and keeps self-heating sensors from
/// skewing their neighbours.
pub const DEFAULT_INTER_READ_DELAY: Duration = Duration::from_secs(2);

/// Capacity of the observation handoff channel between collector and writer.
///
/// One record is produced every few tens of seconds, so this only fills if
/// the writer has been unable to persist for roughly half an hour. When full
/// the collector drops the newest record rather than stall polling.
pub const OBSERVATION_CHANNEL_CAPACITY: usize = 64;

/// How long the writer blocks waiting for the next observation before
/// re-checking the stop signal.
pub const WRITER_RECV_TIMEOUT: Duration = Duration::from_secs(1);

/// Default path of the SQLite database file.
pub const DEFAULT_DATABASE_PATH: &str = "sensors.db";

/// Default Linux I2C bus device node.
pub const DEFAULT_I2C_BUS: &str = "/dev/i2c-1";

/// Default sysfs path of the one-wire soil temperature probe.
pub const DEFAULT_W1_DEVICE: &str = "/sys/bus/w1/devices/28-00000056688b/w1_slave";
