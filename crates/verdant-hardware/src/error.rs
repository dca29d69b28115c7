//! Error types for bus and sensor operations.
//!
//! Every failure a reader can encounter is recoverable: the owning reader
//! logs the cause and reports its reading as absent for the cycle. None of
//! these errors ever propagate past the reader that produced them.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur while talking to the bus or a sensor.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device did not acknowledge on the bus.
    #[error("Device not present: {device}")]
    NotPresent { device: String },

    /// A bus transfer failed or timed out mid-flight.
    #[error("Bus transfer failed: {message}")]
    Transfer { message: String },

    /// Device answered, but the payload is malformed (bad CRC, wrong
    /// length, unparseable text).
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Measurement was triggered but data never became ready within the
    /// bounded retry budget.
    #[error("Data not ready after {attempts} attempts")]
    NotReady { attempts: u32 },

    /// Sensor could not be brought up at startup. The sensor is disabled
    /// for the process lifetime; other sensors are unaffected.
    #[error("Initialization failed: {message}")]
    InitializationFailed { message: String },

    /// Generic I/O error (one-wire sysfs reads).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    /// Create a new device-not-present error.
    pub fn not_present(device: impl Into<String>) -> Self {
        Self::NotPresent {
            device: device.into(),
        }
    }

    /// Create a new transfer error.
    pub fn transfer(message: impl Into<String>) -> Self {
        Self::Transfer {
            message: message.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a new not-ready error.
    pub fn not_ready(attempts: u32) -> Self {
        Self::NotReady { attempts }
    }

    /// Create a new initialization failed error.
    pub fn initialization_failed(message: impl Into<String>) -> Self {
        Self::InitializationFailed {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_present_display() {
        let error = HardwareError::not_present("0x48");
        assert!(matches!(error, HardwareError::NotPresent { .. }));
        assert_eq!(error.to_string(), "Device not present: 0x48");
    }

    #[test]
    fn test_not_ready_display() {
        let error = HardwareError::not_ready(10);
        assert_eq!(error.to_string(), "Data not ready after 10 attempts");
    }

    #[test]
    fn test_invalid_data_display() {
        let error = HardwareError::invalid_data("CRC check failed");
        assert_eq!(error.to_string(), "Invalid data: CRC check failed");
    }
}
