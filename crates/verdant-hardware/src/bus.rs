//! Bus gateway: register-level access to the shared I2C bus.
//!
//! The [`I2cBus`] trait is the boundary between the sensor readers and the
//! raw transport. Readers never open device nodes themselves; the collector
//! owns a single bus value and lends it to each reader in turn, so access
//! is serialized by construction.

use embedded_hal::blocking::i2c::{Write, WriteRead};
use linux_embedded_hal::I2cdev;

use crate::error::{HardwareError, Result};

/// Register-level gateway to an I2C bus.
///
/// Devices are addressed by their 7-bit address. All errors are transient
/// from the caller's point of view: recover by retrying or by skipping the
/// reading for this cycle.
///
/// # Concurrency
///
/// Implementations are **not safe for concurrent calls from multiple
/// threads without external synchronization**. The collector holds the only
/// bus value and samples sequentially within one task, which is the only
/// supported usage.
pub trait I2cBus: Send {
    /// Write `bytes` to `register` of the device at `addr`.
    fn write_register(&mut self, addr: u8, register: u8, bytes: &[u8]) -> Result<()>;

    /// Read exactly `buf.len()` bytes from `register` of the device at
    /// `addr`.
    fn read_register(&mut self, addr: u8, register: u8, buf: &mut [u8]) -> Result<()>;
}

/// Production bus gateway over a Linux `/dev/i2c-N` device node.
///
/// Thin adapter around [`linux_embedded_hal::I2cdev`]; register writes are a
/// single write transaction of `[register, bytes...]`, register reads a
/// write-read transaction. Dropping the value closes the device node.
pub struct LinuxI2c {
    dev: I2cdev,
}

impl std::fmt::Debug for LinuxI2c {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinuxI2c").finish_non_exhaustive()
    }
}

impl LinuxI2c {
    /// Open the bus device node, e.g. `/dev/i2c-1`.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::InitializationFailed`] if the node cannot
    /// be opened.
    pub fn open(path: &str) -> Result<Self> {
        let dev = I2cdev::new(path).map_err(|e| {
            HardwareError::initialization_failed(format!("open {path}: {e}"))
        })?;
        Ok(Self { dev })
    }
}

impl I2cBus for LinuxI2c {
    fn write_register(&mut self, addr: u8, register: u8, bytes: &[u8]) -> Result<()> {
        let mut frame = Vec::with_capacity(1 + bytes.len());
        frame.push(register);
        frame.extend_from_slice(bytes);

        self.dev.write(addr, &frame).map_err(|e| {
            HardwareError::transfer(format!("write reg 0x{register:02x} at 0x{addr:02x}: {e}"))
        })
    }

    fn read_register(&mut self, addr: u8, register: u8, buf: &mut [u8]) -> Result<()> {
        self.dev.write_read(addr, &[register], buf).map_err(|e| {
            HardwareError::transfer(format!("read reg 0x{register:02x} at 0x{addr:02x}: {e}"))
        })
    }
}
