//! Scripted mock bus for testing readers without hardware.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::bus::I2cBus;
use crate::error::{HardwareError, Result};

/// One recorded register write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub addr: u8,
    pub register: u8,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
struct State {
    read_queue: VecDeque<Result<Vec<u8>>>,
    writes: Vec<WriteRecord>,
    fail_all: bool,
}

/// Mock bus gateway.
///
/// Register writes are recorded and succeed; register reads pop scripted
/// responses queued through the [`MockI2cHandle`]. An exhausted queue
/// behaves like an absent device, and `fail_all` turns every transfer into
/// a not-present error, simulating a device that was unplugged.
///
/// # Examples
///
/// ```
/// use verdant_hardware::bus::I2cBus;
/// use verdant_hardware::mock::MockI2c;
///
/// let (mut bus, handle) = MockI2c::new();
/// handle.queue_read([0x01, 0x90]);
///
/// let mut buf = [0u8; 2];
/// bus.read_register(0x23, 0x10, &mut buf).unwrap();
/// assert_eq!(buf, [0x01, 0x90]);
/// ```
#[derive(Debug)]
pub struct MockI2c {
    state: Arc<Mutex<State>>,
}

impl MockI2c {
    /// Create a mock bus and its scripting handle.
    pub fn new() -> (Self, MockI2cHandle) {
        let state = Arc::new(Mutex::new(State::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockI2cHandle { state },
        )
    }
}

impl I2cBus for MockI2c {
    fn write_register(&mut self, addr: u8, register: u8, bytes: &[u8]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_all {
            return Err(HardwareError::not_present(format!("0x{addr:02x}")));
        }

        state.writes.push(WriteRecord {
            addr,
            register,
            bytes: bytes.to_vec(),
        });
        Ok(())
    }

    fn read_register(&mut self, addr: u8, register: u8, buf: &mut [u8]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_all {
            return Err(HardwareError::not_present(format!("0x{addr:02x}")));
        }

        match state.read_queue.pop_front() {
            Some(Ok(bytes)) => {
                if bytes.len() != buf.len() {
                    return Err(HardwareError::invalid_data(format!(
                        "scripted response is {} bytes, reg 0x{register:02x} read wants {}",
                        bytes.len(),
                        buf.len()
                    )));
                }
                buf.copy_from_slice(&bytes);
                Ok(())
            }
            Some(Err(e)) => Err(e),
            None => Err(HardwareError::not_present(format!("0x{addr:02x}"))),
        }
    }
}

/// Scripting handle for a [`MockI2c`]. Cloneable; all clones share state.
#[derive(Debug, Clone)]
pub struct MockI2cHandle {
    state: Arc<Mutex<State>>,
}

impl MockI2cHandle {
    /// Queue a successful read response.
    pub fn queue_read(&self, bytes: impl Into<Vec<u8>>) {
        self.state
            .lock()
            .unwrap()
            .read_queue
            .push_back(Ok(bytes.into()));
    }

    /// Queue a failing read.
    pub fn queue_read_error(&self, error: HardwareError) {
        self.state.lock().unwrap().read_queue.push_back(Err(error));
    }

    /// Make every transfer fail from now on.
    pub fn fail_all(&self) {
        self.state.lock().unwrap().fail_all = true;
    }

    /// All register writes recorded so far.
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.state.lock().unwrap().writes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_are_recorded() {
        let (mut bus, handle) = MockI2c::new();

        bus.write_register(0x48, 0x01, &[0xC3, 0xE3]).unwrap();

        let writes = handle.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].addr, 0x48);
        assert_eq!(writes[0].register, 0x01);
        assert_eq!(writes[0].bytes, vec![0xC3, 0xE3]);
    }

    #[test]
    fn reads_pop_in_queue_order() {
        let (mut bus, handle) = MockI2c::new();
        handle.queue_read([0x01]);
        handle.queue_read([0x02]);

        let mut buf = [0u8; 1];
        bus.read_register(0x48, 0x00, &mut buf).unwrap();
        assert_eq!(buf, [0x01]);
        bus.read_register(0x48, 0x00, &mut buf).unwrap();
        assert_eq!(buf, [0x02]);
    }

    #[test]
    fn exhausted_queue_reads_like_an_absent_device() {
        let (mut bus, _handle) = MockI2c::new();

        let mut buf = [0u8; 2];
        let err = bus.read_register(0x23, 0x10, &mut buf).unwrap_err();
        assert!(matches!(err, HardwareError::NotPresent { .. }));
    }

    #[test]
    fn length_mismatch_is_invalid_data() {
        let (mut bus, handle) = MockI2c::new();
        handle.queue_read([0x01, 0x02, 0x03]);

        let mut buf = [0u8; 2];
        let err = bus.read_register(0x48, 0x00, &mut buf).unwrap_err();
        assert!(matches!(err, HardwareError::InvalidData { .. }));
    }

    #[test]
    fn fail_all_rejects_writes_and_reads() {
        let (mut bus, handle) = MockI2c::new();
        handle.queue_read([0x01, 0x02]);
        handle.fail_all();

        assert!(bus.write_register(0x48, 0x01, &[0x00]).is_err());
        let mut buf = [0u8; 2];
        assert!(bus.read_register(0x48, 0x00, &mut buf).is_err());
    }
}
