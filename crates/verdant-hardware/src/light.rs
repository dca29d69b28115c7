//! Ambient light sensor (BH1750 semantics).

use tracing::warn;

use crate::bus::I2cBus;
use crate::error::Result;

/// 7-bit address of the sensor (ADDR pin low).
pub const BH1750_ADDR: u8 = 0x23;

/// Opcode for continuous high-resolution mode; reading from it returns the
/// latest 16-bit measurement.
const CONTINUOUS_HIGH_RES_MODE: u8 = 0x10;

/// Raw counts per lux.
const LUX_SCALE: f64 = 1.2;

/// Illuminance reader.
#[derive(Debug, Default)]
pub struct LightSensor;

impl LightSensor {
    pub fn new() -> Self {
        Self
    }

    /// Read the current illuminance in lux. Absent on transfer failure,
    /// with the cause logged.
    pub fn sample<B: I2cBus + ?Sized>(&mut self, bus: &mut B) -> Option<f64> {
        match self.read(bus) {
            Ok(lux) => Some(lux),
            Err(e) => {
                warn!(sensor = "light", error = %e, "sample failed");
                None
            }
        }
    }

    fn read<B: I2cBus + ?Sized>(&mut self, bus: &mut B) -> Result<f64> {
        let mut buf = [0u8; 2];
        bus.read_register(BH1750_ADDR, CONTINUOUS_HIGH_RES_MODE, &mut buf)?;
        Ok(f64::from(u16::from_be_bytes(buf)) / LUX_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockI2c;

    #[test]
    fn raw_400_yields_a_third_of_a_thousand_lux() {
        let (mut bus, handle) = MockI2c::new();
        handle.queue_read([0x01, 0x90]); // 400 counts

        let lux = LightSensor::new().sample(&mut bus).unwrap();
        assert!((lux - 400.0 / 1.2).abs() < 1e-9);
        assert!((lux - 333.333).abs() < 0.001);
    }

    #[test]
    fn bytes_are_big_endian() {
        let (mut bus, handle) = MockI2c::new();
        handle.queue_read([0x90, 0x01]); // 36865 counts, not 400

        let lux = LightSensor::new().sample(&mut bus).unwrap();
        assert!((lux - 36865.0 / 1.2).abs() < 1e-9);
    }

    #[test]
    fn transfer_failure_yields_absent() {
        let (mut bus, handle) = MockI2c::new();
        handle.fail_all();

        assert_eq!(LightSensor::new().sample(&mut bus), None);
    }
}
