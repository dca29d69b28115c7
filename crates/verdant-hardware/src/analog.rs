//! Multiplexed analog reader (ADS1115 semantics).
//!
//! Three single-ended channels share one converter: water level on AIN0,
//! soil moisture on AIN1, ultraviolet on AIN2. Each channel is selected by
//! writing a config word, allowed a short settle, then read back as a
//! big-endian two's-complement 16-bit conversion result.

use std::time::Duration;

use tracing::{debug, warn};

use crate::bus::I2cBus;
use crate::error::Result;

/// 7-bit address of the converter (ADDR pin to GND).
pub const ADS1115_ADDR: u8 = 0x48;

const REG_CONVERSION: u8 = 0x00;
const REG_CONFIG: u8 = 0x01;

// Config word fields, per the ADS1115 datasheet.
const OS_SINGLE: u16 = 0b1 << 15; // start a single conversion
const PGA_4V096: u16 = 0b001 << 9; // ±4.096 V range
const MODE_SINGLE_SHOT: u16 = 0b1 << 8;
const DATA_RATE_128SPS: u16 = 0b100 << 5;
const COMP_DISABLE: u16 = 0b11;

const MUX_WATER_LEVEL: u16 = 0b100 << 12; // AIN0 vs GND
const MUX_SOIL_MOISTURE: u16 = 0b101 << 12; // AIN1 vs GND
const MUX_ULTRAVIOLET: u16 = 0b110 << 12; // AIN2 vs GND

/// Volts per count at the ±4.096 V range: 4.096 / 2^15.
pub const LSB_VOLTS: f64 = 4.096 / 32768.0;

const CHANNELS: [(&str, u16); 3] = [
    ("water_level", MUX_WATER_LEVEL),
    ("soil_moisture", MUX_SOIL_MOISTURE),
    ("ultraviolet", MUX_ULTRAVIOLET),
];

/// Raw conversion codes for the three channels of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalogSample {
    pub water_level: i16,
    pub soil_moisture: i16,
    pub ultraviolet: i16,
}

/// Convert a raw conversion code to volts.
///
/// Codes above 32767 wrap to negative two's-complement values before
/// scaling, so 0x8000 is -32768 counts and 0xFFFF is -1 count.
///
/// # Examples
///
/// ```
/// use verdant_hardware::analog::voltage;
///
/// assert_eq!(voltage(32767), 4.096 - 4.096 / 32768.0);
/// assert_eq!(voltage(-32768), -4.096);
/// ```
pub fn voltage(raw: i16) -> f64 {
    f64::from(raw) * LSB_VOLTS
}

/// Reader for the three multiplexed analog channels.
///
/// Sampling is all-or-nothing across the channels: a failed transfer on any
/// channel discards the whole reading for the cycle.
#[derive(Debug)]
pub struct AnalogMux {
    settle: Duration,
    channel_delay: Duration,
}

impl AnalogMux {
    pub fn new() -> Self {
        Self {
            settle: Duration::from_millis(10),
            channel_delay: Duration::from_millis(500),
        }
    }

    /// Override the settle and inter-channel delays.
    pub fn with_delays(settle: Duration, channel_delay: Duration) -> Self {
        Self {
            settle,
            channel_delay,
        }
    }

    /// Read all three channels. Absent on any transfer failure, with the
    /// cause logged.
    pub async fn sample<B: I2cBus + ?Sized>(&mut self, bus: &mut B) -> Option<AnalogSample> {
        match self.read_channels(bus).await {
            Ok(sample) => Some(sample),
            Err(e) => {
                warn!(sensor = "analog", error = %e, "sample failed");
                None
            }
        }
    }

    async fn read_channels<B: I2cBus + ?Sized>(&mut self, bus: &mut B) -> Result<AnalogSample> {
        let mut codes = [0i16; 3];

        for (slot, (name, mux)) in CHANNELS.iter().copied().enumerate() {
            let config =
                OS_SINGLE | mux | PGA_4V096 | MODE_SINGLE_SHOT | DATA_RATE_128SPS | COMP_DISABLE;

            bus.write_register(ADS1115_ADDR, REG_CONFIG, &config.to_be_bytes())?;
            tokio::time::sleep(self.settle).await;

            let mut buf = [0u8; 2];
            bus.read_register(ADS1115_ADDR, REG_CONVERSION, &mut buf)?;

            let raw = i16::from_be_bytes(buf);
            debug!(sensor = "analog", channel = name, raw, volts = voltage(raw), "channel read");
            codes[slot] = raw;

            tokio::time::sleep(self.channel_delay).await;
        }

        Ok(AnalogSample {
            water_level: codes[0],
            soil_moisture: codes[1],
            ultraviolet: codes[2],
        })
    }
}

impl Default for AnalogMux {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HardwareError;
    use crate::mock::MockI2c;
    use rstest::rstest;

    #[rstest]
    #[case([0x80, 0x00], -32768)]
    #[case([0xFF, 0xFF], -1)]
    #[case([0x7F, 0xFF], 32767)]
    #[case([0x00, 0x00], 0)]
    fn conversion_codes_are_twos_complement(#[case] bytes: [u8; 2], #[case] expected: i16) {
        assert_eq!(i16::from_be_bytes(bytes), expected);
    }

    #[test]
    fn voltage_scale_matches_lsb() {
        assert!((voltage(-32768) - (-4.096)).abs() < 1e-9);
        assert!((voltage(-1) - (-4.096 / 32768.0)).abs() < 1e-9);
        assert!((voltage(16384) - 2.048).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn reads_all_three_channels_in_order() {
        let (mut bus, handle) = MockI2c::new();
        handle.queue_read([0x01, 0x00]); // water level: 256
        handle.queue_read([0x02, 0x00]); // soil moisture: 512
        handle.queue_read([0xFF, 0xFF]); // ultraviolet: -1

        let mut mux = AnalogMux::new();
        let sample = mux.sample(&mut bus).await.unwrap();

        assert_eq!(
            sample,
            AnalogSample {
                water_level: 256,
                soil_moisture: 512,
                ultraviolet: -1,
            }
        );

        // One config write per channel, each selecting a different mux.
        let writes = handle.writes();
        assert_eq!(writes.len(), 3);
        assert!(writes.iter().all(|w| w.addr == ADS1115_ADDR && w.register == REG_CONFIG));

        let muxes: Vec<u16> = writes
            .iter()
            .map(|w| u16::from_be_bytes([w.bytes[0], w.bytes[1]]) & (0b111 << 12))
            .collect();
        assert_eq!(muxes, vec![MUX_WATER_LEVEL, MUX_SOIL_MOISTURE, MUX_ULTRAVIOLET]);
    }

    #[tokio::test(start_paused = true)]
    async fn any_channel_failure_discards_the_whole_reading() {
        let (mut bus, handle) = MockI2c::new();
        handle.queue_read([0x01, 0x00]);
        handle.queue_read_error(HardwareError::transfer("scripted failure"));

        let mut mux = AnalogMux::new();
        assert_eq!(mux.sample(&mut bus).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn absent_device_yields_absent_sample() {
        let (mut bus, handle) = MockI2c::new();
        handle.fail_all();

        let mut mux = AnalogMux::new();
        assert_eq!(mux.sample(&mut bus).await, None);
    }
}
