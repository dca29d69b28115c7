//! Mock implementations for testing and development.
//!
//! These simulate the bus and the climate chip without physical hardware.
//! Each mock comes as a (device, handle) pair: the device is handed to the
//! code under test, the handle stays with the test to script responses and
//! inspect the traffic.

mod bus;
mod climate;

pub use bus::{MockI2c, MockI2cHandle, WriteRecord};
pub use climate::{MockClimateChip, MockClimateHandle};
