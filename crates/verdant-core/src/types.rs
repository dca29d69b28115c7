use serde::{Deserialize, Serialize};

/// One collection cycle's worth of sensor data.
///
/// Every field is optional: a sensor that failed or timed out this cycle is
/// simply absent, which is semantically distinct from a reading of zero.
/// The collector creates a fresh record each cycle, fills in whatever the
/// readers managed to obtain, and enqueues it; the writer consumes it
/// exactly once and maps each absent field to a database NULL.
///
/// `photo_path` and `plant_height` are carried for schema compatibility
/// with the camera/growth collaborators; this daemon never fills them.
///
/// # Examples
///
/// ```
/// use verdant_core::Observation;
///
/// let mut obs = Observation::default();
/// assert!(obs.is_empty());
///
/// obs.air_temperature = Some(21.4);
/// obs.lux = Some(333.33);
/// assert_eq!(obs.field_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Air temperature in °C.
    pub air_temperature: Option<f64>,

    /// Barometric pressure in hPa.
    pub air_pressure: Option<f64>,

    /// Relative air humidity in %.
    pub air_humidity: Option<f64>,

    /// Soil temperature in °C (one-wire probe).
    pub temperature_soil: Option<f64>,

    /// Raw ADC code from the water level channel.
    pub water_level: Option<f64>,

    /// Raw ADC code from the soil moisture channel.
    pub soil_moisture: Option<f64>,

    /// Raw ADC code from the ultraviolet channel.
    pub ultraviolet: Option<f64>,

    /// Illuminance in lux.
    pub lux: Option<f64>,

    /// Path of a photo captured this cycle, if any.
    pub photo_path: Option<String>,

    /// Measured plant height, if any.
    pub plant_height: Option<f64>,
}

impl Observation {
    /// True when no field is present.
    ///
    /// Empty observations are never enqueued; a cycle in which every sensor
    /// failed produces nothing for the writer.
    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }

    /// Number of present fields.
    pub fn field_count(&self) -> usize {
        let numeric = [
            self.air_temperature,
            self.air_pressure,
            self.air_humidity,
            self.temperature_soil,
            self.water_level,
            self.soil_moisture,
            self.ultraviolet,
            self.lux,
            self.plant_height,
        ];

        numeric.iter().filter(|v| v.is_some()).count() + usize::from(self.photo_path.is_some())
    }
}
