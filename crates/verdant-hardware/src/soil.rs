//! One-wire soil temperature probe (DS18B20 semantics).
//!
//! The kernel's w1 driver exposes the probe as a two-line text file: the
//! first line ends in `YES` when the on-wire CRC checked out, the second
//! carries the temperature in millidegrees after a `t=` marker.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{HardwareError, Result};

/// Trailing token of the first payload line when the CRC is valid.
const CRC_VALID_MARKER: &str = "YES";

/// Parse a w1_slave payload into degrees Celsius.
///
/// # Examples
///
/// ```
/// use verdant_hardware::soil::parse_w1_payload;
///
/// let payload = "4b 01 4b 46 7f ff 0c 10 2d : crc=2d YES\n4b 01 4b 46 7f ff 0c 10 2d t=23562\n";
/// assert_eq!(parse_w1_payload(payload).unwrap(), 23.562);
/// ```
///
/// # Errors
///
/// Returns [`HardwareError::InvalidData`] when the CRC marker is missing,
/// the reading line is absent, or the millidegree value does not parse.
pub fn parse_w1_payload(payload: &str) -> Result<f64> {
    let mut lines = payload.lines();

    let status = lines
        .next()
        .ok_or_else(|| HardwareError::invalid_data("empty one-wire payload"))?;
    if !status.trim_end().ends_with(CRC_VALID_MARKER) {
        return Err(HardwareError::invalid_data("one-wire CRC check failed"));
    }

    let reading = lines
        .next()
        .ok_or_else(|| HardwareError::invalid_data("missing one-wire reading line"))?;
    let marker = reading
        .find("t=")
        .ok_or_else(|| HardwareError::invalid_data("missing t= marker"))?;

    let millidegrees: f64 = reading[marker + 2..].trim().parse().map_err(|_| {
        HardwareError::invalid_data(format!("unparseable temperature in {reading:?}"))
    })?;

    Ok(millidegrees / 1000.0)
}

/// Soil temperature reader backed by a w1 sysfs path.
#[derive(Debug, Clone)]
pub struct SoilProbe {
    path: PathBuf,
}

impl SoilProbe {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the probe. Absent on any failure, with the cause
    /// logged.
    pub async fn sample(&self) -> Option<f64> {
        match self.read().await {
            Ok(celsius) => Some(celsius),
            Err(e) => {
                warn!(sensor = "soil", error = %e, "sample failed");
                None
            }
        }
    }

    async fn read(&self) -> Result<f64> {
        let payload = tokio::fs::read_to_string(&self.path).await?;
        parse_w1_payload(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const VALID_PAYLOAD: &str =
        "4b 01 4b 46 7f ff 0c 10 2d : crc=2d YES\n4b 01 4b 46 7f ff 0c 10 2d t=23562\n";

    #[test]
    fn valid_payload_parses_millidegrees() {
        assert_eq!(parse_w1_payload(VALID_PAYLOAD).unwrap(), 23.562);
    }

    #[test]
    fn negative_temperature_parses() {
        let payload = "aa bb : crc=2d YES\naa bb t=-1250\n";
        assert_eq!(parse_w1_payload(payload).unwrap(), -1.25);
    }

    #[test]
    fn crc_failure_is_invalid_data() {
        let payload = "4b 01 4b 46 7f ff 0c 10 2d : crc=2d NO\n4b 01 t=23562\n";
        let err = parse_w1_payload(payload).unwrap_err();
        assert!(matches!(err, HardwareError::InvalidData { .. }));
    }

    #[test]
    fn missing_marker_is_invalid_data() {
        let payload = "aa bb : crc=2d YES\naa bb\n";
        assert!(parse_w1_payload(payload).is_err());
    }

    #[test]
    fn empty_payload_is_invalid_data() {
        assert!(parse_w1_payload("").is_err());
    }

    #[tokio::test]
    async fn probe_reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VALID_PAYLOAD.as_bytes()).unwrap();

        let probe = SoilProbe::new(file.path());
        assert_eq!(probe.sample().await, Some(23.562));
    }

    #[tokio::test]
    async fn missing_file_yields_absent() {
        let probe = SoilProbe::new("/nonexistent/w1_slave");
        assert_eq!(probe.sample().await, None);
    }

    #[tokio::test]
    async fn crc_failure_yields_absent_without_panicking() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"aa bb : crc=2d NO\naa bb t=23562\n").unwrap();

        let probe = SoilProbe::new(file.path());
        assert_eq!(probe.sample().await, None);
    }
}
