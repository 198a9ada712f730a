//! Configuration for the exposure pipeline

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{ExposureError, ExposureResult};

/// Configuration for exposure aggregation and flip location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureConfig {
    /// Number of synthetic spot levels in the profile grid
    /// Default: 300
    pub grid_points: usize,

    /// Lower edge of the strike/spot window as a multiple of spot
    /// Default: 0.5
    pub window_low: f64,

    /// Upper edge of the strike/spot window as a multiple of spot
    /// Default: 1.5
    pub window_high: f64,

    /// Divisor applied to every summed exposure for display
    /// Default: 1e9
    pub scale: f64,

    /// Minimum same-sign run on each side of a histogram flip
    /// Default: 2
    pub min_run_length: usize,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            grid_points: 300,
            window_low: 0.5,
            window_high: 1.5,
            scale: 1e9,
            min_run_length: 2,
        }
    }
}

impl ExposureConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> ExposureResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config: ExposureConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ExposureResult<()> {
        if self.grid_points < 2 {
            return Err(ExposureError::config("grid_points must be at least 2"));
        }
        if !(self.window_low > 0.0 && self.window_low < self.window_high) {
            return Err(ExposureError::config(format!(
                "window must satisfy 0 < low < high, got [{}, {}]",
                self.window_low, self.window_high
            )));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ExposureError::config("scale must be positive"));
        }
        if self.min_run_length == 0 {
            return Err(ExposureError::config("min_run_length must be at least 1"));
        }
        Ok(())
    }

    /// Strike/spot window `[from_strike, to_strike]` around spot
    pub fn window(&self, spot: f64) -> (f64, f64) {
        (self.window_low * spot, self.window_high * spot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ExposureConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window(100.0), (50.0, 150.0));
        assert_eq!(config.min_run_length, 2);
    }

    #[test]
    fn test_invalid_configs() {
        let bad_grid = ExposureConfig {
            grid_points: 1,
            ..Default::default()
        };
        assert!(bad_grid.validate().is_err());

        let bad_window = ExposureConfig {
            window_low: 1.2,
            window_high: 0.8,
            ..Default::default()
        };
        assert!(bad_window.validate().is_err());
    }

    #[test]
    fn test_partial_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"grid_points": 50, "min_run_length": 3}}"#).unwrap();

        let config = ExposureConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.grid_points, 50);
        assert_eq!(config.min_run_length, 3);
        assert_eq!(config.scale, 1e9);
    }
}
