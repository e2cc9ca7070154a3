//! Analysis configuration
//!
//! Every knob of the pipeline lives here: input path, output directory,
//! variable name, isotherm level and the geographic region. Defaults
//! reproduce the Celtic Sea run (48.5N-52.5N, 12.5W-4.5W, 13 degC).

use crate::errors::{IsoLatError, Result};
use std::path::PathBuf;

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionBounds {
    pub lon_min: f64,
    pub lat_min: f64,
    pub lon_max: f64,
    pub lat_max: f64,
}

impl RegionBounds {
    pub fn new(lon_min: f64, lat_min: f64, lon_max: f64, lat_max: f64) -> Result<Self> {
        if lon_min >= lon_max {
            return Err(IsoLatError::ConfigError(format!(
                "longitude bounds reversed: {} >= {}",
                lon_min, lon_max
            )));
        }
        if lat_min >= lat_max {
            return Err(IsoLatError::ConfigError(format!(
                "latitude bounds reversed: {} >= {}",
                lat_min, lat_max
            )));
        }
        if !(-90.0..=90.0).contains(&lat_min) || !(-90.0..=90.0).contains(&lat_max) {
            return Err(IsoLatError::ConfigError(format!(
                "latitude bounds out of range: {}..{}",
                lat_min, lat_max
            )));
        }
        Ok(Self {
            lon_min,
            lat_min,
            lon_max,
            lat_max,
        })
    }

    /// The Celtic Sea box used by the reference analysis.
    pub fn celtic_sea() -> Self {
        Self {
            lon_min: -12.5,
            lat_min: 48.5,
            lon_max: -4.5,
            lat_max: 52.5,
        }
    }
}

/// Full configuration for a single analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Path to the input NetCDF file
    pub input: PathBuf,
    /// Directory receiving figures and the CSV table
    pub output_dir: PathBuf,
    /// Name of the SST variable in the file
    pub variable: String,
    /// Isotherm level in degrees Celsius
    pub level: f64,
    /// Geographic bounding box of the raster
    pub region: RegionBounds,
    /// Sort CSV rows by year before writing. Record order is already
    /// ascending, so this only matters if the loop order ever changes.
    pub sort_csv: bool,
    /// Save one contour figure per processed year
    pub yearly_figures: bool,
}

impl AnalysisConfig {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Display label for the isotherm level, e.g. `13` or `12.5`.
    pub fn level_label(&self) -> String {
        if self.level.fract() == 0.0 {
            format!("{}", self.level as i64)
        } else {
            format!("{}", self.level)
        }
    }

    /// File stem used for the CSV table, e.g. `iso13` for a 13 degC level.
    pub fn series_name(&self) -> String {
        format!("iso{}", self.level_label())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/sst.nc"),
            output_dir: PathBuf::from("figs/isotherms"),
            variable: "sst".to_string(),
            level: 13.0,
            region: RegionBounds::celtic_sea(),
            sort_csv: false,
            yearly_figures: false,
        }
    }
}
