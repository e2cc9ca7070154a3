//! Defines command-line interface options using `clap` for the IsoLat application.

use crate::config::{AnalysisConfig, RegionBounds};
use clap::Parser;
use std::path::PathBuf;

/// A CLI tool for tracing SST isotherm latitudes in NetCDF files
#[derive(Parser, Debug)]
#[command(
    version = "0.3.0",
    name = "IsoLat",
    about = "Computes the mean latitude of an SST isotherm per year from gridded NetCDF data"
)]
pub struct Args {
    /// Path to the NetCDF file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Directory receiving figures and the CSV table
    #[arg(short, long, default_value = "figs/isotherms")]
    pub output_dir: PathBuf,

    /// Name of the SST variable
    #[arg(long, default_value = "sst")]
    pub var: String,

    /// Isotherm level in degrees Celsius
    #[arg(short, long, default_value_t = 13.0)]
    pub level: f64,

    /// Geographic bounds of the raster, formatted as <lon_min>:<lat_min>:<lon_max>:<lat_max>.
    /// Defaults to the Celtic Sea (-12.5:48.5:-4.5:52.5).
    #[arg(long, value_parser = parse_region_arg)]
    pub region: Option<RegionBounds>,

    /// Number of threads to use for parallel processing. Defaults to number of CPU cores.
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Enable verbose output.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// List all variables and dimensions in the NetCDF file and exit
    #[arg(long)]
    pub list_vars: bool,

    /// Sort CSV rows by year before writing
    #[arg(long)]
    pub sorted_csv: bool,

    /// Save one contour figure per processed year
    #[arg(long)]
    pub yearly_figures: bool,
}

impl Args {
    /// Build the analysis configuration from the parsed arguments.
    pub fn to_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            input: self.file.clone(),
            output_dir: self.output_dir.clone(),
            variable: self.var.clone(),
            level: self.level,
            region: self.region.unwrap_or_else(RegionBounds::celtic_sea),
            sort_csv: self.sorted_csv,
            yearly_figures: self.yearly_figures,
        }
    }
}

fn parse_region_arg(s: &str) -> Result<RegionBounds, String> {
    let parts: Vec<&str> = s.split(':').collect();
    match parts.as_slice() {
        [lon_min, lat_min, lon_max, lat_max] => {
            let parse = |field: &str, name: &str| {
                field
                    .parse::<f64>()
                    .map_err(|_| format!("Invalid {} '{}'", name, field))
            };
            let bounds = RegionBounds::new(
                parse(lon_min, "lon_min")?,
                parse(lat_min, "lat_min")?,
                parse(lon_max, "lon_max")?,
                parse(lat_max, "lat_max")?,
            );
            bounds.map_err(|e| e.to_string())
        }
        _ => Err("Invalid format: Expected '<lon_min>:<lat_min>:<lon_max>:<lat_max>'.".to_string()),
    }
}
