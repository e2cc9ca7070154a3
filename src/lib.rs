//! IsoLat: SST isotherm latitude analysis for gridded NetCDF data
//!
//! A Rust tool that computes and visualizes the latitude of a
//! sea-surface-temperature isotherm over time from a gridded monthly SST
//! dataset. The pipeline loads a time x lat x lon NetCDF variable, derives a
//! Mercator-projected coordinate grid, renders summary figures, and traces
//! the isotherm contour per year to record its mean latitude.
//!
//! ## Key Features
//!
//! - **NetCDF Loading**: CF time decoding, fill-value masking, packed-data scaling
//! - **Parallel Reductions**: NaN-skipping time means using Rayon
//! - **Contour Tracing**: Marching squares directly in geographic coordinates
//! - **Figures & Export**: Histogram, contour and trend charts plus a CSV table
//!
//! ## Module Organization
//!
//! - [`config`]: Analysis configuration and region bounds
//! - [`dataset`]: NetCDF loading and time axis decoding
//! - [`grid`]: Mercator coordinate grids
//! - [`statistics`]: Field reductions over the SST grid
//! - [`contour`]: Isoline extraction
//! - [`isotherm`]: Per-year extraction loop and series export
//! - [`plots`]: Figure rendering
//! - [`analysis`]: The end-to-end pipeline
//! - [`metadata`]: NetCDF file inspection
//! - [`parallel`]: Parallel processing configuration
//! - [`errors`]: Centralized error handling
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use iso_lat::prelude::*;
//!
//! let config = AnalysisConfig::new("data/sst.nc", "figs/isotherms");
//! let series = iso_lat::analysis::run(&config).unwrap();
//! for record in &series.records {
//!     println!("{}: {}", record.year, record.latitude);
//! }
//! ```

// Core modules
pub mod analysis;
pub mod config;
pub mod contour;
pub mod dataset;
pub mod errors;
pub mod grid;
pub mod isotherm;
pub mod metadata;
pub mod parallel;
pub mod plots;
pub mod statistics;

// CLI surface, shared with the binary
pub mod cli;

// Direct re-exports for the public API
pub use config::*;
pub use contour::*;
pub use dataset::*;
pub use errors::*;
pub use grid::*;
pub use isotherm::*;
pub use statistics::*;

// High-level convenience API
pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::config::{AnalysisConfig, RegionBounds};
    pub use crate::contour::{trace_contour, ContourPath};
    pub use crate::dataset::SstDataset;
    pub use crate::errors::{IsoLatError, Result};
    pub use crate::grid::CoordinateGrid;
    pub use crate::isotherm::{IsothermRecord, IsothermSeries};
    pub use crate::parallel::ParallelConfig;
}
