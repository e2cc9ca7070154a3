//! Centralized error handling for IsoLat
//!
//! This module provides structured error types to replace the generic `Box<dyn Error>`
//! used throughout the codebase, enabling better error context and type safety.

use std::fmt;

/// Main error type for IsoLat operations
#[derive(Debug)]
pub enum IsoLatError {
    /// NetCDF file operation errors
    NetCDFError(netcdf::Error),

    /// I/O operation errors
    IoError(std::io::Error),

    /// Variable not found in NetCDF file
    VariableNotFound { var: String },

    /// Variable does not have the expected dimensionality
    DimensionMismatch {
        var: String,
        expected: usize,
        found: usize,
    },

    /// Time axis decoding or alignment errors
    TimeAxisError(String),

    /// Statistics computation errors
    StatisticsError(String),

    /// Contour tracing precondition or geometry errors
    ContourError(String),

    /// Invalid analysis configuration (region bounds, level, paths)
    ConfigError(String),

    /// Chart rendering errors
    PlotError(String),

    /// Thread pool configuration error
    ThreadPoolError(String),

    /// Array shape or dimension error
    ArrayError(ndarray::ShapeError),

    /// Generic error
    Generic(String),
}

impl fmt::Display for IsoLatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IsoLatError::NetCDFError(e) => write!(f, "NetCDF error: {}", e),
            IsoLatError::IoError(e) => write!(f, "I/O error: {}", e),
            IsoLatError::VariableNotFound { var } => {
                write!(f, "Variable '{}' not found in file", var)
            }
            IsoLatError::DimensionMismatch {
                var,
                expected,
                found,
            } => write!(
                f,
                "Variable '{}' has {} dimensions, expected {}",
                var, found, expected
            ),
            IsoLatError::TimeAxisError(msg) => write!(f, "Time axis error: {}", msg),
            IsoLatError::StatisticsError(msg) => {
                write!(f, "Statistics computation error: {}", msg)
            }
            IsoLatError::ContourError(msg) => write!(f, "Contour tracing error: {}", msg),
            IsoLatError::ConfigError(msg) => write!(f, "Invalid configuration: {}", msg),
            IsoLatError::PlotError(msg) => write!(f, "Plot rendering error: {}", msg),
            IsoLatError::ThreadPoolError(msg) => write!(f, "Thread pool error: {}", msg),
            IsoLatError::ArrayError(e) => write!(f, "Array error: {}", e),
            IsoLatError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for IsoLatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IsoLatError::NetCDFError(e) => Some(e),
            IsoLatError::IoError(e) => Some(e),
            IsoLatError::ArrayError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<netcdf::Error> for IsoLatError {
    fn from(error: netcdf::Error) -> Self {
        IsoLatError::NetCDFError(error)
    }
}

impl From<std::io::Error> for IsoLatError {
    fn from(error: std::io::Error) -> Self {
        IsoLatError::IoError(error)
    }
}

impl From<ndarray::ShapeError> for IsoLatError {
    fn from(error: ndarray::ShapeError) -> Self {
        IsoLatError::ArrayError(error)
    }
}

impl<E: std::error::Error + Send + Sync> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for IsoLatError
{
    fn from(error: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        IsoLatError::PlotError(error.to_string())
    }
}

impl From<String> for IsoLatError {
    fn from(error: String) -> Self {
        IsoLatError::Generic(error)
    }
}

impl From<&str> for IsoLatError {
    fn from(error: &str) -> Self {
        IsoLatError::Generic(error.to_string())
    }
}

/// Result type alias for IsoLat operations
pub type Result<T> = std::result::Result<T, IsoLatError>;
