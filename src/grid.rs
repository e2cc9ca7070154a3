//! Mercator-projected coordinate grids.
//!
//! The raster carries no embedded coordinates for plotting, so a grid of
//! longitude/latitude pairs is derived from the region bounds: longitudes
//! are spaced linearly, latitudes are spaced uniformly in projected
//! Mercator y and mapped back to degrees. Row 0 is the southern edge.

use crate::config::RegionBounds;
use crate::errors::{IsoLatError, Result};
use ndarray::Array2;
use std::f64::consts::PI;

/// Spherical Mercator forward transform: latitude in degrees to
/// dimensionless projected y.
pub fn mercator_y(lat_deg: f64) -> f64 {
    let phi = lat_deg * PI / 180.0;
    (PI / 4.0 + phi / 2.0).tan().ln()
}

/// Spherical Mercator inverse transform: projected y back to degrees.
pub fn inverse_mercator_y(y: f64) -> f64 {
    (2.0 * y.exp().atan() - PI / 2.0) * 180.0 / PI
}

/// Two 2-D coordinate arrays of shape (ny, nx), one longitude and one
/// latitude value per raster cell. Derived once, reused for every
/// contour computation.
#[derive(Debug, Clone)]
pub struct CoordinateGrid {
    pub lons: Array2<f64>,
    pub lats: Array2<f64>,
}

impl CoordinateGrid {
    /// Build an (ny, nx) grid spanning `region`, equally spaced in
    /// projection coordinates.
    pub fn make(region: &RegionBounds, nx: usize, ny: usize) -> Result<Self> {
        if nx < 2 || ny < 2 {
            return Err(IsoLatError::ConfigError(format!(
                "coordinate grid needs at least 2x2 points, got {}x{}",
                nx, ny
            )));
        }

        let y_min = mercator_y(region.lat_min);
        let y_max = mercator_y(region.lat_max);

        let mut lons = Array2::zeros((ny, nx));
        let mut lats = Array2::zeros((ny, nx));

        for j in 0..ny {
            let fy = j as f64 / (ny - 1) as f64;
            let lat = inverse_mercator_y(y_min + fy * (y_max - y_min));
            for i in 0..nx {
                let fx = i as f64 / (nx - 1) as f64;
                lons[[j, i]] = region.lon_min + fx * (region.lon_max - region.lon_min);
                lats[[j, i]] = lat;
            }
        }

        Ok(Self { lons, lats })
    }

    pub fn nx(&self) -> usize {
        self.lons.shape()[1]
    }

    pub fn ny(&self) -> usize {
        self.lons.shape()[0]
    }
}
