//! Field reductions over the SST grid
//!
//! This module provides the time-averaging used by the pipeline: whole-period
//! and per-year mean fields, and the per-month spatial mean series behind the
//! histogram. All reductions skip NaN (masked) entries and accumulate in f64
//! to avoid precision loss, parallelized with Rayon.

use crate::errors::{IsoLatError, Result};
use ndarray::{s, Array2, Array3, Axis};
use rayon::prelude::*;
use std::ops::Range;

/// Mean over a window of the time axis, producing one (lat, lon) field.
///
/// NaN and infinite samples are skipped per cell; a cell with no finite
/// sample in the window stays NaN.
pub fn time_mean(data: &Array3<f32>, months: Range<usize>) -> Result<Array2<f32>> {
    if months.is_empty() {
        return Err(IsoLatError::StatisticsError(
            "empty time window".to_string(),
        ));
    }
    if months.end > data.shape()[0] {
        return Err(IsoLatError::StatisticsError(format!(
            "time window {}..{} exceeds {} time steps",
            months.start,
            months.end,
            data.shape()[0]
        )));
    }

    let (ny, nx) = (data.shape()[1], data.shape()[2]);
    let window = data.slice(s![months, .., ..]);
    let n_steps = window.shape()[0];

    let result: Vec<f32> = (0..ny * nx)
        .into_par_iter()
        .map(|flat| {
            let j = flat / nx;
            let i = flat % nx;

            let mut sum = 0.0f64;
            let mut count = 0usize;
            for t in 0..n_steps {
                let value = window[[t, j, i]] as f64;
                if value.is_finite() {
                    sum += value;
                    count += 1;
                }
            }

            if count > 0 {
                (sum / count as f64) as f32
            } else {
                f32::NAN
            }
        })
        .collect();

    Ok(Array2::from_shape_vec((ny, nx), result)?)
}

/// Mean field over the entire time axis.
pub fn time_mean_all(data: &Array3<f32>) -> Result<Array2<f32>> {
    time_mean(data, 0..data.shape()[0])
}

/// Spatial mean of each monthly slice, one value per time step.
/// Months whose slice holds no finite value yield NaN.
pub fn spatial_mean_series(data: &Array3<f32>) -> Vec<f32> {
    (0..data.shape()[0])
        .into_par_iter()
        .map(|t| {
            let slice = data.slice(s![t, .., ..]);
            let mut sum = 0.0f64;
            let mut count = 0usize;
            for &value in slice.iter() {
                if value.is_finite() {
                    sum += value as f64;
                    count += 1;
                }
            }
            if count > 0 {
                (sum / count as f64) as f32
            } else {
                f32::NAN
            }
        })
        .collect()
}

/// Reverse the latitude axis of a field.
///
/// Reanalysis rasters store the northernmost row first while the coordinate
/// grid runs south to north, so every field is flipped before it meets the
/// grid.
pub fn flip_lat(field: Array2<f32>) -> Array2<f32> {
    let mut flipped = field;
    flipped.invert_axis(Axis(0));
    flipped
}
