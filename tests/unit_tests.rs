//! Unit tests for IsoLat modules backed by real NetCDF files.
//!
//! These tests create small NetCDF datasets on disk and exercise loading,
//! masking, time decoding and the statistical reductions against them.

use chrono::{Datelike, NaiveDate};
use iso_lat::{
    dataset::SstDataset,
    errors::{IsoLatError, Result},
    statistics::{spatial_mean_series, time_mean_all},
};
use ndarray::{Array1, Array3};
use netcdf::create;
use std::path::Path;
use tempfile::tempdir;

/// Days since 1900-01-01 for the 15th of `n` consecutive months from Jan `year0`.
fn monthly_time_values(year0: i32, n: usize) -> Vec<f64> {
    let epoch = NaiveDate::from_ymd_opt(1900, 1, 1).expect("valid epoch");
    (0..n)
        .map(|k| {
            let year = year0 + (k / 12) as i32;
            let month = (k % 12) as u32 + 1;
            let date = NaiveDate::from_ymd_opt(year, month, 15).expect("valid date");
            (date - epoch).num_days() as f64
        })
        .collect()
}

/// Write a (time, lat, lon) SST file with the given data.
fn write_sst_file(
    path: &Path,
    data: &Array3<f32>,
    year0: i32,
    extra_attrs: &[(&str, f32)],
) -> Result<()> {
    let (n_time, n_lat, n_lon) = data.dim();
    let mut file = create(path)?;

    file.add_dimension("time", n_time)?;
    file.add_dimension("lat", n_lat)?;
    file.add_dimension("lon", n_lon)?;

    let mut time_var = file.add_variable::<f64>("time", &["time"])?;
    time_var.put_attribute("units", "days since 1900-01-01 00:00:00")?;
    time_var.put(
        Array1::from(monthly_time_values(year0, n_time)).view(),
        ..,
    )?;

    let mut sst_var = file.add_variable::<f32>("sst", &["time", "lat", "lon"])?;
    sst_var.put_attribute("units", "degC")?;
    for &(name, value) in extra_attrs {
        sst_var.put_attribute(name, value)?;
    }
    sst_var.put(data.view(), ..)?;

    Ok(())
}

#[test]
fn test_error_types() {
    let netcdf_err = IsoLatError::NetCDFError(netcdf::Error::NotFound("test".to_string()));
    assert!(format!("{}", netcdf_err).contains("NetCDF error"));

    let generic_err = IsoLatError::Generic("Test error".to_string());
    assert_eq!(format!("{}", generic_err), "Test error");

    let var_err = IsoLatError::VariableNotFound {
        var: "sst".to_string(),
    };
    assert!(format!("{}", var_err).contains("Variable 'sst' not found"));

    let dim_err = IsoLatError::DimensionMismatch {
        var: "sst".to_string(),
        expected: 3,
        found: 2,
    };
    assert!(format!("{}", dim_err).contains("has 2 dimensions, expected 3"));

    let time_err = IsoLatError::TimeAxisError("bad units".to_string());
    assert!(format!("{}", time_err).contains("Time axis error: bad units"));

    let contour_err = IsoLatError::ContourError("shape mismatch".to_string());
    assert!(format!("{}", contour_err).contains("Contour tracing error: shape mismatch"));
}

#[test]
fn test_parallel_config() {
    let default_config = iso_lat::parallel::ParallelConfig::new(None);
    assert!(default_config.num_threads.is_none());

    let config_4 = iso_lat::parallel::ParallelConfig::with_threads(4);
    assert_eq!(config_4.num_threads, Some(4));

    let all_cores = iso_lat::parallel::ParallelConfig::all_cores();
    assert!(all_cores.num_threads.expect("cores detected") > 0);

    assert!(default_config.current_threads() > 0);
}

#[test]
fn test_dataset_loading_and_time_decoding() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("basic.nc");

    let data = Array3::from_elem((24, 3, 4), 10.0f32);
    write_sst_file(&file_path, &data, 1900, &[])?;

    let dataset = SstDataset::open(&file_path, "sst")?;
    assert_eq!(dataset.n_months(), 24);
    assert_eq!(dataset.n_lat(), 3);
    assert_eq!(dataset.n_lon(), 4);
    assert_eq!(dataset.start_year(), 1900);
    assert_eq!(dataset.end_year(), 1901);
    assert_eq!(dataset.dates[0].date().month(), 1);
    assert_eq!(dataset.dates[23].date().month(), 12);
    assert_eq!(dataset.sst[[0, 0, 0]], 10.0);

    Ok(())
}

#[test]
fn test_fill_value_masked_to_nan() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("masked.nc");

    let mut data = Array3::from_elem((12, 2, 2), 8.0f32);
    data[[0, 1, 1]] = -999.0;
    write_sst_file(&file_path, &data, 1950, &[("_FillValue", -999.0)])?;

    let dataset = SstDataset::open(&file_path, "sst")?;
    assert!(dataset.sst[[0, 1, 1]].is_nan());
    assert_eq!(dataset.sst[[0, 0, 0]], 8.0);

    Ok(())
}

#[test]
fn test_packed_data_unscaled() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("packed.nc");

    let data = Array3::from_elem((12, 2, 2), 4.0f32);
    write_sst_file(
        &file_path,
        &data,
        1960,
        &[("scale_factor", 0.5), ("add_offset", 10.0)],
    )?;

    let dataset = SstDataset::open(&file_path, "sst")?;
    assert_eq!(dataset.sst[[0, 0, 0]], 12.0);

    Ok(())
}

#[test]
fn test_missing_variable_and_wrong_shape() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("shapes.nc");

    {
        let mut file = create(&file_path)?;
        file.add_dimension("x", 2)?;
        file.add_dimension("y", 3)?;
        let mut var = file.add_variable::<f32>("flat", &["x", "y"])?;
        var.put(ndarray::Array2::from_elem((2, 3), 0.0f32).view(), ..)?;
    }

    let result = SstDataset::open(&file_path, "sst");
    assert!(matches!(
        result,
        Err(IsoLatError::VariableNotFound { .. })
    ));

    let result = SstDataset::open(&file_path, "flat");
    assert!(matches!(
        result,
        Err(IsoLatError::DimensionMismatch {
            expected: 3,
            found: 2,
            ..
        })
    ));

    Ok(())
}

#[test]
fn test_year_window_bounds() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("windows.nc");

    let data = Array3::from_elem((24, 2, 2), 1.0f32);
    write_sst_file(&file_path, &data, 1900, &[])?;

    let dataset = SstDataset::open(&file_path, "sst")?;
    assert_eq!(dataset.year_window(0)?, 0..12);
    assert_eq!(dataset.year_window(1)?, 12..24);
    assert!(dataset.year_window(2).is_err());

    Ok(())
}

#[test]
fn test_reductions_on_loaded_data() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("reduce.nc");

    // Month k holds the constant value k
    let mut data = Array3::zeros((12, 2, 3));
    for k in 0..12 {
        data.slice_mut(ndarray::s![k, .., ..]).fill(k as f32);
    }
    write_sst_file(&file_path, &data, 1970, &[])?;

    let dataset = SstDataset::open(&file_path, "sst")?;

    let mean = time_mean_all(&dataset.sst)?;
    assert_eq!(mean[[0, 0]], 5.5);
    assert_eq!(mean[[1, 2]], 5.5);

    let series = spatial_mean_series(&dataset.sst);
    assert_eq!(series.len(), 12);
    assert_eq!(series[0], 0.0);
    assert_eq!(series[11], 11.0);

    Ok(())
}
