//! Integration tests for the isotherm extraction pipeline.
//!
//! Each test builds a synthetic monthly SST NetCDF file with known
//! properties and checks the extracted series against them.

use chrono::NaiveDate;
use iso_lat::{
    config::{AnalysisConfig, RegionBounds},
    dataset::SstDataset,
    errors::Result,
    grid::{inverse_mercator_y, mercator_y, CoordinateGrid},
    isotherm::{extract_series, yearly_mean_field},
};
use ndarray::{Array1, Array3};
use netcdf::create;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

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

fn write_sst_file(path: &Path, data: &Array3<f32>, year0: i32) -> Result<()> {
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
    sst_var.put(data.view(), ..)?;

    Ok(())
}

fn test_config(input: &Path, output_dir: &Path) -> AnalysisConfig {
    AnalysisConfig {
        input: input.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        ..AnalysisConfig::default()
    }
}

#[test]
fn yearly_mean_fields_match_known_constants() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("two_years.nc");

    // Year 1900 is uniformly 10 degC, year 1901 uniformly 20 degC
    let mut data = Array3::zeros((24, 3, 4));
    for k in 0..24 {
        let value = if k < 12 { 10.0 } else { 20.0 };
        data.slice_mut(ndarray::s![k, .., ..]).fill(value);
    }
    write_sst_file(&file_path, &data, 1900)?;

    let dataset = SstDataset::open(&file_path, "sst")?;
    assert_eq!(dataset.start_year(), 1900);
    assert_eq!(dataset.end_year(), 1901);

    let first = yearly_mean_field(&dataset, 0)?;
    let second = yearly_mean_field(&dataset, 1)?;
    assert!(first.iter().all(|&v| v == 10.0));
    assert!(second.iter().all(|&v| v == 20.0));

    Ok(())
}

#[test]
fn start_and_end_years_come_from_the_time_axis() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("span.nc");

    // Jan-1900 through Dec-1903
    let data = Array3::from_elem((48, 2, 2), 15.0f32);
    write_sst_file(&file_path, &data, 1900)?;

    let dataset = SstDataset::open(&file_path, "sst")?;
    assert_eq!(dataset.start_year(), 1900);
    assert_eq!(dataset.end_year(), 1903);

    Ok(())
}

#[test]
fn contour_free_years_record_nan() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("cold.nc");

    // Everywhere well below the 13 degC threshold
    let data = Array3::from_elem((24, 4, 5), 5.0f32);
    write_sst_file(&file_path, &data, 1900)?;

    let dataset = SstDataset::open(&file_path, "sst")?;
    let config = test_config(&file_path, temp_dir.path());
    let grid = CoordinateGrid::make(&config.region, dataset.n_lon(), dataset.n_lat())?;

    let series = extract_series(&dataset, &grid, &config)?;
    assert_eq!(series.len(), 1);
    assert_eq!(series.records[0].year, 1900);
    assert!(series.records[0].latitude.is_nan());

    Ok(())
}

#[test]
fn horizontal_isotherm_latitude_is_exact() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("zonal.nc");

    // SST depends only on the latitude row: 14 degC on the northern row,
    // 13 in the middle, 12 on the southern row (files store north first).
    let mut data = Array3::zeros((24, 3, 6));
    for k in 0..24 {
        for j in 0..3 {
            for i in 0..6 {
                data[[k, j, i]] = 14.0 - j as f32;
            }
        }
    }
    write_sst_file(&file_path, &data, 1900)?;

    // Pick latitude bounds whose Mercator midpoint sits exactly at 50 N,
    // so the middle grid row carries latitude 50.0.
    let lat_min = 48.0;
    let lat_max = inverse_mercator_y(2.0 * mercator_y(50.0) - mercator_y(lat_min));
    let region = RegionBounds::new(-12.5, lat_min, -4.5, lat_max)?;

    let dataset = SstDataset::open(&file_path, "sst")?;
    let grid = CoordinateGrid::make(&region, dataset.n_lon(), dataset.n_lat())?;

    let mut config = test_config(&file_path, temp_dir.path());
    config.region = region;

    let series = extract_series(&dataset, &grid, &config)?;
    assert_eq!(series.len(), 1);

    // The traced points all lie on the middle row, so the mean equals that
    // row's latitude
    let recorded = series.records[0].latitude;
    assert!((recorded - grid.lats[[1, 0]]).abs() < 1e-12);
    assert!((recorded - 50.0).abs() < 1e-9);

    Ok(())
}

#[test]
fn cold_dataset_still_writes_the_table() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("all_cold.nc");

    // Uniformly below the 13 degC level: every year records NaN, yet the
    // full pipeline must still finish and export the table.
    let data = Array3::from_elem((36, 4, 5), 5.0f32);
    write_sst_file(&file_path, &data, 1900)?;

    let out_dir = temp_dir.path().join("out");
    let config = test_config(&file_path, &out_dir);
    let series = iso_lat::analysis::run(&config)?;

    assert_eq!(series.len(), 2);
    assert!(series.records.iter().all(|r| r.latitude.is_nan()));

    let contents = fs::read_to_string(out_dir.join("iso13.csv"))?;
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "year,iso13");
    assert_eq!(lines[1], "1900,");
    assert_eq!(lines[2], "1901,");

    // The trend figure renders as an empty chart rather than failing
    assert!(out_dir.join("meanlat13C.png").exists());
    assert!(out_dir.join("hist-meansst.png").exists());

    Ok(())
}

#[test]
fn csv_has_one_row_per_processed_year() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("four_years.nc");

    // 48 months -> years 1900..1903, of which only 1900..1902 are processed
    let data = Array3::from_elem((48, 3, 4), 14.0f32);
    write_sst_file(&file_path, &data, 1900)?;

    let dataset = SstDataset::open(&file_path, "sst")?;
    let config = test_config(&file_path, temp_dir.path());
    let grid = CoordinateGrid::make(&config.region, dataset.n_lon(), dataset.n_lat())?;

    let series = extract_series(&dataset, &grid, &config)?;
    let expected_years = (dataset.end_year() - dataset.start_year()) as usize;
    assert_eq!(series.len(), expected_years);
    assert_eq!(series.len(), 3);

    let csv_path = temp_dir.path().join("iso13.csv");
    series.write_csv(&csv_path, &config.series_name(), config.sort_csv)?;

    let contents = fs::read_to_string(&csv_path)?;
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), expected_years + 1);
    assert_eq!(lines[0], "year,iso13");
    assert!(lines[1].starts_with("1900,"));
    assert!(lines[3].starts_with("1902,"));

    Ok(())
}

#[test]
fn csv_export_is_idempotent() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("repeat.nc");

    let mut data = Array3::zeros((24, 4, 5));
    for k in 0..24 {
        for j in 0..4 {
            for i in 0..5 {
                data[[k, j, i]] = 15.0 - j as f32 + 0.1 * i as f32;
            }
        }
    }
    write_sst_file(&file_path, &data, 1900)?;

    let config = test_config(&file_path, temp_dir.path());

    let mut outputs = Vec::new();
    for run in 0..2 {
        let dataset = SstDataset::open(&file_path, "sst")?;
        let grid = CoordinateGrid::make(&config.region, dataset.n_lon(), dataset.n_lat())?;
        let series = extract_series(&dataset, &grid, &config)?;

        let csv_path = temp_dir.path().join(format!("run{}.csv", run));
        series.write_csv(&csv_path, &config.series_name(), config.sort_csv)?;
        outputs.push(fs::read(&csv_path)?);
    }

    assert_eq!(outputs[0], outputs[1]);

    Ok(())
}

#[test]
fn sorted_export_orders_rows_by_year() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");

    let mut series = iso_lat::isotherm::IsothermSeries::new(13.0);
    series.records.push(iso_lat::isotherm::IsothermRecord {
        year: 1902,
        latitude: 50.2,
    });
    series.records.push(iso_lat::isotherm::IsothermRecord {
        year: 1900,
        latitude: 50.0,
    });

    let unsorted_path = temp_dir.path().join("unsorted.csv");
    series.write_csv(&unsorted_path, "iso13", false)?;
    let unsorted = fs::read_to_string(&unsorted_path)?;
    assert!(unsorted.lines().nth(1).expect("row").starts_with("1902,"));

    let sorted_path = temp_dir.path().join("sorted.csv");
    series.write_csv(&sorted_path, "iso13", true)?;
    let sorted = fs::read_to_string(&sorted_path)?;
    assert!(sorted.lines().nth(1).expect("row").starts_with("1900,"));

    Ok(())
}
