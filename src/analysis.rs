//! The analysis pipeline.
//!
//! One linear procedure: load the dataset, derive the coordinate grid,
//! render the histogram and the multi-year mean contour, run the per-year
//! isotherm loop, then plot and export the latitude series. Every stage
//! blocks until complete; any failure aborts the run.

use crate::config::AnalysisConfig;
use crate::dataset::SstDataset;
use crate::errors::Result;
use crate::grid::CoordinateGrid;
use crate::isotherm::{extract_series, IsothermSeries};
use crate::metadata::print_metadata;
use crate::plots::{contour_figure, sst_histogram, trend_figure};
use crate::statistics::{flip_lat, spatial_mean_series, time_mean_all};
use std::fs;

/// Run the full pipeline described by `config` and return the extracted
/// isotherm series.
pub fn run(config: &AnalysisConfig) -> Result<IsothermSeries> {
    let file = netcdf::open(&config.input)?;
    println!("Successfully opened NetCDF file: {}", config.input.display());
    print_metadata(&file)?;

    let dataset = SstDataset::from_file(&file, &config.variable)?;
    println!(
        "🚀 Loaded '{}' with shape {} x {} x {}",
        dataset.variable,
        dataset.n_months(),
        dataset.n_lat(),
        dataset.n_lon()
    );
    println!("starting date = {}", dataset.dates[0]);
    println!("ending date = {}", dataset.dates[dataset.dates.len() - 1]);

    let start = dataset.start_year();
    let end = dataset.end_year();

    let grid = CoordinateGrid::make(&config.region, dataset.n_lon(), dataset.n_lat())?;

    fs::create_dir_all(&config.output_dir)?;

    let monthly_means = spatial_mean_series(&dataset.sst);
    sst_histogram(&monthly_means, &config.output_dir.join("hist-meansst.png"))?;

    println!("⚡ Computing {} - {} mean contour field", start, end);
    let mean_field = flip_lat(time_mean_all(&dataset.sst)?);
    contour_figure(
        &mean_field,
        &grid,
        &format!("{} - {}", start, end),
        &config.output_dir.join(format!("{}-{}.png", start, end)),
    )?;

    println!(
        "⚡ Tracing the {}C isotherm for {} years",
        config.level_label(),
        end - start
    );
    let series = extract_series(&dataset, &grid, config)?;

    trend_figure(
        &series,
        &config
            .output_dir
            .join(format!("meanlat{}C.png", config.level_label())),
    )?;

    let csv_path = config.output_dir.join(format!("{}.csv", config.series_name()));
    series.write_csv(&csv_path, &config.series_name(), config.sort_csv)?;
    println!("✅ Saved isotherm table to {}", csv_path.display());

    Ok(series)
}
