//! Figure rendering.
//!
//! Three chart types back the pipeline: a histogram of monthly mean SST,
//! contour charts of time-averaged fields, and the final latitude-vs-year
//! trend. All figures are rendered to PNG with plotters.

use crate::contour::{contour_levels, trace_contour};
use crate::errors::{IsoLatError, Result};
use crate::grid::CoordinateGrid;
use crate::isotherm::IsothermSeries;
use ndarray::Array2;
use plotters::prelude::*;
use std::path::Path;

const FIGURE_SIZE: (u32, u32) = (900, 650);
const HISTOGRAM_BINS: usize = 256;

/// Histogram of the per-month spatial-mean SST values.
pub fn sst_histogram(series: &[f32], path: &Path) -> Result<()> {
    let finite: Vec<f64> = series
        .iter()
        .filter(|v| v.is_finite())
        .map(|&v| v as f64)
        .collect();
    if finite.is_empty() {
        return Err(IsoLatError::PlotError(
            "no finite SST values to histogram".to_string(),
        ));
    }

    let min = finite.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = finite.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = if max > min { max - min } else { 1.0 };
    let bin_width = span / HISTOGRAM_BINS as f64;

    let mut counts = vec![0u32; HISTOGRAM_BINS];
    for &value in &finite {
        let bin = (((value - min) / bin_width) as usize).min(HISTOGRAM_BINS - 1);
        counts[bin] += 1;
    }
    let max_count = counts.iter().copied().max().unwrap_or(1).max(1);

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Monthly mean SST", ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(min..(min + span), 0u32..(max_count + 1))?;

    chart
        .configure_mesh()
        .x_desc("SST (degC)")
        .y_desc("count")
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(bin, &count)| {
        let x0 = min + bin as f64 * bin_width;
        let x1 = x0 + bin_width;
        Rectangle::new([(x0, 0u32), (x1, count)], BLACK.filled())
    }))?;

    root.present()?;
    Ok(())
}

/// Contour chart of a time-averaged field at 1 degC intervals.
pub fn contour_figure(
    field: &Array2<f32>,
    grid: &CoordinateGrid,
    title: &str,
    path: &Path,
) -> Result<()> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &value in field.iter() {
        if value.is_finite() {
            min = min.min(value as f64);
            max = max.max(value as f64);
        }
    }
    if !min.is_finite() {
        return Err(IsoLatError::PlotError(format!(
            "field for '{}' holds no finite values",
            title
        )));
    }

    let lon_min = grid.lons[[0, 0]];
    let lon_max = grid.lons[[0, grid.nx() - 1]];
    let lat_min = grid.lats[[0, 0]];
    let lat_max = grid.lats[[grid.ny() - 1, 0]];

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(lon_min..lon_max, lat_min..lat_max)?;

    chart.configure_mesh().x_desc("Lon").y_desc("Lat").draw()?;

    for level in contour_levels(min, max, 1.0) {
        for contour in trace_contour(field, grid, level)? {
            let points: Vec<(f64, f64)> =
                contour.points.iter().map(|p| (p.lon, p.lat)).collect();
            chart.draw_series(LineSeries::new(points, &BLACK))?;
        }
    }

    root.present()?;
    Ok(())
}

/// Latitude-vs-year trend of the isotherm series, sorted ascending by year.
///
/// Years without a traced contour leave gaps; a series with no finite
/// latitude at all still renders an empty chart, since contour-not-found is
/// not a failure of the run.
pub fn trend_figure(series: &IsothermSeries, path: &Path) -> Result<()> {
    let records = series.sorted_records();
    if records.is_empty() {
        return Err(IsoLatError::PlotError(
            "isotherm series holds no records".to_string(),
        ));
    }
    let finite: Vec<(i32, f64)> = records
        .iter()
        .filter(|r| r.latitude.is_finite())
        .map(|r| (r.year, r.latitude))
        .collect();

    let x_min = records[0].year;
    let x_max = records[records.len() - 1].year;
    let y_min = finite.iter().map(|&(_, l)| l).fold(f64::INFINITY, f64::min);
    let y_max = finite
        .iter()
        .map(|&(_, l)| l)
        .fold(f64::NEG_INFINITY, f64::max);
    let (y_min, y_max) = if y_min.is_finite() {
        (y_min, y_max)
    } else {
        (0.0, 1.0)
    };
    let pad = ((y_max - y_min) * 0.1).max(0.05);

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Mean latitude of {}C isotherm", series.level),
            ("sans-serif", 22),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..(x_max + 1), (y_min - pad)..(y_max + pad))?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Mean Lat")
        .draw()?;

    chart.draw_series(LineSeries::new(finite.iter().copied(), &RED))?;
    chart.draw_series(
        finite
            .iter()
            .map(|&(year, lat)| Circle::new((year, lat), 3, RED.filled())),
    )?;

    root.present()?;
    Ok(())
}
