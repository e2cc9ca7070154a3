//! Per-year isotherm extraction and the resulting latitude series.
//!
//! For each full calendar year the 12 monthly slices are averaged, the
//! configured isotherm is traced, and the mean latitude of the first traced
//! path is recorded. Years where the isotherm never crosses the region
//! record NaN; no distinction is made between "too warm everywhere" and
//! "too cold everywhere".

use crate::config::AnalysisConfig;
use crate::contour::{trace_contour, ContourPath};
use crate::dataset::SstDataset;
use crate::errors::Result;
use crate::grid::CoordinateGrid;
use crate::statistics::{flip_lat, time_mean};
use ndarray::Array2;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// One processed year and its representative isotherm latitude
/// (NaN when no contour was found).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsothermRecord {
    pub year: i32,
    pub latitude: f64,
}

/// The latitude-vs-year series for one isotherm level.
#[derive(Debug, Clone)]
pub struct IsothermSeries {
    pub level: f64,
    pub records: Vec<IsothermRecord>,
}

impl IsothermSeries {
    pub fn new(level: f64) -> Self {
        Self {
            level,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records sorted ascending by year, as the trend plot draws them.
    pub fn sorted_records(&self) -> Vec<IsothermRecord> {
        let mut sorted = self.records.clone();
        sorted.sort_by_key(|r| r.year);
        sorted
    }

    /// Write the series as a two-column CSV table, overwriting `path`.
    ///
    /// Rows follow the record's accumulation order unless `sorted` is set;
    /// both currently coincide because the year loop runs ascending. NaN
    /// latitudes are written as an empty field.
    pub fn write_csv(&self, path: &Path, column: &str, sorted: bool) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "year,{}", column)?;
        let rows = if sorted {
            self.sorted_records()
        } else {
            self.records.clone()
        };
        for record in rows {
            if record.latitude.is_nan() {
                writeln!(writer, "{},", record.year)?;
            } else {
                writeln!(writer, "{},{}", record.year, record.latitude)?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}

/// Reduce traced paths to one latitude: the arithmetic mean of the first
/// path's latitudes, NaN when nothing was traced.
///
/// When the isotherm splits into disjoint lobes only the first is used;
/// preserved as-is to keep historical outputs reproducible.
pub fn representative_latitude(paths: &[ContourPath]) -> f64 {
    match paths.first() {
        Some(path) => path.mean_latitude(),
        None => f64::NAN,
    }
}

/// Mean SST field for the `index`-th processed year, flipped to match the
/// south-to-north coordinate grid.
pub fn yearly_mean_field(dataset: &SstDataset, index: usize) -> Result<Array2<f32>> {
    let window = dataset.year_window(index)?;
    Ok(flip_lat(time_mean(&dataset.sst, window)?))
}

/// Run the per-year loop over `[start_year, end_year)`.
///
/// The final calendar year of the dataset is never processed; the loop only
/// covers full years strictly before it, so a trailing partial year is
/// silently dropped. When `config.yearly_figures` is set, one contour
/// figure per processed year is rendered into the output directory.
pub fn extract_series(
    dataset: &SstDataset,
    grid: &CoordinateGrid,
    config: &AnalysisConfig,
) -> Result<IsothermSeries> {
    let mut series = IsothermSeries::new(config.level);

    let start = dataset.start_year();
    let end = dataset.end_year();

    for (index, year) in (start..end).enumerate() {
        let field = yearly_mean_field(dataset, index)?;

        if config.yearly_figures {
            let figure = config.output_dir.join(format!("{}.png", year));
            crate::plots::contour_figure(&field, grid, &year.to_string(), &figure)?;
        }

        let paths = trace_contour(&field, grid, config.level)?;
        series.records.push(IsothermRecord {
            year,
            latitude: representative_latitude(&paths),
        });
    }

    Ok(series)
}
