//! Gridded SST dataset loading
//!
//! Reads a time x lat x lon variable from a NetCDF file into memory,
//! applies `_FillValue`/`missing_value` masking and packed-data scaling,
//! and decodes the CF time axis into calendar dates.

use crate::errors::{IsoLatError, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use ndarray::Array3;
use netcdf::{AttributeValue, File, Variable};
use std::ops::Range;
use std::path::Path;

/// An SST grid with its decoded time axis. Loaded once, never mutated.
#[derive(Debug)]
pub struct SstDataset {
    /// SST values indexed by (month, lat, lon); masked entries are NaN
    pub sst: Array3<f32>,
    /// One timestamp per month index
    pub dates: Vec<NaiveDateTime>,
    /// Name of the source variable
    pub variable: String,
}

impl SstDataset {
    /// Load `variable` from the NetCDF file at `path`.
    ///
    /// The variable must be 3-dimensional with time as the leading axis,
    /// and its time coordinate must carry CF `"<unit> since <epoch>"` units.
    pub fn open(path: &Path, variable: &str) -> Result<Self> {
        let file = netcdf::open(path)?;
        Self::from_file(&file, variable)
    }

    /// Load `variable` from an already-open NetCDF file.
    pub fn from_file(file: &File, variable: &str) -> Result<Self> {
        let var = file
            .variable(variable)
            .ok_or_else(|| IsoLatError::VariableNotFound {
                var: variable.to_string(),
            })?;

        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        if shape.len() != 3 {
            return Err(IsoLatError::DimensionMismatch {
                var: variable.to_string(),
                expected: 3,
                found: shape.len(),
            });
        }

        let raw = var.get_values::<f32, _>(..)?;
        let sst = Array3::from_shape_vec((shape[0], shape[1], shape[2]), raw)?;
        let sst = apply_mask_and_scaling(sst, &var)?;

        // Time coordinate shares the name of the leading dimension
        let time_name = var.dimensions()[0].name();
        let time_var = file
            .variable(&time_name)
            .ok_or_else(|| IsoLatError::VariableNotFound {
                var: time_name.clone(),
            })?;
        let time_values = time_var.get_values::<f64, _>(..)?;
        let units = string_attribute(&time_var, "units").ok_or_else(|| {
            IsoLatError::TimeAxisError(format!(
                "time variable '{}' has no units attribute",
                time_name
            ))
        })?;
        let dates = decode_times(&time_values, &units)?;

        if dates.is_empty() {
            return Err(IsoLatError::TimeAxisError(
                "time axis is empty".to_string(),
            ));
        }
        if dates.len() != sst.shape()[0] {
            return Err(IsoLatError::TimeAxisError(format!(
                "time axis has {} entries but variable '{}' has {} time steps",
                dates.len(),
                variable,
                sst.shape()[0]
            )));
        }

        Ok(Self {
            sst,
            dates,
            variable: variable.to_string(),
        })
    }

    pub fn n_months(&self) -> usize {
        self.sst.shape()[0]
    }

    pub fn n_lat(&self) -> usize {
        self.sst.shape()[1]
    }

    pub fn n_lon(&self) -> usize {
        self.sst.shape()[2]
    }

    /// Calendar year of the first timestamp.
    pub fn start_year(&self) -> i32 {
        self.dates[0].year()
    }

    /// Calendar year of the last timestamp.
    pub fn end_year(&self) -> i32 {
        self.dates[self.dates.len() - 1].year()
    }

    /// Month-index window for the `index`-th processed year, 12 months wide.
    ///
    /// Errors when the window runs past the time axis, i.e. the file does
    /// not hold 12 months for every year in `[start_year, end_year)`.
    pub fn year_window(&self, index: usize) -> Result<Range<usize>> {
        let start = index * 12;
        let end = start + 12;
        if end > self.n_months() {
            return Err(IsoLatError::TimeAxisError(format!(
                "year window {}..{} exceeds the {}-month time axis",
                start,
                end,
                self.n_months()
            )));
        }
        Ok(start..end)
    }
}

/// Mask fill values to NaN and unpack `scale_factor`/`add_offset` data.
fn apply_mask_and_scaling(mut data: Array3<f32>, var: &Variable) -> Result<Array3<f32>> {
    let fill = numeric_attribute(var, "_FillValue").or_else(|| numeric_attribute(var, "missing_value"));
    let scale = numeric_attribute(var, "scale_factor");
    let offset = numeric_attribute(var, "add_offset");

    if fill.is_none() && scale.is_none() && offset.is_none() {
        return Ok(data);
    }

    let scale = scale.unwrap_or(1.0);
    let offset = offset.unwrap_or(0.0);
    data.mapv_inplace(|x| {
        if let Some(fv) = fill {
            if x == fv {
                return f32::NAN;
            }
        }
        x * scale + offset
    });
    Ok(data)
}

fn numeric_attribute(var: &Variable, name: &str) -> Option<f32> {
    let attr = var.attribute(name)?;
    match attr.value().ok()? {
        AttributeValue::Float(v) => Some(v),
        AttributeValue::Double(v) => Some(v as f32),
        AttributeValue::Short(v) => Some(v as f32),
        AttributeValue::Int(v) => Some(v as f32),
        _ => None,
    }
}

fn string_attribute(var: &Variable, name: &str) -> Option<String> {
    let attr = var.attribute(name)?;
    match attr.value().ok()? {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

/// Decode CF-convention time values against units like
/// `"days since 1800-01-01 00:00:00"`.
///
/// Supported units: seconds, minutes, hours, days. Calendar attributes are
/// not consulted; the epoch is interpreted as a proleptic Gregorian date,
/// which matches the standard calendar of the SST reanalysis products this
/// tool targets.
pub fn decode_times(values: &[f64], units: &str) -> Result<Vec<NaiveDateTime>> {
    let mut parts = units.splitn(2, " since ");
    let unit = parts
        .next()
        .map(|u| u.trim().to_ascii_lowercase())
        .unwrap_or_default();
    let epoch_str = parts.next().ok_or_else(|| {
        IsoLatError::TimeAxisError(format!("time units '{}' lack a 'since' clause", units))
    })?;

    let seconds_per_unit = match unit.as_str() {
        "seconds" | "second" | "secs" | "sec" | "s" => 1.0,
        "minutes" | "minute" | "mins" | "min" => 60.0,
        "hours" | "hour" | "hrs" | "hr" | "h" => 3600.0,
        "days" | "day" | "d" => 86400.0,
        other => {
            return Err(IsoLatError::TimeAxisError(format!(
                "unsupported time unit '{}'",
                other
            )))
        }
    };

    let epoch = parse_epoch(epoch_str)?;

    values
        .iter()
        .map(|&v| {
            let millis = v * seconds_per_unit * 1000.0;
            if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
                return Err(IsoLatError::TimeAxisError(format!(
                    "time value {} out of range for units '{}'",
                    v, units
                )));
            }
            Ok(epoch + Duration::milliseconds(millis.round() as i64))
        })
        .collect()
}

/// Parse an epoch like `1800-1-1`, `1854-01-15 00:00:00` or
/// `1891-1-1 0:0:0.0`.
fn parse_epoch(s: &str) -> Result<NaiveDateTime> {
    let mut tokens = s.split_whitespace();
    let date_token = tokens
        .next()
        .ok_or_else(|| IsoLatError::TimeAxisError(format!("empty epoch in '{}'", s)))?;
    let date = NaiveDate::parse_from_str(date_token, "%Y-%m-%d").map_err(|e| {
        IsoLatError::TimeAxisError(format!("unparseable epoch date '{}': {}", date_token, e))
    })?;

    let time = match tokens.next() {
        Some(time_token) => parse_epoch_time(time_token)?,
        None => NaiveTime::MIN,
    };

    Ok(NaiveDateTime::new(date, time))
}

fn parse_epoch_time(token: &str) -> Result<NaiveTime> {
    let fields: Vec<&str> = token.split(':').collect();
    if fields.len() > 3 {
        return Err(IsoLatError::TimeAxisError(format!(
            "unparseable epoch time '{}'",
            token
        )));
    }
    let mut hms = [0u32; 3];
    for (i, field) in fields.iter().enumerate() {
        // Seconds may carry a fractional part, e.g. "0.0"
        let value: f64 = field.parse().map_err(|_| {
            IsoLatError::TimeAxisError(format!("unparseable epoch time '{}'", token))
        })?;
        hms[i] = value as u32;
    }
    NaiveTime::from_hms_opt(hms[0], hms[1], hms[2]).ok_or_else(|| {
        IsoLatError::TimeAxisError(format!("epoch time '{}' out of range", token))
    })
}
