//! Creates a synthetic Celtic Sea SST NetCDF file for trying out IsoLat.
//!
//! The field carries a north-south temperature gradient plus a slow warming
//! trend, so the 13 degC isotherm exists in every year and drifts northward.

use chrono::NaiveDate;
use ndarray::{Array1, Array3};
use netcdf::create;
use std::path::Path;

const N_YEARS: usize = 20;
const N_LAT: usize = 9;
const N_LON: usize = 17;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_path = Path::new("sample_sst.nc");

    println!("🔨 Creating sample SST file: {}", output_path.display());

    if output_path.exists() {
        std::fs::remove_file(output_path)?
    }

    let mut file = create(output_path)?;

    file.add_attribute("title", "Synthetic Celtic Sea SST")?;
    file.add_attribute("institution", "IsoLat demo")?;

    let n_months = N_YEARS * 12;
    file.add_dimension("time", n_months)?;
    file.add_dimension("lat", N_LAT)?;
    file.add_dimension("lon", N_LON)?;

    {
        let mut time_var = file.add_variable::<f64>("time", &["time"])?;
        time_var.put_attribute("units", "days since 1900-01-01 00:00:00")?;
        time_var.put_attribute("long_name", "time")?;
        time_var.put_attribute("calendar", "standard")?;

        let epoch = NaiveDate::from_ymd_opt(1900, 1, 1).expect("valid epoch");
        let time_data: Vec<f64> = (0..n_months)
            .map(|k| {
                let year = 1900 + (k / 12) as i32;
                let month = (k % 12) as u32 + 1;
                let date = NaiveDate::from_ymd_opt(year, month, 15).expect("valid date");
                (date - epoch).num_days() as f64
            })
            .collect();
        time_var.put(Array1::from(time_data).view(), ..)?;
    }

    {
        let mut lat_var = file.add_variable::<f32>("lat", &["lat"])?;
        lat_var.put_attribute("units", "degrees_north")?;

        // North first, as reanalysis products store it
        let lat_data: Vec<f32> = (0..N_LAT).map(|j| 52.5 - j as f32 * 0.5).collect();
        lat_var.put(Array1::from(lat_data).view(), ..)?;
    }

    {
        let mut lon_var = file.add_variable::<f32>("lon", &["lon"])?;
        lon_var.put_attribute("units", "degrees_east")?;

        let lon_data: Vec<f32> = (0..N_LON).map(|i| -12.5 + i as f32 * 0.5).collect();
        lon_var.put(Array1::from(lon_data).view(), ..)?;
    }

    {
        let mut sst_var = file.add_variable::<f32>("sst", &["time", "lat", "lon"])?;
        sst_var.put_attribute("units", "degC")?;
        sst_var.put_attribute("long_name", "Sea Surface Temperature")?;
        sst_var.put_attribute("_FillValue", -999.0f32)?;

        let mut sst = Array3::<f32>::zeros((n_months, N_LAT, N_LON));
        for k in 0..n_months {
            let year_frac = (k / 12) as f32 / N_YEARS as f32;
            let season = ((k % 12) as f32 / 12.0 * std::f32::consts::TAU).sin();
            for j in 0..N_LAT {
                // Warmer in the south (row 0 is the northern edge)
                let gradient = 11.0 + j as f32 * 0.5;
                for i in 0..N_LON {
                    sst[[k, j, i]] = gradient + 1.5 * season + 0.8 * year_frac;
                }
            }
        }
        sst_var.put(sst.view(), ..)?;
    }

    println!("✅ Wrote {} months of synthetic SST", n_months);
    println!("   Try: iso_lat --file sample_sst.nc --output-dir figs --verbose");

    Ok(())
}
