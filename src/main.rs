//! Entry point for the IsoLat application.
//! Handles CLI parsing, thread pool setup, and dispatches the analysis pipeline.

use clap::Parser;
use iso_lat::analysis;
use iso_lat::cli::Args;
use iso_lat::metadata::list_variables_and_dimensions;
use iso_lat::parallel::ParallelConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args = Args::parse();

    println!(
        r#"
------------------------------------------------------------------
                _____           _           _
               |_   _|         | |         | |
                 | |  ___  ___ | |     __ _| |_
                 | | / __|/ _ \| |    / _` | __|
                _| |_\__ \ (_) | |___| (_| | |_
               |_____|___/\___/|_____/\__,_|\__|
                    SST isotherm latitude tracker
------------------------------------------------------------------
                        "#
    );

    ParallelConfig::new(args.threads).setup_global_pool()?;

    if args.list_vars {
        let file = netcdf::open(&args.file)?;
        list_variables_and_dimensions(&file)?;
        return Ok(());
    }

    let config = args.to_config();
    let series = analysis::run(&config)?;

    if args.verbose {
        println!("\n Yearly {}C isotherm latitudes", config.level_label());
        println!("================================");
        for record in &series.records {
            if record.latitude.is_nan() {
                println!("   {}: no contour", record.year);
            } else {
                println!("   {}: {:.4}", record.year, record.latitude);
            }
        }
    }

    println!(
        "✅ Processed {} years into {}",
        series.len(),
        config.output_dir.display()
    );

    Ok(())
}
