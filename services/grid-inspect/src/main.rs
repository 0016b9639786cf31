//! Grid file inspector.
//!
//! Opens a grid file, decomposes the mesh described in a YAML config and
//! loads the requested fields exactly as the given rank would, then prints
//! a JSON summary of what it got.

mod config;
mod inspect;

use anyhow::{bail, Result};
use clap::Parser;
use datafile::{DataFormat, MemoryFormat};
use grid_loader::GridFile;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::InspectConfig;
use inspect::{describe_partition, inspect, FieldRequest, GridSummary};

#[derive(Parser, Debug)]
#[command(name = "grid-inspect")]
#[command(about = "Show what one rank loads from a grid file")]
struct Args {
    /// Grid file (.json, or .nc with the netcdf feature)
    #[arg(short, long)]
    grid: PathBuf,

    /// Mesh configuration file
    #[arg(short, long, env = "GRID_INSPECT_CONFIG", default_value = "mesh.yaml")]
    config: PathBuf,

    /// Rank whose partition to load
    #[arg(short, long, default_value_t = 0)]
    rank: usize,

    /// Load every rank in parallel instead of one
    #[arg(long, conflicts_with = "rank")]
    all_ranks: bool,

    /// Fields to load as name[:2d|3d[:location]]; repeatable
    #[arg(short, long = "field")]
    fields: Vec<String>,

    /// Value for fields missing from the file
    #[arg(long, default_value_t = 0.0)]
    default: f64,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing on stderr so stdout stays a clean JSON document
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr);
    if args.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let config = InspectConfig::from_yaml_file(&args.config)?;
    let requests = args
        .fields
        .iter()
        .map(|text| FieldRequest::parse(text, args.default))
        .collect::<Result<Vec<_>>>()?;

    if args.all_ranks {
        // Each rank opens its own handle; file cursors are never shared
        let ranks = config.mesh.num_ranks();
        info!(ranks, threads = rayon::current_num_threads(), "Inspecting all ranks");
        let summaries = (0..ranks)
            .into_par_iter()
            .map(|rank| inspect_rank(&args.grid, &config, rank, &requests))
            .collect::<Result<Vec<_>>>()?;
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        let summary = inspect_rank(&args.grid, &config, args.rank, &requests)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

fn inspect_rank(
    path: &Path,
    config: &InspectConfig,
    rank: usize,
    requests: &[FieldRequest],
) -> Result<GridSummary> {
    let partition = config.mesh.partition(rank)?;
    info!(
        rank,
        ranks = config.mesh.num_ranks(),
        partition = %describe_partition(&partition),
        "Decomposed mesh"
    );

    let format = open_backend(path)?;
    let mut grid = GridFile::open_with_config(format, path, config.grid.clone())?;
    inspect(&mut grid, &partition, rank, requests)
}

/// Pick a file backend from the extension.
fn open_backend(path: &Path) -> Result<Box<dyn DataFormat>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "json" => Ok(Box::new(MemoryFormat::json())),
        #[cfg(feature = "netcdf")]
        "nc" | "nc4" | "cdf" => {
            datafile::silence_hdf5_errors();
            Ok(Box::new(datafile::NetCdfFormat::new()))
        }
        #[cfg(not(feature = "netcdf"))]
        "nc" | "nc4" | "cdf" => bail!(
            "{} is a NetCDF file; rebuild grid-inspect with --features netcdf",
            path.display()
        ),
        other => bail!("unsupported grid file extension '{}'", other),
    }
}
