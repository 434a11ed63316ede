//! Path Tiles CLI
//!
//! Usage:
//!   path-tiles count
//!   path-tiles list [--sample N] [--seed S]
//!   path-tiles export [--output DIR] [--sample N | --all] [--seed S]
//!                     [--params FILE.json] [--engine earcut|delaunay] [-v]

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use config::constants::{DEFAULT_SAMPLE_SIZE, ENDPOINT_COUNT};
use path_tiles::{carve_batch, enumerate_matchings, EngineConfig, Matching, TileParams};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tile_mesh::export::write_binary_stl;
use tile_mesh::Triangulator;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Generate carved Path Tiles as binary STL files
#[derive(Parser, Debug)]
#[command(name = "path-tiles", version, about, long_about = None)]
struct Cli {
    /// Increase log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the number of perfect matchings on the tile endpoints
    Count,

    /// Print matchings, one per line
    List {
        /// Print a random sample of this many matchings instead of all
        #[arg(long)]
        sample: Option<usize>,

        /// Seed for the random sample
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Carve tiles and write one STL file per tile
    Export {
        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "output")]
        output: PathBuf,

        /// Number of randomly chosen matchings to carve
        #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
        sample: usize,

        /// Carve every matching instead of a sample
        #[arg(long, conflicts_with = "sample")]
        all: bool,

        /// Seed for the random sample
        #[arg(long)]
        seed: Option<u64>,

        /// JSON file overriding tile parameters
        #[arg(long, value_name = "FILE")]
        params: Option<PathBuf>,

        /// Preferred triangulation backend (earcut or delaunay)
        #[arg(long, value_name = "ENGINE")]
        engine: Option<Triangulator>,
    },
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let matchings = enumerate_matchings(ENDPOINT_COUNT as i64)?;

    match cli.command {
        Commands::Count => {
            println!(
                "Total perfect matchings on {ENDPOINT_COUNT} endpoints: {}",
                matchings.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::List { sample, seed } => {
            for (idx, matching) in select(&matchings, sample, seed).iter().enumerate() {
                println!("{:2}: {matching}", idx + 1);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Export {
            output,
            sample,
            all,
            seed,
            params,
            engine,
        } => {
            let params = match params {
                Some(path) => TileParams::from_json_file(&path)?,
                None => TileParams::default(),
            };
            let engines = match engine {
                Some(preferred) => EngineConfig::probe_preferring(preferred)?,
                None => EngineConfig::probe()?,
            };
            let selected = select(&matchings, (!all).then_some(sample), seed);
            cmd_export(&selected, &params, &engines, &output)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Picks `sample` matchings without replacement, or all of them.
fn select(matchings: &[Matching], sample: Option<usize>, seed: Option<u64>) -> Vec<Matching> {
    let Some(count) = sample else {
        return matchings.to_vec();
    };
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    matchings.choose_multiple(&mut rng, count).cloned().collect()
}

fn cmd_export(
    matchings: &[Matching],
    params: &TileParams,
    engines: &EngineConfig,
    output: &Path,
) -> Result<ExitCode, Box<dyn Error>> {
    std::fs::create_dir_all(output)?;
    info!(
        tiles = matchings.len(),
        output = %output.display(),
        engines = ?engines,
        "exporting tiles"
    );

    let mut failed = 0usize;
    for outcome in carve_batch(matchings, params, engines) {
        let path = output.join(outcome.file_name());
        match &outcome.result {
            Ok(solid) => match write_binary_stl(&solid.mesh, &path) {
                Ok(()) => println!("→ Exported {}", path.display()),
                Err(err) => {
                    failed += 1;
                    eprintln!("✗ {} {}: {err}", outcome.file_name(), outcome.matching);
                }
            },
            Err(err) => {
                failed += 1;
                eprintln!(
                    "✗ {} {}: {}: {err}",
                    outcome.file_name(),
                    outcome.matching,
                    err.kind()
                );
            }
        }
    }

    if failed > 0 {
        eprintln!("{failed} of {} tiles failed", matchings.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
