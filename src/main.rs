use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{CommandFactory, Parser};

use igv_hierarchy::config::{Config, DEFAULT_OUTPUT_DIR};
use igv_hierarchy::pipeline;

/// Exit code when the input path is not a JSON file
const EXIT_USAGE: i32 = 2;

#[derive(Parser, Debug)]
#[clap(
    name = "igv-hierarchy",
    about = "Build a hierarchical cluster tree for a node-link JSON graph"
)]
struct Cli {
    /// Input filepath (node-link JSON)
    filepath: PathBuf,

    /// Resolution parameter for hierarchical clustering
    #[clap(short, long, default_value = "1.0")]
    resolution: f64,

    /// Output directory for the generated graph file
    #[clap(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Skip the check that every level nests inside the next
    #[clap(long)]
    skip_nesting_check: bool,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}

fn main() -> Result<()> {
    // No arguments at all: show usage and exit cleanly
    if std::env::args_os().len() == 1 {
        Cli::command().print_help()?;
        return Ok(());
    }

    let args = Cli::parse();

    if !has_json_extension(&args.filepath) {
        Cli::command().print_help()?;
        std::process::exit(EXIT_USAGE);
    }

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let config = Config::new(
        args.resolution,
        args.output_dir,
        args.threads,
        !args.skip_nesting_check,
    );

    // Set number of threads
    let num_threads = config.effective_threads();
    log::debug!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let output = pipeline::run(&args.filepath, &config)?;

    log::info!("Done. Cluster tree saved to {}", output.display());

    Ok(())
}
