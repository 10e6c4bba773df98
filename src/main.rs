//! Command line entry point: scores every chart in a directory.

use clap::Parser;
use mapalyzr::AnalysisConfig;
use mapalyzr::batch;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "mapalyzr")]
#[command(about = "Difficulty analysis for two-lane rhythm game charts")]
#[command(version)]
struct Args {
    /// Directory containing Koreography chart files
    chart_dir: PathBuf,

    /// TOML file overriding the default tuning
    config: Option<PathBuf>,

    /// Where the summary and analysis dumps are written
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Print the effective configuration as TOML before running
    #[arg(long)]
    print_config: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match AnalysisConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("MAIN: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => AnalysisConfig::default(),
    };

    if args.print_config {
        match config.to_toml() {
            Ok(text) => println!("{}", text),
            Err(e) => log::error!("MAIN: Failed to serialize config: {}", e),
        }
    }

    let workers = args.workers.unwrap_or_else(batch::default_workers);
    log::info!(
        "MAIN: Analyzing {:?} with {} workers",
        args.chart_dir,
        workers
    );

    let results = match batch::analyze_directory(&args.chart_dir, Arc::new(config), workers) {
        Ok(results) => results,
        Err(e) => {
            log::error!("MAIN: Cannot read {:?}: {}", args.chart_dir, e);
            return ExitCode::FAILURE;
        }
    };

    for result in &results {
        if let Err(e) = &result.outcome {
            log::error!("MAIN: Skipping {}: {}", result.name, e);
        }
    }

    if let Err(e) = batch::write_outputs(&results, &args.out_dir) {
        log::error!("MAIN: Failed to write results to {:?}: {}", args.out_dir, e);
        return ExitCode::FAILURE;
    }

    let scored = results.iter().filter(|r| r.outcome.is_ok()).count();
    log::info!("MAIN: {} of {} charts scored", scored, results.len());
    ExitCode::SUCCESS
}
