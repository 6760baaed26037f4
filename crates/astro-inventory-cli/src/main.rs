mod commands;
mod logging;
mod progress;

use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Context};
use astro_inventory_core::{
    filename, report, sanitize, AppConfig, ExtractorKind, ScanEngine, ScanOutcome, ScanResult,
};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use progress::CliReporter;
use tracing::{error, info, warn};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match astro_inventory_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    match args.command {
        Some(Commands::Scan { root, output }) => {
            if let Err(err) = run_scan(config, root, output) {
                error!("Error: {:#}", err);
                process::exit(1);
            }
        }
        Some(Commands::ParseFilename { name, session }) => {
            let meta = sanitize::sanitize(filename::parse(&name), &name, &session);
            println!("{:#?}", meta);
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

fn run_scan(
    config: AppConfig,
    root: Option<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let root = root
        .or_else(|| config.root_path.as_ref().map(PathBuf::from))
        .ok_or_else(|| anyhow!("no root folder given and `root_path` is not configured"))?;
    let output = output.unwrap_or_else(|| PathBuf::from(&config.output_path));

    let engine = ScanEngine::new(config).context("invalid configuration")?;

    let cancel = engine.cancel_flag();
    ctrlc::set_handler(move || {
        cancel.store(true, Ordering::SeqCst);
    })
    .context("failed to install Ctrl-C handler")?;

    let reporter = Arc::new(CliReporter::new());
    let worker = {
        let reporter = Arc::clone(&reporter);
        let root = root.clone();
        thread::spawn(move || engine.scan(&root, reporter.as_ref()))
    };

    let outcome = worker
        .join()
        .map_err(|_| anyhow!("scan worker panicked"))?;
    reporter.finish();

    match outcome? {
        ScanOutcome::Completed(result) => {
            let written = report::write_report(&result.records, &output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            print_summary(&result, written, &output);
        }
        ScanOutcome::NoData => {
            warn!("No data was found under {}", root.display());
        }
        ScanOutcome::Stopped => {
            warn!("Scan stopped. No report was written.");
        }
    }

    Ok(())
}

fn print_summary(result: &ScanResult, written: usize, output: &Path) {
    let reads = |kind: ExtractorKind| result.header_reads.get(&kind).copied().unwrap_or(0);

    println!();
    info!(
        "Walk: {}, Extract: {}",
        format!("{:.2}s", result.walk_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.extract_duration.as_secs_f64()).green(),
    );
    info!(
        "{} candidates, {} excluded",
        format!("{}", result.candidates_found).cyan(),
        format!("{}", result.excluded).yellow(),
    );
    info!(
        "{} files indexed in {} seconds ({} fits, {} exif files opened)",
        format!("{}", written).green(),
        format!("{:.2}", result.duration().as_secs_f64()).green(),
        reads(ExtractorKind::Fits),
        reads(ExtractorKind::Exif),
    );
    info!("Report written to {}", output.display().to_string().cyan());
}
