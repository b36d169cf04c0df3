//! Plantwatch - transplanting quality monitor.
//!
//! This crate classifies georeferenced seedling detections from a
//! transplanting machine by label and by spacing, reporting normal, root
//! exposed, buried, overlapping, and missing plantings.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod georef;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod spacing;
pub mod utils;

use clap::Parser;
use cli::{AnalyzeArgs, Cli, Command};
use config::{
    Config, config_file_path, load_default_config, save_default_config, validate_config,
};
use pipeline::{
    ProcessCheck, ProcessOptions, Watcher, collect_input_files, output_dir_for, process_file,
    should_process,
};
use spacing::SpacingClassifier;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{error, info, warn};

pub use error::{Error, Result};

/// Main entry point for plantwatch CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.analyze.verbose, cli.analyze.quiet);

    // First Ctrl+C stops cleanly between files or polls, the second exits
    let stop = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&stop);
    if let Err(e) = ctrlc::set_handler(move || {
        if handler_flag.swap(true, Ordering::SeqCst) {
            std::process::exit(130); // 128 + SIGINT(2)
        }
    }) {
        warn!("Failed to install Ctrl+C handler: {e}");
    }

    // Load configuration
    let config = load_default_config()?;
    validate_config(&config)?;

    // Handle subcommands
    if let Some(command) = cli.command {
        return handle_command(command, &cli.analyze, &config, &stop);
    }

    // Show help if no inputs provided
    if cli.inputs.is_empty() {
        cli::help::print_smart_help(&config);
        return Ok(());
    }

    analyze_files(&cli.inputs, &cli.analyze, &config, &stop)
}

/// Resolve classifier settings from CLI args and config.
fn build_classifier(args: &AnalyzeArgs, config: &Config) -> Result<SpacingClassifier> {
    let standard_spacing = args.spacing.unwrap_or(config.defaults.standard_spacing);
    let reference_latitude = args.ref_lat.unwrap_or(config.defaults.reference_latitude);
    SpacingClassifier::new(standard_spacing, reference_latitude)
}

/// Classify input files with the given options.
fn analyze_files(
    inputs: &[PathBuf],
    args: &AnalyzeArgs,
    config: &Config,
    stop: &AtomicBool,
) -> Result<()> {
    use crate::output::progress;
    use std::time::Instant;

    let total_start = Instant::now();

    // Collect all input files
    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        return Err(Error::NoValidInputFiles);
    }

    info!("Found {} crossing record file(s) to process", files.len());

    let classifier = build_classifier(args, config)?;
    let thresholds = classifier.thresholds();
    info!(
        "Standard spacing {:.3} m (overlap < {:.3} m, gap > {:.3} m)",
        thresholds.standard(),
        thresholds.min(),
        thresholds.max()
    );

    let options = ProcessOptions {
        standard_spacing: thresholds.standard(),
        reference_latitude: classifier.metric().reference_latitude(),
        formats: args
            .format
            .clone()
            .unwrap_or_else(|| config.defaults.formats.clone()),
        stdout: args.stdout,
    };
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.defaults.output_dir.clone());

    // Create file progress bar
    let progress_enabled = !args.quiet && !args.no_progress && !args.stdout;
    let file_progress = progress::create_file_progress(files.len(), progress_enabled);

    let mut processed = 0;
    let mut skipped = 0;
    let mut errors = 0;
    let mut total_events = 0;

    for file in &files {
        if stop.load(Ordering::Relaxed) {
            warn!("Interrupted, {} file(s) not processed", files.len() - processed - skipped - errors);
            break;
        }

        let file_output_dir = output_dir_for(file, output_dir.as_deref());

        if !args.stdout
            && should_process(file, &file_output_dir, &options.formats, args.force)
                == ProcessCheck::SkipExists
        {
            info!("Skipping (output exists): {}", file.display());
            skipped += 1;
            progress::inc_progress(file_progress.as_ref());
            continue;
        }

        progress::set_progress_message(file_progress.as_ref(), &file.display().to_string());

        match process_file(file, &file_output_dir, &options) {
            Ok(result) => {
                processed += 1;
                total_events += result.events;
                if !args.quiet {
                    report_summary(file, &result.result, args.stdout);
                }
            }
            Err(e) => {
                error!("Failed to process {}: {}", file.display(), e);
                errors += 1;
                if args.fail_fast {
                    progress::finish_progress(file_progress, "Failed");
                    return Err(e);
                }
            }
        }
        progress::inc_progress(file_progress.as_ref());
    }

    progress::finish_progress(file_progress, "Complete");

    let total_duration = total_start.elapsed().as_secs_f64();
    info!(
        "Complete: {} processed, {} skipped, {} errors, {} total events in {:.2}s",
        processed, skipped, errors, total_events, total_duration
    );

    if errors > 0 {
        warn!("{} file(s) had errors", errors);
    }

    Ok(())
}

/// Print a count summary, keeping stdout clean when it carries JSON.
fn report_summary(file: &Path, result: &spacing::ClassificationResult, to_stderr: bool) {
    let source = file.display().to_string();
    let written = if to_stderr {
        output::print_summary(&mut std::io::stderr().lock(), &source, result)
    } else {
        output::print_summary(&mut std::io::stdout().lock(), &source, result)
    };
    if let Err(e) = written {
        warn!("Failed to print summary: {e}");
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    // Logs go to stderr so stdout can carry reports and NDJSON
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_command(
    command: Command,
    args: &AnalyzeArgs,
    config: &Config,
    stop: &AtomicBool,
) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action),
        Command::Watch {
            file,
            interval_ms,
            emit_payloads,
            once,
        } => {
            let classifier = build_classifier(args, config)?;
            let interval = Duration::from_millis(interval_ms.unwrap_or(config.watch.poll_interval_ms));
            let emit = emit_payloads || config.watch.emit_payloads;
            handle_watch_command(&file, classifier, interval, emit, once, args.quiet, stop)
        }
        Command::Georef {
            crossings,
            timestamps,
            gnss,
            output,
        } => {
            let timestamps = timestamps.unwrap_or_else(|| {
                config::resolve_beside(&crossings, &config.georef.timestamps_file)
            });
            let gnss = gnss
                .unwrap_or_else(|| config::resolve_beside(&crossings, &config.georef.gnss_file));
            let output = output.unwrap_or_else(|| crossings.clone());
            let summary = georef::georeference_file(&crossings, &timestamps, &gnss, &output)?;
            if summary.written < summary.crossings {
                warn!(
                    "{} crossing(s) could not be georeferenced",
                    summary.crossings - summary.written
                );
            }
            Ok(())
        }
    }
}

#[allow(clippy::fn_params_excessive_bools)]
fn handle_watch_command(
    file: &Path,
    classifier: SpacingClassifier,
    interval: Duration,
    emit_payloads: bool,
    once: bool,
    quiet: bool,
    stop: &AtomicBool,
) -> Result<()> {
    let mut watcher = Watcher::new(file, classifier, interval);
    let source = file.display().to_string();

    let mut on_update = |update: &pipeline::WatchUpdate| -> Result<()> {
        if emit_payloads {
            // stdout carries NDJSON only; summaries go to stderr
            output::emit_detections(&mut std::io::stdout().lock(), &update.new_events)?;
            if !quiet {
                output::print_summary(&mut std::io::stderr().lock(), &source, &update.result)?;
            }
        } else if !quiet {
            output::print_summary(&mut std::io::stdout().lock(), &source, &update.result)?;
        }
        Ok(())
    };

    if once {
        return match watcher.poll_once()? {
            Some(update) => on_update(&update),
            None => {
                warn!("Nothing to classify yet: {}", file.display());
                Ok(())
            }
        };
    }

    watcher.run(stop, on_update);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn handle_config_command(action: cli::ConfigAction) -> Result<()> {
    use cli::ConfigAction;

    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let config = Config::default();
                let saved_path = save_default_config(&config)?;
                println!("Created configuration file: {}", saved_path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            let text = toml::to_string_pretty(&config)
                .map_err(|e| Error::ConfigSerialize { source: e })?;
            println!("{text}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
