//! Command implementations for the manufacturing KPI CLI
//!
//! This module contains the command execution logic, logging setup and the
//! console summary printed after a run.

use crate::cli::args::RunArgs;
use crate::io::reader::load_inputs;
use crate::io::writer::{OutputPaths, write_outputs};
use crate::pipeline::{PipelineProcessor, PipelineStats};
use anyhow::Context;
use colored::*;
use indicatif::HumanDuration;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub final_rows: usize,
    pub paths: OutputPaths,
    pub stats: PipelineStats,
    pub processing_time: Duration,
}

/// Run the pipeline end to end
///
/// 1. Validate arguments and build the configuration
/// 2. Load the three input tables
/// 3. Process them
/// 4. Write the final dataset and both data quality reports
pub async fn run(args: RunArgs) -> anyhow::Result<RunSummary> {
    let start_time = Instant::now();
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = args.to_config();
    config.validate()?;

    let console = args.show_progress();
    if console {
        println!("{}", "Starting manufacturing KPI pipeline".bright_green().bold());
        println!("  {} {}", "Input:".bright_cyan(), args.input_dir.display());
        println!("  {} {}", "Output:".bright_cyan(), args.output_dir.display());
        println!("\n{}", "Loading data...".bright_yellow());
    }

    let inputs = load_inputs(&args.input_dir, &config)
        .with_context(|| format!("Failed to load inputs from {}", args.input_dir.display()))?;

    let output = PipelineProcessor::new(config)
        .process(inputs)
        .await
        .context("Pipeline run failed")?;

    let paths = write_outputs(&args.output_dir, &output)
        .with_context(|| format!("Failed to write outputs to {}", args.output_dir.display()))?;

    let summary = RunSummary {
        final_rows: output.final_dataset.len(),
        paths,
        stats: output.stats,
        processing_time: start_time.elapsed(),
    };
    info!(
        "Run complete in {:?}: {} final rows",
        summary.processing_time, summary.final_rows
    );

    if console {
        print_summary(&summary);
    }

    Ok(summary)
}

/// Set up structured logging based on CLI arguments
pub fn setup_logging(args: &RunArgs) -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("manufacturing_kpi={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

fn print_branch(label: &str, stats: &crate::pipeline::BranchStats) {
    println!(
        "  {} {} in, {} valid, {} unmatched, {} undated, {} monthly groups",
        label.bright_cyan(),
        stats.input_rows.to_string().bright_white(),
        stats.validated_rows.to_string().bright_white(),
        stats.unmatched_product_rows.to_string().bright_white(),
        stats.unaligned_rows.to_string().bright_white(),
        stats.aggregate_rows.to_string().bright_white()
    );
    for (rule, dropped) in &stats.dropped_by_rule {
        println!(
            "    {} {} rows",
            format!("{rule}:").yellow(),
            dropped.to_string().bright_yellow()
        );
    }
}

fn print_summary(summary: &RunSummary) {
    println!("\n{}", "Pipeline Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Time elapsed:".bright_cyan(),
        HumanDuration(summary.processing_time).to_string().bright_white()
    );
    print_branch("Production:", &summary.stats.production);
    print_branch("Quality:", &summary.stats.quality);
    println!(
        "  {} {:.1}%",
        "Quality coverage:".bright_cyan(),
        summary.stats.quality_coverage()
    );
    println!(
        "  {} {}",
        "Final rows:".bright_cyan(),
        summary.final_rows.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Written:".bright_cyan(),
        summary.paths.final_dataset.display()
    );
}
