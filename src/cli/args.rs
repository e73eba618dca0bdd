//! Command-line argument definitions
//!
//! Defines the CLI interface using the clap derive API. Arguments override
//! the matching fields of [`PipelineConfig`].

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the manufacturing KPI pipeline
#[derive(Debug, Clone, Parser)]
#[command(
    name = "manufacturing-kpi",
    version,
    about = "Build a monthly manufacturing KPI dataset from production and quality logs",
    long_about = "Reads production logs, quality inspection records and a product master from \
                  CSV, cleans and validates them, aggregates both to monthly granularity and \
                  writes a monthly fact table with efficiency, defect and downtime KPIs, dense \
                  performance ranks and a composite risk level, plus a data quality report for \
                  each raw input."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run the full pipeline over an input directory
    Run(RunArgs),
}

/// Arguments for the run command
#[derive(Debug, Clone, Parser)]
pub struct RunArgs {
    /// Directory holding production_data.csv, quality_data.csv and product_master.csv
    #[arg(
        short = 'i',
        long = "input-dir",
        value_name = "PATH",
        default_value = "data"
    )]
    pub input_dir: PathBuf,

    /// Directory that receives the final dataset and the data quality reports
    ///
    /// Created if it does not exist. Existing outputs are replaced only once
    /// every new output has been written.
    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "PATH",
        default_value = "output"
    )]
    pub output_dir: PathBuf,

    /// Additional production line alias, may be repeated
    #[arg(
        long = "line-code",
        value_name = "ALIAS=CANONICAL",
        help = "Map a production line alias to a canonical code (repeatable)"
    )]
    pub line_codes: Vec<LineCodeOverride>,

    /// Accepted date formats, replacing the defaults when given
    #[arg(
        long = "date-format",
        value_name = "FORMAT",
        help = "chrono format string accepted for dates (repeatable)"
    )]
    pub date_formats: Vec<String>,

    /// Run the production and quality branches one after another
    #[arg(long = "sequential")]
    pub sequential: bool,

    /// Disable the stage progress bar
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors and warnings
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// A single `ALIAS=CANONICAL` line code override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineCodeOverride {
    pub alias: String,
    pub canonical: String,
}

impl FromStr for LineCodeOverride {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        let (alias, canonical) = s.split_once('=').ok_or_else(|| {
            PipelineError::configuration(format!(
                "line code override '{s}' must look like ALIAS=CANONICAL"
            ))
        })?;

        let (alias, canonical) = (alias.trim(), canonical.trim());
        if alias.is_empty() || canonical.is_empty() {
            return Err(PipelineError::configuration(format!(
                "line code override '{s}' has an empty side"
            )));
        }

        Ok(Self {
            alias: alias.to_string(),
            canonical: canonical.to_string(),
        })
    }
}

impl RunArgs {
    /// Log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Whether to draw the progress bar and the colored console summary
    pub fn show_progress(&self) -> bool {
        !self.no_progress && !self.quiet
    }

    /// Check the arguments before any file is touched
    pub fn validate(&self) -> Result<()> {
        if !self.input_dir.is_dir() {
            return Err(PipelineError::configuration(format!(
                "Input directory does not exist: {}",
                self.input_dir.display()
            )));
        }

        if self.output_dir.is_file() {
            return Err(PipelineError::configuration(format!(
                "Output path is a file, not a directory: {}",
                self.output_dir.display()
            )));
        }

        Ok(())
    }

    /// Build the pipeline configuration with these arguments applied
    pub fn to_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::default().with_progress(self.show_progress());

        for line_code in &self.line_codes {
            config = config.with_line_alias(&line_code.alias, &line_code.canonical);
        }

        if !self.date_formats.is_empty() {
            config = config.with_date_formats(self.date_formats.clone());
        }

        if self.sequential {
            config = config.sequential();
        }

        config
    }
}
