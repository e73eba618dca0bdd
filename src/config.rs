//! Configuration management and validation.
//!
//! Provides the pipeline configuration: line code aliases, accepted date
//! formats, null tokens for the input reader, the numeric columns checked by
//! the data quality reports, risk scoring weights and bands, and execution
//! switches.

use crate::constants::{self, DEFAULT_DATE_FORMATS, DEFAULT_NULL_TOKENS};
use crate::error::{PipelineError, Result};
use crate::pipeline::normalize::LineCodeMapper;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Risk scoring weights and band edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Weight applied to the efficiency shortfall `(1 - efficiency)`
    pub efficiency_weight: f64,

    /// Weight applied to the defect rate
    pub defect_weight: f64,

    /// Weight applied to downtime minutes per produced unit
    pub downtime_weight: f64,

    /// Lower clamp of the score
    pub min_score: f64,

    /// Upper clamp of the score
    pub max_score: f64,

    /// Inclusive upper edge of the LOW band
    pub low_upper: f64,

    /// Inclusive upper edge of the MEDIUM band
    pub medium_upper: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            efficiency_weight: constants::risk::EFFICIENCY_WEIGHT,
            defect_weight: constants::risk::DEFECT_WEIGHT,
            downtime_weight: constants::risk::DOWNTIME_WEIGHT,
            min_score: constants::risk::MIN_SCORE,
            max_score: constants::risk::MAX_SCORE,
            low_upper: constants::risk::LOW_UPPER,
            medium_upper: constants::risk::MEDIUM_UPPER,
        }
    }
}

impl RiskConfig {
    /// Check that weights are finite and band edges are strictly ordered
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("efficiency_weight", self.efficiency_weight),
            ("defect_weight", self.defect_weight),
            ("downtime_weight", self.downtime_weight),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() {
                return Err(PipelineError::configuration(format!(
                    "risk {name} must be finite, got {weight}"
                )));
            }
        }

        let ordered = self.min_score < self.low_upper
            && self.low_upper < self.medium_upper
            && self.medium_upper < self.max_score;
        if !ordered || !self.min_score.is_finite() || !self.max_score.is_finite() {
            return Err(PipelineError::configuration(format!(
                "risk bands must satisfy min < low < medium < max, got {} < {} < {} < {}",
                self.min_score, self.low_upper, self.medium_upper, self.max_score
            )));
        }

        if self.min_score < constants::risk::MIN_SCORE || self.max_score > constants::risk::MAX_SCORE
        {
            return Err(PipelineError::configuration(format!(
                "risk scores must stay within [{}, {}], got [{}, {}]",
                constants::risk::MIN_SCORE,
                constants::risk::MAX_SCORE,
                self.min_score,
                self.max_score
            )));
        }

        Ok(())
    }
}

/// Global configuration for a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Production line aliases applied after text normalization
    pub line_codes: LineCodeMapper,

    /// chrono formats tried in order when deriving month keys
    pub date_formats: Vec<String>,

    /// Cell values the input reader treats as null
    pub null_tokens: Vec<String>,

    /// Columns of the production log checked for non-positive values
    pub production_numeric_columns: Vec<String>,

    /// Columns of the quality log checked for non-positive values
    pub quality_numeric_columns: Vec<String>,

    /// Risk scoring weights and bands
    pub risk: RiskConfig,

    /// Run the production and quality branches concurrently
    pub parallel_branches: bool,

    /// Show a progress bar over the pipeline stages
    pub show_progress: bool,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            line_codes: LineCodeMapper::default(),
            date_formats: owned(DEFAULT_DATE_FORMATS),
            null_tokens: owned(DEFAULT_NULL_TOKENS),
            production_numeric_columns: owned(constants::production_columns::NUMERIC),
            quality_numeric_columns: owned(constants::quality_columns::NUMERIC),
            risk: RiskConfig::default(),
            parallel_branches: true,
            show_progress: false,
        }
    }
}

impl PipelineConfig {
    /// Replace the line code table
    pub fn with_line_codes(mut self, line_codes: LineCodeMapper) -> Self {
        self.line_codes = line_codes;
        self
    }

    /// Add or replace one line alias
    pub fn with_line_alias(mut self, alias: &str, canonical: &str) -> Self {
        self.line_codes = self.line_codes.with_alias(alias, canonical);
        self
    }

    /// Replace the accepted date formats
    pub fn with_date_formats(mut self, formats: Vec<String>) -> Self {
        self.date_formats = formats;
        self
    }

    /// Replace the null tokens used by the input reader
    pub fn with_null_tokens(mut self, tokens: Vec<String>) -> Self {
        self.null_tokens = tokens;
        self
    }

    /// Configure risk scoring
    pub fn with_risk(mut self, risk: RiskConfig) -> Self {
        self.risk = risk;
        self
    }

    /// Run both branches on the calling thread, one after the other
    pub fn sequential(mut self) -> Self {
        self.parallel_branches = false;
        self
    }

    /// Enable or disable the stage progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Validate the configuration before a run
    pub fn validate(&self) -> Result<()> {
        if self.date_formats.is_empty() {
            return Err(PipelineError::configuration(
                "at least one date format is required",
            ));
        }

        if let Some((alias, _)) = self
            .line_codes
            .aliases()
            .iter()
            .find(|(_, canonical)| canonical.is_empty())
        {
            return Err(PipelineError::configuration(format!(
                "line alias '{alias}' maps to an empty canonical code"
            )));
        }

        self.risk.validate()?;

        debug!(
            "Configuration valid: {} line aliases, {} date formats, {} null tokens",
            self.line_codes.len(),
            self.date_formats.len(),
            self.null_tokens.len()
        );

        Ok(())
    }
}
