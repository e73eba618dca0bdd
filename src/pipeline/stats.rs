//! Processing statistics for pipeline runs
//!
//! Row counts at each stage of both branches, so that rows lost to business
//! rules, unmatched product codes or unparseable dates are visible even
//! though the stages themselves drop them silently.

use std::collections::BTreeMap;

/// Row counts through one branch (production or quality)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchStats {
    /// Rows in the raw input table
    pub input_rows: usize,
    /// Rows that passed every business rule
    pub validated_rows: usize,
    /// Rows rejected, charged to the first rule they failed
    pub dropped_by_rule: BTreeMap<String, usize>,
    /// Validated rows whose product code had no master entry
    pub unmatched_product_rows: usize,
    /// Rows resolved against the product master
    pub mapped_rows: usize,
    /// Mapped rows without a parseable date
    pub unaligned_rows: usize,
    /// Monthly groups produced by the aggregator
    pub aggregate_rows: usize,
}

impl BranchStats {
    pub fn new(input_rows: usize) -> Self {
        Self {
            input_rows,
            ..Default::default()
        }
    }

    /// Total rows rejected by business rules
    pub fn rule_drops(&self) -> usize {
        self.dropped_by_rule.values().sum()
    }

    /// Rows that reached aggregation
    pub fn aggregated_input_rows(&self) -> usize {
        self.mapped_rows.saturating_sub(self.unaligned_rows)
    }

    /// Percentage of input rows that reached aggregation
    pub fn retention_rate(&self) -> f64 {
        if self.input_rows == 0 {
            100.0
        } else {
            (self.aggregated_input_rows() as f64 / self.input_rows as f64) * 100.0
        }
    }

    /// One-line summary for logging
    pub fn summary(&self) -> String {
        format!(
            "{} rows -> {} valid ({} rule drops) -> {} mapped ({} unmatched) -> {} dated ({} undated) -> {} groups ({:.1}% retained)",
            self.input_rows,
            self.validated_rows,
            self.rule_drops(),
            self.mapped_rows,
            self.unmatched_product_rows,
            self.aggregated_input_rows(),
            self.unaligned_rows,
            self.aggregate_rows,
            self.retention_rate()
        )
    }
}

/// Statistics for a whole pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    pub production: BranchStats,
    pub quality: BranchStats,
    /// Production aggregates that found a quality aggregate
    pub quality_matches: usize,
    /// Rows in the final monthly dataset
    pub final_rows: usize,
}

impl PipelineStats {
    /// Share of final rows that carry quality data
    pub fn quality_coverage(&self) -> f64 {
        if self.final_rows == 0 {
            0.0
        } else {
            (self.quality_matches as f64 / self.final_rows as f64) * 100.0
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Pipeline Summary: production [{}] | quality [{}] | {} final rows ({:.1}% with quality data)",
            self.production.summary(),
            self.quality.summary(),
            self.final_rows,
            self.quality_coverage()
        )
    }
}
