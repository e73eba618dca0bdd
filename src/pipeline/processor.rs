//! Pipeline orchestration
//!
//! Runs the data quality reports, the production and quality branches, the
//! KPI join and risk scoring. The two branches are independent until the
//! join, so by default they run concurrently on the blocking thread pool and
//! share the product master through an `Arc`.

use crate::config::PipelineConfig;
use crate::constants::{master_columns, production_columns, quality_columns};
use crate::error::{PipelineError, Result};
use crate::models::{
    DataQualityReportRow, MonthlyFactRecord, MonthlyProductionAggregate, MonthlyQualityAggregate,
    ProductionRecord, QualityRecord,
};
use crate::table::RawTable;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tokio::task;
use tracing::{debug, info};

use super::{
    aggregation::{MonthAligner, aggregate_production, aggregate_quality, count_unaligned},
    kpi::compute_kpis,
    normalize::normalize_columns,
    product_master::ProductMaster,
    quality_report::build_quality_report,
    risk::RiskScorer,
    stats::{BranchStats, PipelineStats},
    validation::{production_rules, quality_rules},
};

/// The three raw tables a run consumes
#[derive(Debug, Clone)]
pub struct PipelineInputs {
    pub production: RawTable,
    pub quality: RawTable,
    pub product_master: RawTable,
}

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub final_dataset: Vec<MonthlyFactRecord>,
    pub production_report: Vec<DataQualityReportRow>,
    pub quality_report: Vec<DataQualityReportRow>,
    pub stats: PipelineStats,
}

/// Pipeline processor for one batch run
#[derive(Debug, Clone, Default)]
pub struct PipelineProcessor {
    config: PipelineConfig,
}

impl PipelineProcessor {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Check the column contracts of all three inputs
    ///
    /// # Errors
    ///
    /// `MissingColumn` for the first required column that is absent.
    pub fn check_inputs(inputs: &PipelineInputs) -> Result<()> {
        inputs.production.require_columns(production_columns::REQUIRED)?;
        inputs.quality.require_columns(quality_columns::REQUIRED)?;
        inputs
            .product_master
            .require_columns(master_columns::REQUIRED)?;
        Ok(())
    }

    /// Run the full pipeline over the given inputs
    ///
    /// Structural failures abort the run before any output is produced;
    /// data-level anomalies only show up in the statistics.
    pub async fn process(&self, inputs: PipelineInputs) -> Result<PipelineOutput> {
        self.config.validate()?;
        Self::check_inputs(&inputs)?;

        info!(
            "Starting pipeline: {} production rows, {} quality rows, {} product master rows",
            inputs.production.len(),
            inputs.quality.len(),
            inputs.product_master.len()
        );

        let progress = self
            .config
            .show_progress
            .then(|| Self::create_stage_progress_bar(4));

        // Step 1: Diagnostics on the untouched inputs
        if let Some(pb) = &progress {
            pb.set_message("Running data quality checks");
        }
        let production_report =
            build_quality_report(&inputs.production, &self.config.production_numeric_columns);
        let quality_report =
            build_quality_report(&inputs.quality, &self.config.quality_numeric_columns);
        if let Some(pb) = &progress {
            pb.inc(1);
        }

        // Step 2: Clean, validate, map and aggregate both branches
        if let Some(pb) = &progress {
            pb.set_message("Cleaning, validating and aggregating");
        }
        let master = Arc::new(ProductMaster::from_table(&inputs.product_master)?);
        let PipelineInputs {
            production,
            quality,
            ..
        } = inputs;

        let ((production_monthly, production_stats), (quality_monthly, quality_stats)) =
            if self.config.parallel_branches {
                self.run_branches_concurrently(production, quality, master)
                    .await?
            } else {
                (
                    run_production_branch(&production, &master, &self.config)?,
                    run_quality_branch(&quality, &master, &self.config)?,
                )
            };
        if let Some(pb) = &progress {
            pb.inc(1);
        }

        // Step 3: Join the monthly tables and derive KPIs
        if let Some(pb) = &progress {
            pb.set_message("Merging datasets");
        }
        let kpis = compute_kpis(&production_monthly, &quality_monthly);
        if let Some(pb) = &progress {
            pb.inc(1);
        }

        // Step 4: Risk scoring
        if let Some(pb) = &progress {
            pb.set_message("Calculating KPIs and risk");
        }
        let final_dataset = RiskScorer::new(self.config.risk.clone()).apply(kpis);
        if let Some(pb) = &progress {
            pb.inc(1);
            pb.finish_with_message(format!(
                "Pipeline complete: {} monthly records",
                final_dataset.len()
            ));
        }

        let stats = PipelineStats {
            production: production_stats,
            quality: quality_stats,
            quality_matches: final_dataset
                .iter()
                .filter(|fact| fact.units_inspected.is_some())
                .count(),
            final_rows: final_dataset.len(),
        };
        info!("{}", stats.summary());

        Ok(PipelineOutput {
            final_dataset,
            production_report,
            quality_report,
            stats,
        })
    }

    async fn run_branches_concurrently(
        &self,
        production: RawTable,
        quality: RawTable,
        master: Arc<ProductMaster>,
    ) -> Result<(
        (Vec<MonthlyProductionAggregate>, BranchStats),
        (Vec<MonthlyQualityAggregate>, BranchStats),
    )> {
        let config = Arc::new(self.config.clone());
        debug!("Running production and quality branches concurrently");

        let production_task = task::spawn_blocking({
            let master = Arc::clone(&master);
            let config = Arc::clone(&config);
            move || run_production_branch(&production, &master, &config)
        });
        let quality_task = task::spawn_blocking({
            let master = Arc::clone(&master);
            let config = Arc::clone(&config);
            move || run_quality_branch(&quality, &master, &config)
        });

        let (production_result, quality_result) = tokio::try_join!(production_task, quality_task)
            .map_err(|e| PipelineError::TaskFailed {
                reason: e.to_string(),
            })?;

        Ok((production_result?, quality_result?))
    }

    /// Create a progress bar over pipeline stages
    fn create_stage_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb.set_message("Initializing...");
        pb
    }
}

/// Production branch: normalize, map lines, validate, map products, align, aggregate
pub fn run_production_branch(
    table: &RawTable,
    master: &ProductMaster,
    config: &PipelineConfig,
) -> Result<(Vec<MonthlyProductionAggregate>, BranchStats)> {
    let mut stats = BranchStats::new(table.len());

    let normalized = normalize_columns(table, production_columns::TEXT)?;
    let records = config
        .line_codes
        .apply(ProductionRecord::from_table(&normalized)?);

    let outcome = production_rules().apply(records);
    stats.validated_rows = outcome.valid.len();
    stats.dropped_by_rule = outcome
        .dropped_by_rule
        .iter()
        .map(|(rule, count)| (rule.to_string(), *count))
        .collect();

    let mapping = master.map_records(outcome.valid);
    stats.mapped_rows = mapping.mapped.len();
    stats.unmatched_product_rows = mapping.unmatched;

    let aligned = MonthAligner::new(config.date_formats.iter().cloned()).align(mapping.mapped);
    stats.unaligned_rows = count_unaligned(&aligned);

    let monthly = aggregate_production(&aligned);
    stats.aggregate_rows = monthly.len();

    info!("Production branch: {}", stats.summary());
    Ok((monthly, stats))
}

/// Quality branch: normalize, validate, map products, align, aggregate
pub fn run_quality_branch(
    table: &RawTable,
    master: &ProductMaster,
    config: &PipelineConfig,
) -> Result<(Vec<MonthlyQualityAggregate>, BranchStats)> {
    let mut stats = BranchStats::new(table.len());

    let normalized = normalize_columns(table, quality_columns::TEXT)?;
    let records = QualityRecord::from_table(&normalized)?;

    let outcome = quality_rules().apply(records);
    stats.validated_rows = outcome.valid.len();
    stats.dropped_by_rule = outcome
        .dropped_by_rule
        .iter()
        .map(|(rule, count)| (rule.to_string(), *count))
        .collect();

    let mapping = master.map_records(outcome.valid);
    stats.mapped_rows = mapping.mapped.len();
    stats.unmatched_product_rows = mapping.unmatched;

    let aligned = MonthAligner::new(config.date_formats.iter().cloned()).align(mapping.mapped);
    stats.unaligned_rows = count_unaligned(&aligned);

    let monthly = aggregate_quality(&aligned);
    stats.aggregate_rows = monthly.len();

    info!("Quality branch: {}", stats.summary());
    Ok((monthly, stats))
}
