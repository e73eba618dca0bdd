//! Transformation pipeline for manufacturing production and quality logs
//!
//! Turns raw production and quality-inspection tables into a monthly fact
//! table with efficiency, defect and downtime KPIs and a composite risk
//! score.
//!
//! # Architecture
//!
//! - [`quality_report`] - Per-column diagnostics on the raw inputs
//! - [`normalize`] - Text normalization and production line code mapping
//! - [`validation`] - Business rules as named, composable predicates
//! - [`product_master`] - Resolution of product codes to standard codes and families
//! - [`aggregation`] - Month alignment and monthly group-by sums
//! - [`kpi`] - Join of the monthly tables, ratio KPIs and dense performance ranks
//! - [`risk`] - Composite risk score and risk bands
//! - [`stats`] - Row counts through every stage
//! - [`processor`] - Orchestration of a complete run
//!
//! # Processing Pipeline
//!
//! 1. **Diagnostics**: data quality reports on the untouched inputs
//! 2. **Branches** (production and quality, independent of each other):
//!    normalize text, map line codes (production only), validate, map
//!    products, align months, aggregate
//! 3. **KPIs**: left join production onto quality, derive ratios and ranks
//! 4. **Risk**: score and band every monthly record
//!
//! Data-level anomalies never fail a run: malformed numbers become nulls,
//! rule violations, unmatched codes and unparseable dates drop rows, and all
//! of it is counted in [`PipelineStats`].
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use manufacturing_kpi::config::PipelineConfig;
//! use manufacturing_kpi::io::reader::load_inputs;
//! use manufacturing_kpi::pipeline::PipelineProcessor;
//!
//! # async fn example() -> manufacturing_kpi::Result<()> {
//! let config = PipelineConfig::default();
//! let inputs = load_inputs(std::path::Path::new("data"), &config)?;
//!
//! let output = PipelineProcessor::new(config).process(inputs).await?;
//! println!("{}", output.stats.summary());
//! # Ok(())
//! # }
//! ```

pub mod aggregation;
pub mod kpi;
pub mod normalize;
pub mod processor;
pub mod product_master;
pub mod quality_report;
pub mod risk;
pub mod stats;
pub mod validation;

#[cfg(test)]
pub mod tests;

pub use aggregation::{MonthAligner, aggregate_production, aggregate_quality};
pub use kpi::{compute_kpis, dense_rank_descending};
pub use normalize::{LineCodeMapper, normalize_columns, normalize_text};
pub use processor::{PipelineInputs, PipelineOutput, PipelineProcessor};
pub use product_master::{MappingOutcome, ProductMaster};
pub use quality_report::build_quality_report;
pub use risk::RiskScorer;
pub use stats::{BranchStats, PipelineStats};
pub use validation::{Rule, RuleSet, ValidationOutcome, production_rules, quality_rules};
