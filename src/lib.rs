//! Manufacturing KPI Library
//!
//! A Rust library for turning raw manufacturing production logs and quality
//! inspection records into a clean monthly fact table with operational KPIs
//! and a composite risk classification.
//!
//! This library provides tools for:
//! - Reading production, quality and product master CSV files
//! - Per-column data quality reports on the raw inputs
//! - Text normalization and production line code standardization
//! - Business rule validation with per-rule drop counts
//! - Product code resolution against a product master
//! - Monthly aggregation, KPI derivation and dense performance ranking
//! - Risk scoring and banding
//! - Writing all outputs atomically as CSV

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod table;

pub mod io {
    pub mod reader;
    pub mod writer;
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::{PipelineConfig, RiskConfig};
pub use error::{PipelineError, Result};
pub use models::{
    DataQualityReportRow, KpiRecord, MonthlyFactRecord, ProductMasterEntry, ProductionRecord,
    QualityRecord, RiskLevel,
};
pub use pipeline::{PipelineInputs, PipelineOutput, PipelineProcessor, PipelineStats};
pub use table::RawTable;
