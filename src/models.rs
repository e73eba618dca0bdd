//! Core data structures for the manufacturing KPI pipeline.
//!
//! Typed records for the operational logs, the product master, the monthly
//! aggregates and the final fact table. Every column that may legitimately
//! be null is an `Option`; text columns are non-null once normalized.

use crate::constants::{NULL_TEXT, master_columns, production_columns, quality_columns};
use crate::error::Result;
use crate::table::{RawTable, coerce_numeric};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Records that carry a product code resolvable against the product master
pub trait ProductCoded {
    fn product_code(&self) -> &str;
    fn set_product_code(&mut self, code: String);
}

/// Records that carry a date used for monthly bucketing
pub trait Dated {
    fn record_date(&self) -> Option<&str>;
}

fn text_cell(table: &RawTable, row: usize, column: usize) -> String {
    table.cell(row, column).unwrap_or(NULL_TEXT).to_string()
}

fn optional_cell(table: &RawTable, row: usize, column: usize) -> Option<String> {
    table.cell(row, column).map(str::to_string)
}

/// One production log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub plant_id: String,
    pub production_line: String,
    pub product_code: String,
    pub production_date: Option<String>,
    pub units_produced: Option<f64>,
    pub planned_units: Option<f64>,
    /// Missing or non-numeric downtime counts as zero
    pub downtime_minutes: f64,
}

impl ProductionRecord {
    /// Coerce every row of a production table into a typed record
    ///
    /// The downtime column is optional; when absent every record gets zero.
    pub fn from_table(table: &RawTable) -> Result<Vec<Self>> {
        let plant = table.require_column(production_columns::PLANT_ID)?;
        let line = table.require_column(production_columns::PRODUCTION_LINE)?;
        let code = table.require_column(production_columns::PRODUCT_CODE)?;
        let date = table.require_column(production_columns::PRODUCTION_DATE)?;
        let produced = table.require_column(production_columns::UNITS_PRODUCED)?;
        let planned = table.require_column(production_columns::PLANNED_UNITS)?;
        let downtime = table.column_index(production_columns::DOWNTIME_MINUTES);

        Ok((0..table.len())
            .map(|row| Self {
                plant_id: text_cell(table, row, plant),
                production_line: text_cell(table, row, line),
                product_code: text_cell(table, row, code),
                production_date: optional_cell(table, row, date),
                units_produced: coerce_numeric(table.cell(row, produced)),
                planned_units: coerce_numeric(table.cell(row, planned)),
                downtime_minutes: downtime
                    .and_then(|column| coerce_numeric(table.cell(row, column)))
                    .unwrap_or(0.0),
            })
            .collect())
    }
}

impl ProductCoded for ProductionRecord {
    fn product_code(&self) -> &str {
        &self.product_code
    }

    fn set_product_code(&mut self, code: String) {
        self.product_code = code;
    }
}

impl Dated for ProductionRecord {
    fn record_date(&self) -> Option<&str> {
        self.production_date.as_deref()
    }
}

/// One quality-inspection log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityRecord {
    pub plant_id: String,
    pub product_code: String,
    pub inspection_date: Option<String>,
    pub units_inspected: Option<f64>,
    pub defect_units: Option<f64>,
}

impl QualityRecord {
    /// Coerce every row of a quality table into a typed record
    pub fn from_table(table: &RawTable) -> Result<Vec<Self>> {
        let plant = table.require_column(quality_columns::PLANT_ID)?;
        let code = table.require_column(quality_columns::PRODUCT_CODE)?;
        let date = table.require_column(quality_columns::INSPECTION_DATE)?;
        let inspected = table.require_column(quality_columns::UNITS_INSPECTED)?;
        let defects = table.require_column(quality_columns::DEFECT_UNITS)?;

        Ok((0..table.len())
            .map(|row| Self {
                plant_id: text_cell(table, row, plant),
                product_code: text_cell(table, row, code),
                inspection_date: optional_cell(table, row, date),
                units_inspected: coerce_numeric(table.cell(row, inspected)),
                defect_units: coerce_numeric(table.cell(row, defects)),
            })
            .collect())
    }
}

impl ProductCoded for QualityRecord {
    fn product_code(&self) -> &str {
        &self.product_code
    }

    fn set_product_code(&mut self, code: String) {
        self.product_code = code;
    }
}

impl Dated for QualityRecord {
    fn record_date(&self) -> Option<&str> {
        self.inspection_date.as_deref()
    }
}

/// One product master row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductMasterEntry {
    pub product_code_raw: String,
    pub product_code_std: String,
    pub product_family: String,
}

impl ProductMasterEntry {
    pub fn new(
        product_code_raw: impl Into<String>,
        product_code_std: impl Into<String>,
        product_family: impl Into<String>,
    ) -> Self {
        Self {
            product_code_raw: product_code_raw.into(),
            product_code_std: product_code_std.into(),
            product_family: product_family.into(),
        }
    }

    /// Read master entries from a (normalized) product master table
    pub fn from_table(table: &RawTable) -> Result<Vec<Self>> {
        let raw = table.require_column(master_columns::PRODUCT_CODE_RAW)?;
        let std = table.require_column(master_columns::PRODUCT_CODE_STD)?;
        let family = table.require_column(master_columns::PRODUCT_FAMILY)?;

        Ok((0..table.len())
            .map(|row| Self {
                product_code_raw: text_cell(table, row, raw),
                product_code_std: text_cell(table, row, std),
                product_family: text_cell(table, row, family),
            })
            .collect())
    }
}

impl fmt::Display for ProductMasterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.product_code_std, self.product_family)
    }
}

/// An operational record resolved against the product master
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord<R> {
    pub record: R,
    pub product_code_std: String,
    pub product_family: String,
    /// `YYYY-MM`, set by the month aligner; `None` when the date did not parse
    pub month: Option<String>,
}

impl<R> EnrichedRecord<R> {
    pub fn new(record: R, entry: &ProductMasterEntry) -> Self {
        Self {
            record,
            product_code_std: entry.product_code_std.clone(),
            product_family: entry.product_family.clone(),
            month: None,
        }
    }
}

/// Monthly production totals per plant, line and product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProductionAggregate {
    pub plant_id: String,
    pub production_line: String,
    pub product_code_std: String,
    pub product_family: String,
    pub month: String,
    pub units_produced: f64,
    pub planned_units: f64,
    pub downtime_minutes: f64,
}

/// Monthly inspection totals per plant and product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyQualityAggregate {
    pub plant_id: String,
    pub product_code_std: String,
    pub product_family: String,
    pub month: String,
    pub units_inspected: f64,
    pub defect_units: f64,
}

/// A production aggregate joined to its quality aggregate, with derived KPIs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiRecord {
    pub plant_id: String,
    pub production_line: String,
    pub product_code_std: String,
    pub product_family: String,
    pub month: String,
    pub units_produced: f64,
    pub planned_units: f64,
    pub downtime_minutes: f64,
    pub units_inspected: Option<f64>,
    pub defect_units: Option<f64>,
    /// May be infinite or NaN when planned units sum to zero
    pub production_efficiency: f64,
    pub defect_rate: Option<f64>,
    pub downtime_per_unit: f64,
    /// Dense rank within (plant_id, month); `None` for a NaN efficiency
    pub performance_rank: Option<u32>,
}

/// Categorical risk band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the final monthly dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFactRecord {
    pub plant_id: String,
    pub production_line: String,
    pub product_code_std: String,
    pub product_family: String,
    pub month: String,
    pub units_produced: f64,
    pub planned_units: f64,
    pub downtime_minutes: f64,
    pub units_inspected: Option<f64>,
    pub defect_units: Option<f64>,
    pub production_efficiency: f64,
    pub defect_rate: Option<f64>,
    pub downtime_per_unit: f64,
    pub performance_rank: Option<u32>,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
}

impl MonthlyFactRecord {
    pub fn from_kpi(kpi: KpiRecord, risk_score: f64, risk_level: RiskLevel) -> Self {
        Self {
            plant_id: kpi.plant_id,
            production_line: kpi.production_line,
            product_code_std: kpi.product_code_std,
            product_family: kpi.product_family,
            month: kpi.month,
            units_produced: kpi.units_produced,
            planned_units: kpi.planned_units,
            downtime_minutes: kpi.downtime_minutes,
            units_inspected: kpi.units_inspected,
            defect_units: kpi.defect_units,
            production_efficiency: kpi.production_efficiency,
            defect_rate: kpi.defect_rate,
            downtime_per_unit: kpi.downtime_per_unit,
            performance_rank: kpi.performance_rank,
            risk_score,
            risk_level,
        }
    }
}

/// One row of a data quality report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQualityReportRow {
    pub column: String,
    /// Share of null cells, 0-100, rounded to two decimals
    pub missing_pct: f64,
    /// Non-positive values; only populated for designated numeric columns
    pub invalid_count: Option<usize>,
    /// Whole-dataset duplicate row count, repeated on every row
    pub duplicate_rows: usize,
}
