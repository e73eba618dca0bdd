//! Test utilities for the transformation pipeline
//!
//! Builders for raw tables and typed records shared by the stage tests.

use crate::models::{
    KpiRecord, MonthlyProductionAggregate, MonthlyQualityAggregate, ProductionRecord,
    QualityRecord,
};
use crate::table::RawTable;

// Test modules
mod aggregation_tests;
mod product_master_tests;

pub const PRODUCTION_HEADER: [&str; 7] = [
    "plant_id",
    "production_line",
    "product_code",
    "production_date",
    "units_produced",
    "planned_units",
    "downtime_minutes",
];

pub const QUALITY_HEADER: [&str; 5] = [
    "plant_id",
    "product_code",
    "inspection_date",
    "units_inspected",
    "defect_units",
];

pub const MASTER_HEADER: [&str; 3] = ["product_code_raw", "product_code_std", "product_family"];

/// Build a raw table; empty strings become null cells
pub fn raw_table<const N: usize>(name: &str, header: [&str; N], rows: &[[&str; N]]) -> RawTable {
    RawTable::from_rows(
        name,
        header.iter().map(|column| column.to_string()).collect(),
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
                    .collect()
            })
            .collect(),
    )
    .unwrap()
}

pub fn production_table(rows: &[[&str; 7]]) -> RawTable {
    raw_table("production_data", PRODUCTION_HEADER, rows)
}

pub fn quality_table(rows: &[[&str; 5]]) -> RawTable {
    raw_table("quality_data", QUALITY_HEADER, rows)
}

pub fn master_table(rows: &[[&str; 3]]) -> RawTable {
    raw_table("product_master", MASTER_HEADER, rows)
}

pub fn production_record(
    plant: &str,
    line: &str,
    code: &str,
    date: Option<&str>,
    produced: Option<f64>,
    planned: Option<f64>,
    downtime: f64,
) -> ProductionRecord {
    ProductionRecord {
        plant_id: plant.to_string(),
        production_line: line.to_string(),
        product_code: code.to_string(),
        production_date: date.map(str::to_string),
        units_produced: produced,
        planned_units: planned,
        downtime_minutes: downtime,
    }
}

pub fn quality_record(
    plant: &str,
    code: &str,
    date: Option<&str>,
    inspected: Option<f64>,
    defects: Option<f64>,
) -> QualityRecord {
    QualityRecord {
        plant_id: plant.to_string(),
        product_code: code.to_string(),
        inspection_date: date.map(str::to_string),
        units_inspected: inspected,
        defect_units: defects,
    }
}

pub fn production_aggregate(
    plant: &str,
    line: &str,
    code: &str,
    month: &str,
    produced: f64,
    planned: f64,
    downtime: f64,
) -> MonthlyProductionAggregate {
    MonthlyProductionAggregate {
        plant_id: plant.to_string(),
        production_line: line.to_string(),
        product_code_std: code.to_string(),
        product_family: "F1".to_string(),
        month: month.to_string(),
        units_produced: produced,
        planned_units: planned,
        downtime_minutes: downtime,
    }
}

pub fn quality_aggregate(
    plant: &str,
    code: &str,
    month: &str,
    inspected: f64,
    defects: f64,
) -> MonthlyQualityAggregate {
    MonthlyQualityAggregate {
        plant_id: plant.to_string(),
        product_code_std: code.to_string(),
        product_family: "F1".to_string(),
        month: month.to_string(),
        units_inspected: inspected,
        defect_units: defects,
    }
}

/// KPI record with only the ranking-relevant fields set
pub fn kpi_record(plant: &str, line: &str, month: &str, efficiency: f64) -> KpiRecord {
    KpiRecord {
        plant_id: plant.to_string(),
        production_line: line.to_string(),
        product_code_std: "STD-ABC".to_string(),
        product_family: "F1".to_string(),
        month: month.to_string(),
        units_produced: 100.0,
        planned_units: 100.0,
        downtime_minutes: 0.0,
        units_inspected: None,
        defect_units: None,
        production_efficiency: efficiency,
        defect_rate: None,
        downtime_per_unit: 0.0,
        performance_rank: None,
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
