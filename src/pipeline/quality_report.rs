//! Data quality assessment of raw input tables
//!
//! Produces one diagnostic row per source column: the share of missing
//! cells, the number of non-positive values for designated numeric columns,
//! and the whole-dataset duplicate row count. Assessment never fails;
//! malformed data only raises the counts.

use crate::models::DataQualityReportRow;
use crate::table::{Cell, RawTable, coerce_numeric};
use std::collections::HashSet;
use tracing::info;

/// Build the data quality report for a raw table
///
/// # Arguments
///
/// * `table` - Raw table as read from the source file
/// * `numeric_columns` - Columns that also get a non-positive value count;
///   names not present in the table are ignored
pub fn build_quality_report<S: AsRef<str>>(
    table: &RawTable,
    numeric_columns: &[S],
) -> Vec<DataQualityReportRow> {
    let duplicate_rows = count_duplicate_rows(table);

    let report: Vec<DataQualityReportRow> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let is_numeric = numeric_columns
                .iter()
                .any(|numeric| numeric.as_ref() == column);

            DataQualityReportRow {
                column: column.clone(),
                missing_pct: missing_percentage(table, index),
                invalid_count: is_numeric.then(|| count_non_positive(table, index)),
                duplicate_rows,
            }
        })
        .collect();

    info!(
        "Data quality report for '{}': {} rows, {} columns, {} duplicate rows",
        table.name(),
        table.len(),
        report.len(),
        duplicate_rows
    );

    report
}

/// Count rows that exactly repeat an earlier row across all columns
pub fn count_duplicate_rows(table: &RawTable) -> usize {
    let mut seen: HashSet<&[Cell]> = HashSet::with_capacity(table.len());
    let mut duplicates = 0;
    for row in table.rows() {
        if !seen.insert(row.as_slice()) {
            duplicates += 1;
        }
    }
    duplicates
}

/// Percentage of null cells in a column, rounded to two decimals
///
/// An empty table reports 0.
pub fn missing_percentage(table: &RawTable, column_index: usize) -> f64 {
    if table.is_empty() {
        return 0.0;
    }

    let missing = table
        .column_values(column_index)
        .filter(Option::is_none)
        .count();

    round_to_hundredths(missing as f64 / table.len() as f64 * 100.0)
}

/// Count values that coerce to a number less than or equal to zero
pub fn count_non_positive(table: &RawTable, column_index: usize) -> usize {
    table
        .column_values(column_index)
        .filter_map(coerce_numeric)
        .filter(|value| *value <= 0.0)
        .count()
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
