//! CSV output writer
//!
//! Converts the final dataset and the data quality reports into polars
//! DataFrames and writes them as CSV. All outputs are first written to
//! temporary files in the output directory and only renamed into place once
//! every write succeeded, so a failed run leaves no partial output set.

use crate::constants::{
    FINAL_DATASET_COLUMNS, FINAL_DATASET_FILE, PRODUCTION_REPORT_FILE, QUALITY_REPORT_COLUMNS,
    QUALITY_REPORT_FILE,
};
use crate::error::Result;
use crate::models::{DataQualityReportRow, MonthlyFactRecord};
use crate::pipeline::PipelineOutput;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Where a run wrote its outputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub final_dataset: PathBuf,
    pub production_report: PathBuf,
    pub quality_report: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(output_dir: &Path) -> Self {
        Self {
            final_dataset: output_dir.join(FINAL_DATASET_FILE),
            production_report: output_dir.join(PRODUCTION_REPORT_FILE),
            quality_report: output_dir.join(QUALITY_REPORT_FILE),
        }
    }
}

fn text_column<T>(name: &str, records: &[T], field: impl Fn(&T) -> String) -> Column {
    Column::new(
        name.into(),
        records.iter().map(field).collect::<Vec<String>>(),
    )
}

/// Final monthly dataset as a DataFrame, columns in output order
pub fn final_dataset_frame(records: &[MonthlyFactRecord]) -> Result<DataFrame> {
    let [
        plant_id,
        production_line,
        product_code_std,
        product_family,
        month,
        units_produced,
        planned_units,
        downtime_minutes,
        units_inspected,
        defect_units,
        production_efficiency,
        defect_rate,
        downtime_per_unit,
        performance_rank,
        risk_score,
        risk_level,
    ] = FINAL_DATASET_COLUMNS
    else {
        unreachable!("final dataset has sixteen columns");
    };

    let columns = vec![
        text_column(plant_id, records, |r| r.plant_id.clone()),
        text_column(production_line, records, |r| r.production_line.clone()),
        text_column(product_code_std, records, |r| r.product_code_std.clone()),
        text_column(product_family, records, |r| r.product_family.clone()),
        text_column(month, records, |r| r.month.clone()),
        Column::new(
            (*units_produced).into(),
            records.iter().map(|r| r.units_produced).collect::<Vec<f64>>(),
        ),
        Column::new(
            (*planned_units).into(),
            records.iter().map(|r| r.planned_units).collect::<Vec<f64>>(),
        ),
        Column::new(
            (*downtime_minutes).into(),
            records.iter().map(|r| r.downtime_minutes).collect::<Vec<f64>>(),
        ),
        Column::new(
            (*units_inspected).into(),
            records
                .iter()
                .map(|r| r.units_inspected)
                .collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            (*defect_units).into(),
            records
                .iter()
                .map(|r| r.defect_units)
                .collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            (*production_efficiency).into(),
            records
                .iter()
                .map(|r| r.production_efficiency)
                .collect::<Vec<f64>>(),
        ),
        Column::new(
            (*defect_rate).into(),
            records
                .iter()
                .map(|r| r.defect_rate)
                .collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            (*downtime_per_unit).into(),
            records
                .iter()
                .map(|r| r.downtime_per_unit)
                .collect::<Vec<f64>>(),
        ),
        Column::new(
            (*performance_rank).into(),
            records
                .iter()
                .map(|r| r.performance_rank)
                .collect::<Vec<Option<u32>>>(),
        ),
        Column::new(
            (*risk_score).into(),
            records.iter().map(|r| r.risk_score).collect::<Vec<f64>>(),
        ),
        text_column(risk_level, records, |r| r.risk_level.to_string()),
    ];

    Ok(DataFrame::new(columns)?)
}

/// Data quality report as a DataFrame
pub fn quality_report_frame(rows: &[DataQualityReportRow]) -> Result<DataFrame> {
    let [column, missing_pct, invalid_count, duplicate_rows] = QUALITY_REPORT_COLUMNS else {
        unreachable!("quality report has four columns");
    };

    let columns = vec![
        text_column(column, rows, |r| r.column.clone()),
        Column::new(
            (*missing_pct).into(),
            rows.iter().map(|r| r.missing_pct).collect::<Vec<f64>>(),
        ),
        Column::new(
            (*invalid_count).into(),
            rows.iter()
                .map(|r| r.invalid_count.map(|count| count as u64))
                .collect::<Vec<Option<u64>>>(),
        ),
        Column::new(
            (*duplicate_rows).into(),
            rows.iter()
                .map(|r| r.duplicate_rows as u64)
                .collect::<Vec<u64>>(),
        ),
    ];

    Ok(DataFrame::new(columns)?)
}

/// Write a frame as CSV into a temporary file inside `output_dir`
fn write_staged(output_dir: &Path, mut frame: DataFrame) -> Result<NamedTempFile> {
    let mut staged = NamedTempFile::new_in(output_dir)?;
    CsvWriter::new(staged.as_file_mut())
        .include_header(true)
        .finish(&mut frame)?;
    debug!(
        "Staged {} rows at {}",
        frame.height(),
        staged.path().display()
    );
    Ok(staged)
}

/// Fail if an existing entry at `destination` cannot be replaced by a file
fn check_destination(destination: &Path) -> Result<()> {
    let Ok(metadata) = std::fs::metadata(destination) else {
        return Ok(());
    };

    if metadata.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("output path {} is a directory", destination.display()),
        )
        .into());
    }
    if metadata.permissions().readonly() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            format!("output file {} is read-only", destination.display()),
        )
        .into());
    }

    Ok(())
}

/// Write all three outputs into `output_dir`, creating it if needed
///
/// Nothing is moved into place until every file has been written.
pub fn write_outputs(output_dir: &Path, output: &PipelineOutput) -> Result<OutputPaths> {
    std::fs::create_dir_all(output_dir)?;
    let paths = OutputPaths::in_dir(output_dir);

    let staged = [
        (
            write_staged(output_dir, final_dataset_frame(&output.final_dataset)?)?,
            &paths.final_dataset,
        ),
        (
            write_staged(output_dir, quality_report_frame(&output.production_report)?)?,
            &paths.production_report,
        ),
        (
            write_staged(output_dir, quality_report_frame(&output.quality_report)?)?,
            &paths.quality_report,
        ),
    ];

    for (_, destination) in &staged {
        check_destination(destination)?;
    }

    // Renames are not atomic as a group; a failure past this point can
    // leave earlier outputs replaced and later ones stale.
    for (file, destination) in staged {
        file.persist(destination).map_err(|e| e.error)?;
    }

    info!(
        "Wrote {} final rows to {}",
        output.final_dataset.len(),
        paths.final_dataset.display()
    );

    Ok(paths)
}
