//! Integration tests for the complete file-to-file pipeline
//!
//! These tests write realistic input CSVs to a temporary directory, run them
//! through the reader, processor and writer, and read the outputs back with
//! polars.

use manufacturing_kpi::io::reader::load_inputs;
use manufacturing_kpi::io::writer::write_outputs;
use manufacturing_kpi::pipeline::PipelineProcessor;
use manufacturing_kpi::{PipelineConfig, PipelineError};
use polars::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const PRODUCTION_CSV: &str = "\
plant_id,production_line,product_code,production_date,units_produced,planned_units,downtime_minutes
 l1 ,L1, abc ,2024-01-05,100,100,10
P2,line 2,XYZ,2024-01-06,50,100,0
P2,LINE-3,XYZ,2024-01-07,80,100,NA
P2,LINE-3,XYZ,2024-01-07,80,100,NA
P2,L1,XYZ,not a date,80,100,0
P2,L1,UNKNOWN,2024-01-08,80,100,0
P2,L1,XYZ,2024-01-09,,100,0
";

const QUALITY_CSV: &str = "\
plant_id,product_code,inspection_date,units_inspected,defect_units
P2,xyz,2024-01-15,50,25
P2,XYZ,2024-01-16,0,0
P2,XYZ,2024-01-17,N/A,1
";

const MASTER_CSV: &str = "\
product_code_raw,product_code_std,product_family
ABC,STD-ABC,F1
xyz,STD-XYZ,F2
XYZ,STD-XYZ,F2
";

fn write_inputs(dir: &Path) {
    std::fs::write(dir.join("production_data.csv"), PRODUCTION_CSV).unwrap();
    std::fs::write(dir.join("quality_data.csv"), QUALITY_CSV).unwrap();
    std::fs::write(dir.join("product_master.csv"), MASTER_CSV).unwrap();
}

fn read_output(path: &Path) -> DataFrame {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .unwrap()
        .finish()
        .unwrap()
}

#[tokio::test]
async fn test_end_to_end_pipeline() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    write_inputs(input_dir.path());

    let config = PipelineConfig::default();
    let inputs = load_inputs(input_dir.path(), &config).unwrap();
    let output = PipelineProcessor::new(config).process(inputs).await.unwrap();
    let paths = write_outputs(output_dir.path(), &output).unwrap();

    // (L1, LINE01, STD-ABC), (P2, LINE02, STD-XYZ), (P2, LINE03, STD-XYZ)
    assert_eq!(output.final_dataset.len(), 3);
    assert_eq!(output.stats.production.unmatched_product_rows, 1);
    assert_eq!(output.stats.production.unaligned_rows, 1);

    let final_dataset = read_output(&paths.final_dataset);
    assert_eq!(final_dataset.height(), 3);
    assert_eq!(final_dataset.width(), 16);

    let plants = final_dataset.column("plant_id").unwrap().str().unwrap();
    let levels = final_dataset.column("risk_level").unwrap().str().unwrap();
    let scores = final_dataset.column("risk_score").unwrap().f64().unwrap();

    // The normalized single-row plant: efficiency 1.0, 0.1 downtime per unit
    assert_eq!(plants.get(0), Some("L1"));
    assert!((scores.get(0).unwrap() - 2.0).abs() < 1e-9);
    assert_eq!(levels.get(0), Some("LOW"));

    // P2 LINE02: efficiency 0.5, defect rate 0.5, no downtime
    assert_eq!(plants.get(1), Some("P2"));
    assert!((scores.get(1).unwrap() - 40.0).abs() < 1e-9);
    assert_eq!(levels.get(1), Some("MEDIUM"));

    // Duplicated rows are both aggregated: 160 of 200 planned
    let produced = final_dataset.column("units_produced").unwrap().f64().unwrap();
    assert_eq!(produced.get(2), Some(160.0));

    let ranks = final_dataset.column("performance_rank").unwrap();
    assert_eq!(ranks.null_count(), 0);

    // Rows without a quality match keep empty quality columns
    let inspected = final_dataset.column("units_inspected").unwrap();
    assert_eq!(inspected.null_count(), 1);
}

#[tokio::test]
async fn test_quality_reports_written() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    write_inputs(input_dir.path());

    let config = PipelineConfig::default();
    let inputs = load_inputs(input_dir.path(), &config).unwrap();
    let output = PipelineProcessor::new(config).process(inputs).await.unwrap();
    let paths = write_outputs(output_dir.path(), &output).unwrap();

    let production_report = read_output(&paths.production_report);
    assert_eq!(production_report.height(), 7);
    let names: Vec<String> = production_report
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(
        names,
        vec!["column", "missing_pct", "invalid_count", "duplicate_rows"]
    );

    let duplicates = production_report
        .column("duplicate_rows")
        .unwrap()
        .i64()
        .unwrap();
    assert!(duplicates.into_iter().all(|count| count == Some(1)));

    let quality_report = read_output(&paths.quality_report);
    assert_eq!(quality_report.height(), 5);
    let columns = quality_report.column("column").unwrap().str().unwrap();
    let invalid = quality_report
        .column("invalid_count")
        .unwrap()
        .i64()
        .unwrap();
    let inspected_row = columns
        .into_iter()
        .position(|name| name == Some("units_inspected"))
        .unwrap();
    assert_eq!(invalid.get(inspected_row), Some(1));
    // Text columns carry no invalid count
    assert_eq!(invalid.get(0), None);
}

#[tokio::test]
async fn test_missing_input_file() {
    let input_dir = TempDir::new().unwrap();
    write_inputs(input_dir.path());
    std::fs::remove_file(input_dir.path().join("product_master.csv")).unwrap();

    let result = load_inputs(input_dir.path(), &PipelineConfig::default());
    assert!(matches!(result, Err(PipelineError::InputNotFound { .. })));
}

#[tokio::test]
async fn test_missing_column_writes_nothing() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    write_inputs(input_dir.path());
    std::fs::write(
        input_dir.path().join("quality_data.csv"),
        "plant_id,product_code,units_inspected,defect_units\nP2,XYZ,50,25\n",
    )
    .unwrap();

    let config = PipelineConfig::default();
    let inputs = load_inputs(input_dir.path(), &config).unwrap();
    let result = PipelineProcessor::new(config).process(inputs).await;

    assert!(matches!(
        result,
        Err(PipelineError::MissingColumn { ref column, .. }) if column == "inspection_date"
    ));
    assert_eq!(std::fs::read_dir(output_dir.path()).unwrap().count(), 0);
}
