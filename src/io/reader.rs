//! CSV input reader
//!
//! Reads delimited files with polars, every column as text, and converts
//! them into [`RawTable`]s. Numeric coercion and date parsing happen later
//! in the pipeline so that the data quality report sees the raw values.

use crate::config::PipelineConfig;
use crate::constants::{PRODUCT_MASTER_FILE, PRODUCTION_FILE, QUALITY_FILE, tables};
use crate::error::{PipelineError, Result};
use crate::pipeline::PipelineInputs;
use crate::table::{Cell, RawTable};
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Read one CSV file into a raw table
///
/// Cells that are empty or equal to one of `null_tokens` become null.
///
/// # Errors
///
/// `InputNotFound` when the file does not exist; `Polars` when it cannot be
/// parsed as CSV.
pub fn read_table(path: &Path, name: &str, null_tokens: &[String]) -> Result<RawTable> {
    if !path.is_file() {
        return Err(PipelineError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    // A zero-row inference window reads every column as text
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let table = dataframe_to_table(&df, name, null_tokens)?;
    debug!(
        "Read {} rows x {} columns from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

/// Convert a DataFrame into a raw table of text cells
pub fn dataframe_to_table(df: &DataFrame, name: &str, null_tokens: &[String]) -> Result<RawTable> {
    let width = df.width();
    let mut columns = Vec::with_capacity(width);
    let mut rows: Vec<Vec<Cell>> = (0..df.height())
        .map(|_| Vec::with_capacity(width))
        .collect();

    for column in df.get_columns() {
        columns.push(column.name().to_string());

        let text = column.as_materialized_series().cast(&DataType::String)?;
        for (row, value) in rows.iter_mut().zip(text.str()?.into_iter()) {
            row.push(
                value
                    .filter(|value| !is_null_token(value, null_tokens))
                    .map(str::to_string),
            );
        }
    }

    RawTable::from_rows(name, columns, rows)
}

fn is_null_token(value: &str, null_tokens: &[String]) -> bool {
    value.is_empty() || null_tokens.iter().any(|token| token == value)
}

/// Load the production, quality and product master files from a directory
pub fn load_inputs(input_dir: &Path, config: &PipelineConfig) -> Result<PipelineInputs> {
    let production = read_table(
        &input_dir.join(PRODUCTION_FILE),
        tables::PRODUCTION,
        &config.null_tokens,
    )?;
    let quality = read_table(
        &input_dir.join(QUALITY_FILE),
        tables::QUALITY,
        &config.null_tokens,
    )?;
    let product_master = read_table(
        &input_dir.join(PRODUCT_MASTER_FILE),
        tables::PRODUCT_MASTER,
        &config.null_tokens,
    )?;

    info!(
        "Loaded inputs from {}: {} production, {} quality, {} product master rows",
        input_dir.display(),
        production.len(),
        quality.len(),
        product_master.len()
    );

    Ok(PipelineInputs {
        production,
        quality,
        product_master,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tokens() -> Vec<String> {
        PipelineConfig::default().null_tokens
    }

    #[test]
    fn test_read_table_keeps_text_and_nulls() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.csv");
        std::fs::write(&path, "code,qty,note\n abc ,10,\nX1,NA,ok\nX2,007,N/A\n").unwrap();

        let table = read_table(&path, "data", &tokens()).unwrap();

        assert_eq!(table.columns(), &["code", "qty", "note"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.cell(0, 0), Some(" abc "));
        assert_eq!(table.cell(0, 2), None);
        assert_eq!(table.cell(1, 1), None);
        assert_eq!(table.cell(1, 2), Some("ok"));
        // Leading zeros survive because nothing is inferred as numeric
        assert_eq!(table.cell(2, 1), Some("007"));
        assert_eq!(table.cell(2, 2), None);
    }

    #[test]
    fn test_read_table_spreadsheet_null_spellings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.csv");
        std::fs::write(
            &path,
            "qty\nn/a\n#N/A\n<NA>\n-nan\n1.#QNAN\nN/A N/A\nn.a.\n",
        )
        .unwrap();

        let table = read_table(&path, "data", &tokens()).unwrap();

        assert_eq!(table.len(), 7);
        for row in 0..6 {
            assert_eq!(table.cell(row, 0), None, "row {row} should be null");
        }
        assert_eq!(table.cell(6, 0), Some("n.a."));
    }

    #[test]
    fn test_read_table_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_table(&temp_dir.path().join("absent.csv"), "absent", &tokens());

        assert!(matches!(result, Err(PipelineError::InputNotFound { .. })));
    }

    #[test]
    fn test_load_inputs_requires_all_files() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(PRODUCTION_FILE),
            "plant_id,production_line\nP1,L1\n",
        )
        .unwrap();

        let result = load_inputs(temp_dir.path(), &PipelineConfig::default());
        match result {
            Err(PipelineError::InputNotFound { path }) => {
                assert!(path.ends_with(QUALITY_FILE));
            }
            other => panic!("expected InputNotFound, got {other:?}"),
        }
    }
}
