//! Raw tabular datasets as handed over by the input reader.
//!
//! A [`RawTable`] is an ordered list of named columns and rows of nullable
//! text cells. Columns are always addressed by name; positions are resolved
//! through [`RawTable::require_column`] so a missing column surfaces as a
//! structural error instead of a silent misread.

use crate::error::{PipelineError, Result};

/// Nullable text cell
pub type Cell = Option<String>;

/// Column-named table of nullable text cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Create an empty table with the given column schema
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a table from prepared rows, checking every row against the schema width
    pub fn from_rows(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<Cell>>,
    ) -> Result<Self> {
        let mut table = Self::new(name, columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append a row
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(PipelineError::MalformedTable {
                table: self.name.clone(),
                reason: format!(
                    "row {} has {} cells, expected {}",
                    self.rows.len(),
                    row.len(),
                    self.columns.len()
                ),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, if present
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    /// Position of a column, or a `MissingColumn` error naming this table
    pub fn require_column(&self, column: &str) -> Result<usize> {
        self.column_index(column)
            .ok_or_else(|| PipelineError::missing_column(&self.name, column))
    }

    /// Check that every listed column is present
    pub fn require_columns(&self, columns: &[&str]) -> Result<()> {
        for column in columns {
            self.require_column(column)?;
        }
        Ok(())
    }

    /// Cell at `(row, column_index)` as text
    pub fn cell(&self, row: usize, column_index: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column_index))
            .and_then(|cell| cell.as_deref())
    }

    /// Iterate over the values of one column
    pub fn column_values(&self, column_index: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |cells| cells.get(column_index).and_then(|cell| cell.as_deref()))
    }

    /// Return a new table with `transform` applied to every cell of one column
    pub fn map_column<F>(&self, column_index: usize, transform: F) -> Self
    where
        F: Fn(Option<&str>) -> Cell,
    {
        let rows = self
            .rows
            .iter()
            .map(|cells| {
                let mut cells = cells.clone();
                if let Some(cell) = cells.get_mut(column_index) {
                    *cell = transform(cell.as_deref());
                }
                cells
            })
            .collect();

        Self {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows,
        }
    }
}

/// Best-effort numeric coercion of a text cell
///
/// Surrounding whitespace is ignored. Anything that does not parse as a
/// number, including an explicit `NaN`, becomes `None`.
pub fn coerce_numeric(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|text| text.trim().parse::<f64>().ok())
        .filter(|number| !number.is_nan())
}
