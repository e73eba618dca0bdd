//! Text normalization and production line code mapping
//!
//! Text columns are trimmed, upper-cased and stripped of all internal
//! whitespace before any matching happens, so lookups against the line code
//! table and the product master are insensitive to case and spacing.

use crate::constants::{DEFAULT_LINE_CODES, NULL_TEXT};
use crate::error::Result;
use crate::models::ProductionRecord;
use crate::table::RawTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Normalize a single text value
///
/// A null value renders as the literal text `"NAN"`. Downstream joins and
/// groupings treat that text like any other code.
pub fn normalize_text(value: Option<&str>) -> String {
    let value = value.unwrap_or(NULL_TEXT);
    value
        .trim()
        .to_uppercase()
        .split_whitespace()
        .collect::<String>()
}

/// Normalize the named columns of a table, returning a new table
///
/// # Errors
///
/// Returns `MissingColumn` if any named column is absent.
pub fn normalize_columns(table: &RawTable, columns: &[&str]) -> Result<RawTable> {
    let mut normalized = table.clone();
    for column in columns {
        let index = normalized.require_column(column)?;
        normalized = normalized.map_column(index, |value| Some(normalize_text(value)));
    }

    debug!(
        "Normalized {} columns over {} rows of '{}'",
        columns.len(),
        normalized.len(),
        normalized.name()
    );

    Ok(normalized)
}

/// Lookup from production line spellings to canonical line codes
///
/// Aliases are stored in normalized form, so `"line 1"` and `"LINE1"`
/// register the same key. Unknown lines map to themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct LineCodeMapper {
    aliases: BTreeMap<String, String>,
}

impl Default for LineCodeMapper {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_LINE_CODES.iter().copied())
    }
}

impl LineCodeMapper {
    /// Mapper with no aliases; every line passes through unchanged
    pub fn empty() -> Self {
        Self {
            aliases: BTreeMap::new(),
        }
    }

    /// Build a mapper from `(alias, canonical)` pairs
    pub fn from_pairs<I, A, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, C)>,
        A: AsRef<str>,
        C: AsRef<str>,
    {
        pairs
            .into_iter()
            .fold(Self::empty(), |mapper, (alias, canonical)| {
                mapper.with_alias(alias, canonical)
            })
    }

    /// Add or replace one alias
    pub fn with_alias(mut self, alias: impl AsRef<str>, canonical: impl AsRef<str>) -> Self {
        self.aliases.insert(
            normalize_text(Some(alias.as_ref())),
            normalize_text(Some(canonical.as_ref())),
        );
        self
    }

    /// Canonical code for a (normalized) line identifier
    pub fn canonical<'a>(&'a self, line: &'a str) -> &'a str {
        self.aliases.get(line).map(String::as_str).unwrap_or(line)
    }

    /// Rewrite the production line of every record
    pub fn apply(&self, records: Vec<ProductionRecord>) -> Vec<ProductionRecord> {
        let mut remapped = 0usize;
        let records: Vec<ProductionRecord> = records
            .into_iter()
            .map(|mut record| {
                if let Some(canonical) = self.aliases.get(&record.production_line) {
                    if *canonical != record.production_line {
                        record.production_line = canonical.clone();
                        remapped += 1;
                    }
                }
                record
            })
            .collect();

        debug!(
            "Line code mapping rewrote {} of {} production lines",
            remapped,
            records.len()
        );

        records
    }

    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl From<BTreeMap<String, String>> for LineCodeMapper {
    fn from(aliases: BTreeMap<String, String>) -> Self {
        Self::from_pairs(aliases)
    }
}

impl From<LineCodeMapper> for BTreeMap<String, String> {
    fn from(mapper: LineCodeMapper) -> Self {
        mapper.aliases
    }
}
