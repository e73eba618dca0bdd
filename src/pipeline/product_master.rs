//! Product master mapping
//!
//! Resolves operational product codes to a standard code and product
//! family. Both sides are normalized first, so matching ignores case and
//! whitespace. Rows whose code has no master entry are dropped.
//!
//! The master must map each raw code to exactly one entry; conflicting
//! duplicates are rejected when the master is built so that no operational
//! row can fan out into several mapped rows.

use crate::constants::master_columns;
use crate::error::{PipelineError, Result};
use crate::models::{EnrichedRecord, ProductCoded, ProductMasterEntry};
use crate::table::RawTable;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::normalize::{normalize_columns, normalize_text};

/// Product master indexed by normalized raw code
#[derive(Debug, Clone, Default)]
pub struct ProductMaster {
    entries: HashMap<String, ProductMasterEntry>,
}

/// Mapped records and the number left unresolved
#[derive(Debug, Clone, PartialEq)]
pub struct MappingOutcome<R> {
    pub mapped: Vec<EnrichedRecord<R>>,
    pub unmatched: usize,
}

impl ProductMaster {
    /// Build the master from its raw table, normalizing all three columns
    ///
    /// # Errors
    ///
    /// `MissingColumn` when a master column is absent, `DuplicateProductCode`
    /// when one raw code maps to two different entries.
    pub fn from_table(table: &RawTable) -> Result<Self> {
        let normalized = normalize_columns(table, master_columns::REQUIRED)?;
        Self::from_entries(ProductMasterEntry::from_table(&normalized)?)
    }

    /// Build the master from entries, normalizing every field
    pub fn from_entries(entries: impl IntoIterator<Item = ProductMasterEntry>) -> Result<Self> {
        let mut index: HashMap<String, ProductMasterEntry> = HashMap::new();
        let mut collapsed = 0usize;

        for entry in entries {
            let entry = ProductMasterEntry {
                product_code_raw: normalize_text(Some(&entry.product_code_raw)),
                product_code_std: normalize_text(Some(&entry.product_code_std)),
                product_family: normalize_text(Some(&entry.product_family)),
            };

            match index.get(&entry.product_code_raw) {
                Some(existing) if *existing == entry => {
                    collapsed += 1;
                }
                Some(existing) => {
                    return Err(PipelineError::DuplicateProductCode {
                        code: entry.product_code_raw.clone(),
                        first: existing.to_string(),
                        second: entry.to_string(),
                    });
                }
                None => {
                    index.insert(entry.product_code_raw.clone(), entry);
                }
            }
        }

        if collapsed > 0 {
            warn!(
                "Product master contains {} repeated rows; identical duplicates collapsed",
                collapsed
            );
        }

        debug!("Product master indexed {} raw codes", index.len());

        Ok(Self { entries: index })
    }

    /// Entry for a raw code; the code is normalized before lookup
    pub fn lookup(&self, product_code: &str) -> Option<&ProductMasterEntry> {
        self.entries.get(&normalize_text(Some(product_code)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalize and resolve the product code of every record
    ///
    /// Matched records carry their standard code and family; unmatched
    /// records are dropped and counted.
    pub fn map_records<R: ProductCoded>(&self, records: Vec<R>) -> MappingOutcome<R> {
        let total = records.len();
        let mut mapped = Vec::with_capacity(total);
        let mut unmatched = 0usize;

        for mut record in records {
            let code = normalize_text(Some(record.product_code()));
            match self.entries.get(&code) {
                Some(entry) => {
                    record.set_product_code(code);
                    mapped.push(EnrichedRecord::new(record, entry));
                }
                None => unmatched += 1,
            }
        }

        info!(
            "Product master mapping: {} -> {} records ({} unmatched)",
            total,
            mapped.len(),
            unmatched
        );

        MappingOutcome { mapped, unmatched }
    }
}
