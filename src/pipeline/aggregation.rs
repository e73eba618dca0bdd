//! Month alignment and monthly aggregation
//!
//! The month aligner turns a record's date into a `YYYY-MM` key; the
//! aggregators sum measures per grouping key. Records without a month are
//! excluded from every group. Output is ordered by grouping key.

use crate::constants::DEFAULT_DATE_FORMATS;
use crate::models::{
    Dated, EnrichedRecord, MonthlyProductionAggregate, MonthlyQualityAggregate, ProductionRecord,
    QualityRecord,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Derives monthly bucket keys from date text
#[derive(Debug, Clone)]
pub struct MonthAligner {
    formats: Vec<String>,
}

impl Default for MonthAligner {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMATS.iter().map(|format| format.to_string()))
    }
}

impl MonthAligner {
    /// Create an aligner trying the given chrono formats in order
    pub fn new(formats: impl IntoIterator<Item = String>) -> Self {
        Self {
            formats: formats.into_iter().collect(),
        }
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    /// Parse date text into a calendar date
    ///
    /// Each format is tried as a plain date and then as a date-time; RFC 3339
    /// timestamps are accepted as a fallback.
    pub fn parse_date(&self, value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        self.formats
            .iter()
            .find_map(|format| {
                NaiveDate::parse_from_str(value, format)
                    .ok()
                    .or_else(|| {
                        NaiveDateTime::parse_from_str(value, format)
                            .ok()
                            .map(|datetime| datetime.date())
                    })
            })
            .or_else(|| {
                DateTime::parse_from_rfc3339(value)
                    .ok()
                    .map(|datetime| datetime.date_naive())
            })
    }

    /// `YYYY-MM` key for date text, `None` when absent or unparseable
    pub fn month_key(&self, value: Option<&str>) -> Option<String> {
        value
            .and_then(|text| self.parse_date(text))
            .map(|date| date.format("%Y-%m").to_string())
    }

    /// Set the month of every record from its date
    pub fn align<R: Dated>(&self, records: Vec<EnrichedRecord<R>>) -> Vec<EnrichedRecord<R>> {
        let mut unparsed = 0usize;
        let aligned: Vec<EnrichedRecord<R>> = records
            .into_iter()
            .map(|mut enriched| {
                enriched.month = self.month_key(enriched.record.record_date());
                if enriched.month.is_none() {
                    unparsed += 1;
                }
                enriched
            })
            .collect();

        if unparsed > 0 {
            warn!(
                "{} of {} records have no parseable date and will be excluded from aggregation",
                unparsed,
                aligned.len()
            );
        }

        aligned
    }
}

/// Count records without a month key
pub fn count_unaligned<R>(records: &[EnrichedRecord<R>]) -> usize {
    records.iter().filter(|record| record.month.is_none()).count()
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ProductionKey {
    plant_id: String,
    production_line: String,
    product_code_std: String,
    product_family: String,
    month: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct QualityKey {
    plant_id: String,
    product_code_std: String,
    product_family: String,
    month: String,
}

#[derive(Debug, Default, Clone, Copy)]
struct ProductionTotals {
    units_produced: f64,
    planned_units: f64,
    downtime_minutes: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct QualityTotals {
    units_inspected: f64,
    defect_units: f64,
}

/// Sum production by (plant, line, standard code, family, month)
///
/// Null measures are skipped by the sum.
pub fn aggregate_production(
    records: &[EnrichedRecord<ProductionRecord>],
) -> Vec<MonthlyProductionAggregate> {
    let mut groups: BTreeMap<ProductionKey, ProductionTotals> = BTreeMap::new();

    for enriched in records {
        let Some(month) = &enriched.month else {
            continue;
        };
        let record = &enriched.record;
        let key = ProductionKey {
            plant_id: record.plant_id.clone(),
            production_line: record.production_line.clone(),
            product_code_std: enriched.product_code_std.clone(),
            product_family: enriched.product_family.clone(),
            month: month.clone(),
        };

        let totals = groups.entry(key).or_default();
        totals.units_produced += record.units_produced.unwrap_or(0.0);
        totals.planned_units += record.planned_units.unwrap_or(0.0);
        totals.downtime_minutes += record.downtime_minutes;
    }

    debug!(
        "Aggregated {} production records into {} monthly groups",
        records.len(),
        groups.len()
    );

    groups
        .into_iter()
        .map(|(key, totals)| MonthlyProductionAggregate {
            plant_id: key.plant_id,
            production_line: key.production_line,
            product_code_std: key.product_code_std,
            product_family: key.product_family,
            month: key.month,
            units_produced: totals.units_produced,
            planned_units: totals.planned_units,
            downtime_minutes: totals.downtime_minutes,
        })
        .collect()
}

/// Sum inspections by (plant, standard code, family, month)
pub fn aggregate_quality(
    records: &[EnrichedRecord<QualityRecord>],
) -> Vec<MonthlyQualityAggregate> {
    let mut groups: BTreeMap<QualityKey, QualityTotals> = BTreeMap::new();

    for enriched in records {
        let Some(month) = &enriched.month else {
            continue;
        };
        let record = &enriched.record;
        let key = QualityKey {
            plant_id: record.plant_id.clone(),
            product_code_std: enriched.product_code_std.clone(),
            product_family: enriched.product_family.clone(),
            month: month.clone(),
        };

        let totals = groups.entry(key).or_default();
        totals.units_inspected += record.units_inspected.unwrap_or(0.0);
        totals.defect_units += record.defect_units.unwrap_or(0.0);
    }

    debug!(
        "Aggregated {} quality records into {} monthly groups",
        records.len(),
        groups.len()
    );

    groups
        .into_iter()
        .map(|(key, totals)| MonthlyQualityAggregate {
            plant_id: key.plant_id,
            product_code_std: key.product_code_std,
            product_family: key.product_family,
            month: key.month,
            units_inspected: totals.units_inspected,
            defect_units: totals.defect_units,
        })
        .collect()
}
