//! Business rule validation for production and quality records
//!
//! Each rule set is a list of named boolean predicates over a single record.
//! A record is kept only if every predicate holds; rejected records are
//! dropped silently and charged to the first rule they fail, so the drop
//! counts can be reported without interrupting the run.

use crate::models::{ProductionRecord, QualityRecord};
use std::collections::BTreeMap;
use tracing::debug;

type Predicate<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;

/// A named predicate over one record
pub struct Rule<R> {
    name: &'static str,
    predicate: Predicate<R>,
}

impl<R> Rule<R> {
    pub fn new<F>(name: &'static str, predicate: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        Self {
            name,
            predicate: Box::new(predicate),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn holds(&self, record: &R) -> bool {
        (self.predicate)(record)
    }
}

impl<R> std::fmt::Debug for Rule<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// An ordered conjunction of rules
#[derive(Debug)]
pub struct RuleSet<R> {
    rules: Vec<Rule<R>>,
}

impl<R> Default for RuleSet<R> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

/// Records that passed a rule set, and how many each rule rejected
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome<R> {
    pub valid: Vec<R>,
    pub dropped_by_rule: BTreeMap<&'static str, usize>,
}

impl<R> ValidationOutcome<R> {
    pub fn dropped(&self) -> usize {
        self.dropped_by_rule.values().sum()
    }
}

impl<R> RuleSet<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule
    pub fn with_rule<F>(mut self, name: &'static str, predicate: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Rule::new(name, predicate));
        self
    }

    pub fn rules(&self) -> &[Rule<R>] {
        &self.rules
    }

    /// Name of the first rule the record fails, if any
    pub fn first_violation(&self, record: &R) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| !rule.holds(record))
            .map(Rule::name)
    }

    pub fn is_valid(&self, record: &R) -> bool {
        self.first_violation(record).is_none()
    }

    /// Keep the records that satisfy every rule
    pub fn apply(&self, records: Vec<R>) -> ValidationOutcome<R> {
        let mut dropped_by_rule: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut valid = Vec::with_capacity(records.len());

        for record in records {
            match self.first_violation(&record) {
                None => valid.push(record),
                Some(rule) => *dropped_by_rule.entry(rule).or_default() += 1,
            }
        }

        for (rule, count) in &dropped_by_rule {
            debug!("Rule '{}' rejected {} records", rule, count);
        }

        ValidationOutcome {
            valid,
            dropped_by_rule,
        }
    }
}

/// Production rules: produced > 0, planned present, planned >= produced
pub fn production_rules() -> RuleSet<ProductionRecord> {
    RuleSet::new()
        .with_rule("units_produced_positive", |record: &ProductionRecord| {
            record.units_produced.is_some_and(|units| units > 0.0)
        })
        .with_rule("planned_units_present", |record: &ProductionRecord| {
            record.planned_units.is_some()
        })
        .with_rule("planned_units_cover_produced", |record: &ProductionRecord| {
            matches!(
                (record.planned_units, record.units_produced),
                (Some(planned), Some(produced)) if planned >= produced
            )
        })
}

/// Quality rules: inspected present and > 0, defects present and within [0, inspected]
pub fn quality_rules() -> RuleSet<QualityRecord> {
    RuleSet::new()
        .with_rule("units_inspected_present", |record: &QualityRecord| {
            record.units_inspected.is_some()
        })
        .with_rule("units_inspected_positive", |record: &QualityRecord| {
            record.units_inspected.is_some_and(|units| units > 0.0)
        })
        .with_rule("defect_units_present", |record: &QualityRecord| {
            record.defect_units.is_some()
        })
        .with_rule("defect_units_non_negative", |record: &QualityRecord| {
            record.defect_units.is_some_and(|defects| defects >= 0.0)
        })
        .with_rule("defect_units_within_inspected", |record: &QualityRecord| {
            matches!(
                (record.defect_units, record.units_inspected),
                (Some(defects), Some(inspected)) if defects <= inspected
            )
        })
}
