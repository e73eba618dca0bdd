//! KPI derivation over the monthly fact tables
//!
//! Production aggregates are left-joined to quality aggregates on
//! (plant, standard code, family, month). The production line is not part of
//! the join key, so every line of a product picks up the same plant-level
//! quality totals. Division artifacts propagate: nothing is clamped or
//! dropped here.

use crate::models::{KpiRecord, MonthlyProductionAggregate, MonthlyQualityAggregate};
use std::collections::HashMap;
use tracing::{debug, info};

type JoinKey<'a> = (&'a str, &'a str, &'a str, &'a str);

/// Join the two monthly tables and derive efficiency, defect rate,
/// downtime per unit and the within-(plant, month) performance rank
pub fn compute_kpis(
    production: &[MonthlyProductionAggregate],
    quality: &[MonthlyQualityAggregate],
) -> Vec<KpiRecord> {
    let quality_index: HashMap<JoinKey<'_>, &MonthlyQualityAggregate> = quality
        .iter()
        .map(|aggregate| {
            (
                (
                    aggregate.plant_id.as_str(),
                    aggregate.product_code_std.as_str(),
                    aggregate.product_family.as_str(),
                    aggregate.month.as_str(),
                ),
                aggregate,
            )
        })
        .collect();

    let mut matched = 0usize;
    let records: Vec<KpiRecord> = production
        .iter()
        .map(|aggregate| {
            let key = (
                aggregate.plant_id.as_str(),
                aggregate.product_code_std.as_str(),
                aggregate.product_family.as_str(),
                aggregate.month.as_str(),
            );
            let quality_match = quality_index.get(&key).copied();
            if quality_match.is_some() {
                matched += 1;
            }
            derive_kpis(aggregate, quality_match)
        })
        .collect();

    debug!(
        "KPI join matched {} of {} production aggregates to quality aggregates",
        matched,
        records.len()
    );

    let records = assign_performance_ranks(records);

    info!("Derived KPIs for {} monthly records", records.len());
    records
}

/// KPIs for one production aggregate and its optional quality match
pub fn derive_kpis(
    production: &MonthlyProductionAggregate,
    quality: Option<&MonthlyQualityAggregate>,
) -> KpiRecord {
    let units_inspected = quality.map(|q| q.units_inspected);
    let defect_units = quality.map(|q| q.defect_units);

    KpiRecord {
        plant_id: production.plant_id.clone(),
        production_line: production.production_line.clone(),
        product_code_std: production.product_code_std.clone(),
        product_family: production.product_family.clone(),
        month: production.month.clone(),
        units_produced: production.units_produced,
        planned_units: production.planned_units,
        downtime_minutes: production.downtime_minutes,
        units_inspected,
        defect_units,
        production_efficiency: production.units_produced / production.planned_units,
        defect_rate: defect_units
            .zip(units_inspected)
            .map(|(defects, inspected)| defects / inspected),
        downtime_per_unit: production.downtime_minutes / production.units_produced,
        performance_rank: None,
    }
}

/// Assign dense performance ranks within each (plant, month) group
///
/// Phase one partitions record positions by group; phase two sorts each
/// partition by efficiency, highest first, and walks equal-value runs.
/// NaN efficiencies are left unranked.
pub fn assign_performance_ranks(mut records: Vec<KpiRecord>) -> Vec<KpiRecord> {
    let mut partitions: HashMap<(String, String), Vec<usize>> = HashMap::new();
    for (position, record) in records.iter().enumerate() {
        partitions
            .entry((record.plant_id.clone(), record.month.clone()))
            .or_default()
            .push(position);
    }

    for positions in partitions.into_values() {
        let efficiencies: Vec<f64> = positions
            .iter()
            .map(|&position| records[position].production_efficiency)
            .collect();

        for (offset, rank) in dense_rank_descending(&efficiencies).into_iter().enumerate() {
            records[positions[offset]].performance_rank = rank;
        }
    }

    records
}

/// Dense ranks for a slice of values, highest value first
///
/// Ties share a rank and the next distinct value takes the following rank.
/// NaN values get `None`.
pub fn dense_rank_descending(values: &[f64]) -> Vec<Option<u32>> {
    let mut order: Vec<usize> = (0..values.len())
        .filter(|&index| !values[index].is_nan())
        .collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let mut ranks = vec![None; values.len()];
    let mut rank = 0u32;
    let mut previous: Option<f64> = None;

    for index in order {
        let value = values[index];
        if previous != Some(value) {
            rank += 1;
            previous = Some(value);
        }
        ranks[index] = Some(rank);
    }

    ranks
}
