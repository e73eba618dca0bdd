//! Composite risk scoring
//!
//! risk_score = clamp((1 - efficiency) * w_e + defect_rate * w_d + downtime_per_unit * w_t)
//! with default weights 50, 30 and 20 and a [0, 100] clamp. Missing or NaN
//! KPI values count as zero for scoring only; the KPI columns themselves are
//! carried through unchanged.
//!
//! Bands are closed on the right: LOW is [0, 30], MEDIUM (30, 60] and HIGH
//! (60, 100]. A score of exactly zero is LOW.

use crate::config::RiskConfig;
use crate::models::{KpiRecord, MonthlyFactRecord, RiskLevel};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Scores KPI records and assigns risk bands
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    config: RiskConfig,
}

fn scoring_value(value: Option<f64>) -> f64 {
    value.filter(|v| !v.is_nan()).unwrap_or(0.0)
}

impl RiskScorer {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Bounded composite score from the three KPIs
    ///
    /// A combination that is still NaN after substituting zeros (only
    /// reachable through opposite infinite artifacts) scores the maximum.
    pub fn score(
        &self,
        efficiency: Option<f64>,
        defect_rate: Option<f64>,
        downtime_per_unit: Option<f64>,
    ) -> f64 {
        let raw = (1.0 - scoring_value(efficiency)) * self.config.efficiency_weight
            + scoring_value(defect_rate) * self.config.defect_weight
            + scoring_value(downtime_per_unit) * self.config.downtime_weight;

        if raw.is_nan() {
            debug!("Risk score undefined; assigning maximum score");
            return self.config.max_score;
        }

        raw.clamp(self.config.min_score, self.config.max_score)
    }

    /// Risk band for a clamped score
    pub fn level(&self, score: f64) -> RiskLevel {
        if score <= self.config.low_upper {
            RiskLevel::Low
        } else if score <= self.config.medium_upper {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    /// Score every KPI record into a final fact record
    pub fn apply(&self, records: Vec<KpiRecord>) -> Vec<MonthlyFactRecord> {
        let facts: Vec<MonthlyFactRecord> = records
            .into_iter()
            .map(|kpi| {
                let score = self.score(
                    Some(kpi.production_efficiency),
                    kpi.defect_rate,
                    Some(kpi.downtime_per_unit),
                );
                let level = self.level(score);
                MonthlyFactRecord::from_kpi(kpi, score, level)
            })
            .collect();

        let mut distribution: BTreeMap<RiskLevel, usize> = BTreeMap::new();
        for fact in &facts {
            *distribution.entry(fact.risk_level).or_default() += 1;
        }
        info!(
            "Risk scoring complete: {} records ({} LOW, {} MEDIUM, {} HIGH)",
            facts.len(),
            distribution.get(&RiskLevel::Low).copied().unwrap_or(0),
            distribution.get(&RiskLevel::Medium).copied().unwrap_or(0),
            distribution.get(&RiskLevel::High).copied().unwrap_or(0)
        );

        facts
    }
}
