//! Forward-looking heuristics derived from construct percentiles.
//!
//! Each predictor is independent: it reads a handful of named percentiles, defaults any
//! missing construct to the neutral midpoint, and reports the exact inputs it used so
//! narratives and audits can cite them.

mod attrition;
mod ceiling;
mod ramp;
mod supervision;

pub use attrition::{predict_attrition_risk, AttritionRiskLevel, AttritionRiskPrediction};
pub use ceiling::{predict_performance_ceiling, PerformanceCeilingLevel, PerformanceCeilingPrediction};
pub use ramp::{predict_ramp_time, RampTimeLabel, RampTimePrediction};
pub use supervision::{predict_supervision_load, SupervisionLevel, SupervisionPrediction};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Construct, ConstructScore};

/// Percentile assumed for constructs the candidate was not measured on.
pub const NEUTRAL_PERCENTILE: u8 = 50;

/// The four sub-predictions for one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub ramp_time: RampTimePrediction,
    pub supervision: SupervisionPrediction,
    pub performance_ceiling: PerformanceCeilingPrediction,
    pub attrition_risk: AttritionRiskPrediction,
}

pub fn predict(scores: &[ConstructScore]) -> Prediction {
    let lookup = PercentileLookup::new(scores);
    Prediction {
        ramp_time: predict_ramp_time(&lookup),
        supervision: predict_supervision_load(&lookup),
        performance_ceiling: predict_performance_ceiling(&lookup),
        attrition_risk: predict_attrition_risk(&lookup),
    }
}

/// Read-only view over construct percentiles with neutral defaulting.
pub struct PercentileLookup {
    percentiles: BTreeMap<Construct, u8>,
}

impl PercentileLookup {
    pub fn new(scores: &[ConstructScore]) -> Self {
        Self {
            percentiles: scores
                .iter()
                .map(|score| (score.construct, score.percentile))
                .collect(),
        }
    }

    pub fn get(&self, construct: Construct) -> u8 {
        self.percentiles
            .get(&construct)
            .copied()
            .unwrap_or(NEUTRAL_PERCENTILE)
    }

    /// Resolve the given constructs, returning the values used keyed by construct.
    pub(crate) fn inputs(&self, constructs: &[Construct]) -> BTreeMap<Construct, u8> {
        constructs
            .iter()
            .map(|construct| (*construct, self.get(*construct)))
            .collect()
    }
}

pub(crate) fn weighted_blend(lookup: &PercentileLookup, weights: &[(Construct, f64)]) -> f64 {
    weights
        .iter()
        .map(|(construct, weight)| f64::from(lookup.get(*construct)) * weight)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_constructs_default_to_neutral() {
        let lookup = PercentileLookup::new(&[]);
        assert_eq!(lookup.get(Construct::LearningVelocity), NEUTRAL_PERCENTILE);
    }

    #[test]
    fn empty_scores_still_predict() {
        let prediction = predict(&[]);
        assert_eq!(prediction.ramp_time.inputs.len(), 3);
        assert_eq!(
            prediction.supervision.inputs.get(&Construct::EthicalJudgment),
            Some(&NEUTRAL_PERCENTILE)
        );
        assert_eq!(prediction.attrition_risk.risk_score, 50);
        assert!(prediction.attrition_risk.factors.is_empty());
    }
}
