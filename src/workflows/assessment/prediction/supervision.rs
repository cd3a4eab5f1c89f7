use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::Construct;
use super::{weighted_blend, PercentileLookup, NEUTRAL_PERCENTILE};

const BLEND: [(Construct, f64); 3] = [
    (Construct::MetacognitiveCalibration, 0.4),
    (Construct::ProceduralReliability, 0.3),
    (Construct::EthicalJudgment, 0.3),
];

/// Expected supervision need, ordered from least to most oversight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupervisionLevel {
    Minimal,
    Low,
    Moderate,
    High,
}

impl SupervisionLevel {
    fn for_score(score: f64) -> Self {
        if score >= 75.0 {
            Self::Minimal
        } else if score >= 55.0 {
            Self::Low
        } else if score >= 35.0 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SupervisionLevel::Minimal => "Minimal supervision",
            SupervisionLevel::Low => "Low supervision",
            SupervisionLevel::Moderate => "Moderate supervision",
            SupervisionLevel::High => "High supervision",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupervisionPrediction {
    pub level: SupervisionLevel,
    pub blended_score: u8,
    /// Grows with distance from the neutral midpoint; 0.5 to 0.95.
    pub confidence: f64,
    pub inputs: BTreeMap<Construct, u8>,
    pub factors: Vec<String>,
}

pub fn predict_supervision_load(lookup: &PercentileLookup) -> SupervisionPrediction {
    let constructs: Vec<Construct> = BLEND.iter().map(|(construct, _)| *construct).collect();
    let inputs = lookup.inputs(&constructs);
    let score = weighted_blend(lookup, &BLEND);
    let level = SupervisionLevel::for_score(score);

    let spread = (score - f64::from(NEUTRAL_PERCENTILE)).abs() / 100.0;
    let confidence = ((0.5 + spread).clamp(0.5, 0.95) * 100.0).round() / 100.0;

    let factors = BLEND
        .iter()
        .map(|(construct, weight)| {
            format!(
                "{} at {} weighted {:.0}%",
                construct.label(),
                lookup.get(*construct),
                weight * 100.0
            )
        })
        .collect();

    SupervisionPrediction {
        level,
        blended_score: score.round() as u8,
        confidence,
        inputs,
        factors,
    }
}
