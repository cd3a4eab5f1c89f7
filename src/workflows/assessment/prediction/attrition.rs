use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::Construct;
use super::PercentileLookup;

const BASELINE_RISK: i16 = 50;
const MIN_RISK: i16 = 10;
const MAX_RISK: i16 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttritionRiskLevel {
    Low,
    Moderate,
    Elevated,
    High,
}

impl AttritionRiskLevel {
    fn for_score(score: i16) -> Self {
        if score < 30 {
            Self::Low
        } else if score < 50 {
            Self::Moderate
        } else if score < 70 {
            Self::Elevated
        } else {
            Self::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AttritionRiskLevel::Low => "Low attrition risk",
            AttritionRiskLevel::Moderate => "Moderate attrition risk",
            AttritionRiskLevel::Elevated => "Elevated attrition risk",
            AttritionRiskLevel::High => "High attrition risk",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttritionRiskPrediction {
    pub level: AttritionRiskLevel,
    pub risk_score: u8,
    pub inputs: BTreeMap<Construct, u8>,
    pub factors: Vec<String>,
}

struct Adjustment {
    construct: Construct,
    applies: fn(u8) -> bool,
    delta: i16,
    reason: &'static str,
}

const ADJUSTMENTS: [Adjustment; 8] = [
    Adjustment {
        construct: Construct::ProceduralReliability,
        applies: |p| p >= 70,
        delta: -10,
        reason: "High procedural reliability suggests steady role commitment",
    },
    Adjustment {
        construct: Construct::ProceduralReliability,
        applies: |p| p < 30,
        delta: 15,
        reason: "Low procedural reliability correlates with early exits",
    },
    Adjustment {
        construct: Construct::EthicalJudgment,
        applies: |p| p >= 70,
        delta: -5,
        reason: "Strong ethical judgment aligns with organizational fit",
    },
    Adjustment {
        construct: Construct::EthicalJudgment,
        applies: |p| p < 30,
        delta: 10,
        reason: "Weak ethical judgment raises separation risk",
    },
    Adjustment {
        construct: Construct::ExecutiveControl,
        applies: |p| p >= 70,
        delta: -5,
        reason: "Strong executive control supports sustained performance",
    },
    Adjustment {
        construct: Construct::ExecutiveControl,
        applies: |p| p < 30,
        delta: 10,
        reason: "Low executive control increases frustration risk",
    },
    Adjustment {
        construct: Construct::CognitiveFlexibility,
        applies: |p| p > 85,
        delta: 10,
        reason: "Very high cognitive flexibility may signal restlessness in routine work",
    },
    Adjustment {
        construct: Construct::CognitiveFlexibility,
        applies: |p| p < 20,
        delta: 5,
        reason: "Low cognitive flexibility may struggle with change",
    },
];

pub fn predict_attrition_risk(lookup: &PercentileLookup) -> AttritionRiskPrediction {
    let inputs = lookup.inputs(&[
        Construct::ProceduralReliability,
        Construct::EthicalJudgment,
        Construct::ExecutiveControl,
        Construct::CognitiveFlexibility,
    ]);

    let mut risk = BASELINE_RISK;
    let mut factors = Vec::new();
    for adjustment in &ADJUSTMENTS {
        let percentile = lookup.get(adjustment.construct);
        if (adjustment.applies)(percentile) {
            risk += adjustment.delta;
            factors.push(format!(
                "{} ({} at {percentile}, {:+})",
                adjustment.reason,
                adjustment.construct.label(),
                adjustment.delta
            ));
        }
    }

    let risk = risk.clamp(MIN_RISK, MAX_RISK);

    AttritionRiskPrediction {
        level: AttritionRiskLevel::for_score(risk),
        risk_score: risk as u8,
        inputs,
        factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::assessment::domain::ConstructScore;

    fn lookup(entries: &[(Construct, u8)]) -> PercentileLookup {
        let scores: Vec<ConstructScore> = entries
            .iter()
            .map(|(construct, percentile)| ConstructScore {
                construct: *construct,
                layer: construct.layer(),
                raw_score: 0.5,
                percentile: *percentile,
                item_count: 1,
                mean_latency_ms: 0,
            })
            .collect();
        PercentileLookup::new(&scores)
    }

    #[test]
    fn stable_profile_bottoms_out_at_moderate() {
        let prediction = predict_attrition_risk(&lookup(&[
            (Construct::ProceduralReliability, 80),
            (Construct::EthicalJudgment, 75),
            (Construct::ExecutiveControl, 72),
            (Construct::CognitiveFlexibility, 60),
        ]));
        assert_eq!(prediction.risk_score, 30);
        assert_eq!(prediction.level, AttritionRiskLevel::Moderate);
        assert_eq!(prediction.factors.len(), 3);
    }

    #[test]
    fn risk_clamps_at_ceiling() {
        let prediction = predict_attrition_risk(&lookup(&[
            (Construct::ProceduralReliability, 5),
            (Construct::EthicalJudgment, 5),
            (Construct::ExecutiveControl, 5),
            (Construct::CognitiveFlexibility, 95),
        ]));
        assert_eq!(prediction.risk_score, 95);
        assert_eq!(prediction.level, AttritionRiskLevel::High);
        assert_eq!(prediction.factors.len(), 4);
    }

    #[test]
    fn very_high_flexibility_adds_restlessness_factor() {
        let prediction = predict_attrition_risk(&lookup(&[(Construct::CognitiveFlexibility, 90)]));
        assert_eq!(prediction.risk_score, 60);
        assert_eq!(prediction.level, AttritionRiskLevel::Elevated);
        assert!(prediction.factors[0].contains("restlessness"));
        assert!(prediction.factors[0].contains("+10"));
    }

    #[test]
    fn neutral_profile_keeps_baseline() {
        let prediction = predict_attrition_risk(&lookup(&[]));
        assert_eq!(prediction.risk_score, 50);
        assert_eq!(prediction.level, AttritionRiskLevel::Elevated);
    }
}
