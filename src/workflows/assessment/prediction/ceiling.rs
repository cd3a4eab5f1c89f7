use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::Construct;
use super::{weighted_blend, PercentileLookup};

const BLEND: [(Construct, f64); 4] = [
    (Construct::FluidReasoning, 0.35),
    (Construct::LearningVelocity, 0.25),
    (Construct::SystemsDiagnostics, 0.2),
    (Construct::MetacognitiveCalibration, 0.2),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceCeilingLevel {
    Limited,
    Solid,
    High,
    Exceptional,
}

impl PerformanceCeilingLevel {
    fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Exceptional
        } else if score >= 65.0 {
            Self::High
        } else if score >= 45.0 {
            Self::Solid
        } else {
            Self::Limited
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PerformanceCeilingLevel::Limited => "Suited to well-defined, stable work",
            PerformanceCeilingLevel::Solid => "Solid individual contributor",
            PerformanceCeilingLevel::High => "Strong growth trajectory",
            PerformanceCeilingLevel::Exceptional => "Leadership and specialist potential",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceCeilingPrediction {
    pub level: PerformanceCeilingLevel,
    pub label: String,
    pub blended_score: u8,
    pub inputs: BTreeMap<Construct, u8>,
    pub factors: Vec<String>,
}

pub fn predict_performance_ceiling(lookup: &PercentileLookup) -> PerformanceCeilingPrediction {
    let constructs: Vec<Construct> = BLEND.iter().map(|(construct, _)| *construct).collect();
    let inputs = lookup.inputs(&constructs);
    let score = weighted_blend(lookup, &BLEND);
    let level = PerformanceCeilingLevel::for_score(score);

    let mut factors = Vec::new();
    let strongest = BLEND
        .iter()
        .map(|(construct, _)| (*construct, lookup.get(*construct)))
        .max_by_key(|(_, percentile)| *percentile);
    let weakest = BLEND
        .iter()
        .map(|(construct, _)| (*construct, lookup.get(*construct)))
        .min_by_key(|(_, percentile)| *percentile);
    if let Some((construct, percentile)) = strongest {
        factors.push(format!("Strongest driver: {} ({percentile})", construct.label()));
    }
    if let Some((construct, percentile)) = weakest {
        factors.push(format!("Limiting factor: {} ({percentile})", construct.label()));
    }

    PerformanceCeilingPrediction {
        level,
        label: level.label().to_string(),
        blended_score: score.round() as u8,
        inputs,
        factors,
    }
}
