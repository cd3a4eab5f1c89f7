use serde::{Deserialize, Serialize};

use super::super::domain::{Construct, ConstructScore, Cutline, Layer};

/// Gating result for one role. `distance` is the worst of the gating deltas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutlineEvaluation {
    pub passed: bool,
    pub distance: i16,
    pub technical_aptitude_average: u8,
    pub behavioral_integrity_average: u8,
    pub learning_velocity: u8,
    /// Set only when the overall minimum was gated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_minimum_delta: Option<i16>,
}

impl CutlineEvaluation {
    /// Result used when a role has no cutline configured: no gating applies.
    pub fn ungated(scores: &[ConstructScore]) -> Self {
        Self {
            passed: true,
            distance: 0,
            technical_aptitude_average: layer_average(scores, Layer::TechnicalAptitude),
            behavioral_integrity_average: layer_average(scores, Layer::BehavioralIntegrity),
            learning_velocity: construct_percentile(scores, Construct::LearningVelocity),
            overall_minimum_delta: None,
        }
    }
}

/// Compare layer averages and learning velocity against a role's thresholds.
///
/// Missing constructs count as percentile 0, which always fails a non-zero threshold.
pub fn evaluate_cutline(scores: &[ConstructScore], cutline: &Cutline) -> CutlineEvaluation {
    let technical = layer_average(scores, Layer::TechnicalAptitude);
    let behavioral = layer_average(scores, Layer::BehavioralIntegrity);
    let learning = construct_percentile(scores, Construct::LearningVelocity);

    let deltas = [
        delta(technical, cutline.technical_aptitude),
        delta(behavioral, cutline.behavioral_integrity),
        delta(learning, cutline.learning_velocity),
    ];
    let distance = deltas.iter().copied().min().unwrap_or(0);

    CutlineEvaluation {
        passed: deltas.iter().all(|delta| *delta >= 0),
        distance,
        technical_aptitude_average: technical,
        behavioral_integrity_average: behavioral,
        learning_velocity: learning,
        overall_minimum_delta: None,
    }
}

/// Fold the reserved overall-minimum floor into an evaluation as a fourth dimension.
pub fn apply_overall_minimum(
    mut evaluation: CutlineEvaluation,
    cutline: &Cutline,
    composite: u8,
) -> CutlineEvaluation {
    if let Some(minimum) = cutline.overall_minimum {
        let overall = delta(composite, minimum);
        evaluation.passed = evaluation.passed && overall >= 0;
        evaluation.distance = evaluation.distance.min(overall);
        evaluation.overall_minimum_delta = Some(overall);
    }
    evaluation
}

/// Unweighted mean percentile of the constructs present in `layer`, floored.
///
/// Flooring keeps the gate exact: for an integer threshold `t`, the floored mean is at
/// least `t` only when the unrounded mean is, so a 59.5 average never clears a 60 cutline.
pub fn layer_average(scores: &[ConstructScore], layer: Layer) -> u8 {
    let (sum, count) = scores
        .iter()
        .filter(|score| score.layer == layer)
        .fold((0u32, 0u32), |(sum, count), score| {
            (sum + u32::from(score.percentile), count + 1)
        });

    if count == 0 {
        return 0;
    }
    (sum / count) as u8
}

fn construct_percentile(scores: &[ConstructScore], construct: Construct) -> u8 {
    scores
        .iter()
        .find(|score| score.construct == construct)
        .map(|score| score.percentile)
        .unwrap_or(0)
}

fn delta(value: u8, threshold: u8) -> i16 {
    i16::from(value) - i16::from(threshold)
}
