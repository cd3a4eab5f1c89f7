use super::common::*;
use crate::workflows::assessment::domain::Construct;
use crate::workflows::assessment::prediction::{
    predict, AttritionRiskLevel, PerformanceCeilingLevel, RampTimeLabel, SupervisionLevel,
};

#[test]
fn missing_constructs_default_to_neutral() {
    assert_eq!(predict(&[]), predict(&profile(50, &[])));
}

#[test]
fn neutral_profile_lands_mid_scale() {
    let prediction = predict(&profile(50, &[]));

    assert_eq!(prediction.ramp_time.weeks, 10);
    assert_eq!(prediction.ramp_time.label, RampTimeLabel::Standard);
    assert_eq!(prediction.supervision.level, SupervisionLevel::Moderate);
    assert_eq!(prediction.supervision.confidence, 0.5);
    assert_eq!(
        prediction.performance_ceiling.level,
        PerformanceCeilingLevel::Solid
    );
    assert_eq!(prediction.attrition_risk.risk_score, 50);
    assert_eq!(prediction.attrition_risk.level, AttritionRiskLevel::Elevated);
    assert!(prediction.attrition_risk.factors.is_empty());
}

#[test]
fn strong_profile_ramps_fast_but_flags_restlessness() {
    let prediction = predict(&profile(97, &[]));

    assert_eq!(prediction.ramp_time.weeks, 3);
    assert_eq!(prediction.ramp_time.label, RampTimeLabel::Accelerated);
    assert_eq!(prediction.supervision.level, SupervisionLevel::Minimal);
    assert_eq!(
        prediction.performance_ceiling.level,
        PerformanceCeilingLevel::Exceptional
    );
    // -10 -5 -5 +10 from the 50 baseline
    assert_eq!(prediction.attrition_risk.risk_score, 40);
    assert_eq!(prediction.attrition_risk.level, AttritionRiskLevel::Moderate);
    assert!(prediction
        .attrition_risk
        .factors
        .iter()
        .any(|factor| factor.contains("restlessness")));
}

#[test]
fn weak_behavioral_profile_needs_close_supervision() {
    let prediction = predict(&profile(
        60,
        &[
            (Construct::MetacognitiveCalibration, 20),
            (Construct::ProceduralReliability, 15),
            (Construct::EthicalJudgment, 20),
        ],
    ));

    assert_eq!(prediction.supervision.level, SupervisionLevel::High);
    assert_eq!(prediction.attrition_risk.level, AttritionRiskLevel::High);
    assert_eq!(
        prediction.supervision.inputs.get(&Construct::ProceduralReliability),
        Some(&15)
    );
}

#[test]
fn engine_attaches_prediction_from_construct_scores() {
    let engine = full_credit_engine();
    let catalog = catalog();
    let outcome = engine.score(
        &assessment("asm-predict", strong_submission(FIELD_TECHNICIAN)),
        &catalog,
    );

    let prediction = outcome.prediction.expect("prediction present");
    assert_eq!(prediction, predict(&outcome.construct_scores));
    assert_eq!(prediction.ramp_time.label, RampTimeLabel::Accelerated);
}
