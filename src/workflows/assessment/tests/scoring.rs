use super::common::*;
use crate::workflows::assessment::domain::{CandidateStatus, Construct, Cutline, Severity};
use crate::workflows::assessment::scoring::{
    determine_status, evaluate_cutline, EXTREME_LOW_CATEGORY,
};
use crate::workflows::assessment::ScoringEngine;

#[test]
fn perfect_responses_reach_top_band_and_recommend() {
    let engine = full_credit_engine();
    let catalog = catalog();
    let outcome = engine.score(
        &assessment("asm-a", strong_submission(FIELD_TECHNICIAN)),
        &catalog,
    );

    assert_eq!(outcome.construct_scores.len(), Construct::ALL.len());
    for score in &outcome.construct_scores {
        assert_eq!(score.raw_score, 1.0, "{:?}", score.construct);
        assert!(
            score.percentile >= 95,
            "{:?} only reached {}",
            score.construct,
            score.percentile
        );
    }
    assert!(outcome.red_flags.is_empty());
    assert_eq!(outcome.status, CandidateStatus::Recommended);
    assert!(outcome.prediction.is_some());
}

#[test]
fn composites_are_produced_for_every_configured_role() {
    let engine = full_credit_engine();
    let catalog = catalog();
    let outcome = engine.score(
        &assessment("asm-roles", strong_submission(FIELD_TECHNICIAN)),
        &catalog,
    );

    assert_eq!(outcome.composite_scores.len(), catalog.roles.len());
    for composite in &outcome.composite_scores {
        assert!(composite.passed, "{} failed", composite.role);
        assert!(composite.percentile >= 95);
    }
    assert!(outcome.composite_for("systems-analyst").is_some());
}

#[test]
fn one_extreme_low_construct_blocks_advancement() {
    let engine = full_credit_engine();
    let catalog = catalog();
    let outcome = engine.score(
        &assessment(
            "asm-b",
            submission_weak_on(FIELD_TECHNICIAN, Construct::SpatialReasoning),
        ),
        &catalog,
    );

    let spatial = outcome
        .construct_scores
        .iter()
        .find(|score| score.construct == Construct::SpatialReasoning)
        .expect("spatial scored");
    assert!(spatial.percentile < 10);

    let critical = outcome
        .red_flags
        .iter()
        .find(|flag| flag.severity == Severity::Critical)
        .expect("critical flag raised");
    assert_eq!(critical.category, EXTREME_LOW_CATEGORY);
    assert_eq!(critical.constructs, vec![Construct::SpatialReasoning]);
    assert_eq!(outcome.status, CandidateStatus::DoNotAdvance);
}

#[test]
fn low_ethics_raises_both_rule_flags() {
    let engine = full_credit_engine();
    let catalog = catalog();
    let outcome = engine.score(
        &assessment(
            "asm-ethics",
            submission_weak_on(FIELD_TECHNICIAN, Construct::EthicalJudgment),
        ),
        &catalog,
    );

    let severities: Vec<Severity> = outcome.red_flags.iter().map(|flag| flag.severity).collect();
    assert!(severities.contains(&Severity::Critical));
    assert!(severities.contains(&Severity::Warning));
    assert_eq!(outcome.status, CandidateStatus::DoNotAdvance);
}

#[test]
fn near_miss_cutline_routes_to_review() {
    let scores = profile(
        70,
        &[
            (Construct::LearningVelocity, 62),
            (Construct::SystemsDiagnostics, 58),
            (Construct::PatternRecognition, 58),
            (Construct::QuantitativeReasoning, 58),
            (Construct::SpatialReasoning, 58),
            (Construct::MechanicalReasoning, 58),
            (Construct::ProceduralReliability, 80),
            (Construct::EthicalJudgment, 80),
        ],
    );
    let cutline = Cutline {
        technical_aptitude: 60,
        behavioral_integrity: 60,
        learning_velocity: 60,
        overall_minimum: None,
    };

    let evaluation = evaluate_cutline(&scores, &cutline);
    assert_eq!(evaluation.technical_aptitude_average, 58);
    assert_eq!(evaluation.behavioral_integrity_average, 80);
    assert_eq!(evaluation.distance, -2);
    assert!(!evaluation.passed);
    assert_eq!(
        determine_status(true, &[], &evaluation),
        CandidateStatus::ReviewRequired
    );
}

#[test]
fn incomplete_assessment_produces_no_rows() {
    let engine = ScoringEngine::default();
    let catalog = catalog();
    let outcome = engine.score(
        &assessment("asm-d", incomplete_submission(FIELD_TECHNICIAN)),
        &catalog,
    );

    assert_eq!(outcome.status, CandidateStatus::Incomplete);
    assert!(outcome.construct_scores.is_empty());
    assert!(outcome.composite_scores.is_empty());
    assert!(outcome.red_flags.is_empty());
    assert!(outcome.prediction.is_none());
    assert!(outcome.cutline.is_none());
}

#[test]
fn rescoring_is_deterministic() {
    let engine = ScoringEngine::default();
    let catalog = catalog();
    let assessment = assessment(
        "asm-repeat",
        submission_weak_on(FIELD_TECHNICIAN, Construct::CognitiveFlexibility),
    );

    let first = engine.score(&assessment, &catalog);
    let second = engine.score(&assessment, &catalog);
    assert_eq!(first, second);
}

#[test]
fn unknown_items_are_skipped() {
    let engine = full_credit_engine();
    let catalog = catalog();
    let mut submission = strong_submission(FIELD_TECHNICIAN);
    let mut stray = submission.responses[0].clone();
    stray.item_id.0 = "retired-item-99".to_string();
    submission.responses.push(stray);

    let outcome = engine.score(&assessment("asm-stray", submission), &catalog);
    assert_eq!(outcome.scored_items.len(), catalog.items.len());
    assert_eq!(outcome.status, CandidateStatus::Recommended);
}

#[test]
fn unconfigured_role_is_scored_without_gating() {
    let engine = full_credit_engine();
    let catalog = catalog();
    let outcome = engine.score(
        &assessment("asm-norole", strong_submission("night-auditor")),
        &catalog,
    );

    let cutline = outcome.cutline.expect("ungated evaluation recorded");
    assert!(cutline.passed);
    assert_eq!(cutline.distance, 0);
    assert_eq!(outcome.status, CandidateStatus::Recommended);
}

#[test]
fn production_heuristic_caps_free_text_credit() {
    let engine = ScoringEngine::default();
    let catalog = catalog();
    let outcome = engine.score(
        &assessment("asm-heuristic", strong_submission(FIELD_TECHNICIAN)),
        &catalog,
    );

    let flexibility = outcome
        .construct_scores
        .iter()
        .find(|score| score.construct == Construct::CognitiveFlexibility)
        .expect("flexibility scored");
    // three correct choices plus one 0.7 free-text answer
    assert!((flexibility.raw_score - 0.93).abs() < 0.011);
    assert!(flexibility.percentile < 99);
}
