//! The scoring pipeline: item scoring, construct aggregation, composites, cutline gating,
//! red flags, and the final disposition.

mod aggregate;
mod composite;
mod config;
mod cutline;
mod flags;
mod item;
mod norms;
mod status;

pub use aggregate::aggregate_constructs;
pub use composite::composite_percentile;
pub use config::{FlagRules, NormTable, ScoringConfig};
pub use cutline::{apply_overall_minimum, evaluate_cutline, layer_average, CutlineEvaluation};
pub use flags::{detect_red_flags, BEHAVIORAL_CONCERN_CATEGORY, EXTREME_LOW_CATEGORY};
pub use item::{score_item, score_response, FreeTextScorer, WordCountHeuristic, TIMED_CREDIT_FLOOR};
pub use norms::{LogisticNormCurve, NormCurve, MAX_PERCENTILE, MIN_PERCENTILE};
pub use status::{determine_status, REVIEW_GRACE_BAND};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::catalog::ScoringCatalog;
use super::domain::{
    Assessment, AssessmentId, CandidateStatus, CompositeScore, ConstructScore, Cutline, RedFlag,
    RoleProfile, ScoredItem,
};
use super::prediction::{self, Prediction};

/// Everything a scoring run derives from one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringOutcome {
    pub assessment_id: AssessmentId,
    pub status: CandidateStatus,
    pub construct_scores: Vec<ConstructScore>,
    pub composite_scores: Vec<CompositeScore>,
    /// Gating detail for the candidate's assigned role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutline: Option<CutlineEvaluation>,
    pub red_flags: Vec<RedFlag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Prediction>,
    /// Per-item scores from this run; ephemeral and never the source of truth.
    #[serde(skip)]
    pub scored_items: Vec<ScoredItem>,
}

impl ScoringOutcome {
    fn incomplete(assessment_id: AssessmentId) -> Self {
        Self {
            assessment_id,
            status: CandidateStatus::Incomplete,
            construct_scores: Vec::new(),
            composite_scores: Vec::new(),
            cutline: None,
            red_flags: Vec::new(),
            prediction: None,
            scored_items: Vec::new(),
        }
    }

    pub fn composite_for(&self, role: &str) -> Option<&CompositeScore> {
        self.composite_scores
            .iter()
            .find(|composite| composite.role.as_str() == role)
    }
}

/// Stateless engine: a pure function of (item bank, responses, role configuration).
pub struct ScoringEngine {
    config: ScoringConfig,
    norms: Box<dyn NormCurve>,
    free_text: Box<dyn FreeTextScorer>,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        let norms = Box::new(LogisticNormCurve::new(config.norms.clone()));
        Self {
            config,
            norms,
            free_text: Box::new(WordCountHeuristic),
        }
    }

    /// Replace the norm lookup, e.g. with a norm-referenced table.
    pub fn with_norm_curve(mut self, norms: impl NormCurve + 'static) -> Self {
        self.norms = Box::new(norms);
        self
    }

    /// Replace the provisional free-text heuristic with rubric or model scoring.
    pub fn with_free_text_scorer(mut self, scorer: impl FreeTextScorer + 'static) -> Self {
        self.free_text = Box::new(scorer);
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, assessment: &Assessment, catalog: &ScoringCatalog) -> ScoringOutcome {
        if !assessment.completed {
            debug!(assessment_id = %assessment.id.0, "assessment incomplete; skipping scoring");
            return ScoringOutcome::incomplete(assessment.id.clone());
        }

        let scored_items = self.score_items(assessment, catalog);
        let construct_scores = aggregate_constructs(&scored_items, self.norms.as_ref());

        let composite_scores: Vec<CompositeScore> = catalog
            .roles
            .roles()
            .map(|role| {
                let evaluation = self.evaluate_role(&construct_scores, role);
                CompositeScore {
                    role: role.slug.clone(),
                    percentile: composite_percentile(&construct_scores, &role.weights),
                    passed: evaluation.passed,
                    distance: evaluation.distance,
                }
            })
            .collect();

        let cutline = match catalog.roles.get(&assessment.role) {
            Some(role) => self.evaluate_role(&construct_scores, role),
            None => {
                warn!(
                    assessment_id = %assessment.id.0,
                    role = %assessment.role.0,
                    "assigned role not configured; cutline not gated"
                );
                CutlineEvaluation::ungated(&construct_scores)
            }
        };

        let red_flags = detect_red_flags(&construct_scores, &self.config.flags);
        let prediction = prediction::predict(&construct_scores);
        let status = determine_status(true, &red_flags, &cutline);

        debug!(
            assessment_id = %assessment.id.0,
            constructs = construct_scores.len(),
            flags = red_flags.len(),
            status = status.label(),
            "scoring pipeline finished"
        );

        ScoringOutcome {
            assessment_id: assessment.id.clone(),
            status,
            construct_scores,
            composite_scores,
            cutline: Some(cutline),
            red_flags,
            prediction: Some(prediction),
            scored_items,
        }
    }

    fn score_items(&self, assessment: &Assessment, catalog: &ScoringCatalog) -> Vec<ScoredItem> {
        assessment
            .responses
            .iter()
            .filter_map(|response| match catalog.items.get(&response.item_id) {
                Some(item) => Some(score_item(item, response, self.free_text.as_ref())),
                None => {
                    warn!(
                        assessment_id = %assessment.id.0,
                        item_id = %response.item_id.0,
                        "response references unknown item; skipped"
                    );
                    None
                }
            })
            .collect()
    }

    fn evaluate_role(&self, scores: &[ConstructScore], role: &RoleProfile) -> CutlineEvaluation {
        match role.cutline.as_ref() {
            Some(cutline) => self.gate(scores, role, cutline),
            None => CutlineEvaluation::ungated(scores),
        }
    }

    fn gate(&self, scores: &[ConstructScore], role: &RoleProfile, cutline: &Cutline) -> CutlineEvaluation {
        let evaluation = evaluate_cutline(scores, cutline);
        if self.config.enforce_overall_minimum {
            let composite = composite_percentile(scores, &role.weights);
            apply_overall_minimum(evaluation, cutline, composite)
        } else {
            evaluation
        }
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}
