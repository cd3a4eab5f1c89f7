use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for a candidate's assessment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Identifier of an authored item in the item bank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub String);

/// URL-safe role key used to look up weights and cutlines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleSlug(pub String);

impl RoleSlug {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed grouping of constructs used by cutline gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    CoreCognitive,
    TechnicalAptitude,
    BehavioralIntegrity,
}

impl Layer {
    pub const fn label(self) -> &'static str {
        match self {
            Layer::CoreCognitive => "core_cognitive",
            Layer::TechnicalAptitude => "technical_aptitude",
            Layer::BehavioralIntegrity => "behavioral_integrity",
        }
    }
}

/// Measured dimension of ability or behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Construct {
    FluidReasoning,
    ExecutiveControl,
    CognitiveFlexibility,
    MetacognitiveCalibration,
    LearningVelocity,
    SystemsDiagnostics,
    PatternRecognition,
    QuantitativeReasoning,
    SpatialReasoning,
    MechanicalReasoning,
    ProceduralReliability,
    EthicalJudgment,
}

impl Construct {
    pub const ALL: [Construct; 12] = [
        Construct::FluidReasoning,
        Construct::ExecutiveControl,
        Construct::CognitiveFlexibility,
        Construct::MetacognitiveCalibration,
        Construct::LearningVelocity,
        Construct::SystemsDiagnostics,
        Construct::PatternRecognition,
        Construct::QuantitativeReasoning,
        Construct::SpatialReasoning,
        Construct::MechanicalReasoning,
        Construct::ProceduralReliability,
        Construct::EthicalJudgment,
    ];

    pub const fn layer(self) -> Layer {
        match self {
            Construct::FluidReasoning
            | Construct::ExecutiveControl
            | Construct::CognitiveFlexibility
            | Construct::MetacognitiveCalibration
            | Construct::LearningVelocity => Layer::CoreCognitive,
            Construct::SystemsDiagnostics
            | Construct::PatternRecognition
            | Construct::QuantitativeReasoning
            | Construct::SpatialReasoning
            | Construct::MechanicalReasoning => Layer::TechnicalAptitude,
            Construct::ProceduralReliability | Construct::EthicalJudgment => {
                Layer::BehavioralIntegrity
            }
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Construct::FluidReasoning => "fluid_reasoning",
            Construct::ExecutiveControl => "executive_control",
            Construct::CognitiveFlexibility => "cognitive_flexibility",
            Construct::MetacognitiveCalibration => "metacognitive_calibration",
            Construct::LearningVelocity => "learning_velocity",
            Construct::SystemsDiagnostics => "systems_diagnostics",
            Construct::PatternRecognition => "pattern_recognition",
            Construct::QuantitativeReasoning => "quantitative_reasoning",
            Construct::SpatialReasoning => "spatial_reasoning",
            Construct::MechanicalReasoning => "mechanical_reasoning",
            Construct::ProceduralReliability => "procedural_reliability",
            Construct::EthicalJudgment => "ethical_judgment",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Construct::FluidReasoning => "Fluid Reasoning",
            Construct::ExecutiveControl => "Executive Control",
            Construct::CognitiveFlexibility => "Cognitive Flexibility",
            Construct::MetacognitiveCalibration => "Metacognitive Calibration",
            Construct::LearningVelocity => "Learning Velocity",
            Construct::SystemsDiagnostics => "Systems Diagnostics",
            Construct::PatternRecognition => "Pattern Recognition",
            Construct::QuantitativeReasoning => "Quantitative Reasoning",
            Construct::SpatialReasoning => "Spatial Reasoning",
            Construct::MechanicalReasoning => "Mechanical Reasoning",
            Construct::ProceduralReliability => "Procedural Reliability",
            Construct::EthicalJudgment => "Ethical Judgment",
        }
    }

    pub fn in_layer(layer: Layer) -> impl Iterator<Item = Construct> {
        Self::ALL
            .into_iter()
            .filter(move |construct| construct.layer() == layer)
    }
}

/// Presentation format of an item, which determines how its response is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    SingleChoice,
    LikertScale,
    FreeText,
    AiFollowUp,
    TimedChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Foundational,
    Intermediate,
    Advanced,
}

/// Authored item definition. Items are configuration and never change once published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub construct: Construct,
    pub item_type: ItemType,
    #[serde(default)]
    pub correct_answer: Option<String>,
    /// Ordered options; for Likert scales the position is the scored value.
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub time_limit_seconds: Option<u32>,
    pub difficulty: DifficultyTier,
}

/// Candidate answer payload as captured by the assessment-taking flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResponsePayload {
    Selected(String),
    Text(String),
    /// The item's timer ran out before the candidate answered.
    Expired,
}

/// One candidate answer to one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResponse {
    pub item_id: ItemId,
    pub payload: ResponsePayload,
    #[serde(default)]
    pub latency_ms: Option<u32>,
    #[serde(default)]
    pub confidence: Option<u8>,
    /// Attached by the scoring run; absent on freshly captured responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_score: Option<f64>,
}

/// Derived per-item score; recomputed on every run and never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub item_id: ItemId,
    pub construct: Construct,
    pub raw_score: f64,
    pub latency_ms: Option<u32>,
}

/// Aggregated result for one construct within one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructScore {
    pub construct: Construct,
    pub layer: Layer,
    pub raw_score: f64,
    pub percentile: u8,
    pub item_count: u32,
    pub mean_latency_ms: u32,
}

/// Construct to integer weight mapping for a role. Expected to total 100 but never assumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleWeightSet(pub BTreeMap<Construct, u32>);

impl RoleWeightSet {
    pub fn weight(&self, construct: Construct) -> Option<u32> {
        self.0.get(&construct).copied()
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Construct, u32)> + '_ {
        self.0.iter().map(|(construct, weight)| (*construct, *weight))
    }
}

impl FromIterator<(Construct, u32)> for RoleWeightSet {
    fn from_iter<T: IntoIterator<Item = (Construct, u32)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Minimum-percentile gate a role requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cutline {
    pub technical_aptitude: u8,
    pub behavioral_integrity: u8,
    pub learning_velocity: u8,
    /// Reserved floor on the role composite; only gated when explicitly enabled.
    #[serde(default)]
    pub overall_minimum: Option<u8>,
}

/// Role configuration snapshot consumed by a scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleProfile {
    pub id: String,
    pub slug: RoleSlug,
    pub name: String,
    pub weights: RoleWeightSet,
    #[serde(default)]
    pub cutline: Option<Cutline>,
}

/// Role-specific fit number and gating result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub role: RoleSlug,
    pub percentile: u8,
    pub passed: bool,
    pub distance: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        }
    }
}

/// Rule-triggered integrity or behavioral concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedFlag {
    pub severity: Severity,
    pub category: String,
    pub title: String,
    pub description: String,
    pub constructs: Vec<Construct>,
}

/// Candidate disposition. `NotScored` is the only non-terminal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandidateStatus {
    NotScored,
    Recommended,
    ReviewRequired,
    DoNotAdvance,
    Incomplete,
}

impl CandidateStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CandidateStatus::NotScored => "not_scored",
            CandidateStatus::Recommended => "recommended",
            CandidateStatus::ReviewRequired => "review_required",
            CandidateStatus::DoNotAdvance => "do_not_advance",
            CandidateStatus::Incomplete => "incomplete",
        }
    }

    /// Ordering used to compare dispositions; higher is more favorable.
    pub const fn favorability(self) -> u8 {
        match self {
            CandidateStatus::Recommended => 3,
            CandidateStatus::ReviewRequired => 2,
            CandidateStatus::DoNotAdvance => 1,
            CandidateStatus::NotScored | CandidateStatus::Incomplete => 0,
        }
    }
}

/// Finalized response set handed over by the assessment-taking subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    pub candidate_id: CandidateId,
    pub role: RoleSlug,
    pub completed: bool,
    pub responses: Vec<ItemResponse>,
}

/// Stored assessment: the submission plus identity and capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub candidate_id: CandidateId,
    pub role: RoleSlug,
    pub completed: bool,
    pub responses: Vec<ItemResponse>,
    pub submitted_at: DateTime<Utc>,
}

impl Assessment {
    pub fn from_submission(
        id: AssessmentId,
        submission: AssessmentSubmission,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            candidate_id: submission.candidate_id,
            role: submission.role,
            completed: submission.completed,
            responses: submission.responses,
            submitted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_layer_has_constructs() {
        assert_eq!(Construct::in_layer(Layer::CoreCognitive).count(), 5);
        assert_eq!(Construct::in_layer(Layer::TechnicalAptitude).count(), 5);
        assert_eq!(Construct::in_layer(Layer::BehavioralIntegrity).count(), 2);
    }

    #[test]
    fn construct_serializes_as_snake_case_key() {
        let value = serde_json::to_value(Construct::LearningVelocity).expect("serializes");
        assert_eq!(value, serde_json::json!(Construct::LearningVelocity.key()));
    }

    #[test]
    fn weight_set_totals_all_weights() {
        let weights: RoleWeightSet = [
            (Construct::FluidReasoning, 40),
            (Construct::EthicalJudgment, 35),
        ]
        .into_iter()
        .collect();
        assert_eq!(weights.total(), 75);
        assert_eq!(weights.weight(Construct::EthicalJudgment), Some(35));
        assert_eq!(weights.weight(Construct::SpatialReasoning), None);
    }

    #[test]
    fn response_payload_uses_tagged_representation() {
        let payload: ResponsePayload =
            serde_json::from_str(r#"{"kind":"selected","value":"B"}"#).expect("parses");
        assert_eq!(payload, ResponsePayload::Selected("B".to_string()));
        let expired: ResponsePayload =
            serde_json::from_str(r#"{"kind":"expired"}"#).expect("parses");
        assert_eq!(expired, ResponsePayload::Expired);
    }
}
