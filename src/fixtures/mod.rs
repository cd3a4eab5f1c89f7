//! Synthetic demo data. Nothing in here is used by the scoring pipeline.
//!
//! Candidates are generated from archetypes with a seeded RNG so demos are reproducible,
//! and the narrative flag templates are only ever attached probabilistically to demo
//! output. Production flags come exclusively from the engine's rule set.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::workflows::assessment::{
    AssessmentSubmission, CandidateId, Construct, Item, ItemResponse, ItemType, Layer, RedFlag,
    ResponsePayload, RoleSlug, ScoringCatalog, Severity,
};

/// Candidate profile shapes used to seed demo data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    HighPerformer,
    SolidContributor,
    Borderline,
    IntegrityRisk,
    Incomplete,
}

impl Archetype {
    pub const ALL: [Archetype; 5] = [
        Archetype::HighPerformer,
        Archetype::SolidContributor,
        Archetype::Borderline,
        Archetype::IntegrityRisk,
        Archetype::Incomplete,
    ];

    /// Probability range of answering well, per layer.
    fn success_range(self, layer: Layer) -> (f64, f64) {
        match (self, layer) {
            (Archetype::HighPerformer, _) => (0.85, 1.0),
            (Archetype::SolidContributor, _) => (0.6, 0.8),
            (Archetype::Borderline, Layer::TechnicalAptitude) => (0.35, 0.5),
            (Archetype::Borderline, _) => (0.45, 0.6),
            (Archetype::IntegrityRisk, Layer::BehavioralIntegrity) => (0.0, 0.15),
            (Archetype::IntegrityRisk, _) => (0.55, 0.75),
            (Archetype::Incomplete, _) => (0.4, 0.7),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Archetype::HighPerformer => "high performer",
            Archetype::SolidContributor => "solid contributor",
            Archetype::Borderline => "borderline",
            Archetype::IntegrityRisk => "integrity risk",
            Archetype::Incomplete => "incomplete session",
        }
    }
}

/// Seeded generator for synthetic candidate submissions.
pub struct SyntheticCandidateGenerator {
    rng: StdRng,
    sequence: u32,
}

impl SyntheticCandidateGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            sequence: 0,
        }
    }

    pub fn submission(
        &mut self,
        archetype: Archetype,
        catalog: &ScoringCatalog,
        role: &RoleSlug,
    ) -> AssessmentSubmission {
        self.sequence += 1;
        let items = catalog.items.items();
        let answered = if archetype == Archetype::Incomplete {
            items.len() / 2
        } else {
            items.len()
        };

        let responses = items
            .into_iter()
            .take(answered)
            .map(|item| self.response(archetype, item))
            .collect();

        AssessmentSubmission {
            candidate_id: CandidateId(format!("synthetic-{:04}", self.sequence)),
            role: role.clone(),
            completed: archetype != Archetype::Incomplete,
            responses,
        }
    }

    fn response(&mut self, archetype: Archetype, item: &Item) -> ItemResponse {
        let (low, high) = archetype.success_range(item.construct.layer());
        let success = self.rng.gen_range(low..=high);
        let limit_ms = item.time_limit_seconds.unwrap_or(60).saturating_mul(1000);
        let latency_ms = self.rng.gen_range(limit_ms / 10..=limit_ms);

        let payload = match item.item_type {
            ItemType::SingleChoice | ItemType::TimedChoice => {
                if item.item_type == ItemType::TimedChoice && self.rng.gen_bool(0.03) {
                    ResponsePayload::Expired
                } else if self.rng.gen_bool(success) {
                    ResponsePayload::Selected(item.correct_answer.clone().unwrap_or_default())
                } else {
                    let wrong = item
                        .options
                        .iter()
                        .find(|option| Some(*option) != item.correct_answer.as_ref())
                        .cloned()
                        .unwrap_or_default();
                    ResponsePayload::Selected(wrong)
                }
            }
            ItemType::LikertScale => {
                let last = item.options.len().saturating_sub(1);
                let jitter: f64 = self.rng.gen_range(-0.15..=0.15);
                let position = ((success + jitter).clamp(0.0, 1.0) * last as f64).round() as usize;
                ResponsePayload::Selected(item.options.get(position).cloned().unwrap_or_default())
            }
            ItemType::FreeText | ItemType::AiFollowUp => {
                let words = (success * 70.0).round() as usize + self.rng.gen_range(0..10);
                ResponsePayload::Text(vec!["detail"; words].join(" "))
            }
        };

        ItemResponse {
            item_id: item.id.clone(),
            payload,
            latency_ms: Some(latency_ms),
            confidence: Some(self.rng.gen_range(1..=5)),
            raw_score: None,
        }
    }

    /// Attach narrative flags probabilistically, weighted toward the archetype's weak spots.
    pub fn narrative_flags(&mut self, archetype: Archetype) -> Vec<RedFlag> {
        let chance = match archetype {
            Archetype::IntegrityRisk => 0.6,
            Archetype::Borderline => 0.3,
            Archetype::Incomplete => 0.0,
            Archetype::SolidContributor => 0.1,
            Archetype::HighPerformer => 0.05,
        };

        narrative_flag_templates()
            .into_iter()
            .filter(|_| self.rng.gen_bool(chance))
            .map(NarrativeFlagTemplate::into_flag)
            .collect()
    }
}

/// Richer flag wording used only when seeding demo data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeFlagTemplate {
    pub severity: Severity,
    pub category: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub constructs: &'static [Construct],
}

impl NarrativeFlagTemplate {
    fn into_flag(self) -> RedFlag {
        RedFlag {
            severity: self.severity,
            category: self.category.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            constructs: self.constructs.to_vec(),
        }
    }
}

pub fn narrative_flag_templates() -> Vec<NarrativeFlagTemplate> {
    vec![
        NarrativeFlagTemplate {
            severity: Severity::Critical,
            category: "Ethics",
            title: "Endorsed unethical shortcut",
            description: "Selected responses condoning falsified records under time pressure",
            constructs: &[Construct::EthicalJudgment],
        },
        NarrativeFlagTemplate {
            severity: Severity::Warning,
            category: "Procedural Shortcutting",
            title: "Skips verification steps",
            description: "Repeatedly chose to bypass lockout and checklist steps",
            constructs: &[Construct::ProceduralReliability],
        },
        NarrativeFlagTemplate {
            severity: Severity::Warning,
            category: "Overconfidence",
            title: "Confidence exceeds accuracy",
            description: "High self-rated confidence on items answered incorrectly",
            constructs: &[Construct::MetacognitiveCalibration],
        },
        NarrativeFlagTemplate {
            severity: Severity::Info,
            category: "Attention",
            title: "Attention lapses",
            description: "Accuracy dropped sharply in the final third of the session",
            constructs: &[Construct::ExecutiveControl],
        },
        NarrativeFlagTemplate {
            severity: Severity::Info,
            category: "Rigidity",
            title: "Difficulty switching strategies",
            description: "Kept applying a failing rule after feedback changed",
            constructs: &[Construct::CognitiveFlexibility],
        },
        NarrativeFlagTemplate {
            severity: Severity::Warning,
            category: "Response Time Anomaly",
            title: "Implausibly fast responses",
            description: "Several answers submitted faster than the item could be read",
            constructs: &[Construct::FluidReasoning, Construct::PatternRecognition],
        },
        NarrativeFlagTemplate {
            severity: Severity::Info,
            category: "Inconsistent Learning Curve",
            title: "Uneven learning curve",
            description: "Performance on learning blocks did not improve with practice",
            constructs: &[Construct::LearningVelocity],
        },
    ]
}
