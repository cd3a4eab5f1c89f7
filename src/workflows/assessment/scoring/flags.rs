use super::super::domain::{ConstructScore, Layer, RedFlag, Severity};
use super::config::FlagRules;

pub const EXTREME_LOW_CATEGORY: &str = "Extreme Low Score";
pub const BEHAVIORAL_CONCERN_CATEGORY: &str = "Behavioral Concern";

/// Evaluate every production rule; all rules that match fire.
///
/// The returned set replaces any previous flags for the assessment.
pub fn detect_red_flags(scores: &[ConstructScore], rules: &FlagRules) -> Vec<RedFlag> {
    let mut flags = Vec::new();

    let extreme: Vec<&ConstructScore> = scores
        .iter()
        .filter(|score| score.percentile < rules.extreme_low_percentile)
        .collect();
    if !extreme.is_empty() {
        flags.push(RedFlag {
            severity: Severity::Critical,
            category: EXTREME_LOW_CATEGORY.to_string(),
            title: format!(
                "Score below the {} percentile",
                ordinal(rules.extreme_low_percentile)
            ),
            description: format!(
                "Extremely low performance on {}",
                describe(&extreme)
            ),
            constructs: extreme.iter().map(|score| score.construct).collect(),
        });
    }

    let behavioral: Vec<&ConstructScore> = scores
        .iter()
        .filter(|score| {
            score.layer == Layer::BehavioralIntegrity
                && score.percentile < rules.behavioral_concern_percentile
        })
        .collect();
    if !behavioral.is_empty() {
        flags.push(RedFlag {
            severity: Severity::Warning,
            category: BEHAVIORAL_CONCERN_CATEGORY.to_string(),
            title: "Low behavioral integrity indicators".to_string(),
            description: format!(
                "Behavioral-integrity results below the {} percentile on {}",
                ordinal(rules.behavioral_concern_percentile),
                describe(&behavioral)
            ),
            constructs: behavioral.iter().map(|score| score.construct).collect(),
        });
    }

    flags
}

fn describe(scores: &[&ConstructScore]) -> String {
    scores
        .iter()
        .map(|score| format!("{} ({})", score.construct.label(), score.percentile))
        .collect::<Vec<_>>()
        .join(", ")
}

fn ordinal(value: u8) -> String {
    let suffix = match (value % 10, value % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{value}{suffix}")
}
