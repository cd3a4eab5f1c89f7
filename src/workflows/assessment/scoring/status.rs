use super::super::domain::{CandidateStatus, RedFlag, Severity};
use super::cutline::CutlineEvaluation;

/// Below-cutline candidates within this many points are routed to review instead of rejection.
pub const REVIEW_GRACE_BAND: i16 = -5;

/// Combine completion, flags, and the assigned role's cutline into a disposition.
///
/// Precedence is fixed: incomplete, critical flags, cutline, warnings, recommend.
pub fn determine_status(
    completed: bool,
    flags: &[RedFlag],
    cutline: &CutlineEvaluation,
) -> CandidateStatus {
    if !completed {
        return CandidateStatus::Incomplete;
    }

    if has_severity(flags, Severity::Critical) {
        return CandidateStatus::DoNotAdvance;
    }

    if !cutline.passed {
        return if cutline.distance >= REVIEW_GRACE_BAND {
            CandidateStatus::ReviewRequired
        } else {
            CandidateStatus::DoNotAdvance
        };
    }

    if has_severity(flags, Severity::Warning) {
        return CandidateStatus::ReviewRequired;
    }

    CandidateStatus::Recommended
}

fn has_severity(flags: &[RedFlag], severity: Severity) -> bool {
    flags.iter().any(|flag| flag.severity == severity)
}
