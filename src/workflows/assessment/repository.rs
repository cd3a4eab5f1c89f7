use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Assessment, AssessmentId, CandidateStatus, RoleSlug};
use super::scoring::ScoringOutcome;

/// Repository record holding the assessment, its disposition, and the latest scoring output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub assessment: Assessment,
    pub status: CandidateStatus,
    pub outcome: Option<ScoringOutcome>,
    pub scored_at: Option<DateTime<Utc>>,
}

impl AssessmentRecord {
    pub fn disposition_summary(&self) -> String {
        match (&self.outcome, self.status) {
            (None, _) => "scoring pending".to_string(),
            (Some(_), CandidateStatus::Incomplete) => {
                "assessment incomplete; scoring pending".to_string()
            }
            (Some(outcome), status) => {
                let mut summary = status.label().replace('_', " ");
                if let Some(cutline) = &outcome.cutline {
                    summary.push_str(&format!(" (cutline distance {:+})", cutline.distance));
                }
                if !outcome.red_flags.is_empty() {
                    let titles: Vec<&str> = outcome
                        .red_flags
                        .iter()
                        .map(|flag| flag.title.as_str())
                        .collect();
                    summary.push_str(&format!("; flags: {}", titles.join(", ")));
                }
                summary
            }
        }
    }

    pub fn status_view(&self) -> AssessmentStatusView {
        let composite = self.outcome.as_ref().and_then(|outcome| {
            outcome
                .composite_for(self.assessment.role.as_str())
                .map(|composite| composite.percentile)
        });

        AssessmentStatusView {
            assessment_id: self.assessment.id.clone(),
            role: self.assessment.role.clone(),
            status: self.status.label(),
            disposition: self.disposition_summary(),
            composite_percentile: composite,
        }
    }
}

/// Storage abstraction. `update` has upsert semantics keyed by assessment id.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError>;
    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError>;
    /// Completed assessments that have not been scored yet.
    fn pending(&self, limit: usize) -> Result<Vec<AssessmentRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for recruiter notifications (feed, e-mail, ATS adapters).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: CandidateNotification) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateNotification {
    pub template: String,
    pub assessment_id: AssessmentId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of an assessment's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentStatusView {
    pub assessment_id: AssessmentId,
    pub role: RoleSlug,
    pub status: &'static str,
    pub disposition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite_percentile: Option<u8>,
}
