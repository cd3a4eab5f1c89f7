use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tracing::info;

use super::catalog::ScoringCatalog;
use super::domain::{
    Assessment, AssessmentId, AssessmentSubmission, CandidateStatus, RoleSlug, Severity,
};
use super::repository::{
    AssessmentRecord, AssessmentRepository, CandidateNotification, NotificationError,
    NotificationPublisher, RepositoryError,
};
use super::scoring::{ScoringConfig, ScoringEngine, ScoringOutcome};

/// Service composing the catalog snapshot, repository, and scoring engine.
pub struct AssessmentScoringService<R, N> {
    repository: Arc<R>,
    notifications: Arc<N>,
    catalog: Arc<ScoringCatalog>,
    engine: Arc<ScoringEngine>,
    in_flight: Arc<Mutex<HashSet<AssessmentId>>>,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("asm-{id:06}"))
}

/// Held for the duration of one scoring run; releases the assessment on drop.
struct RunGuard {
    in_flight: Arc<Mutex<HashSet<AssessmentId>>>,
    id: AssessmentId,
}

impl RunGuard {
    fn acquire(
        in_flight: &Arc<Mutex<HashSet<AssessmentId>>>,
        id: &AssessmentId,
    ) -> Option<Self> {
        let mut running = in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !running.insert(id.clone()) {
            return None;
        }
        Some(Self {
            in_flight: Arc::clone(in_flight),
            id: id.clone(),
        })
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

impl<R, N> AssessmentScoringService<R, N>
where
    R: AssessmentRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(
        repository: Arc<R>,
        notifications: Arc<N>,
        catalog: Arc<ScoringCatalog>,
        config: ScoringConfig,
    ) -> Self {
        Self::with_engine(repository, notifications, catalog, ScoringEngine::new(config))
    }

    pub fn with_engine(
        repository: Arc<R>,
        notifications: Arc<N>,
        catalog: Arc<ScoringCatalog>,
        engine: ScoringEngine,
    ) -> Self {
        Self {
            repository,
            notifications,
            catalog,
            engine: Arc::new(engine),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn catalog(&self) -> &ScoringCatalog {
        &self.catalog
    }

    /// Store a finalized response set, returning the repository-backed record.
    pub fn submit(
        &self,
        submission: AssessmentSubmission,
    ) -> Result<AssessmentRecord, ScoringServiceError> {
        if !self.catalog.roles.contains(&submission.role) {
            return Err(ScoringServiceError::UnknownRole(submission.role));
        }

        let assessment = Assessment::from_submission(next_assessment_id(), submission, Utc::now());
        let record = AssessmentRecord {
            assessment,
            status: CandidateStatus::NotScored,
            outcome: None,
            scored_at: None,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Run the full pipeline for one assessment and upsert every derived row.
    ///
    /// Runs for the same assessment are serialized; a concurrent call is rejected rather
    /// than racing on the upsert.
    pub fn score(&self, assessment_id: &AssessmentId) -> Result<ScoringOutcome, ScoringServiceError> {
        let _guard = RunGuard::acquire(&self.in_flight, assessment_id)
            .ok_or_else(|| ScoringServiceError::ScoringInProgress(assessment_id.clone()))?;

        let mut record = self
            .repository
            .fetch(assessment_id)?
            .ok_or(RepositoryError::NotFound)?;

        let outcome = self.engine.score(&record.assessment, &self.catalog);

        let item_scores: BTreeMap<_, _> = outcome
            .scored_items
            .iter()
            .map(|item| (item.item_id.clone(), item.raw_score))
            .collect();
        for response in &mut record.assessment.responses {
            response.raw_score = item_scores.get(&response.item_id).copied();
        }

        record.status = outcome.status;
        record.outcome = Some(outcome.clone());
        record.scored_at = Some(Utc::now());
        self.repository.update(record)?;

        info!(
            assessment_id = %assessment_id.0,
            status = outcome.status.label(),
            constructs = outcome.construct_scores.len(),
            composites = outcome.composite_scores.len(),
            flags = outcome.red_flags.len(),
            "assessment scored"
        );

        self.notify(&outcome)?;
        Ok(outcome)
    }

    /// Fetch an assessment and current status for API responses.
    pub fn get(&self, assessment_id: &AssessmentId) -> Result<AssessmentRecord, ScoringServiceError> {
        let record = self
            .repository
            .fetch(assessment_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Score up to `limit` completed assessments that have not been scored yet.
    pub fn score_pending(&self, limit: usize) -> Result<Vec<ScoringOutcome>, ScoringServiceError> {
        let pending = self.repository.pending(limit)?;
        let mut outcomes = Vec::with_capacity(pending.len());
        for record in pending {
            match self.score(&record.assessment.id) {
                Ok(outcome) => outcomes.push(outcome),
                Err(ScoringServiceError::ScoringInProgress(_)) => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(outcomes)
    }

    fn notify(&self, outcome: &ScoringOutcome) -> Result<(), ScoringServiceError> {
        let template = if outcome.status == CandidateStatus::Recommended {
            "candidate_recommended"
        } else if outcome
            .red_flags
            .iter()
            .any(|flag| flag.severity == Severity::Critical)
        {
            "candidate_flagged"
        } else {
            return Ok(());
        };

        let mut details = BTreeMap::new();
        details.insert("status".to_string(), outcome.status.label().to_string());
        if let Some(cutline) = &outcome.cutline {
            details.insert("cutline_distance".to_string(), cutline.distance.to_string());
        }
        for flag in &outcome.red_flags {
            details.insert(
                format!("flag_{}", flag.severity.label().to_ascii_lowercase()),
                flag.title.clone(),
            );
        }

        self.notifications.publish(CandidateNotification {
            template: template.to_string(),
            assessment_id: outcome.assessment_id.clone(),
            details,
        })?;
        Ok(())
    }
}

/// Error raised by the scoring service.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error("role '{0}' is not configured")]
    UnknownRole(RoleSlug),
    #[error("scoring already running for assessment {0}")]
    ScoringInProgress(AssessmentId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}
