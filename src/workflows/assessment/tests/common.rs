use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::workflows::assessment::domain::{
    Assessment, AssessmentId, AssessmentSubmission, CandidateId, CandidateStatus, Construct,
    ConstructScore, Item, ItemResponse, ItemType, ResponsePayload, RoleSlug,
};
use crate::workflows::assessment::repository::{
    AssessmentRecord, AssessmentRepository, CandidateNotification, NotificationError,
    NotificationPublisher, RepositoryError,
};
use crate::workflows::assessment::scoring::FreeTextScorer;
use crate::workflows::assessment::{
    assessment_router, AssessmentScoringService, ScoringCatalog, ScoringConfig, ScoringEngine,
};

pub(super) const FIELD_TECHNICIAN: &str = "field-technician";

pub(super) fn role(slug: &str) -> RoleSlug {
    RoleSlug(slug.to_string())
}

pub(super) fn catalog() -> ScoringCatalog {
    ScoringCatalog::standard()
}

/// Grades every non-empty free-text answer as a perfect response.
pub(super) struct FullCreditFreeText;

impl FreeTextScorer for FullCreditFreeText {
    fn score(&self, _item: &Item, text: &str) -> f64 {
        if text.trim().is_empty() {
            0.0
        } else {
            1.0
        }
    }
}

pub(super) fn full_credit_engine() -> ScoringEngine {
    ScoringEngine::new(ScoringConfig::default()).with_free_text_scorer(FullCreditFreeText)
}

fn best_payload(item: &Item) -> ResponsePayload {
    match item.item_type {
        ItemType::SingleChoice | ItemType::TimedChoice => {
            ResponsePayload::Selected(item.correct_answer.clone().expect("choice has answer"))
        }
        ItemType::LikertScale => {
            ResponsePayload::Selected(item.options.last().cloned().expect("likert has options"))
        }
        ItemType::FreeText | ItemType::AiFollowUp => {
            ResponsePayload::Text(vec!["thorough"; 60].join(" "))
        }
    }
}

fn worst_payload(item: &Item) -> ResponsePayload {
    match item.item_type {
        ItemType::SingleChoice | ItemType::TimedChoice => {
            ResponsePayload::Selected("none of these".to_string())
        }
        ItemType::LikertScale => {
            ResponsePayload::Selected(item.options.first().cloned().expect("likert has options"))
        }
        ItemType::FreeText | ItemType::AiFollowUp => ResponsePayload::Text(String::new()),
    }
}

/// Every item in the standard bank answered as well as possible.
pub(super) fn strong_submission(role_slug: &str) -> AssessmentSubmission {
    let catalog = catalog();
    let responses = catalog
        .items
        .items()
        .into_iter()
        .map(|item| ItemResponse {
            item_id: item.id.clone(),
            payload: best_payload(item),
            latency_ms: None,
            confidence: Some(4),
            raw_score: None,
        })
        .collect();

    AssessmentSubmission {
        candidate_id: CandidateId("cand-001".to_string()),
        role: role(role_slug),
        completed: true,
        responses,
    }
}

/// Strong submission except every item of `weak` is answered as badly as possible.
pub(super) fn submission_weak_on(role_slug: &str, weak: Construct) -> AssessmentSubmission {
    let catalog = catalog();
    let mut submission = strong_submission(role_slug);
    for response in &mut submission.responses {
        let item = catalog.items.get(&response.item_id).expect("item in bank");
        if item.construct == weak {
            response.payload = worst_payload(item);
        }
    }
    submission
}

pub(super) fn incomplete_submission(role_slug: &str) -> AssessmentSubmission {
    let mut submission = strong_submission(role_slug);
    submission.responses.truncate(5);
    submission.completed = false;
    submission
}

pub(super) fn assessment(id: &str, submission: AssessmentSubmission) -> Assessment {
    Assessment::from_submission(AssessmentId(id.to_string()), submission, Utc::now())
}

pub(super) fn construct_score(construct: Construct, percentile: u8) -> ConstructScore {
    ConstructScore {
        construct,
        layer: construct.layer(),
        raw_score: f64::from(percentile) / 100.0,
        percentile,
        item_count: 3,
        mean_latency_ms: 0,
    }
}

/// Uniform percentile everywhere, with per-construct overrides.
pub(super) fn profile(base: u8, overrides: &[(Construct, u8)]) -> Vec<ConstructScore> {
    Construct::ALL
        .iter()
        .map(|construct| {
            let percentile = overrides
                .iter()
                .find(|(candidate, _)| candidate == construct)
                .map(|(_, value)| *value)
                .unwrap_or(base);
            construct_score(*construct, percentile)
        })
        .collect()
}

pub(super) fn build_service() -> (
    AssessmentScoringService<MemoryRepository, MemoryNotifications>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifications>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifications = Arc::new(MemoryNotifications::default());
    let service = AssessmentScoringService::with_engine(
        repository.clone(),
        notifications.clone(),
        Arc::new(catalog()),
        full_credit_engine(),
    );
    (service, repository, notifications)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<AssessmentId, AssessmentRecord>>>,
}

impl AssessmentRepository for MemoryRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.assessment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.assessment.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.assessment.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn pending(&self, limit: usize) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut pending: Vec<AssessmentRecord> = guard
            .values()
            .filter(|record| {
                record.assessment.completed && record.status == CandidateStatus::NotScored
            })
            .cloned()
            .collect();
        pending.sort_by(|left, right| left.assessment.id.cmp(&right.assessment.id));
        pending.truncate(limit);
        Ok(pending)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<CandidateNotification>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<CandidateNotification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifications {
    fn publish(&self, notification: CandidateNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct FailingNotifications;

impl NotificationPublisher for FailingNotifications {
    fn publish(&self, _notification: CandidateNotification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp relay down".to_string()))
    }
}

pub(super) struct ConflictRepository;

impl AssessmentRepository for ConflictRepository {
    fn insert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: AssessmentRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Ok(None)
    }

    fn pending(&self, _limit: usize) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn insert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: AssessmentRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn pending(&self, _limit: usize) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Memory repository whose first `fetch` parks until the test releases it.
pub(super) struct GatedRepository {
    pub(super) inner: MemoryRepository,
    entered: Mutex<Option<Sender<()>>>,
    release: Mutex<Receiver<()>>,
}

impl GatedRepository {
    pub(super) fn new(entered: Sender<()>, release: Receiver<()>) -> Self {
        Self {
            inner: MemoryRepository::default(),
            entered: Mutex::new(Some(entered)),
            release: Mutex::new(release),
        }
    }
}

impl AssessmentRepository for GatedRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError> {
        self.inner.update(record)
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let entered = self.entered.lock().expect("gate mutex poisoned").take();
        if let Some(entered) = entered {
            entered.send(()).expect("test listening");
            self.release
                .lock()
                .expect("gate mutex poisoned")
                .recv()
                .expect("test releases gate");
        }
        self.inner.fetch(id)
    }

    fn pending(&self, limit: usize) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        self.inner.pending(limit)
    }
}

pub(super) fn assert_conflict_response(response: Response) {
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assessment_router_with_service(
    service: AssessmentScoringService<MemoryRepository, MemoryNotifications>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}
