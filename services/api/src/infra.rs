use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use talent_ai::config::ScoringSourcesConfig;
use talent_ai::workflows::assessment::{
    AssessmentId, AssessmentRecord, AssessmentRepository, CandidateNotification, CandidateStatus,
    CatalogError, ItemBank, NotificationError, NotificationPublisher, RepositoryError,
    RoleCatalog, ScoringCatalog, ScoringConfig,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    records: Arc<Mutex<HashMap<AssessmentId, AssessmentRecord>>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
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
        pending.sort_by(|left, right| {
            left.assessment
                .submitted_at
                .cmp(&right.assessment.submitted_at)
        });
        pending.truncate(limit);
        Ok(pending)
    }
}

/// Logs notifications and keeps them for inspection; stands in for the recruiter feed.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationPublisher {
    events: Arc<Mutex<Vec<CandidateNotification>>>,
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notification: CandidateNotification) -> Result<(), NotificationError> {
        info!(
            template = %notification.template,
            assessment_id = %notification.assessment_id,
            "candidate notification queued"
        );
        let mut guard = self.events.lock().expect("notification mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryNotificationPublisher {
    pub(crate) fn events(&self) -> Vec<CandidateNotification> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

/// Build the catalog snapshot, preferring configured files over the built-in standard data.
pub(crate) fn load_catalog(sources: &ScoringSourcesConfig) -> Result<ScoringCatalog, CatalogError> {
    let standard = ScoringCatalog::standard();

    let items = match &sources.item_bank_path {
        Some(path) => {
            let bank = ItemBank::from_path(path)?;
            info!(path = %path.display(), items = bank.len(), "loaded item bank");
            bank
        }
        None => standard.items,
    };

    let roles = match &sources.role_catalog_path {
        Some(path) => {
            let catalog = RoleCatalog::from_path(path)?;
            info!(path = %path.display(), roles = catalog.len(), "loaded role catalog");
            catalog
        }
        None => standard.roles,
    };

    Ok(ScoringCatalog::new(items, roles))
}

/// Load scoring parameters from the configured JSON file, or the defaults when unset.
/// The overall-minimum env switch can only turn the gate on.
pub(crate) fn scoring_config(
    sources: &ScoringSourcesConfig,
) -> Result<ScoringConfig, CatalogError> {
    let mut config = match &sources.scoring_config_path {
        Some(path) => {
            let config = ScoringConfig::from_path(path)?;
            info!(path = %path.display(), "loaded scoring config");
            config
        }
        None => ScoringConfig::default(),
    };
    config.enforce_overall_minimum |= sources.enforce_overall_minimum;
    Ok(config)
}
