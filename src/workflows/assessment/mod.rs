//! Pre-employment assessment scoring: raw item responses in, a candidate disposition and
//! predictive profile out.
//!
//! The pipeline runs strictly forward: item scoring, construct aggregation, then composite
//! and cutline evaluation per role, with red flags and predictions derived from the same
//! construct scores. Everything in `scoring` and `prediction` is pure; the service layer
//! owns persistence, locking, and notifications.

pub mod catalog;
pub mod domain;
pub mod prediction;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, ItemBank, RoleCatalog, ScoringCatalog};
pub use domain::{
    Assessment, AssessmentId, AssessmentSubmission, CandidateId, CandidateStatus,
    CompositeScore, Construct, ConstructScore, Cutline, DifficultyTier, Item, ItemId,
    ItemResponse, ItemType, Layer, RedFlag, ResponsePayload, RoleProfile, RoleSlug,
    RoleWeightSet, ScoredItem, Severity,
};
pub use prediction::Prediction;
pub use repository::{
    AssessmentRecord, AssessmentRepository, AssessmentStatusView, CandidateNotification,
    NotificationError, NotificationPublisher, RepositoryError,
};
pub use router::assessment_router;
pub use scoring::{ScoringConfig, ScoringEngine, ScoringOutcome};
pub use service::{AssessmentScoringService, ScoringServiceError};
