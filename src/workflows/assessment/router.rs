use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{AssessmentId, AssessmentSubmission};
use super::repository::{AssessmentRepository, NotificationPublisher, RepositoryError};
use super::service::{AssessmentScoringService, ScoringServiceError};

/// Router builder exposing HTTP endpoints for submission, scoring, and status.
pub fn assessment_router<R, N>(service: Arc<AssessmentScoringService<R, N>>) -> Router
where
    R: AssessmentRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(submit_handler::<R, N>))
        .route(
            "/api/v1/assessments/:assessment_id",
            get(status_handler::<R, N>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/score",
            post(score_handler::<R, N>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<AssessmentScoringService<R, N>>>,
    axum::Json(submission): axum::Json<AssessmentSubmission>,
) -> Response
where
    R: AssessmentRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.submit(submission) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn score_handler<R, N>(
    State(service): State<Arc<AssessmentScoringService<R, N>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.score(&AssessmentId(assessment_id)) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<AssessmentScoringService<R, N>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.get(&AssessmentId(assessment_id)) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: ScoringServiceError) -> Response {
    let status = match &error {
        ScoringServiceError::UnknownRole(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ScoringServiceError::ScoringInProgress(_)
        | ScoringServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ScoringServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ScoringServiceError::Repository(RepositoryError::Unavailable(_))
        | ScoringServiceError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
