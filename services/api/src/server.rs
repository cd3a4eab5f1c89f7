use crate::cli::ServeArgs;
use crate::infra::{
    load_catalog, scoring_config, AppState, InMemoryAssessmentRepository,
    InMemoryNotificationPublisher,
};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use talent_ai::config::AppConfig;
use talent_ai::error::AppError;
use talent_ai::telemetry;
use talent_ai::workflows::assessment::AssessmentScoringService;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = load_catalog(&config.scoring)?;
    let scoring = scoring_config(&config.scoring)?;
    info!(
        items = catalog.items.len(),
        roles = catalog.roles.len(),
        enforce_overall_minimum = scoring.enforce_overall_minimum,
        "scoring catalog loaded"
    );

    let repository = Arc::new(InMemoryAssessmentRepository::default());
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let scoring_service = Arc::new(AssessmentScoringService::new(
        repository,
        notifications,
        Arc::new(catalog),
        scoring,
    ));

    let app = with_assessment_routes(scoring_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "assessment scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
