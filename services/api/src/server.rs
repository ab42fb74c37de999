use crate::cli::ServeArgs;
use crate::demo::sample_personas;
use crate::infra::{AppState, InMemoryAnalysisLog, InMemoryAssessmentRepository};
use crate::routes::with_analysis_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use miso_engine::analysis::{AnalysisService, AnalysisServiceError};
use miso_engine::config::AppConfig;
use miso_engine::error::AppError;
use miso_engine::import::AssessmentCsvImporter;
use miso_engine::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
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

    let repository = Arc::new(InMemoryAssessmentRepository::default());
    if args.seed_demo {
        let seeded = repository
            .extend(sample_personas().into_iter().map(|persona| persona.submission))
            .map_err(AnalysisServiceError::from)?;
        info!(seeded, "loaded sample personas");
    }
    if let Some(path) = args.seed_csv.take() {
        let submissions = AssessmentCsvImporter::from_path(&path)?;
        let seeded = repository
            .extend(submissions)
            .map_err(AnalysisServiceError::from)?;
        info!(seeded, path = %path.display(), "loaded stored assessments");
    }

    let log = Arc::new(InMemoryAnalysisLog::default());
    let analysis_service = Arc::new(AnalysisService::new(repository, log, config.analysis));

    let app = with_analysis_routes(analysis_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "miso analysis service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
