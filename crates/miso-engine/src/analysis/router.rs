use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AssessmentSubmission, UserId};
use super::repository::{AnalysisLogSink, AssessmentRepository, RepositoryError};
use super::service::{AnalysisService, AnalysisServiceError};

/// Optional reference time; defaults to the moment the request is handled.
#[derive(Debug, Default, Deserialize)]
pub struct AsOfQuery {
    pub as_of: Option<DateTime<Utc>>,
}

/// Router builder exposing HTTP endpoints for inline and stored analyses.
pub fn analysis_router<R, L>(service: Arc<AnalysisService<R, L>>) -> Router
where
    R: AssessmentRepository + 'static,
    L: AnalysisLogSink + 'static,
{
    Router::new()
        .route("/api/v1/analysis", post(analyze_handler::<R, L>))
        .route(
            "/api/v1/users/:user_id/analysis",
            get(user_analysis_handler::<R, L>),
        )
        .with_state(service)
}

pub(crate) async fn analyze_handler<R, L>(
    State(service): State<Arc<AnalysisService<R, L>>>,
    Query(query): Query<AsOfQuery>,
    axum::Json(submission): axum::Json<AssessmentSubmission>,
) -> Response
where
    R: AssessmentRepository + 'static,
    L: AnalysisLogSink + 'static,
{
    let as_of = query.as_of.unwrap_or_else(Utc::now);
    match service.analyze_submission(submission, as_of) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn user_analysis_handler<R, L>(
    State(service): State<Arc<AnalysisService<R, L>>>,
    Path(user_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    R: AssessmentRepository + 'static,
    L: AnalysisLogSink + 'static,
{
    let as_of = query.as_of.unwrap_or_else(Utc::now);
    match service.analyze_user(&UserId(user_id), as_of) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AnalysisServiceError) -> Response {
    let status = match &error {
        AnalysisServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AnalysisServiceError::Repository(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
        AnalysisServiceError::Repository(RepositoryError::Unavailable(_))
        | AnalysisServiceError::Log(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
