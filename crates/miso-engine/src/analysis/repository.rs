use super::domain::{AssessmentSubmission, UserId};
use super::engine::AnalysisLogEntry;

/// Read side: the raw assessment records stored for a user.
pub trait AssessmentRepository: Send + Sync {
    fn fetch(&self, user_id: &UserId) -> Result<Option<AssessmentSubmission>, RepositoryError>;
}

/// Write side: where finished analyses are recorded.
pub trait AnalysisLogSink: Send + Sync {
    fn record(&self, entry: AnalysisLogEntry) -> Result<(), LogSinkError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("assessments not found for user {0}")]
    NotFound(UserId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LogSinkError {
    #[error("analysis log unavailable: {0}")]
    Unavailable(String),
}
