use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::aggregator::{InputAggregator, ValidationError};
use super::config::AnalysisConfig;
use super::domain::{AssessmentBundle, AssessmentSubmission, UserId};
use super::engine::{AnalysisEngine, AnalysisLogEntry, AnalysisReport};
use super::repository::{AnalysisLogSink, AssessmentRepository, LogSinkError, RepositoryError};

/// Memoized reports kept before the cache is flushed.
const MEMO_CAPACITY: usize = 1024;

/// Service composing the data-access layer, the analysis engine, and the log sink.
pub struct AnalysisService<R, L> {
    aggregator: InputAggregator,
    engine: Arc<AnalysisEngine>,
    repository: Arc<R>,
    log: Arc<L>,
    memo: Mutex<HashMap<String, AnalysisReport>>,
}

impl<R, L> AnalysisService<R, L>
where
    R: AssessmentRepository + 'static,
    L: AnalysisLogSink + 'static,
{
    pub fn new(repository: Arc<R>, log: Arc<L>, config: AnalysisConfig) -> Self {
        Self {
            aggregator: InputAggregator::new(),
            engine: Arc::new(AnalysisEngine::new(config)),
            repository,
            log,
            memo: Mutex::new(HashMap::new()),
        }
    }

    pub fn engine(&self) -> &AnalysisEngine {
        &self.engine
    }

    /// Validate and analyze an inline submission, then record the result.
    pub fn analyze_submission(
        &self,
        submission: AssessmentSubmission,
        as_of: DateTime<Utc>,
    ) -> Result<AnalysisReport, AnalysisServiceError> {
        let bundle = self.aggregator.aggregate(submission)?;
        let report = self.analyze_bundle(&bundle, as_of);
        self.log
            .record(AnalysisLogEntry::from_report(&report, Utc::now()))?;

        info!(
            user_id = %report.user_id,
            completeness = report.completeness_level.label(),
            profile = report.profile_id.map(|id| id.as_str()).unwrap_or("none"),
            discrepancies = report.discrepancies.len(),
            "analysis completed"
        );
        Ok(report)
    }

    /// Load the stored assessments for `user_id` and analyze them.
    pub fn analyze_user(
        &self,
        user_id: &UserId,
        as_of: DateTime<Utc>,
    ) -> Result<AnalysisReport, AnalysisServiceError> {
        let submission = self
            .repository
            .fetch(user_id)?
            .ok_or_else(|| RepositoryError::NotFound(user_id.clone()))?;
        self.analyze_submission(submission, as_of)
    }

    fn analyze_bundle(&self, bundle: &AssessmentBundle, as_of: DateTime<Utc>) -> AnalysisReport {
        let Ok(key) = serde_json::to_string(&(bundle, as_of)) else {
            return self.engine.analyze(bundle, as_of);
        };

        if let Some(report) = self.cached(&key) {
            debug!(user_id = %bundle.user_id, "analysis memo hit");
            return report;
        }

        let report = self.engine.analyze(bundle, as_of);
        if let Ok(mut memo) = self.memo.lock() {
            if memo.len() >= MEMO_CAPACITY {
                memo.clear();
            }
            memo.insert(key, report.clone());
        }
        report
    }

    fn cached(&self, key: &str) -> Option<AnalysisReport> {
        self.memo.lock().ok()?.get(key).cloned()
    }

    pub fn memo_len(&self) -> usize {
        self.memo.lock().map(|memo| memo.len()).unwrap_or(0)
    }
}

/// Error raised by the analysis service.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Log(#[from] LogSinkError),
}
