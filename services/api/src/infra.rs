use chrono::{DateTime, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use miso_engine::analysis::{
    AnalysisLogEntry, AnalysisLogSink, AssessmentRepository, AssessmentSubmission, LogSinkError,
    RepositoryError, UserId,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    submissions: Arc<Mutex<HashMap<UserId, AssessmentSubmission>>>,
}

impl InMemoryAssessmentRepository {
    /// Store submissions, replacing any earlier record for the same user.
    pub(crate) fn extend<I>(&self, submissions: I) -> Result<usize, RepositoryError>
    where
        I: IntoIterator<Item = AssessmentSubmission>,
    {
        let mut guard = self
            .submissions
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".into()))?;
        let before = guard.len();
        for submission in submissions {
            guard.insert(submission.user_id.clone(), submission);
        }
        Ok(guard.len() - before)
    }
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn fetch(&self, user_id: &UserId) -> Result<Option<AssessmentSubmission>, RepositoryError> {
        let guard = self
            .submissions
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".into()))?;
        Ok(guard.get(user_id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAnalysisLog {
    entries: Arc<Mutex<Vec<AnalysisLogEntry>>>,
}

impl AnalysisLogSink for InMemoryAnalysisLog {
    fn record(&self, entry: AnalysisLogEntry) -> Result<(), LogSinkError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| LogSinkError::Unavailable("analysis log mutex poisoned".into()))?;
        guard.push(entry);
        Ok(())
    }
}

impl InMemoryAnalysisLog {
    #[cfg(test)]
    pub(crate) fn entries(&self) -> Vec<AnalysisLogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
pub(crate) fn parse_as_of(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("failed to parse '{raw}' as RFC 3339 or YYYY-MM-DD"))
}
