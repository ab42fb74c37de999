use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::analysis::domain::{
    AssessmentSubmission, BigFiveSubmission, DassSubmission, MbtiSubmission, StrengthCategory,
    TraitValues, UserId, ViaStrengthEntry, ViaSubmission,
};
use crate::analysis::engine::AnalysisLogEntry;
use crate::analysis::normalizer::{normalize_trait, BigFiveScores};
use crate::analysis::repository::{
    AnalysisLogSink, AssessmentRepository, LogSinkError, RepositoryError,
};
use crate::analysis::{
    analysis_router, AnalysisConfig, AnalysisService, BigFiveTrait, InputAggregator,
};
use crate::analysis::domain::{AssessmentBundle, TraitReading};

pub(super) fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()
}

pub(super) fn recently() -> Option<DateTime<Utc>> {
    Some(as_of() - Duration::days(30))
}

/// O=60, C=75, E=30, A=50, N=80: an anxious, withdrawn but conscientious respondent.
pub(super) fn introvert_big_five() -> BigFiveSubmission {
    BigFiveSubmission {
        raw: TraitValues {
            openness: Some(60.0),
            conscientiousness: Some(75.0),
            extraversion: Some(30.0),
            agreeableness: Some(50.0),
            neuroticism: Some(80.0),
        },
        percentiles: TraitValues::default(),
        completed_at: recently(),
    }
}

pub(super) fn percentile_big_five(values: [f64; 5]) -> BigFiveSubmission {
    let [o, c, e, a, n] = values;
    BigFiveSubmission {
        raw: TraitValues::default(),
        percentiles: TraitValues {
            openness: Some(o),
            conscientiousness: Some(c),
            extraversion: Some(e),
            agreeableness: Some(a),
            neuroticism: Some(n),
        },
        completed_at: recently(),
    }
}

pub(super) fn dass(depression: f64, anxiety: f64, stress: f64) -> DassSubmission {
    DassSubmission {
        depression,
        anxiety,
        stress,
        completed_at: recently(),
    }
}

pub(super) fn signature(names: &[&str]) -> ViaSubmission {
    ViaSubmission {
        strengths: names
            .iter()
            .enumerate()
            .map(|(index, name)| ViaStrengthEntry {
                name: name.to_string(),
                rank: Some(index as u8 + 1),
                category: Some(StrengthCategory::Signature),
            })
            .collect(),
        completed_at: recently(),
    }
}

pub(super) fn mbti(code: &str) -> MbtiSubmission {
    MbtiSubmission {
        code: code.to_string(),
        completed_at: recently(),
    }
}

pub(super) fn trait_only_submission() -> AssessmentSubmission {
    let mut submission = AssessmentSubmission::empty("user-trait-only");
    submission.big_five = Some(introvert_big_five());
    submission
}

/// Big Five, MBTI, VIA with Hope as a signature strength, plus the given DASS-21 sums.
pub(super) fn full_plus_submission(
    depression: f64,
    anxiety: f64,
    stress: f64,
) -> AssessmentSubmission {
    AssessmentSubmission {
        user_id: UserId("user-full-plus".to_string()),
        big_five: Some(introvert_big_five()),
        mbti: Some(mbti("INFJ")),
        via: Some(signature(&["Hope", "Kindness", "Curiosity"])),
        dass21: Some(dass(depression, anxiety, stress)),
    }
}

pub(super) fn bundle(submission: AssessmentSubmission) -> AssessmentBundle {
    InputAggregator::new()
        .aggregate(submission)
        .expect("fixture submission is valid")
}

/// Scores built straight from percentiles in OCEAN order.
pub(super) fn trait_scores(percentiles: [f64; 5]) -> BigFiveScores {
    let score = |trait_: BigFiveTrait| {
        normalize_trait(trait_, TraitReading::StoredPercentile(percentiles[trait_.index()]))
    };
    BigFiveScores {
        openness: score(BigFiveTrait::Openness),
        conscientiousness: score(BigFiveTrait::Conscientiousness),
        extraversion: score(BigFiveTrait::Extraversion),
        agreeableness: score(BigFiveTrait::Agreeableness),
        neuroticism: score(BigFiveTrait::Neuroticism),
    }
}

pub(super) fn approx(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} +/- {tolerance}, got {actual}"
    );
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) submissions: Arc<Mutex<HashMap<UserId, AssessmentSubmission>>>,
}

impl MemoryRepository {
    pub(super) fn with(submissions: Vec<AssessmentSubmission>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository
                .submissions
                .lock()
                .expect("repository mutex poisoned");
            for submission in submissions {
                guard.insert(submission.user_id.clone(), submission);
            }
        }
        repository
    }
}

impl AssessmentRepository for MemoryRepository {
    fn fetch(&self, user_id: &UserId) -> Result<Option<AssessmentSubmission>, RepositoryError> {
        let guard = self.submissions.lock().expect("repository mutex poisoned");
        Ok(guard.get(user_id).cloned())
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn fetch(&self, _user_id: &UserId) -> Result<Option<AssessmentSubmission>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryLog {
    entries: Arc<Mutex<Vec<AnalysisLogEntry>>>,
}

impl MemoryLog {
    pub(super) fn entries(&self) -> Vec<AnalysisLogEntry> {
        self.entries.lock().expect("log mutex poisoned").clone()
    }
}

impl AnalysisLogSink for MemoryLog {
    fn record(&self, entry: AnalysisLogEntry) -> Result<(), LogSinkError> {
        self.entries.lock().expect("log mutex poisoned").push(entry);
        Ok(())
    }
}

pub(super) struct FailingLog;

impl AnalysisLogSink for FailingLog {
    fn record(&self, _entry: AnalysisLogEntry) -> Result<(), LogSinkError> {
        Err(LogSinkError::Unavailable("disk full".to_string()))
    }
}

pub(super) fn build_service(
    submissions: Vec<AssessmentSubmission>,
) -> (
    AnalysisService<MemoryRepository, MemoryLog>,
    Arc<MemoryRepository>,
    Arc<MemoryLog>,
) {
    let repository = Arc::new(MemoryRepository::with(submissions));
    let log = Arc::new(MemoryLog::default());
    let service = AnalysisService::new(repository.clone(), log.clone(), AnalysisConfig::default());
    (service, repository, log)
}

pub(super) fn analysis_router_with_service(
    service: AnalysisService<MemoryRepository, MemoryLog>,
) -> axum::Router {
    analysis_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
