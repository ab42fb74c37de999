use std::sync::Arc;

use chrono::Duration;

use super::common::*;

use crate::analysis::completeness::{CompletenessLevel, Confidence};
use crate::analysis::domain::{AssessmentSubmission, UserId};
use crate::analysis::profile::ProfileId;
use crate::analysis::recommendations::SupportLevel;
use crate::analysis::repository::RepositoryError;
use crate::analysis::{AnalysisConfig, AnalysisService, AnalysisServiceError, ValidationError};

#[test]
fn trait_only_user_gets_partial_analysis() {
    let (service, _, log) = build_service(vec![trait_only_submission()]);

    let report = service
        .analyze_user(&UserId("user-trait-only".to_string()), as_of())
        .expect("analysis succeeds");

    assert_eq!(report.completeness_level, CompletenessLevel::Partial);
    assert_eq!(report.confidence, Confidence::Medium);
    assert_eq!(report.profile_id, Some(ProfileId::VulnerableIntrovert));
    assert!(report.discrepancies.is_empty());
    assert!(report.bvs.is_some_and(|bvs| bvs > 0.5));
    assert!(report.recommendations.career.is_some());
    assert!(report.recommendations.learning.is_some());
    assert!(report.recommendations.sports.is_some());
    assert!(report.recommendations.clinical.is_none());

    let entries = log.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].profile_id, Some(ProfileId::VulnerableIntrovert));
}

#[test]
fn full_plus_with_low_dass_has_no_masked_distress() {
    let (service, _, _) = build_service(Vec::new());
    let report = service
        .analyze_submission(full_plus_submission(2.0, 1.0, 3.0), as_of())
        .expect("analysis succeeds");

    assert_eq!(report.completeness_level, CompletenessLevel::FullPlus);
    assert_eq!(report.confidence, Confidence::High);
    assert!(!report.has_discrepancy("masked_distress"));
    assert!(report.has_discrepancy("unexpressed_vulnerability"));
    assert!(report.recommendations.clinical.is_some());
}

#[test]
fn full_plus_with_severe_dass_flags_masked_distress() {
    let (service, _, log) = build_service(Vec::new());
    let report = service
        .analyze_submission(full_plus_submission(28.0, 20.0, 22.0), as_of())
        .expect("analysis succeeds");

    assert!(report.has_discrepancy("masked_distress"));
    let clinical = report
        .recommendations
        .clinical
        .as_ref()
        .expect("clinical recommendations");
    assert_eq!(clinical.support_level, SupportLevel::Priority);
    assert_eq!(log.entries()[0].discrepancy_ids, vec!["masked_distress"]);
}

#[test]
fn repeated_requests_are_memoized_and_still_logged() {
    let (service, _, log) = build_service(Vec::new());

    let first = service
        .analyze_submission(full_plus_submission(10.0, 8.0, 15.0), as_of())
        .expect("first analysis");
    let second = service
        .analyze_submission(full_plus_submission(10.0, 8.0, 15.0), as_of())
        .expect("second analysis");

    assert_eq!(first, second);
    assert_eq!(service.memo_len(), 1);
    assert_eq!(log.entries().len(), 2);

    let later = service
        .analyze_submission(
            full_plus_submission(10.0, 8.0, 15.0),
            as_of() + Duration::days(1),
        )
        .expect("later analysis");
    assert_eq!(service.memo_len(), 2);
    assert_eq!(later.as_of, as_of() + Duration::days(1));
}

#[test]
fn memoized_result_matches_engine_output() {
    let (service, _, _) = build_service(Vec::new());
    let submission = full_plus_submission(28.0, 20.0, 22.0);
    let direct = service.engine().analyze(&bundle(submission.clone()), as_of());

    let cached = service
        .analyze_submission(submission.clone(), as_of())
        .and_then(|_| service.analyze_submission(submission, as_of()))
        .expect("analysis succeeds");
    assert_eq!(cached, direct);
}

#[test]
fn unknown_user_is_not_found() {
    let (service, _, log) = build_service(Vec::new());

    match service.analyze_user(&UserId("ghost".to_string()), as_of()) {
        Err(AnalysisServiceError::Repository(RepositoryError::NotFound(user_id))) => {
            assert_eq!(user_id.0, "ghost")
        }
        other => panic!("expected not found, got {other:?}"),
    }
    assert!(log.entries().is_empty());
}

#[test]
fn repository_outage_is_propagated() {
    let service = AnalysisService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryLog::default()),
        AnalysisConfig::default(),
    );

    match service.analyze_user(&UserId("user-1".to_string()), as_of()) {
        Err(AnalysisServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected unavailable, got {other:?}"),
    }
}

#[test]
fn log_failures_surface_as_errors() {
    let service = AnalysisService::new(
        Arc::new(MemoryRepository::default()),
        Arc::new(FailingLog),
        AnalysisConfig::default(),
    );

    match service.analyze_submission(trait_only_submission(), as_of()) {
        Err(AnalysisServiceError::Log(_)) => {}
        other => panic!("expected log error, got {other:?}"),
    }
}

#[test]
fn invalid_submission_is_rejected_before_analysis() {
    let (service, _, log) = build_service(Vec::new());
    let mut submission = AssessmentSubmission::empty("user-1");
    submission.mbti = Some(mbti("ABCD"));

    match service.analyze_submission(submission, as_of()) {
        Err(AnalysisServiceError::Validation(ValidationError::UnknownMbtiType(_))) => {}
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(log.entries().is_empty());
    assert_eq!(service.memo_len(), 0);
}

#[test]
fn custom_recommendation_limit_is_respected() {
    let config = AnalysisConfig {
        recommendation_limit: 2,
        ..AnalysisConfig::default()
    };
    let service = AnalysisService::new(
        Arc::new(MemoryRepository::default()),
        Arc::new(MemoryLog::default()),
        config,
    );

    let report = service
        .analyze_submission(trait_only_submission(), as_of())
        .expect("analysis succeeds");
    let career = report.recommendations.career.expect("career");
    assert_eq!(career.matches.len(), 2);
}

struct Unencodable;

impl serde::Serialize for Unencodable {
    fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom("encoder offline"))
    }
}

#[test]
fn unencodable_snapshot_is_stored_as_null() {
    let user_id = UserId("user-1".to_string());
    assert_eq!(
        crate::analysis::engine::snapshot(&user_id, &Unencodable),
        serde_json::Value::Null
    );

    let report = crate::analysis::engine::snapshot(&user_id, &vec![1, 2]);
    assert_eq!(report, serde_json::json!([1, 2]));
}
