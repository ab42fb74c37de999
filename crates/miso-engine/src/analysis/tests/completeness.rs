use std::collections::BTreeSet;

use chrono::Duration;

use super::common::*;

use crate::analysis::completeness::{
    assess, classify_sources, CompletenessLevel, Confidence, PartialKind,
};
use crate::analysis::domain::{AssessmentSource, AssessmentSubmission, BigFiveTrait};
use crate::analysis::{AnalysisConfig, AnalysisEngine};

fn year() -> Duration {
    Duration::days(365)
}

fn sources(list: &[AssessmentSource]) -> BTreeSet<AssessmentSource> {
    list.iter().copied().collect()
}

#[test]
fn source_table_covers_every_combination() {
    use AssessmentSource::*;

    assert_eq!(
        classify_sources(&sources(&[])),
        (CompletenessLevel::None, None, Confidence::Low)
    );
    assert_eq!(
        classify_sources(&sources(&[Mbti, Via])),
        (CompletenessLevel::Partial, Some(PartialKind::Supplementary), Confidence::Low)
    );
    assert_eq!(
        classify_sources(&sources(&[Dass, Via])),
        (CompletenessLevel::Partial, Some(PartialKind::Clinical), Confidence::Medium)
    );
    assert_eq!(
        classify_sources(&sources(&[BigFive])),
        (CompletenessLevel::Partial, Some(PartialKind::Trait), Confidence::Medium)
    );
    assert_eq!(
        classify_sources(&sources(&[BigFive, Dass])),
        (CompletenessLevel::Full, None, Confidence::High)
    );
    assert_eq!(
        classify_sources(&sources(&[BigFive, Dass, Mbti])),
        (CompletenessLevel::FullPlus, None, Confidence::High)
    );
}

#[test]
fn level_is_monotonic_in_sources_present() {
    let all = [
        AssessmentSource::BigFive,
        AssessmentSource::Mbti,
        AssessmentSource::Via,
        AssessmentSource::Dass,
    ];
    for mask in 0u8..16 {
        let subset: BTreeSet<_> = (0..4)
            .filter(|bit| mask & (1 << bit) != 0)
            .map(|bit| all[bit])
            .collect();
        let (level, _, _) = classify_sources(&subset);
        for extra in all {
            let mut superset = subset.clone();
            superset.insert(extra);
            let (wider, _, _) = classify_sources(&superset);
            assert!(wider >= level, "{subset:?} + {extra:?} lowered {level:?} to {wider:?}");
        }
    }
}

#[test]
fn trait_only_bundle_is_partial_with_medium_confidence() {
    let assessment = assess(&bundle(trait_only_submission()), as_of(), year());
    assert_eq!(assessment.level, CompletenessLevel::Partial);
    assert_eq!(assessment.partial_kind, Some(PartialKind::Trait));
    assert_eq!(assessment.confidence, Confidence::Medium);
    assert!(assessment.allows_profile_classification());
    assert!(!assessment.allows_discrepancy_detection());
}

#[test]
fn full_plus_bundle_has_high_confidence() {
    let assessment = assess(&bundle(full_plus_submission(2.0, 1.0, 3.0)), as_of(), year());
    assert_eq!(assessment.level, CompletenessLevel::FullPlus);
    assert_eq!(assessment.confidence, Confidence::High);
    assert!(assessment.allows_discrepancy_detection());
    assert!(assessment.stale_sources.is_empty());
}

#[test]
fn assumed_traits_lower_confidence() {
    let mut submission = full_plus_submission(2.0, 1.0, 3.0);
    if let Some(big_five) = submission.big_five.as_mut() {
        big_five.raw.agreeableness = None;
    }

    let assessment = assess(&bundle(submission), as_of(), year());
    assert_eq!(assessment.assumed_traits, vec![BigFiveTrait::Agreeableness]);
    assert_eq!(assessment.confidence, Confidence::Medium);
}

#[test]
fn stale_sources_lower_confidence_once() {
    let mut submission = full_plus_submission(2.0, 1.0, 3.0);
    let old = Some(as_of() - Duration::days(800));
    if let Some(big_five) = submission.big_five.as_mut() {
        big_five.completed_at = old;
    }
    if let Some(dass) = submission.dass21.as_mut() {
        dass.completed_at = old;
    }

    let assessment = assess(&bundle(submission), as_of(), year());
    assert_eq!(
        assessment.stale_sources,
        vec![AssessmentSource::BigFive, AssessmentSource::Dass]
    );
    assert_eq!(assessment.confidence, Confidence::Medium);
}

#[test]
fn undated_sources_are_never_stale() {
    let mut submission = AssessmentSubmission::empty("user-1");
    let mut dass_only = dass(5.0, 5.0, 5.0);
    dass_only.completed_at = None;
    submission.dass21 = Some(dass_only);

    let assessment = assess(&bundle(submission), as_of(), Duration::days(0));
    assert!(assessment.stale_sources.is_empty());
    assert_eq!(assessment.partial_kind, Some(PartialKind::Clinical));
}

#[test]
fn empty_bundle_is_none() {
    let assessment = assess(&bundle(AssessmentSubmission::empty("user-1")), as_of(), year());
    assert_eq!(assessment.level, CompletenessLevel::None);
    assert_eq!(assessment.confidence, Confidence::Low);
    assert!(assessment.sources_present.is_empty());
}

#[test]
fn oversized_stale_window_saturates_instead_of_panicking() {
    let config = AnalysisConfig {
        stale_after_days: 200_000_000_000,
        ..AnalysisConfig::default()
    };
    assert!(!config.has_valid_stale_window());
    assert_eq!(config.stale_after(), Duration::MAX);

    let mut submission = AssessmentSubmission::empty("user-1");
    submission.dass21 = Some(dass(12.0, 6.0, 10.0));
    let report = AnalysisEngine::new(config).analyze(&bundle(submission), as_of());

    assert_eq!(report.completeness_level, CompletenessLevel::Partial);
    assert!(report.completeness.stale_sources.is_empty());
}
