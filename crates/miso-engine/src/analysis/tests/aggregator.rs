use super::common::*;

use crate::analysis::aggregator::{InputAggregator, ValidationError};
use crate::analysis::domain::{
    AssessmentSubmission, StrengthCategory, TraitReading, TraitValues, ViaStrength,
    ViaStrengthEntry, ViaSubmission,
};

fn aggregate(
    submission: AssessmentSubmission,
) -> Result<crate::analysis::AssessmentBundle, ValidationError> {
    InputAggregator::new().aggregate(submission)
}

#[test]
fn empty_submission_yields_all_sources_absent() {
    let bundle = aggregate(AssessmentSubmission::empty("user-1")).expect("valid");
    assert!(!bundle.big_five.is_present());
    assert!(!bundle.mbti.is_present());
    assert!(!bundle.via.is_present());
    assert!(!bundle.dass.is_present());
    assert!(bundle.signature_strengths().is_empty());
}

#[test]
fn blank_user_id_is_rejected() {
    match aggregate(AssessmentSubmission::empty("  ")) {
        Err(ValidationError::MissingUserId) => {}
        other => panic!("expected missing user id, got {other:?}"),
    }
}

#[test]
fn raw_score_takes_precedence_over_stored_percentile() {
    let mut big_five = introvert_big_five();
    big_five.percentiles.neuroticism = Some(10.0);
    let mut submission = AssessmentSubmission::empty("user-1");
    submission.big_five = Some(big_five);

    let bundle = aggregate(submission).expect("valid");
    let readings = bundle.big_five.present().expect("present").value;
    assert_eq!(readings.neuroticism, TraitReading::Raw(80.0));
}

#[test]
fn missing_traits_are_assumed_when_enough_are_measured() {
    let mut submission = AssessmentSubmission::empty("user-1");
    submission.big_five = Some(crate::analysis::BigFiveSubmission {
        raw: TraitValues {
            openness: Some(60.0),
            conscientiousness: Some(70.0),
            extraversion: None,
            agreeableness: None,
            neuroticism: Some(40.0),
        },
        ..Default::default()
    });

    let bundle = aggregate(submission).expect("valid");
    let readings = bundle.big_five.present().expect("present").value;
    assert_eq!(readings.extraversion, TraitReading::Assumed);
    assert_eq!(readings.assumed_traits().len(), 2);
}

#[test]
fn too_few_measured_traits_treats_big_five_as_absent() {
    let mut submission = AssessmentSubmission::empty("user-1");
    submission.big_five = Some(crate::analysis::BigFiveSubmission {
        raw: TraitValues {
            openness: Some(60.0),
            neuroticism: Some(40.0),
            ..Default::default()
        },
        ..Default::default()
    });

    let bundle = aggregate(submission).expect("valid");
    assert!(!bundle.big_five.is_present());
}

#[test]
fn out_of_range_raw_score_is_rejected() {
    let mut submission = AssessmentSubmission::empty("user-1");
    submission.dass21 = Some(dass(43.0, 0.0, 0.0));

    match aggregate(submission) {
        Err(ValidationError::RawOutOfRange {
            instrument,
            dimension,
            ..
        }) => {
            assert_eq!(instrument, "dass21");
            assert_eq!(dimension, "depression");
        }
        other => panic!("expected out of range error, got {other:?}"),
    }
}

#[test]
fn non_finite_scores_are_rejected() {
    let mut big_five = introvert_big_five();
    big_five.raw.openness = Some(f64::NAN);
    let mut submission = AssessmentSubmission::empty("user-1");
    submission.big_five = Some(big_five);

    match aggregate(submission) {
        Err(ValidationError::NonFinite { dimension, .. }) => assert_eq!(dimension, "openness"),
        other => panic!("expected non-finite error, got {other:?}"),
    }
}

#[test]
fn stored_percentile_outside_bounds_is_rejected() {
    let mut submission = AssessmentSubmission::empty("user-1");
    submission.big_five = Some(percentile_big_five([50.0, 50.0, 50.0, 50.0, 101.0]));

    match aggregate(submission) {
        Err(ValidationError::PercentileOutOfRange { dimension, .. }) => {
            assert_eq!(dimension, "neuroticism")
        }
        other => panic!("expected percentile error, got {other:?}"),
    }
}

#[test]
fn mbti_codes_are_validated_and_blank_is_absent() {
    let mut submission = AssessmentSubmission::empty("user-1");
    submission.mbti = Some(mbti("infj"));
    let bundle = aggregate(submission).expect("lowercase accepted");
    assert_eq!(bundle.mbti_type().map(|mbti| mbti.code()), Some("INFJ".to_string()));

    let mut submission = AssessmentSubmission::empty("user-1");
    submission.mbti = Some(mbti(" "));
    assert!(!aggregate(submission).expect("valid").mbti.is_present());

    let mut submission = AssessmentSubmission::empty("user-1");
    submission.mbti = Some(mbti("XNTJ"));
    match aggregate(submission) {
        Err(ValidationError::UnknownMbtiType(code)) => assert_eq!(code, "XNTJ"),
        other => panic!("expected unknown mbti, got {other:?}"),
    }
}

#[test]
fn unknown_and_duplicate_strengths_are_rejected() {
    let mut submission = AssessmentSubmission::empty("user-1");
    submission.via = Some(signature(&["Hope", "Telekinesis"]));
    match aggregate(submission) {
        Err(ValidationError::UnknownStrength(name)) => assert_eq!(name, "Telekinesis"),
        other => panic!("expected unknown strength, got {other:?}"),
    }

    let mut submission = AssessmentSubmission::empty("user-1");
    submission.via = Some(signature(&["Hope", "optimism"]));
    match aggregate(submission) {
        Err(ValidationError::DuplicateStrength(name)) => assert_eq!(name, "optimism"),
        other => panic!("expected duplicate strength, got {other:?}"),
    }
}

#[test]
fn signature_strengths_follow_category_tags() {
    let entry = |name: &str, rank: u8, category: StrengthCategory| ViaStrengthEntry {
        name: name.to_string(),
        rank: Some(rank),
        category: Some(category),
    };
    let mut submission = AssessmentSubmission::empty("user-1");
    submission.via = Some(ViaSubmission {
        strengths: vec![
            entry("Zest", 3, StrengthCategory::Middle),
            entry("Gratitude", 2, StrengthCategory::Signature),
            entry("Humor", 1, StrengthCategory::Signature),
        ],
        completed_at: None,
    });

    let bundle = aggregate(submission).expect("valid");
    assert_eq!(
        bundle.signature_strengths(),
        &[ViaStrength::Humor, ViaStrength::Gratitude]
    );
}

#[test]
fn untagged_strengths_use_top_five_by_rank() {
    let names = [
        "Kindness", "Hope", "Zest", "Fairness", "Humor", "Prudence", "Curiosity",
    ];
    let mut submission = AssessmentSubmission::empty("user-1");
    submission.via = Some(ViaSubmission {
        strengths: names
            .iter()
            .enumerate()
            .map(|(index, name)| ViaStrengthEntry {
                name: name.to_string(),
                rank: Some(7 - index as u8),
                category: None,
            })
            .collect(),
        completed_at: None,
    });

    let bundle = aggregate(submission).expect("valid");
    assert_eq!(
        bundle.signature_strengths(),
        &[
            ViaStrength::Curiosity,
            ViaStrength::Prudence,
            ViaStrength::Humor,
            ViaStrength::Fairness,
            ViaStrength::Zest,
        ]
    );
}

#[test]
fn empty_strength_list_is_absent() {
    let mut submission = AssessmentSubmission::empty("user-1");
    submission.via = Some(ViaSubmission::default());
    assert!(!aggregate(submission).expect("valid").via.is_present());
}
