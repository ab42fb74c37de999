use std::collections::BTreeSet;

use tracing::debug;

use super::domain::{
    AssessmentBundle, AssessmentSubmission, BigFiveReadings, BigFiveSubmission, BigFiveTrait,
    DassRaw, DassSubmission, DassSubscale, Dated, MbtiSubmission, MbtiType, Source,
    StrengthCategory, TraitReading, ViaProfile, ViaStrength, ViaSubmission,
};

/// Big Five subscale sums: 20 items scored 1-5 per trait.
pub const BIG_FIVE_RAW_MIN: f64 = 20.0;
pub const BIG_FIVE_RAW_MAX: f64 = 100.0;
/// DASS-21 subscale sums after doubling to the DASS-42 metric.
pub const DASS_RAW_MIN: f64 = 0.0;
pub const DASS_RAW_MAX: f64 = 42.0;
/// Traits that must be measured (raw or stored) before Big Five counts as a present source.
pub const MIN_MEASURED_TRAITS: usize = 3;
/// Signature strengths taken from the top of the ranking when no category tags are supplied.
pub const DEFAULT_SIGNATURE_COUNT: usize = 5;

/// Validation errors raised before any normalization runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("user id must not be blank")]
    MissingUserId,
    #[error("{instrument} {dimension} must be a finite number")]
    NonFinite {
        instrument: &'static str,
        dimension: &'static str,
    },
    #[error("{instrument} {dimension} score {value} is outside the possible range {min}..={max}")]
    RawOutOfRange {
        instrument: &'static str,
        dimension: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("stored {dimension} percentile {value} is outside 0..=100")]
    PercentileOutOfRange { dimension: &'static str, value: f64 },
    #[error("unknown MBTI type code '{0}'")]
    UnknownMbtiType(String),
    #[error("unknown VIA strength '{0}'")]
    UnknownStrength(String),
    #[error("VIA strength '{0}' is listed more than once")]
    DuplicateStrength(String),
}

/// Boundary that turns loosely-shaped submissions into a validated [`AssessmentBundle`].
#[derive(Debug, Clone, Default)]
pub struct InputAggregator;

impl InputAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(
        &self,
        submission: AssessmentSubmission,
    ) -> Result<AssessmentBundle, ValidationError> {
        if submission.user_id.0.trim().is_empty() {
            return Err(ValidationError::MissingUserId);
        }

        let big_five = match submission.big_five {
            Some(big_five) => resolve_big_five(big_five)?,
            None => Source::Absent,
        };
        let mbti = match submission.mbti {
            Some(mbti) => resolve_mbti(mbti)?,
            None => Source::Absent,
        };
        let via = match submission.via {
            Some(via) => resolve_via(via)?,
            None => Source::Absent,
        };
        let dass = match submission.dass21 {
            Some(dass) => Source::Present(resolve_dass(dass)?),
            None => Source::Absent,
        };

        debug!(
            user_id = %submission.user_id,
            big_five = big_five.is_present(),
            mbti = mbti.is_present(),
            via = via.is_present(),
            dass = dass.is_present(),
            "aggregated assessment sources"
        );

        Ok(AssessmentBundle {
            user_id: submission.user_id,
            big_five,
            mbti,
            via,
            dass,
        })
    }
}

fn resolve_big_five(
    submission: BigFiveSubmission,
) -> Result<Source<Dated<BigFiveReadings>>, ValidationError> {
    let mut readings = [TraitReading::Assumed; 5];

    for trait_ in BigFiveTrait::ALL {
        let raw = submission
            .raw
            .get(trait_)
            .map(|value| {
                check_range(
                    "big_five",
                    trait_.label(),
                    value,
                    BIG_FIVE_RAW_MIN,
                    BIG_FIVE_RAW_MAX,
                )
            })
            .transpose()?;
        let stored = submission
            .percentiles
            .get(trait_)
            .map(|value| check_percentile(trait_.label(), value))
            .transpose()?;

        readings[trait_.index()] = match (raw, stored) {
            (Some(raw), _) => TraitReading::Raw(raw),
            (None, Some(percentile)) => TraitReading::StoredPercentile(percentile),
            (None, None) => TraitReading::Assumed,
        };
    }

    let measured = readings.iter().filter(|reading| !reading.is_assumed()).count();
    if measured < MIN_MEASURED_TRAITS {
        debug!(measured, "too few Big Five traits measured; treating source as absent");
        return Ok(Source::Absent);
    }

    let [openness, conscientiousness, extraversion, agreeableness, neuroticism] = readings;
    Ok(Source::Present(Dated {
        value: BigFiveReadings {
            openness,
            conscientiousness,
            extraversion,
            agreeableness,
            neuroticism,
        },
        completed_at: submission.completed_at,
    }))
}

fn resolve_mbti(submission: MbtiSubmission) -> Result<Source<Dated<MbtiType>>, ValidationError> {
    if submission.code.trim().is_empty() {
        return Ok(Source::Absent);
    }

    let mbti = submission
        .code
        .parse::<MbtiType>()
        .map_err(ValidationError::UnknownMbtiType)?;

    Ok(Source::Present(Dated {
        value: mbti,
        completed_at: submission.completed_at,
    }))
}

fn resolve_via(submission: ViaSubmission) -> Result<Source<Dated<ViaProfile>>, ValidationError> {
    if submission.strengths.is_empty() {
        return Ok(Source::Absent);
    }

    let mut seen = BTreeSet::new();
    let mut entries = Vec::with_capacity(submission.strengths.len());
    for (position, entry) in submission.strengths.iter().enumerate() {
        let strength = ViaStrength::from_label(&entry.name)
            .ok_or_else(|| ValidationError::UnknownStrength(entry.name.clone()))?;
        if !seen.insert(strength) {
            return Err(ValidationError::DuplicateStrength(entry.name.clone()));
        }
        entries.push((strength, entry.rank, entry.category, position));
    }

    // Unranked entries keep their submitted order after every ranked one.
    entries.sort_by_key(|(_, rank, _, position)| (rank.is_none(), *rank, *position));

    let tagged = entries.iter().any(|(_, _, category, _)| category.is_some());
    let signature: Vec<ViaStrength> = if tagged {
        entries
            .iter()
            .filter(|(_, _, category, _)| *category == Some(StrengthCategory::Signature))
            .map(|(strength, ..)| *strength)
            .collect()
    } else {
        entries
            .iter()
            .take(DEFAULT_SIGNATURE_COUNT)
            .map(|(strength, ..)| *strength)
            .collect()
    };

    Ok(Source::Present(Dated {
        value: ViaProfile {
            ranked: entries.iter().map(|(strength, ..)| *strength).collect(),
            signature,
        },
        completed_at: submission.completed_at,
    }))
}

fn resolve_dass(submission: DassSubmission) -> Result<Dated<DassRaw>, ValidationError> {
    let check = |subscale: DassSubscale, value: f64| {
        check_range("dass21", subscale.label(), value, DASS_RAW_MIN, DASS_RAW_MAX)
    };

    Ok(Dated {
        value: DassRaw {
            depression: check(DassSubscale::Depression, submission.depression)?,
            anxiety: check(DassSubscale::Anxiety, submission.anxiety)?,
            stress: check(DassSubscale::Stress, submission.stress)?,
        },
        completed_at: submission.completed_at,
    })
}

fn check_range(
    instrument: &'static str,
    dimension: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite {
            instrument,
            dimension,
        });
    }
    if value < min || value > max {
        return Err(ValidationError::RawOutOfRange {
            instrument,
            dimension,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

fn check_percentile(dimension: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite {
            instrument: "big_five",
            dimension,
        });
    }
    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::PercentileOutOfRange { dimension, value });
    }
    Ok(value)
}
