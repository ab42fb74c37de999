//! Long-format CSV import of stored assessment results.
//!
//! Each row carries one measurement: `user_id,instrument,dimension,value,category,completed_at`.
//! Rows are grouped per user into an [`AssessmentSubmission`]; when a dimension appears more
//! than once the row with the latest `completed_at` wins, and later rows win ties.

mod normalizer;
mod parser;

use crate::analysis::{
    AssessmentSubmission, BigFiveSubmission, BigFiveTrait, DassSubmission, DassSubscale,
    MbtiSubmission, StrengthCategory, UserId, ViaStrengthEntry, ViaSubmission,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use parser::AssessmentRecord;

/// Instruments recognized in the `instrument` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Instrument {
    BigFive,
    Mbti,
    Via,
    Dass,
}

impl Instrument {
    pub const fn label(self) -> &'static str {
        match self {
            Instrument::BigFive => "big_five",
            Instrument::Mbti => "mbti",
            Instrument::Via => "via",
            Instrument::Dass => "dass21",
        }
    }
}

#[derive(Debug)]
pub enum AssessmentImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: u64, reason: String },
    MissingDimension {
        user_id: String,
        instrument: Instrument,
        dimension: &'static str,
    },
}

impl std::fmt::Display for AssessmentImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssessmentImportError::Io(err) => {
                write!(f, "failed to read assessment export: {}", err)
            }
            AssessmentImportError::Csv(err) => write!(f, "invalid assessment CSV data: {}", err),
            AssessmentImportError::InvalidRow { line, reason } => {
                write!(f, "line {}: {}", line, reason)
            }
            AssessmentImportError::MissingDimension {
                user_id,
                instrument,
                dimension,
            } => write!(
                f,
                "user {} has {} results without a {} score",
                user_id,
                instrument.label(),
                dimension
            ),
        }
    }
}

impl std::error::Error for AssessmentImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssessmentImportError::Io(err) => Some(err),
            AssessmentImportError::Csv(err) => Some(err),
            AssessmentImportError::InvalidRow { .. }
            | AssessmentImportError::MissingDimension { .. } => None,
        }
    }
}

impl From<std::io::Error> for AssessmentImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for AssessmentImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct AssessmentCsvImporter;

impl AssessmentCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<AssessmentSubmission>, AssessmentImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// One submission per user, ordered by user id.
    pub fn from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<AssessmentSubmission>, AssessmentImportError> {
        let mut users: BTreeMap<String, BTreeMap<(Instrument, String), AssessmentRecord>> =
            BTreeMap::new();

        for record in parser::parse_records(reader)? {
            if record.user_id.is_empty() {
                return Err(AssessmentImportError::InvalidRow {
                    line: record.line,
                    reason: "missing user_id".to_string(),
                });
            }

            let rows = users.entry(record.user_id.clone()).or_default();
            let key = (record.instrument, dedup_dimension(&record));
            let replace = match rows.get(&key) {
                Some(existing) => record.completed_at >= existing.completed_at,
                None => true,
            };
            if replace {
                rows.insert(key, record);
            }
        }

        users
            .into_iter()
            .map(|(user_id, rows)| build_submission(user_id, rows.into_values().collect()))
            .collect()
    }
}

/// MBTI carries one result per user whatever its dimension label says.
fn dedup_dimension(record: &AssessmentRecord) -> String {
    match record.instrument {
        Instrument::Mbti => String::new(),
        _ => record.dimension.clone(),
    }
}

fn build_submission(
    user_id: String,
    records: Vec<AssessmentRecord>,
) -> Result<AssessmentSubmission, AssessmentImportError> {
    let mut submission = AssessmentSubmission::empty(user_id.clone());
    let mut dass: BTreeMap<DassSubscale, f64> = BTreeMap::new();
    let mut dass_completed = None;

    for record in records {
        match record.instrument {
            Instrument::BigFive => {
                let (trait_, stored) = big_five_dimension(&record)?;
                let value = numeric_value(&record)?;
                let big_five = submission
                    .big_five
                    .get_or_insert_with(BigFiveSubmission::default);
                if stored {
                    big_five.percentiles.set(trait_, Some(value));
                } else {
                    big_five.raw.set(trait_, Some(value));
                }
                big_five.completed_at = latest(big_five.completed_at, record.completed_at);
            }
            Instrument::Mbti => {
                let code = record.value.clone().ok_or_else(|| AssessmentImportError::InvalidRow {
                    line: record.line,
                    reason: "MBTI row without a type code".to_string(),
                })?;
                submission.mbti = Some(MbtiSubmission {
                    code,
                    completed_at: record.completed_at,
                });
            }
            Instrument::Via => {
                let via = submission
                    .via
                    .get_or_insert_with(ViaSubmission::default);
                via.strengths.push(ViaStrengthEntry {
                    name: record.dimension.replace('_', " "),
                    rank: rank_value(&record)?,
                    category: category_value(&record)?,
                });
                via.completed_at = latest(via.completed_at, record.completed_at);
            }
            Instrument::Dass => {
                let subscale = dass_dimension(&record)?;
                dass.insert(subscale, numeric_value(&record)?);
                dass_completed = latest(dass_completed, record.completed_at);
            }
        }
    }

    if !dass.is_empty() {
        let score = |subscale: DassSubscale| {
            dass.get(&subscale)
                .copied()
                .ok_or_else(|| AssessmentImportError::MissingDimension {
                    user_id: user_id.clone(),
                    instrument: Instrument::Dass,
                    dimension: subscale.label(),
                })
        };
        submission.dass21 = Some(DassSubmission {
            depression: score(DassSubscale::Depression)?,
            anxiety: score(DassSubscale::Anxiety)?,
            stress: score(DassSubscale::Stress)?,
            completed_at: dass_completed,
        });
    }

    if let Some(via) = submission.via.as_mut() {
        via.strengths
            .sort_by_key(|entry| (entry.rank.is_none(), entry.rank));
    }

    Ok(submission)
}

fn latest(
    current: Option<DateTime<Utc>>,
    candidate: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    current.max(candidate)
}

fn big_five_dimension(
    record: &AssessmentRecord,
) -> Result<(BigFiveTrait, bool), AssessmentImportError> {
    let (name, stored) = match record.dimension.strip_suffix("_percentile") {
        Some(name) => (name, true),
        None => (record.dimension.as_str(), false),
    };
    BigFiveTrait::ALL
        .into_iter()
        .find(|trait_| trait_.label() == name)
        .map(|trait_| (trait_, stored))
        .ok_or_else(|| AssessmentImportError::InvalidRow {
            line: record.line,
            reason: format!("unknown Big Five dimension '{}'", record.dimension),
        })
}

fn dass_dimension(record: &AssessmentRecord) -> Result<DassSubscale, AssessmentImportError> {
    DassSubscale::ALL
        .into_iter()
        .find(|subscale| subscale.label() == record.dimension)
        .ok_or_else(|| AssessmentImportError::InvalidRow {
            line: record.line,
            reason: format!("unknown DASS-21 dimension '{}'", record.dimension),
        })
}

fn numeric_value(record: &AssessmentRecord) -> Result<f64, AssessmentImportError> {
    record
        .value
        .as_deref()
        .and_then(|value| value.trim().parse::<f64>().ok())
        .ok_or_else(|| AssessmentImportError::InvalidRow {
            line: record.line,
            reason: format!(
                "{} {} needs a numeric value",
                record.instrument.label(),
                record.dimension
            ),
        })
}

fn rank_value(record: &AssessmentRecord) -> Result<Option<u8>, AssessmentImportError> {
    record
        .value
        .as_deref()
        .map(|value| {
            value
                .trim()
                .parse::<u8>()
                .map_err(|_| AssessmentImportError::InvalidRow {
                    line: record.line,
                    reason: format!("VIA rank '{value}' is not a whole number"),
                })
        })
        .transpose()
}

fn category_value(
    record: &AssessmentRecord,
) -> Result<Option<StrengthCategory>, AssessmentImportError> {
    match record.category.as_deref() {
        None => Ok(None),
        Some("signature" | "top") => Ok(Some(StrengthCategory::Signature)),
        Some("middle") => Ok(Some(StrengthCategory::Middle)),
        Some("lesser" | "bottom") => Ok(Some(StrengthCategory::Lesser)),
        Some(other) => Err(AssessmentImportError::InvalidRow {
            line: record.line,
            reason: format!("unknown VIA category '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "user_id,instrument,dimension,value,category,completed_at\n";

    fn import(rows: &str) -> Result<Vec<AssessmentSubmission>, AssessmentImportError> {
        AssessmentCsvImporter::from_reader(Cursor::new(format!("{HEADER}{rows}")))
    }

    #[test]
    fn parse_datetime_supports_rfc3339_and_date_strings() {
        let rfc = parser::parse_datetime_for_tests("2026-03-01T10:00:00Z").expect("parse rfc");
        assert_eq!(rfc.to_rfc3339(), "2026-03-01T10:00:00+00:00");

        let date = parser::parse_datetime_for_tests("2026-03-05").expect("parse date");
        assert_eq!(date.to_rfc3339(), "2026-03-05T00:00:00+00:00");

        assert!(parser::parse_datetime_for_tests("  ").is_none());
        assert!(parser::parse_datetime_for_tests("last tuesday").is_none());
    }

    #[test]
    fn normalize_key_collapses_case_and_separators() {
        assert_eq!(
            normalizer::normalize_for_tests("\u{feff} Love of-Learning "),
            "love_of_learning"
        );
        assert_eq!(normalizer::normalize_for_tests("DASS-21"), "dass_21");
    }

    #[test]
    fn groups_rows_into_one_submission_per_user() {
        let submissions = import(
            "u2,mbti,type,ENFP,,2026-01-10\n\
u1,big_five,openness,60,,2026-01-10\n\
u1,big_five,conscientiousness,75,,2026-01-10\n\
u1,big_five,extraversion_percentile,12.5,,2026-01-10\n\
u1,dass21,depression,4,,2026-02-01\n\
u1,dass21,anxiety,2,,2026-02-01\n\
u1,dass21,stress,10,,2026-02-01\n\
u1,via,hope,1,signature,2026-01-12\n\
u1,via,Love of Learning,2,signature,2026-01-12\n",
        )
        .expect("import succeeds");

        assert_eq!(submissions.len(), 2);
        let first = &submissions[0];
        assert_eq!(first.user_id, UserId("u1".to_string()));

        let big_five = first.big_five.as_ref().expect("big five present");
        assert_eq!(big_five.raw.openness, Some(60.0));
        assert_eq!(big_five.raw.conscientiousness, Some(75.0));
        assert_eq!(big_five.percentiles.extraversion, Some(12.5));
        assert_eq!(big_five.raw.neuroticism, None);

        let dass = first.dass21.as_ref().expect("dass present");
        assert_eq!((dass.depression, dass.anxiety, dass.stress), (4.0, 2.0, 10.0));

        let via = first.via.as_ref().expect("via present");
        assert_eq!(via.strengths.len(), 2);
        assert_eq!(via.strengths[0].name, "hope");
        assert_eq!(via.strengths[1].name, "love of learning");
        assert_eq!(via.strengths[1].category, Some(StrengthCategory::Signature));

        let second = &submissions[1];
        assert_eq!(second.mbti.as_ref().map(|mbti| mbti.code.as_str()), Some("ENFP"));
        assert!(second.big_five.is_none());
    }

    #[test]
    fn latest_row_wins_for_repeated_dimension() {
        let submissions = import(
            "u1,dass21,depression,30,,2026-03-01\n\
u1,dass21,depression,6,,2025-03-01\n\
u1,dass21,anxiety,2,,2026-03-01\n\
u1,dass21,stress,8,,2026-03-01\n",
        )
        .expect("import succeeds");

        let dass = submissions[0].dass21.as_ref().expect("dass present");
        assert_eq!(dass.depression, 30.0);
    }

    #[test]
    fn latest_mbti_row_wins_across_dimension_labels() {
        let submissions = import(
            "u1,mbti,type,INTJ,,2026-03-01\n\
u1,mbti,code,ENFP,,2025-01-01\n",
        )
        .expect("import succeeds");

        let mbti = submissions[0].mbti.as_ref().expect("mbti present");
        assert_eq!(mbti.code, "INTJ");
    }

    #[test]
    fn incomplete_dass_is_rejected() {
        match import("u1,dass,depression,4,,\nu1,dass,stress,4,,\n") {
            Err(AssessmentImportError::MissingDimension { dimension, .. }) => {
                assert_eq!(dimension, "anxiety")
            }
            other => panic!("expected missing dimension, got {other:?}"),
        }
    }

    #[test]
    fn unknown_instrument_reports_line() {
        match import("u1,big_five,openness,60,,\nu1,rorschach,blot,3,,\n") {
            Err(AssessmentImportError::InvalidRow { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("rorschach"));
            }
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_score_is_rejected() {
        match import("u1,big_five,openness,high,,\n") {
            Err(AssessmentImportError::InvalidRow { line: 2, .. }) => {}
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = AssessmentCsvImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");

        match error {
            AssessmentImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
