use super::normalizer::{instrument_for, normalize_key};
use super::{AssessmentImportError, Instrument};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One cleaned row of the long-format export.
#[derive(Debug, Clone)]
pub(crate) struct AssessmentRecord {
    pub(crate) line: u64,
    pub(crate) user_id: String,
    pub(crate) instrument: Instrument,
    pub(crate) dimension: String,
    pub(crate) value: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) completed_at: Option<DateTime<Utc>>,
}

pub(crate) fn parse_records<R: Read>(
    reader: R,
) -> Result<Vec<AssessmentRecord>, AssessmentImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, record) in csv_reader.deserialize::<AssessmentRow>().enumerate() {
        let row = record?;
        let line = index as u64 + 2;

        let instrument = instrument_for(&row.instrument).ok_or_else(|| {
            AssessmentImportError::InvalidRow {
                line,
                reason: format!("unknown instrument '{}'", row.instrument),
            }
        })?;

        let completed_at = match row.completed_at.as_deref() {
            Some(raw) => Some(parse_datetime(raw).ok_or_else(|| {
                AssessmentImportError::InvalidRow {
                    line,
                    reason: format!("unparseable completed_at '{raw}'"),
                }
            })?),
            None => None,
        };

        records.push(AssessmentRecord {
            line,
            user_id: row.user_id.trim().to_string(),
            instrument,
            dimension: normalize_key(&row.dimension),
            value: row.value,
            category: row.category.map(|category| normalize_key(&category)),
            completed_at,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct AssessmentRow {
    user_id: String,
    instrument: String,
    dimension: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    value: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    category: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    completed_at: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
pub(crate) fn parse_datetime_for_tests(value: &str) -> Option<DateTime<Utc>> {
    parse_datetime(value)
}
