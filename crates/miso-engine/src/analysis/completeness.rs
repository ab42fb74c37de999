use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::domain::{AssessmentBundle, AssessmentSource, BigFiveTrait};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletenessLevel {
    None,
    Partial,
    Full,
    FullPlus,
}

impl CompletenessLevel {
    pub const fn label(self) -> &'static str {
        match self {
            CompletenessLevel::None => "NONE",
            CompletenessLevel::Partial => "PARTIAL",
            CompletenessLevel::Full => "FULL",
            CompletenessLevel::FullPlus => "FULL_PLUS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// One step down, bottoming out at `Low`.
    pub const fn lowered(self) -> Self {
        match self {
            Confidence::High => Confidence::Medium,
            Confidence::Medium | Confidence::Low => Confidence::Low,
        }
    }
}

/// Which half of the data a PARTIAL assessment is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialKind {
    Trait,
    Clinical,
    Supplementary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletenessAssessment {
    pub level: CompletenessLevel,
    pub confidence: Confidence,
    pub sources_present: BTreeSet<AssessmentSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_kind: Option<PartialKind>,
    pub assumed_traits: Vec<BigFiveTrait>,
    pub stale_sources: Vec<AssessmentSource>,
}

impl CompletenessAssessment {
    pub fn has(&self, source: AssessmentSource) -> bool {
        self.sources_present.contains(&source)
    }

    pub fn allows_discrepancy_detection(&self) -> bool {
        self.level >= CompletenessLevel::Full
    }

    pub fn allows_profile_classification(&self) -> bool {
        self.has(AssessmentSource::BigFive)
    }
}

/// Ordered rule table; the first matching row wins.
pub fn classify_sources(
    sources: &BTreeSet<AssessmentSource>,
) -> (CompletenessLevel, Option<PartialKind>, Confidence) {
    let big_five = sources.contains(&AssessmentSource::BigFive);
    let dass = sources.contains(&AssessmentSource::Dass);
    let supplementary =
        sources.contains(&AssessmentSource::Mbti) || sources.contains(&AssessmentSource::Via);

    match (big_five, dass, supplementary) {
        (false, false, false) => (CompletenessLevel::None, None, Confidence::Low),
        (false, false, true) => (
            CompletenessLevel::Partial,
            Some(PartialKind::Supplementary),
            Confidence::Low,
        ),
        (false, true, _) => (
            CompletenessLevel::Partial,
            Some(PartialKind::Clinical),
            Confidence::Medium,
        ),
        (true, false, _) => (
            CompletenessLevel::Partial,
            Some(PartialKind::Trait),
            Confidence::Medium,
        ),
        (true, true, false) => (CompletenessLevel::Full, None, Confidence::High),
        (true, true, true) => (CompletenessLevel::FullPlus, None, Confidence::High),
    }
}

/// Assess which sources are usable and how far their results can be trusted as of `as_of`.
///
/// Sources without a completion timestamp are never considered stale.
pub fn assess(
    bundle: &AssessmentBundle,
    as_of: DateTime<Utc>,
    stale_after: Duration,
) -> CompletenessAssessment {
    let dated = [
        (
            AssessmentSource::BigFive,
            bundle.big_five.present().map(|dated| dated.completed_at),
        ),
        (
            AssessmentSource::Mbti,
            bundle.mbti.present().map(|dated| dated.completed_at),
        ),
        (
            AssessmentSource::Via,
            bundle.via.present().map(|dated| dated.completed_at),
        ),
        (
            AssessmentSource::Dass,
            bundle.dass.present().map(|dated| dated.completed_at),
        ),
    ];

    let mut sources_present = BTreeSet::new();
    let mut stale_sources = Vec::new();
    for (source, completed_at) in dated {
        let Some(completed_at) = completed_at else {
            continue;
        };
        sources_present.insert(source);
        if completed_at.is_some_and(|at| as_of - at > stale_after) {
            stale_sources.push(source);
        }
    }

    let (level, partial_kind, mut confidence) = classify_sources(&sources_present);

    let assumed_traits = bundle
        .big_five
        .present()
        .map(|dated| dated.value.assumed_traits())
        .unwrap_or_default();
    if !assumed_traits.is_empty() {
        confidence = confidence.lowered();
    }
    if !stale_sources.is_empty() {
        confidence = confidence.lowered();
    }

    CompletenessAssessment {
        level,
        confidence,
        sources_present,
        partial_kind,
        assumed_traits,
        stale_sources,
    }
}
