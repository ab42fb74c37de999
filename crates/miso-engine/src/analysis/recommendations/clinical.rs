use serde::Serialize;

use super::super::composite::CompositeScore;
use super::super::discrepancy::{Discrepancy, DiscrepancySeverity};
use super::super::domain::{BigFiveTrait, DassSubscale, ViaStrength};
use super::super::normalizer::{BigFiveScores, DassScores, DassSeverity, TraitLevel};
use super::super::profile::{PsychologicalProfile, RiskLevel};

/// BVS at or above this value is flagged as elevated vulnerability.
pub const ELEVATED_VULNERABILITY: f64 = 0.65;
/// RCS at or above this value counts as a protective factor.
pub const STRONG_RESILIENCE: f64 = 0.60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportLevel {
    SelfCare,
    Monitoring,
    Professional,
    Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagSource {
    Discrepancy,
    Severity,
    Composite,
    Profile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClinicalFlag {
    pub source: FlagSource,
    pub severity: DiscrepancySeverity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicalRecommendations {
    pub support_level: SupportLevel,
    pub protective_factors: Vec<String>,
    pub flags: Vec<ClinicalFlag>,
    pub actions: Vec<&'static str>,
}

const PROTECTIVE_TRAITS: [(BigFiveTrait, TraitLevel, &str); 5] = [
    (BigFiveTrait::Neuroticism, TraitLevel::Low, "Emotional stability"),
    (BigFiveTrait::Conscientiousness, TraitLevel::High, "Structured self-regulation"),
    (BigFiveTrait::Extraversion, TraitLevel::High, "Active social engagement"),
    (BigFiveTrait::Agreeableness, TraitLevel::High, "Supportive relationship orientation"),
    (BigFiveTrait::Openness, TraitLevel::High, "Cognitive flexibility"),
];

fn severity_flag(severity: DassSeverity) -> Option<DiscrepancySeverity> {
    match severity {
        DassSeverity::Normal | DassSeverity::Mild => None,
        DassSeverity::Moderate => Some(DiscrepancySeverity::Low),
        DassSeverity::Severe => Some(DiscrepancySeverity::Moderate),
        DassSeverity::ExtremelySevere => Some(DiscrepancySeverity::High),
    }
}

const fn actions_for(level: SupportLevel) -> &'static [&'static str] {
    match level {
        SupportLevel::SelfCare => &[
            "Maintain sleep, movement and social routines",
            "Repeat the DASS-21 screening in three months",
        ],
        SupportLevel::Monitoring => &[
            "Track mood weekly and repeat the DASS-21 in four weeks",
            "Practice a daily stress-regulation routine such as paced breathing",
        ],
        SupportLevel::Professional => &[
            "Book a consultation with a licensed counselor or psychologist",
            "Share these results with the clinician for context",
        ],
        SupportLevel::Priority => &[
            "Seek a clinical assessment as soon as possible",
            "Contact a crisis line or emergency services if you feel unsafe",
        ],
    }
}

pub fn recommend(
    clinical: &DassScores,
    traits: Option<&BigFiveScores>,
    scores: Option<&CompositeScore>,
    profile: Option<&PsychologicalProfile>,
    discrepancies: &[Discrepancy],
    signature_strengths: &[ViaStrength],
) -> ClinicalRecommendations {
    let mut protective_factors: Vec<String> = signature_strengths
        .iter()
        .map(|strength| format!("Signature strength: {}", strength.label()))
        .collect();
    if let Some(traits) = traits {
        protective_factors.extend(
            PROTECTIVE_TRAITS
                .iter()
                .filter(|(trait_, level, _)| traits.is(*trait_, *level))
                .map(|(_, _, label)| (*label).to_string()),
        );
    }
    if scores.is_some_and(|scores| scores.rcs >= STRONG_RESILIENCE) {
        protective_factors.push("Strong overall resilience capacity".to_string());
    }

    let mut flags: Vec<ClinicalFlag> = discrepancies
        .iter()
        .map(|discrepancy| ClinicalFlag {
            source: FlagSource::Discrepancy,
            severity: discrepancy.severity,
            message: format!("{}: {}", discrepancy.name, discrepancy.interpretation),
        })
        .collect();

    for subscale in DassSubscale::ALL {
        let score = clinical.get(subscale);
        if let Some(severity) = severity_flag(score.severity) {
            flags.push(ClinicalFlag {
                source: FlagSource::Severity,
                severity,
                message: format!(
                    "{} is {} (score {:.0})",
                    subscale.label(),
                    score.severity.label(),
                    score.raw
                ),
            });
        }
    }

    let elevated = scores.filter(|scores| scores.bvs >= ELEVATED_VULNERABILITY);
    if let Some(scores) = elevated {
        flags.push(ClinicalFlag {
            source: FlagSource::Composite,
            severity: DiscrepancySeverity::Moderate,
            message: format!("base vulnerability score {:.2} is elevated", scores.bvs),
        });
    }

    if let Some(profile) = profile.filter(|profile| profile.risk_level >= RiskLevel::High) {
        flags.push(ClinicalFlag {
            source: FlagSource::Profile,
            severity: DiscrepancySeverity::Low,
            message: format!("{} profile carries a predisposing risk", profile.name),
        });
    }

    let worst = clinical.worst_severity();
    let worst_discrepancy = discrepancies.iter().map(|discrepancy| discrepancy.severity).max();
    let support_level = if worst == DassSeverity::ExtremelySevere
        || worst_discrepancy == Some(DiscrepancySeverity::High)
    {
        SupportLevel::Priority
    } else if worst == DassSeverity::Severe || elevated.is_some() {
        SupportLevel::Professional
    } else if worst > DassSeverity::Normal || worst_discrepancy.is_some() {
        SupportLevel::Monitoring
    } else {
        SupportLevel::SelfCare
    };

    ClinicalRecommendations {
        support_level,
        protective_factors,
        flags,
        actions: actions_for(support_level).to_vec(),
    }
}
