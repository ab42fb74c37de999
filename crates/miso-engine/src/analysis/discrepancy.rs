//! Trait-versus-state mismatch rules.
//!
//! Every rule reads the same borrowed inputs and either fires or not. Rules never see each
//! other's results, so the detector output is the union of the rules that fire, in table order.

use serde::Serialize;

use super::domain::{BigFiveTrait, DassSubscale, ViaStrength};
use super::normalizer::{BigFiveScores, DassScores, DassSeverity, TraitLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscrepancySeverity {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    pub id: &'static str,
    pub name: &'static str,
    pub severity: DiscrepancySeverity,
    pub interpretation: String,
}

/// Strengths that predict an optimistic, energized outlook.
pub const OPTIMISM_STRENGTHS: [ViaStrength; 3] =
    [ViaStrength::Hope, ViaStrength::Zest, ViaStrength::Humor];
/// Strengths that predict sustained self-directed effort.
pub const SELF_DIRECTION_STRENGTHS: [ViaStrength; 2] =
    [ViaStrength::Perseverance, ViaStrength::SelfRegulation];

/// Borrowed view shared by every rule.
#[derive(Debug, Clone, Copy)]
pub struct DiscrepancyInput<'a> {
    pub traits: &'a BigFiveScores,
    pub clinical: &'a DassScores,
    pub signature_strengths: &'a [ViaStrength],
}

impl DiscrepancyInput<'_> {
    fn first_signature(&self, candidates: &[ViaStrength]) -> Option<ViaStrength> {
        self.signature_strengths
            .iter()
            .copied()
            .find(|strength| candidates.contains(strength))
    }
}

/// One independent predicate in the detector table.
pub struct DiscrepancyRule {
    pub id: &'static str,
    pub name: &'static str,
    pub severity: DiscrepancySeverity,
    interpret: fn(&DiscrepancyInput<'_>) -> Option<String>,
}

impl DiscrepancyRule {
    pub fn evaluate(&self, input: &DiscrepancyInput<'_>) -> Option<Discrepancy> {
        (self.interpret)(input).map(|interpretation| Discrepancy {
            id: self.id,
            name: self.name,
            severity: self.severity,
            interpretation,
        })
    }
}

static RULES: [DiscrepancyRule; 6] = [
    DiscrepancyRule {
        id: "masked_distress",
        name: "Masked distress",
        severity: DiscrepancySeverity::High,
        interpret: masked_distress,
    },
    DiscrepancyRule {
        id: "acute_state_distress",
        name: "Acute distress despite stable temperament",
        severity: DiscrepancySeverity::High,
        interpret: acute_state_distress,
    },
    DiscrepancyRule {
        id: "unexpressed_vulnerability",
        name: "Unexpressed vulnerability",
        severity: DiscrepancySeverity::Low,
        interpret: unexpressed_vulnerability,
    },
    DiscrepancyRule {
        id: "social_masking",
        name: "Social masking",
        severity: DiscrepancySeverity::Moderate,
        interpret: social_masking,
    },
    DiscrepancyRule {
        id: "perfectionistic_overload",
        name: "Perfectionistic overload",
        severity: DiscrepancySeverity::Moderate,
        interpret: perfectionistic_overload,
    },
    DiscrepancyRule {
        id: "strength_depletion",
        name: "Strength depletion",
        severity: DiscrepancySeverity::Moderate,
        interpret: strength_depletion,
    },
];

pub fn rules() -> &'static [DiscrepancyRule] {
    &RULES
}

pub fn detect(
    traits: &BigFiveScores,
    clinical: &DassScores,
    signature_strengths: &[ViaStrength],
) -> Vec<Discrepancy> {
    let input = DiscrepancyInput {
        traits,
        clinical,
        signature_strengths,
    };
    RULES.iter().filter_map(|rule| rule.evaluate(&input)).collect()
}

fn masked_distress(input: &DiscrepancyInput<'_>) -> Option<String> {
    let strength = input.first_signature(&OPTIMISM_STRENGTHS)?;
    let depression = input.clinical.get(DassSubscale::Depression);
    if depression.severity < DassSeverity::Moderate {
        return None;
    }
    Some(format!(
        "{} is a signature strength, yet depression is {} (score {:.0}); an optimistic self-image may be covering current low mood",
        strength.label(),
        depression.severity.label(),
        depression.raw
    ))
}

fn acute_state_distress(input: &DiscrepancyInput<'_>) -> Option<String> {
    if !input.traits.is(BigFiveTrait::Neuroticism, TraitLevel::Low) {
        return None;
    }
    let (subscale, severity) = DassSubscale::ALL
        .iter()
        .map(|subscale| (*subscale, input.clinical.severity(*subscale)))
        .filter(|(_, severity)| *severity >= DassSeverity::Severe)
        .max_by_key(|(_, severity)| *severity)?;
    Some(format!(
        "neuroticism sits at the {:.0}th percentile, but {} is {}; symptoms likely reflect a recent situational stressor rather than temperament",
        input.traits.percentile(BigFiveTrait::Neuroticism),
        subscale.label(),
        severity.label()
    ))
}

fn unexpressed_vulnerability(input: &DiscrepancyInput<'_>) -> Option<String> {
    if !input.traits.is(BigFiveTrait::Neuroticism, TraitLevel::High) {
        return None;
    }
    if input.clinical.worst_severity() != DassSeverity::Normal {
        return None;
    }
    Some(format!(
        "neuroticism sits at the {:.0}th percentile while every DASS-21 subscale is normal; coping is currently effective or symptoms are under-reported",
        input.traits.percentile(BigFiveTrait::Neuroticism)
    ))
}

fn social_masking(input: &DiscrepancyInput<'_>) -> Option<String> {
    if !input.traits.is(BigFiveTrait::Extraversion, TraitLevel::High) {
        return None;
    }
    let depression = input.clinical.severity(DassSubscale::Depression);
    if depression < DassSeverity::Moderate {
        return None;
    }
    Some(format!(
        "outgoing temperament (extraversion {:.0}th percentile) alongside {} depression; social energy may be hiding withdrawal",
        input.traits.percentile(BigFiveTrait::Extraversion),
        depression.label()
    ))
}

fn perfectionistic_overload(input: &DiscrepancyInput<'_>) -> Option<String> {
    if !input.traits.is(BigFiveTrait::Conscientiousness, TraitLevel::High) {
        return None;
    }
    let stress = input.clinical.severity(DassSubscale::Stress);
    if stress < DassSeverity::Severe {
        return None;
    }
    Some(format!(
        "high conscientiousness ({:.0}th percentile) with {} stress; self-imposed standards are likely outrunning capacity",
        input.traits.percentile(BigFiveTrait::Conscientiousness),
        stress.label()
    ))
}

fn strength_depletion(input: &DiscrepancyInput<'_>) -> Option<String> {
    let strength = input.first_signature(&SELF_DIRECTION_STRENGTHS)?;
    let stress = input.clinical.severity(DassSubscale::Stress);
    if stress < DassSeverity::Moderate {
        return None;
    }
    Some(format!(
        "{} is a signature strength but stress is {}; sustained effort may be depleting the strength it relies on",
        strength.label(),
        stress.label()
    ))
}
