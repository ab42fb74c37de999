//! Behavioral profile decision table.
//!
//! Rules are checked in priority order and the first match wins. The last row has no
//! conditions, so every level combination maps to exactly one profile. Priority rationale:
//! multi-risk combinations come before single-risk ones, risk profiles before protective ones,
//! and `balanced` is always last.

use serde::Serialize;

use super::domain::BigFiveTrait;
use super::normalizer::{BigFiveScores, DassSeverity, LevelVector, TraitLevel};

use BigFiveTrait::{Agreeableness as A, Conscientiousness as C, Extraversion as E};
use BigFiveTrait::{Neuroticism as N, Openness as O};
use LevelMatch::{Is, Not};
use TraitLevel::{High, Low};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileId {
    CompoundedVulnerability,
    VulnerableIntrovert,
    ImpulsiveReactive,
    AnxiousPerfectionist,
    ExpressiveReactive,
    ResilientAchiever,
    SocialConnector,
    CreativeExplorer,
    DisengagedDrifter,
    GuardedIndependent,
    Balanced,
}

impl ProfileId {
    pub const fn as_str(self) -> &'static str {
        match self {
            ProfileId::CompoundedVulnerability => "compounded_vulnerability",
            ProfileId::VulnerableIntrovert => "vulnerable_introvert",
            ProfileId::ImpulsiveReactive => "impulsive_reactive",
            ProfileId::AnxiousPerfectionist => "anxious_perfectionist",
            ProfileId::ExpressiveReactive => "expressive_reactive",
            ProfileId::ResilientAchiever => "resilient_achiever",
            ProfileId::SocialConnector => "social_connector",
            ProfileId::CreativeExplorer => "creative_explorer",
            ProfileId::DisengagedDrifter => "disengaged_drifter",
            ProfileId::GuardedIndependent => "guarded_independent",
            ProfileId::Balanced => "balanced",
        }
    }

    /// Static catalog entry for the profile.
    pub fn profile(self) -> PsychologicalProfile {
        use DassSeverity::{Mild, Moderate, Normal, Severe};

        let (name, risk_level, mechanism, predicted) = match self {
            ProfileId::CompoundedVulnerability => (
                "Compounded Vulnerability",
                RiskLevel::Critical,
                "High emotional reactivity meets social withdrawal and weak self-regulation: stress is felt intensely, processed alone, and not buffered by routine, so low mood tends to persist and escalate.",
                (Severe, Moderate, Severe),
            ),
            ProfileId::VulnerableIntrovert => (
                "Vulnerable Introvert",
                RiskLevel::High,
                "Strong negative emotionality combined with low social drive: rumination replaces social support, which raises the likelihood of depressive and anxious episodes.",
                (Moderate, Moderate, Moderate),
            ),
            ProfileId::ImpulsiveReactive => (
                "Impulsive Reactive",
                RiskLevel::High,
                "Emotional reactivity with little structure: distress converts into impulsive coping and disrupted routines that feed further stress.",
                (Moderate, Moderate, Severe),
            ),
            ProfileId::AnxiousPerfectionist => (
                "Anxious Perfectionist",
                RiskLevel::Medium,
                "High standards driven by worry: conscientiousness keeps functioning intact while fear of failure keeps anxiety and stress elevated.",
                (Mild, Moderate, Moderate),
            ),
            ProfileId::ExpressiveReactive => (
                "Expressive Reactive",
                RiskLevel::Medium,
                "Emotions run high but are expressed and shared: social contact buffers mood, though stress spikes are frequent.",
                (Mild, Mild, Moderate),
            ),
            ProfileId::ResilientAchiever => (
                "Resilient Achiever",
                RiskLevel::VeryLow,
                "Emotional stability plus disciplined routines: setbacks are absorbed and converted into planned action.",
                (Normal, Normal, Normal),
            ),
            ProfileId::SocialConnector => (
                "Social Connector",
                RiskLevel::VeryLow,
                "Warm, outgoing and steady: a wide support network buffers most stressors.",
                (Normal, Normal, Normal),
            ),
            ProfileId::CreativeExplorer => (
                "Creative Explorer",
                RiskLevel::Low,
                "Curiosity and cognitive flexibility reframe difficulties as problems to explore, keeping distress low.",
                (Normal, Normal, Mild),
            ),
            ProfileId::DisengagedDrifter => (
                "Disengaged Drifter",
                RiskLevel::Medium,
                "Low drive and low social engagement: without structure or contact, motivation and mood can slowly erode.",
                (Mild, Normal, Mild),
            ),
            ProfileId::GuardedIndependent => (
                "Guarded Independent",
                RiskLevel::Low,
                "Self-reliant and reserved: problems are handled privately, which works until stressors exceed solo capacity.",
                (Mild, Normal, Mild),
            ),
            ProfileId::Balanced => (
                "Balanced",
                RiskLevel::Low,
                "No trait sits at an extreme that predisposes toward distress; outcomes depend mostly on circumstances.",
                (Normal, Normal, Normal),
            ),
        };

        let (depression, anxiety, stress) = predicted;
        PsychologicalProfile {
            id: self,
            name,
            risk_level,
            mechanism,
            predicted_dass: PredictedDass {
                depression,
                anxiety,
                stress,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PredictedDass {
    pub depression: DassSeverity,
    pub anxiety: DassSeverity,
    pub stress: DassSeverity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PsychologicalProfile {
    pub id: ProfileId,
    pub name: &'static str,
    pub risk_level: RiskLevel,
    pub mechanism: &'static str,
    pub predicted_dass: PredictedDass,
}

#[derive(Debug, Clone, Copy)]
enum LevelMatch {
    Is(TraitLevel),
    Not(TraitLevel),
}

impl LevelMatch {
    fn matches(self, level: TraitLevel) -> bool {
        match self {
            LevelMatch::Is(expected) => level == expected,
            LevelMatch::Not(excluded) => level != excluded,
        }
    }
}

struct ProfileRule {
    profile: ProfileId,
    conditions: &'static [(BigFiveTrait, LevelMatch)],
}

impl ProfileRule {
    fn matches(&self, levels: &LevelVector) -> bool {
        self.conditions
            .iter()
            .all(|(trait_, condition)| condition.matches(levels.get(*trait_)))
    }
}

static DECISION_TABLE: [ProfileRule; 11] = [
    ProfileRule {
        profile: ProfileId::CompoundedVulnerability,
        conditions: &[(N, Is(High)), (E, Is(Low)), (C, Is(Low))],
    },
    ProfileRule {
        profile: ProfileId::VulnerableIntrovert,
        conditions: &[(N, Is(High)), (E, Is(Low))],
    },
    ProfileRule {
        profile: ProfileId::ImpulsiveReactive,
        conditions: &[(N, Is(High)), (C, Is(Low))],
    },
    ProfileRule {
        profile: ProfileId::AnxiousPerfectionist,
        conditions: &[(N, Is(High)), (C, Is(High))],
    },
    ProfileRule {
        profile: ProfileId::ExpressiveReactive,
        conditions: &[(N, Is(High)), (E, Is(High))],
    },
    ProfileRule {
        profile: ProfileId::ResilientAchiever,
        conditions: &[(N, Is(Low)), (C, Is(High))],
    },
    ProfileRule {
        profile: ProfileId::SocialConnector,
        conditions: &[(E, Is(High)), (A, Is(High)), (N, Not(High))],
    },
    ProfileRule {
        profile: ProfileId::CreativeExplorer,
        conditions: &[(O, Is(High)), (N, Not(High))],
    },
    ProfileRule {
        profile: ProfileId::DisengagedDrifter,
        conditions: &[(C, Is(Low)), (E, Is(Low))],
    },
    ProfileRule {
        profile: ProfileId::GuardedIndependent,
        conditions: &[(A, Is(Low)), (E, Is(Low))],
    },
    ProfileRule {
        profile: ProfileId::Balanced,
        conditions: &[],
    },
];

/// Profile ids in priority order.
pub fn priority_order() -> impl Iterator<Item = ProfileId> {
    DECISION_TABLE.iter().map(|rule| rule.profile)
}

pub fn classify_levels(levels: &LevelVector) -> PsychologicalProfile {
    DECISION_TABLE
        .iter()
        .find(|rule| rule.matches(levels))
        .map(|rule| rule.profile)
        .unwrap_or(ProfileId::Balanced)
        .profile()
}

pub fn classify(traits: &BigFiveScores) -> PsychologicalProfile {
    classify_levels(&traits.levels())
}
