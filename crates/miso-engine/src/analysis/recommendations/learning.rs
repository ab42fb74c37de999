use std::cmp::Ordering;

use serde::Serialize;

use super::super::domain::BigFiveTrait;
use super::super::normalizer::{BigFiveScores, TraitLevel};

/// Low-tier techniques are dropped unless trait fit lifts them to at least this score.
pub const LOW_TIER_FLOOR: f64 = 35.0;

/// Utility ratings from Dunlosky et al. (2013).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectivenessTier {
    Low,
    Moderate,
    High,
}

impl EffectivenessTier {
    const fn base_score(self) -> f64 {
        match self {
            EffectivenessTier::High => 70.0,
            EffectivenessTier::Moderate => 50.0,
            EffectivenessTier::Low => 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyTechnique {
    pub name: &'static str,
    pub tier: EffectivenessTier,
    pub fit_score: f64,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningRecommendations {
    pub techniques: Vec<StudyTechnique>,
}

struct Technique {
    name: &'static str,
    tier: EffectivenessTier,
    summary: &'static str,
    adjustments: &'static [(BigFiveTrait, TraitLevel, f64, &'static str)],
}

const TECHNIQUES: [Technique; 10] = [
    Technique {
        name: "Practice testing",
        tier: EffectivenessTier::High,
        summary: "retrieve material from memory with low-stakes quizzes",
        adjustments: &[
            (
                BigFiveTrait::Conscientiousness,
                TraitLevel::High,
                10.0,
                "you follow through on self-testing routines",
            ),
            (
                BigFiveTrait::Neuroticism,
                TraitLevel::High,
                -10.0,
                "keep quizzes ungraded to limit test anxiety",
            ),
        ],
    },
    Technique {
        name: "Distributed practice",
        tier: EffectivenessTier::High,
        summary: "spread study sessions over days instead of cramming",
        adjustments: &[
            (
                BigFiveTrait::Conscientiousness,
                TraitLevel::Low,
                10.0,
                "a fixed schedule supplies the structure you rarely impose yourself",
            ),
            (
                BigFiveTrait::Conscientiousness,
                TraitLevel::High,
                5.0,
                "you are likely to keep a spacing plan",
            ),
        ],
    },
    Technique {
        name: "Interleaved practice",
        tier: EffectivenessTier::Moderate,
        summary: "mix problem types within a session",
        adjustments: &[
            (
                BigFiveTrait::Openness,
                TraitLevel::High,
                10.0,
                "variety keeps your curiosity engaged",
            ),
        ],
    },
    Technique {
        name: "Elaborative interrogation",
        tier: EffectivenessTier::Moderate,
        summary: "ask why each fact is true",
        adjustments: &[
            (BigFiveTrait::Openness, TraitLevel::High, 15.0, "you enjoy probing ideas"),
            (
                BigFiveTrait::Openness,
                TraitLevel::Low,
                -10.0,
                "abstract questioning may feel unrewarding",
            ),
        ],
    },
    Technique {
        name: "Self-explanation",
        tier: EffectivenessTier::Moderate,
        summary: "explain each step of a solution in your own words",
        adjustments: &[
            (
                BigFiveTrait::Extraversion,
                TraitLevel::High,
                10.0,
                "explaining aloud to peers suits your social energy",
            ),
        ],
    },
    Technique {
        name: "Summarization",
        tier: EffectivenessTier::Low,
        summary: "write summaries of the material",
        adjustments: &[
            (
                BigFiveTrait::Conscientiousness,
                TraitLevel::High,
                10.0,
                "you can sustain the effort good summaries need",
            ),
        ],
    },
    Technique {
        name: "Keyword mnemonic",
        tier: EffectivenessTier::Low,
        summary: "link new vocabulary to memorable keywords",
        adjustments: &[
            (
                BigFiveTrait::Openness,
                TraitLevel::High,
                10.0,
                "vivid associations come easily to you",
            ),
        ],
    },
    Technique {
        name: "Imagery for text",
        tier: EffectivenessTier::Low,
        summary: "form mental images while reading",
        adjustments: &[
            (BigFiveTrait::Openness, TraitLevel::High, 10.0, "you think readily in images"),
        ],
    },
    Technique {
        name: "Highlighting",
        tier: EffectivenessTier::Low,
        summary: "mark key passages",
        adjustments: &[],
    },
    Technique {
        name: "Rereading",
        tier: EffectivenessTier::Low,
        summary: "read the material again",
        adjustments: &[
            (
                BigFiveTrait::Neuroticism,
                TraitLevel::High,
                -5.0,
                "rereading can feed a false sense of mastery that later raises anxiety",
            ),
        ],
    },
];

pub fn recommend(traits: &BigFiveScores, limit: usize) -> LearningRecommendations {
    let mut techniques: Vec<StudyTechnique> = TECHNIQUES
        .iter()
        .map(|technique| {
            let mut fit_score = technique.tier.base_score();
            let mut notes = vec![technique.summary.to_string()];
            for (trait_, level, delta, note) in technique.adjustments {
                if traits.is(*trait_, *level) {
                    fit_score += delta;
                    notes.push((*note).to_string());
                }
            }

            StudyTechnique {
                name: technique.name,
                tier: technique.tier,
                fit_score: fit_score.clamp(0.0, 100.0),
                rationale: notes.join("; "),
            }
        })
        .filter(|technique| {
            technique.tier != EffectivenessTier::Low || technique.fit_score >= LOW_TIER_FLOOR
        })
        .collect();

    techniques.sort_by(|a, b| {
        b.fit_score
            .partial_cmp(&a.fit_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.tier.cmp(&a.tier))
            .then_with(|| a.name.cmp(b.name))
    });
    techniques.truncate(limit);

    LearningRecommendations { techniques }
}
