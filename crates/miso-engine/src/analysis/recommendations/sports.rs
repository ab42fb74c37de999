use std::cmp::Ordering;

use serde::Serialize;

use super::super::domain::BigFiveTrait;
use super::super::normalizer::{level_for, BigFiveScores, TraitLevel};

pub const TOUGHNESS_CONSCIENTIOUSNESS_WEIGHT: f64 = 0.35;
pub const TOUGHNESS_STABILITY_WEIGHT: f64 = 0.35;
pub const TOUGHNESS_EXTRAVERSION_WEIGHT: f64 = 0.15;
pub const TOUGHNESS_OPENNESS_WEIGHT: f64 = 0.15;
/// How strongly mental toughness shifts the fit of demanding activities.
const DEMAND_SENSITIVITY: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySetting {
    Team,
    Individual,
    Either,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityMatch {
    pub name: &'static str,
    pub setting: ActivitySetting,
    pub fit_score: f64,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SportsRecommendations {
    pub mental_toughness: f64,
    pub toughness_level: TraitLevel,
    pub activities: Vec<ActivityMatch>,
}

struct Activity {
    name: &'static str,
    setting: ActivitySetting,
    demanding: bool,
    affinities: &'static [(BigFiveTrait, TraitLevel, f64)],
}

const ACTIVITIES: [Activity; 12] = [
    Activity {
        name: "Football",
        setting: ActivitySetting::Team,
        demanding: true,
        affinities: &[
            (BigFiveTrait::Extraversion, TraitLevel::High, 15.0),
            (BigFiveTrait::Agreeableness, TraitLevel::High, 10.0),
            (BigFiveTrait::Extraversion, TraitLevel::Low, -10.0),
        ],
    },
    Activity {
        name: "Basketball",
        setting: ActivitySetting::Team,
        demanding: true,
        affinities: &[
            (BigFiveTrait::Extraversion, TraitLevel::High, 15.0),
            (BigFiveTrait::Extraversion, TraitLevel::Low, -10.0),
        ],
    },
    Activity {
        name: "Distance running",
        setting: ActivitySetting::Individual,
        demanding: true,
        affinities: &[
            (BigFiveTrait::Conscientiousness, TraitLevel::High, 15.0),
            (BigFiveTrait::Extraversion, TraitLevel::Low, 10.0),
        ],
    },
    Activity {
        name: "Swimming",
        setting: ActivitySetting::Individual,
        demanding: false,
        affinities: &[
            (BigFiveTrait::Extraversion, TraitLevel::Low, 10.0),
            (BigFiveTrait::Neuroticism, TraitLevel::High, 5.0),
        ],
    },
    Activity {
        name: "Yoga",
        setting: ActivitySetting::Either,
        demanding: false,
        affinities: &[
            (BigFiveTrait::Neuroticism, TraitLevel::High, 15.0),
            (BigFiveTrait::Openness, TraitLevel::High, 10.0),
        ],
    },
    Activity {
        name: "Martial arts",
        setting: ActivitySetting::Individual,
        demanding: true,
        affinities: &[
            (BigFiveTrait::Conscientiousness, TraitLevel::High, 10.0),
            (BigFiveTrait::Conscientiousness, TraitLevel::Low, 5.0),
        ],
    },
    Activity {
        name: "Rock climbing",
        setting: ActivitySetting::Either,
        demanding: true,
        affinities: &[
            (BigFiveTrait::Openness, TraitLevel::High, 15.0),
            (BigFiveTrait::Neuroticism, TraitLevel::Low, 5.0),
        ],
    },
    Activity {
        name: "Tennis",
        setting: ActivitySetting::Either,
        demanding: true,
        affinities: &[
            (BigFiveTrait::Conscientiousness, TraitLevel::High, 10.0),
            (BigFiveTrait::Agreeableness, TraitLevel::Low, 5.0),
        ],
    },
    Activity {
        name: "Dance",
        setting: ActivitySetting::Either,
        demanding: false,
        affinities: &[
            (BigFiveTrait::Extraversion, TraitLevel::High, 10.0),
            (BigFiveTrait::Openness, TraitLevel::High, 10.0),
        ],
    },
    Activity {
        name: "Cycling",
        setting: ActivitySetting::Either,
        demanding: false,
        affinities: &[(BigFiveTrait::Conscientiousness, TraitLevel::High, 5.0)],
    },
    Activity {
        name: "Hiking",
        setting: ActivitySetting::Either,
        demanding: false,
        affinities: &[
            (BigFiveTrait::Openness, TraitLevel::High, 10.0),
            (BigFiveTrait::Neuroticism, TraitLevel::High, 5.0),
        ],
    },
    Activity {
        name: "Strength training",
        setting: ActivitySetting::Individual,
        demanding: false,
        affinities: &[
            (BigFiveTrait::Conscientiousness, TraitLevel::High, 10.0),
            (BigFiveTrait::Extraversion, TraitLevel::Low, 5.0),
        ],
    },
];

/// Mental-toughness composite on a 0-100 scale.
pub fn mental_toughness(traits: &BigFiveScores) -> f64 {
    let value = TOUGHNESS_CONSCIENTIOUSNESS_WEIGHT
        * traits.percentile(BigFiveTrait::Conscientiousness)
        + TOUGHNESS_STABILITY_WEIGHT * (100.0 - traits.percentile(BigFiveTrait::Neuroticism))
        + TOUGHNESS_EXTRAVERSION_WEIGHT * traits.percentile(BigFiveTrait::Extraversion)
        + TOUGHNESS_OPENNESS_WEIGHT * traits.percentile(BigFiveTrait::Openness);
    value.clamp(0.0, 100.0)
}

pub fn recommend(traits: &BigFiveScores, limit: usize) -> SportsRecommendations {
    let toughness = mental_toughness(traits);

    let mut activities: Vec<ActivityMatch> = ACTIVITIES
        .iter()
        .map(|activity| {
            let mut fit_score = 50.0;
            let mut reasons = Vec::new();
            for (trait_, level, delta) in activity.affinities {
                if traits.is(*trait_, *level) {
                    fit_score += delta;
                    reasons.push(format!("{} {}", level.label(), trait_.label()));
                }
            }
            if activity.demanding {
                fit_score += (toughness - 50.0) * DEMAND_SENSITIVITY;
                reasons.push(format!("demanding activity, mental toughness {toughness:.0}"));
            }

            let rationale = if reasons.is_empty() {
                "neutral trait fit".to_string()
            } else {
                reasons.join(", ")
            };

            ActivityMatch {
                name: activity.name,
                setting: activity.setting,
                fit_score: fit_score.clamp(0.0, 100.0),
                rationale,
            }
        })
        .collect();

    activities.sort_by(|a, b| {
        b.fit_score
            .partial_cmp(&a.fit_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(b.name))
    });
    activities.truncate(limit);

    SportsRecommendations {
        mental_toughness: toughness,
        toughness_level: level_for(toughness),
        activities,
    }
}
