use std::cmp::Ordering;

use serde::Serialize;

use super::super::domain::{BigFiveTrait, MbtiType, Temperament};
use super::super::normalizer::BigFiveScores;

/// Bonus added to a career's compatibility when the MBTI temperament matches its affinity.
pub const TEMPERAMENT_BONUS: f64 = 5.0;
/// Weights of the first, second and third letter of a career's Holland code.
const CODE_POSITION_WEIGHTS: [f64; 3] = [0.5, 0.3, 0.2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HollandType {
    Realistic,
    Investigative,
    Artistic,
    Social,
    Enterprising,
    Conventional,
}

impl HollandType {
    pub const ALL: [HollandType; 6] = [
        HollandType::Realistic,
        HollandType::Investigative,
        HollandType::Artistic,
        HollandType::Social,
        HollandType::Enterprising,
        HollandType::Conventional,
    ];

    pub const fn letter(self) -> char {
        match self {
            HollandType::Realistic => 'R',
            HollandType::Investigative => 'I',
            HollandType::Artistic => 'A',
            HollandType::Social => 'S',
            HollandType::Enterprising => 'E',
            HollandType::Conventional => 'C',
        }
    }

    /// Trait loadings as `(trait, weight, inverted)`; weights per type sum to 1.
    const fn loadings(self) -> &'static [(BigFiveTrait, f64, bool)] {
        use BigFiveTrait::*;
        match self {
            HollandType::Realistic => &[
                (Conscientiousness, 0.4, false),
                (Neuroticism, 0.3, true),
                (Extraversion, 0.3, true),
            ],
            HollandType::Investigative => &[
                (Openness, 0.6, false),
                (Conscientiousness, 0.2, false),
                (Extraversion, 0.2, true),
            ],
            HollandType::Artistic => &[(Openness, 0.7, false), (Conscientiousness, 0.3, true)],
            HollandType::Social => &[
                (Extraversion, 0.45, false),
                (Agreeableness, 0.45, false),
                (Neuroticism, 0.1, true),
            ],
            HollandType::Enterprising => &[
                (Extraversion, 0.6, false),
                (Conscientiousness, 0.2, false),
                (Neuroticism, 0.2, true),
            ],
            HollandType::Conventional => &[(Conscientiousness, 0.7, false), (Openness, 0.3, true)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HollandScore {
    pub holland_type: HollandType,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerMatch {
    pub title: &'static str,
    pub holland_code: &'static str,
    pub compatibility: f64,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerRecommendations {
    pub dominant_code: String,
    pub holland_scores: Vec<HollandScore>,
    pub matches: Vec<CareerMatch>,
}

struct Career {
    title: &'static str,
    code: &'static str,
    temperament: Temperament,
}

const fn career(title: &'static str, code: &'static str, temperament: Temperament) -> Career {
    Career {
        title,
        code,
        temperament,
    }
}

const CAREERS: [Career; 18] = [
    career("Software Engineer", "ICR", Temperament::Analyst),
    career("Data Scientist", "ICE", Temperament::Analyst),
    career("Research Scientist", "IAR", Temperament::Analyst),
    career("Physician", "ISR", Temperament::Analyst),
    career("Graphic Designer", "AER", Temperament::Explorer),
    career("Writer", "AIS", Temperament::Diplomat),
    career("Architect", "AIR", Temperament::Analyst),
    career("Clinical Psychologist", "SIA", Temperament::Diplomat),
    career("Teacher", "SAE", Temperament::Diplomat),
    career("Nurse", "SIR", Temperament::Sentinel),
    career("Social Worker", "SEA", Temperament::Diplomat),
    career("Entrepreneur", "ESA", Temperament::Explorer),
    career("Sales Manager", "ESC", Temperament::Explorer),
    career("Lawyer", "EIS", Temperament::Analyst),
    career("Accountant", "CEI", Temperament::Sentinel),
    career("Project Manager", "ECS", Temperament::Sentinel),
    career("Civil Engineer", "RIC", Temperament::Sentinel),
    career("Electrician", "RCI", Temperament::Explorer),
];

pub fn holland_scores(traits: &BigFiveScores) -> Vec<HollandScore> {
    HollandType::ALL
        .iter()
        .map(|holland_type| {
            let score = holland_type
                .loadings()
                .iter()
                .map(|(trait_, weight, inverted)| {
                    let percentile = traits.percentile(*trait_);
                    let value = if *inverted { 100.0 - percentile } else { percentile };
                    value * weight
                })
                .sum::<f64>();
            HollandScore {
                holland_type: *holland_type,
                score,
            }
        })
        .collect()
}

fn score_for(scores: &[HollandScore], letter: char) -> f64 {
    scores
        .iter()
        .find(|entry| entry.holland_type.letter() == letter)
        .map(|entry| entry.score)
        .unwrap_or(0.0)
}

/// Scores sorted descending; ties keep RIASEC order.
fn ranked_types(scores: &[HollandScore]) -> Vec<HollandScore> {
    let mut ranked = scores.to_vec();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked
}

pub fn recommend(
    traits: &BigFiveScores,
    mbti: Option<&MbtiType>,
    limit: usize,
) -> CareerRecommendations {
    let scores = holland_scores(traits);
    let ranked = ranked_types(&scores);
    let dominant_code: String = ranked
        .iter()
        .take(3)
        .map(|entry| entry.holland_type.letter())
        .collect();
    let temperament = mbti.map(MbtiType::temperament);

    let mut matches: Vec<CareerMatch> = CAREERS
        .iter()
        .map(|career| {
            let fit = career
                .code
                .chars()
                .zip(CODE_POSITION_WEIGHTS)
                .map(|(letter, weight)| score_for(&scores, letter) * weight)
                .sum::<f64>();
            let bonus = if temperament == Some(career.temperament) {
                TEMPERAMENT_BONUS
            } else {
                0.0
            };
            let compatibility = (fit + bonus).clamp(0.0, 100.0);

            let mut rationale = format!(
                "Holland code {} against your profile {}",
                career.code, dominant_code
            );
            if bonus > 0.0 {
                if let Some(mbti) = mbti {
                    rationale.push_str(&format!("; suits the {mbti} temperament"));
                }
            }

            CareerMatch {
                title: career.title,
                holland_code: career.code,
                compatibility,
                rationale,
            }
        })
        .collect();

    matches.sort_by(|a, b| {
        b.compatibility
            .partial_cmp(&a.compatibility)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.title.cmp(b.title))
    });
    matches.truncate(limit);

    CareerRecommendations {
        dominant_code,
        holland_scores: scores,
        matches,
    }
}
