//! Per-domain recommendation synthesis.
//!
//! Career, learning and sports advice need Big Five scores; clinical guidance needs DASS-21.
//! A domain whose prerequisite is missing is omitted from the output rather than filled with
//! defaults.

pub mod career;
pub mod clinical;
pub mod learning;
pub mod sports;

use serde::Serialize;

use super::composite::CompositeScore;
use super::discrepancy::Discrepancy;
use super::domain::{MbtiType, ViaStrength};
use super::normalizer::NormalizedScores;
use super::profile::PsychologicalProfile;

pub use career::{CareerMatch, CareerRecommendations, HollandScore, HollandType};
pub use clinical::{ClinicalFlag, ClinicalRecommendations, FlagSource, SupportLevel};
pub use learning::{EffectivenessTier, LearningRecommendations, StudyTechnique};
pub use sports::{ActivityMatch, ActivitySetting, SportsRecommendations};

/// Everything the synthesizer reads; all borrowed from the current analysis pass.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisInput<'a> {
    pub normalized: &'a NormalizedScores,
    pub scores: Option<&'a CompositeScore>,
    pub profile: Option<&'a PsychologicalProfile>,
    pub discrepancies: &'a [Discrepancy],
    pub signature_strengths: &'a [ViaStrength],
    pub mbti: Option<&'a MbtiType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PersonalizedRecommendations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub career: Option<CareerRecommendations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning: Option<LearningRecommendations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sports: Option<SportsRecommendations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical: Option<ClinicalRecommendations>,
}

impl PersonalizedRecommendations {
    pub fn is_empty(&self) -> bool {
        self.career.is_none()
            && self.learning.is_none()
            && self.sports.is_none()
            && self.clinical.is_none()
    }
}

/// Build every domain whose prerequisite is satisfied, keeping at most `limit` ranked items each.
pub fn synthesize(input: &SynthesisInput<'_>, limit: usize) -> PersonalizedRecommendations {
    let traits = input.normalized.big_five.as_ref();

    PersonalizedRecommendations {
        career: traits.map(|traits| career::recommend(traits, input.mbti, limit)),
        learning: traits.map(|traits| learning::recommend(traits, limit)),
        sports: traits.map(|traits| sports::recommend(traits, limit)),
        clinical: input.normalized.dass.as_ref().map(|clinical| {
            clinical::recommend(
                clinical,
                traits,
                input.scores,
                input.profile,
                input.discrepancies,
                input.signature_strengths,
            )
        }),
    }
}
