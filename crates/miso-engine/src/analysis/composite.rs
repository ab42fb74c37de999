//! Base Vulnerability Score (BVS) and Resilience Capacity Score (RCS).
//!
//! Both indices are weighted means of 0-100 percentile components rescaled to the closed
//! range [0, 1]. Higher BVS means more vulnerable, higher RCS means more resilient. Components
//! whose source is absent drop out and the remaining weights are renormalized, so a trait-only
//! score stays comparable in range but carries the lower confidence of its completeness tier.

use serde::{Deserialize, Serialize};

use super::completeness::{CompletenessAssessment, Confidence};
use super::domain::{BigFiveTrait, DassSubscale};
use super::normalizer::NormalizedScores;

pub const BVS_NEUROTICISM_WEIGHT: f64 = 0.30;
pub const BVS_LOW_CONSCIENTIOUSNESS_WEIGHT: f64 = 0.15;
pub const BVS_LOW_EXTRAVERSION_WEIGHT: f64 = 0.10;
pub const BVS_DEPRESSION_WEIGHT: f64 = 0.20;
pub const BVS_ANXIETY_WEIGHT: f64 = 0.15;
pub const BVS_STRESS_WEIGHT: f64 = 0.10;

pub const RCS_CONSCIENTIOUSNESS_WEIGHT: f64 = 0.20;
pub const RCS_AGREEABLENESS_WEIGHT: f64 = 0.10;
pub const RCS_EXTRAVERSION_WEIGHT: f64 = 0.15;
pub const RCS_EMOTIONAL_STABILITY_WEIGHT: f64 = 0.15;
pub const RCS_SIGNATURE_STRENGTHS_WEIGHT: f64 = 0.10;
pub const RCS_LOW_DEPRESSION_WEIGHT: f64 = 0.15;
pub const RCS_LOW_ANXIETY_WEIGHT: f64 = 0.075;
pub const RCS_LOW_STRESS_WEIGHT: f64 = 0.075;

/// Signature strengths needed for the strengths component to saturate.
pub const SIGNATURE_STRENGTH_TARGET: usize = 5;

/// Weights for the risk-contributing components of BVS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VulnerabilityWeights {
    pub neuroticism: f64,
    pub low_conscientiousness: f64,
    pub low_extraversion: f64,
    pub depression: f64,
    pub anxiety: f64,
    pub stress: f64,
}

impl Default for VulnerabilityWeights {
    fn default() -> Self {
        Self {
            neuroticism: BVS_NEUROTICISM_WEIGHT,
            low_conscientiousness: BVS_LOW_CONSCIENTIOUSNESS_WEIGHT,
            low_extraversion: BVS_LOW_EXTRAVERSION_WEIGHT,
            depression: BVS_DEPRESSION_WEIGHT,
            anxiety: BVS_ANXIETY_WEIGHT,
            stress: BVS_STRESS_WEIGHT,
        }
    }
}

/// Weights for the protective components of RCS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceWeights {
    pub conscientiousness: f64,
    pub agreeableness: f64,
    pub extraversion: f64,
    pub emotional_stability: f64,
    pub signature_strengths: f64,
    pub low_depression: f64,
    pub low_anxiety: f64,
    pub low_stress: f64,
}

impl Default for ResilienceWeights {
    fn default() -> Self {
        Self {
            conscientiousness: RCS_CONSCIENTIOUSNESS_WEIGHT,
            agreeableness: RCS_AGREEABLENESS_WEIGHT,
            extraversion: RCS_EXTRAVERSION_WEIGHT,
            emotional_stability: RCS_EMOTIONAL_STABILITY_WEIGHT,
            signature_strengths: RCS_SIGNATURE_STRENGTHS_WEIGHT,
            low_depression: RCS_LOW_DEPRESSION_WEIGHT,
            low_anxiety: RCS_LOW_ANXIETY_WEIGHT,
            low_stress: RCS_LOW_STRESS_WEIGHT,
        }
    }
}

/// Which data the composite was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBasis {
    TraitAndClinical,
    TraitOnly,
    ClinicalOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompositeScore {
    pub bvs: f64,
    pub rcs: f64,
    pub basis: ScoreBasis,
    pub confidence: Confidence,
}

#[derive(Default)]
struct WeightedMean {
    sum: f64,
    weight: f64,
}

impl WeightedMean {
    fn add(&mut self, percentile: f64, weight: f64) {
        if weight > 0.0 {
            self.sum += percentile * weight;
            self.weight += weight;
        }
    }

    fn unit_value(&self) -> f64 {
        if self.weight > 0.0 {
            (self.sum / self.weight / 100.0).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Compute BVS/RCS from the normalized scores.
///
/// `signature_strengths` is `None` when no VIA results exist, which removes the strengths
/// component instead of counting it as zero. Returns `None` when neither Big Five nor DASS
/// scores are available.
pub fn score(
    normalized: &NormalizedScores,
    signature_strengths: Option<usize>,
    completeness: &CompletenessAssessment,
    vulnerability: &VulnerabilityWeights,
    resilience: &ResilienceWeights,
) -> Option<CompositeScore> {
    let basis = match (&normalized.big_five, &normalized.dass) {
        (Some(_), Some(_)) => ScoreBasis::TraitAndClinical,
        (Some(_), None) => ScoreBasis::TraitOnly,
        (None, Some(_)) => ScoreBasis::ClinicalOnly,
        (None, None) => return None,
    };

    let mut bvs = WeightedMean::default();
    let mut rcs = WeightedMean::default();

    if let Some(traits) = &normalized.big_five {
        let percentile = |trait_: BigFiveTrait| traits.percentile(trait_);
        bvs.add(percentile(BigFiveTrait::Neuroticism), vulnerability.neuroticism);
        bvs.add(
            100.0 - percentile(BigFiveTrait::Conscientiousness),
            vulnerability.low_conscientiousness,
        );
        bvs.add(
            100.0 - percentile(BigFiveTrait::Extraversion),
            vulnerability.low_extraversion,
        );

        rcs.add(
            percentile(BigFiveTrait::Conscientiousness),
            resilience.conscientiousness,
        );
        rcs.add(percentile(BigFiveTrait::Agreeableness), resilience.agreeableness);
        rcs.add(percentile(BigFiveTrait::Extraversion), resilience.extraversion);
        rcs.add(
            100.0 - percentile(BigFiveTrait::Neuroticism),
            resilience.emotional_stability,
        );
    }

    if let Some(count) = signature_strengths {
        let coverage = count.min(SIGNATURE_STRENGTH_TARGET) as f64
            / SIGNATURE_STRENGTH_TARGET as f64
            * 100.0;
        rcs.add(coverage, resilience.signature_strengths);
    }

    if let Some(clinical) = &normalized.dass {
        let percentile = |subscale: DassSubscale| clinical.get(subscale).percentile;
        bvs.add(percentile(DassSubscale::Depression), vulnerability.depression);
        bvs.add(percentile(DassSubscale::Anxiety), vulnerability.anxiety);
        bvs.add(percentile(DassSubscale::Stress), vulnerability.stress);

        rcs.add(
            100.0 - percentile(DassSubscale::Depression),
            resilience.low_depression,
        );
        rcs.add(
            100.0 - percentile(DassSubscale::Anxiety),
            resilience.low_anxiety,
        );
        rcs.add(100.0 - percentile(DassSubscale::Stress), resilience.low_stress);
    }

    Some(CompositeScore {
        bvs: bvs.unit_value(),
        rcs: rcs.unit_value(),
        basis,
        confidence: completeness.confidence,
    })
}
