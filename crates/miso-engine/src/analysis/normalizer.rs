//! Converts raw subscale sums into percentiles against fixed population norms.
//!
//! Big Five traits are banded into low/moderate/high by percentile. DASS-21 subscales keep a
//! percentile for composite scoring but are banded by the published clinical severity cut-offs.

use serde::Serialize;

use super::domain::{
    AssessmentBundle, BigFiveReadings, BigFiveTrait, DassRaw, DassSubscale, TraitReading,
};

/// Percentiles strictly below this value are `low`.
pub const LOW_BAND_UPPER: f64 = 35.0;
/// Percentiles strictly above this value are `high`.
pub const HIGH_BAND_LOWER: f64 = 65.0;
/// Midpoint used for assumed traits and undefined inputs.
pub const NEUTRAL_PERCENTILE: f64 = 50.0;

/// Population mean and standard deviation for one scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationNorm {
    pub mean: f64,
    pub sd: f64,
}

/// Norms for 20-item-per-trait Big Five sums (range 20-100).
pub const fn big_five_norm(trait_: BigFiveTrait) -> PopulationNorm {
    match trait_ {
        BigFiveTrait::Openness => PopulationNorm { mean: 62.0, sd: 11.0 },
        BigFiveTrait::Conscientiousness => PopulationNorm { mean: 64.0, sd: 12.0 },
        BigFiveTrait::Extraversion => PopulationNorm { mean: 58.0, sd: 13.0 },
        BigFiveTrait::Agreeableness => PopulationNorm { mean: 66.0, sd: 10.0 },
        BigFiveTrait::Neuroticism => PopulationNorm { mean: 54.0, sd: 13.0 },
    }
}

/// Adult community norms on the doubled DASS scale (Crawford & Henry, 2003).
pub const fn dass_norm(subscale: DassSubscale) -> PopulationNorm {
    match subscale {
        DassSubscale::Depression => PopulationNorm { mean: 5.55, sd: 7.48 },
        DassSubscale::Anxiety => PopulationNorm { mean: 3.56, sd: 5.39 },
        DassSubscale::Stress => PopulationNorm { mean: 9.27, sd: 8.04 },
    }
}

/// Lower bounds of the mild, moderate, severe and extremely severe bands (Lovibond, 1995).
pub const fn dass_severity_cutoffs(subscale: DassSubscale) -> [f64; 4] {
    match subscale {
        DassSubscale::Depression => [10.0, 14.0, 21.0, 28.0],
        DassSubscale::Anxiety => [8.0, 10.0, 15.0, 20.0],
        DassSubscale::Stress => [15.0, 19.0, 26.0, 34.0],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitLevel {
    Low,
    Moderate,
    High,
}

impl TraitLevel {
    pub const ALL: [TraitLevel; 3] = [TraitLevel::Low, TraitLevel::Moderate, TraitLevel::High];

    pub const fn label(self) -> &'static str {
        match self {
            TraitLevel::Low => "low",
            TraitLevel::Moderate => "moderate",
            TraitLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DassSeverity {
    Normal,
    Mild,
    Moderate,
    Severe,
    ExtremelySevere,
}

impl DassSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            DassSeverity::Normal => "normal",
            DassSeverity::Mild => "mild",
            DassSeverity::Moderate => "moderate",
            DassSeverity::Severe => "severe",
            DassSeverity::ExtremelySevere => "extremely severe",
        }
    }
}

/// Where a normalized trait percentile came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreOrigin {
    Raw,
    StoredPercentile,
    Assumed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedTraitScore {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<f64>,
    pub percentile: f64,
    pub level: TraitLevel,
    pub origin: ScoreOrigin,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedClinicalScore {
    pub raw: f64,
    pub percentile: f64,
    pub severity: DassSeverity,
}

/// Per-trait levels in [`BigFiveTrait::index`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelVector(pub [TraitLevel; 5]);

impl LevelVector {
    pub fn get(&self, trait_: BigFiveTrait) -> TraitLevel {
        self.0[trait_.index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BigFiveScores {
    pub openness: NormalizedTraitScore,
    pub conscientiousness: NormalizedTraitScore,
    pub extraversion: NormalizedTraitScore,
    pub agreeableness: NormalizedTraitScore,
    pub neuroticism: NormalizedTraitScore,
}

impl BigFiveScores {
    pub fn get(&self, trait_: BigFiveTrait) -> &NormalizedTraitScore {
        match trait_ {
            BigFiveTrait::Openness => &self.openness,
            BigFiveTrait::Conscientiousness => &self.conscientiousness,
            BigFiveTrait::Extraversion => &self.extraversion,
            BigFiveTrait::Agreeableness => &self.agreeableness,
            BigFiveTrait::Neuroticism => &self.neuroticism,
        }
    }

    pub fn percentile(&self, trait_: BigFiveTrait) -> f64 {
        self.get(trait_).percentile
    }

    pub fn level(&self, trait_: BigFiveTrait) -> TraitLevel {
        self.get(trait_).level
    }

    pub fn is(&self, trait_: BigFiveTrait, level: TraitLevel) -> bool {
        self.level(trait_) == level
    }

    pub fn levels(&self) -> LevelVector {
        LevelVector(BigFiveTrait::ALL.map(|trait_| self.level(trait_)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DassScores {
    pub depression: NormalizedClinicalScore,
    pub anxiety: NormalizedClinicalScore,
    pub stress: NormalizedClinicalScore,
}

impl DassScores {
    pub fn get(&self, subscale: DassSubscale) -> &NormalizedClinicalScore {
        match subscale {
            DassSubscale::Depression => &self.depression,
            DassSubscale::Anxiety => &self.anxiety,
            DassSubscale::Stress => &self.stress,
        }
    }

    pub fn severity(&self, subscale: DassSubscale) -> DassSeverity {
        self.get(subscale).severity
    }

    pub fn worst_severity(&self) -> DassSeverity {
        DassSubscale::ALL
            .iter()
            .map(|subscale| self.severity(*subscale))
            .max()
            .unwrap_or(DassSeverity::Normal)
    }
}

/// The canonical normalized view every downstream stage reads from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedScores {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big_five: Option<BigFiveScores>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dass: Option<DassScores>,
}

pub fn level_for(percentile: f64) -> TraitLevel {
    if percentile < LOW_BAND_UPPER {
        TraitLevel::Low
    } else if percentile > HIGH_BAND_LOWER {
        TraitLevel::High
    } else {
        TraitLevel::Moderate
    }
}

pub fn severity_for(subscale: DassSubscale, raw: f64) -> DassSeverity {
    let [mild, moderate, severe, extreme] = dass_severity_cutoffs(subscale);
    if raw >= extreme {
        DassSeverity::ExtremelySevere
    } else if raw >= severe {
        DassSeverity::Severe
    } else if raw >= moderate {
        DassSeverity::Moderate
    } else if raw >= mild {
        DassSeverity::Mild
    } else {
        DassSeverity::Normal
    }
}

/// Percentile in [0, 100] of `raw` against `norm`.
pub fn percentile_from_raw(raw: f64, norm: PopulationNorm) -> f64 {
    let z = (raw - norm.mean) / norm.sd;
    clamp_percentile(normal_cdf(z) * 100.0)
}

fn clamp_percentile(value: f64) -> f64 {
    if value.is_nan() {
        NEUTRAL_PERCENTILE
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Standard normal CDF.
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

// Abramowitz & Stegun 7.1.26, absolute error below 1.5e-7.
fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

pub fn normalize_trait(trait_: BigFiveTrait, reading: TraitReading) -> NormalizedTraitScore {
    let (raw, percentile, origin) = match reading {
        TraitReading::Raw(raw) => (
            Some(raw),
            percentile_from_raw(raw, big_five_norm(trait_)),
            ScoreOrigin::Raw,
        ),
        TraitReading::StoredPercentile(percentile) => (
            None,
            clamp_percentile(percentile),
            ScoreOrigin::StoredPercentile,
        ),
        TraitReading::Assumed => (None, NEUTRAL_PERCENTILE, ScoreOrigin::Assumed),
    };

    NormalizedTraitScore {
        raw,
        percentile,
        level: level_for(percentile),
        origin,
    }
}

pub fn normalize_clinical(subscale: DassSubscale, raw: f64) -> NormalizedClinicalScore {
    NormalizedClinicalScore {
        raw,
        percentile: percentile_from_raw(raw, dass_norm(subscale)),
        severity: severity_for(subscale, raw),
    }
}

pub fn normalize_big_five(readings: &BigFiveReadings) -> BigFiveScores {
    let score = |trait_: BigFiveTrait| normalize_trait(trait_, readings.get(trait_));
    BigFiveScores {
        openness: score(BigFiveTrait::Openness),
        conscientiousness: score(BigFiveTrait::Conscientiousness),
        extraversion: score(BigFiveTrait::Extraversion),
        agreeableness: score(BigFiveTrait::Agreeableness),
        neuroticism: score(BigFiveTrait::Neuroticism),
    }
}

pub fn normalize_dass(raw: &DassRaw) -> DassScores {
    let score = |subscale: DassSubscale| normalize_clinical(subscale, raw.get(subscale));
    DassScores {
        depression: score(DassSubscale::Depression),
        anxiety: score(DassSubscale::Anxiety),
        stress: score(DassSubscale::Stress),
    }
}

pub fn normalize_bundle(bundle: &AssessmentBundle) -> NormalizedScores {
    NormalizedScores {
        big_five: bundle
            .big_five
            .present()
            .map(|dated| normalize_big_five(&dated.value)),
        dass: bundle.dass.present().map(|dated| normalize_dass(&dated.value)),
    }
}
