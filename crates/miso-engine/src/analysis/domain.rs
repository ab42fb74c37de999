use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for the user an assessment bundle belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The five OCEAN personality dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BigFiveTrait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl BigFiveTrait {
    pub const ALL: [BigFiveTrait; 5] = [
        BigFiveTrait::Openness,
        BigFiveTrait::Conscientiousness,
        BigFiveTrait::Extraversion,
        BigFiveTrait::Agreeableness,
        BigFiveTrait::Neuroticism,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            BigFiveTrait::Openness => "openness",
            BigFiveTrait::Conscientiousness => "conscientiousness",
            BigFiveTrait::Extraversion => "extraversion",
            BigFiveTrait::Agreeableness => "agreeableness",
            BigFiveTrait::Neuroticism => "neuroticism",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            BigFiveTrait::Openness => 0,
            BigFiveTrait::Conscientiousness => 1,
            BigFiveTrait::Extraversion => 2,
            BigFiveTrait::Agreeableness => 3,
            BigFiveTrait::Neuroticism => 4,
        }
    }
}

/// DASS-21 clinical subscales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DassSubscale {
    Depression,
    Anxiety,
    Stress,
}

impl DassSubscale {
    pub const ALL: [DassSubscale; 3] = [
        DassSubscale::Depression,
        DassSubscale::Anxiety,
        DassSubscale::Stress,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            DassSubscale::Depression => "depression",
            DassSubscale::Anxiety => "anxiety",
            DassSubscale::Stress => "stress",
        }
    }
}

/// Assessment instruments the engine knows how to consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentSource {
    BigFive,
    Mbti,
    Via,
    Dass,
}

impl AssessmentSource {
    pub const fn label(self) -> &'static str {
        match self {
            AssessmentSource::BigFive => "big_five",
            AssessmentSource::Mbti => "mbti",
            AssessmentSource::Via => "via",
            AssessmentSource::Dass => "dass21",
        }
    }
}

/// One optional value per Big Five trait, as delivered by the data-access layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraitValues {
    #[serde(default)]
    pub openness: Option<f64>,
    #[serde(default)]
    pub conscientiousness: Option<f64>,
    #[serde(default)]
    pub extraversion: Option<f64>,
    #[serde(default)]
    pub agreeableness: Option<f64>,
    #[serde(default)]
    pub neuroticism: Option<f64>,
}

impl TraitValues {
    pub fn get(&self, trait_: BigFiveTrait) -> Option<f64> {
        match trait_ {
            BigFiveTrait::Openness => self.openness,
            BigFiveTrait::Conscientiousness => self.conscientiousness,
            BigFiveTrait::Extraversion => self.extraversion,
            BigFiveTrait::Agreeableness => self.agreeableness,
            BigFiveTrait::Neuroticism => self.neuroticism,
        }
    }

    pub fn set(&mut self, trait_: BigFiveTrait, value: Option<f64>) {
        let slot = match trait_ {
            BigFiveTrait::Openness => &mut self.openness,
            BigFiveTrait::Conscientiousness => &mut self.conscientiousness,
            BigFiveTrait::Extraversion => &mut self.extraversion,
            BigFiveTrait::Agreeableness => &mut self.agreeableness,
            BigFiveTrait::Neuroticism => &mut self.neuroticism,
        };
        *slot = value;
    }

    pub fn is_empty(&self) -> bool {
        BigFiveTrait::ALL
            .iter()
            .all(|trait_| self.get(*trait_).is_none())
    }
}

/// Inbound record for one user: zero or more raw assessment sub-bundles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub big_five: Option<BigFiveSubmission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mbti: Option<MbtiSubmission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<ViaSubmission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dass21: Option<DassSubmission>,
}

impl AssessmentSubmission {
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: UserId(user_id.into()),
            big_five: None,
            mbti: None,
            via: None,
            dass21: None,
        }
    }
}

/// Big Five results: raw subscale sums and/or previously persisted percentiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BigFiveSubmission {
    #[serde(default)]
    pub raw: TraitValues,
    #[serde(default)]
    pub percentiles: TraitValues,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MbtiSubmission {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViaSubmission {
    pub strengths: Vec<ViaStrengthEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// A single VIA strength as stored by the survey backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViaStrengthEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<StrengthCategory>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthCategory {
    Signature,
    Middle,
    Lesser,
}

/// DASS-21 subscale sums on the doubled (0-42) scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DassSubmission {
    pub depression: f64,
    pub anxiety: f64,
    pub stress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Explicit presence marker for an assessment source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Source<T> {
    Present(T),
    Absent,
}

impl<T> Source<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Source::Present(_))
    }

    pub fn present(&self) -> Option<&T> {
        match self {
            Source::Present(value) => Some(value),
            Source::Absent => None,
        }
    }
}

impl<T> From<Option<T>> for Source<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => Source::Present(inner),
            None => Source::Absent,
        }
    }
}

/// A validated value plus the time its underlying test was completed, when known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dated<T> {
    pub value: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Resolved representation of one Big Five trait after precedence rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TraitReading {
    Raw(f64),
    StoredPercentile(f64),
    Assumed,
}

impl TraitReading {
    pub fn is_assumed(&self) -> bool {
        matches!(self, TraitReading::Assumed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BigFiveReadings {
    pub openness: TraitReading,
    pub conscientiousness: TraitReading,
    pub extraversion: TraitReading,
    pub agreeableness: TraitReading,
    pub neuroticism: TraitReading,
}

impl BigFiveReadings {
    pub fn get(&self, trait_: BigFiveTrait) -> TraitReading {
        match trait_ {
            BigFiveTrait::Openness => self.openness,
            BigFiveTrait::Conscientiousness => self.conscientiousness,
            BigFiveTrait::Extraversion => self.extraversion,
            BigFiveTrait::Agreeableness => self.agreeableness,
            BigFiveTrait::Neuroticism => self.neuroticism,
        }
    }

    pub fn assumed_traits(&self) -> Vec<BigFiveTrait> {
        BigFiveTrait::ALL
            .into_iter()
            .filter(|trait_| self.get(*trait_).is_assumed())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DassRaw {
    pub depression: f64,
    pub anxiety: f64,
    pub stress: f64,
}

impl DassRaw {
    pub fn get(&self, subscale: DassSubscale) -> f64 {
        match subscale {
            DassSubscale::Depression => self.depression,
            DassSubscale::Anxiety => self.anxiety,
            DassSubscale::Stress => self.stress,
        }
    }
}

/// Keirsey-style grouping of the sixteen MBTI codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Temperament {
    Analyst,
    Diplomat,
    Sentinel,
    Explorer,
}

/// One of the sixteen four-letter MBTI type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MbtiType {
    letters: [char; 4],
}

impl MbtiType {
    pub fn code(&self) -> String {
        self.letters.iter().collect()
    }

    pub fn is_introverted(&self) -> bool {
        self.letters[0] == 'I'
    }

    pub fn is_intuitive(&self) -> bool {
        self.letters[1] == 'N'
    }

    pub fn is_thinking(&self) -> bool {
        self.letters[2] == 'T'
    }

    pub fn is_judging(&self) -> bool {
        self.letters[3] == 'J'
    }

    pub fn temperament(&self) -> Temperament {
        match (self.is_intuitive(), self.is_thinking(), self.is_judging()) {
            (true, true, _) => Temperament::Analyst,
            (true, false, _) => Temperament::Diplomat,
            (false, _, true) => Temperament::Sentinel,
            (false, _, false) => Temperament::Explorer,
        }
    }
}

impl FromStr for MbtiType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let upper = value.trim().to_ascii_uppercase();
        let chars: Vec<char> = upper.chars().collect();
        const AXES: [[char; 2]; 4] = [['E', 'I'], ['S', 'N'], ['T', 'F'], ['J', 'P']];

        if chars.len() != 4 {
            return Err(value.to_string());
        }

        let mut letters = ['?'; 4];
        for (position, (letter, axis)) in chars.iter().zip(AXES.iter()).enumerate() {
            if !axis.contains(letter) {
                return Err(value.to_string());
            }
            letters[position] = *letter;
        }

        Ok(Self { letters })
    }
}

impl TryFrom<String> for MbtiType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MbtiType> for String {
    fn from(value: MbtiType) -> Self {
        value.code()
    }
}

impl fmt::Display for MbtiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

/// The six VIA virtues that group the character strengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Virtue {
    Wisdom,
    Courage,
    Humanity,
    Justice,
    Temperance,
    Transcendence,
}

/// The 24 VIA character strengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViaStrength {
    Creativity,
    Curiosity,
    Judgment,
    LoveOfLearning,
    Perspective,
    Bravery,
    Perseverance,
    Honesty,
    Zest,
    Love,
    Kindness,
    SocialIntelligence,
    Teamwork,
    Fairness,
    Leadership,
    Forgiveness,
    Humility,
    Prudence,
    SelfRegulation,
    AppreciationOfBeauty,
    Gratitude,
    Hope,
    Humor,
    Spirituality,
}

impl ViaStrength {
    pub const fn label(self) -> &'static str {
        match self {
            ViaStrength::Creativity => "Creativity",
            ViaStrength::Curiosity => "Curiosity",
            ViaStrength::Judgment => "Judgment",
            ViaStrength::LoveOfLearning => "Love of Learning",
            ViaStrength::Perspective => "Perspective",
            ViaStrength::Bravery => "Bravery",
            ViaStrength::Perseverance => "Perseverance",
            ViaStrength::Honesty => "Honesty",
            ViaStrength::Zest => "Zest",
            ViaStrength::Love => "Love",
            ViaStrength::Kindness => "Kindness",
            ViaStrength::SocialIntelligence => "Social Intelligence",
            ViaStrength::Teamwork => "Teamwork",
            ViaStrength::Fairness => "Fairness",
            ViaStrength::Leadership => "Leadership",
            ViaStrength::Forgiveness => "Forgiveness",
            ViaStrength::Humility => "Humility",
            ViaStrength::Prudence => "Prudence",
            ViaStrength::SelfRegulation => "Self-Regulation",
            ViaStrength::AppreciationOfBeauty => "Appreciation of Beauty",
            ViaStrength::Gratitude => "Gratitude",
            ViaStrength::Hope => "Hope",
            ViaStrength::Humor => "Humor",
            ViaStrength::Spirituality => "Spirituality",
        }
    }

    pub const fn virtue(self) -> Virtue {
        match self {
            ViaStrength::Creativity
            | ViaStrength::Curiosity
            | ViaStrength::Judgment
            | ViaStrength::LoveOfLearning
            | ViaStrength::Perspective => Virtue::Wisdom,
            ViaStrength::Bravery
            | ViaStrength::Perseverance
            | ViaStrength::Honesty
            | ViaStrength::Zest => Virtue::Courage,
            ViaStrength::Love | ViaStrength::Kindness | ViaStrength::SocialIntelligence => {
                Virtue::Humanity
            }
            ViaStrength::Teamwork | ViaStrength::Fairness | ViaStrength::Leadership => {
                Virtue::Justice
            }
            ViaStrength::Forgiveness
            | ViaStrength::Humility
            | ViaStrength::Prudence
            | ViaStrength::SelfRegulation => Virtue::Temperance,
            ViaStrength::AppreciationOfBeauty
            | ViaStrength::Gratitude
            | ViaStrength::Hope
            | ViaStrength::Humor
            | ViaStrength::Spirituality => Virtue::Transcendence,
        }
    }

    /// Resolve survey labels such as "Love of Learning", "self_regulation" or "optimism".
    pub fn from_label(value: &str) -> Option<Self> {
        let key: String = value
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        let strength = match key.as_str() {
            "creativity" | "originality" => ViaStrength::Creativity,
            "curiosity" => ViaStrength::Curiosity,
            "judgment" | "judgement" | "openmindedness" => ViaStrength::Judgment,
            "loveoflearning" => ViaStrength::LoveOfLearning,
            "perspective" | "wisdom" => ViaStrength::Perspective,
            "bravery" | "valor" => ViaStrength::Bravery,
            "perseverance" | "persistence" => ViaStrength::Perseverance,
            "honesty" | "authenticity" => ViaStrength::Honesty,
            "zest" | "vitality" | "enthusiasm" => ViaStrength::Zest,
            "love" => ViaStrength::Love,
            "kindness" => ViaStrength::Kindness,
            "socialintelligence" => ViaStrength::SocialIntelligence,
            "teamwork" | "citizenship" => ViaStrength::Teamwork,
            "fairness" => ViaStrength::Fairness,
            "leadership" => ViaStrength::Leadership,
            "forgiveness" => ViaStrength::Forgiveness,
            "humility" | "modesty" => ViaStrength::Humility,
            "prudence" => ViaStrength::Prudence,
            "selfregulation" | "selfcontrol" => ViaStrength::SelfRegulation,
            "appreciationofbeauty" | "appreciationofbeautyandexcellence" => {
                ViaStrength::AppreciationOfBeauty
            }
            "gratitude" => ViaStrength::Gratitude,
            "hope" | "optimism" => ViaStrength::Hope,
            "humor" | "humour" => ViaStrength::Humor,
            "spirituality" => ViaStrength::Spirituality,
            _ => return None,
        };

        Some(strength)
    }
}

/// Validated VIA results: every reported strength in rank order plus the signature subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViaProfile {
    pub ranked: Vec<ViaStrength>,
    pub signature: Vec<ViaStrength>,
}

/// Canonical, validated input to the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentBundle {
    pub user_id: UserId,
    pub big_five: Source<Dated<BigFiveReadings>>,
    pub mbti: Source<Dated<MbtiType>>,
    pub via: Source<Dated<ViaProfile>>,
    pub dass: Source<Dated<DassRaw>>,
}

impl AssessmentBundle {
    pub fn signature_strengths(&self) -> &[ViaStrength] {
        self.via
            .present()
            .map(|dated| dated.value.signature.as_slice())
            .unwrap_or(&[])
    }

    pub fn mbti_type(&self) -> Option<&MbtiType> {
        self.mbti.present().map(|dated| &dated.value)
    }
}
