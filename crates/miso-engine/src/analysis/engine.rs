use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use super::completeness::{self, CompletenessAssessment, CompletenessLevel, Confidence};
use super::composite::{self, CompositeScore};
use super::config::AnalysisConfig;
use super::discrepancy::{self, Discrepancy};
use super::domain::{AssessmentBundle, UserId, ViaStrength};
use super::normalizer::{self, NormalizedScores};
use super::profile::{self, ProfileId, PsychologicalProfile, RiskLevel};
use super::recommendations::{self, PersonalizedRecommendations, SynthesisInput};

/// Stateless pipeline running normalization through recommendation synthesis.
#[derive(Debug, Clone, Default)]
pub struct AnalysisEngine {
    config: AnalysisConfig,
}

impl AnalysisEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze a validated bundle; `as_of` only feeds the staleness check.
    pub fn analyze(&self, bundle: &AssessmentBundle, as_of: DateTime<Utc>) -> AnalysisReport {
        let normalized = normalizer::normalize_bundle(bundle);
        let completeness = completeness::assess(bundle, as_of, self.config.stale_after());

        let signature_strengths = bundle.signature_strengths().to_vec();
        let strength_count = bundle
            .via
            .is_present()
            .then_some(signature_strengths.len());
        let scores = composite::score(
            &normalized,
            strength_count,
            &completeness,
            &self.config.vulnerability,
            &self.config.resilience,
        );

        let profile = normalized
            .big_five
            .as_ref()
            .filter(|_| completeness.allows_profile_classification())
            .map(profile::classify);

        let discrepancies = match (&normalized.big_five, &normalized.dass) {
            (Some(traits), Some(clinical)) if completeness.allows_discrepancy_detection() => {
                discrepancy::detect(traits, clinical, &signature_strengths)
            }
            _ => Vec::new(),
        };

        let recommendations = recommendations::synthesize(
            &SynthesisInput {
                normalized: &normalized,
                scores: scores.as_ref(),
                profile: profile.as_ref(),
                discrepancies: &discrepancies,
                signature_strengths: &signature_strengths,
                mbti: bundle.mbti_type(),
            },
            self.config.recommendation_limit,
        );

        AnalysisReport {
            user_id: bundle.user_id.clone(),
            as_of,
            completeness_level: completeness.level,
            confidence: completeness.confidence,
            bvs: scores.map(|scores| scores.bvs),
            rcs: scores.map(|scores| scores.rcs),
            profile_id: profile.as_ref().map(|profile| profile.id),
            risk_level: profile.as_ref().map(|profile| profile.risk_level),
            completeness,
            normalized,
            scores,
            profile,
            discrepancies,
            signature_strengths,
            recommendations,
        }
    }
}

/// Full result of one analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub user_id: UserId,
    pub as_of: DateTime<Utc>,
    pub completeness_level: CompletenessLevel,
    pub confidence: Confidence,
    pub bvs: Option<f64>,
    pub rcs: Option<f64>,
    pub profile_id: Option<ProfileId>,
    pub risk_level: Option<RiskLevel>,
    pub completeness: CompletenessAssessment,
    pub normalized: NormalizedScores,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<CompositeScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<PsychologicalProfile>,
    pub discrepancies: Vec<Discrepancy>,
    pub signature_strengths: Vec<ViaStrength>,
    pub recommendations: PersonalizedRecommendations,
}

impl AnalysisReport {
    pub fn has_discrepancy(&self, id: &str) -> bool {
        self.discrepancies.iter().any(|discrepancy| discrepancy.id == id)
    }
}

/// Row persisted by the analysis log sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisLogEntry {
    pub user_id: UserId,
    pub as_of: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub completeness_level: CompletenessLevel,
    pub confidence: Confidence,
    pub bvs: Option<f64>,
    pub rcs: Option<f64>,
    pub profile_id: Option<ProfileId>,
    pub risk_level: Option<RiskLevel>,
    pub discrepancy_ids: Vec<&'static str>,
    pub report: serde_json::Value,
}

impl AnalysisLogEntry {
    pub fn from_report(report: &AnalysisReport, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id: report.user_id.clone(),
            as_of: report.as_of,
            created_at,
            completeness_level: report.completeness_level,
            confidence: report.confidence,
            bvs: report.bvs,
            rcs: report.rcs,
            profile_id: report.profile_id,
            risk_level: report.risk_level,
            discrepancy_ids: report
                .discrepancies
                .iter()
                .map(|discrepancy| discrepancy.id)
                .collect(),
            report: snapshot(&report.user_id, report),
        }
    }
}

/// JSON copy of `value` for the log row; a failed encoding is logged and stored as null.
pub(crate) fn snapshot<T: Serialize>(user_id: &UserId, value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|error| {
        warn!(user_id = %user_id, %error, "analysis snapshot could not be encoded");
        serde_json::Value::Null
    })
}
