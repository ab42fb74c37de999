//! Psychometric analysis pipeline.
//!
//! Raw Big Five, MBTI, VIA and DASS-21 results flow through aggregation, normalization,
//! completeness assessment, composite scoring, discrepancy detection, profile classification
//! and recommendation synthesis. Every stage below the service is a pure function of its
//! inputs; the service adds data access, memoization and logging around the engine.

pub mod aggregator;
pub mod completeness;
pub mod composite;
pub mod config;
pub mod discrepancy;
pub mod domain;
pub mod engine;
pub mod normalizer;
pub mod profile;
pub mod recommendations;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use aggregator::{InputAggregator, ValidationError};
pub use completeness::{CompletenessAssessment, CompletenessLevel, Confidence, PartialKind};
pub use composite::{CompositeScore, ResilienceWeights, ScoreBasis, VulnerabilityWeights};
pub use config::AnalysisConfig;
pub use discrepancy::{Discrepancy, DiscrepancySeverity};
pub use domain::{
    AssessmentBundle, AssessmentSource, AssessmentSubmission, BigFiveSubmission, BigFiveTrait,
    DassSubmission, DassSubscale, MbtiSubmission, MbtiType, Source, StrengthCategory,
    TraitValues, UserId, ViaStrength, ViaStrengthEntry, ViaSubmission,
};
pub use engine::{AnalysisEngine, AnalysisLogEntry, AnalysisReport};
pub use normalizer::{
    BigFiveScores, DassScores, DassSeverity, NormalizedClinicalScore, NormalizedScores,
    NormalizedTraitScore, TraitLevel,
};
pub use profile::{ProfileId, PsychologicalProfile, RiskLevel};
pub use recommendations::{PersonalizedRecommendations, SupportLevel};
pub use repository::{AnalysisLogSink, AssessmentRepository, LogSinkError, RepositoryError};
pub use router::analysis_router;
pub use service::{AnalysisService, AnalysisServiceError};
