use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::composite::{ResilienceWeights, VulnerabilityWeights};

/// Sources completed longer ago than this are reported as stale.
pub const DEFAULT_STALE_AFTER_DAYS: i64 = 365;
/// Longest stale window the loader accepts (one hundred years).
pub const MAX_STALE_AFTER_DAYS: i64 = 36_500;
/// Ranked items kept per recommendation domain.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;

/// Tunable analysis parameters; every field falls back to its named default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub vulnerability: VulnerabilityWeights,
    pub resilience: ResilienceWeights,
    pub stale_after_days: i64,
    pub recommendation_limit: usize,
}

impl AnalysisConfig {
    /// Saturates instead of overflowing for windows chrono cannot represent.
    pub fn stale_after(&self) -> Duration {
        Duration::try_days(self.stale_after_days.max(0)).unwrap_or(Duration::MAX)
    }

    pub fn has_valid_stale_window(&self) -> bool {
        (0..=MAX_STALE_AFTER_DAYS).contains(&self.stale_after_days)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            vulnerability: VulnerabilityWeights::default(),
            resilience: ResilienceWeights::default(),
            stale_after_days: DEFAULT_STALE_AFTER_DAYS,
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
        }
    }
}
