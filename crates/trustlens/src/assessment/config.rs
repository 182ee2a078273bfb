use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Tunable weights and thresholds applied by the assessment engine.
///
/// Category matching is exact and case-sensitive against the configured set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentConfig {
    /// Weight wA given to the authority score in the combined blend.
    pub authority_weight: f64,
    /// Categories considered higher-risk for elderly consumers.
    pub elderly_sensitive_categories: HashSet<String>,
    /// Lookback window for the low-recent-rating check.
    pub recent_review_window_days: i64,
    /// Mean-rating threshold below which recent reviews raise a flag.
    pub recent_rating_threshold: f64,
    /// Decimal places kept on the combined score.
    pub combined_precision: u8,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            authority_weight: 0.6,
            elderly_sensitive_categories: [
                "health supplements",
                "Physiotherapy device",
                "Therapy patches",
                "health care equipment",
            ]
            .iter()
            .map(|category| (*category).to_string())
            .collect(),
            recent_review_window_days: 180,
            recent_rating_threshold: 3.0,
            combined_precision: 1,
        }
    }
}
