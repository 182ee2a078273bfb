use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Catalog entry for a consumer product. Loaded once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub brand: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Regulatory data point for a product. Absence is modeled as
/// `Option<&AuthorityRecord>` at call sites, never as a zeroed record:
/// a missing record drives both a score of 0 and its own risk flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorityRecord {
    pub has_record: bool,
    pub has_cert: bool,
    pub penalty_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_notice_date: Option<NaiveDate>,
}

/// A single consumer review. Immutable historical fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub review_date: Option<NaiveDate>,
    pub rating: f64,
    pub reviewer_reputation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_url: Option<String>,
}

impl Review {
    /// Effective reviewer weight; unknown reviewers count as average.
    pub fn reputation(&self) -> f64 {
        self.reviewer_reputation.unwrap_or(0.5)
    }
}

/// Discrete warning tags attached to an assessment. Flags are independent
/// booleans; the vector preserves evaluation order for display but carries
/// no priority semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskFlag {
    ElderlySensitive,
    NoAuthRecord,
    PenaltyHistory,
    LowRecentRating,
    EvidenceConflict,
}

impl RiskFlag {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ElderlySensitive => "ELDERLY_SENSITIVE",
            Self::NoAuthRecord => "NO_AUTH_RECORD",
            Self::PenaltyHistory => "PENALTY_HISTORY",
            Self::LowRecentRating => "LOW_RECENT_RATING",
            Self::EvidenceConflict => "EVIDENCE_CONFLICT",
        }
    }
}

impl std::fmt::Display for RiskFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
