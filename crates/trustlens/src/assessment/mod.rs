mod config;
mod domain;
mod flags;
pub mod scoring;

pub use config::AssessmentConfig;
pub use domain::{AuthorityRecord, Product, Review, RiskFlag};

use chrono::NaiveDate;
use flags::ScoreSignals;
use scoring::{authority_score, combined_score, consumer_score};
use serde::{Deserialize, Serialize};

/// Stateless engine applying one configuration to a product's evidence.
///
/// Every input is read-only and "today" is an explicit parameter, so repeated
/// calls with identical inputs return identical results and independent
/// assessments may run in parallel without coordination.
pub struct AssessmentEngine {
    config: AssessmentConfig,
}

impl AssessmentEngine {
    pub fn new(config: AssessmentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    /// Assess one product from its (possibly absent) authority record and its
    /// (possibly empty) review history.
    ///
    /// The authority and consumer scores are derived once and reused for both
    /// the combined blend and the evidence-conflict check.
    pub fn assess(
        &self,
        product: &Product,
        authority: Option<&AuthorityRecord>,
        reviews: &[Review],
        today: NaiveDate,
    ) -> Assessment {
        let authority_value = authority_score(authority);
        let consumer_value = consumer_score(reviews, today);
        let combined = combined_score(
            authority_value,
            consumer_value,
            self.config.authority_weight,
            self.config.combined_precision,
        );

        let signals = ScoreSignals {
            authority: authority_value,
            consumer: consumer_value,
        };
        let flags = flags::evaluate(product, authority, reviews, today, &signals, &self.config);

        let breakdown = vec![
            format!(
                "Authority: {authority_value:.1} (record={}, cert={}, penalties={})",
                authority.map_or(false, |record| record.has_record),
                authority.map_or(false, |record| record.has_cert),
                authority.map_or(0, |record| record.penalty_count),
            ),
            format!("Consumer: {consumer_value:.1} (time-decay, reviewer reputation, avg rating)"),
            format!("Combined: {combined} (wA={})", self.config.authority_weight),
        ];

        Assessment {
            product_id: product.id.clone(),
            authority_score: authority_value,
            consumer_score: consumer_value,
            combined_score: combined,
            flags,
            breakdown,
        }
    }
}

/// Score bundle handed to renderers. Computed fresh per request, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub product_id: String,
    pub authority_score: f64,
    pub consumer_score: f64,
    pub combined_score: f64,
    pub flags: Vec<RiskFlag>,
    pub breakdown: Vec<String>,
}

impl Assessment {
    /// Comma-joined flag labels, or "NONE".
    pub fn flag_summary(&self) -> String {
        if self.flags.is_empty() {
            "NONE".to_string()
        } else {
            self.flags
                .iter()
                .map(|flag| flag.label())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}
