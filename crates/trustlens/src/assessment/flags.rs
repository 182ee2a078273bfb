use super::config::AssessmentConfig;
use super::domain::{AuthorityRecord, Product, Review, RiskFlag};
use chrono::{Duration, NaiveDate};

/// Scores already derived for this assessment. The conflict check must see
/// the exact values used for the combined score, so the engine hands them in
/// instead of re-deriving them here.
pub(crate) struct ScoreSignals {
    pub(crate) authority: f64,
    pub(crate) consumer: f64,
}

/// Evaluate every flag in a fixed order. Evaluation never fails: missing
/// data degrades to "no flag", except where absence itself is the signal.
pub(crate) fn evaluate(
    product: &Product,
    authority: Option<&AuthorityRecord>,
    reviews: &[Review],
    today: NaiveDate,
    signals: &ScoreSignals,
    config: &AssessmentConfig,
) -> Vec<RiskFlag> {
    let mut flags = Vec::new();

    if config
        .elderly_sensitive_categories
        .contains(&product.category)
    {
        flags.push(RiskFlag::ElderlySensitive);
    }

    if authority.map_or(true, |record| !record.has_record) {
        flags.push(RiskFlag::NoAuthRecord);
    }

    if authority.is_some_and(|record| record.penalty_count >= 1) {
        flags.push(RiskFlag::PenaltyHistory);
    }

    // Undated reviews never count as recent.
    let window_start = today - Duration::days(config.recent_review_window_days);
    let recent: Vec<f64> = reviews
        .iter()
        .filter(|review| review.review_date.is_some_and(|date| date >= window_start))
        .map(|review| review.rating)
        .collect();
    if !recent.is_empty() {
        let mean = recent.iter().sum::<f64>() / recent.len() as f64;
        if mean < config.recent_rating_threshold {
            flags.push(RiskFlag::LowRecentRating);
        }
    }

    let (authority_value, consumer_value) = (signals.authority, signals.consumer);
    if (authority_value >= 70.0 && consumer_value <= 40.0)
        || (authority_value <= 40.0 && consumer_value >= 70.0)
    {
        flags.push(RiskFlag::EvidenceConflict);
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
    }

    fn product(category: &str) -> Product {
        Product {
            id: "P100".to_string(),
            brand: "Evergreen".to_string(),
            name: "Ginseng Complex".to_string(),
            category: category.to_string(),
            aliases: Vec::new(),
        }
    }

    fn record(has_record: bool, has_cert: bool, penalty_count: u32) -> AuthorityRecord {
        AuthorityRecord {
            has_record,
            has_cert,
            penalty_count,
            notice_url: None,
            last_notice_date: None,
        }
    }

    fn review(date: Option<NaiveDate>, rating: f64) -> Review {
        Review {
            review_date: date,
            rating,
            reviewer_reputation: Some(1.0),
            evidence_url: None,
        }
    }

    fn neutral_signals() -> ScoreSignals {
        ScoreSignals {
            authority: 50.0,
            consumer: 50.0,
        }
    }

    #[test]
    fn sensitive_category_raises_flag_with_exact_match_only() {
        let config = AssessmentConfig::default();
        let flagged = evaluate(
            &product("health supplements"),
            None,
            &[],
            today(),
            &neutral_signals(),
            &config,
        );
        assert!(flagged.contains(&RiskFlag::ElderlySensitive));

        let unflagged = evaluate(
            &product("Health Supplements"),
            None,
            &[],
            today(),
            &neutral_signals(),
            &config,
        );
        assert!(!unflagged.contains(&RiskFlag::ElderlySensitive));
    }

    #[test]
    fn absent_or_empty_authority_raises_no_record_flag() {
        let config = AssessmentConfig::default();
        let absent = evaluate(
            &product("kitchenware"),
            None,
            &[],
            today(),
            &neutral_signals(),
            &config,
        );
        assert!(absent.contains(&RiskFlag::NoAuthRecord));

        let falsy = evaluate(
            &product("kitchenware"),
            Some(&record(false, true, 0)),
            &[],
            today(),
            &neutral_signals(),
            &config,
        );
        assert!(falsy.contains(&RiskFlag::NoAuthRecord));

        let present = evaluate(
            &product("kitchenware"),
            Some(&record(true, false, 0)),
            &[],
            today(),
            &neutral_signals(),
            &config,
        );
        assert!(!present.contains(&RiskFlag::NoAuthRecord));
    }

    #[test]
    fn any_penalty_raises_history_flag() {
        let config = AssessmentConfig::default();
        let flagged = evaluate(
            &product("kitchenware"),
            Some(&record(true, false, 1)),
            &[],
            today(),
            &neutral_signals(),
            &config,
        );
        assert!(flagged.contains(&RiskFlag::PenaltyHistory));
    }

    #[test]
    fn low_recent_rating_requires_reviews_inside_the_window() {
        let config = AssessmentConfig::default();
        let old_only = vec![review(Some(today() - Duration::days(400)), 1.0)];
        let flags = evaluate(
            &product("kitchenware"),
            None,
            &old_only,
            today(),
            &neutral_signals(),
            &config,
        );
        assert!(!flags.contains(&RiskFlag::LowRecentRating));

        let recent_low = vec![review(Some(today() - Duration::days(30)), 2.0)];
        let flags = evaluate(
            &product("kitchenware"),
            None,
            &recent_low,
            today(),
            &neutral_signals(),
            &config,
        );
        assert!(flags.contains(&RiskFlag::LowRecentRating));
    }

    #[test]
    fn undated_reviews_never_count_as_recent() {
        let config = AssessmentConfig::default();
        let undated = vec![review(None, 1.0)];
        let flags = evaluate(
            &product("kitchenware"),
            None,
            &undated,
            today(),
            &neutral_signals(),
            &config,
        );
        assert!(!flags.contains(&RiskFlag::LowRecentRating));
    }

    #[test]
    fn recent_mean_at_the_threshold_does_not_flag() {
        let config = AssessmentConfig::default();
        let reviews = vec![
            review(Some(today() - Duration::days(10)), 2.0),
            review(Some(today() - Duration::days(20)), 4.0),
        ];
        let flags = evaluate(
            &product("kitchenware"),
            None,
            &reviews,
            today(),
            &neutral_signals(),
            &config,
        );
        assert!(!flags.contains(&RiskFlag::LowRecentRating));
    }

    #[test]
    fn conflict_fires_only_when_both_thresholds_are_crossed() {
        let config = AssessmentConfig::default();
        let strong_disagreement = ScoreSignals {
            authority: 90.0,
            consumer: 10.0,
        };
        let flags = evaluate(
            &product("kitchenware"),
            None,
            &[],
            today(),
            &strong_disagreement,
            &config,
        );
        assert!(flags.contains(&RiskFlag::EvidenceConflict));

        let inverted = ScoreSignals {
            authority: 30.0,
            consumer: 85.0,
        };
        let flags = evaluate(
            &product("kitchenware"),
            None,
            &[],
            today(),
            &inverted,
            &config,
        );
        assert!(flags.contains(&RiskFlag::EvidenceConflict));

        let mild = ScoreSignals {
            authority: 60.0,
            consumer: 30.0,
        };
        let flags = evaluate(&product("kitchenware"), None, &[], today(), &mild, &config);
        assert!(!flags.contains(&RiskFlag::EvidenceConflict));
    }
}
