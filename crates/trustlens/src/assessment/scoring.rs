use super::domain::{AuthorityRecord, Review};
use chrono::NaiveDate;

/// Assumed age for reviews with no usable date.
pub(crate) const UNKNOWN_REVIEW_AGE_DAYS: i64 = 365;

/// Exponential down-weighting of older evidence on a one-year scale.
/// Negative ages (clock skew, future-dated rows) are clamped to zero so a
/// "future" review earns no bonus. Total over all integers, result in (0, 1].
pub fn time_decay(age_days: i64) -> f64 {
    (-(age_days.max(0) as f64) / 365.0).exp()
}

/// Score a regulatory record on a 0-100 scale.
///
/// No record on file scores exactly 0: untrusted by default, not neutral.
/// A record plus certification forms the trust ceiling of 80; penalties
/// erode it at 10 points each, capped at three so one badly-flagged product
/// cannot produce a meaningless deeply-negative signal.
pub fn authority_score(record: Option<&AuthorityRecord>) -> f64 {
    let Some(record) = record else {
        return 0.0;
    };

    let mut base = 0.0;
    if record.has_record {
        base += 60.0;
    }
    if record.has_cert {
        base += 20.0;
    }
    let penalty = 10.0 * f64::from(record.penalty_count.min(3));

    (base - penalty).clamp(0.0, 100.0)
}

/// Score a review history on a 0-100 scale as a weight-normalized average,
/// with per-review weight `reputation * time_decay(age)`.
///
/// An empty history scores exactly 50: unknown, assume average. Undated
/// reviews are treated as one year old. If every weight is zero the divisor
/// falls back to 1.0, yielding 0.0 rather than a division by zero.
pub fn consumer_score(reviews: &[Review], today: NaiveDate) -> f64 {
    if reviews.is_empty() {
        return 50.0;
    }

    let mut weight_total = 0.0;
    let mut value_total = 0.0;
    for review in reviews {
        let age_days = review
            .review_date
            .map_or(UNKNOWN_REVIEW_AGE_DAYS, |date| (today - date).num_days());
        let weight = review.reputation() * time_decay(age_days);
        weight_total += weight;
        value_total += (review.rating / 5.0) * 100.0 * weight;
    }

    let divisor = if weight_total == 0.0 { 1.0 } else { weight_total };
    (value_total / divisor).clamp(0.0, 100.0)
}

/// Blend the two evidence scores with weight `authority_weight` on the
/// authority side, rounded to `precision` decimal places.
pub fn combined_score(authority: f64, consumer: f64, authority_weight: f64, precision: u8) -> f64 {
    let blended = authority_weight * authority + (1.0 - authority_weight) * consumer;
    round_to(blended, precision)
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, precision: u8) -> f64 {
    let factor = 10f64.powi(i32::from(precision));
    (value * factor).round() / factor
}
