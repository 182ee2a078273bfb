use crate::infra::{deserialize_optional_date, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use trustlens::assessment::scoring::round_to;
use trustlens::assessment::{AuthorityRecord, Product, Review, RiskFlag};

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/assess", post(assess_endpoint))
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssessRequest {
    pub(crate) query: String,
    /// Freezes the evaluation date; omitted means wall-clock today.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssessResponse {
    pub(crate) query: String,
    pub(crate) today: NaiveDate,
    pub(crate) matches: Vec<ProductAssessmentView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProductAssessmentView {
    pub(crate) product: Product,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) authority: Option<AuthorityRecord>,
    pub(crate) scores: ScoreView,
    pub(crate) flags: Vec<RiskFlag>,
    pub(crate) breakdown: Vec<String>,
    pub(crate) recent_reviews: Vec<Review>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScoreView {
    pub(crate) authority: f64,
    pub(crate) consumer: f64,
    pub(crate) combined: f64,
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn assess_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<AssessRequest>,
) -> Json<AssessResponse> {
    let AssessRequest { query, today } = payload;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let matches = state
        .catalog
        .find_candidates(&query)
        .into_iter()
        .map(|product| {
            let authority = state.catalog.authority_for(&product.id);
            let reviews = state.catalog.reviews_for(&product.id);
            let assessment = state.engine.assess(product, authority, reviews, today);

            ProductAssessmentView {
                product: product.clone(),
                authority: authority.cloned(),
                scores: ScoreView {
                    authority: round_to(assessment.authority_score, 1),
                    consumer: round_to(assessment.consumer_score, 1),
                    combined: assessment.combined_score,
                },
                flags: assessment.flags,
                breakdown: assessment.breakdown,
                recent_reviews: state
                    .catalog
                    .recent_reviews(&product.id, 3)
                    .into_iter()
                    .cloned()
                    .collect(),
            }
        })
        .collect();

    Json(AssessResponse {
        query,
        today,
        matches,
    })
}
