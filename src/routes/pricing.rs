/**
 * Pricing Calculator Routes
 */
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use super::ErrorResponse;
use crate::pricing::{
    self, Breakdown, CatalogueService, EstimateInput, Variation, BULK_DISCOUNT_TIERS,
    EXTRA_REVISION_FEE, INCLUDED_REVISIONS, MAX_REVISIONS, RUSH_MULTIPLIER,
};

/// Response for GET /api/pricing/catalogue
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueResponse {
    pub services: &'static [CatalogueService],
    pub variations: &'static [Variation],
    pub rush_multiplier: f64,
    pub included_revisions: u32,
    pub extra_revision_fee: f64,
    pub max_revisions: u32,
    pub bulk_discount_tiers: &'static [u32],
}

/// Request for POST /api/pricing/estimate
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub service: String,
    pub variation: String,
    #[serde(default)]
    pub rush: bool,
    #[serde(default)]
    pub revisions: u32,
    #[serde(default)]
    pub bulk_discount_percent: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    pub service: &'static str,
    pub variation: &'static str,
    pub total: i64,
    pub breakdown: Breakdown,
}

fn bad_request(message: String) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "Invalid estimate".to_string(),
            message: Some(message),
        }),
    )
        .into_response()
}

/// GET /api/pricing/catalogue
pub async fn catalogue() -> impl IntoResponse {
    Json(CatalogueResponse {
        services: pricing::SERVICES,
        variations: pricing::VARIATIONS,
        rush_multiplier: RUSH_MULTIPLIER,
        included_revisions: INCLUDED_REVISIONS,
        extra_revision_fee: EXTRA_REVISION_FEE,
        max_revisions: MAX_REVISIONS,
        bulk_discount_tiers: BULK_DISCOUNT_TIERS,
    })
}

/// POST /api/pricing/estimate
pub async fn estimate(Json(payload): Json<EstimateRequest>) -> impl IntoResponse {
    let Some(service) = pricing::find_service(&payload.service) else {
        return bad_request(format!("Unknown service: {}", payload.service));
    };
    let Some(variation) = pricing::find_variation(&payload.variation) else {
        return bad_request(format!("Unknown variation: {}", payload.variation));
    };
    if payload.revisions > MAX_REVISIONS {
        return bad_request(format!("At most {} revisions", MAX_REVISIONS));
    }
    if !BULK_DISCOUNT_TIERS.contains(&payload.bulk_discount_percent) {
        return bad_request(format!(
            "Bulk discount must be one of {:?}",
            BULK_DISCOUNT_TIERS
        ));
    }

    let breakdown = pricing::estimate(&EstimateInput {
        base_price: service.base_price,
        variation_multiplier: variation.multiplier,
        rush: payload.rush,
        revisions: payload.revisions,
        bulk_discount_percent: payload.bulk_discount_percent,
    });

    (
        StatusCode::OK,
        Json(EstimateResponse {
            service: service.slug,
            variation: variation.key,
            total: breakdown.total,
            breakdown,
        }),
    )
        .into_response()
}
