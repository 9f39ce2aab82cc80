// HTTP handlers for the public pricing endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::config::PaymentDetails;
use crate::error::ApiError;
use crate::pricing::{pricing_table, FeeCalculator, PricingEntry, QuoteQuery, QuoteResponse, ServiceType};
use crate::AppState;

/// Handler for GET /api/pricing
#[utoipa::path(
    get,
    path = "/api/pricing",
    responses(
        (status = 200, description = "Fee schedule for every service", body = Vec<PricingEntry>)
    ),
    tag = "pricing"
)]
pub async fn get_pricing_table() -> Json<Vec<PricingEntry>> {
    Json(pricing_table())
}

/// Handler for GET /api/pricing/quote
/// Quotes the fee for a service type and state of choices
#[utoipa::path(
    get,
    path = "/api/pricing/quote",
    params(QuoteQuery),
    responses(
        (status = 200, description = "Fee quote", body = QuoteResponse),
        (status = 400, description = "Unknown service type")
    ),
    tag = "pricing"
)]
pub async fn get_quote(Query(query): Query<QuoteQuery>) -> Result<Json<QuoteResponse>, ApiError> {
    let service = match query.service_type.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(ServiceType::from_str(raw).map_err(ApiError::BadRequest)?),
    };

    Ok(Json(FeeCalculator::quote(service, &query.state_of_choices)))
}

/// Handler for GET /api/pricing/payment-details
#[utoipa::path(
    get,
    path = "/api/pricing/payment-details",
    responses(
        (status = 200, description = "Account that applicants pay into", body = PaymentDetails)
    ),
    tag = "pricing"
)]
pub async fn get_payment_details(State(state): State<AppState>) -> Json<PaymentDetails> {
    Json(state.payment_details.as_ref().clone())
}
