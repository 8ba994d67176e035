use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use rust_decimal::Decimal;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", post(process_payment))
}

pub async fn process_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ProcessPaymentRequest>,
) -> axum::response::Response {
    if body.amount < Decimal::ZERO {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_amount",
            "payment amount must not be negative",
        );
    }

    let receipt = match services.process_payment(&body.reference, body.amount) {
        Ok(r) => r,
        Err(e) => return errors::process_payment_error_to_response(e),
    };

    let status = if receipt.outcome.is_accepted() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, Json(dto::outcome_to_json(&receipt.outcome, &receipt.invoice))).into_response()
}
