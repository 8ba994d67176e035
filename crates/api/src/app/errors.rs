use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use remit_core::DomainError;
use remit_infra::{ProcessPaymentError, StoreError};

use crate::app::services::CreateInvoiceError;

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Concurrency(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        StoreError::DuplicateReference(msg) => {
            json_error(StatusCode::CONFLICT, "duplicate_reference", msg)
        }
        StoreError::UnknownInvoice(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        StoreError::Backend(msg) => {
            tracing::error!(error = %msg, "invoice store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn create_invoice_error_to_response(err: CreateInvoiceError) -> axum::response::Response {
    match err {
        CreateInvoiceError::Domain(e) => domain_error_to_response(e),
        CreateInvoiceError::Store(e) => store_error_to_response(e),
    }
}

pub fn process_payment_error_to_response(err: ProcessPaymentError) -> axum::response::Response {
    match err {
        e @ ProcessPaymentError::NotFound { .. } => {
            json_error(StatusCode::NOT_FOUND, "not_found", e.to_string())
        }
        ProcessPaymentError::Store(e) => store_error_to_response(e),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
