use axum::Router;

pub mod invoices;
pub mod payments;
pub mod system;

/// Router for all invoice and payment endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/invoices", invoices::router())
        .nest("/payments", payments::router())
}
