use rust_decimal::Decimal;
use serde::Deserialize;

use remit_core::AggregateRoot;
use remit_invoicing::{Invoice, InvoiceType, PaymentOutcome};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub reference: String,
    pub amount: Decimal,
    #[serde(rename = "type", default = "default_invoice_type")]
    pub invoice_type: InvoiceType,
}

fn default_invoice_type() -> InvoiceType {
    InvoiceType::Standard
}

#[derive(Debug, Deserialize)]
pub struct ProcessPaymentRequest {
    pub reference: String,
    pub amount: Decimal,
}

// -------------------------
// JSON mapping
// -------------------------

pub fn invoice_to_json(invoice: &Invoice) -> serde_json::Value {
    serde_json::json!({
        "id": invoice.id_typed().to_string(),
        "reference": invoice.reference().as_str(),
        "type": invoice.invoice_type(),
        "amount": invoice.amount(),
        "amount_paid": invoice.amount_paid(),
        "tax_amount": invoice.tax_amount(),
        "remaining_amount": invoice.remaining_amount(),
        "fully_paid": invoice.is_fully_paid(),
        "version": invoice.version(),
        "payments": invoice.payments().iter().map(|p| serde_json::json!({
            "id": p.id.to_string(),
            "amount": p.amount,
            "received_at": p.received_at.to_rfc3339(),
        })).collect::<Vec<_>>()
    })
}

pub fn outcome_to_json(outcome: &PaymentOutcome, invoice: &Invoice) -> serde_json::Value {
    let status = if outcome.is_accepted() { "accepted" } else { "rejected" };
    serde_json::json!({
        "status": status,
        "code": outcome.code(),
        "message": outcome.message(),
        "invoice": invoice_to_json(invoice),
    })
}
