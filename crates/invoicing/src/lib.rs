//! Invoicing domain module.
//!
//! This crate contains the business rules for applying a payment to an invoice,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod invoice;
pub mod processing;
pub mod tax;

pub use invoice::{Invoice, InvoiceReference, InvoiceSnapshot, InvoiceType, Payment};
pub use processing::{PaymentOutcome, PaymentRejection, PaymentStatus};
pub use tax::TaxRate;
