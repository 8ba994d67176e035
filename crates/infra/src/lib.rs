//! Infrastructure layer: invoice storage and payment orchestration.

pub mod invoice_store;
pub mod payment_processor;

pub use invoice_store::{InMemoryInvoiceStore, InvoiceStore, StoreError};
pub use payment_processor::{PaymentProcessor, PaymentReceipt, ProcessPaymentError};
