use std::sync::Arc;

use thiserror::Error;

use remit_invoicing::Invoice;

/// Invoice store operation error.
///
/// These are **infrastructure errors** (storage, concurrency) as opposed to business
/// outcomes of applying a payment, which never surface here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Write attempted from a stale copy of the invoice.
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    /// Another invoice already uses this reference.
    #[error("duplicate invoice reference: {0}")]
    DuplicateReference(String),

    /// Save attempted for an invoice the store has never seen.
    #[error("unknown invoice reference: {0}")]
    UnknownInvoice(String),

    /// The backing storage failed.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Keyed invoice storage (reference → invoice).
///
/// ## Versioning
///
/// Stores own concurrency control. Every write checks the caller's copy against the
/// stored revision (`AggregateRoot::version`) and bumps it on success, so a save made
/// from a stale read fails with `StoreError::Concurrency` rather than overwriting a
/// newer payment.
pub trait InvoiceStore: Send + Sync {
    /// Look up the invoice a payment reference points at.
    fn get_invoice(&self, reference: &str) -> Result<Option<Invoice>, StoreError>;

    /// Persist a mutated invoice; returns the newly committed version.
    fn save_invoice(&self, invoice: &Invoice) -> Result<u64, StoreError>;

    /// Register a new invoice; returns the committed version.
    fn add_invoice(&self, invoice: Invoice) -> Result<u64, StoreError>;

    /// All stored invoices, ordered by reference.
    fn list_invoices(&self) -> Result<Vec<Invoice>, StoreError>;
}

impl<S> InvoiceStore for Arc<S>
where
    S: InvoiceStore + ?Sized,
{
    fn get_invoice(&self, reference: &str) -> Result<Option<Invoice>, StoreError> {
        (**self).get_invoice(reference)
    }

    fn save_invoice(&self, invoice: &Invoice) -> Result<u64, StoreError> {
        (**self).save_invoice(invoice)
    }

    fn add_invoice(&self, invoice: Invoice) -> Result<u64, StoreError> {
        (**self).add_invoice(invoice)
    }

    fn list_invoices(&self) -> Result<Vec<Invoice>, StoreError> {
        (**self).list_invoices()
    }
}
