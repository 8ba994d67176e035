use std::collections::HashMap;
use std::sync::RwLock;

use remit_core::{AggregateRoot, DomainError, ExpectedVersion};
use remit_invoicing::{Invoice, InvoiceReference};

use super::r#trait::{InvoiceStore, StoreError};

/// In-memory invoice store keyed by reference.
///
/// Intended for tests/dev. Each instance owns its own map.
#[derive(Debug, Default)]
pub struct InMemoryInvoiceStore {
    invoices: RwLock<HashMap<InvoiceReference, Invoice>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `invoices` as-is (no validation, versions kept).
    pub fn with_invoices(invoices: impl IntoIterator<Item = Invoice>) -> Self {
        let map = invoices
            .into_iter()
            .map(|inv| (inv.reference().clone(), inv))
            .collect();
        Self {
            invoices: RwLock::new(map),
        }
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

impl InvoiceStore for InMemoryInvoiceStore {
    fn get_invoice(&self, reference: &str) -> Result<Option<Invoice>, StoreError> {
        let invoices = self.invoices.read().map_err(|_| poisoned())?;
        Ok(invoices.get(reference).cloned())
    }

    fn save_invoice(&self, invoice: &Invoice) -> Result<u64, StoreError> {
        let mut invoices = self.invoices.write().map_err(|_| poisoned())?;

        let stored = invoices
            .get_mut(invoice.reference().as_str())
            .ok_or_else(|| StoreError::UnknownInvoice(invoice.reference().to_string()))?;

        if stored.id_typed() != invoice.id_typed() {
            return Err(StoreError::DuplicateReference(format!(
                "'{}' belongs to invoice {}",
                invoice.reference(),
                stored.id_typed()
            )));
        }

        let current = stored.version();
        ExpectedVersion::Exact(invoice.version())
            .check(current)
            .map_err(|err| match err {
                DomainError::Conflict(msg) => StoreError::Concurrency(msg),
                other => StoreError::Backend(other.to_string()),
            })?;

        let next = current + 1;
        *stored = invoice.clone().with_version(next);
        Ok(next)
    }

    fn add_invoice(&self, invoice: Invoice) -> Result<u64, StoreError> {
        let mut invoices = self.invoices.write().map_err(|_| poisoned())?;

        if invoices.contains_key(invoice.reference().as_str()) {
            return Err(StoreError::DuplicateReference(invoice.reference().to_string()));
        }

        let next = invoice.version() + 1;
        invoices.insert(invoice.reference().clone(), invoice.with_version(next));
        Ok(next)
    }

    fn list_invoices(&self) -> Result<Vec<Invoice>, StoreError> {
        let invoices = self.invoices.read().map_err(|_| poisoned())?;

        let mut items: Vec<Invoice> = invoices.values().cloned().collect();
        items.sort_by(|a, b| a.reference().as_str().cmp(b.reference().as_str()));
        Ok(items)
    }
}
