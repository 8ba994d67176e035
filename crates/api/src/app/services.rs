use std::sync::Arc;

use rust_decimal::Decimal;

use remit_core::DomainError;
use remit_infra::{InMemoryInvoiceStore, InvoiceStore, PaymentProcessor, PaymentReceipt, ProcessPaymentError, StoreError};
use remit_invoicing::{Invoice, InvoiceReference, InvoiceType};

/// Shared handle to whichever store backs the API.
pub type DynInvoiceStore = Arc<dyn InvoiceStore>;

/// Failure while opening a new invoice.
#[derive(Debug, thiserror::Error)]
pub enum CreateInvoiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Application services used by the HTTP handlers.
pub struct AppServices {
    processor: PaymentProcessor<DynInvoiceStore>,
}

impl AppServices {
    pub fn new(store: DynInvoiceStore) -> Self {
        Self {
            processor: PaymentProcessor::new(store),
        }
    }

    /// Services over a fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryInvoiceStore::new()))
    }

    pub fn store(&self) -> &DynInvoiceStore {
        self.processor.store()
    }

    pub fn create_invoice(
        &self,
        reference: String,
        amount: Decimal,
        invoice_type: InvoiceType,
    ) -> Result<Invoice, CreateInvoiceError> {
        let reference = InvoiceReference::parse(reference)?;
        let invoice = Invoice::new(reference, amount, invoice_type)?;

        let version = self.store().add_invoice(invoice.clone())?;
        tracing::info!(
            reference = %invoice.reference(),
            invoice_id = %invoice.id_typed(),
            %amount,
            ?invoice_type,
            "invoice created"
        );
        Ok(invoice.with_version(version))
    }

    pub fn get_invoice(&self, reference: &str) -> Result<Option<Invoice>, StoreError> {
        self.store().get_invoice(reference)
    }

    pub fn list_invoices(&self) -> Result<Vec<Invoice>, StoreError> {
        self.store().list_invoices()
    }

    pub fn process_payment(
        &self,
        reference: &str,
        amount: Decimal,
    ) -> Result<PaymentReceipt, ProcessPaymentError> {
        self.processor.process_payment(reference, amount)
    }
}
