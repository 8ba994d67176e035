//! Payment processing pipeline (application-level orchestration).
//!
//! ```text
//! reference + amount
//!   ↓
//! 1. Load invoice from store (missing → NotFound)
//!   ↓
//! 2. Apply payment (pure decision logic on the aggregate)
//!   ↓
//! 3. Save invoice, only if a payment was recorded
//! ```
//!
//! Business refusals come back as `PaymentOutcome::Rejected` inside an `Ok`. Only a
//! missing invoice or a store failure is an `Err`.

use rust_decimal::Decimal;
use thiserror::Error;

use remit_invoicing::{Invoice, Payment, PaymentOutcome};

use crate::invoice_store::{InvoiceStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProcessPaymentError {
    /// No invoice resolves from the payment reference.
    #[error("There is no invoice matching this payment")]
    NotFound { reference: String },

    /// Loading or persisting the invoice failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What happened to a payment, together with the invoice as it now stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub outcome: PaymentOutcome,
    /// Invoice state after processing (unchanged on rejection).
    pub invoice: Invoice,
}

/// Applies incoming payments to stored invoices.
///
/// Holds the store explicitly; invoices carry no handle back to it.
pub struct PaymentProcessor<S> {
    store: S,
}

impl<S> PaymentProcessor<S>
where
    S: InvoiceStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn process_payment(
        &self,
        reference: &str,
        amount: Decimal,
    ) -> Result<PaymentReceipt, ProcessPaymentError> {
        let Some(mut invoice) = self.store.get_invoice(reference)? else {
            tracing::warn!(reference, %amount, "no invoice matches payment reference");
            return Err(ProcessPaymentError::NotFound {
                reference: reference.to_string(),
            });
        };

        let outcome = invoice.apply_payment(Payment::new(reference, amount));

        match outcome {
            PaymentOutcome::Accepted(status) if status.records_payment() => {
                let version = self.store.save_invoice(&invoice).map_err(|err| {
                    tracing::error!(reference, %amount, error = %err, "failed to save invoice after payment");
                    err
                })?;
                invoice = invoice.with_version(version);
                tracing::info!(
                    reference,
                    %amount,
                    code = status.code(),
                    amount_paid = %invoice.amount_paid(),
                    tax_amount = %invoice.tax_amount(),
                    "payment recorded"
                );
            }
            PaymentOutcome::Accepted(status) => {
                tracing::info!(reference, %amount, code = status.code(), "payment not required");
            }
            PaymentOutcome::Rejected(rejection) => {
                tracing::warn!(reference, %amount, code = rejection.code(), "payment rejected");
            }
        }

        Ok(PaymentReceipt { outcome, invoice })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::invoice_store::InMemoryInvoiceStore;
    use remit_core::{AggregateRoot, InvoiceId};
    use remit_invoicing::{
        InvoiceReference, InvoiceSnapshot, InvoiceType, PaymentRejection, PaymentStatus,
    };

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn stored_invoice(reference: &str, amount: i64, amount_paid: i64, prior: &[i64]) -> Invoice {
        Invoice::from_snapshot(InvoiceSnapshot {
            id: InvoiceId::new(),
            reference: InvoiceReference::parse(reference).unwrap(),
            amount: dec(amount),
            amount_paid: dec(amount_paid),
            tax_amount: Decimal::ZERO,
            invoice_type: InvoiceType::Commercial,
            payments: prior.iter().map(|a| Payment::new(reference, dec(*a))).collect(),
            version: 1,
        })
    }

    /// Store wrapper that counts writes and can be told to fail them.
    #[derive(Default)]
    struct RecordingStore {
        inner: InMemoryInvoiceStore,
        saves: AtomicUsize,
        fail_saves: bool,
    }

    impl InvoiceStore for RecordingStore {
        fn get_invoice(&self, reference: &str) -> Result<Option<Invoice>, StoreError> {
            self.inner.get_invoice(reference)
        }

        fn save_invoice(&self, invoice: &Invoice) -> Result<u64, StoreError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            if self.fail_saves {
                return Err(StoreError::Backend("disk full".to_string()));
            }
            self.inner.save_invoice(invoice)
        }

        fn add_invoice(&self, invoice: Invoice) -> Result<u64, StoreError> {
            self.inner.add_invoice(invoice)
        }

        fn list_invoices(&self) -> Result<Vec<Invoice>, StoreError> {
            self.inner.list_invoices()
        }
    }

    fn processor_with(invoices: Vec<Invoice>) -> PaymentProcessor<Arc<RecordingStore>> {
        PaymentProcessor::new(Arc::new(RecordingStore {
            inner: InMemoryInvoiceStore::with_invoices(invoices),
            ..RecordingStore::default()
        }))
    }

    #[test]
    fn unknown_reference_is_not_found() {
        let processor = processor_with(vec![]);

        let err = processor.process_payment("missing", dec(5)).unwrap_err();

        assert_eq!(
            err,
            ProcessPaymentError::NotFound {
                reference: "missing".to_string()
            }
        );
        assert_eq!(err.to_string(), "There is no invoice matching this payment");
        assert_eq!(processor.store().saves.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn accepted_payment_is_persisted() {
        let processor = processor_with(vec![stored_invoice("INV-1", 10, 0, &[])]);

        let receipt = processor.process_payment("INV-1", dec(10)).unwrap();

        assert_eq!(
            receipt.outcome,
            PaymentOutcome::Accepted(PaymentStatus::InvoiceNowFullyPaid)
        );
        assert_eq!(receipt.invoice.version(), 2);

        let stored = processor.store().get_invoice("INV-1").unwrap().unwrap();
        assert_eq!(stored.amount_paid(), dec(10));
        assert_eq!(stored.tax_amount(), Decimal::new(14, 1));
        assert_eq!(stored.payments().len(), 1);
        assert_eq!(processor.store().saves.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn partial_payments_accumulate_across_calls() {
        let processor = processor_with(vec![stored_invoice("INV-1", 10, 0, &[])]);

        let first = processor.process_payment("INV-1", dec(3)).unwrap();
        let second = processor.process_payment("INV-1", dec(3)).unwrap();
        let last = processor.process_payment("INV-1", dec(4)).unwrap();
        let extra = processor.process_payment("INV-1", dec(1)).unwrap();

        assert_eq!(first.outcome.code(), "invoice_now_partially_paid");
        assert_eq!(second.outcome.code(), "another_partial_payment_received");
        assert_eq!(last.outcome.code(), "final_partial_payment_received");
        assert_eq!(
            extra.outcome,
            PaymentOutcome::Rejected(PaymentRejection::AlreadyFullyPaid)
        );

        let stored = processor.store().get_invoice("INV-1").unwrap().unwrap();
        assert_eq!(stored.amount_paid(), dec(10));
        assert_eq!(stored.tax_amount(), Decimal::new(140, 2));
    }

    #[test]
    fn rejected_payment_is_not_saved() {
        let processor = processor_with(vec![stored_invoice("INV-1", 10, 5, &[5])]);

        let receipt = processor.process_payment("INV-1", dec(6)).unwrap();

        assert_eq!(
            receipt.outcome,
            PaymentOutcome::Rejected(PaymentRejection::PaymentExceedsRemainingAmount)
        );
        assert_eq!(receipt.invoice.version(), 1);
        assert_eq!(processor.store().saves.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn no_payment_needed_is_not_saved() {
        let processor = processor_with(vec![stored_invoice("INV-0", 0, 0, &[])]);

        let receipt = processor.process_payment("INV-0", Decimal::ZERO).unwrap();

        assert_eq!(
            receipt.outcome,
            PaymentOutcome::Accepted(PaymentStatus::NoPaymentNeeded)
        );
        assert_eq!(processor.store().saves.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn save_failure_fails_the_call() {
        let store = Arc::new(RecordingStore {
            inner: InMemoryInvoiceStore::with_invoices([stored_invoice("INV-1", 10, 0, &[])]),
            fail_saves: true,
            ..RecordingStore::default()
        });
        let processor = PaymentProcessor::new(store);

        let err = processor.process_payment("INV-1", dec(4)).unwrap_err();

        assert_eq!(
            err,
            ProcessPaymentError::Store(StoreError::Backend("disk full".to_string()))
        );
        let stored = processor.store().get_invoice("INV-1").unwrap().unwrap();
        assert_eq!(stored.amount_paid(), Decimal::ZERO);
    }
}
