//! Payment application rules.
//!
//! Checks run in a fixed order and the first match wins:
//!
//! ```text
//! amount == 0 ─┬─ no payments ──────────────► NoPaymentNeeded
//!              └─ payments ─────────────────► InvalidState
//! has payments ┬─ total paid == amount ─────► AlreadyFullyPaid
//!              ├─ payment > remaining ──────► PaymentExceedsRemainingAmount
//!              └─ apply (amount_paid += p) ─► FinalPartialPaymentReceived | AnotherPartialPaymentReceived
//! no payments ─┬─ payment > amount ─────────► PaymentExceedsInvoiceAmount
//!              └─ apply (amount_paid = p) ──► InvoiceNowFullyPaid | InvoiceNowPartiallyPaid
//! ```
//!
//! Rejections never touch the invoice. Arithmetic that would leave the `Decimal` range is
//! a rejection too: `PaymentExceedsRemainingAmount` on a follow-up payment,
//! `PaymentExceedsInvoiceAmount` on a first one.

use rust_decimal::Decimal;

use crate::invoice::{Invoice, Payment};

/// Successful result of processing a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    /// Zero-amount invoice without payments; nothing was recorded.
    NoPaymentNeeded,
    InvoiceNowFullyPaid,
    InvoiceNowPartiallyPaid,
    FinalPartialPaymentReceived,
    AnotherPartialPaymentReceived,
}

impl PaymentStatus {
    pub fn message(&self) -> &'static str {
        match self {
            PaymentStatus::NoPaymentNeeded => "no payment needed",
            PaymentStatus::InvoiceNowFullyPaid => "invoice is now fully paid",
            PaymentStatus::InvoiceNowPartiallyPaid => "invoice is now partially paid",
            PaymentStatus::FinalPartialPaymentReceived => {
                "final partial payment received, invoice is now fully paid"
            }
            PaymentStatus::AnotherPartialPaymentReceived => {
                "another partial payment received, still not fully paid"
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PaymentStatus::NoPaymentNeeded => "no_payment_needed",
            PaymentStatus::InvoiceNowFullyPaid => "invoice_now_fully_paid",
            PaymentStatus::InvoiceNowPartiallyPaid => "invoice_now_partially_paid",
            PaymentStatus::FinalPartialPaymentReceived => "final_partial_payment_received",
            PaymentStatus::AnotherPartialPaymentReceived => "another_partial_payment_received",
        }
    }

    /// Whether a payment was recorded on the invoice (and it therefore needs saving).
    pub fn records_payment(&self) -> bool {
        !matches!(self, PaymentStatus::NoPaymentNeeded)
    }
}

impl core::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

/// Business-rule refusal; the invoice is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentRejection {
    InvalidState,
    AlreadyFullyPaid,
    PaymentExceedsRemainingAmount,
    PaymentExceedsInvoiceAmount,
}

impl PaymentRejection {
    pub fn message(&self) -> &'static str {
        match self {
            PaymentRejection::InvalidState => {
                "the invoice is in an invalid state, it has an amount of 0 and it has payments"
            }
            PaymentRejection::AlreadyFullyPaid => "invoice was already fully paid",
            PaymentRejection::PaymentExceedsRemainingAmount => {
                "the payment is greater than the partial amount remaining"
            }
            PaymentRejection::PaymentExceedsInvoiceAmount => {
                "the payment is greater than the invoice amount"
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PaymentRejection::InvalidState => "invalid_state",
            PaymentRejection::AlreadyFullyPaid => "already_fully_paid",
            PaymentRejection::PaymentExceedsRemainingAmount => "payment_exceeds_remaining_amount",
            PaymentRejection::PaymentExceedsInvoiceAmount => "payment_exceeds_invoice_amount",
        }
    }
}

impl core::fmt::Display for PaymentRejection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for PaymentRejection {}

/// Result of offering a payment to an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Accepted(PaymentStatus),
    Rejected(PaymentRejection),
}

impl PaymentOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, PaymentOutcome::Accepted(_))
    }

    /// True when the invoice was mutated and must be persisted.
    pub fn records_payment(&self) -> bool {
        match self {
            PaymentOutcome::Accepted(status) => status.records_payment(),
            PaymentOutcome::Rejected(_) => false,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PaymentOutcome::Accepted(status) => status.code(),
            PaymentOutcome::Rejected(rejection) => rejection.code(),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PaymentOutcome::Accepted(status) => status.message(),
            PaymentOutcome::Rejected(rejection) => rejection.message(),
        }
    }
}

/// How `amount_paid` evolves when a payment is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApplyMode {
    /// First payment on the invoice: `amount_paid` is set to the payment amount.
    First,
    /// Follow-up payment: `amount_paid` accumulates.
    Incremental,
}

/// Invoice totals once a payment is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Balances {
    amount_paid: Decimal,
    tax_amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Settled(PaymentStatus),
    Apply(Balances, PaymentStatus),
    Reject(PaymentRejection),
}

impl Invoice {
    /// Apply `payment` to this invoice and report what happened.
    ///
    /// On `Accepted` with a recording status the payment is appended, `amount_paid` is
    /// updated and commercial tax accrues. Every other outcome leaves `self` unchanged.
    pub fn apply_payment(&mut self, payment: Payment) -> PaymentOutcome {
        match self.decide(payment.amount) {
            Decision::Settled(status) => PaymentOutcome::Accepted(status),
            Decision::Reject(rejection) => PaymentOutcome::Rejected(rejection),
            Decision::Apply(balances, status) => {
                self.record(payment, balances);
                PaymentOutcome::Accepted(status)
            }
        }
    }

    fn decide(&self, amount: Decimal) -> Decision {
        if self.amount.is_zero() {
            return if self.has_payments() {
                Decision::Reject(PaymentRejection::InvalidState)
            } else {
                Decision::Settled(PaymentStatus::NoPaymentNeeded)
            };
        }

        if self.has_payments() {
            self.decide_follow_up(amount)
        } else {
            self.decide_first(amount)
        }
    }

    fn decide_follow_up(&self, amount: Decimal) -> Decision {
        let exceeds = Decision::Reject(PaymentRejection::PaymentExceedsRemainingAmount);

        if self.checked_total_paid() == Some(self.amount) {
            return Decision::Reject(PaymentRejection::AlreadyFullyPaid);
        }
        let Some(remaining) = self.amount.checked_sub(self.amount_paid) else {
            return exceeds;
        };
        if amount > remaining {
            return exceeds;
        }

        let status = if amount == remaining {
            PaymentStatus::FinalPartialPaymentReceived
        } else {
            PaymentStatus::AnotherPartialPaymentReceived
        };
        match self.balances_after(amount, ApplyMode::Incremental) {
            Some(balances) => Decision::Apply(balances, status),
            None => exceeds,
        }
    }

    fn decide_first(&self, amount: Decimal) -> Decision {
        if amount > self.amount {
            return Decision::Reject(PaymentRejection::PaymentExceedsInvoiceAmount);
        }

        let status = if amount == self.amount {
            PaymentStatus::InvoiceNowFullyPaid
        } else {
            PaymentStatus::InvoiceNowPartiallyPaid
        };
        match self.balances_after(amount, ApplyMode::First) {
            Some(balances) => Decision::Apply(balances, status),
            None => Decision::Reject(PaymentRejection::PaymentExceedsInvoiceAmount),
        }
    }

    /// `None` when a total would leave the `Decimal` range.
    fn balances_after(&self, amount: Decimal, mode: ApplyMode) -> Option<Balances> {
        let amount_paid = match mode {
            ApplyMode::First => amount,
            ApplyMode::Incremental => self.amount_paid.checked_add(amount)?,
        };
        let tax_amount = match self.invoice_type.tax_rate() {
            Some(rate) => self.tax_amount.checked_add(rate.tax_on(amount))?,
            None => self.tax_amount,
        };
        Some(Balances {
            amount_paid,
            tax_amount,
        })
    }

    fn checked_total_paid(&self) -> Option<Decimal> {
        self.payments
            .iter()
            .try_fold(Decimal::ZERO, |total, p| total.checked_add(p.amount))
    }

    fn record(&mut self, payment: Payment, balances: Balances) {
        self.amount_paid = balances.amount_paid;
        self.tax_amount = balances.tax_amount;
        self.payments.push(payment);
    }
}
