use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use remit_core::{AggregateRoot, DomainError, DomainResult, Entity, InvoiceId, PaymentId, ValueObject};

/// Lookup key an incoming payment uses to target an invoice.
///
/// Distinct from `InvoiceId`: the reference is what callers know, the id is the
/// invoice's identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceReference(String);

impl ValueObject for InvoiceReference {}

impl InvoiceReference {
    pub fn parse(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::validation("invoice reference must not be blank"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for InvoiceReference {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::borrow::Borrow<str> for InvoiceReference {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Invoice classification; determines the tax policy (see `InvoiceType::tax_rate`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceType {
    Standard,
    Commercial,
}

/// A single monetary application against an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub amount: Decimal,
    /// Reference the payment was submitted with.
    pub reference: String,
    pub received_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(reference: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: PaymentId::new(),
            amount,
            reference: reference.into(),
            received_at: Utc::now(),
        }
    }
}

impl Entity for Payment {
    type Id = PaymentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Serializable view of an invoice, used by stores and transport layers.
///
/// Rehydrating from a snapshot performs no validation: persisted data is taken as-is so
/// that inconsistent records surface through payment processing instead of failing to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSnapshot {
    pub id: InvoiceId,
    pub reference: InvoiceReference,
    pub amount: Decimal,
    pub amount_paid: Decimal,
    pub tax_amount: Decimal,
    #[serde(rename = "type")]
    pub invoice_type: InvoiceType,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub version: u64,
}

/// Aggregate root: Invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    pub(crate) id: InvoiceId,
    pub(crate) reference: InvoiceReference,
    pub(crate) amount: Decimal,
    pub(crate) amount_paid: Decimal,
    pub(crate) tax_amount: Decimal,
    pub(crate) invoice_type: InvoiceType,
    pub(crate) payments: Vec<Payment>,
    pub(crate) version: u64,
}

impl Invoice {
    /// Create a fresh, unpaid invoice.
    pub fn new(reference: InvoiceReference, amount: Decimal, invoice_type: InvoiceType) -> DomainResult<Self> {
        if amount < Decimal::ZERO {
            return Err(DomainError::validation("invoice amount must not be negative"));
        }

        Ok(Self {
            id: InvoiceId::new(),
            reference,
            amount,
            amount_paid: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            invoice_type,
            payments: Vec::new(),
            version: 0,
        })
    }

    pub fn from_snapshot(snapshot: InvoiceSnapshot) -> Self {
        Self {
            id: snapshot.id,
            reference: snapshot.reference,
            amount: snapshot.amount,
            amount_paid: snapshot.amount_paid,
            tax_amount: snapshot.tax_amount,
            invoice_type: snapshot.invoice_type,
            payments: snapshot.payments,
            version: snapshot.version,
        }
    }

    pub fn snapshot(&self) -> InvoiceSnapshot {
        InvoiceSnapshot {
            id: self.id,
            reference: self.reference.clone(),
            amount: self.amount,
            amount_paid: self.amount_paid,
            tax_amount: self.tax_amount,
            invoice_type: self.invoice_type,
            payments: self.payments.clone(),
            version: self.version,
        }
    }

    /// Same invoice at a different persisted revision. Used by stores after a write.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn id_typed(&self) -> InvoiceId {
        self.id
    }

    pub fn reference(&self) -> &InvoiceReference {
        &self.reference
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn amount_paid(&self) -> Decimal {
        self.amount_paid
    }

    pub fn tax_amount(&self) -> Decimal {
        self.tax_amount
    }

    pub fn invoice_type(&self) -> InvoiceType {
        self.invoice_type
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn has_payments(&self) -> bool {
        !self.payments.is_empty()
    }

    /// Sum of every payment recorded on the invoice, clamped to the `Decimal` range.
    pub fn total_paid(&self) -> Decimal {
        self.payments
            .iter()
            .fold(Decimal::ZERO, |total, p| total.saturating_add(p.amount))
    }

    /// `amount - amount_paid`, clamped to the `Decimal` range; may go negative on
    /// inconsistent persisted data.
    pub fn remaining_amount(&self) -> Decimal {
        self.amount.saturating_sub(self.amount_paid)
    }

    pub fn is_fully_paid(&self) -> bool {
        self.has_payments() && self.total_paid() == self.amount
    }
}

impl AggregateRoot for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
