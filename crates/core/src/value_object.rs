//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity** and are **immutable**: two instances with the same
/// attributes are interchangeable. A tax rate or an invoice reference is a value object;
/// an invoice (tracked by its `InvoiceId`) is not.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct TaxRate(Decimal);
///
/// impl ValueObject for TaxRate {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
