//! Tax policy per invoice type.

use rust_decimal::Decimal;

use remit_core::ValueObject;

use crate::invoice::InvoiceType;

/// Fractional tax rate applied to a payment amount (e.g. `0.14` for 14%).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TaxRate(Decimal);

impl ValueObject for TaxRate {}

impl TaxRate {
    /// Fixed rate charged on every payment against a commercial invoice (14%).
    pub const COMMERCIAL: TaxRate = TaxRate(Decimal::from_parts(14, 0, 0, false, 2));

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Tax owed on `amount` at this rate.
    pub fn tax_on(&self, amount: Decimal) -> Decimal {
        amount * self.0
    }
}

impl InvoiceType {
    /// Rate accrued on payments, `None` when the type carries no tax.
    pub fn tax_rate(&self) -> Option<TaxRate> {
        match self {
            InvoiceType::Standard => None,
            InvoiceType::Commercial => Some(TaxRate::COMMERCIAL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commercial_rate_is_fourteen_percent() {
        assert_eq!(TaxRate::COMMERCIAL.as_decimal(), Decimal::new(14, 2));
        assert_eq!(
            TaxRate::COMMERCIAL.tax_on(Decimal::new(10, 0)),
            Decimal::new(14, 1)
        );
    }

    #[test]
    fn only_commercial_invoices_carry_tax() {
        assert_eq!(InvoiceType::Standard.tax_rate(), None);
        assert_eq!(InvoiceType::Commercial.tax_rate(), Some(TaxRate::COMMERCIAL));
    }
}
