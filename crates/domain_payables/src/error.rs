//! Accounts payable domain errors

use thiserror::Error;

use core_kernel::{Currency, Money, RateError};
use domain_ledger::{DocumentType, LedgerError};

/// Errors that can occur while posting or querying payables
#[derive(Debug, Error)]
pub enum PayablesError {
    /// Payment items consume more than the payment amount
    #[error("Payment over-applied by {excess}")]
    OverApplied {
        /// How far the applications exceed the payment amount, in payment currency
        excess: Money,
    },

    /// Payment amount must be strictly positive
    #[error("Payment amount must be positive, got {amount}")]
    NonPositivePayment { amount: Money },

    /// Payment line items must carry a positive amount
    #[error("Payment item {index} must have a positive amount, got {amount}")]
    NonPositiveItem { index: usize, amount: Money },

    /// Payment line items must be denominated in the payment currency
    #[error("Payment item {index} is in {item_currency}, expected {payment_currency}")]
    ItemCurrencyMismatch {
        index: usize,
        item_currency: Currency,
        payment_currency: Currency,
    },

    /// Balance and activity queries only cover bill and credit note documents
    #[error("Unsupported document type for payables reporting: {0}")]
    UnsupportedDocumentType(DocumentType),

    /// Exchange rate lookup or conversion failed
    #[error("Rate error: {0}")]
    Rate(#[from] RateError),

    /// Underlying ledger rejected the posting
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl PayablesError {
    /// Whether retrying the same sync call can succeed without operator
    /// intervention. Only transient rate failures qualify; business-rule
    /// violations never do.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PayablesError::Rate(e) if e.is_retryable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_rate_unavailable_is_retryable() {
        let err = PayablesError::Rate(RateError::Unavailable {
            currency: Currency::EUR,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        });
        assert!(err.is_retryable());
    }

    #[test]
    fn test_over_application_is_not_retryable() {
        let err = PayablesError::OverApplied {
            excess: Money::from_minor(2000, Currency::USD),
        };
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("over-applied"));
    }

    #[test]
    fn test_ledger_errors_convert() {
        let inner = LedgerError::UnknownDocument(core_kernel::DocumentId::new());
        let err = PayablesError::from(inner);
        assert!(matches!(err, PayablesError::Ledger(_)));
        assert!(!err.is_retryable());
    }
}
