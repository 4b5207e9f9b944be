//! Vendor payments
//!
//! A vendor payment carries the amount paid plus line items describing how
//! the payment applies: against specific bills, against vendor credits, or
//! as a convenience fee charged on top. Items drive the payment allocator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{BillId, Money, PaymentId, VendorCreditId, VendorId};

use crate::error::PayablesError;

/// What a payment line item applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentItemKind {
    /// Pays down a specific bill
    BillApplication(BillId),
    /// Consumes a vendor credit as part of the payment
    CreditApplication(VendorCreditId),
    /// Fee charged for the payment itself, not applied to any document
    ConvenienceFee,
}

/// One line item of a vendor payment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentItem {
    /// What this item applies to
    pub kind: PaymentItemKind,
    /// Item amount in the payment's currency
    pub amount: Money,
}

impl PaymentItem {
    /// An item applying part of the payment to a bill
    pub fn bill(bill_id: BillId, amount: Money) -> Self {
        Self {
            kind: PaymentItemKind::BillApplication(bill_id),
            amount,
        }
    }

    /// An item consuming a vendor credit
    pub fn credit(credit_id: VendorCreditId, amount: Money) -> Self {
        Self {
            kind: PaymentItemKind::CreditApplication(credit_id),
            amount,
        }
    }

    /// A convenience fee item
    pub fn fee(amount: Money) -> Self {
        Self {
            kind: PaymentItemKind::ConvenienceFee,
            amount,
        }
    }
}

/// A vendor payment as handed over by the source of record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorPayment {
    /// Unique identifier assigned by the source of record
    pub id: PaymentId,
    /// Vendor being paid
    pub vendor_id: VendorId,
    /// Payment date, also the conversion fixing date
    pub date: NaiveDate,
    /// External reference (bank ref, check number)
    pub reference: Option<String>,
    /// Amount paid, in the payment's currency
    pub amount: Money,
    /// Line items describing how the payment applies
    pub items: Vec<PaymentItem>,
    /// Whether the source has voided this payment
    pub voided: bool,
}

impl VendorPayment {
    /// Creates a payment snapshot with no line items
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier assigned by the source of record
    /// * `vendor_id` - Vendor being paid
    /// * `date` - Payment date
    /// * `amount` - Amount paid
    pub fn new(id: PaymentId, vendor_id: VendorId, date: NaiveDate, amount: Money) -> Self {
        Self {
            id,
            vendor_id,
            date,
            reference: None,
            amount,
            items: Vec::new(),
            voided: false,
        }
    }

    /// Sets the external reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Appends a line item
    pub fn with_item(mut self, item: PaymentItem) -> Self {
        self.items.push(item);
        self
    }

    /// Marks the payment as voided
    pub fn void(&mut self) {
        self.voided = true;
    }

    /// Checks the payment is well-formed before allocation.
    ///
    /// The amount must be strictly positive and every line item must carry
    /// a positive amount in the payment's currency. Runs before any posting
    /// so a rejected payment leaves the ledger untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PayablesError::NonPositivePayment`],
    /// [`PayablesError::NonPositiveItem`] or
    /// [`PayablesError::ItemCurrencyMismatch`] naming the offending item.
    pub fn validate(&self) -> Result<(), PayablesError> {
        if !self.amount.is_positive() {
            return Err(PayablesError::NonPositivePayment {
                amount: self.amount,
            });
        }
        for (index, item) in self.items.iter().enumerate() {
            if item.amount.currency() != self.amount.currency() {
                return Err(PayablesError::ItemCurrencyMismatch {
                    index,
                    item_currency: item.amount.currency(),
                    payment_currency: self.amount.currency(),
                });
            }
            if !item.amount.is_positive() {
                return Err(PayablesError::NonPositiveItem {
                    index,
                    amount: item.amount,
                });
            }
        }
        Ok(())
    }
}
