//! Vendor adjustments
//!
//! An adjustment moves a signed amount through Accounts Payable outside the
//! regular bill and payment flow, optionally pinned to a specific bill or
//! vendor credit. A positive amount reduces what is owed, a negative amount
//! increases it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{AdjustmentId, BillId, Money, VendorCreditId, VendorId};

/// A vendor adjustment as handed over by the source of record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorAdjustment {
    /// Unique identifier assigned by the source of record
    pub id: AdjustmentId,
    /// Vendor the adjustment applies to
    pub vendor_id: VendorId,
    /// Adjustment date, also the conversion fixing date
    pub date: NaiveDate,
    /// Signed amount; positive reduces the payable, negative increases it
    pub amount: Money,
    /// Bill the adjustment applies to, if any
    pub bill_id: Option<BillId>,
    /// Vendor credit the adjustment applies to, if any
    pub vendor_credit_id: Option<VendorCreditId>,
    /// Whether the source has voided this adjustment
    pub voided: bool,
}

impl VendorAdjustment {
    /// Creates an adjustment snapshot
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier assigned by the source of record
    /// * `vendor_id` - Vendor the adjustment applies to
    /// * `date` - Adjustment date
    /// * `amount` - Signed amount to move through Accounts Payable
    pub fn new(id: AdjustmentId, vendor_id: VendorId, date: NaiveDate, amount: Money) -> Self {
        Self {
            id,
            vendor_id,
            date,
            amount,
            bill_id: None,
            vendor_credit_id: None,
            voided: false,
        }
    }

    /// Pins the adjustment to a bill
    pub fn with_bill(mut self, bill_id: BillId) -> Self {
        self.bill_id = Some(bill_id);
        self
    }

    /// Pins the adjustment to a vendor credit
    pub fn with_vendor_credit(mut self, credit_id: VendorCreditId) -> Self {
        self.vendor_credit_id = Some(credit_id);
        self
    }

    /// Marks the adjustment as voided
    pub fn void(&mut self) {
        self.voided = true;
    }
}
