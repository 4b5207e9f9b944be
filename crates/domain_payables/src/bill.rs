//! Vendor bills
//!
//! A bill is a snapshot of an invoice received from a vendor, as recorded
//! by the purchasing side of the system. Syncing a bill posts its total
//! against Accounts Payable.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{BillId, Money, VendorId};

/// A vendor bill as handed over by the source of record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// Unique identifier assigned by the source of record
    pub id: BillId,
    /// Vendor the bill was received from
    pub vendor_id: VendorId,
    /// Bill date, also the conversion fixing date
    pub date: NaiveDate,
    /// Optional payment due date
    pub due_date: Option<NaiveDate>,
    /// Optional display number, e.g. the vendor's invoice number
    pub number: Option<String>,
    /// Total amount in the bill's currency
    pub total: Money,
    /// Whether the source has voided this bill
    pub voided: bool,
}

impl Bill {
    /// Creates a bill snapshot
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier assigned by the source of record
    /// * `vendor_id` - Vendor the bill belongs to
    /// * `date` - Bill date
    /// * `total` - Total amount owed
    pub fn new(id: BillId, vendor_id: VendorId, date: NaiveDate, total: Money) -> Self {
        Self {
            id,
            vendor_id,
            date,
            due_date: None,
            number: None,
            total,
            voided: false,
        }
    }

    /// Sets the due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the display number
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    /// Marks the bill as voided
    pub fn void(&mut self) {
        self.voided = true;
    }
}
