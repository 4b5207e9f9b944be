//! Vendor credits
//!
//! A vendor credit is a credit note issued by a vendor, reducing what is
//! owed to them. Syncing one posts the mirror image of a bill.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{Money, VendorCreditId, VendorId};

/// A vendor credit note as handed over by the source of record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorCredit {
    /// Unique identifier assigned by the source of record
    pub id: VendorCreditId,
    /// Vendor that issued the credit
    pub vendor_id: VendorId,
    /// Credit date, also the conversion fixing date
    pub date: NaiveDate,
    /// Optional display number, e.g. the vendor's credit note number
    pub number: Option<String>,
    /// Total amount in the credit's currency
    pub total: Money,
    /// Whether the source has voided this credit
    pub voided: bool,
}

impl VendorCredit {
    /// Creates a vendor credit snapshot
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier assigned by the source of record
    /// * `vendor_id` - Vendor that issued the credit
    /// * `date` - Credit note date
    /// * `total` - Total amount credited
    pub fn new(id: VendorCreditId, vendor_id: VendorId, date: NaiveDate, total: Money) -> Self {
        Self {
            id,
            vendor_id,
            date,
            number: None,
            total,
            voided: false,
        }
    }

    /// Sets the display number
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    /// Marks the credit as voided
    pub fn void(&mut self) {
        self.voided = true;
    }
}
