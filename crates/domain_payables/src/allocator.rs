//! Payment allocation
//!
//! Splits a vendor payment across its line items: debits against the bills
//! it pays, credits for the vendor credits it consumes, debits for
//! convenience fees. The running remainder is tracked in the payment's own
//! currency, unconverted, so per-item conversion rounding never compounds
//! into a phantom residual.

use chrono::NaiveDate;
use tracing::debug;

use core_kernel::{AccountingParty, CurrencyConverter, Money};
use domain_ledger::{AccountKey, DocumentRegistry, DocumentType, Entry, EntryValue};

use crate::error::PayablesError;
use crate::payment::{PaymentItemKind, VendorPayment};

/// Accounts the allocator posts against
#[derive(Debug)]
pub(crate) struct AllocatorAccounts {
    /// Accounts Payable, for bill and credit applications and the remainder
    pub payable: AccountKey,
    /// Expense account taking convenience fees
    pub fee: AccountKey,
}

/// Outcome of allocating one payment
#[derive(Debug)]
pub(crate) struct Allocation {
    /// Entries in item order, remainder entry last when one is needed
    pub entries: Vec<Entry>,
    /// Unapplied amount left after all items, in payment currency
    pub remaining: Money,
}

/// Walks the payment's line items in source order and produces the
/// Accounts Payable and fee entries for them.
///
/// Items referencing a bill or vendor credit the registry does not know are
/// skipped without touching the remainder. A negative remainder after all
/// items aborts the allocation; a positive one becomes a final unattached
/// debit against Accounts Payable.
pub(crate) fn allocate(
    payment: &VendorPayment,
    registry: &DocumentRegistry,
    converter: &CurrencyConverter,
    accounts: &AllocatorAccounts,
) -> Result<Allocation, PayablesError> {
    let party = AccountingParty::from(payment.vendor_id);
    let mut entries = Vec::new();
    let mut remaining = payment.amount;

    for item in &payment.items {
        match item.kind {
            PaymentItemKind::ConvenienceFee => {
                let value = converted(converter, item.amount, payment.date)?;
                entries.push(Entry::debit(accounts.fee.clone(), value, party));
                remaining = remaining - item.amount;
            }
            PaymentItemKind::BillApplication(bill_id) => {
                match registry.get_id(DocumentType::Invoice, bill_id.into()) {
                    Some(document) => {
                        let value = converted(converter, item.amount, payment.date)?;
                        entries.push(
                            Entry::debit(accounts.payable.clone(), value, party)
                                .for_document(document),
                        );
                        remaining = remaining - item.amount;
                    }
                    None => {
                        debug!(bill_id = %bill_id, "Skipping payment item for unknown bill");
                    }
                }
            }
            PaymentItemKind::CreditApplication(credit_id) => {
                match registry.get_id(DocumentType::CreditNote, credit_id.into()) {
                    Some(document) => {
                        let value = converted(converter, item.amount, payment.date)?;
                        entries.push(
                            Entry::credit(accounts.payable.clone(), value, party)
                                .for_document(document),
                        );
                        remaining = remaining + item.amount;
                    }
                    None => {
                        debug!(credit_id = %credit_id, "Skipping payment item for unknown credit");
                    }
                }
            }
        }
    }

    if remaining.is_negative() {
        return Err(PayablesError::OverApplied {
            excess: remaining.abs(),
        });
    }
    if remaining.is_positive() {
        let value = converted(converter, remaining, payment.date)?;
        entries.push(Entry::debit(accounts.payable.clone(), value, party));
    }

    Ok(Allocation { entries, remaining })
}

fn converted(
    converter: &CurrencyConverter,
    amount: Money,
    date: NaiveDate,
) -> Result<EntryValue, PayablesError> {
    let base = converter.convert(amount, date)?;
    Ok(EntryValue::new(amount, base))
}
