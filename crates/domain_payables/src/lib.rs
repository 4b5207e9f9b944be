//! Accounts Payable Domain - Vendor Ledger Posting
//!
//! This crate turns vendor-facing source records into double-entry postings
//! and answers the balance questions reporting asks about them. It sits on
//! top of `domain_ledger`, which owns the bookkeeping rules; this crate owns
//! the payables chart and the translation from records to transactions.
//!
//! # Posting Rules
//!
//! - A bill credits Accounts Payable and debits Purchases
//! - A vendor credit is the mirror image
//! - A payment credits Cash and lets the allocator split the debit side
//!   across bills, consumed credits, and convenience fees
//! - An adjustment moves a signed amount between Accounts Payable and Cash
//!
//! # Rebuild
//!
//! [`Populator`] re-syncs everything from the source of record and voids
//! whatever the source no longer reports, one record type at a time, with a
//! resumable checkpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_payables::{AccountsPayableLedger, Bill};
//!
//! let mut ledger = AccountsPayableLedger::new(tenant, Currency::USD, rates);
//!
//! ledger.sync_bill(&bill)?;
//! ledger.sync_payment(&payment)?;
//!
//! let owed = ledger.balance(DocumentType::Invoice, bill.id.into())?;
//! let history = ledger.activity(DocumentType::Invoice, bill.id.into())?;
//! ```

pub mod adjustment;
pub mod bill;
pub mod directory;
pub mod error;
pub mod ledger;
pub mod payment;
pub mod populator;
pub mod vendor_credit;

mod allocator;

pub use adjustment::VendorAdjustment;
pub use bill::Bill;
pub use directory::{LedgerDirectory, LedgerHandle};
pub use error::PayablesError;
pub use ledger::{AccountsPayableLedger, PayableAccount};
pub use payment::{PaymentItem, PaymentItemKind, VendorPayment};
pub use populator::{
    PopulateError, Populator, PopulatorConfig, RebuildCause, RebuildCheckpoint, RebuildReport,
    RebuildStage, RecordSource, SourceError,
};
pub use vendor_credit::VendorCredit;
