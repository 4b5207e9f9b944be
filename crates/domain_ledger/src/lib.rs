//! Ledger Domain - Double-Entry Posting System
//!
//! This crate implements a strict double-entry bookkeeping system scoped to
//! one tenant per ledger, ensuring financial integrity for every posted
//! transaction.
//!
//! # Double-Entry Accounting Principles
//!
//! Every posted transaction creates balanced debits and credits:
//! - Debits increase asset/expense accounts
//! - Credits increase liability/equity/revenue accounts
//! - The sum of base-currency debits must equal the sum of credits
//!
//! # Document-Scoped Posting
//!
//! The unit of change is a source document, not a transaction. Re-syncing a
//! document atomically replaces its postings; voiding flags them. Nothing is
//! ever hard-deleted, so reports can show history as well as balances.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_ledger::{Entry, EntryValue, Ledger, Transaction};
//!
//! let mut ledger = Ledger::new(tenant, Currency::USD);
//!
//! let transaction = Transaction::new(
//!     "Vendor bill",
//!     bill_date,
//!     Currency::USD,
//!     vec![
//!         Entry::credit(payable.clone(), value, party).for_document(doc.id),
//!         Entry::debit(purchases.clone(), value, party).for_document(doc.id),
//!     ],
//! )?;
//!
//! ledger.sync_document(doc, vec![transaction])?;
//! ```

pub mod account;
pub mod document;
pub mod error;
pub mod ledger;
pub mod reporting;
pub mod transaction;

pub use account::{Account, AccountKey, AccountType, ChartOfAccounts};
pub use document::{Document, DocumentKey, DocumentReference, DocumentRegistry, DocumentType, NewDocument};
pub use error::LedgerError;
pub use ledger::{JournalRecord, Ledger, TransactionState};
pub use reporting::{ActivityRow, Reporting};
pub use transaction::{Entry, EntryValue, SignedAmount, Transaction};
