//! Read-only reporting over the journal
//!
//! Reports are fold-on-read: nothing is cached, so they are always
//! consistent with the journal. Balance reads see active postings only;
//! activity reads also include voided history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::account::AccountKey;
use crate::document::{DocumentReference, DocumentType};
use crate::ledger::{Ledger, TransactionState};
use core_kernel::{AccountingParty, Currency, DocumentId, Money};

/// One line of document activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRow {
    /// Type of the document that posted the entry
    pub document_type: DocumentType,
    /// Source reference of the document that posted the entry
    pub reference: DocumentReference,
    /// Original-currency amount, positive for debits and negative for credits
    pub amount: Money,
    /// Original currency of the entry
    pub currency: Currency,
    /// Transaction date
    pub date: NaiveDate,
}

/// Read-only view over one ledger
///
/// Obtained from [`Ledger::reporting`]; borrows the ledger, returns owned
/// snapshots.
#[derive(Debug, Clone, Copy)]
pub struct Reporting<'a> {
    ledger: &'a Ledger,
}

impl<'a> Reporting<'a> {
    pub(crate) fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Net base-currency balance of entries applied against a document
    ///
    /// Sums active postings tagged with `document` on `account`, using the
    /// debit-positive convention. A voided document balances to zero by
    /// definition, including any allocation entries other documents still
    /// hold against it.
    pub fn document_balance(&self, document: DocumentId, account: &AccountKey) -> Money {
        let base = self.ledger.base_currency();
        if self.ledger.registry().is_voided(document) {
            return Money::zero(base);
        }

        let mut net = Money::zero(base);
        for record in self.ledger.journal() {
            if record.state() != TransactionState::Active {
                continue;
            }
            for entry in record.transaction().entries() {
                if entry.document == Some(document) && entry.account == *account {
                    net = net + entry.amount.signed_base();
                }
            }
        }
        net
    }

    /// Chronological activity applied against a document
    ///
    /// Includes entries from voided documents so history survives a void;
    /// superseded postings stay hidden. Each row names the document that
    /// posted the entry, so a bill's activity lists the payments and
    /// credits applied to it.
    pub fn document_activity(&self, document: DocumentId, account: &AccountKey) -> Vec<ActivityRow> {
        let mut rows = Vec::new();
        for record in self.ledger.journal() {
            if record.state() == TransactionState::Superseded {
                continue;
            }
            let owner = self
                .ledger
                .registry()
                .get(record.owner())
                .expect("journal record owner is registered");
            for entry in record.transaction().entries() {
                if entry.document == Some(document) && entry.account == *account {
                    let amount = entry.amount.signed_original();
                    rows.push(ActivityRow {
                        document_type: owner.doc_type,
                        reference: owner.reference,
                        amount,
                        currency: amount.currency(),
                        date: record.transaction().date(),
                    });
                }
            }
        }
        rows
    }

    /// Net base-currency balance of a counterparty on an account
    ///
    /// Sums active postings for `party` on `account`, excluding entries
    /// applied against voided documents.
    pub fn party_balance(&self, party: AccountingParty, account: &AccountKey) -> Money {
        let mut net = Money::zero(self.ledger.base_currency());
        for record in self.ledger.journal() {
            if record.state() != TransactionState::Active {
                continue;
            }
            for entry in record.transaction().entries() {
                if entry.party != party || entry.account != *account {
                    continue;
                }
                if let Some(tagged) = entry.document {
                    if self.ledger.registry().is_voided(tagged) {
                        continue;
                    }
                }
                net = net + entry.amount.signed_base();
            }
        }
        net
    }
}
