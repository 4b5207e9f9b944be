//! Double-entry ledger implementation
//!
//! This module provides the per-tenant ledger: the chart of accounts, the
//! document registry, and the journal of posted transactions. Posting is
//! document-scoped and idempotent; re-syncing a document replaces its
//! postings, and voiding flags them without deleting anything.

use std::collections::HashSet;
use tracing::debug;

use crate::account::ChartOfAccounts;
use crate::document::{DocumentRegistry, DocumentReference, DocumentType, NewDocument};
use crate::error::LedgerError;
use crate::reporting::Reporting;
use crate::transaction::Transaction;
use core_kernel::{Currency, DocumentId, MoneyError, TenantId};

/// Lifecycle state of a posted transaction
///
/// Balances read `Active` records only. History reads `Active` and
/// `Voided`. `Superseded` records were replaced by a later sync of the same
/// document and are retained purely as an audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TransactionState {
    /// Current postings of a live document
    Active,
    /// Postings of a voided document
    Voided,
    /// Replaced by a newer sync of the owning document
    Superseded,
}

/// A transaction as recorded in the journal, with its owner and state
#[derive(Debug, Clone, serde::Serialize)]
pub struct JournalRecord {
    transaction: Transaction,
    owner: DocumentId,
    state: TransactionState,
}

impl JournalRecord {
    /// Returns the posted transaction
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Returns the document that owns this transaction
    pub fn owner(&self) -> DocumentId {
        self.owner
    }

    /// Returns the lifecycle state
    pub fn state(&self) -> TransactionState {
        self.state
    }
}

/// The ledger for one tenant
///
/// The Ledger enforces double-entry accounting rules: every posted
/// transaction nets to zero in the base currency, every transaction is
/// owned by a registered document, and nothing posted is ever hard-deleted.
///
/// # Invariants
///
/// - All posted transactions balance to zero in base currency
/// - Every journal record's owner exists in the document registry
/// - Document-tagged entries reference registered documents
/// - Historical records change state but never content
#[derive(Debug)]
pub struct Ledger {
    tenant: TenantId,
    base_currency: Currency,
    chart: ChartOfAccounts,
    registry: DocumentRegistry,
    journal: Vec<JournalRecord>,
}

impl Ledger {
    /// Creates an empty ledger for `tenant` reporting in `base_currency`
    pub fn new(tenant: TenantId, base_currency: Currency) -> Self {
        Self {
            tenant,
            base_currency,
            chart: ChartOfAccounts::new(),
            registry: DocumentRegistry::new(),
            journal: Vec::new(),
        }
    }

    /// Returns the owning tenant
    pub fn tenant(&self) -> TenantId {
        self.tenant
    }

    /// Returns the base currency
    pub fn base_currency(&self) -> Currency {
        self.base_currency
    }

    /// Returns the chart of accounts
    pub fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    /// Returns the chart of accounts for registration
    pub fn chart_mut(&mut self) -> &mut ChartOfAccounts {
        &mut self.chart
    }

    /// Returns the document registry
    pub fn registry(&self) -> &DocumentRegistry {
        &self.registry
    }

    /// Returns the journal records in posting order
    pub fn journal(&self) -> &[JournalRecord] {
        &self.journal
    }

    /// Returns the read-only reporting view
    pub fn reporting(&self) -> Reporting<'_> {
        Reporting::new(self)
    }

    /// Looks up the document id already registered for a draft's identity
    ///
    /// Callers building a re-sync use this to keep the document id stable
    /// across syncs.
    pub fn document_id_for(&self, new: &NewDocument) -> Option<DocumentId> {
        self.registry.get_id_for(new)
    }

    /// Atomically replaces a document's postings
    ///
    /// Registers (or refreshes) the document, marks its previously active
    /// transactions `Superseded`, and appends `transactions` as the new
    /// active set. Validation runs before any mutation, so a failed sync
    /// leaves the ledger untouched.
    ///
    /// # Arguments
    ///
    /// * `document` - The document draft; its id must match any existing
    ///   registration for the same (type, reference)
    /// * `transactions` - The document's new postings
    ///
    /// # Returns
    ///
    /// The registered document id
    ///
    /// # Errors
    ///
    /// - [`LedgerError::DocumentIdConflict`] if the (type, reference) pair
    ///   is registered under a different id
    /// - [`LedgerError::UnknownDocument`] if an entry references a document
    ///   that is neither registered nor the one being synced
    /// - [`LedgerError::Money`] if an entry's base amount is not in the
    ///   ledger's base currency
    pub fn sync_document(
        &mut self,
        document: NewDocument,
        transactions: Vec<Transaction>,
    ) -> Result<DocumentId, LedgerError> {
        if let Some(registered) = self.registry.get_id_for(&document) {
            if registered != document.id {
                return Err(LedgerError::DocumentIdConflict {
                    doc_type: document.doc_type,
                    reference: document.reference,
                    registered,
                    presented: document.id,
                });
            }
        }

        for transaction in &transactions {
            for entry in transaction.entries() {
                let base_currency = entry.amount.value().base().currency();
                if base_currency != self.base_currency {
                    return Err(LedgerError::Money(MoneyError::CurrencyMismatch(
                        self.base_currency.to_string(),
                        base_currency.to_string(),
                    )));
                }
                if let Some(tagged) = entry.document {
                    if tagged != document.id && !self.registry.contains_id(tagged) {
                        return Err(LedgerError::UnknownDocument(tagged));
                    }
                }
            }
        }

        let doc_id = self.registry.upsert(document);
        let mut superseded = 0;
        for record in &mut self.journal {
            if record.owner == doc_id && record.state == TransactionState::Active {
                record.state = TransactionState::Superseded;
                superseded += 1;
            }
        }
        let posted = transactions.len();
        for transaction in transactions {
            self.journal.push(JournalRecord {
                transaction,
                owner: doc_id,
                state: TransactionState::Active,
            });
        }

        debug!(
            tenant = %self.tenant,
            document = %doc_id,
            posted,
            superseded,
            "synced document postings"
        );

        Ok(doc_id)
    }

    /// Voids a document, reversing its effect without deletion
    ///
    /// Flags the document and marks its active transactions `Voided`.
    /// Entries in other documents' transactions that reference the voided
    /// document are left in place; balance reads exclude them by filtering
    /// on the referenced document's void status.
    ///
    /// # Returns
    ///
    /// True if the document transitioned to voided in this call. Voiding an
    /// unknown or already-voided document is a no-op returning false.
    pub fn void_document(&mut self, id: DocumentId) -> bool {
        if !self.registry.mark_voided(id) {
            return false;
        }

        let mut voided = 0;
        for record in &mut self.journal {
            if record.owner == id && record.state == TransactionState::Active {
                record.state = TransactionState::Voided;
                voided += 1;
            }
        }

        debug!(tenant = %self.tenant, document = %id, voided, "voided document");
        true
    }

    /// Voids the document registered for (doc_type, reference), if any
    pub fn void_by_key(&mut self, doc_type: DocumentType, reference: DocumentReference) -> bool {
        match self.registry.get_id(doc_type, reference) {
            Some(id) => self.void_document(id),
            None => false,
        }
    }

    /// Voids every non-voided document of `doc_type` missing from `live`
    ///
    /// This is the reconciliation sweep used after a full re-sync: whatever
    /// the source no longer reports is gone and gets voided.
    ///
    /// # Returns
    ///
    /// The ids voided by this call, in document creation order.
    pub fn void_remaining(
        &mut self,
        doc_type: DocumentType,
        live: &HashSet<DocumentReference>,
    ) -> Vec<DocumentId> {
        let stale = self.registry.stale_ids(doc_type, live);
        for id in &stale {
            self.void_document(*id);
        }
        stale
    }
}
