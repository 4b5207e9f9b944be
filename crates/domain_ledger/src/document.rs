//! Source documents and the document registry
//!
//! Every journal transaction is owned by exactly one document, the ledger's
//! record of a source system artifact (an invoice, a payment). Documents are
//! identified within a ledger by their (type, reference) pair; the registry
//! enforces that uniqueness and tracks void status.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use uuid::Uuid;

use core_kernel::{AccountingParty, AdjustmentId, BillId, DocumentId, PaymentId, VendorCreditId};

/// Kinds of source documents the ledger recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// A vendor bill
    Invoice,
    /// A vendor credit note
    CreditNote,
    /// An outbound payment
    Payment,
    /// A manual balance adjustment
    Adjustment,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentType::Invoice => "invoice",
            DocumentType::CreditNote => "credit_note",
            DocumentType::Payment => "payment",
            DocumentType::Adjustment => "adjustment",
        };
        write!(f, "{name}")
    }
}

/// The source system's identifier for a document
///
/// References are opaque to the ledger; they only need to be stable and
/// unique per document type. Typed source ids convert into references so
/// the compiler keeps callers honest about which record they are naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentReference(Uuid);

impl DocumentReference {
    /// Creates from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<BillId> for DocumentReference {
    fn from(id: BillId) -> Self {
        Self(id.into())
    }
}

impl From<VendorCreditId> for DocumentReference {
    fn from(id: VendorCreditId) -> Self {
        Self(id.into())
    }
}

impl From<PaymentId> for DocumentReference {
    fn from(id: PaymentId) -> Self {
        Self(id.into())
    }
}

impl From<AdjustmentId> for DocumentReference {
    fn from(id: AdjustmentId) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for DocumentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identity of a document within one ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentKey {
    /// Document kind
    pub doc_type: DocumentType,
    /// Source system reference
    pub reference: DocumentReference,
}

impl DocumentKey {
    /// Creates a key from its parts
    pub fn new(doc_type: DocumentType, reference: DocumentReference) -> Self {
        Self {
            doc_type,
            reference,
        }
    }
}

/// A document about to be registered or re-registered
///
/// The caller allocates the [`DocumentId`] so entries can reference their
/// own document before anything is committed to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDocument {
    /// Ledger identity; must match the registered id on re-sync
    pub id: DocumentId,
    /// Document kind
    pub doc_type: DocumentType,
    /// Source system reference
    pub reference: DocumentReference,
    /// Counterparty the document belongs to
    pub party: AccountingParty,
    /// Document date
    pub date: NaiveDate,
    /// Due date, if the source tracks one
    pub due_date: Option<NaiveDate>,
    /// Human-readable document number
    pub number: Option<String>,
}

impl NewDocument {
    /// Creates a new document draft
    pub fn new(
        id: DocumentId,
        doc_type: DocumentType,
        reference: DocumentReference,
        party: AccountingParty,
        date: NaiveDate,
    ) -> Self {
        Self {
            id,
            doc_type,
            reference,
            party,
            date,
            due_date: None,
            number: None,
        }
    }

    /// Sets the due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the document number
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    /// Returns the identity key of this document
    pub fn key(&self) -> DocumentKey {
        DocumentKey::new(self.doc_type, self.reference)
    }
}

/// A registered document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Ledger identity
    pub id: DocumentId,
    /// Document kind
    pub doc_type: DocumentType,
    /// Source system reference
    pub reference: DocumentReference,
    /// Counterparty the document belongs to
    pub party: AccountingParty,
    /// Document date
    pub date: NaiveDate,
    /// Due date, if the source tracks one
    pub due_date: Option<NaiveDate>,
    /// Human-readable document number
    pub number: Option<String>,
    /// True once the document has been voided
    pub voided: bool,
}

impl Document {
    /// Returns the identity key of this document
    pub fn key(&self) -> DocumentKey {
        DocumentKey::new(self.doc_type, self.reference)
    }

    fn from_new(new: NewDocument) -> Self {
        Self {
            id: new.id,
            doc_type: new.doc_type,
            reference: new.reference,
            party: new.party,
            date: new.date,
            due_date: new.due_date,
            number: new.number,
            voided: false,
        }
    }
}

/// Registry of all documents known to one ledger
///
/// Documents are never deleted. Identity is double-keyed: a stable ledger
/// id for entry tags, and the (type, reference) pair the source system
/// addresses documents by.
#[derive(Debug, Clone, Default)]
pub struct DocumentRegistry {
    documents: HashMap<DocumentId, Document>,
    by_key: HashMap<DocumentKey, DocumentId>,
}

impl DocumentRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the document id registered for (doc_type, reference)
    pub fn get_id(&self, doc_type: DocumentType, reference: DocumentReference) -> Option<DocumentId> {
        self.by_key.get(&DocumentKey::new(doc_type, reference)).copied()
    }

    /// Looks up the id already registered for a draft's identity key
    pub fn get_id_for(&self, new: &NewDocument) -> Option<DocumentId> {
        self.by_key.get(&new.key()).copied()
    }

    /// Gets a document by ledger id
    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id)
    }

    /// Returns true if `id` is registered
    pub fn contains_id(&self, id: DocumentId) -> bool {
        self.documents.contains_key(&id)
    }

    /// Returns true if `id` is registered and voided
    ///
    /// Absent documents report false; the caller decides whether absence
    /// is an error.
    pub fn is_voided(&self, id: DocumentId) -> bool {
        self.documents.get(&id).map(|d| d.voided).unwrap_or(false)
    }

    /// Flags a document as voided
    ///
    /// Returns true if the document transitioned to voided in this call.
    /// Voiding an already-voided or unknown document is a no-op.
    pub fn mark_voided(&mut self, id: DocumentId) -> bool {
        match self.documents.get_mut(&id) {
            Some(doc) if !doc.voided => {
                doc.voided = true;
                true
            }
            _ => false,
        }
    }

    /// Registers a document or refreshes an existing registration
    ///
    /// Re-registering clears the voided flag and replaces the descriptive
    /// fields. The caller must have checked id consistency via
    /// [`DocumentRegistry::get_id_for`] first.
    pub(crate) fn upsert(&mut self, new: NewDocument) -> DocumentId {
        let id = new.id;
        self.by_key.insert(new.key(), id);
        self.documents.insert(id, Document::from_new(new));
        id
    }

    /// Lists non-voided documents of `doc_type` whose reference is not in `live`
    ///
    /// Results are ordered by document id, which for v7 ids is creation
    /// order.
    pub fn stale_ids(
        &self,
        doc_type: DocumentType,
        live: &HashSet<DocumentReference>,
    ) -> Vec<DocumentId> {
        let mut stale: Vec<DocumentId> = self
            .documents
            .values()
            .filter(|doc| {
                doc.doc_type == doc_type && !doc.voided && !live.contains(&doc.reference)
            })
            .map(|doc| doc.id)
            .collect();
        stale.sort();
        stale
    }

    /// Returns the number of registered documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if no documents are registered
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Iterates over all documents
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }
}
