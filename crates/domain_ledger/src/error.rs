//! Ledger domain errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::document::{DocumentReference, DocumentType};
use core_kernel::{DocumentId, MoneyError};

/// Errors that can occur in the ledger domain
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Transaction entries do not net to zero in base currency
    #[error("Unbalanced transaction: debits={debits}, credits={credits}")]
    Unbalanced { debits: Decimal, credits: Decimal },

    /// An entry references a document the registry does not know
    #[error("Unknown document referenced by entry: {0}")]
    UnknownDocument(DocumentId),

    /// A sync presented a different id for an already-registered document
    #[error(
        "Document identity conflict for {doc_type} {reference}: registered as {registered}, presented {presented}"
    )]
    DocumentIdConflict {
        doc_type: DocumentType,
        reference: DocumentReference,
        registered: DocumentId,
        presented: DocumentId,
    },

    /// Monetary arithmetic failed
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}
