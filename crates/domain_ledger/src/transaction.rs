//! Transactions and entries
//!
//! This module defines the balanced unit of posting. Every entry carries two
//! amounts: the original amount in the document's currency and its
//! conversion into the ledger's base currency. Balance is enforced over the
//! base amounts at construction, so an unbalanced transaction value cannot
//! exist.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::account::AccountKey;
use crate::error::LedgerError;
use core_kernel::{AccountingParty, Currency, DocumentId, EntryId, Money, TransactionId};

/// An amount in its original currency paired with its base conversion
///
/// Both legs of the pair are frozen at posting time, so reports never need
/// a rate lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryValue {
    original: Money,
    base: Money,
}

impl EntryValue {
    /// Pairs an original amount with its base-currency conversion
    pub fn new(original: Money, base: Money) -> Self {
        Self { original, base }
    }

    /// Returns the amount in the document's currency
    pub fn original(&self) -> Money {
        self.original
    }

    /// Returns the amount converted to the ledger's base currency
    pub fn base(&self) -> Money {
        self.base
    }
}

/// A magnitude with its side of the books
///
/// Magnitudes are kept positive; direction lives in the variant. Signed
/// accessors use the debit-positive convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignedAmount {
    /// Debit side (increases debit-normal accounts)
    Debit(EntryValue),
    /// Credit side (increases credit-normal accounts)
    Credit(EntryValue),
}

impl SignedAmount {
    /// Returns the underlying value pair
    pub fn value(&self) -> EntryValue {
        match self {
            SignedAmount::Debit(value) | SignedAmount::Credit(value) => *value,
        }
    }

    /// Returns true for the debit side
    pub fn is_debit(&self) -> bool {
        matches!(self, SignedAmount::Debit(_))
    }

    /// Returns the base amount, positive for debits and negative for credits
    pub fn signed_base(&self) -> Money {
        match self {
            SignedAmount::Debit(value) => value.base(),
            SignedAmount::Credit(value) => -value.base(),
        }
    }

    /// Returns the original amount, positive for debits and negative for credits
    pub fn signed_original(&self) -> Money {
        match self {
            SignedAmount::Debit(value) => value.original(),
            SignedAmount::Credit(value) => -value.original(),
        }
    }
}

/// A single line of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique entry identifier
    pub id: EntryId,
    /// Account the entry posts to
    pub account: AccountKey,
    /// Amount and side
    pub amount: SignedAmount,
    /// Counterparty the entry belongs to
    pub party: AccountingParty,
    /// Document this entry applies against, if any
    ///
    /// An entry may reference a document other than the one owning its
    /// transaction (a payment entry applying against a bill), or none at
    /// all (a cash leg).
    pub document: Option<DocumentId>,
}

impl Entry {
    /// Creates a debit entry
    pub fn debit(account: AccountKey, value: EntryValue, party: AccountingParty) -> Self {
        Self {
            id: EntryId::new_v7(),
            account,
            amount: SignedAmount::Debit(value),
            party,
            document: None,
        }
    }

    /// Creates a credit entry
    pub fn credit(account: AccountKey, value: EntryValue, party: AccountingParty) -> Self {
        Self {
            id: EntryId::new_v7(),
            account,
            amount: SignedAmount::Credit(value),
            party,
            document: None,
        }
    }

    /// Tags the entry as applying against `document`
    pub fn for_document(mut self, document: DocumentId) -> Self {
        self.document = Some(document);
        self
    }
}

/// A balanced set of entries posted as one unit
///
/// Construction validates that base amounts share one currency and net to
/// zero; entries are immutable afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    id: TransactionId,
    description: String,
    date: NaiveDate,
    currency: Currency,
    entries: Vec<Entry>,
}

impl Transaction {
    /// Creates a transaction after validating the double-entry invariant
    ///
    /// # Arguments
    ///
    /// * `description` - What the transaction records
    /// * `date` - Transaction date (drives rate resolution and reporting)
    /// * `currency` - The original currency of the source document
    /// * `entries` - Entry lines; base amounts must net to zero
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Unbalanced`] when base debits and credits
    /// differ, and [`LedgerError::Money`] when base amounts mix currencies
    /// or overflow during summation.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let transaction = Transaction::new(
    ///     "Vendor bill",
    ///     bill.date,
    ///     bill.total.currency(),
    ///     vec![
    ///         Entry::credit(payable.clone(), value, party).for_document(doc_id),
    ///         Entry::debit(purchases.clone(), value, party).for_document(doc_id),
    ///     ],
    /// )?;
    /// ```
    pub fn new(
        description: impl Into<String>,
        date: NaiveDate,
        currency: Currency,
        entries: Vec<Entry>,
    ) -> Result<Self, LedgerError> {
        let base_currency = entries
            .first()
            .map(|entry| entry.amount.value().base().currency())
            .unwrap_or(currency);

        let mut debits = Money::zero(base_currency);
        let mut credits = Money::zero(base_currency);
        for entry in &entries {
            let base = entry.amount.value().base();
            match entry.amount {
                SignedAmount::Debit(_) => debits = debits.checked_add(&base)?,
                SignedAmount::Credit(_) => credits = credits.checked_add(&base)?,
            }
        }

        if debits != credits {
            return Err(LedgerError::Unbalanced {
                debits: debits.to_decimal(),
                credits: credits.to_decimal(),
            });
        }

        Ok(Self {
            id: TransactionId::new_v7(),
            description: description.into(),
            date,
            currency,
            entries,
        })
    }

    /// Returns the transaction identifier
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Returns the description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the transaction date
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the original currency of the source document
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the entry lines
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
}
