//! Accounts and the chart of accounts
//!
//! This module defines the account structure for double-entry bookkeeping.
//! Accounts are keyed by name and created lazily; the chart never deletes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use core_kernel::Currency;

/// Types of accounts in the chart of accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Asset accounts (debit normal balance)
    Asset,
    /// Liability accounts (credit normal balance)
    Liability,
    /// Equity accounts (credit normal balance)
    Equity,
    /// Revenue accounts (credit normal balance)
    Revenue,
    /// Expense accounts (debit normal balance)
    Expense,
}

impl AccountType {
    /// Returns true if this account type has a debit normal balance
    pub fn is_debit_normal(&self) -> bool {
        matches!(self, AccountType::Asset | AccountType::Expense)
    }
}

/// Natural key of an account within one ledger
///
/// The upstream system addresses accounts by name, so the chart uses the
/// name itself as identity instead of a surrogate id. Two syncs asking for
/// the same key always land on the same account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountKey(String);

impl AccountKey {
    /// Creates a key from an account name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the account name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// An account in the chart of accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Natural key (the account name)
    pub key: AccountKey,
    /// Account type
    pub account_type: AccountType,
    /// Currency balances are reported in
    pub currency: Currency,
}

impl Account {
    /// Creates a new account
    pub fn new(key: AccountKey, account_type: AccountType, currency: Currency) -> Self {
        Self {
            key,
            account_type,
            currency,
        }
    }
}

/// The chart of accounts for one ledger
///
/// Accounts are registered on first use and never removed. Asking for an
/// existing key returns the original account unchanged; the requested type
/// and currency only apply on creation.
#[derive(Debug, Clone, Default)]
pub struct ChartOfAccounts {
    accounts: HashMap<AccountKey, Account>,
}

impl ChartOfAccounts {
    /// Creates an empty chart
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the account for `key`, creating it if absent
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let account = chart.find_or_create(
    ///     AccountKey::new("Accounts Payable"),
    ///     AccountType::Liability,
    ///     Currency::USD,
    /// );
    /// ```
    pub fn find_or_create(
        &mut self,
        key: AccountKey,
        account_type: AccountType,
        currency: Currency,
    ) -> &Account {
        self.accounts
            .entry(key.clone())
            .or_insert_with(|| Account::new(key, account_type, currency))
    }

    /// Gets an account by key
    pub fn get(&self, key: &AccountKey) -> Option<&Account> {
        self.accounts.get(key)
    }

    /// Returns true if the chart contains `key`
    pub fn contains(&self, key: &AccountKey) -> bool {
        self.accounts.contains_key(key)
    }

    /// Returns the number of registered accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if no accounts are registered
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Iterates over all accounts
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }
}
