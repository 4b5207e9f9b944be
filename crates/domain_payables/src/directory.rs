//! Ledger directory
//!
//! Single point of access for per-tenant ledgers. Tenants are fully
//! independent, so the directory hands out one shared handle per tenant
//! and callers serialize within a tenant by locking that handle. Different
//! tenants can post in parallel.
//!
//! # Usage
//!
//! ```rust,ignore
//! let directory = LedgerDirectory::new(rates);
//!
//! let handle = directory.get_or_create(tenant, Currency::USD);
//! let mut ledger = handle.lock().expect("ledger lock poisoned");
//! ledger.sync_bill(&bill)?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

use tracing::debug;

use core_kernel::{Currency, ExchangeRateSource, TenantId};

use crate::ledger::AccountsPayableLedger;

/// Shared handle to one tenant's ledger
pub type LedgerHandle = Arc<Mutex<AccountsPayableLedger>>;

/// Registry of per-tenant ledgers, safe to share across threads
pub struct LedgerDirectory {
    rates: Arc<dyn ExchangeRateSource>,
    ledgers: RwLock<HashMap<TenantId, LedgerHandle>>,
}

impl LedgerDirectory {
    /// Creates an empty directory; every ledger it creates converts
    /// through the given rate source
    pub fn new(rates: Arc<dyn ExchangeRateSource>) -> Self {
        Self {
            rates,
            ledgers: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the tenant's ledger, creating it on first access.
    ///
    /// The base currency only applies to that first access; later calls
    /// return the existing ledger regardless of the currency passed.
    pub fn get_or_create(&self, tenant: TenantId, base_currency: Currency) -> LedgerHandle {
        if let Some(handle) = self.get(tenant) {
            return handle;
        }
        let mut ledgers = self.ledgers.write().expect("ledger directory lock poisoned");
        ledgers
            .entry(tenant)
            .or_insert_with(|| {
                debug!(tenant = %tenant, currency = %base_currency, "Creating tenant ledger");
                Arc::new(Mutex::new(AccountsPayableLedger::new(
                    tenant,
                    base_currency,
                    Arc::clone(&self.rates),
                )))
            })
            .clone()
    }

    /// Returns the tenant's ledger if one exists
    pub fn get(&self, tenant: TenantId) -> Option<LedgerHandle> {
        self.ledgers
            .read()
            .expect("ledger directory lock poisoned")
            .get(&tenant)
            .cloned()
    }

    /// All known tenants, in stable order
    pub fn tenants(&self) -> Vec<TenantId> {
        let mut tenants: Vec<TenantId> = self
            .ledgers
            .read()
            .expect("ledger directory lock poisoned")
            .keys()
            .copied()
            .collect();
        tenants.sort();
        tenants
    }

    /// Number of ledgers created so far
    pub fn len(&self) -> usize {
        self.ledgers
            .read()
            .expect("ledger directory lock poisoned")
            .len()
    }

    /// Whether no ledger has been created yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for LedgerDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerDirectory")
            .field("ledgers", &self.len())
            .finish_non_exhaustive()
    }
}
