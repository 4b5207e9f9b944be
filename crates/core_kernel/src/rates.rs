//! Exchange rate ports and base-currency conversion
//!
//! The ledger stores a base-converted amount next to every original amount,
//! so conversion must be deterministic: the same (currency, date) pair always
//! yields the same rate, and rounding policy is pinned here rather than left
//! to callers.

use crate::money::{Currency, Money};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while resolving or applying exchange rates
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateError {
    /// No rate is published for the currency at or before the date
    #[error("No {currency} rate available on or before {date}")]
    Unavailable { currency: Currency, date: NaiveDate },

    /// The source produced a rate that cannot price anything
    #[error("Invalid {currency} rate {rate} on {date}")]
    InvalidRate {
        currency: Currency,
        date: NaiveDate,
        rate: Decimal,
    },

    /// The converted amount does not fit in 64-bit minor units
    #[error("Conversion overflow for {currency} on {date}")]
    Overflow { currency: Currency, date: NaiveDate },
}

impl RateError {
    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, RateError::Unavailable { .. })
    }
}

/// Port for resolving exchange rates against the base currency
///
/// A rate is the multiplier from one unit of `currency` to units of the base
/// currency. Implementations must be deterministic per (currency, date) pair;
/// retrying a failed lookup with the same arguments must not change an
/// already-posted ledger.
pub trait ExchangeRateSource: Send + Sync {
    /// Resolves the rate for one unit of `currency` in base units on `date`
    ///
    /// # Errors
    ///
    /// Returns [`RateError::Unavailable`] when no rate is published at or
    /// before `date`.
    fn rate(&self, currency: Currency, date: NaiveDate) -> Result<Decimal, RateError>;
}

/// Converts monetary amounts into a fixed base currency
///
/// Amounts already in the base currency pass through untouched, without
/// consulting the rate source. Everything else is priced at the source's
/// rate for the transaction date and rounded to the base currency's minor
/// unit with banker's rounding (round half to even).
#[derive(Clone)]
pub struct CurrencyConverter {
    base: Currency,
    source: Arc<dyn ExchangeRateSource>,
}

impl CurrencyConverter {
    /// Creates a converter targeting `base`, resolving rates through `source`
    pub fn new(base: Currency, source: Arc<dyn ExchangeRateSource>) -> Self {
        Self { base, source }
    }

    /// Returns the base currency
    pub fn base(&self) -> Currency {
        self.base
    }

    /// Converts `amount` into the base currency at the rate for `date`
    ///
    /// # Errors
    ///
    /// Returns [`RateError::Unavailable`] if the source has no applicable
    /// rate, [`RateError::InvalidRate`] if the source publishes a
    /// non-positive rate, and [`RateError::Overflow`] if the result does not
    /// fit in 64-bit minor units.
    pub fn convert(&self, amount: Money, date: NaiveDate) -> Result<Money, RateError> {
        if amount.currency() == self.base {
            return Ok(amount);
        }

        let currency = amount.currency();
        let rate = self.source.rate(currency, date)?;
        if rate <= Decimal::ZERO {
            return Err(RateError::InvalidRate {
                currency,
                date,
                rate,
            });
        }

        let base_major = amount
            .to_decimal()
            .checked_mul(rate)
            .ok_or(RateError::Overflow { currency, date })?;
        let base_minor = base_major
            .checked_mul(Decimal::from(self.base.minor_per_major()))
            .ok_or(RateError::Overflow { currency, date })?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
            .to_i64()
            .ok_or(RateError::Overflow { currency, date })?;

        Ok(Money::from_minor(base_minor, self.base))
    }
}

impl std::fmt::Debug for CurrencyConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrencyConverter")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

/// In-memory rate source over a fixed snapshot of published rates
///
/// Lookup returns the most recent rate dated at or before the requested
/// date, mirroring how rate feeds publish discrete fixings that stay
/// effective until superseded.
#[derive(Debug, Clone, Default)]
pub struct FixedRateSource {
    rates: BTreeMap<(Currency, NaiveDate), Decimal>,
}

impl FixedRateSource {
    /// Creates an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rate fixing, builder style
    pub fn with_rate(mut self, currency: Currency, date: NaiveDate, rate: Decimal) -> Self {
        self.insert(currency, date, rate);
        self
    }

    /// Adds or replaces the fixing for (currency, date)
    pub fn insert(&mut self, currency: Currency, date: NaiveDate, rate: Decimal) {
        self.rates.insert((currency, date), rate);
    }
}

impl ExchangeRateSource for FixedRateSource {
    fn rate(&self, currency: Currency, date: NaiveDate) -> Result<Decimal, RateError> {
        self.rates
            .range((currency, NaiveDate::MIN)..=(currency, date))
            .next_back()
            .map(|(_, rate)| *rate)
            .ok_or(RateError::Unavailable { currency, date })
    }
}
