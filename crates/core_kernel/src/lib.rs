//! Core Kernel - Foundational types and utilities for the payables system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money as exact integer minor units with currency-aware arithmetic
//! - Exchange rate ports and deterministic base-currency conversion
//! - Common identifiers and value objects

pub mod identifiers;
pub mod money;
pub mod rates;

pub use identifiers::{
    AccountingParty, AdjustmentId, BillId, DocumentId, EntryId, PaymentId, TenantId,
    TransactionId, VendorCreditId, VendorId,
};
pub use money::{Currency, Money, MoneyError};
pub use rates::{CurrencyConverter, ExchangeRateSource, FixedRateSource, RateError};
