//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::{Duration, NaiveDate};
use core_kernel::{BillId, Currency, Money, VendorCreditId, VendorId};
use proptest::prelude::*;

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::JPY),
        Just(Currency::CHF),
        Just(Currency::INR),
        Just(Currency::AUD),
        Just(Currency::CAD),
        Just(Currency::SGD),
        Just(Currency::HKD),
    ]
}

/// Strategy for generating positive amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for generating signed amounts in minor units
pub fn amount_minor_strategy() -> impl Strategy<Value = i64> {
    -1_000_000_000i64..1_000_000_000i64
}

/// Strategy for generating Money values with positive amounts
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    (positive_amount_minor_strategy(), currency_strategy())
        .prop_map(|(amount, currency)| Money::from_minor(amount, currency))
}

/// Strategy for generating Money values (can be negative)
pub fn money_strategy() -> impl Strategy<Value = Money> {
    (amount_minor_strategy(), currency_strategy())
        .prop_map(|(amount, currency)| Money::from_minor(amount, currency))
}

/// Strategy for generating positive USD Money values
pub fn usd_money_strategy() -> impl Strategy<Value = Money> {
    positive_amount_minor_strategy().prop_map(|amount| Money::from_minor(amount, Currency::USD))
}

/// Strategy for generating dates within 2024
pub fn date_2024_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..365i64).prop_map(|days| {
        NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date") + Duration::days(days)
    })
}

/// Strategy for generating VendorId values
pub fn vendor_id_strategy() -> impl Strategy<Value = VendorId> {
    any::<[u8; 16]>().prop_map(|bytes| VendorId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Strategy for generating BillId values
pub fn bill_id_strategy() -> impl Strategy<Value = BillId> {
    any::<[u8; 16]>().prop_map(|bytes| BillId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Strategy for generating VendorCreditId values
pub fn vendor_credit_id_strategy() -> impl Strategy<Value = VendorCreditId> {
    any::<[u8; 16]>().prop_map(|bytes| VendorCreditId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Strategy for generating bill display numbers
pub fn bill_number_strategy() -> impl Strategy<Value = String> {
    (1000u32..9999u32).prop_map(|n| format!("INV-{}", n))
}

/// Strategy for generating payment application splits
///
/// Produces a list of 1 to 4 positive minor-unit amounts that a payment
/// applies against individual bills, plus an unapplied remainder. The
/// payment amount is the sum of the parts and the remainder, so allocations
/// generated from it always settle exactly.
pub fn application_split_strategy() -> impl Strategy<Value = (Vec<i64>, i64)> {
    (
        proptest::collection::vec(1i64..=1_000_000i64, 1..=4),
        0i64..=1_000_000i64,
    )
}
