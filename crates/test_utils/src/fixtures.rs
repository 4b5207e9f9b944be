//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the payables test suite. These
//! fixtures are designed to be consistent and predictable across tests.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use uuid::Uuid;

use core_kernel::{
    AdjustmentId, BillId, Currency, ExchangeRateSource, FixedRateSource, Money, PaymentId,
    TenantId, VendorCreditId, VendorId,
};

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Creates a standard USD amount for testing
    pub fn usd_100() -> Money {
        Money::from_minor(10_000, Currency::USD)
    }

    /// Creates a smaller USD amount for partial applications
    pub fn usd_25() -> Money {
        Money::from_minor(2_500, Currency::USD)
    }

    /// Creates a zero amount
    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }

    /// Creates a EUR amount for conversion tests
    pub fn eur_100() -> Money {
        Money::from_minor(10_000, Currency::EUR)
    }

    /// Creates a JPY amount (zero decimal places)
    pub fn jpy_10000() -> Money {
        Money::from_minor(10_000, Currency::JPY)
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Date all standard exchange rates are pinned to (Jan 1, 2024)
    pub fn rate_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    /// Standard bill date (Mar 1, 2024)
    pub fn bill_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    /// Standard vendor credit date (Mar 5, 2024)
    pub fn credit_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    /// Standard payment date (Mar 20, 2024)
    pub fn payment_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    /// Standard adjustment date (Mar 25, 2024)
    pub fn adjustment_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 25).unwrap()
    }

    /// Standard due date, a month after the bill (Mar 31, 2024)
    pub fn due_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    }
}

/// Fixture for exchange rate test data
pub struct RateFixtures;

impl RateFixtures {
    /// A rate source with the standard test rates, all pinned at
    /// [`TemporalFixtures::rate_date`] so any later fixing date sees them
    pub fn standard() -> FixedRateSource {
        let date = TemporalFixtures::rate_date();
        FixedRateSource::new()
            .with_rate(Currency::EUR, date, dec!(1.10))
            .with_rate(Currency::GBP, date, dec!(1.27))
            .with_rate(Currency::JPY, date, dec!(0.0067))
    }

    /// The standard rates as a shareable source
    pub fn standard_source() -> Arc<dyn ExchangeRateSource> {
        Arc::new(Self::standard())
    }

    /// A source with no rates at all, enough for single-currency ledgers
    pub fn empty_source() -> Arc<dyn ExchangeRateSource> {
        Arc::new(FixedRateSource::new())
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// Creates a deterministic tenant ID for testing
    pub fn tenant_id() -> TenantId {
        TenantId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap())
    }

    /// Creates a deterministic vendor ID for testing
    pub fn vendor_id() -> VendorId {
        VendorId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap())
    }

    /// Creates a deterministic bill ID for testing
    pub fn bill_id() -> BillId {
        BillId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").unwrap())
    }

    /// Creates a deterministic vendor credit ID for testing
    pub fn vendor_credit_id() -> VendorCreditId {
        VendorCreditId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440004").unwrap())
    }

    /// Creates a deterministic payment ID for testing
    pub fn payment_id() -> PaymentId {
        PaymentId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440005").unwrap())
    }

    /// Creates a deterministic adjustment ID for testing
    pub fn adjustment_id() -> AdjustmentId {
        AdjustmentId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440006").unwrap())
    }
}
