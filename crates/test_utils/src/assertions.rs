//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_ledger::Ledger;

/// Asserts that two Money values are exactly equal
///
/// # Arguments
///
/// * `actual` - The actual Money value
/// * `expected` - The expected Money value
///
/// # Panics
///
/// Panics if the currencies or the minor-unit amounts differ
pub fn assert_money_eq(actual: &Money, expected: &Money) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    assert_eq!(
        actual.minor_units(),
        expected.minor_units(),
        "Money amounts differ: actual={}, expected={}",
        actual,
        expected
    );
}

/// Asserts that a Money value is positive
pub fn assert_money_positive(money: &Money) {
    assert!(money.is_positive(), "Expected positive money, got {}", money);
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(money.is_zero(), "Expected zero money, got {}", money);
}

/// Asserts that a Money value is negative
pub fn assert_money_negative(money: &Money) {
    assert!(money.is_negative(), "Expected negative money, got {}", money);
}

/// Asserts that every journal record in a ledger balances to zero
///
/// Walks each posted transaction and checks that its entries' signed base
/// amounts net to zero, regardless of whether the record is active or
/// voided.
///
/// # Panics
///
/// Panics if any transaction's entries do not net to zero in base currency
pub fn assert_journal_balanced(ledger: &Ledger) {
    for record in ledger.journal() {
        let transaction = record.transaction();
        let net = transaction
            .entries()
            .iter()
            .fold(Money::zero(ledger.base_currency()), |acc, entry| {
                acc + entry.amount.signed_base()
            });

        assert!(
            net.is_zero(),
            "Transaction {} ({}) nets to {} instead of zero",
            transaction.id(),
            transaction.description(),
            net
        );
    }
}

/// Asserts that a result is Ok and returns the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Asserts that a result is Err and returns the error
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => e,
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => panic!("{}: got Ok({:?})", $msg, value),
            Err(e) => e,
        }
    };
}

/// Asserts that an error matches a specific variant
#[macro_export]
macro_rules! assert_err_variant {
    ($result:expr, $pattern:pat) => {
        match $result {
            Ok(value) => panic!(
                "Expected Err matching {}, got Ok({:?})",
                stringify!($pattern),
                value
            ),
            Err(ref e) => {
                assert!(
                    matches!(e, $pattern),
                    "Error {:?} does not match pattern {}",
                    e,
                    stringify!($pattern)
                );
            }
        }
    };
}
