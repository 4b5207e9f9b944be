//! Comprehensive tests for domain_ledger

use chrono::NaiveDate;
use std::collections::HashSet;
use uuid::Uuid;

use core_kernel::{
    AccountingParty, BillId, Currency, DocumentId, Money, PaymentId, TenantId,
};

use domain_ledger::account::AccountKey;
use domain_ledger::document::{DocumentReference, DocumentType, NewDocument};
use domain_ledger::error::LedgerError;
use domain_ledger::ledger::{Ledger, TransactionState};
use domain_ledger::transaction::{Entry, EntryValue, Transaction};

fn usd(minor: i64) -> Money {
    Money::from_minor(minor, Currency::USD)
}

fn value(minor: i64) -> EntryValue {
    EntryValue::new(usd(minor), usd(minor))
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

fn payable() -> AccountKey {
    AccountKey::new("Accounts Payable")
}

fn purchases() -> AccountKey {
    AccountKey::new("Purchases")
}

fn cash() -> AccountKey {
    AccountKey::new("Cash")
}

fn party() -> AccountingParty {
    AccountingParty::from_uuid(Uuid::new_v4())
}

fn setup_ledger() -> Ledger {
    Ledger::new(TenantId::new(), Currency::USD)
}

fn bill_draft(reference: DocumentReference, p: AccountingParty) -> NewDocument {
    NewDocument::new(DocumentId::new_v7(), DocumentType::Invoice, reference, p, date(10))
}

fn payment_draft(reference: DocumentReference, p: AccountingParty) -> NewDocument {
    NewDocument::new(DocumentId::new_v7(), DocumentType::Payment, reference, p, date(20))
}

/// Credits AP and debits Purchases for `minor`, both tagged with the bill.
fn bill_transaction(doc: &NewDocument, minor: i64) -> Transaction {
    Transaction::new(
        "Vendor bill",
        doc.date,
        Currency::USD,
        vec![
            Entry::credit(payable(), value(minor), doc.party).for_document(doc.id),
            Entry::debit(purchases(), value(minor), doc.party).for_document(doc.id),
        ],
    )
    .unwrap()
}

/// Debits AP against `bill` and credits Cash for `minor`.
fn payment_transaction(doc: &NewDocument, bill: DocumentId, minor: i64) -> Transaction {
    Transaction::new(
        "Vendor payment",
        doc.date,
        Currency::USD,
        vec![
            Entry::debit(payable(), value(minor), doc.party).for_document(bill),
            Entry::credit(cash(), value(minor), doc.party),
        ],
    )
    .unwrap()
}

// ============================================================================
// Chart of Accounts Tests
// ============================================================================

mod chart_tests {
    use super::*;
    use domain_ledger::account::AccountType;

    #[test]
    fn test_chart_grows_through_ledger_handle() {
        let mut ledger = setup_ledger();
        ledger
            .chart_mut()
            .find_or_create(payable(), AccountType::Liability, Currency::USD);
        ledger
            .chart_mut()
            .find_or_create(payable(), AccountType::Liability, Currency::USD);

        assert_eq!(ledger.chart().len(), 1);
        let account = ledger.chart().get(&payable()).unwrap();
        assert_eq!(account.account_type, AccountType::Liability);
    }
}

// ============================================================================
// Document Identity Tests
// ============================================================================

mod document_identity_tests {
    use super::*;

    #[test]
    fn test_sync_registers_document() {
        let mut ledger = setup_ledger();
        let reference = DocumentReference::from(BillId::new());
        let doc = bill_draft(reference, party());
        let txn = bill_transaction(&doc, 10000);

        let id = ledger.sync_document(doc, vec![txn]).unwrap();

        assert_eq!(ledger.registry().get_id(DocumentType::Invoice, reference), Some(id));
        let registered = ledger.registry().get(id).unwrap();
        assert!(!registered.voided);
        assert_eq!(registered.doc_type, DocumentType::Invoice);
    }

    #[test]
    fn test_document_id_for_resolves_existing_identity() {
        let mut ledger = setup_ledger();
        let reference = DocumentReference::from(BillId::new());
        let p = party();
        let doc = bill_draft(reference, p);
        let id = doc.id;
        let txn = bill_transaction(&doc, 10000);
        ledger.sync_document(doc, vec![txn]).unwrap();

        let probe = bill_draft(reference, p);
        assert_eq!(ledger.document_id_for(&probe), Some(id));

        let other = bill_draft(DocumentReference::from(BillId::new()), p);
        assert_eq!(ledger.document_id_for(&other), None);
    }

    #[test]
    fn test_conflicting_id_for_same_key_is_rejected() {
        let mut ledger = setup_ledger();
        let reference = DocumentReference::from(BillId::new());
        let doc = bill_draft(reference, party());
        let registered = doc.id;
        let txn = bill_transaction(&doc, 10000);
        ledger.sync_document(doc, vec![txn]).unwrap();

        let imposter = bill_draft(reference, party());
        let presented = imposter.id;
        let txn = bill_transaction(&imposter, 10000);
        let err = ledger.sync_document(imposter, vec![txn]).unwrap_err();

        match err {
            LedgerError::DocumentIdConflict {
                registered: r,
                presented: p,
                ..
            } => {
                assert_eq!(r, registered);
                assert_eq!(p, presented);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_same_reference_across_types_is_two_documents() {
        let mut ledger = setup_ledger();
        let shared = Uuid::new_v4();
        let reference = DocumentReference::from_uuid(shared);
        let p = party();

        let invoice = bill_draft(reference, p);
        let invoice_txn = bill_transaction(&invoice, 10000);
        let invoice_id = ledger.sync_document(invoice, vec![invoice_txn]).unwrap();

        let payment = payment_draft(reference, p);
        let payment_txn = payment_transaction(&payment, invoice_id, 4000);
        let payment_id = ledger.sync_document(payment, vec![payment_txn]).unwrap();

        assert_ne!(invoice_id, payment_id);
        assert_eq!(ledger.registry().len(), 2);
    }
}

// ============================================================================
// Posting and Replace Tests
// ============================================================================

mod poster_tests {
    use super::*;

    #[test]
    fn test_failed_sync_leaves_ledger_untouched() {
        let mut ledger = setup_ledger();
        let p = party();
        let doc = bill_draft(DocumentReference::from(BillId::new()), p);
        let good = bill_transaction(&doc, 10000);
        let bad = Transaction::new(
            "Dangling application",
            date(10),
            Currency::USD,
            vec![
                Entry::debit(payable(), value(100), p).for_document(DocumentId::new()),
                Entry::credit(cash(), value(100), p),
            ],
        )
        .unwrap();

        let result = ledger.sync_document(doc, vec![good, bad]);

        assert!(matches!(result, Err(LedgerError::UnknownDocument(_))));
        assert!(ledger.journal().is_empty());
        assert!(ledger.registry().is_empty());
    }

    #[test]
    fn test_base_currency_is_enforced_at_sync() {
        let mut ledger = setup_ledger();
        let p = party();
        let doc = bill_draft(DocumentReference::from(BillId::new()), p);
        let eur = EntryValue::new(
            Money::from_minor(10000, Currency::EUR),
            Money::from_minor(10000, Currency::EUR),
        );
        let txn = Transaction::new(
            "Wrong base",
            date(10),
            Currency::EUR,
            vec![
                Entry::credit(payable(), eur, p).for_document(doc.id),
                Entry::debit(purchases(), eur, p).for_document(doc.id),
            ],
        )
        .unwrap();

        let result = ledger.sync_document(doc, vec![txn]);
        assert!(matches!(result, Err(LedgerError::Money(_))));
    }

    #[test]
    fn test_resync_replaces_postings_atomically() {
        let mut ledger = setup_ledger();
        let p = party();
        let doc = bill_draft(DocumentReference::from(BillId::new()), p);
        let id = doc.id;
        let first = bill_transaction(&doc, 10000);
        ledger.sync_document(doc.clone(), vec![first]).unwrap();

        let second = bill_transaction(&doc, 12500);
        ledger.sync_document(doc, vec![second]).unwrap();

        assert_eq!(ledger.journal().len(), 2);
        let active: Vec<_> = ledger
            .journal()
            .iter()
            .filter(|r| r.state() == TransactionState::Active)
            .collect();
        assert_eq!(active.len(), 1);

        let balance = ledger.reporting().document_balance(id, &payable());
        assert_eq!(balance, usd(-12500));
    }

    #[test]
    fn test_resync_is_idempotent_for_balances() {
        let mut ledger = setup_ledger();
        let doc = bill_draft(DocumentReference::from(BillId::new()), party());
        let id = doc.id;
        for _ in 0..3 {
            let txn = bill_transaction(&doc, 10000);
            ledger.sync_document(doc.clone(), vec![txn]).unwrap();
        }

        assert_eq!(ledger.reporting().document_balance(id, &payable()), usd(-10000));
        assert_eq!(ledger.reporting().document_balance(id, &purchases()), usd(10000));
    }

    #[test]
    fn test_multiple_transactions_per_sync() {
        let mut ledger = setup_ledger();
        let doc = bill_draft(DocumentReference::from(BillId::new()), party());
        let id = doc.id;
        let first = bill_transaction(&doc, 4000);
        let second = bill_transaction(&doc, 6000);

        ledger.sync_document(doc, vec![first, second]).unwrap();

        assert_eq!(ledger.reporting().document_balance(id, &payable()), usd(-10000));
    }
}

// ============================================================================
// Void Engine Tests
// ============================================================================

mod void_tests {
    use super::*;

    #[test]
    fn test_void_by_key_flags_document() {
        let mut ledger = setup_ledger();
        let reference = DocumentReference::from(BillId::new());
        let doc = bill_draft(reference, party());
        let id = doc.id;
        let txn = bill_transaction(&doc, 10000);
        ledger.sync_document(doc, vec![txn]).unwrap();

        assert!(ledger.void_by_key(DocumentType::Invoice, reference));
        assert!(ledger.registry().is_voided(id));

        // Unknown key and repeated void are no-ops.
        assert!(!ledger.void_by_key(DocumentType::Invoice, reference));
        assert!(!ledger.void_by_key(DocumentType::Payment, reference));
    }

    #[test]
    fn test_resync_after_void_revives_document() {
        let mut ledger = setup_ledger();
        let doc = bill_draft(DocumentReference::from(BillId::new()), party());
        let id = doc.id;
        let txn = bill_transaction(&doc, 10000);
        ledger.sync_document(doc.clone(), vec![txn]).unwrap();
        ledger.void_document(id);
        assert_eq!(ledger.reporting().document_balance(id, &payable()), usd(0));

        let txn = bill_transaction(&doc, 10000);
        ledger.sync_document(doc, vec![txn]).unwrap();

        assert!(!ledger.registry().is_voided(id));
        assert_eq!(ledger.reporting().document_balance(id, &payable()), usd(-10000));
    }

    #[test]
    fn test_void_remaining_sweeps_only_missing_documents() {
        let mut ledger = setup_ledger();
        let p = party();
        let kept_ref = DocumentReference::from(BillId::new());
        let stale_a = DocumentReference::from(BillId::new());
        let stale_b = DocumentReference::from(BillId::new());

        let mut ids = Vec::new();
        for reference in [kept_ref, stale_a, stale_b] {
            let doc = bill_draft(reference, p);
            ids.push(doc.id);
            let txn = bill_transaction(&doc, 5000);
            ledger.sync_document(doc, vec![txn]).unwrap();
        }

        let live: HashSet<DocumentReference> = [kept_ref].into_iter().collect();
        let voided = ledger.void_remaining(DocumentType::Invoice, &live);

        assert_eq!(voided, vec![ids[1], ids[2]]);
        assert!(!ledger.registry().is_voided(ids[0]));
        assert!(ledger.registry().is_voided(ids[1]));
        assert!(ledger.registry().is_voided(ids[2]));

        // The sweep converges: a second pass has nothing left to void.
        assert!(ledger.void_remaining(DocumentType::Invoice, &live).is_empty());
    }

    #[test]
    fn test_void_remaining_ignores_other_types() {
        let mut ledger = setup_ledger();
        let p = party();
        let bill = bill_draft(DocumentReference::from(BillId::new()), p);
        let bill_id = bill.id;
        let bill_txn = bill_transaction(&bill, 10000);
        ledger.sync_document(bill, vec![bill_txn]).unwrap();

        let payment = payment_draft(DocumentReference::from(PaymentId::new()), p);
        let payment_id = payment.id;
        let payment_txn = payment_transaction(&payment, bill_id, 4000);
        ledger.sync_document(payment, vec![payment_txn]).unwrap();

        let voided = ledger.void_remaining(DocumentType::Invoice, &HashSet::new());

        assert_eq!(voided, vec![bill_id]);
        assert!(!ledger.registry().is_voided(payment_id));
    }
}

// ============================================================================
// Reporting Tests
// ============================================================================

mod reporting_tests {
    use super::*;

    /// Posts a 100.00 bill and a 60.00 payment applied against it.
    fn bill_and_payment(ledger: &mut Ledger, p: AccountingParty) -> (DocumentId, DocumentId) {
        let bill = bill_draft(DocumentReference::from(BillId::new()), p);
        let bill_id = bill.id;
        let bill_txn = bill_transaction(&bill, 10000);
        ledger.sync_document(bill, vec![bill_txn]).unwrap();

        let payment = payment_draft(DocumentReference::from(PaymentId::new()), p);
        let payment_id = payment.id;
        let payment_txn = payment_transaction(&payment, bill_id, 6000);
        ledger.sync_document(payment, vec![payment_txn]).unwrap();

        (bill_id, payment_id)
    }

    #[test]
    fn test_document_balance_nets_applications() {
        let mut ledger = setup_ledger();
        let (bill_id, _) = bill_and_payment(&mut ledger, party());

        // Credit 100.00 against debit 60.00, debit-positive convention.
        assert_eq!(ledger.reporting().document_balance(bill_id, &payable()), usd(-4000));
        assert_eq!(ledger.reporting().document_balance(bill_id, &cash()), usd(0));
    }

    #[test]
    fn test_document_balance_unknown_document_is_zero() {
        let ledger = setup_ledger();
        let balance = ledger.reporting().document_balance(DocumentId::new(), &payable());
        assert_eq!(balance, usd(0));
    }

    #[test]
    fn test_voided_document_balances_to_zero() {
        let mut ledger = setup_ledger();
        let (bill_id, _) = bill_and_payment(&mut ledger, party());

        ledger.void_document(bill_id);

        // The payment's application entry still exists but the voided bill
        // reports zero everywhere.
        assert_eq!(ledger.reporting().document_balance(bill_id, &payable()), usd(0));
    }

    #[test]
    fn test_voiding_payment_restores_bill_balance() {
        let mut ledger = setup_ledger();
        let (bill_id, payment_id) = bill_and_payment(&mut ledger, party());
        assert_eq!(ledger.reporting().document_balance(bill_id, &payable()), usd(-4000));

        ledger.void_document(payment_id);

        assert_eq!(ledger.reporting().document_balance(bill_id, &payable()), usd(-10000));
    }

    #[test]
    fn test_activity_includes_voided_history() {
        let mut ledger = setup_ledger();
        let (bill_id, payment_id) = bill_and_payment(&mut ledger, party());

        ledger.void_document(payment_id);

        let rows = ledger.reporting().document_activity(bill_id, &payable());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].document_type, DocumentType::Invoice);
        assert_eq!(rows[0].amount, usd(-10000));
        assert_eq!(rows[1].document_type, DocumentType::Payment);
        assert_eq!(rows[1].amount, usd(6000));
        assert_eq!(rows[1].date, date(20));
    }

    #[test]
    fn test_activity_hides_superseded_postings() {
        let mut ledger = setup_ledger();
        let doc = bill_draft(DocumentReference::from(BillId::new()), party());
        let id = doc.id;
        let first = bill_transaction(&doc, 10000);
        ledger.sync_document(doc.clone(), vec![first]).unwrap();
        let second = bill_transaction(&doc, 12000);
        ledger.sync_document(doc, vec![second]).unwrap();

        let rows = ledger.reporting().document_activity(id, &payable());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, usd(-12000));
    }

    #[test]
    fn test_activity_reports_original_currency() {
        let mut ledger = setup_ledger();
        let p = party();
        let doc = bill_draft(DocumentReference::from(BillId::new()), p);
        let id = doc.id;
        let eur_value = EntryValue::new(Money::from_minor(9000, Currency::EUR), usd(10000));
        let txn = Transaction::new(
            "Converted bill",
            doc.date,
            Currency::EUR,
            vec![
                Entry::credit(payable(), eur_value, p).for_document(id),
                Entry::debit(purchases(), eur_value, p).for_document(id),
            ],
        )
        .unwrap();
        ledger.sync_document(doc, vec![txn]).unwrap();

        let rows = ledger.reporting().document_activity(id, &payable());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, Money::from_minor(-9000, Currency::EUR));
        assert_eq!(rows[0].currency, Currency::EUR);

        // Balance still reads in base currency.
        assert_eq!(ledger.reporting().document_balance(id, &payable()), usd(-10000));
    }

    #[test]
    fn test_party_balance_spans_documents() {
        let mut ledger = setup_ledger();
        let p = party();
        bill_and_payment(&mut ledger, p);

        assert_eq!(ledger.reporting().party_balance(p, &payable()), usd(-4000));
    }

    #[test]
    fn test_party_balance_excludes_entries_against_voided_documents() {
        let mut ledger = setup_ledger();
        let p = party();
        let (bill_id, _) = bill_and_payment(&mut ledger, p);

        ledger.void_document(bill_id);

        // The bill's own postings are voided and the payment's application
        // entry references a voided document, so nothing is owed.
        assert_eq!(ledger.reporting().party_balance(p, &payable()), usd(0));
    }

    #[test]
    fn test_party_balance_is_scoped_to_party() {
        let mut ledger = setup_ledger();
        let alice = party();
        let bob = party();
        bill_and_payment(&mut ledger, alice);

        assert_eq!(ledger.reporting().party_balance(bob, &payable()), usd(0));
    }
}

// ============================================================================
// Serialization Tests
// ============================================================================

mod serialization_tests {
    use super::*;

    #[test]
    fn test_activity_row_json_roundtrip() {
        let mut ledger = setup_ledger();
        let doc = bill_draft(DocumentReference::from(BillId::new()), party());
        let id = doc.id;
        let txn = bill_transaction(&doc, 10000);
        ledger.sync_document(doc, vec![txn]).unwrap();

        let rows = ledger.reporting().document_activity(id, &payable());
        let json = serde_json::to_string(&rows).unwrap();
        let back: Vec<domain_ledger::ActivityRow> = serde_json::from_str(&json).unwrap();
        assert_eq!(rows, back);
    }

    #[test]
    fn test_document_type_names_are_stable() {
        assert_eq!(DocumentType::Invoice.to_string(), "invoice");
        assert_eq!(DocumentType::CreditNote.to_string(), "credit_note");
        assert_eq!(DocumentType::Payment.to_string(), "payment");
        assert_eq!(DocumentType::Adjustment.to_string(), "adjustment");
    }
}
