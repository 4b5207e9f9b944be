//! Accounts payable ledger
//!
//! The orchestrator that turns source records into double-entry postings.
//! Each `sync_*` method translates one record into a document plus balanced
//! transactions and hands them to the underlying ledger; voided records are
//! routed to the void path instead. Balance and activity queries come back
//! sign-normalized so that "what we owe" reads positive.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use core_kernel::{
    AccountingParty, Currency, CurrencyConverter, DocumentId, ExchangeRateSource, Money, TenantId,
    VendorId,
};
use domain_ledger::{
    AccountKey, AccountType, ActivityRow, DocumentReference, DocumentType, Entry, EntryValue,
    Ledger, NewDocument, Transaction,
};

use crate::adjustment::VendorAdjustment;
use crate::allocator::{allocate, AllocatorAccounts};
use crate::bill::Bill;
use crate::error::PayablesError;
use crate::payment::VendorPayment;
use crate::vendor_credit::VendorCredit;

/// The fixed chart of accounts the payables ledger posts against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayableAccount {
    /// Liability owed to vendors
    AccountsPayable,
    /// Expense side of vendor bills
    Purchases,
    /// Cash paid out to vendors
    Cash,
    /// Fees charged on top of payments
    ConvenienceFees,
}

impl PayableAccount {
    /// Account name, also the chart key
    pub fn name(&self) -> &'static str {
        match self {
            PayableAccount::AccountsPayable => "Accounts Payable",
            PayableAccount::Purchases => "Purchases",
            PayableAccount::Cash => "Cash",
            PayableAccount::ConvenienceFees => "Convenience Fees",
        }
    }

    /// Chart key for this account
    pub fn key(&self) -> AccountKey {
        AccountKey::new(self.name())
    }

    /// Ledger account type, which fixes the normal balance side
    pub fn account_type(&self) -> AccountType {
        match self {
            PayableAccount::AccountsPayable => AccountType::Liability,
            PayableAccount::Purchases => AccountType::Expense,
            PayableAccount::Cash => AccountType::Asset,
            PayableAccount::ConvenienceFees => AccountType::Expense,
        }
    }
}

/// Per-tenant accounts payable ledger
///
/// Wraps a double-entry [`Ledger`] with the posting rules for vendor bills,
/// credits, payments and adjustments. Conversion to the ledger's base
/// currency happens here, once per entry, as of each record's date.
///
/// # Example
///
/// ```rust,ignore
/// let rates = Arc::new(FixedRateSource::new());
/// let mut ledger = AccountsPayableLedger::new(tenant, Currency::USD, rates);
///
/// ledger.sync_bill(&bill)?;
/// let owed = ledger.balance(DocumentType::Invoice, bill.id.into())?;
/// ```
#[derive(Debug)]
pub struct AccountsPayableLedger {
    ledger: Ledger,
    converter: CurrencyConverter,
}

impl AccountsPayableLedger {
    /// Creates an empty ledger for one tenant
    pub fn new(
        tenant: TenantId,
        base_currency: Currency,
        rates: Arc<dyn ExchangeRateSource>,
    ) -> Self {
        Self {
            ledger: Ledger::new(tenant, base_currency),
            converter: CurrencyConverter::new(base_currency, rates),
        }
    }

    /// Tenant this ledger belongs to
    pub fn tenant(&self) -> TenantId {
        self.ledger.tenant()
    }

    /// Base currency every posting is converted into
    pub fn base_currency(&self) -> Currency {
        self.ledger.base_currency()
    }

    /// Read access to the underlying ledger
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Posts a bill: credit Accounts Payable, debit Purchases.
    ///
    /// Re-syncing the same bill replaces its prior postings. A voided bill
    /// is routed to the void path and returns `None`.
    ///
    /// # Errors
    ///
    /// Returns a rate error when the bill's currency cannot be converted as
    /// of its date, or a ledger error when posting is rejected.
    pub fn sync_bill(&mut self, bill: &Bill) -> Result<Option<DocumentId>, PayablesError> {
        let reference = DocumentReference::from(bill.id);
        if bill.voided {
            let voided = self.ledger.void_by_key(DocumentType::Invoice, reference);
            debug!(bill_id = %bill.id, voided, "Voided bill routed to void path");
            return Ok(None);
        }

        let party = AccountingParty::from(bill.vendor_id);
        let mut document = self.document(DocumentType::Invoice, reference, party, bill.date);
        document.due_date = bill.due_date;
        document.number = bill.number.clone();
        let document_id = document.id;

        let value = self.value(bill.total, bill.date)?;
        let payable = self.account(PayableAccount::AccountsPayable);
        let purchases = self.account(PayableAccount::Purchases);
        let description = match &bill.number {
            Some(number) => format!("Vendor bill {number}"),
            None => "Vendor bill".to_string(),
        };
        let transaction = Transaction::new(
            description,
            bill.date,
            bill.total.currency(),
            vec![
                Entry::credit(payable, value, party).for_document(document_id),
                Entry::debit(purchases, value, party).for_document(document_id),
            ],
        )?;

        let id = self.ledger.sync_document(document, vec![transaction])?;
        debug!(tenant = %self.tenant(), bill_id = %bill.id, document = %id, "Synced bill");
        Ok(Some(id))
    }

    /// Posts a vendor credit: debit Accounts Payable, credit Purchases.
    ///
    /// The mirror image of [`sync_bill`](Self::sync_bill), reducing what is
    /// owed to the vendor.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`sync_bill`](Self::sync_bill).
    pub fn sync_vendor_credit(
        &mut self,
        credit: &VendorCredit,
    ) -> Result<Option<DocumentId>, PayablesError> {
        let reference = DocumentReference::from(credit.id);
        if credit.voided {
            let voided = self.ledger.void_by_key(DocumentType::CreditNote, reference);
            debug!(credit_id = %credit.id, voided, "Voided credit routed to void path");
            return Ok(None);
        }

        let party = AccountingParty::from(credit.vendor_id);
        let mut document = self.document(DocumentType::CreditNote, reference, party, credit.date);
        document.number = credit.number.clone();
        let document_id = document.id;

        let value = self.value(credit.total, credit.date)?;
        let payable = self.account(PayableAccount::AccountsPayable);
        let purchases = self.account(PayableAccount::Purchases);
        let description = match &credit.number {
            Some(number) => format!("Vendor credit {number}"),
            None => "Vendor credit".to_string(),
        };
        let transaction = Transaction::new(
            description,
            credit.date,
            credit.total.currency(),
            vec![
                Entry::debit(payable, value, party).for_document(document_id),
                Entry::credit(purchases, value, party).for_document(document_id),
            ],
        )?;

        let id = self.ledger.sync_document(document, vec![transaction])?;
        debug!(tenant = %self.tenant(), credit_id = %credit.id, document = %id, "Synced vendor credit");
        Ok(Some(id))
    }

    /// Posts a payment: the allocator's entries against bills, credits and
    /// fees, plus one cash credit for the full payment amount.
    ///
    /// The cash leg's base amount is the exact sum of the other entries'
    /// base amounts, so per-entry conversion rounding can never unbalance
    /// the transaction.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed payments,
    /// [`PayablesError::OverApplied`] when the items consume more than the
    /// payment amount, or a rate error when conversion fails. The ledger is
    /// left untouched in every error case.
    pub fn sync_payment(
        &mut self,
        payment: &VendorPayment,
    ) -> Result<Option<DocumentId>, PayablesError> {
        let reference = DocumentReference::from(payment.id);
        if payment.voided {
            let voided = self.ledger.void_by_key(DocumentType::Payment, reference);
            debug!(payment_id = %payment.id, voided, "Voided payment routed to void path");
            return Ok(None);
        }
        payment.validate()?;

        let party = AccountingParty::from(payment.vendor_id);
        let mut document = self.document(DocumentType::Payment, reference, party, payment.date);
        document.number = payment.reference.clone();

        let accounts = AllocatorAccounts {
            payable: self.account(PayableAccount::AccountsPayable),
            fee: self.account(PayableAccount::ConvenienceFees),
        };
        let cash = self.account(PayableAccount::Cash);
        let allocation = allocate(payment, self.ledger.registry(), &self.converter, &accounts)?;

        let mut entries = allocation.entries;
        let balancing = entries
            .iter()
            .fold(Money::zero(self.base_currency()), |net, entry| {
                net + entry.amount.signed_base()
            });
        entries.push(Entry::credit(
            cash,
            EntryValue::new(payment.amount, balancing),
            party,
        ));

        let description = match &payment.reference {
            Some(reference) => format!("Vendor payment {reference}"),
            None => "Vendor payment".to_string(),
        };
        let transaction = Transaction::new(
            description,
            payment.date,
            payment.amount.currency(),
            entries,
        )?;

        let id = self.ledger.sync_document(document, vec![transaction])?;
        debug!(
            tenant = %self.tenant(),
            payment_id = %payment.id,
            document = %id,
            remaining = %allocation.remaining,
            "Synced payment"
        );
        Ok(Some(id))
    }

    /// Posts an adjustment: a signed move through Accounts Payable against
    /// Cash, pinned to the referenced bill or vendor credit when one
    /// resolves in the ledger.
    ///
    /// A positive amount reduces the payable the way a payment would; a
    /// negative amount increases it. When neither referenced document
    /// resolves the Accounts Payable leg stays unattached.
    ///
    /// # Errors
    ///
    /// Returns a rate error when conversion fails, or a ledger error when
    /// posting is rejected.
    pub fn sync_adjustment(
        &mut self,
        adjustment: &VendorAdjustment,
    ) -> Result<Option<DocumentId>, PayablesError> {
        let reference = DocumentReference::from(adjustment.id);
        if adjustment.voided {
            let voided = self.ledger.void_by_key(DocumentType::Adjustment, reference);
            debug!(adjustment_id = %adjustment.id, voided, "Voided adjustment routed to void path");
            return Ok(None);
        }

        let party = AccountingParty::from(adjustment.vendor_id);
        let document = self.document(DocumentType::Adjustment, reference, party, adjustment.date);

        let target = adjustment
            .bill_id
            .and_then(|bill| {
                self.ledger
                    .registry()
                    .get_id(DocumentType::Invoice, bill.into())
            })
            .or_else(|| {
                adjustment.vendor_credit_id.and_then(|credit| {
                    self.ledger
                        .registry()
                        .get_id(DocumentType::CreditNote, credit.into())
                })
            });

        let value = self.value(adjustment.amount.abs(), adjustment.date)?;
        let payable = self.account(PayableAccount::AccountsPayable);
        let cash = self.account(PayableAccount::Cash);

        let (payable_entry, cash_entry) = if adjustment.amount.is_negative() {
            (
                Entry::credit(payable, value, party),
                Entry::debit(cash, value, party),
            )
        } else {
            (
                Entry::debit(payable, value, party),
                Entry::credit(cash, value, party),
            )
        };
        let payable_entry = match target {
            Some(document) => payable_entry.for_document(document),
            None => payable_entry,
        };

        let transaction = Transaction::new(
            "Vendor adjustment",
            adjustment.date,
            adjustment.amount.currency(),
            vec![payable_entry, cash_entry],
        )?;

        let id = self.ledger.sync_document(document, vec![transaction])?;
        debug!(
            tenant = %self.tenant(),
            adjustment_id = %adjustment.id,
            document = %id,
            pinned = target.is_some(),
            "Synced adjustment"
        );
        Ok(Some(id))
    }

    /// Voids the document for a source record that disappeared.
    ///
    /// Returns `true` when this call voided it, `false` when the document
    /// was unknown or already voided.
    pub fn void(&mut self, doc_type: DocumentType, reference: DocumentReference) -> bool {
        self.ledger.void_by_key(doc_type, reference)
    }

    /// Voids every document of `doc_type` whose reference is missing from
    /// `live`, returning the voided ids.
    ///
    /// The reconciliation sweep run by the rebuild job after a full re-sync
    /// pass of one record type.
    pub fn reconcile(
        &mut self,
        doc_type: DocumentType,
        live: &HashSet<DocumentReference>,
    ) -> Vec<DocumentId> {
        let voided = self.ledger.void_remaining(doc_type, live);
        if !voided.is_empty() {
            info!(
                tenant = %self.tenant(),
                doc_type = %doc_type,
                count = voided.len(),
                "Reconciliation voided stale documents"
            );
        }
        voided
    }

    /// Outstanding amount for one bill or credit note, in base currency.
    ///
    /// Sign-normalized to "amount owed": an unpaid bill reads positive, a
    /// vendor credit reads negative. Unknown documents read zero.
    ///
    /// # Errors
    ///
    /// Returns [`PayablesError::UnsupportedDocumentType`] for payment or
    /// adjustment documents, which have no outstanding balance of their own.
    pub fn balance(
        &self,
        doc_type: DocumentType,
        reference: DocumentReference,
    ) -> Result<Money, PayablesError> {
        ensure_reportable(doc_type)?;
        let key = PayableAccount::AccountsPayable.key();
        let Some(id) = self.ledger.registry().get_id(doc_type, reference) else {
            return Ok(Money::zero(self.base_currency()));
        };
        let net = self.ledger.reporting().document_balance(id, &key);
        Ok(normalized(PayableAccount::AccountsPayable, net))
    }

    /// Accounts Payable history rows for one bill or credit note, oldest
    /// first, voided history included.
    ///
    /// Amounts are in each posting's original currency, sign-normalized the
    /// same way as [`balance`](Self::balance): the bill itself positive,
    /// payments and credits applied to it negative.
    ///
    /// # Errors
    ///
    /// Returns [`PayablesError::UnsupportedDocumentType`] for payment or
    /// adjustment documents.
    pub fn activity(
        &self,
        doc_type: DocumentType,
        reference: DocumentReference,
    ) -> Result<Vec<ActivityRow>, PayablesError> {
        ensure_reportable(doc_type)?;
        let key = PayableAccount::AccountsPayable.key();
        let Some(id) = self.ledger.registry().get_id(doc_type, reference) else {
            return Ok(Vec::new());
        };
        let mut rows = self.ledger.reporting().document_activity(id, &key);
        if !PayableAccount::AccountsPayable.account_type().is_debit_normal() {
            for row in &mut rows {
                row.amount = -row.amount;
            }
        }
        Ok(rows)
    }

    /// Net amount owed to one vendor across all their documents, in base
    /// currency. Voided documents are excluded.
    pub fn vendor_balance(&self, vendor: VendorId) -> Money {
        let key = PayableAccount::AccountsPayable.key();
        let net = self
            .ledger
            .reporting()
            .party_balance(AccountingParty::from(vendor), &key);
        normalized(PayableAccount::AccountsPayable, net)
    }

    /// Reuses the registered document id for a key, or mints a fresh one.
    /// Keeping the id stable across re-syncs is what lets the poster replace
    /// prior postings instead of conflicting.
    fn document(
        &self,
        doc_type: DocumentType,
        reference: DocumentReference,
        party: AccountingParty,
        date: NaiveDate,
    ) -> NewDocument {
        let id = self
            .ledger
            .registry()
            .get_id(doc_type, reference)
            .unwrap_or_else(DocumentId::new_v7);
        NewDocument::new(id, doc_type, reference, party, date)
    }

    /// Lazily registers the account in the chart and returns its key
    fn account(&mut self, account: PayableAccount) -> AccountKey {
        let key = account.key();
        let currency = self.ledger.base_currency();
        self.ledger
            .chart_mut()
            .find_or_create(key.clone(), account.account_type(), currency);
        key
    }

    fn value(&self, amount: Money, date: NaiveDate) -> Result<EntryValue, PayablesError> {
        let base = self.converter.convert(amount, date)?;
        Ok(EntryValue::new(amount, base))
    }
}

/// Flips net postings so credit-normal accounts read positive when owed
fn normalized(account: PayableAccount, net: Money) -> Money {
    if account.account_type().is_debit_normal() {
        net
    } else {
        -net
    }
}

fn ensure_reportable(doc_type: DocumentType) -> Result<(), PayablesError> {
    match doc_type {
        DocumentType::Invoice | DocumentType::CreditNote => Ok(()),
        other => Err(PayablesError::UnsupportedDocumentType(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{BillId, FixedRateSource, PaymentId, VendorCreditId};

    fn usd(minor: i64) -> Money {
        Money::from_minor(minor, Currency::USD)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn ledger() -> AccountsPayableLedger {
        AccountsPayableLedger::new(TenantId::new(), Currency::USD, Arc::new(FixedRateSource::new()))
    }

    #[test]
    fn test_bill_sync_registers_accounts_and_owes_positive() {
        let mut apl = ledger();
        let bill = Bill::new(BillId::new(), VendorId::new(), date(), usd(10_000));

        let id = apl.sync_bill(&bill).unwrap();

        assert!(id.is_some());
        assert!(apl.ledger().chart().contains(&PayableAccount::AccountsPayable.key()));
        assert!(apl.ledger().chart().contains(&PayableAccount::Purchases.key()));
        let owed = apl.balance(DocumentType::Invoice, bill.id.into()).unwrap();
        assert_eq!(owed, usd(10_000));
    }

    #[test]
    fn test_credit_sync_owes_negative() {
        let mut apl = ledger();
        let credit = VendorCredit::new(VendorCreditId::new(), VendorId::new(), date(), usd(2_500));

        apl.sync_vendor_credit(&credit).unwrap();

        let owed = apl
            .balance(DocumentType::CreditNote, credit.id.into())
            .unwrap();
        assert_eq!(owed, usd(-2_500));
    }

    #[test]
    fn test_resync_keeps_the_document_id() {
        let mut apl = ledger();
        let mut bill = Bill::new(BillId::new(), VendorId::new(), date(), usd(10_000));

        let first = apl.sync_bill(&bill).unwrap();
        bill.total = usd(12_500);
        let second = apl.sync_bill(&bill).unwrap();

        assert_eq!(first, second);
        let owed = apl.balance(DocumentType::Invoice, bill.id.into()).unwrap();
        assert_eq!(owed, usd(12_500));
    }

    #[test]
    fn test_voided_record_routes_to_void() {
        let mut apl = ledger();
        let mut bill = Bill::new(BillId::new(), VendorId::new(), date(), usd(10_000));
        apl.sync_bill(&bill).unwrap();

        bill.void();
        let outcome = apl.sync_bill(&bill).unwrap();

        assert!(outcome.is_none());
        let owed = apl.balance(DocumentType::Invoice, bill.id.into()).unwrap();
        assert!(owed.is_zero());
    }

    #[test]
    fn test_unknown_document_balance_is_zero() {
        let apl = ledger();
        let owed = apl
            .balance(DocumentType::Invoice, BillId::new().into())
            .unwrap();
        assert!(owed.is_zero());
    }

    #[test]
    fn test_payment_documents_are_not_reportable() {
        let apl = ledger();
        let result = apl.balance(DocumentType::Payment, PaymentId::new().into());
        assert!(matches!(
            result,
            Err(PayablesError::UnsupportedDocumentType(DocumentType::Payment))
        ));
    }

    #[test]
    fn test_adjustment_signs_mirror_each_other() {
        let mut apl = ledger();
        let vendor = VendorId::new();
        let bill = Bill::new(BillId::new(), vendor, date(), usd(10_000));
        apl.sync_bill(&bill).unwrap();

        let down = VendorAdjustment::new(
            core_kernel::AdjustmentId::new(),
            vendor,
            date(),
            usd(1_500),
        )
        .with_bill(bill.id);
        apl.sync_adjustment(&down).unwrap();
        assert_eq!(
            apl.balance(DocumentType::Invoice, bill.id.into()).unwrap(),
            usd(8_500)
        );

        let up = VendorAdjustment::new(
            core_kernel::AdjustmentId::new(),
            vendor,
            date(),
            usd(-1_500),
        )
        .with_bill(bill.id);
        apl.sync_adjustment(&up).unwrap();
        assert_eq!(
            apl.balance(DocumentType::Invoice, bill.id.into()).unwrap(),
            usd(10_000)
        );
    }
}
