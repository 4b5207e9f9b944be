//! Test Data Builders
//!
//! Provides builder patterns for constructing payables records with sensible
//! defaults. Tests specify only the fields they care about and take defaults
//! for everything else.

use std::sync::Arc;

use chrono::NaiveDate;

use core_kernel::{
    AdjustmentId, BillId, Currency, ExchangeRateSource, Money, PaymentId, TenantId,
    VendorCreditId, VendorId,
};
use domain_payables::{
    AccountsPayableLedger, Bill, PaymentItem, VendorAdjustment, VendorCredit, VendorPayment,
};

use crate::fixtures::{IdFixtures, MoneyFixtures, RateFixtures, TemporalFixtures};

/// Builder for constructing test bills
pub struct TestBillBuilder {
    id: BillId,
    vendor_id: VendorId,
    date: NaiveDate,
    due_date: Option<NaiveDate>,
    number: Option<String>,
    total: Money,
    voided: bool,
}

impl Default for TestBillBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBillBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            id: BillId::new(),
            vendor_id: IdFixtures::vendor_id(),
            date: TemporalFixtures::bill_date(),
            due_date: None,
            number: None,
            total: MoneyFixtures::usd_100(),
            voided: false,
        }
    }

    /// Sets the bill ID
    pub fn with_id(mut self, id: BillId) -> Self {
        self.id = id;
        self
    }

    /// Sets the vendor
    pub fn for_vendor(mut self, vendor_id: VendorId) -> Self {
        self.vendor_id = vendor_id;
        self
    }

    /// Sets the bill date
    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Sets the due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the display number
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    /// Sets the total
    pub fn with_total(mut self, total: Money) -> Self {
        self.total = total;
        self
    }

    /// Marks the bill voided
    pub fn voided(mut self) -> Self {
        self.voided = true;
        self
    }

    /// Builds the bill
    pub fn build(self) -> Bill {
        let mut bill = Bill::new(self.id, self.vendor_id, self.date, self.total);
        bill.due_date = self.due_date;
        bill.number = self.number;
        bill.voided = self.voided;
        bill
    }
}

/// Builder for constructing test vendor credits
pub struct TestVendorCreditBuilder {
    id: VendorCreditId,
    vendor_id: VendorId,
    date: NaiveDate,
    number: Option<String>,
    total: Money,
    voided: bool,
}

impl Default for TestVendorCreditBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestVendorCreditBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            id: VendorCreditId::new(),
            vendor_id: IdFixtures::vendor_id(),
            date: TemporalFixtures::credit_date(),
            number: None,
            total: MoneyFixtures::usd_25(),
            voided: false,
        }
    }

    /// Sets the credit ID
    pub fn with_id(mut self, id: VendorCreditId) -> Self {
        self.id = id;
        self
    }

    /// Sets the vendor
    pub fn for_vendor(mut self, vendor_id: VendorId) -> Self {
        self.vendor_id = vendor_id;
        self
    }

    /// Sets the credit date
    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Sets the display number
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    /// Sets the total
    pub fn with_total(mut self, total: Money) -> Self {
        self.total = total;
        self
    }

    /// Marks the credit voided
    pub fn voided(mut self) -> Self {
        self.voided = true;
        self
    }

    /// Builds the vendor credit
    pub fn build(self) -> VendorCredit {
        let mut credit = VendorCredit::new(self.id, self.vendor_id, self.date, self.total);
        credit.number = self.number;
        credit.voided = self.voided;
        credit
    }
}

/// Builder for constructing test payments
pub struct TestPaymentBuilder {
    id: PaymentId,
    vendor_id: VendorId,
    date: NaiveDate,
    reference: Option<String>,
    amount: Money,
    items: Vec<PaymentItem>,
    voided: bool,
}

impl Default for TestPaymentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPaymentBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            id: PaymentId::new(),
            vendor_id: IdFixtures::vendor_id(),
            date: TemporalFixtures::payment_date(),
            reference: None,
            amount: MoneyFixtures::usd_100(),
            items: Vec::new(),
            voided: false,
        }
    }

    /// Sets the payment ID
    pub fn with_id(mut self, id: PaymentId) -> Self {
        self.id = id;
        self
    }

    /// Sets the vendor
    pub fn for_vendor(mut self, vendor_id: VendorId) -> Self {
        self.vendor_id = vendor_id;
        self
    }

    /// Sets the payment date
    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Sets the external reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Sets the amount paid
    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = amount;
        self
    }

    /// Adds a bill application line item
    pub fn applying_bill(mut self, bill_id: BillId, amount: Money) -> Self {
        self.items.push(PaymentItem::bill(bill_id, amount));
        self
    }

    /// Adds a credit application line item
    pub fn applying_credit(mut self, credit_id: VendorCreditId, amount: Money) -> Self {
        self.items.push(PaymentItem::credit(credit_id, amount));
        self
    }

    /// Adds a convenience fee line item
    pub fn with_fee(mut self, amount: Money) -> Self {
        self.items.push(PaymentItem::fee(amount));
        self
    }

    /// Marks the payment voided
    pub fn voided(mut self) -> Self {
        self.voided = true;
        self
    }

    /// Builds the payment
    pub fn build(self) -> VendorPayment {
        let mut payment = VendorPayment::new(self.id, self.vendor_id, self.date, self.amount);
        payment.reference = self.reference;
        payment.items = self.items;
        payment.voided = self.voided;
        payment
    }
}

/// Builder for constructing test adjustments
pub struct TestAdjustmentBuilder {
    id: AdjustmentId,
    vendor_id: VendorId,
    date: NaiveDate,
    amount: Money,
    bill_id: Option<BillId>,
    vendor_credit_id: Option<VendorCreditId>,
    voided: bool,
}

impl Default for TestAdjustmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAdjustmentBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            id: AdjustmentId::new(),
            vendor_id: IdFixtures::vendor_id(),
            date: TemporalFixtures::adjustment_date(),
            amount: MoneyFixtures::usd_25(),
            bill_id: None,
            vendor_credit_id: None,
            voided: false,
        }
    }

    /// Sets the adjustment ID
    pub fn with_id(mut self, id: AdjustmentId) -> Self {
        self.id = id;
        self
    }

    /// Sets the vendor
    pub fn for_vendor(mut self, vendor_id: VendorId) -> Self {
        self.vendor_id = vendor_id;
        self
    }

    /// Sets the adjustment date
    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Sets the signed amount
    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = amount;
        self
    }

    /// Pins the adjustment to a bill
    pub fn against_bill(mut self, bill_id: BillId) -> Self {
        self.bill_id = Some(bill_id);
        self
    }

    /// Pins the adjustment to a vendor credit
    pub fn against_credit(mut self, credit_id: VendorCreditId) -> Self {
        self.vendor_credit_id = Some(credit_id);
        self
    }

    /// Marks the adjustment voided
    pub fn voided(mut self) -> Self {
        self.voided = true;
        self
    }

    /// Builds the adjustment
    pub fn build(self) -> VendorAdjustment {
        let mut adjustment =
            VendorAdjustment::new(self.id, self.vendor_id, self.date, self.amount);
        adjustment.bill_id = self.bill_id;
        adjustment.vendor_credit_id = self.vendor_credit_id;
        adjustment.voided = self.voided;
        adjustment
    }
}

/// Builder for constructing a ledger ready to post into
pub struct TestLedgerBuilder {
    tenant: TenantId,
    base_currency: Currency,
    rates: Arc<dyn ExchangeRateSource>,
}

impl Default for TestLedgerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestLedgerBuilder {
    /// Creates a new builder with the standard test rates and a USD base
    pub fn new() -> Self {
        Self {
            tenant: IdFixtures::tenant_id(),
            base_currency: Currency::USD,
            rates: RateFixtures::standard_source(),
        }
    }

    /// Sets the tenant
    pub fn for_tenant(mut self, tenant: TenantId) -> Self {
        self.tenant = tenant;
        self
    }

    /// Sets the base currency
    pub fn with_base_currency(mut self, currency: Currency) -> Self {
        self.base_currency = currency;
        self
    }

    /// Sets the rate source
    pub fn with_rates(mut self, rates: Arc<dyn ExchangeRateSource>) -> Self {
        self.rates = rates;
        self
    }

    /// Builds the ledger
    pub fn build(self) -> AccountsPayableLedger {
        AccountsPayableLedger::new(self.tenant, self.base_currency, self.rates)
    }
}
