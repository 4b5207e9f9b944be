//! Ledger rebuild
//!
//! Batch job that re-syncs every record the source of record still has and
//! then voids whatever the ledger holds that the source no longer reports.
//! A maintenance tool for repairing drift, not a steady-state path: it runs
//! in bounded batches and carries a resumable checkpoint, so an interrupted
//! run can pick up where it stopped without losing the per-type sweep
//! guarantee.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use core_kernel::{DocumentId, TenantId};
use domain_ledger::{DocumentReference, DocumentType};

use crate::adjustment::VendorAdjustment;
use crate::bill::Bill;
use crate::error::PayablesError;
use crate::ledger::AccountsPayableLedger;
use crate::payment::VendorPayment;
use crate::vendor_credit::VendorCredit;

/// Failure reported by a record source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Record source failure: {0}")]
pub struct SourceError(pub String);

/// Paged access to the source of record.
///
/// Implementations must return records in a stable order so that an
/// interrupted rebuild can resume from a saved offset. Voided records are
/// returned too; routing them to the void path is the rebuild's job.
pub trait RecordSource {
    /// One page of bills
    fn bills(&self, tenant: TenantId, offset: usize, limit: usize)
        -> Result<Vec<Bill>, SourceError>;

    /// One page of vendor credits
    fn vendor_credits(
        &self,
        tenant: TenantId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<VendorCredit>, SourceError>;

    /// One page of payments
    fn payments(
        &self,
        tenant: TenantId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<VendorPayment>, SourceError>;

    /// One page of adjustments
    fn adjustments(
        &self,
        tenant: TenantId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<VendorAdjustment>, SourceError>;
}

/// Record types in rebuild order.
///
/// Bills and credits go first so that payment and adjustment applications
/// resolve against already-registered documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RebuildStage {
    /// Re-sync all bills
    Bills,
    /// Re-sync all vendor credits
    VendorCredits,
    /// Re-sync all payments
    Payments,
    /// Re-sync all adjustments
    Adjustments,
}

impl RebuildStage {
    /// Document type this stage owns and sweeps
    pub fn document_type(&self) -> DocumentType {
        match self {
            RebuildStage::Bills => DocumentType::Invoice,
            RebuildStage::VendorCredits => DocumentType::CreditNote,
            RebuildStage::Payments => DocumentType::Payment,
            RebuildStage::Adjustments => DocumentType::Adjustment,
        }
    }

    /// Stage after this one, `None` after the last
    pub fn next(&self) -> Option<RebuildStage> {
        match self {
            RebuildStage::Bills => Some(RebuildStage::VendorCredits),
            RebuildStage::VendorCredits => Some(RebuildStage::Payments),
            RebuildStage::Payments => Some(RebuildStage::Adjustments),
            RebuildStage::Adjustments => None,
        }
    }
}

/// Where a rebuild stands, serializable so an operator can park and resume
/// a long run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebuildCheckpoint {
    /// Stage being processed
    pub stage: RebuildStage,
    /// Offset of the next unprocessed batch within the stage
    pub offset: usize,
    /// References seen so far in this stage, the live set for its sweep
    pub live: HashSet<DocumentReference>,
}

impl RebuildCheckpoint {
    /// Checkpoint for a fresh run
    pub fn start() -> Self {
        Self {
            stage: RebuildStage::Bills,
            offset: 0,
            live: HashSet::new(),
        }
    }
}

impl Default for RebuildCheckpoint {
    fn default() -> Self {
        Self::start()
    }
}

/// Counts from a completed rebuild
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebuildReport {
    /// Records handed to a sync call
    pub synced: usize,
    /// Documents voided by reconciliation sweeps
    pub voided: usize,
}

/// Why a rebuild halted
#[derive(Debug, Error)]
pub enum RebuildCause {
    /// The source of record failed to produce a page
    #[error(transparent)]
    Source(#[from] SourceError),
    /// A record failed to sync
    #[error(transparent)]
    Payables(#[from] PayablesError),
}

/// A halted rebuild, carrying the checkpoint to resume from.
///
/// The checkpoint points at the start of the batch that failed; re-syncing
/// the records before the failure again is safe because syncs are
/// idempotent.
#[derive(Debug, Error)]
#[error("Rebuild halted during {:?} pass at offset {}: {cause}", .checkpoint.stage, .checkpoint.offset)]
pub struct PopulateError {
    /// Where to resume from
    pub checkpoint: RebuildCheckpoint,
    /// What stopped the run
    #[source]
    pub cause: RebuildCause,
}

impl PopulateError {
    /// Whether resuming from the carried checkpoint can succeed without
    /// operator intervention
    pub fn is_retryable(&self) -> bool {
        match &self.cause {
            RebuildCause::Source(_) => true,
            RebuildCause::Payables(e) => e.is_retryable(),
        }
    }
}

/// Rebuild tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulatorConfig {
    /// Records fetched and synced per batch
    pub batch_size: usize,
}

impl Default for PopulatorConfig {
    fn default() -> Self {
        Self { batch_size: 100 }
    }
}

impl PopulatorConfig {
    /// Sets the batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// Rebuilds a ledger from its source of record
#[derive(Debug, Clone, Default)]
pub struct Populator {
    config: PopulatorConfig,
}

impl Populator {
    /// Creates a populator with the given tuning
    pub fn new(config: PopulatorConfig) -> Self {
        Self { config }
    }

    /// Re-syncs every record and sweeps stale documents, one record type at
    /// a time in [`RebuildStage`] order.
    ///
    /// Each stage's sweep runs only after its full sync pass completes, so
    /// a halt mid-stage never voids documents it has not re-checked. Pass
    /// [`RebuildCheckpoint::start`] for a fresh run or a carried checkpoint
    /// to resume a halted one.
    ///
    /// # Errors
    ///
    /// Returns [`PopulateError`] wrapping the failure and the checkpoint to
    /// resume from.
    pub fn rebuild(
        &self,
        ledger: &mut AccountsPayableLedger,
        source: &dyn RecordSource,
        checkpoint: RebuildCheckpoint,
    ) -> Result<RebuildReport, PopulateError> {
        let tenant = ledger.tenant();
        let mut checkpoint = checkpoint;
        let mut report = RebuildReport::default();
        info!(
            tenant = %tenant,
            stage = ?checkpoint.stage,
            offset = checkpoint.offset,
            "Starting ledger rebuild"
        );

        loop {
            let exhausted = match checkpoint.stage {
                RebuildStage::Bills => self.stage_pass(
                    ledger,
                    &mut checkpoint,
                    &mut report,
                    |offset, limit| source.bills(tenant, offset, limit),
                    |bill: &Bill| bill.id.into(),
                    |ledger, bill| ledger.sync_bill(bill),
                )?,
                RebuildStage::VendorCredits => self.stage_pass(
                    ledger,
                    &mut checkpoint,
                    &mut report,
                    |offset, limit| source.vendor_credits(tenant, offset, limit),
                    |credit: &VendorCredit| credit.id.into(),
                    |ledger, credit| ledger.sync_vendor_credit(credit),
                )?,
                RebuildStage::Payments => self.stage_pass(
                    ledger,
                    &mut checkpoint,
                    &mut report,
                    |offset, limit| source.payments(tenant, offset, limit),
                    |payment: &VendorPayment| payment.id.into(),
                    |ledger, payment| ledger.sync_payment(payment),
                )?,
                RebuildStage::Adjustments => self.stage_pass(
                    ledger,
                    &mut checkpoint,
                    &mut report,
                    |offset, limit| source.adjustments(tenant, offset, limit),
                    |adjustment: &VendorAdjustment| adjustment.id.into(),
                    |ledger, adjustment| ledger.sync_adjustment(adjustment),
                )?,
            };
            if !exhausted {
                continue;
            }

            let swept = ledger.reconcile(checkpoint.stage.document_type(), &checkpoint.live);
            report.voided += swept.len();
            debug!(
                tenant = %tenant,
                stage = ?checkpoint.stage,
                live = checkpoint.live.len(),
                swept = swept.len(),
                "Completed rebuild stage"
            );

            match checkpoint.stage.next() {
                Some(next) => {
                    checkpoint.stage = next;
                    checkpoint.offset = 0;
                    checkpoint.live.clear();
                }
                None => break,
            }
        }

        info!(
            tenant = %tenant,
            synced = report.synced,
            voided = report.voided,
            "Ledger rebuild complete"
        );
        Ok(report)
    }

    /// Fetches and syncs one batch of the current stage. Returns `true`
    /// when the stage is exhausted; an empty batch always exhausts it. The
    /// checkpoint's offset only advances after the whole batch has synced.
    fn stage_pass<R>(
        &self,
        ledger: &mut AccountsPayableLedger,
        checkpoint: &mut RebuildCheckpoint,
        report: &mut RebuildReport,
        fetch: impl Fn(usize, usize) -> Result<Vec<R>, SourceError>,
        reference: impl Fn(&R) -> DocumentReference,
        mut sync: impl FnMut(
            &mut AccountsPayableLedger,
            &R,
        ) -> Result<Option<DocumentId>, PayablesError>,
    ) -> Result<bool, PopulateError> {
        let batch = fetch(checkpoint.offset, self.config.batch_size).map_err(|e| PopulateError {
            checkpoint: checkpoint.clone(),
            cause: e.into(),
        })?;

        for record in &batch {
            // voided records are still live, the sweep must not touch them
            checkpoint.live.insert(reference(record));
            sync(ledger, record).map_err(|e| PopulateError {
                checkpoint: checkpoint.clone(),
                cause: e.into(),
            })?;
            report.synced += 1;
        }

        checkpoint.offset += batch.len();
        Ok(batch.is_empty() || batch.len() < self.config.batch_size)
    }
}
