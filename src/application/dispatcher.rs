use crate::application::reconciler::{ReconcileOutcome, ReconciliationService};
use crate::domain::payment::{PaymentRecord, PaymentStatus};
use crate::error::{ReconcileError, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Which persistence operation produced a [`SaveEvent`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SaveKind {
    Created,
    Updated,
}

/// A payment persistence event, delivered synchronously after the write.
///
/// `previous_status` is the status the record had before this save, so the
/// observer can tell a genuine transition from a re-save of an already-paid
/// record.
#[derive(Debug, Clone)]
pub struct SaveEvent {
    pub kind: SaveKind,
    pub payment: PaymentRecord,
    pub previous_status: Option<PaymentStatus>,
}

impl SaveEvent {
    /// The dirty-transition predicate: this save changed `status` and the
    /// new value is `paid`.
    pub fn became_paid(&self) -> bool {
        self.payment.status == PaymentStatus::Paid
            && self.previous_status != Some(PaymentStatus::Paid)
    }
}

/// Watches payment saves and dispatches paid transitions to reconciliation.
///
/// Failures are logged and returned to the caller; they never propagate as
/// panics and never roll back the payment write that triggered them.
pub struct PaymentObserver {
    reconciler: Arc<ReconciliationService>,
    verbose: bool,
}

impl PaymentObserver {
    /// `verbose` gates the informational log detail; warnings and errors are
    /// always emitted.
    pub fn new(reconciler: Arc<ReconciliationService>, verbose: bool) -> Self {
        Self {
            reconciler,
            verbose,
        }
    }

    /// Handles one persistence event. Returns `None` when the event did not
    /// warrant reconciliation, `Some(result)` otherwise.
    ///
    /// Known gap: only `Updated` events are wired. A payment created
    /// directly in the paid state would not be reconciled here; in this
    /// marketplace payments are always created pending and confirmed by a
    /// later gateway webhook, so the creation path is intentionally inert.
    pub async fn on_saved(&self, event: SaveEvent) -> Option<Result<ReconcileOutcome>> {
        if event.kind != SaveKind::Updated || !event.became_paid() {
            return None;
        }

        let payment_id = event.payment.id;
        let vendor = event.payment.vendor;
        if self.verbose {
            info!(payment = payment_id, ?vendor, "payment became paid");
        }

        let result = self.reconciler.reconcile(payment_id).await;
        match &result {
            Ok(ReconcileOutcome::Created(commission)) => {
                if self.verbose {
                    info!(
                        payment = payment_id,
                        ?vendor,
                        commission = commission.id,
                        commission_type = ?commission.r#type,
                        status = ?commission.status,
                        "commission created"
                    );
                }
            }
            Ok(ReconcileOutcome::AlreadyReconciled(commission)) => {
                // Expected on webhook redelivery; informational only.
                if self.verbose {
                    info!(
                        payment = payment_id,
                        ?vendor,
                        commission = commission.id,
                        "commission already existing"
                    );
                }
            }
            Err(e @ ReconcileError::Persistence { .. }) => {
                error!(payment = payment_id, ?vendor, %e, "commission creation failed");
            }
            Err(e) => {
                warn!(payment = payment_id, ?vendor, %e, "commission creation failed");
            }
        }

        Some(result)
    }
}
