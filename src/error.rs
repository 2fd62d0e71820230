use crate::domain::payment::PaymentId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Failures surfaced by the reconciliation core.
///
/// "Already reconciled" is deliberately not represented here: finding an
/// existing commission is a normal control-flow outcome, reported through
/// `ReconcileOutcome`, never as an error.
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("unknown payment: {0}")]
    UnknownPayment(PaymentId),
    #[error("no resolvable commission rate for payment {payment}: {reason}")]
    RateResolution { payment: PaymentId, reason: String },
    #[error("invalid commission computation for payment {payment}: {reason}")]
    InvalidComputation { payment: PaymentId, reason: String },
    #[error("failed to persist commission for payment {payment}: {reason}")]
    Persistence { payment: PaymentId, reason: String },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal error: {0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for ReconcileError {
    fn from(e: rocksdb::Error) -> Self {
        Self::Internal(Box::new(e))
    }
}
