use super::commission::{CommissionRecord, NewCommission};
use super::payment::{PaymentId, PaymentRecord, VendorId};
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

pub type PaymentStoreBox = Box<dyn PaymentStore>;
pub type VendorStoreBox = Box<dyn VendorStore>;
pub type CommissionStoreBox = Box<dyn CommissionStore>;
pub type RateResolverBox = Box<dyn RateResolver>;

/// Read access to payment records owned by the external payments subsystem.
///
/// `store` exists so harnesses can seed the records the core reads; the core
/// itself never writes through this port.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn store(&self, payment: PaymentRecord) -> Result<()>;
    async fn get(&self, payment_id: PaymentId) -> Result<Option<PaymentRecord>>;
}

/// Read access to vendor profiles.
#[async_trait]
pub trait VendorStore: Send + Sync {
    /// Returns the vendor's configured commission rate, or `None` when the
    /// vendor is unknown or has no rate set.
    async fn commission_rate(&self, vendor: VendorId) -> Result<Option<Decimal>>;
}

/// Outcome of an atomic create-if-absent on the commission store.
#[derive(Debug, PartialEq, Clone)]
pub enum CreateOutcome {
    Created(CommissionRecord),
    /// A commission for the same payment already existed; carries the
    /// existing record, not the rejected one.
    Conflict(CommissionRecord),
}

/// The commission table. Written only by the reconciliation service.
#[async_trait]
pub trait CommissionStore: Send + Sync {
    /// Creates the commission unless one already exists for the same
    /// payment. Check and insert are atomic: under concurrent calls for the
    /// same payment exactly one caller observes `Created`.
    async fn create_if_absent(&self, commission: NewCommission) -> Result<CreateOutcome>;
    async fn get_by_payment(&self, payment_id: PaymentId) -> Result<Option<CommissionRecord>>;
    async fn all(&self) -> Result<Vec<CommissionRecord>>;
}

/// Pluggable commission-rate policy.
#[async_trait]
pub trait RateResolver: Send + Sync {
    /// Resolves the rate (percent) to apply for `vendor`. `None` means no
    /// rate could be determined; the caller decides how to fail.
    async fn resolve(&self, vendor: VendorId) -> Result<Option<Decimal>>;
}
