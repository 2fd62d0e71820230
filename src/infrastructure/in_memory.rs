use crate::domain::commission::{CommissionRecord, NewCommission};
use crate::domain::payment::{PaymentId, PaymentRecord, VendorId};
use crate::domain::ports::{CommissionStore, CreateOutcome, PaymentStore, VendorStore};
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory mirror of the payments table.
///
/// Uses `Arc<RwLock<HashMap>>` for shared concurrent access. Stands in for
/// the external payments subsystem in tests and the CLI harness.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<HashMap<PaymentId, PaymentRecord>>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a payment record directly, bypassing the port.
    pub async fn seed(&self, payment: PaymentRecord) {
        let mut payments = self.payments.write().await;
        payments.insert(payment.id, payment);
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn store(&self, payment: PaymentRecord) -> Result<()> {
        let mut payments = self.payments.write().await;
        payments.insert(payment.id, payment);
        Ok(())
    }

    async fn get(&self, payment_id: PaymentId) -> Result<Option<PaymentRecord>> {
        let payments = self.payments.read().await;
        Ok(payments.get(&payment_id).cloned())
    }
}

/// In-memory vendor profiles: just the commission rate per vendor.
#[derive(Default, Clone)]
pub struct InMemoryVendorStore {
    rates: Arc<RwLock<HashMap<VendorId, Decimal>>>,
}

impl InMemoryVendorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_rate(&self, vendor: VendorId, rate: Decimal) {
        let mut rates = self.rates.write().await;
        rates.insert(vendor, rate);
    }
}

#[async_trait]
impl VendorStore for InMemoryVendorStore {
    async fn commission_rate(&self, vendor: VendorId) -> Result<Option<Decimal>> {
        let rates = self.rates.read().await;
        Ok(rates.get(&vendor).copied())
    }
}

/// A thread-safe in-memory commission store keyed by payment id.
///
/// The map key doubles as the uniqueness constraint: `create_if_absent`
/// checks and inserts under a single write-lock acquisition, so concurrent
/// creators for the same payment serialize and exactly one wins.
#[derive(Default, Clone)]
pub struct InMemoryCommissionStore {
    commissions: Arc<RwLock<HashMap<PaymentId, CommissionRecord>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryCommissionStore {
    pub fn new() -> Self {
        Self {
            commissions: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

#[async_trait]
impl CommissionStore for InMemoryCommissionStore {
    async fn create_if_absent(&self, commission: NewCommission) -> Result<CreateOutcome> {
        let mut commissions = self.commissions.write().await;
        if let Some(existing) = commissions.get(&commission.payment) {
            return Ok(CreateOutcome::Conflict(existing.clone()));
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let record = commission.with_id(id);
        commissions.insert(record.payment, record.clone());
        Ok(CreateOutcome::Created(record))
    }

    async fn get_by_payment(&self, payment_id: PaymentId) -> Result<Option<CommissionRecord>> {
        let commissions = self.commissions.read().await;
        Ok(commissions.get(&payment_id).cloned())
    }

    async fn all(&self) -> Result<Vec<CommissionRecord>> {
        let commissions = self.commissions.read().await;
        let mut all: Vec<CommissionRecord> = commissions.values().cloned().collect();
        all.sort_by_key(|c| c.id);
        Ok(all)
    }
}
