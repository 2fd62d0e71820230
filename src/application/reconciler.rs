use crate::domain::commission::{CommissionRecord, NewCommission};
use crate::domain::payment::{PaymentId, VendorId};
use crate::domain::ports::{
    CommissionStoreBox, CreateOutcome, PaymentStoreBox, RateResolver, RateResolverBox,
    VendorStoreBox,
};
use crate::error::{ReconcileError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Result of a reconciliation attempt that did not fail.
#[derive(Debug, PartialEq, Clone)]
pub enum ReconcileOutcome {
    /// A commission was created by this call.
    Created(CommissionRecord),
    /// A commission for this payment already existed; nothing was written.
    AlreadyReconciled(CommissionRecord),
}

impl ReconcileOutcome {
    pub fn commission(&self) -> &CommissionRecord {
        match self {
            ReconcileOutcome::Created(c) | ReconcileOutcome::AlreadyReconciled(c) => c,
        }
    }
}

/// Resolves rates from the vendor's profile, falling back to a configured
/// system default when the profile has none (or an invalid one).
pub struct ProfileRateResolver {
    vendors: VendorStoreBox,
    default_rate: Option<Decimal>,
}

impl ProfileRateResolver {
    pub fn new(vendors: VendorStoreBox, default_rate: Option<Decimal>) -> Self {
        Self {
            vendors,
            default_rate,
        }
    }
}

#[async_trait]
impl RateResolver for ProfileRateResolver {
    async fn resolve(&self, vendor: VendorId) -> Result<Option<Decimal>> {
        match self.vendors.commission_rate(vendor).await? {
            // A profile rate outside [0, 100] is treated the same as an
            // unset one.
            Some(rate) if rate >= Decimal::ZERO && rate <= Decimal::ONE_HUNDRED => Ok(Some(rate)),
            _ => Ok(self.default_rate),
        }
    }
}

/// Guarantees "at most one commission per payment" and computes the terms.
///
/// Idempotent: re-invoking for an already reconciled payment is a no-op that
/// reports `AlreadyReconciled`. Duplicate prevention under concurrency rests
/// on the store's atomic `create_if_absent`, not on the advisory guard query.
pub struct ReconciliationService {
    payments: PaymentStoreBox,
    commissions: CommissionStoreBox,
    rates: RateResolverBox,
}

impl ReconciliationService {
    pub fn new(
        payments: PaymentStoreBox,
        commissions: CommissionStoreBox,
        rates: RateResolverBox,
    ) -> Self {
        Self {
            payments,
            commissions,
            rates,
        }
    }

    /// Ensures the paid payment has exactly one commission record.
    ///
    /// All-or-nothing: on any failure no record is persisted and the payment
    /// remains eligible for a later attempt.
    pub async fn reconcile(&self, payment_id: PaymentId) -> Result<ReconcileOutcome> {
        // Fresh guard query on every call; never cached.
        if let Some(existing) = self.commissions.get_by_payment(payment_id).await? {
            return Ok(ReconcileOutcome::AlreadyReconciled(existing));
        }

        let payment = self
            .payments
            .get(payment_id)
            .await?
            .ok_or(ReconcileError::UnknownPayment(payment_id))?;

        let vendor = payment
            .vendor
            .ok_or_else(|| ReconcileError::RateResolution {
                payment: payment_id,
                reason: "payment has no vendor".to_string(),
            })?;

        let rate = self.rates.resolve(vendor).await?.ok_or_else(|| {
            ReconcileError::RateResolution {
                payment: payment_id,
                reason: format!("no rate for vendor {vendor} and no default configured"),
            }
        })?;

        let commission =
            NewCommission::sale(payment_id, vendor, payment.amount, payment.currency, rate)?;

        // The store decides the race: a concurrent creator wins and we
        // report the surviving record.
        match self.commissions.create_if_absent(commission).await? {
            CreateOutcome::Created(record) => Ok(ReconcileOutcome::Created(record)),
            CreateOutcome::Conflict(existing) => Ok(ReconcileOutcome::AlreadyReconciled(existing)),
        }
    }

    /// All commission records written so far, for reporting.
    pub async fn commissions(&self) -> Result<Vec<CommissionRecord>> {
        self.commissions.all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commission::CommissionStatus;
    use crate::domain::payment::{Currency, PaymentRecord, PaymentStatus};
    use crate::infrastructure::in_memory::{
        InMemoryCommissionStore, InMemoryPaymentStore, InMemoryVendorStore,
    };
    use rust_decimal_macros::dec;

    async fn service_with(
        payments: Vec<PaymentRecord>,
        rates: Vec<(VendorId, Decimal)>,
        default_rate: Option<Decimal>,
    ) -> ReconciliationService {
        let payment_store = InMemoryPaymentStore::new();
        for p in payments {
            payment_store.seed(p).await;
        }
        let vendor_store = InMemoryVendorStore::new();
        for (vendor, rate) in rates {
            vendor_store.set_rate(vendor, rate).await;
        }
        ReconciliationService::new(
            Box::new(payment_store),
            Box::new(InMemoryCommissionStore::new()),
            Box::new(ProfileRateResolver::new(
                Box::new(vendor_store),
                default_rate,
            )),
        )
    }

    fn paid_payment(id: PaymentId, vendor: Option<VendorId>, amount: Decimal) -> PaymentRecord {
        PaymentRecord {
            id,
            vendor,
            amount,
            currency: Currency::Eur,
            status: PaymentStatus::Paid,
        }
    }

    #[tokio::test]
    async fn test_reconcile_creates_commission() {
        let service = service_with(
            vec![paid_payment(7, Some(3), dec!(200.00))],
            vec![(3, dec!(15))],
            None,
        )
        .await;

        let outcome = service.reconcile(7).await.unwrap();
        let ReconcileOutcome::Created(record) = outcome else {
            panic!("expected Created, got {outcome:?}");
        };
        assert_eq!(record.payment, 7);
        assert_eq!(record.vendor, 3);
        assert_eq!(record.rate, dec!(15));
        assert_eq!(record.amount, dec!(30.00));
        assert_eq!(record.status, CommissionStatus::PendingPayout);
    }

    #[tokio::test]
    async fn test_reconcile_is_idempotent() {
        let service = service_with(
            vec![paid_payment(7, Some(3), dec!(200.00))],
            vec![(3, dec!(15))],
            None,
        )
        .await;

        let first = service.reconcile(7).await.unwrap();
        assert!(matches!(first, ReconcileOutcome::Created(_)));

        let second = service.reconcile(7).await.unwrap();
        let ReconcileOutcome::AlreadyReconciled(existing) = second else {
            panic!("expected AlreadyReconciled");
        };
        assert_eq!(&existing, first.commission());
        assert_eq!(service.commissions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reconcile_missing_rate_fails_without_record() {
        let service = service_with(vec![paid_payment(7, Some(3), dec!(200.00))], vec![], None).await;

        let result = service.reconcile(7).await;
        assert!(matches!(
            result,
            Err(ReconcileError::RateResolution { payment: 7, .. })
        ));
        assert!(service.commissions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_missing_vendor_fails() {
        let service = service_with(vec![paid_payment(7, None, dec!(200.00))], vec![], None).await;

        let result = service.reconcile(7).await;
        assert!(matches!(
            result,
            Err(ReconcileError::RateResolution { payment: 7, .. })
        ));
    }

    #[tokio::test]
    async fn test_reconcile_unknown_payment() {
        let service = service_with(vec![], vec![], None).await;
        let result = service.reconcile(999).await;
        assert!(matches!(result, Err(ReconcileError::UnknownPayment(999))));
    }

    #[tokio::test]
    async fn test_default_rate_fallback() {
        let service = service_with(
            vec![paid_payment(7, Some(3), dec!(100.00))],
            vec![],
            Some(dec!(10)),
        )
        .await;

        let outcome = service.reconcile(7).await.unwrap();
        assert_eq!(outcome.commission().amount, dec!(10.00));
        assert_eq!(outcome.commission().rate, dec!(10));
    }

    #[tokio::test]
    async fn test_invalid_profile_rate_falls_back() {
        let service = service_with(
            vec![paid_payment(7, Some(3), dec!(100.00))],
            vec![(3, dec!(-5))],
            Some(dec!(10)),
        )
        .await;

        let outcome = service.reconcile(7).await.unwrap();
        assert_eq!(outcome.commission().rate, dec!(10));
    }

    #[tokio::test]
    async fn test_negative_amount_rejected() {
        let service = service_with(
            vec![paid_payment(7, Some(3), dec!(-50.00))],
            vec![(3, dec!(15))],
            None,
        )
        .await;

        let result = service.reconcile(7).await;
        assert!(matches!(
            result,
            Err(ReconcileError::InvalidComputation { payment: 7, .. })
        ));
        assert!(service.commissions().await.unwrap().is_empty());
    }
}
