use crate::domain::payment::{Currency, PaymentId, VendorId};
use crate::error::{ReconcileError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Commission identifier, assigned by the commission store on creation.
pub type CommissionId = u64;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum CommissionType {
    Sale,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum CommissionStatus {
    PendingPayout,
    PaidOut,
}

/// The vendor's earned commission derived from exactly one payment.
///
/// At most one of these exists per payment; the reconciliation service is the
/// only writer. Later status changes (payout) belong to downstream tooling.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CommissionRecord {
    pub id: CommissionId,
    pub payment: PaymentId,
    pub vendor: VendorId,
    pub r#type: CommissionType,
    /// Applied rate, as a percentage.
    pub rate: Decimal,
    /// Commission owed, in the payment's currency.
    pub amount: Decimal,
    pub status: CommissionStatus,
}

/// A commission as computed but not yet persisted; the store assigns the id.
#[derive(Debug, PartialEq, Clone)]
pub struct NewCommission {
    pub payment: PaymentId,
    pub vendor: VendorId,
    pub r#type: CommissionType,
    pub rate: Decimal,
    pub amount: Decimal,
    pub status: CommissionStatus,
}

impl NewCommission {
    /// Builds a sale commission for a paid payment.
    ///
    /// `amount = gross × rate / 100`, rounded to the currency's minor units.
    /// A negative or overflowing result is rejected rather than clamped.
    pub fn sale(
        payment: PaymentId,
        vendor: VendorId,
        gross: Decimal,
        currency: Currency,
        rate: Decimal,
    ) -> Result<Self> {
        let amount = commission_amount(payment, gross, currency, rate)?;
        Ok(Self {
            payment,
            vendor,
            r#type: CommissionType::Sale,
            rate,
            amount,
            status: CommissionStatus::PendingPayout,
        })
    }

    pub fn with_id(self, id: CommissionId) -> CommissionRecord {
        CommissionRecord {
            id,
            payment: self.payment,
            vendor: self.vendor,
            r#type: self.r#type,
            rate: self.rate,
            amount: self.amount,
            status: self.status,
        }
    }
}

/// Computes the commission owed on `gross` at `rate` percent.
pub fn commission_amount(
    payment: PaymentId,
    gross: Decimal,
    currency: Currency,
    rate: Decimal,
) -> Result<Decimal> {
    let raw = gross
        .checked_mul(rate)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(|| ReconcileError::InvalidComputation {
            payment,
            reason: format!("overflow computing {gross} x {rate}%"),
        })?;

    let mut amount = raw.round_dp_with_strategy(
        currency.minor_units(),
        RoundingStrategy::MidpointAwayFromZero,
    );
    // Pin the scale so 30 and 30.00 EUR are the same stored value.
    amount.rescale(currency.minor_units());

    if amount < Decimal::ZERO {
        return Err(ReconcileError::InvalidComputation {
            payment,
            reason: format!("negative commission amount {amount}"),
        });
    }

    Ok(amount)
}
