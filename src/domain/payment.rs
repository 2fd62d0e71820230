use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment identifier, assigned by the external payments subsystem.
pub type PaymentId = u64;
/// Vendor identifier (the professional entitled to commission).
pub type VendorId = u64;

/// Lifecycle status of a payment. Only the transition *into* `Paid` is
/// meaningful to this core.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// Settlement currency of a payment.
///
/// Commission amounts are rounded to the currency's minor-unit precision.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Eur,
    Usd,
    Gbp,
    Jpy,
}

impl Currency {
    /// Number of minor-unit decimal places for the currency.
    pub fn minor_units(&self) -> u32 {
        match self {
            Currency::Eur | Currency::Usd | Currency::Gbp => 2,
            Currency::Jpy => 0,
        }
    }
}

/// A payment as persisted by the external payments subsystem.
///
/// The reconciliation core only ever reads these; it never creates, mutates
/// or deletes them.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentRecord {
    pub id: PaymentId,
    /// The earning party. Payments without a vendor (e.g. platform fees)
    /// never produce a commission.
    pub vendor: Option<VendorId>,
    pub amount: Decimal,
    pub currency: Currency,
    pub status: PaymentStatus,
}
