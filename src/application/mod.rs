//! Application layer containing the core business logic orchestration.
//!
//! `PaymentObserver` watches payment persistence events for the
//! pending-to-paid transition and hands matching payments to the
//! `ReconciliationService`, which owns the at-most-one-commission guarantee.

pub mod dispatcher;
pub mod reconciler;
