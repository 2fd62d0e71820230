//! Domain entities, value types and the ports the core depends on.

pub mod commission;
pub mod payment;
pub mod ports;
