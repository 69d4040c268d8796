//! Core Kernel - Foundational types for the motor quotation system
//!
//! This crate provides the building blocks shared by the quotation crates:
//! - Money in Kwacha with whole-unit rounding and display
//! - Timezone-aware calendar helpers and validity periods
//! - Strongly-typed identifiers for quotes and users
//! - Port error type and marker traits for storage adapters

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Money, Currency};
pub use temporal::{
    ValidPeriod, Timezone, TemporalError, Clock, SystemClock, FixedClock,
    from_epoch_millis, to_epoch_millis,
};
pub use identifiers::{QuoteId, UserId};
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
pub use error::CoreError;
