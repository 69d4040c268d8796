//! Temporal helpers
//!
//! This module provides:
//! - A serializable timezone wrapper used to derive calendar years in the
//!   market's local time (Central Africa Time by default)
//! - Validity periods for issued quotes
//! - Conversion between `DateTime<Utc>` and epoch milliseconds, the format
//!   used by the durable loyalty timestamp
//! - A clock abstraction so services can be driven by a fixed time in tests

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use std::str::FromStr;
use std::sync::Mutex;

/// Timezone wrapper for the quoting market
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Central Africa Time, the market default
    pub fn lusaka() -> Self {
        Self(chrono_tz::Africa::Lusaka)
    }

    /// Calendar year of the given instant in this timezone
    pub fn year_of(&self, utc: DateTime<Utc>) -> i32 {
        utc.with_timezone(&self.0).year()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self::lusaka()
    }
}

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Timestamp out of range: {0}")]
    OutOfRange(i64),
}

/// A validity window, e.g. how long a computed quote may be accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidPeriod {
    /// Start of the valid period (inclusive)
    pub start: DateTime<Utc>,
    /// End of the valid period (exclusive)
    pub end: DateTime<Utc>,
}

impl ValidPeriod {
    /// Checks if a timestamp falls within this period
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp < self.end
    }
}

/// Converts epoch milliseconds into a UTC timestamp
pub fn from_epoch_millis(millis: i64) -> Result<DateTime<Utc>, TemporalError> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or(TemporalError::OutOfRange(millis))
}

/// Converts a UTC timestamp into epoch milliseconds
pub fn to_epoch_millis(timestamp: DateTime<Utc>) -> i64 {
    timestamp.timestamp_millis()
}

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A manually driven clock
#[derive(Debug)]
pub struct FixedClock {
    instant: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Mutex::new(instant),
        }
    }

    /// Moves the clock to the given instant
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.instant.lock().unwrap_or_else(|e| e.into_inner()) = instant;
    }

    /// Moves the clock forward
    pub fn advance(&self, by: Duration) {
        let mut guard = self.instant.lock().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.instant.lock().unwrap_or_else(|e| e.into_inner())
    }
}
