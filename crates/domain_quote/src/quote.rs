//! Quotes and saved quotes
//!
//! A `Quote` is the immutable result of one calculation over a form
//! snapshot. A `SavedQuote` is the entry appended to a user's history when
//! they choose to keep a quote.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Money, QuoteId, UserId, ValidPeriod};

use crate::breakdown::PremiumBreakdown;
use crate::form::FormData;

/// Number of days a computed quote remains valid
pub const QUOTE_VALIDITY_DAYS: i64 = 30;

/// Immutable record of one premium calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub form_data_snapshot: FormData,
    /// Whole-Kwacha premium
    pub premium_amount: u64,
    pub computed_at: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub breakdown: PremiumBreakdown,
}

impl Quote {
    /// Captures a calculation result
    pub fn new(form: FormData, breakdown: PremiumBreakdown, computed_at: DateTime<Utc>) -> Self {
        Self {
            form_data_snapshot: form,
            premium_amount: breakdown.premium_amount(),
            computed_at,
            valid_until: computed_at + Duration::days(QUOTE_VALIDITY_DAYS),
            breakdown,
        }
    }

    /// The premium as a Kwacha amount
    pub fn premium(&self) -> Money {
        self.breakdown.total_money()
    }

    /// The window in which the quote may be accepted
    pub fn validity(&self) -> ValidPeriod {
        ValidPeriod {
            start: self.computed_at,
            end: self.valid_until,
        }
    }

    /// Checks whether the quote is still valid at the given instant
    pub fn is_valid_at(&self, instant: DateTime<Utc>) -> bool {
        self.validity().contains(instant)
    }
}

/// Lifecycle of a saved quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Draft,
    #[default]
    Saved,
    Submitted,
}

/// An entry in a user's saved quote history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedQuote {
    pub id: QuoteId,
    pub user_id: UserId,
    pub form_data: FormData,
    /// Whole-Kwacha premium at the time of saving
    pub quote: u64,
    pub timestamp: DateTime<Utc>,
    pub status: QuoteStatus,
}

impl SavedQuote {
    /// Creates a history entry from a computed quote
    pub fn from_quote(user_id: UserId, quote: &Quote, status: QuoteStatus) -> Self {
        Self {
            id: QuoteId::new(),
            user_id,
            form_data: quote.form_data_snapshot.clone(),
            quote: quote.premium_amount,
            timestamp: quote.computed_at,
            status,
        }
    }
}
