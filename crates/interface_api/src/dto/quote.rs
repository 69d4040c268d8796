//! Estimate and quote DTOs

use serde::{Deserialize, Serialize};

use domain_quote::{PremiumBreakdown, Quote, QuoteStatus};

/// Live estimate of the current form
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    pub premium_amount: u64,
    /// e.g. `K1,463`
    pub formatted: String,
    pub breakdown: PremiumBreakdown,
}

impl From<PremiumBreakdown> for EstimateResponse {
    fn from(breakdown: PremiumBreakdown) -> Self {
        Self {
            premium_amount: breakdown.premium_amount(),
            formatted: breakdown.total_money().display_whole(),
            breakdown,
        }
    }
}

/// A computed quote with its validity window
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub quote: Quote,
    pub formatted: String,
}

impl From<Quote> for QuoteResponse {
    fn from(quote: Quote) -> Self {
        Self {
            formatted: quote.premium().display_whole(),
            quote,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SaveQuoteRequest {
    #[serde(default)]
    pub status: QuoteStatus,
}
