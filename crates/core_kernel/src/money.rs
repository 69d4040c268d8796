//! Money types with precise decimal arithmetic
//!
//! Premiums are quoted in Zambian Kwacha. `Money` wraps a `rust_decimal`
//! amount so that rounding and display never go through floating point.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Zambian Kwacha
    #[default]
    ZMW,
}

impl Currency {
    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::ZMW => "K",
        }
    }
}

/// A monetary amount with associated currency
///
/// Amounts are stored with 4 decimal places so that intermediate factor
/// products keep their precision until the final rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a Kwacha amount
    pub fn kwacha(amount: Decimal) -> Self {
        Self {
            amount: amount.round_dp(4),
            currency: Currency::ZMW,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Rounds to the nearest whole currency unit, halves away from zero
    pub fn round_whole(&self) -> Self {
        Self {
            amount: self
                .amount
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
            currency: self.currency,
        }
    }

    /// Formats the amount rounded to whole units with thousands separators,
    /// e.g. `K1,463`
    pub fn display_whole(&self) -> String {
        let rounded = self.round_whole().amount;
        let digits = rounded.abs().trunc().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
        format!("{}{}{}", sign, self.currency.symbol(), grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_kwacha_keeps_four_decimal_places() {
        let m = Money::kwacha(dec!(100.123456789));
        assert_eq!(m.amount(), dec!(100.1235));
        assert_eq!(m.currency(), Currency::ZMW);
    }

    #[test]
    fn test_round_whole_half_away_from_zero() {
        assert_eq!(Money::kwacha(dec!(1462.5)).round_whole().amount(), dec!(1463));
        assert_eq!(Money::kwacha(dec!(1462.49)).round_whole().amount(), dec!(1462));
        assert_eq!(Money::kwacha(dec!(-2.5)).round_whole().amount(), dec!(-3));
    }

    #[test]
    fn test_display_whole_groups_thousands() {
        assert_eq!(Money::kwacha(dec!(1463)).display_whole(), "K1,463");
        assert_eq!(Money::kwacha(dec!(350)).display_whole(), "K350");
        assert_eq!(Money::kwacha(dec!(1234567.4)).display_whole(), "K1,234,567");
        assert_eq!(Money::kwacha(dec!(0)).display_whole(), "K0");
    }
}
