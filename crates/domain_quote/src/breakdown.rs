//! Itemized premium breakdown
//!
//! Each field has one fixed representation:
//! - additive Kwacha amounts (negative is a discount): base premium, vehicle
//!   age, mileage, driver age, experience, claims or accidents, excess
//! - multiplicative ratios, neutral at 1: usage, coverage
//! - discount fractions in `[0, 1]`, neutral at 0: security, loyalty
//! - `total`: the final whole-Kwacha premium

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use core_kernel::Money;

/// Contributions that recombine to the final premium
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumBreakdown {
    pub base_premium: Decimal,
    pub vehicle_age_factor: Decimal,
    pub mileage_factor: Decimal,
    pub driver_age_factor: Decimal,
    pub experience_factor: Decimal,
    pub claims_or_accidents_factor: Decimal,
    pub usage_factor: Decimal,
    pub coverage_multiplier: Decimal,
    pub excess_adjustment: Decimal,
    pub security_discount: Decimal,
    pub loyalty_discount: Decimal,
    /// Floor applied to the rounded premium
    pub minimum_premium: Decimal,
    pub total: Decimal,
}

impl PremiumBreakdown {
    /// A breakdown in which every component is neutral and the total is the
    /// minimum premium
    pub fn neutral(minimum_premium: Decimal) -> Self {
        let mut breakdown = Self {
            base_premium: Decimal::ZERO,
            vehicle_age_factor: Decimal::ZERO,
            mileage_factor: Decimal::ZERO,
            driver_age_factor: Decimal::ZERO,
            experience_factor: Decimal::ZERO,
            claims_or_accidents_factor: Decimal::ZERO,
            usage_factor: Decimal::ONE,
            coverage_multiplier: Decimal::ONE,
            excess_adjustment: Decimal::ZERO,
            security_discount: Decimal::ZERO,
            loyalty_discount: Decimal::ZERO,
            minimum_premium,
            total: Decimal::ZERO,
        };
        breakdown.total = breakdown.recombine();
        breakdown
    }

    /// Sum of the additive Kwacha components
    pub fn additive(&self) -> Decimal {
        self.base_premium
            + self.vehicle_age_factor
            + self.mileage_factor
            + self.driver_age_factor
            + self.experience_factor
            + self.claims_or_accidents_factor
            + self.excess_adjustment
    }

    /// Combined discount fraction, capped at 1
    pub fn discount_fraction(&self) -> Decimal {
        (self.security_discount + self.loyalty_discount).min(Decimal::ONE)
    }

    /// Premium before rounding and the minimum floor
    pub fn discounted(&self) -> Decimal {
        self.additive() * self.usage_factor * self.coverage_multiplier
            * (Decimal::ONE - self.discount_fraction())
    }

    /// Recomputes the total from the itemized components
    ///
    /// Always equal to `total` for a breakdown produced by the estimator.
    pub fn recombine(&self) -> Decimal {
        let rounded = self
            .discounted()
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        rounded.max(self.minimum_premium)
    }

    /// The total as a Kwacha amount
    pub fn total_money(&self) -> Money {
        Money::kwacha(self.total)
    }

    /// The total as a whole number of Kwacha
    pub fn premium_amount(&self) -> u64 {
        self.total.to_u64().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_neutral_breakdown_is_the_floor() {
        let breakdown = PremiumBreakdown::neutral(dec!(200));
        assert_eq!(breakdown.total, dec!(200));
        assert_eq!(breakdown.additive(), Decimal::ZERO);
        assert_eq!(breakdown.premium_amount(), 200);
    }

    #[test]
    fn test_discount_fraction_is_capped() {
        let mut breakdown = PremiumBreakdown::neutral(dec!(0));
        breakdown.base_premium = dec!(500);
        breakdown.security_discount = dec!(0.8);
        breakdown.loyalty_discount = dec!(0.5);

        assert_eq!(breakdown.discount_fraction(), Decimal::ONE);
        assert_eq!(breakdown.recombine(), Decimal::ZERO);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(PremiumBreakdown::neutral(dec!(200))).unwrap();
        assert!(json.get("claimsOrAccidentsFactor").is_some());
        assert!(json.get("coverageMultiplier").is_some());
    }
}
