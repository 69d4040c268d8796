//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for premiums and breakdowns that
//! give more meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_quote::PremiumBreakdown;
use rust_decimal::Decimal;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={:?}, expected={:?}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a breakdown's total is the whole-Kwacha premium expected
pub fn assert_premium(breakdown: &PremiumBreakdown, expected: u64) {
    assert_eq!(
        breakdown.premium_amount(),
        expected,
        "Expected premium K{}, got K{} (additive={}, usage={}, coverage={}, discount={})",
        expected,
        breakdown.total,
        breakdown.additive(),
        breakdown.usage_factor,
        breakdown.coverage_multiplier,
        breakdown.discount_fraction()
    );
}

/// Asserts the structural invariants every estimator breakdown satisfies
///
/// - the total recombines from the itemized fields
/// - the total is a whole number not below the minimum premium
/// - multipliers are positive and discount fractions lie in [0, 1]
pub fn assert_breakdown_consistent(breakdown: &PremiumBreakdown) {
    assert_eq!(
        breakdown.total,
        breakdown.recombine(),
        "Total {} does not recombine from its components",
        breakdown.total
    );
    assert!(
        breakdown.total >= breakdown.minimum_premium,
        "Total {} is below the minimum premium {}",
        breakdown.total,
        breakdown.minimum_premium
    );
    assert_eq!(breakdown.total.fract(), Decimal::ZERO, "Total {} is not whole", breakdown.total);
    assert!(breakdown.usage_factor > Decimal::ZERO);
    assert!(breakdown.coverage_multiplier > Decimal::ZERO);
    for fraction in [breakdown.security_discount, breakdown.loyalty_discount] {
        assert!(
            (Decimal::ZERO..=Decimal::ONE).contains(&fraction),
            "Discount fraction {} outside [0, 1]",
            fraction
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_neutral_breakdown_is_consistent() {
        let breakdown = PremiumBreakdown::neutral(dec!(200));
        assert_breakdown_consistent(&breakdown);
        assert_premium(&breakdown, 200);
    }

    #[test]
    #[should_panic(expected = "does not recombine")]
    fn test_tampered_total_detected() {
        let mut breakdown = PremiumBreakdown::neutral(dec!(200));
        breakdown.total = dec!(999);
        assert_breakdown_consistent(&breakdown);
    }

    #[test]
    fn test_money_approx_eq() {
        assert_money_approx_eq(&Money::kwacha(dec!(100.004)), &Money::kwacha(dec!(100)), dec!(0.01));
    }
}
