//! Premium estimator tests: worked scenarios, monotonicity and properties

use chrono::Duration;
use proptest::prelude::*;
use rust_decimal_macros::dec;

use core_kernel::Money;
use domain_quote::{EstimationContext, ExcessAmount, FormData, PremiumBreakdown, PremiumEstimator, RateTable};
use test_utils::{
    assert_breakdown_consistent, assert_money_approx_eq, assert_premium, context_strategy, form_data_strategy,
    FormDataBuilder, FormFixtures, TemporalFixtures,
};

fn context() -> EstimationContext {
    EstimationContext::at(TemporalFixtures::quote_time())
}

fn loyal_context() -> EstimationContext {
    context().with_last_quote_at(Some(TemporalFixtures::recent_quote_time()))
}

// ============= SCENARIO TESTS =============
mod scenario_tests {
    use super::*;

    #[test]
    fn test_baseline_scenario() {
        let breakdown = PremiumEstimator::default().estimate(&FormFixtures::baseline(), &context());

        assert_premium(&breakdown, 350);
        assert_money_approx_eq(&breakdown.total_money(), &Money::kwacha(dec!(350)), dec!(0));
        assert_eq!(breakdown.base_premium, dec!(500));
        assert_eq!(breakdown.vehicle_age_factor, dec!(200));
        assert_eq!(breakdown.mileage_factor, dec!(0));
        assert_eq!(breakdown.driver_age_factor, dec!(0));
        assert_eq!(breakdown.experience_factor, dec!(-100));
        assert_eq!(breakdown.claims_or_accidents_factor, dec!(0));
        assert_eq!(breakdown.usage_factor, dec!(1));
        assert_eq!(breakdown.coverage_multiplier, dec!(0.7));
        assert_eq!(breakdown.excess_adjustment, dec!(-100));
        assert_eq!(breakdown.security_discount, dec!(0));
        assert_eq!(breakdown.loyalty_discount, dec!(0));
    }

    #[test]
    fn test_high_risk_scenario() {
        let estimator = PremiumEstimator::default();
        let breakdown = estimator.estimate(&FormFixtures::high_risk(), &loyal_context());

        assert_premium(&breakdown, 1463);
        assert_eq!(breakdown.driver_age_factor, dec!(300));
        assert_eq!(breakdown.claims_or_accidents_factor, dec!(400));
        assert_eq!(breakdown.coverage_multiplier, dec!(1.5));
        assert_eq!(breakdown.excess_adjustment, dec!(0));
        assert_eq!(breakdown.discount_fraction(), dec!(0.25));

        let baseline = estimator.estimate(&FormFixtures::baseline(), &context());
        assert!(breakdown.total > baseline.total);
    }

    #[test]
    fn test_stale_loyalty_not_applied() {
        let context = context().with_last_quote_at(Some(TemporalFixtures::stale_quote_time()));
        let breakdown = PremiumEstimator::default().estimate(&FormFixtures::baseline(), &context);
        assert_eq!(breakdown.loyalty_discount, dec!(0));
    }

    #[test]
    fn test_all_absent_is_minimum_and_neutral() {
        let breakdown = PremiumEstimator::default().estimate(&FormData::new(), &loyal_context());
        assert_eq!(breakdown, PremiumBreakdown::neutral(dec!(200)));
    }

    #[test]
    fn test_identity_fields_do_not_rate() {
        let form = FormDataBuilder::new()
            .make("Toyota")
            .full_name("Mwila Banda")
            .email("mwila@example.co.zm")
            .engine_size(1600)
            .build();
        let breakdown = PremiumEstimator::default().estimate(&form, &context());
        assert_eq!(breakdown, PremiumBreakdown::neutral(dec!(200)));
    }

    #[test]
    fn test_maximal_surcharges() {
        let form = FormDataBuilder::new()
            .vehicle_year(TemporalFixtures::current_year())
            .annual_mileage(90_000)
            .driver_age(19)
            .license_years(1)
            .claims_count(20)
            .usage_type("commercial")
            .coverage_type("comprehensive")
            .excess_amount(250)
            .build();
        let breakdown = PremiumEstimator::default().estimate(&form, &context());

        // 500 + 200 + 150 + 300 + 250 + 4000 = 5400; x1.3 x1.5 = 10530
        assert_premium(&breakdown, 10530);
    }

    #[test]
    fn test_full_discount_hits_the_floor() {
        let mut rates = RateTable::default();
        rates.security.tracker = dec!(1);
        let estimator = PremiumEstimator::new(rates);

        let form = FormDataBuilder::from(FormFixtures::high_risk())
            .security_devices(&["alarm", "immobilizer", "tracker"])
            .build();
        let breakdown = estimator.estimate(&form, &loyal_context());

        assert_eq!(breakdown.discount_fraction(), dec!(1));
        assert_premium(&breakdown, 200);
    }

    #[test]
    fn test_custom_minimum_premium() {
        let rates = RateTable::from_json(r#"{ "minimum_premium": "400" }"#).unwrap();
        let breakdown = PremiumEstimator::new(rates).estimate(&FormFixtures::baseline(), &context());
        assert_premium(&breakdown, 400);
    }
}

// ============= MONOTONICITY TESTS =============
mod monotonicity_tests {
    use super::*;

    #[test]
    fn test_young_drivers_pay_more() {
        let estimator = PremiumEstimator::default();
        for young in 18..25 {
            for adult in 25..=34 {
                let young_total = estimator
                    .estimate(&FormDataBuilder::from(FormFixtures::baseline()).driver_age(young).build(), &context())
                    .total;
                let adult_total = estimator
                    .estimate(&FormDataBuilder::from(FormFixtures::baseline()).driver_age(adult).build(), &context())
                    .total;
                assert!(young_total >= adult_total, "age {} vs {}", young, adult);
            }
        }
    }

    #[test]
    fn test_higher_excess_never_costs_more() {
        let estimator = PremiumEstimator::default();
        let totals: Vec<_> = ExcessAmount::ALL
            .iter()
            .map(|excess| {
                let form = FormDataBuilder::from(FormFixtures::high_risk())
                    .excess_amount(excess.kwacha())
                    .build();
                estimator.estimate(&form, &context()).total
            })
            .collect();

        assert!(totals.windows(2).all(|pair| pair[1] <= pair[0]), "{:?}", totals);
    }

    #[test]
    fn test_coverage_ordering() {
        let estimator = PremiumEstimator::default();
        let total = |coverage: &str| {
            let form = FormDataBuilder::from(FormFixtures::baseline())
                .coverage_type(coverage)
                .build();
            estimator.estimate(&form, &context()).total
        };

        assert!(total("comprehensive") > total("standard"));
        assert!(total("standard") > total("third-party-fire-theft"));
        assert!(total("third-party-fire-theft") > total("third-party"));
    }

    #[test]
    fn test_loyalty_lowers_premium() {
        let estimator = PremiumEstimator::default();
        let fresh = estimator.estimate(&FormFixtures::high_risk(), &context());
        let loyal = estimator.estimate(
            &FormFixtures::high_risk(),
            &context().with_last_quote_at(Some(TemporalFixtures::quote_time() - Duration::hours(1))),
        );
        assert!(loyal.total < fresh.total);
    }
}

// ============= PROPERTY TESTS =============
mod property_tests {
    use super::*;

    proptest! {
        #[test]
        fn breakdown_recombines_to_total(form in form_data_strategy(), context in context_strategy()) {
            let breakdown = PremiumEstimator::default().estimate(&form, &context);
            assert_breakdown_consistent(&breakdown);
        }

        #[test]
        fn estimate_is_idempotent(form in form_data_strategy(), context in context_strategy()) {
            let estimator = PremiumEstimator::default();
            prop_assert_eq!(estimator.estimate(&form, &context), estimator.estimate(&form, &context));
        }

        #[test]
        fn total_never_below_minimum(form in form_data_strategy(), context in context_strategy()) {
            let breakdown = PremiumEstimator::default().estimate(&form, &context);
            prop_assert!(breakdown.total >= dec!(200));
        }

        #[test]
        fn young_driver_never_cheaper(
            form in form_data_strategy(),
            young in 18i64..25,
            adult in 25i64..=34,
        ) {
            let estimator = PremiumEstimator::default();
            let young_total = estimator
                .estimate(&FormDataBuilder::from(form.clone()).driver_age(young).build(), &context())
                .total;
            let adult_total = estimator
                .estimate(&FormDataBuilder::from(form).driver_age(adult).build(), &context())
                .total;
            prop_assert!(young_total >= adult_total);
        }

        #[test]
        fn serde_round_trip_preserves_estimate(form in form_data_strategy()) {
            let json = serde_json::to_string(&form).unwrap();
            let restored: FormData = serde_json::from_str(&json).unwrap();
            let estimator = PremiumEstimator::default();
            prop_assert_eq!(
                estimator.estimate(&form, &context()).total,
                estimator.estimate(&restored, &context()).total
            );
        }
    }
}
