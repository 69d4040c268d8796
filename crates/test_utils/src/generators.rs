//! Property-Based Test Generators
//!
//! Provides proptest strategies for form data. Field values are drawn from a
//! mix of valid values, out-of-range numbers and junk text, because the
//! estimator must cope with anything a user can type.

use chrono::{DateTime, Duration, Utc};
use domain_quote::{EstimationContext, FormData};
use proptest::prelude::*;

use crate::fixtures::TemporalFixtures;

/// Strategy for free text that is rarely a valid value
pub fn junk_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        Just("n/a".to_string()),
        Just("-1".to_string()),
        Just("1e9".to_string()),
        "[a-z0-9 ,.+-]{0,8}",
    ]
}

/// Strategy for an optional integer field: valid range, wide range or junk
pub fn numeric_field_strategy(valid: std::ops::RangeInclusive<i64>) -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        2 => valid.prop_map(|n| Some(n.to_string())),
        1 => (-1_000_000i64..1_000_000i64).prop_map(|n| Some(n.to_string())),
        1 => junk_strategy().prop_map(Some),
        1 => Just(None),
    ]
}

/// Strategy for an optional enumerated field: one of the options or junk
pub fn choice_field_strategy(options: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        3 => proptest::sample::select(options).prop_map(|s| Some(s.to_string())),
        1 => junk_strategy().prop_map(Some),
        1 => Just(None),
    ]
}

/// Strategy for the security devices checkbox set
pub fn security_devices_strategy() -> impl Strategy<Value = Option<Vec<String>>> {
    proptest::option::of(proptest::collection::vec(
        prop_oneof![
            Just("alarm".to_string()),
            Just("immobilizer".to_string()),
            Just("tracker".to_string()),
            junk_strategy(),
        ],
        0..4,
    ))
}

/// Strategy for arbitrary form data
pub fn form_data_strategy() -> impl Strategy<Value = FormData> {
    let year = TemporalFixtures::current_year() as i64;
    let vehicle = (
        numeric_field_strategy(1900..=year),
        numeric_field_strategy(0..=120_000),
        numeric_field_strategy(18..=100),
        numeric_field_strategy(0..=60),
        numeric_field_strategy(0..=20),
    );
    let choices = (
        choice_field_strategy(&["0-2", "3-5", "6+"]),
        choice_field_strategy(&["0", "1", "2+"]),
        choice_field_strategy(&["private", "mixed", "commercial"]),
        choice_field_strategy(&["comprehensive", "standard", "third-party", "third-party-fire-theft"]),
        choice_field_strategy(&["250", "500", "1000", "1500", "2000", "5000"]),
        security_devices_strategy(),
    );

    (vehicle, choices).prop_map(
        |(
            (vehicle_year, annual_mileage, driver_age, license_years, claims_count),
            (experience_band, accidents_band, usage_type, coverage_type, excess_amount, devices),
        )| FormData {
            vehicle_year,
            annual_mileage,
            driver_age,
            license_years,
            claims_count,
            experience_band,
            accidents_band,
            usage_type,
            coverage_type,
            excess_amount,
            security_devices: devices.map(|d| d.into_iter().collect()),
            ..FormData::default()
        },
    )
}

/// Strategy for an optional previous quote time around the fixture instant
pub fn last_quote_strategy() -> impl Strategy<Value = Option<DateTime<Utc>>> {
    proptest::option::of((-800i64..30i64).prop_map(|days| TemporalFixtures::quote_time() + Duration::days(days)))
}

/// Strategy for estimation contexts at the fixture instant
pub fn context_strategy() -> impl Strategy<Value = EstimationContext> {
    last_quote_strategy().prop_map(|last| {
        EstimationContext::at(TemporalFixtures::quote_time()).with_last_quote_at(last)
    })
}
