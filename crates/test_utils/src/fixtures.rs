//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the quotation tests. These fixtures
//! are consistent and predictable: every instant is fixed.

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_kernel::UserId;
use domain_quote::FormData;

use crate::builders::FormDataBuilder;

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// 17 July 2025, 09:25 in Lusaka (07:25 UTC)
    pub fn quote_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 17, 7, 25, 0).unwrap()
    }

    /// Calendar year of `quote_time` in the market timezone
    pub fn current_year() -> i32 {
        2025
    }

    /// A previous quote within the loyalty window
    pub fn recent_quote_time() -> DateTime<Utc> {
        Self::quote_time() - Duration::days(30)
    }

    /// A previous quote outside the loyalty window
    pub fn stale_quote_time() -> DateTime<Utc> {
        Self::quote_time() - Duration::days(400)
    }
}

/// Fixture for user identifiers
pub struct UserFixtures;

impl UserFixtures {
    pub fn demo() -> UserId {
        UserId::parse("demo-user-1752744300000").unwrap()
    }

    pub fn other() -> UserId {
        UserId::parse("other-user").unwrap()
    }
}

/// Fixture for form data
pub struct FormFixtures;

impl FormFixtures {
    /// Brand-new vehicle, 10,000 km, driver aged 30 with 10 years licensed,
    /// no claims, third-party cover with a K1,000 excess
    pub fn baseline() -> FormData {
        FormDataBuilder::new()
            .vehicle_year(TemporalFixtures::current_year())
            .annual_mileage(10_000)
            .driver_age(30)
            .license_years(10)
            .claims_count(0)
            .coverage_type("third-party")
            .excess_amount(1000)
            .build()
    }

    /// The baseline with a 20-year-old driver, two claims, comprehensive
    /// cover, a K250 excess and an alarm plus tracker
    pub fn high_risk() -> FormData {
        FormDataBuilder::from(Self::baseline())
            .driver_age(20)
            .claims_count(2)
            .coverage_type("comprehensive")
            .excess_amount(250)
            .security_devices(&["alarm", "tracker"])
            .build()
    }

    /// Every step filled in with valid values
    pub fn complete() -> FormData {
        FormDataBuilder::from(Self::baseline())
            .make("Toyota")
            .model("Corolla")
            .engine_size(1600)
            .full_name("Mwila Banda")
            .email("mwila@example.co.zm")
            .phone("0977123456")
            .address("Plot 12, Cairo Road, Lusaka")
            .usage_type("private")
            .build()
    }
}
