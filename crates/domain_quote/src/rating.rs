//! Rate table for motor premium estimation
//!
//! The rule set is data. `RateTable::default()` assembles the named constants
//! below; a table may also be loaded from JSON, in which case any section or
//! field left out keeps its default value. Every table is validated before it
//! is handed to the estimator.
//!
//! # Rule Set
//!
//! ```text
//! additive   = base + vehicle age + mileage + driver age + experience
//!            + claims (or accidents band) + excess adjustment
//! subtotal   = additive * usage multiplier * coverage multiplier
//! discounted = subtotal * (1 - min(1, security + loyalty))
//! total      = max(minimum, round_half_away_from_zero(discounted))
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::QuoteError;
use crate::form::{AccidentsBand, CoverageType, ExcessAmount, SecurityDevice, UsageType};

pub const BASE_PREMIUM: Decimal = dec!(500);
pub const MINIMUM_PREMIUM: Decimal = dec!(200);

pub const NEW_VEHICLE_LOADING: Decimal = dec!(200);
pub const MID_AGE_VEHICLE_LOADING: Decimal = dec!(100);
pub const OLD_VEHICLE_ADJUSTMENT: Decimal = dec!(-100);

pub const LOW_MILEAGE_LOADING: Decimal = dec!(50);
pub const MEDIUM_MILEAGE_LOADING: Decimal = dec!(100);
pub const HIGH_MILEAGE_LOADING: Decimal = dec!(150);

pub const YOUNG_DRIVER_LOADING: Decimal = dec!(300);
pub const YOUNG_ADULT_DRIVER_LOADING: Decimal = dec!(150);
pub const SENIOR_DRIVER_LOADING: Decimal = dec!(150);

pub const NOVICE_LOADING: Decimal = dec!(250);
pub const INTERMEDIATE_LOADING: Decimal = dec!(150);
pub const EXPERIENCED_ADJUSTMENT: Decimal = dec!(-100);

pub const PER_CLAIM_LOADING: Decimal = dec!(200);
pub const MAX_CLAIMS: i64 = 20;

pub const LOYALTY_DISCOUNT: Decimal = dec!(0.10);
pub const LOYALTY_WINDOW_DAYS: i64 = 365;

/// Largest magnitude accepted for any Kwacha amount in a table
pub const MAX_RATE_AMOUNT: Decimal = dec!(1000000);
/// Largest usage or coverage multiplier accepted in a table
pub const MAX_MULTIPLIER: Decimal = dec!(10);
pub const MAX_LOYALTY_WINDOW_DAYS: i64 = 36_500;
pub const MAX_CLAIMS_CAP: i64 = 1_000;

/// Loadings by vehicle age in whole years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleAgeRates {
    /// Vehicles younger than this many years get the new-vehicle loading
    pub new_below: i64,
    /// Vehicles up to this age (inclusive) get the middle loading
    pub middle_up_to: i64,
    pub new_loading: Decimal,
    pub middle_loading: Decimal,
    /// Applied to anything older than `middle_up_to`; normally negative
    pub old_adjustment: Decimal,
    /// Model years before this are treated as absent
    pub earliest_year: i64,
}

impl Default for VehicleAgeRates {
    fn default() -> Self {
        Self {
            new_below: 3,
            middle_up_to: 7,
            new_loading: NEW_VEHICLE_LOADING,
            middle_loading: MID_AGE_VEHICLE_LOADING,
            old_adjustment: OLD_VEHICLE_ADJUSTMENT,
            earliest_year: 1900,
        }
    }
}

/// Stepped loadings above annual mileage thresholds; only the highest
/// threshold exceeded applies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MileageRates {
    pub low_threshold: i64,
    pub medium_threshold: i64,
    pub high_threshold: i64,
    pub low_loading: Decimal,
    pub medium_loading: Decimal,
    pub high_loading: Decimal,
}

impl Default for MileageRates {
    fn default() -> Self {
        Self {
            low_threshold: 15_000,
            medium_threshold: 30_000,
            high_threshold: 50_000,
            low_loading: LOW_MILEAGE_LOADING,
            medium_loading: MEDIUM_MILEAGE_LOADING,
            high_loading: HIGH_MILEAGE_LOADING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverAgeRates {
    /// Youngest accepted age; anything lower is treated as absent
    pub min_age: i64,
    /// Oldest accepted age; anything higher is treated as absent
    pub max_age: i64,
    pub young_below: i64,
    pub young_loading: Decimal,
    pub young_adult_below: i64,
    pub young_adult_loading: Decimal,
    pub senior_above: i64,
    pub senior_loading: Decimal,
}

impl Default for DriverAgeRates {
    fn default() -> Self {
        Self {
            min_age: 18,
            max_age: 100,
            young_below: 25,
            young_loading: YOUNG_DRIVER_LOADING,
            young_adult_below: 30,
            young_adult_loading: YOUNG_ADULT_DRIVER_LOADING,
            senior_above: 65,
            senior_loading: SENIOR_DRIVER_LOADING,
        }
    }
}

/// Loadings by years of licensed driving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceRates {
    pub novice_below: i64,
    pub intermediate_up_to: i64,
    pub novice_loading: Decimal,
    pub intermediate_loading: Decimal,
    pub experienced_adjustment: Decimal,
    /// Licence years above this are treated as absent
    pub max_years: i64,
}

impl Default for ExperienceRates {
    fn default() -> Self {
        Self {
            novice_below: 3,
            intermediate_up_to: 5,
            novice_loading: NOVICE_LOADING,
            intermediate_loading: INTERMEDIATE_LOADING,
            experienced_adjustment: EXPERIENCED_ADJUSTMENT,
            max_years: 82,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimsRates {
    pub per_claim: Decimal,
    /// Claims counts above this are treated as absent
    pub max_claims: i64,
    pub one_accident: Decimal,
    pub two_or_more_accidents: Decimal,
}

impl Default for ClaimsRates {
    fn default() -> Self {
        Self {
            per_claim: PER_CLAIM_LOADING,
            max_claims: MAX_CLAIMS,
            one_accident: dec!(200),
            two_or_more_accidents: dec!(400),
        }
    }
}

impl ClaimsRates {
    pub fn for_band(&self, band: AccidentsBand) -> Decimal {
        match band {
            AccidentsBand::None => Decimal::ZERO,
            AccidentsBand::One => self.one_accident,
            AccidentsBand::TwoOrMore => self.two_or_more_accidents,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageRates {
    pub private: Decimal,
    pub mixed: Decimal,
    pub commercial: Decimal,
}

impl Default for UsageRates {
    fn default() -> Self {
        Self {
            private: dec!(1.00),
            mixed: dec!(1.15),
            commercial: dec!(1.30),
        }
    }
}

impl UsageRates {
    pub fn multiplier(&self, usage: UsageType) -> Decimal {
        match usage {
            UsageType::Private => self.private,
            UsageType::Mixed => self.mixed,
            UsageType::Commercial => self.commercial,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CoverageRates {
    pub third_party: Decimal,
    pub third_party_fire_theft: Decimal,
    pub standard: Decimal,
    pub comprehensive: Decimal,
}

impl Default for CoverageRates {
    fn default() -> Self {
        Self {
            third_party: dec!(0.70),
            third_party_fire_theft: dec!(0.90),
            standard: dec!(1.20),
            comprehensive: dec!(1.50),
        }
    }
}

impl CoverageRates {
    pub fn multiplier(&self, coverage: CoverageType) -> Decimal {
        match coverage {
            CoverageType::ThirdParty => self.third_party,
            CoverageType::ThirdPartyFireTheft => self.third_party_fire_theft,
            CoverageType::Standard => self.standard,
            CoverageType::Comprehensive => self.comprehensive,
        }
    }
}

/// Additive adjustment per voluntary excess option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcessRates {
    pub k250: Decimal,
    pub k500: Decimal,
    pub k1000: Decimal,
    pub k1500: Decimal,
    pub k2000: Decimal,
    pub k5000: Decimal,
}

impl Default for ExcessRates {
    fn default() -> Self {
        Self {
            k250: dec!(0),
            k500: dec!(-50),
            k1000: dec!(-100),
            k1500: dec!(-125),
            k2000: dec!(-150),
            k5000: dec!(-200),
        }
    }
}

impl ExcessRates {
    pub fn adjustment(&self, excess: ExcessAmount) -> Decimal {
        match excess {
            ExcessAmount::K250 => self.k250,
            ExcessAmount::K500 => self.k500,
            ExcessAmount::K1000 => self.k1000,
            ExcessAmount::K1500 => self.k1500,
            ExcessAmount::K2000 => self.k2000,
            ExcessAmount::K5000 => self.k5000,
        }
    }
}

/// Discount fraction per fitted security device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityRates {
    pub alarm: Decimal,
    pub immobilizer: Decimal,
    pub tracker: Decimal,
}

impl Default for SecurityRates {
    fn default() -> Self {
        Self {
            alarm: dec!(0.05),
            immobilizer: dec!(0.05),
            tracker: dec!(0.10),
        }
    }
}

impl SecurityRates {
    pub fn discount(&self, device: SecurityDevice) -> Decimal {
        match device {
            SecurityDevice::Alarm => self.alarm,
            SecurityDevice::Immobilizer => self.immobilizer,
            SecurityDevice::Tracker => self.tracker,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoyaltyRates {
    pub discount: Decimal,
    pub window_days: i64,
}

impl Default for LoyaltyRates {
    fn default() -> Self {
        Self {
            discount: LOYALTY_DISCOUNT,
            window_days: LOYALTY_WINDOW_DAYS,
        }
    }
}

/// Complete set of rating parameters used by the estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateTable {
    pub base_premium: Decimal,
    pub minimum_premium: Decimal,
    pub vehicle_age: VehicleAgeRates,
    pub mileage: MileageRates,
    pub driver_age: DriverAgeRates,
    pub experience: ExperienceRates,
    pub claims: ClaimsRates,
    pub usage: UsageRates,
    pub coverage: CoverageRates,
    pub excess: ExcessRates,
    pub security: SecurityRates,
    pub loyalty: LoyaltyRates,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            base_premium: BASE_PREMIUM,
            minimum_premium: MINIMUM_PREMIUM,
            vehicle_age: VehicleAgeRates::default(),
            mileage: MileageRates::default(),
            driver_age: DriverAgeRates::default(),
            experience: ExperienceRates::default(),
            claims: ClaimsRates::default(),
            usage: UsageRates::default(),
            coverage: CoverageRates::default(),
            excess: ExcessRates::default(),
            security: SecurityRates::default(),
            loyalty: LoyaltyRates::default(),
        }
    }
}

impl RateTable {
    /// Parses and validates a rate table from JSON
    ///
    /// # Example
    ///
    /// ```rust
    /// use domain_quote::rating::RateTable;
    ///
    /// let table = RateTable::from_json(r#"{ "minimum_premium": "250" }"#).unwrap();
    /// assert_eq!(table.minimum_premium.to_string(), "250");
    /// ```
    pub fn from_json(json: &str) -> Result<Self, QuoteError> {
        let table: RateTable = serde_json::from_str(json)
            .map_err(|e| QuoteError::invalid_rate_table(format!("Failed to parse: {}", e)))?;
        table.validate()?;
        Ok(table)
    }

    /// Reads, parses and validates a rate table file
    pub fn from_path(path: &Path) -> Result<Self, QuoteError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            QuoteError::invalid_rate_table(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Checks the structural rules every table must satisfy
    pub fn validate(&self) -> Result<(), QuoteError> {
        let mut problems = Vec::new();

        if self.base_premium.is_sign_negative() {
            problems.push("base premium must not be negative".to_string());
        }
        if self.minimum_premium.is_sign_negative() {
            problems.push("minimum premium must not be negative".to_string());
        }

        let amounts = [
            ("base_premium", self.base_premium),
            ("minimum_premium", self.minimum_premium),
            ("vehicle_age.new_loading", self.vehicle_age.new_loading),
            ("vehicle_age.middle_loading", self.vehicle_age.middle_loading),
            ("vehicle_age.old_adjustment", self.vehicle_age.old_adjustment),
            ("mileage.low_loading", self.mileage.low_loading),
            ("mileage.medium_loading", self.mileage.medium_loading),
            ("mileage.high_loading", self.mileage.high_loading),
            ("driver_age.young_loading", self.driver_age.young_loading),
            ("driver_age.young_adult_loading", self.driver_age.young_adult_loading),
            ("driver_age.senior_loading", self.driver_age.senior_loading),
            ("experience.novice_loading", self.experience.novice_loading),
            ("experience.intermediate_loading", self.experience.intermediate_loading),
            ("experience.experienced_adjustment", self.experience.experienced_adjustment),
            ("claims.per_claim", self.claims.per_claim),
            ("claims.one_accident", self.claims.one_accident),
            ("claims.two_or_more_accidents", self.claims.two_or_more_accidents),
        ];
        let excess_amounts = ExcessAmount::ALL
            .iter()
            .map(|option| ("excess", self.excess.adjustment(*option)));
        for (name, value) in amounts.into_iter().chain(excess_amounts) {
            if value.abs() > MAX_RATE_AMOUNT {
                problems.push(format!("{} must be within K{}", name, MAX_RATE_AMOUNT));
            }
        }

        let multipliers = [
            ("usage.private", self.usage.private),
            ("usage.mixed", self.usage.mixed),
            ("usage.commercial", self.usage.commercial),
            ("coverage.third_party", self.coverage.third_party),
            ("coverage.third_party_fire_theft", self.coverage.third_party_fire_theft),
            ("coverage.standard", self.coverage.standard),
            ("coverage.comprehensive", self.coverage.comprehensive),
        ];
        for (name, value) in multipliers {
            if value <= Decimal::ZERO || value > MAX_MULTIPLIER {
                problems.push(format!(
                    "{} multiplier must be positive and at most {}",
                    name, MAX_MULTIPLIER
                ));
            }
        }

        let fractions = [
            ("security.alarm", self.security.alarm),
            ("security.immobilizer", self.security.immobilizer),
            ("security.tracker", self.security.tracker),
            ("loyalty.discount", self.loyalty.discount),
        ];
        for (name, value) in fractions {
            if value < Decimal::ZERO || value > Decimal::ONE {
                problems.push(format!("{} must be a fraction between 0 and 1", name));
            }
        }

        let m = &self.mileage;
        if !(0 <= m.low_threshold && m.low_threshold < m.medium_threshold && m.medium_threshold < m.high_threshold) {
            problems.push("mileage thresholds must be ascending".to_string());
        }

        let v = &self.vehicle_age;
        if !(0 <= v.new_below && v.new_below <= v.middle_up_to) {
            problems.push("vehicle age bands must be ascending".to_string());
        }
        if !(1..=9999).contains(&v.earliest_year) {
            problems.push("earliest vehicle year must be a calendar year".to_string());
        }

        let d = &self.driver_age;
        if !(d.min_age <= d.young_below && d.young_below <= d.young_adult_below && d.senior_above <= d.max_age) {
            problems.push("driver age bands must be ascending".to_string());
        }

        let e = &self.experience;
        if !(0 <= e.novice_below && e.novice_below <= e.intermediate_up_to && e.intermediate_up_to <= e.max_years) {
            problems.push("experience bands must be ascending".to_string());
        }

        if !(0..=MAX_CLAIMS_CAP).contains(&self.claims.max_claims) {
            problems.push(format!("claims cap must be between 0 and {}", MAX_CLAIMS_CAP));
        }
        if !(1..=MAX_LOYALTY_WINDOW_DAYS).contains(&self.loyalty.window_days) {
            problems.push(format!(
                "loyalty window must be between 1 and {} days",
                MAX_LOYALTY_WINDOW_DAYS
            ));
        }

        let excess: Vec<Decimal> = ExcessAmount::ALL
            .iter()
            .map(|option| self.excess.adjustment(*option))
            .collect();
        if excess.windows(2).any(|pair| pair[1] > pair[0]) {
            problems.push("excess adjustments must not increase with the excess".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(QuoteError::invalid_rate_table(problems.join("; ")))
        }
    }
}
