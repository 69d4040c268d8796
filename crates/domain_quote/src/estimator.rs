//! Premium Estimator
//!
//! A pure, total function from a form snapshot to an itemized premium. It
//! never fails: input that does not parse, or parses to a value outside the
//! accepted range for its field, contributes nothing. The current year and
//! the last-quote timestamp come in through [`EstimationContext`] so the
//! result depends only on its arguments.
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use domain_quote::{EstimationContext, FormData, PremiumEstimator};
//!
//! let estimator = PremiumEstimator::default();
//! let breakdown = estimator.estimate(&FormData::new(), &EstimationContext::at(Utc::now()));
//! assert_eq!(breakdown.total.to_string(), "200");
//! ```

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use core_kernel::Timezone;

use crate::breakdown::PremiumBreakdown;
use crate::form::{ExperienceBand, FormData};
use crate::rating::RateTable;

/// Everything the estimator needs besides the form itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimationContext {
    /// The instant treated as "now"
    pub as_of: DateTime<Utc>,
    /// Timezone used to derive the current calendar year
    pub timezone: Timezone,
    /// When this user last computed a quote, if ever
    pub last_quote_at: Option<DateTime<Utc>>,
}

impl EstimationContext {
    /// Context at the given instant, market timezone, no previous quote
    pub fn at(as_of: DateTime<Utc>) -> Self {
        Self {
            as_of,
            timezone: Timezone::default(),
            last_quote_at: None,
        }
    }

    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_last_quote_at(mut self, last_quote_at: Option<DateTime<Utc>>) -> Self {
        self.last_quote_at = last_quote_at;
        self
    }

    /// Calendar year of `as_of` in the context timezone
    pub fn current_year(&self) -> i64 {
        i64::from(self.timezone.year_of(self.as_of))
    }
}

/// Rule-based motor premium estimator
#[derive(Debug, Clone, Default)]
pub struct PremiumEstimator {
    rates: RateTable,
}

impl PremiumEstimator {
    /// Creates an estimator over a validated rate table
    pub fn new(rates: RateTable) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Computes the premium breakdown for a form snapshot
    pub fn estimate(&self, form: &FormData, context: &EstimationContext) -> PremiumBreakdown {
        let rates = &self.rates;

        let vehicle_age = self.vehicle_age_factor(form, context);
        let mileage = self.mileage_factor(form);
        let driver_age = self.driver_age_factor(form);
        let experience = self.experience_factor(form);
        let claims = self.claims_factor(form);
        let usage = form.usage_type().map(|u| rates.usage.multiplier(u));
        let coverage = form.coverage_type().map(|c| rates.coverage.multiplier(c));
        let excess = form.excess_amount().map(|e| rates.excess.adjustment(e));
        let devices = form.security_devices();

        let nothing_to_rate = vehicle_age.is_none()
            && mileage.is_none()
            && driver_age.is_none()
            && experience.is_none()
            && claims.is_none()
            && usage.is_none()
            && coverage.is_none()
            && excess.is_none()
            && devices.is_empty();
        if nothing_to_rate {
            return PremiumBreakdown::neutral(rates.minimum_premium);
        }

        let security_discount = devices
            .iter()
            .map(|device| rates.security.discount(*device))
            .sum();

        let mut breakdown = PremiumBreakdown {
            base_premium: rates.base_premium,
            vehicle_age_factor: vehicle_age.unwrap_or_default(),
            mileage_factor: mileage.unwrap_or_default(),
            driver_age_factor: driver_age.unwrap_or_default(),
            experience_factor: experience.unwrap_or_default(),
            claims_or_accidents_factor: claims.unwrap_or_default(),
            usage_factor: usage.unwrap_or(Decimal::ONE),
            coverage_multiplier: coverage.unwrap_or(Decimal::ONE),
            excess_adjustment: excess.unwrap_or_default(),
            security_discount,
            loyalty_discount: self.loyalty_discount(context),
            minimum_premium: rates.minimum_premium,
            total: Decimal::ZERO,
        };
        breakdown.total = breakdown.recombine();
        breakdown
    }

    fn vehicle_age_factor(&self, form: &FormData, context: &EstimationContext) -> Option<Decimal> {
        let rates = &self.rates.vehicle_age;
        let current_year = context.current_year();
        let year = form
            .vehicle_year()
            .filter(|year| (rates.earliest_year..=current_year).contains(year))?;

        let age = current_year - year;
        Some(if age < rates.new_below {
            rates.new_loading
        } else if age <= rates.middle_up_to {
            rates.middle_loading
        } else {
            rates.old_adjustment
        })
    }

    fn mileage_factor(&self, form: &FormData) -> Option<Decimal> {
        let rates = &self.rates.mileage;
        let mileage = form.annual_mileage().filter(|m| *m >= 0)?;

        Some(if mileage > rates.high_threshold {
            rates.high_loading
        } else if mileage > rates.medium_threshold {
            rates.medium_loading
        } else if mileage > rates.low_threshold {
            rates.low_loading
        } else {
            Decimal::ZERO
        })
    }

    fn driver_age_factor(&self, form: &FormData) -> Option<Decimal> {
        let rates = &self.rates.driver_age;
        let age = form
            .driver_age()
            .filter(|age| (rates.min_age..=rates.max_age).contains(age))?;

        Some(if age < rates.young_below {
            rates.young_loading
        } else if age < rates.young_adult_below {
            rates.young_adult_loading
        } else if age > rates.senior_above {
            rates.senior_loading
        } else {
            Decimal::ZERO
        })
    }

    /// Exact licence years win; the self-declared band is the fallback
    fn experience_factor(&self, form: &FormData) -> Option<Decimal> {
        let rates = &self.rates.experience;
        let years = form
            .license_years()
            .filter(|years| (0..=rates.max_years).contains(years));

        if let Some(years) = years {
            return Some(if years < rates.novice_below {
                rates.novice_loading
            } else if years <= rates.intermediate_up_to {
                rates.intermediate_loading
            } else {
                rates.experienced_adjustment
            });
        }

        form.experience_band().map(|band| match band {
            ExperienceBand::UpToTwo => rates.novice_loading,
            ExperienceBand::ThreeToFive => rates.intermediate_loading,
            ExperienceBand::SixPlus => rates.experienced_adjustment,
        })
    }

    /// The claims count wins; the accidents band is only a fallback and the
    /// two never compound
    fn claims_factor(&self, form: &FormData) -> Option<Decimal> {
        let rates = &self.rates.claims;
        let claims = form
            .claims_count()
            .filter(|count| (0..=rates.max_claims).contains(count));

        match claims {
            Some(count) => Some(rates.per_claim * Decimal::from(count)),
            None => form.accidents_band().map(|band| rates.for_band(band)),
        }
    }

    fn loyalty_discount(&self, context: &EstimationContext) -> Decimal {
        let rates = &self.rates.loyalty;
        let Some(window) = Duration::try_days(rates.window_days) else {
            return Decimal::ZERO;
        };

        match context.last_quote_at {
            Some(last) if last <= context.as_of && context.as_of - last <= window => rates.discount,
            _ => Decimal::ZERO,
        }
    }
}
