//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use core_kernel::{QuoteId, UserId};
use domain_quote::{FormData, FormField, QuoteStatus, SavedQuote};

use crate::fixtures::{FormFixtures, TemporalFixtures, UserFixtures};

/// Builder for form data; values go through `FormData::set`, so empty
/// values are ignored exactly as in a real update
#[derive(Debug, Clone, Default)]
pub struct FormDataBuilder {
    data: FormData,
}

impl From<FormData> for FormDataBuilder {
    fn from(data: FormData) -> Self {
        Self { data }
    }
}

impl FormDataBuilder {
    /// Creates an empty form builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets any field from its raw value
    pub fn field(mut self, field: FormField, value: impl Display) -> Self {
        self.data.set(field, value.to_string());
        self
    }

    pub fn vehicle_year(self, year: impl Display) -> Self {
        self.field(FormField::VehicleYear, year)
    }

    pub fn make(self, make: &str) -> Self {
        self.field(FormField::Make, make)
    }

    pub fn model(self, model: &str) -> Self {
        self.field(FormField::Model, model)
    }

    pub fn annual_mileage(self, mileage: impl Display) -> Self {
        self.field(FormField::AnnualMileage, mileage)
    }

    pub fn engine_size(self, cc: impl Display) -> Self {
        self.field(FormField::EngineSize, cc)
    }

    pub fn full_name(self, name: &str) -> Self {
        self.field(FormField::FullName, name)
    }

    pub fn driver_age(self, age: impl Display) -> Self {
        self.field(FormField::DriverAge, age)
    }

    pub fn license_years(self, years: impl Display) -> Self {
        self.field(FormField::LicenseYears, years)
    }

    pub fn claims_count(self, claims: impl Display) -> Self {
        self.field(FormField::ClaimsCount, claims)
    }

    pub fn email(self, email: &str) -> Self {
        self.field(FormField::Email, email)
    }

    pub fn phone(self, phone: &str) -> Self {
        self.field(FormField::Phone, phone)
    }

    pub fn address(self, address: &str) -> Self {
        self.field(FormField::Address, address)
    }

    pub fn experience_band(self, band: &str) -> Self {
        self.field(FormField::ExperienceBand, band)
    }

    pub fn accidents_band(self, band: &str) -> Self {
        self.field(FormField::AccidentsBand, band)
    }

    pub fn usage_type(self, usage: &str) -> Self {
        self.field(FormField::UsageType, usage)
    }

    pub fn coverage_type(self, coverage: &str) -> Self {
        self.field(FormField::CoverageType, coverage)
    }

    pub fn excess_amount(self, excess: impl Display) -> Self {
        self.field(FormField::ExcessAmount, excess)
    }

    pub fn security_devices(self, devices: &[&str]) -> Self {
        self.field(FormField::SecurityDevices, devices.join(","))
    }

    /// Builds the form data
    pub fn build(self) -> FormData {
        self.data
    }
}

/// Builder for saved quote history entries
pub struct SavedQuoteBuilder {
    id: QuoteId,
    user_id: UserId,
    form_data: FormData,
    quote: u64,
    timestamp: DateTime<Utc>,
    status: QuoteStatus,
}

impl Default for SavedQuoteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SavedQuoteBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            id: QuoteId::new(),
            user_id: UserFixtures::demo(),
            form_data: FormFixtures::baseline(),
            quote: 350,
            timestamp: TemporalFixtures::quote_time(),
            status: QuoteStatus::Saved,
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_form_data(mut self, form_data: FormData) -> Self {
        self.form_data = form_data;
        self
    }

    pub fn with_quote(mut self, quote: u64) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_status(mut self, status: QuoteStatus) -> Self {
        self.status = status;
        self
    }

    /// Builds the saved quote
    pub fn build(self) -> SavedQuote {
        SavedQuote {
            id: self.id,
            user_id: self.user_id,
            form_data: self.form_data,
            quote: self.quote,
            timestamp: self.timestamp,
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let form = FormDataBuilder::new()
            .make("Mazda")
            .driver_age(41)
            .security_devices(&["immobilizer"])
            .build();

        assert_eq!(form.make.as_deref(), Some("Mazda"));
        assert_eq!(form.driver_age(), Some(41));
        assert_eq!(form.security_devices().len(), 1);
    }

    #[test]
    fn test_saved_quote_builder_defaults() {
        let saved = SavedQuoteBuilder::new().with_quote(1463).build();
        assert_eq!(saved.quote, 1463);
        assert_eq!(saved.user_id, UserFixtures::demo());
    }
}
