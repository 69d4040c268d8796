//! Form field validation
//!
//! Validation is pure and separate from estimation: the estimator ignores
//! bad input, while these functions report it so the form can refuse to
//! advance and show a message next to the field.
//!
//! # Field Rules
//!
//! - `vehicleYear`: whole year between 1990 and the current year
//! - `model`: letters, digits, spaces and hyphens
//! - `annualMileage`, `licenseYears`: non-negative whole numbers
//! - `claimsCount`: whole number between 0 and 20
//! - `engineSize`: 500 to 5000 cc
//! - `driverAge`: 18 to 100
//! - `email`: a valid address with a dotted domain
//! - `phone`: exactly 10 digits
//! - enumerated fields: one of their allowed values
//!
//! # Step Rules
//!
//! Each input step has required fields; the history step requires one of
//! `licenseYears`/`experienceBand` and one of `claimsCount`/`accidentsBand`.
//! Optional fields are checked only when present.

use serde::Serialize;
use validator::Validate;

use crate::estimator::EstimationContext;
use crate::form::{
    parse_integer, AccidentsBand, CoverageType, ExcessAmount, ExperienceBand, FormData,
    FormField, SecurityDevice, UsageType,
};
use crate::session::Step;

/// Earliest model year accepted on the vehicle step
pub const EARLIEST_VEHICLE_YEAR: i64 = 1990;
pub const MIN_ENGINE_SIZE: i64 = 500;
pub const MAX_ENGINE_SIZE: i64 = 5000;
pub const MIN_DRIVER_AGE: i64 = 18;
pub const MAX_DRIVER_AGE: i64 = 100;
pub const MAX_CLAIMS_COUNT: i64 = 20;
pub const PHONE_DIGITS: usize = 10;
/// Youngest age at which a licence can be held
pub const MIN_LICENSING_AGE: i64 = 16;

#[derive(Debug, Validate)]
struct EmailAddress {
    #[validate(email)]
    value: String,
}

/// Outcome of validating a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidation {
    pub field: FormField,
    pub valid: bool,
    /// Message to show next to the field when invalid
    pub message: Option<String>,
}

impl FieldValidation {
    fn ok(field: FormField) -> Self {
        Self {
            field,
            valid: true,
            message: None,
        }
    }

    fn invalid(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// Result of validating a step or a whole form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Whether the input is valid
    pub is_valid: bool,
    /// List of validation errors
    pub errors: Vec<String>,
    /// List of validation warnings (non-fatal issues)
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Creates a successful validation result
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an error to the result
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    /// Adds a warning to the result
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Merges another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    fn add_field(&mut self, check: FieldValidation) {
        if let Some(message) = check.message.filter(|_| !check.valid) {
            self.add_error(message);
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

/// Validator for form fields and steps
///
/// Holds the current calendar year so that the vehicle year rule does not
/// read the clock.
#[derive(Debug, Clone, Copy)]
pub struct FormValidator {
    current_year: i64,
}

impl FormValidator {
    pub fn new(current_year: i64) -> Self {
        Self { current_year }
    }

    /// Validator using the calendar year of an estimation context
    pub fn for_context(context: &EstimationContext) -> Self {
        Self::new(context.current_year())
    }

    /// Validates one raw field value
    pub fn validate_field(&self, field: FormField, value: &str) -> FieldValidation {
        let value = value.trim();
        if value.is_empty() {
            return FieldValidation::invalid(field, format!("{} is required", label(field)));
        }

        match field {
            FormField::VehicleYear => self.check_range(
                field,
                value,
                EARLIEST_VEHICLE_YEAR,
                self.current_year,
                format!(
                    "Vehicle year must be between {} and {}",
                    EARLIEST_VEHICLE_YEAR, self.current_year
                ),
            ),
            FormField::Model => {
                let allowed = value
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || c == '-');
                if allowed {
                    FieldValidation::ok(field)
                } else {
                    FieldValidation::invalid(
                        field,
                        "Model can only contain letters, numbers, spaces, and hyphens",
                    )
                }
            }
            FormField::AnnualMileage | FormField::LicenseYears => self.check_range(
                field,
                value,
                0,
                i64::MAX,
                format!("{} must be a whole number of 0 or more", label(field)),
            ),
            FormField::ClaimsCount => self.check_range(
                field,
                value,
                0,
                MAX_CLAIMS_COUNT,
                format!("Claims count must be between 0 and {}", MAX_CLAIMS_COUNT),
            ),
            FormField::EngineSize => self.check_range(
                field,
                value,
                MIN_ENGINE_SIZE,
                MAX_ENGINE_SIZE,
                format!(
                    "Engine size must be between {} and {} CC",
                    MIN_ENGINE_SIZE, MAX_ENGINE_SIZE
                ),
            ),
            FormField::DriverAge => self.check_range(
                field,
                value,
                MIN_DRIVER_AGE,
                MAX_DRIVER_AGE,
                format!("Age must be between {} and {}", MIN_DRIVER_AGE, MAX_DRIVER_AGE),
            ),
            FormField::Email => {
                let dotted_domain = value
                    .rsplit_once('@')
                    .map(|(_, domain)| domain.contains('.') && !domain.ends_with('.'))
                    .unwrap_or(false);
                let address = EmailAddress {
                    value: value.to_string(),
                };
                if address.validate().is_ok() && dotted_domain {
                    FieldValidation::ok(field)
                } else {
                    FieldValidation::invalid(
                        field,
                        "Please enter a valid email (e.g., example@domain.com)",
                    )
                }
            }
            FormField::Phone => {
                if value.len() == PHONE_DIGITS && value.chars().all(|c| c.is_ascii_digit()) {
                    FieldValidation::ok(field)
                } else {
                    FieldValidation::invalid(field, "Please enter a 10-digit phone number")
                }
            }
            FormField::Make | FormField::FullName | FormField::Address => FieldValidation::ok(field),
            FormField::ExperienceBand => check_parse::<ExperienceBand>(field, value),
            FormField::AccidentsBand => check_parse::<AccidentsBand>(field, value),
            FormField::UsageType => check_parse::<UsageType>(field, value),
            FormField::CoverageType => check_parse::<CoverageType>(field, value),
            FormField::ExcessAmount => check_parse::<ExcessAmount>(field, value),
            FormField::SecurityDevices => {
                let unknown: Vec<&str> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|device| !device.is_empty() && device.parse::<SecurityDevice>().is_err())
                    .collect();
                if unknown.is_empty() {
                    FieldValidation::ok(field)
                } else {
                    FieldValidation::invalid(
                        field,
                        format!("Unknown security device: {}", unknown.join(", ")),
                    )
                }
            }
        }
    }

    /// Validates everything a step needs before the form may move on
    pub fn validate_step(&self, step: Step, form: &FormData) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for field in step.required_fields() {
            let value = form.get(*field).unwrap_or_default();
            result.add_field(self.validate_field(*field, &value));
        }

        for field in step.optional_fields() {
            if let Some(value) = form.get(*field) {
                result.add_field(self.validate_field(*field, &value));
            }
        }

        if step == Step::History {
            self.validate_history(form, &mut result);
        }

        result
    }

    /// Validates every input step
    pub fn validate_all(&self, form: &FormData) -> ValidationResult {
        let mut result = ValidationResult::ok();
        for step in Step::INPUT_STEPS {
            result.merge(self.validate_step(step, form));
        }
        result
    }

    fn validate_history(&self, form: &FormData, result: &mut ValidationResult) {
        self.require_one_of(form, FormField::LicenseYears, FormField::ExperienceBand, result);
        self.require_one_of(form, FormField::ClaimsCount, FormField::AccidentsBand, result);

        if form.get(FormField::ClaimsCount).is_some() && form.get(FormField::AccidentsBand).is_some() {
            result.add_warning("Both claims count and accidents band given; the claims count is used");
        }

        let age = form
            .driver_age()
            .filter(|age| (MIN_DRIVER_AGE..=MAX_DRIVER_AGE).contains(age));
        if let (Some(age), Some(years)) = (age, form.license_years()) {
            if years > age - MIN_LICENSING_AGE {
                result.add_warning(format!(
                    "{} licence years is unusual for a driver aged {}",
                    years, age
                ));
            }
        }
    }

    fn require_one_of(
        &self,
        form: &FormData,
        primary: FormField,
        alternative: FormField,
        result: &mut ValidationResult,
    ) {
        let primary_value = form.get(primary);
        let alternative_value = form.get(alternative);

        if primary_value.is_none() && alternative_value.is_none() {
            result.add_error(format!(
                "{} or {} is required",
                label(primary),
                label(alternative).to_lowercase()
            ));
            return;
        }
        for (field, value) in [(primary, primary_value), (alternative, alternative_value)] {
            if let Some(value) = value {
                result.add_field(self.validate_field(field, &value));
            }
        }
    }

    fn check_range(
        &self,
        field: FormField,
        value: &str,
        min: i64,
        max: i64,
        message: String,
    ) -> FieldValidation {
        match parse_integer(value) {
            Some(number) if (min..=max).contains(&number) => FieldValidation::ok(field),
            _ => FieldValidation::invalid(field, message),
        }
    }
}

fn check_parse<T: std::str::FromStr>(field: FormField, value: &str) -> FieldValidation {
    match value.parse::<T>() {
        Ok(_) => FieldValidation::ok(field),
        Err(_) => FieldValidation::invalid(field, format!("Please select a valid {}", label(field).to_lowercase())),
    }
}

/// Display label of a field used in messages
pub fn label(field: FormField) -> &'static str {
    match field {
        FormField::VehicleYear => "Vehicle year",
        FormField::Make => "Make",
        FormField::Model => "Model",
        FormField::AnnualMileage => "Annual mileage",
        FormField::EngineSize => "Engine size",
        FormField::FullName => "Full name",
        FormField::DriverAge => "Age",
        FormField::LicenseYears => "Licence years",
        FormField::ClaimsCount => "Claims count",
        FormField::Email => "Email",
        FormField::Phone => "Phone",
        FormField::Address => "Address",
        FormField::ExperienceBand => "Driving experience",
        FormField::AccidentsBand => "Accident history",
        FormField::UsageType => "Usage type",
        FormField::CoverageType => "Coverage type",
        FormField::ExcessAmount => "Excess amount",
        FormField::SecurityDevices => "Security devices",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> FormValidator {
        FormValidator::new(2025)
    }

    #[test]
    fn test_model_characters() {
        assert!(validator().validate_field(FormField::Model, "Corolla GR-Sport").valid);
        let check = validator().validate_field(FormField::Model, "Corolla!");
        assert!(!check.valid);
        assert_eq!(
            check.message.as_deref(),
            Some("Model can only contain letters, numbers, spaces, and hyphens")
        );
    }

    #[test]
    fn test_email_and_phone() {
        let v = validator();
        assert!(v.validate_field(FormField::Email, "mwila@example.co.zm").valid);
        assert!(!v.validate_field(FormField::Email, "mwila@example").valid);
        assert!(!v.validate_field(FormField::Email, "not an email").valid);

        assert!(v.validate_field(FormField::Phone, "0977123456").valid);
        assert!(!v.validate_field(FormField::Phone, "097712345").valid);
        assert!(!v.validate_field(FormField::Phone, "09771234ab").valid);
    }

    #[test]
    fn test_numeric_ranges() {
        let v = validator();
        assert!(v.validate_field(FormField::EngineSize, "1600").valid);
        assert!(!v.validate_field(FormField::EngineSize, "450").valid);
        assert!(v.validate_field(FormField::DriverAge, "18").valid);
        assert!(!v.validate_field(FormField::DriverAge, "17").valid);
        assert!(!v.validate_field(FormField::DriverAge, "101").valid);
        assert!(v.validate_field(FormField::VehicleYear, "2025").valid);
        assert!(!v.validate_field(FormField::VehicleYear, "2026").valid);
        assert!(!v.validate_field(FormField::VehicleYear, "1989").valid);
        assert!(v.validate_field(FormField::ClaimsCount, "20").valid);
        assert!(!v.validate_field(FormField::ClaimsCount, "21").valid);
        assert!(!v.validate_field(FormField::AnnualMileage, "-5").valid);
        assert!(v.validate_field(FormField::AnnualMileage, "12,000").valid);
    }

    #[test]
    fn test_grouped_numbers_accepted_like_the_estimator_reads_them() {
        let v = validator();
        assert!(v.validate_field(FormField::AnnualMileage, "12 000").valid);
        assert!(v.validate_field(FormField::EngineSize, "1 600").valid);

        let mut form = FormData::new();
        form.set(FormField::AnnualMileage, "12 000");
        assert_eq!(form.annual_mileage(), Some(12_000));
    }

    #[test]
    fn test_enumerated_values() {
        let v = validator();
        assert!(v.validate_field(FormField::CoverageType, "third-party-fire-theft").valid);
        assert!(!v.validate_field(FormField::CoverageType, "platinum").valid);
        assert!(v.validate_field(FormField::ExcessAmount, "5000").valid);
        assert!(!v.validate_field(FormField::ExcessAmount, "750").valid);
        assert!(v.validate_field(FormField::SecurityDevices, "alarm,tracker").valid);
        assert!(!v.validate_field(FormField::SecurityDevices, "alarm,dog").valid);
    }

    #[test]
    fn test_empty_value_is_required_error() {
        let check = validator().validate_field(FormField::FullName, "  ");
        assert!(!check.valid);
        assert_eq!(check.message.as_deref(), Some("Full name is required"));
    }

    #[test]
    fn test_vehicle_step_reports_each_missing_field() {
        let mut form = FormData::new();
        form.set(FormField::Make, "Toyota");
        let result = validator().validate_step(Step::Vehicle, &form);

        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn test_history_step_alternatives() {
        let v = validator();
        let mut form = FormData::new();
        form.set(FormField::ExperienceBand, "3-5");
        let result = v.validate_step(Step::History, &form);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);

        form.set(FormField::AccidentsBand, "0");
        assert!(v.validate_step(Step::History, &form).is_valid);

        form.set(FormField::ClaimsCount, "1");
        let result = v.validate_step(Step::History, &form);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_implausible_licence_years_warns() {
        let mut form = FormData::new();
        form.set(FormField::DriverAge, "20");
        form.set(FormField::LicenseYears, "10");
        form.set(FormField::ClaimsCount, "0");

        let result = validator().validate_step(Step::History, &form);
        assert!(result.is_valid);
        assert!(result.warnings[0].contains("unusual"));
    }

    #[test]
    fn test_extreme_driver_age_skips_licence_plausibility() {
        let mut form = FormData::new();
        form.set(FormField::DriverAge, "-9223372036854775808");
        form.set(FormField::LicenseYears, "0");
        form.set(FormField::ClaimsCount, "0");

        let result = validator().validate_step(Step::History, &form);
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());

        form.set(FormField::DriverAge, "9223372036854775807");
        form.set(FormField::LicenseYears, "9223372036854775807");
        let result = validator().validate_step(Step::History, &form);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_quote_step_has_no_requirements() {
        assert!(validator().validate_step(Step::Quote, &FormData::new()).is_valid);
    }
}
