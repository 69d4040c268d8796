//! Form Session Controller
//!
//! A `FormSession` is the explicit state of one user's progress through the
//! quotation form: the current step, the evolving form data and when it last
//! changed. Every mutation takes the current instant as an argument; nothing
//! here reads a clock or touches storage.
//!
//! # Steps
//!
//! ```text
//! 1 Vehicle -> 2 Driver -> 3 History -> 4 Usage -> 5 Coverage -> 6 Quote
//! ```
//!
//! Moving forward requires the current step to validate. Moving back is
//! always allowed, and the summary panel may jump straight back to any
//! earlier step.
//!
//! # Durable Form
//!
//! `SessionRecord` is what gets stored under the `insuranceQuote` key. It
//! carries the form version; a record written by another version is
//! rejected on restore and the caller starts afresh.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QuoteError;
use crate::form::{FormData, FormField};
use crate::validation::FormValidator;

/// Schema version of the stored session record
pub const FORM_VERSION: &str = "1.0.0";

/// Number of steps including the final quote step
pub const TOTAL_STEPS: u8 = 6;

/// A step of the quotation form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Step {
    Vehicle = 1,
    Driver = 2,
    History = 3,
    Usage = 4,
    Coverage = 5,
    Quote = 6,
}

impl Step {
    /// The steps that collect input, in order
    pub const INPUT_STEPS: [Step; 5] = [
        Step::Vehicle,
        Step::Driver,
        Step::History,
        Step::Usage,
        Step::Coverage,
    ];

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Step::Vehicle),
            2 => Some(Step::Driver),
            3 => Some(Step::History),
            4 => Some(Step::Usage),
            5 => Some(Step::Coverage),
            6 => Some(Step::Quote),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::Vehicle => "Vehicle Details",
            Step::Driver => "Driver Details",
            Step::History => "Driving History",
            Step::Usage => "Vehicle Usage",
            Step::Coverage => "Coverage Options",
            Step::Quote => "Your Quote",
        }
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(&self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    /// Fields that must be present and valid before leaving the step
    ///
    /// The history step has alternatives instead, checked by the validator.
    pub fn required_fields(&self) -> &'static [FormField] {
        match self {
            Step::Vehicle => &[
                FormField::Make,
                FormField::Model,
                FormField::VehicleYear,
                FormField::AnnualMileage,
            ],
            Step::Driver => &[
                FormField::FullName,
                FormField::DriverAge,
                FormField::Email,
                FormField::Phone,
            ],
            Step::Usage => &[FormField::UsageType],
            Step::Coverage => &[FormField::CoverageType, FormField::ExcessAmount],
            Step::History | Step::Quote => &[],
        }
    }

    /// Fields entered on the step that are validated only when present
    pub fn optional_fields(&self) -> &'static [FormField] {
        match self {
            Step::Vehicle => &[FormField::EngineSize],
            Step::Driver => &[FormField::Address],
            Step::Coverage => &[FormField::SecurityDevices],
            Step::History | Step::Usage | Step::Quote => &[],
        }
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> u8 {
        step.number()
    }
}

impl TryFrom<u8> for Step {
    type Error = QuoteError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Step::from_number(number).ok_or(QuoteError::InvalidStep(number))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}

/// Durable form of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub version: String,
    pub data: FormData,
    /// Step the user was on; older records may not carry it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<u8>,
    /// Time of the last change; older records may not carry it
    #[serde(default, rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One user's progress through the quotation form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSession {
    step: Step,
    data: FormData,
    updated_at: DateTime<Utc>,
}

impl FormSession {
    /// A blank form at the first step
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            step: Step::Vehicle,
            data: FormData::default(),
            updated_at: now,
        }
    }

    /// Restores a stored session
    ///
    /// Records written by another form version are rejected. An unknown
    /// stored step falls back to the first step, a missing change time to
    /// `now`.
    pub fn restore(record: SessionRecord, now: DateTime<Utc>) -> Result<Self, QuoteError> {
        if record.version != FORM_VERSION {
            return Err(QuoteError::VersionMismatch {
                expected: FORM_VERSION.to_string(),
                found: record.version,
            });
        }
        let step = record
            .step
            .and_then(Step::from_number)
            .unwrap_or(Step::Vehicle);

        Ok(Self {
            step,
            data: record.data,
            updated_at: record.updated_at.unwrap_or(now),
        })
    }

    /// A session holding previously saved form data, back at the first step
    pub fn with_data(data: FormData, now: DateTime<Utc>) -> Self {
        Self {
            step: Step::Vehicle,
            data,
            updated_at: now,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Merges the non-empty values of `fields`; set fields are never cleared
    pub fn update(&mut self, fields: &FormData, now: DateTime<Utc>) {
        self.data.merge(fields);
        self.updated_at = now;
    }

    /// Advances to the next step if the current one validates
    ///
    /// Stays on the quote step once there.
    pub fn next_step(&mut self, validator: &FormValidator, now: DateTime<Utc>) -> Result<Step, QuoteError> {
        let Some(next) = self.step.next() else {
            return Ok(self.step);
        };

        let result = validator.validate_step(self.step, &self.data);
        if !result.is_valid {
            return Err(QuoteError::IncompleteStep {
                step: self.step.number(),
                errors: result.errors,
            });
        }

        self.step = next;
        self.updated_at = now;
        Ok(next)
    }

    /// Goes back one step, staying on the first step once there
    pub fn previous_step(&mut self, now: DateTime<Utc>) -> Step {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
            self.updated_at = now;
        }
        self.step
    }

    /// Jumps back to an already visited step
    pub fn jump_to(&mut self, target: u8, now: DateTime<Utc>) -> Result<Step, QuoteError> {
        let step = Step::from_number(target)
            .filter(|step| *step <= self.step)
            .ok_or(QuoteError::InvalidStep(target))?;

        self.step = step;
        self.updated_at = now;
        Ok(step)
    }

    /// Clears all data and returns to the first step
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.data = FormData::default();
        self.step = Step::Vehicle;
        self.updated_at = now;
    }

    /// Read-only copy of the form data for the estimator
    pub fn snapshot(&self) -> FormData {
        self.data.clone()
    }

    /// Progress through the form as a whole percentage
    pub fn progress_percent(&self) -> u8 {
        let step = u32::from(self.step.number());
        let total = u32::from(TOTAL_STEPS);
        // Rounded to nearest
        ((step * 100 + total / 2) / total) as u8
    }

    pub fn is_quote_step(&self) -> bool {
        self.step == Step::Quote
    }

    /// The record to persist for this session
    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            version: FORM_VERSION.to_string(),
            data: self.data.clone(),
            step: Some(self.step.number()),
            updated_at: Some(self.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 17, 9, 25, 0).unwrap()
    }

    fn validator() -> FormValidator {
        FormValidator::new(2025)
    }

    fn vehicle_fields() -> FormData {
        let mut form = FormData::new();
        form.set(FormField::Make, "Toyota");
        form.set(FormField::Model, "Corolla");
        form.set(FormField::VehicleYear, "2020");
        form.set(FormField::AnnualMileage, "12000");
        form
    }

    #[test]
    fn test_next_step_refuses_invalid_input() {
        let mut session = FormSession::new(now());
        let err = session.next_step(&validator(), now()).unwrap_err();

        match err {
            QuoteError::IncompleteStep { step, errors } => {
                assert_eq!(step, 1);
                assert_eq!(errors.len(), 4);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(session.step(), Step::Vehicle);
    }

    #[test]
    fn test_next_step_advances_when_valid() {
        let mut session = FormSession::new(now());
        session.update(&vehicle_fields(), now());

        assert_eq!(session.next_step(&validator(), now()).unwrap(), Step::Driver);
        assert_eq!(session.progress_percent(), 33);
    }

    #[test]
    fn test_previous_step_saturates() {
        let mut session = FormSession::new(now());
        assert_eq!(session.previous_step(now()), Step::Vehicle);
    }

    #[test]
    fn test_jump_only_backwards() {
        let mut session = FormSession::new(now());
        session.update(&vehicle_fields(), now());
        session.next_step(&validator(), now()).unwrap();

        assert!(matches!(session.jump_to(3, now()), Err(QuoteError::InvalidStep(3))));
        assert!(matches!(session.jump_to(0, now()), Err(QuoteError::InvalidStep(0))));
        assert_eq!(session.jump_to(1, now()).unwrap(), Step::Vehicle);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = FormSession::new(now());
        session.update(&vehicle_fields(), now());
        session.next_step(&validator(), now()).unwrap();
        session.reset(now());

        assert_eq!(session.step(), Step::Vehicle);
        assert!(session.data().is_empty());
    }

    #[test]
    fn test_record_round_trip_and_version_policy() {
        let mut session = FormSession::new(now());
        session.update(&vehicle_fields(), now());
        session.next_step(&validator(), now()).unwrap();

        let record = session.to_record();
        assert_eq!(record.version, FORM_VERSION);
        let restored = FormSession::restore(record.clone(), now()).unwrap();
        assert_eq!(restored.step(), Step::Driver);
        assert_eq!(restored.data(), session.data());

        let stale = SessionRecord {
            version: "0.9.0".into(),
            ..record
        };
        assert!(matches!(
            FormSession::restore(stale, now()),
            Err(QuoteError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_record_without_step_starts_at_vehicle() {
        let record: SessionRecord =
            serde_json::from_str(r#"{"version":"1.0.0","data":{"make":"Mazda"}}"#).unwrap();
        let session = FormSession::restore(record, now()).unwrap();
        assert_eq!(session.step(), Step::Vehicle);
        assert_eq!(session.data().make.as_deref(), Some("Mazda"));
        assert_eq!(session.updated_at(), now());
    }

    #[test]
    fn test_restore_keeps_last_change_time() {
        let edited_at = now() - chrono::Duration::minutes(20);
        let mut session = FormSession::new(edited_at);
        session.update(&vehicle_fields(), edited_at);

        let record = session.to_record();
        assert_eq!(record.updated_at, Some(edited_at));
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["updatedAt"].is_string());

        let restored = FormSession::restore(record, now()).unwrap();
        assert_eq!(restored.updated_at(), edited_at);
    }

    #[test]
    fn test_progress_and_quote_step() {
        assert_eq!(FormSession::new(now()).progress_percent(), 17);
        let session = FormSession {
            step: Step::Quote,
            data: FormData::new(),
            updated_at: now(),
        };
        assert_eq!(session.progress_percent(), 100);
        assert!(session.is_quote_step());
    }
}
