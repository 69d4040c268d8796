//! Quotation form data
//!
//! `FormData` is the sparse record collected across the form steps. Every
//! field is optional and kept as the raw string the user typed, so that
//! a half-finished form can always be stored and restored. Typed accessors
//! parse on demand; anything unparseable reads as absent.
//!
//! Enumerated inputs (usage, coverage, excess, bands, security devices) have
//! their own types here with `FromStr` implementations accepting the wire
//! values used by the form.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::QuoteError;

/// Sparse record of everything entered on the quotation form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    // Vehicle
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub vehicle_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub annual_mileage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub engine_size: Option<String>,

    // Driver
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub driver_age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub license_years: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub claims_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub address: Option<String>,

    // History
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub experience_band: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub accidents_band: Option<String>,

    // Usage
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub usage_type: Option<String>,

    // Coverage
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub coverage_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub excess_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_devices: Option<BTreeSet<String>>,
}

/// Accepts strings, numbers and booleans for a text field; `null` is absent
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

/// Parses an integer the way users type it: surrounding whitespace and
/// thousands separators are tolerated
/// Parses a whole number, ignoring thousands separators and spaces
pub(crate) fn parse_integer(raw: &str) -> Option<i64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != ' ')
        .collect();
    cleaned.parse().ok()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl FormData {
    /// Creates an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when no field has been entered
    pub fn is_empty(&self) -> bool {
        FormField::ALL
            .iter()
            .all(|field| self.get(*field).is_none())
    }

    /// Returns the trimmed, non-empty value of a field
    ///
    /// Security devices are rendered as a comma-separated list.
    pub fn get(&self, field: FormField) -> Option<String> {
        match field {
            FormField::SecurityDevices => self
                .security_devices
                .as_ref()
                .filter(|devices| !devices.is_empty())
                .map(|devices| devices.iter().cloned().collect::<Vec<_>>().join(",")),
            other => self.slot(other).and_then(non_empty).map(str::to_string),
        }
    }

    /// Sets a field from its raw string value
    ///
    /// Empty values are ignored: a set field is only cleared by a reset.
    /// Security devices accept a comma-separated list.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return;
        }
        match field {
            FormField::SecurityDevices => {
                let devices: BTreeSet<String> = trimmed
                    .split(',')
                    .map(|d| d.trim().to_lowercase())
                    .filter(|d| !d.is_empty())
                    .collect();
                if !devices.is_empty() {
                    self.security_devices = Some(devices);
                }
            }
            other => {
                if let Some(slot) = self.slot_mut(other) {
                    *slot = Some(trimmed.to_string());
                }
            }
        }
    }

    /// Merges the non-empty values of `update` into this form
    ///
    /// Fields absent or empty in `update` keep their current value.
    pub fn merge(&mut self, update: &FormData) {
        for field in FormField::ALL {
            if let Some(value) = update.get(field) {
                self.set(field, value);
            }
        }
    }

    fn slot(&self, field: FormField) -> Option<&Option<String>> {
        let slot = match field {
            FormField::VehicleYear => &self.vehicle_year,
            FormField::Make => &self.make,
            FormField::Model => &self.model,
            FormField::AnnualMileage => &self.annual_mileage,
            FormField::EngineSize => &self.engine_size,
            FormField::FullName => &self.full_name,
            FormField::DriverAge => &self.driver_age,
            FormField::LicenseYears => &self.license_years,
            FormField::ClaimsCount => &self.claims_count,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
            FormField::Address => &self.address,
            FormField::ExperienceBand => &self.experience_band,
            FormField::AccidentsBand => &self.accidents_band,
            FormField::UsageType => &self.usage_type,
            FormField::CoverageType => &self.coverage_type,
            FormField::ExcessAmount => &self.excess_amount,
            FormField::SecurityDevices => return None,
        };
        Some(slot)
    }

    fn slot_mut(&mut self, field: FormField) -> Option<&mut Option<String>> {
        let slot = match field {
            FormField::VehicleYear => &mut self.vehicle_year,
            FormField::Make => &mut self.make,
            FormField::Model => &mut self.model,
            FormField::AnnualMileage => &mut self.annual_mileage,
            FormField::EngineSize => &mut self.engine_size,
            FormField::FullName => &mut self.full_name,
            FormField::DriverAge => &mut self.driver_age,
            FormField::LicenseYears => &mut self.license_years,
            FormField::ClaimsCount => &mut self.claims_count,
            FormField::Email => &mut self.email,
            FormField::Phone => &mut self.phone,
            FormField::Address => &mut self.address,
            FormField::ExperienceBand => &mut self.experience_band,
            FormField::AccidentsBand => &mut self.accidents_band,
            FormField::UsageType => &mut self.usage_type,
            FormField::CoverageType => &mut self.coverage_type,
            FormField::ExcessAmount => &mut self.excess_amount,
            FormField::SecurityDevices => return None,
        };
        Some(slot)
    }

    // Typed accessors

    pub fn vehicle_year(&self) -> Option<i64> {
        non_empty(&self.vehicle_year).and_then(parse_integer)
    }

    pub fn annual_mileage(&self) -> Option<i64> {
        non_empty(&self.annual_mileage).and_then(parse_integer)
    }

    pub fn engine_size(&self) -> Option<i64> {
        non_empty(&self.engine_size).and_then(parse_integer)
    }

    pub fn driver_age(&self) -> Option<i64> {
        non_empty(&self.driver_age).and_then(parse_integer)
    }

    pub fn license_years(&self) -> Option<i64> {
        non_empty(&self.license_years).and_then(parse_integer)
    }

    pub fn claims_count(&self) -> Option<i64> {
        non_empty(&self.claims_count).and_then(parse_integer)
    }

    pub fn experience_band(&self) -> Option<ExperienceBand> {
        non_empty(&self.experience_band).and_then(|v| v.parse().ok())
    }

    pub fn accidents_band(&self) -> Option<AccidentsBand> {
        non_empty(&self.accidents_band).and_then(|v| v.parse().ok())
    }

    pub fn usage_type(&self) -> Option<UsageType> {
        non_empty(&self.usage_type).and_then(|v| v.parse().ok())
    }

    pub fn coverage_type(&self) -> Option<CoverageType> {
        non_empty(&self.coverage_type).and_then(|v| v.parse().ok())
    }

    pub fn excess_amount(&self) -> Option<ExcessAmount> {
        non_empty(&self.excess_amount).and_then(|v| v.parse().ok())
    }

    /// Recognised security devices; unknown names are skipped
    pub fn security_devices(&self) -> BTreeSet<SecurityDevice> {
        self.security_devices
            .iter()
            .flatten()
            .filter_map(|name| name.parse().ok())
            .collect()
    }
}

/// Identifies a single form field by its wire name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    VehicleYear,
    Make,
    Model,
    AnnualMileage,
    EngineSize,
    FullName,
    DriverAge,
    LicenseYears,
    ClaimsCount,
    Email,
    Phone,
    Address,
    ExperienceBand,
    AccidentsBand,
    UsageType,
    CoverageType,
    ExcessAmount,
    SecurityDevices,
}

impl FormField {
    /// Every field, in form order
    pub const ALL: [FormField; 18] = [
        FormField::VehicleYear,
        FormField::Make,
        FormField::Model,
        FormField::AnnualMileage,
        FormField::EngineSize,
        FormField::FullName,
        FormField::DriverAge,
        FormField::LicenseYears,
        FormField::ClaimsCount,
        FormField::Email,
        FormField::Phone,
        FormField::Address,
        FormField::ExperienceBand,
        FormField::AccidentsBand,
        FormField::UsageType,
        FormField::CoverageType,
        FormField::ExcessAmount,
        FormField::SecurityDevices,
    ];

    /// The camelCase name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::VehicleYear => "vehicleYear",
            FormField::Make => "make",
            FormField::Model => "model",
            FormField::AnnualMileage => "annualMileage",
            FormField::EngineSize => "engineSize",
            FormField::FullName => "fullName",
            FormField::DriverAge => "driverAge",
            FormField::LicenseYears => "licenseYears",
            FormField::ClaimsCount => "claimsCount",
            FormField::Email => "email",
            FormField::Phone => "phone",
            FormField::Address => "address",
            FormField::ExperienceBand => "experienceBand",
            FormField::AccidentsBand => "accidentsBand",
            FormField::UsageType => "usageType",
            FormField::CoverageType => "coverageType",
            FormField::ExcessAmount => "excessAmount",
            FormField::SecurityDevices => "securityDevices",
        }
    }

    /// The form step (1 to 5) on which the field is entered
    pub fn step(&self) -> u8 {
        match self {
            FormField::VehicleYear
            | FormField::Make
            | FormField::Model
            | FormField::AnnualMileage
            | FormField::EngineSize => 1,
            FormField::FullName
            | FormField::DriverAge
            | FormField::Email
            | FormField::Phone
            | FormField::Address => 2,
            FormField::LicenseYears
            | FormField::ClaimsCount
            | FormField::ExperienceBand
            | FormField::AccidentsBand => 3,
            FormField::UsageType => 4,
            FormField::CoverageType | FormField::ExcessAmount | FormField::SecurityDevices => 5,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s.trim())
            .ok_or_else(|| QuoteError::validation(format!("Unknown form field: {}", s)))
    }
}

/// Self-declared driving experience band, used when the exact number of
/// licence years is not given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceBand {
    #[serde(rename = "0-2")]
    UpToTwo,
    #[serde(rename = "3-5")]
    ThreeToFive,
    #[serde(rename = "6+")]
    SixPlus,
}

impl ExperienceBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceBand::UpToTwo => "0-2",
            ExperienceBand::ThreeToFive => "3-5",
            ExperienceBand::SixPlus => "6+",
        }
    }
}

impl FromStr for ExperienceBand {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0-2" => Ok(ExperienceBand::UpToTwo),
            "3-5" => Ok(ExperienceBand::ThreeToFive),
            "6+" => Ok(ExperienceBand::SixPlus),
            other => Err(QuoteError::validation(format!("Unknown experience band: {}", other))),
        }
    }
}

/// Self-declared accident history band, used when the exact claims count is
/// not given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccidentsBand {
    #[serde(rename = "0")]
    None,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2+")]
    TwoOrMore,
}

impl AccidentsBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccidentsBand::None => "0",
            AccidentsBand::One => "1",
            AccidentsBand::TwoOrMore => "2+",
        }
    }
}

impl FromStr for AccidentsBand {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(AccidentsBand::None),
            "1" => Ok(AccidentsBand::One),
            "2+" => Ok(AccidentsBand::TwoOrMore),
            other => Err(QuoteError::validation(format!("Unknown accidents band: {}", other))),
        }
    }
}

/// How the vehicle is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageType {
    Private,
    Mixed,
    Commercial,
}

impl UsageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageType::Private => "private",
            UsageType::Mixed => "mixed",
            UsageType::Commercial => "commercial",
        }
    }
}

impl FromStr for UsageType {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "private" => Ok(UsageType::Private),
            "mixed" => Ok(UsageType::Mixed),
            "commercial" => Ok(UsageType::Commercial),
            other => Err(QuoteError::validation(format!("Unknown usage type: {}", other))),
        }
    }
}

/// Breadth of cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoverageType {
    ThirdParty,
    ThirdPartyFireTheft,
    Standard,
    Comprehensive,
}

impl CoverageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageType::ThirdParty => "third-party",
            CoverageType::ThirdPartyFireTheft => "third-party-fire-theft",
            CoverageType::Standard => "standard",
            CoverageType::Comprehensive => "comprehensive",
        }
    }

    /// Human readable name shown on the summary panel
    pub fn label(&self) -> &'static str {
        match self {
            CoverageType::ThirdParty => "Third Party Only",
            CoverageType::ThirdPartyFireTheft => "Third Party, Fire & Theft",
            CoverageType::Standard => "Standard",
            CoverageType::Comprehensive => "Comprehensive",
        }
    }
}

impl FromStr for CoverageType {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "third-party" => Ok(CoverageType::ThirdParty),
            "third-party-fire-theft" => Ok(CoverageType::ThirdPartyFireTheft),
            "standard" => Ok(CoverageType::Standard),
            "comprehensive" => Ok(CoverageType::Comprehensive),
            other => Err(QuoteError::validation(format!("Unknown coverage type: {}", other))),
        }
    }
}

/// Voluntary excess options offered on the coverage step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExcessAmount {
    K250,
    K500,
    K1000,
    K1500,
    K2000,
    K5000,
}

impl ExcessAmount {
    /// Every option, from lowest to highest excess
    pub const ALL: [ExcessAmount; 6] = [
        ExcessAmount::K250,
        ExcessAmount::K500,
        ExcessAmount::K1000,
        ExcessAmount::K1500,
        ExcessAmount::K2000,
        ExcessAmount::K5000,
    ];

    /// The excess in whole Kwacha
    pub fn kwacha(&self) -> u32 {
        match self {
            ExcessAmount::K250 => 250,
            ExcessAmount::K500 => 500,
            ExcessAmount::K1000 => 1000,
            ExcessAmount::K1500 => 1500,
            ExcessAmount::K2000 => 2000,
            ExcessAmount::K5000 => 5000,
        }
    }

    pub fn from_kwacha(amount: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| i64::from(e.kwacha()) == amount)
    }
}

impl FromStr for ExcessAmount {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('K')
            .or_else(|| trimmed.strip_prefix('k'))
            .unwrap_or(trimmed);
        parse_integer(digits)
            .and_then(ExcessAmount::from_kwacha)
            .ok_or_else(|| QuoteError::validation(format!("Unknown excess amount: {}", s)))
    }
}

impl fmt::Display for ExcessAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kwacha())
    }
}

/// Anti-theft devices fitted to the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityDevice {
    Alarm,
    Immobilizer,
    Tracker,
}

impl SecurityDevice {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityDevice::Alarm => "alarm",
            SecurityDevice::Immobilizer => "immobilizer",
            SecurityDevice::Tracker => "tracker",
        }
    }
}

impl FromStr for SecurityDevice {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alarm" => Ok(SecurityDevice::Alarm),
            "immobilizer" | "immobiliser" => Ok(SecurityDevice::Immobilizer),
            "tracker" => Ok(SecurityDevice::Tracker),
            other => Err(QuoteError::validation(format!("Unknown security device: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_parsing_tolerates_separators() {
        let mut form = FormData::new();
        form.set(FormField::AnnualMileage, " 12,000 ");
        assert_eq!(form.annual_mileage(), Some(12_000));

        form.set(FormField::DriverAge, "thirty");
        assert_eq!(form.driver_age(), None);
    }

    #[test]
    fn test_empty_update_never_clears() {
        let mut form = FormData::new();
        form.set(FormField::Make, "Toyota");
        form.set(FormField::Make, "   ");
        assert_eq!(form.make.as_deref(), Some("Toyota"));

        let update = FormData {
            make: Some(String::new()),
            model: Some("Corolla".into()),
            ..FormData::default()
        };
        form.merge(&update);
        assert_eq!(form.make.as_deref(), Some("Toyota"));
        assert_eq!(form.model.as_deref(), Some("Corolla"));
    }

    #[test]
    fn test_security_devices_list() {
        let mut form = FormData::new();
        form.set(FormField::SecurityDevices, "Alarm, tracker,unknown");
        let devices = form.security_devices();
        assert!(devices.contains(&SecurityDevice::Alarm));
        assert!(devices.contains(&SecurityDevice::Tracker));
        assert_eq!(devices.len(), 2);
        assert_eq!(form.get(FormField::SecurityDevices).as_deref(), Some("alarm,tracker,unknown"));
    }

    #[test]
    fn test_camel_case_serde_and_unknown_keys() {
        let json = r#"{"vehicleYear": 2020, "coverageType": "comprehensive",
                       "securityDevices": ["alarm"], "favouriteColour": "red"}"#;
        let form: FormData = serde_json::from_str(json).unwrap();
        assert_eq!(form.vehicle_year.as_deref(), Some("2020"));
        assert_eq!(form.coverage_type(), Some(CoverageType::Comprehensive));

        let out = serde_json::to_value(&form).unwrap();
        assert_eq!(out["vehicleYear"], "2020");
        assert!(out.get("make").is_none());
    }

    #[test]
    fn test_excess_parsing() {
        assert_eq!("1000".parse::<ExcessAmount>().unwrap(), ExcessAmount::K1000);
        assert_eq!("K5,000".parse::<ExcessAmount>().unwrap(), ExcessAmount::K5000);
        assert!("750".parse::<ExcessAmount>().is_err());
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in FormField::ALL {
            assert_eq!(field.as_str().parse::<FormField>().unwrap(), field);
        }
        assert!("colour".parse::<FormField>().is_err());
    }

    #[test]
    fn test_is_empty() {
        assert!(FormData::new().is_empty());
        let form = FormData {
            address: Some("  ".into()),
            ..FormData::default()
        };
        assert!(form.is_empty());
    }
}
