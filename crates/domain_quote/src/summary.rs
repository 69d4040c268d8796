//! Summary panel model
//!
//! Labelled items shown beside the form once the user is past the first
//! step. Items remember the step that owns them so the panel can jump back.

use rust_decimal::Decimal;
use serde::Serialize;

use core_kernel::Money;

use crate::breakdown::PremiumBreakdown;
use crate::form::FormData;
use crate::session::Step;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryItem {
    pub label: &'static str,
    pub value: String,
    pub step: Step,
    /// True when the owning step is behind the current one
    pub jumpable: bool,
}

/// Renders a Kwacha amount rounded to whole units, e.g. `K1,463`
pub fn format_kwacha(amount: Decimal) -> String {
    Money::kwacha(amount).display_whole()
}

/// Builds the summary items for the given form, omitting empty ones
///
/// The estimated quote is included only when a breakdown is supplied.
pub fn summary_items(
    form: &FormData,
    breakdown: Option<&PremiumBreakdown>,
    current_step: Step,
) -> Vec<SummaryItem> {
    let vehicle = [&form.vehicle_year, &form.make, &form.model]
        .into_iter()
        .filter_map(|part| part.as_deref().map(str::trim))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let driver = form.full_name.as_deref().unwrap_or_default().trim().to_string();

    let coverage = form
        .coverage_type()
        .map(|coverage| coverage.label().to_string())
        .unwrap_or_default();

    let excess = form
        .excess_amount()
        .map(|excess| format_kwacha(Decimal::from(excess.kwacha())))
        .unwrap_or_default();

    let quote = breakdown
        .map(|breakdown| format_kwacha(breakdown.total))
        .unwrap_or_default();

    [
        ("Vehicle", vehicle, Step::Vehicle),
        ("Driver", driver, Step::Driver),
        ("Coverage", coverage, Step::Coverage),
        ("Excess", excess, Step::Coverage),
        ("Estimated Quote", quote, Step::Coverage),
    ]
    .into_iter()
    .filter(|(_, value, _)| !value.is_empty())
    .map(|(label, value, step)| SummaryItem {
        label,
        value,
        step,
        jumpable: step < current_step,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormField;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_kwacha() {
        assert_eq!(format_kwacha(dec!(1463)), "K1,463");
        assert_eq!(format_kwacha(dec!(350)), "K350");
    }

    #[test]
    fn test_items_skip_empty_values() {
        let mut form = FormData::new();
        form.set(FormField::Make, "Toyota");
        form.set(FormField::VehicleYear, "2020");
        form.set(FormField::ExcessAmount, "1000");

        let items = summary_items(&form, None, Step::Driver);
        let labels: Vec<_> = items.iter().map(|item| item.label).collect();
        assert_eq!(labels, vec!["Vehicle", "Excess"]);
        assert_eq!(items[0].value, "2020 Toyota");
        assert!(items[0].jumpable);
        assert_eq!(items[1].value, "K1,000");
        assert!(!items[1].jumpable);
    }

    #[test]
    fn test_estimated_quote_item() {
        let mut form = FormData::new();
        form.set(FormField::CoverageType, "third-party-fire-theft");
        let breakdown = PremiumBreakdown::neutral(dec!(200));

        let items = summary_items(&form, Some(&breakdown), Step::Quote);
        assert_eq!(items[0].value, "Third Party, Fire & Theft");
        assert_eq!(items[1].label, "Estimated Quote");
        assert_eq!(items[1].value, "K200");
        assert!(items.iter().all(|item| item.jumpable));
    }
}
