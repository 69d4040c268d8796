//! Unit tests for the Money module
//!
//! Tests cover Kwacha creation, rounding to whole units and the display
//! format used on quote summaries.

use core_kernel::{Currency, Money};
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_kwacha_creates_zmw_money() {
        let m = Money::kwacha(dec!(500));
        assert_eq!(m.amount(), dec!(500));
        assert_eq!(m.currency(), Currency::ZMW);
    }

    #[test]
    fn test_default_currency_is_kwacha() {
        assert_eq!(Currency::default(), Currency::ZMW);
        assert_eq!(Currency::ZMW.symbol(), "K");
    }

    #[test]
    fn test_currency_serializes_as_iso_code() {
        let json = serde_json::to_string(&Money::kwacha(dec!(350))).unwrap();
        assert!(json.contains("\"ZMW\""));
    }
}

mod rounding_and_display {
    use super::*;

    #[test]
    fn test_round_whole_midpoint_goes_up_for_positive_amounts() {
        assert_eq!(Money::kwacha(dec!(0.5)).round_whole().amount(), dec!(1));
        assert_eq!(Money::kwacha(dec!(349.99)).round_whole().amount(), dec!(350));
    }

    #[test]
    fn test_display_whole_rounds_before_grouping() {
        assert_eq!(Money::kwacha(dec!(1462.5)).display_whole(), "K1,463");
        assert_eq!(Money::kwacha(dec!(999.5)).display_whole(), "K1,000");
    }

    #[test]
    fn test_display_whole_negative_amount() {
        assert_eq!(Money::kwacha(dec!(-1500)).display_whole(), "-K1,500");
    }
}
