//! Minor-currency-unit formatting and parsing.
//!
//! Prices are carried everywhere as integer minor units (cents) to avoid
//! floating-point drift; conversion to and from the display format
//! (comma-decimal, ` €` suffix, e.g. `"4,50 €"`) happens only at the edges:
//! [`format_minor`] when writing a price into a UI region, and
//! [`parse_display_to_minor`] when a human types a decimal price into the
//! quick-add form. Neither function is ever applied to a value that is
//! already in minor units.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Format integer minor units as a display string (`450` → `"4,50 €"`).
///
/// Total over all of `i64`: negative input formats as the zero display.
#[must_use]
pub fn format_minor(minor: i64) -> String {
    let minor = minor.max(0);
    format!("{},{:02} €", minor / 100, minor % 100)
}

/// Format an optional minor-unit amount; absent maps to the zero display.
#[must_use]
pub fn format_minor_opt(minor: Option<i64>) -> String {
    format_minor(minor.unwrap_or(0))
}

/// Parse a human-entered decimal price string into integer minor units.
///
/// Accepts either comma or period as the decimal separator, trims
/// surrounding whitespace, ignores a trailing currency suffix, and rounds
/// to the nearest minor unit. Unparseable input yields `0`.
#[must_use]
pub fn parse_display_to_minor(input: &str) -> i64 {
    let normalized = input.trim().replace(',', ".");

    // Leading numeric prefix only, so "4,50 €" parses as 4.50.
    let mut end = 0;
    for (i, c) in normalized.char_indices() {
        if c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+')) {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }

    let Ok(value) = Decimal::from_str(normalized.get(..end).unwrap_or("")) else {
        return 0;
    };

    (value * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minor_units_with_comma_decimal() {
        assert_eq!(format_minor(450), "4,50 €");
        assert_eq!(format_minor(500), "5,00 €");
        assert_eq!(format_minor(5), "0,05 €");
        assert_eq!(format_minor(123_456), "1234,56 €");
        assert_eq!(format_minor(0), "0,00 €");
    }

    #[test]
    fn negative_and_absent_amounts_format_as_zero() {
        assert_eq!(format_minor(-250), "0,00 €");
        assert_eq!(format_minor_opt(None), "0,00 €");
        assert_eq!(format_minor_opt(Some(250)), "2,50 €");
    }

    #[test]
    fn parses_both_decimal_separators() {
        assert_eq!(parse_display_to_minor("4.50"), 450);
        assert_eq!(parse_display_to_minor("4,50"), 450);
        assert_eq!(parse_display_to_minor("  12,00  "), 1200);
        assert_eq!(parse_display_to_minor("3"), 300);
    }

    #[test]
    fn unparseable_input_is_zero() {
        assert_eq!(parse_display_to_minor(""), 0);
        assert_eq!(parse_display_to_minor("   "), 0);
        assert_eq!(parse_display_to_minor("abc"), 0);
        assert_eq!(parse_display_to_minor("€"), 0);
    }

    #[test]
    fn rounds_to_nearest_minor_unit() {
        assert_eq!(parse_display_to_minor("4.505"), 451);
        assert_eq!(parse_display_to_minor("4.504"), 450);
        assert_eq!(parse_display_to_minor("0.999"), 100);
    }

    #[test]
    fn display_round_trips_to_minor_units() {
        for minor in [0, 1, 5, 99, 100, 250, 450, 999, 1000, 123_456, 999_999] {
            let display = format_minor(minor);
            assert_eq!(parse_display_to_minor(&display), minor, "{display}");
        }
    }
}
