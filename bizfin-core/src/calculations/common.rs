//! Shared helpers for tax calculations.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up
/// rounding (away from zero at the midpoint), the conventional treatment
/// for dollar amounts.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use bizfin_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Formats a dollar amount with a thousands separator, e.g. `$11,600` or
/// `$1,234.56`. Trailing fraction zeros are dropped for whole amounts.
pub fn format_dollars(amount: Decimal) -> String {
    let s = amount.normalize().to_string();
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s.as_str(), None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}${grouped}.{frac}"),
        None => format!("{sign}${grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_rounds_away_from_zero_for_negatives() {
        assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
    }

    #[test]
    fn round_half_up_preserves_already_rounded_values() {
        assert_eq!(round_half_up(dec!(123.45)), dec!(123.45));
    }

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
        assert_eq!(max(dec!(200.00), dec!(100.00)), dec!(200.00));
        assert_eq!(max(dec!(-50.00), dec!(50.00)), dec!(50.00));
    }

    #[test]
    fn format_dollars_groups_thousands() {
        assert_eq!(format_dollars(dec!(11600)), "$11,600");
        assert_eq!(format_dollars(dec!(609350)), "$609,350");
        assert_eq!(format_dollars(dec!(1234567)), "$1,234,567");
    }

    #[test]
    fn format_dollars_keeps_cents_and_drops_trailing_zeros() {
        assert_eq!(format_dollars(dec!(1234.56)), "$1,234.56");
        assert_eq!(format_dollars(dec!(1234.50)), "$1,234.5");
        assert_eq!(format_dollars(dec!(1500.00)), "$1,500");
    }

    #[test]
    fn format_dollars_handles_small_and_negative_amounts() {
        assert_eq!(format_dollars(dec!(0)), "$0");
        assert_eq!(format_dollars(dec!(999)), "$999");
        assert_eq!(format_dollars(dec!(-1500)), "-$1,500");
    }
}
