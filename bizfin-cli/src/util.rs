use anyhow::{Result, bail};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use bizfin_core::calculations::common::{format_dollars, round_half_up};

/// Parses a date the way the entry forms accept it: ISO `YYYY-MM-DD`
/// first, `MM/DD/YYYY` as a fallback. Anything else is rejected here so
/// the calculator never sees a malformed date.
pub fn parse_flexible_date(s: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%m/%d/%Y") {
        return Ok(date);
    }
    bail!("invalid date '{s}'; expected YYYY-MM-DD or MM/DD/YYYY")
}

/// Dollar display: rounded to cents, thousands-separated.
pub fn usd(amount: Decimal) -> String {
    format_dollars(round_half_up(amount))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parses_iso_dates() {
        let date = parse_flexible_date("2024-03-10").expect("iso date");
        assert_eq!(date.to_string(), "2024-03-10");
    }

    #[test]
    fn falls_back_to_us_format() {
        let date = parse_flexible_date("03/10/2024").expect("us date");
        assert_eq!(date.to_string(), "2024-03-10");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_flexible_date("next tuesday").is_err());
    }

    #[test]
    fn usd_rounds_and_groups() {
        assert_eq!(usd(dec!(14129.554)), "$14,129.55");
        assert_eq!(usd(dec!(1500)), "$1,500");
    }
}
