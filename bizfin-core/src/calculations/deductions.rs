//! Deduction math for mileage, utilities, and the home office.
//!
//! These are the Schedule C worksheet rules the ledger applies when a record
//! is created or updated: the standard mileage rate, the business-percentage
//! split for utilities, and the two home office methods (simplified per
//! square foot with a cap, or actual with a business-use percentage).

use rust_decimal::Decimal;
use thiserror::Error;

use crate::calculations::common::round_half_up;
use crate::models::{HomeOfficeMethod, NewHomeOffice};

/// Errors that can occur when deriving deductions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeductionError {
    /// The home's total square footage must be positive; a zero area would
    /// make the business percentage undefined.
    #[error("home square footage must be positive, got {0}")]
    ZeroHomeArea(i64),
}

/// IRS standard mileage rate for 2024, dollars per business mile.
pub fn standard_mileage_rate() -> Decimal {
    Decimal::new(67, 2)
}

/// Simplified-method rate, dollars per square foot of office space.
fn simplified_rate() -> Decimal {
    Decimal::from(5)
}

/// Simplified-method cap on the annual deduction.
fn simplified_cap() -> Decimal {
    Decimal::from(1_500)
}

/// Deduction for a logged trip: miles times the standard mileage rate,
/// rounded to cents.
pub fn mileage_deduction(miles: Decimal) -> Decimal {
    round_half_up(miles * standard_mileage_rate())
}

/// Monthly and annual deduction for a utility at the given business-use
/// percentage (0–100).
pub fn utility_deduction(
    monthly_amount: Decimal,
    business_percentage: Decimal,
) -> (Decimal, Decimal) {
    let monthly = round_half_up(monthly_amount * business_percentage / Decimal::ONE_HUNDRED);
    let annual = monthly * Decimal::from(12);
    (monthly, annual)
}

/// Simplified-method home office: $5 per square foot, capped at $1,500.
pub fn simplified_home_office(square_feet: i64) -> NewHomeOffice {
    let raw = Decimal::from(square_feet) * simplified_rate();
    NewHomeOffice {
        method: HomeOfficeMethod::Simplified,
        office_square_feet: square_feet,
        home_square_feet: None,
        business_percentage: None,
        annual_deduction: raw.min(simplified_cap()),
    }
}

/// Actual-method home office: records the business-use percentage
/// (office area over home area); actual costs flow in through the
/// utilities ledger, so the annual deduction starts at zero.
///
/// # Errors
///
/// Returns [`DeductionError::ZeroHomeArea`] when `home_square_feet` is not
/// positive — the percentage would otherwise be a division by zero.
pub fn actual_home_office(
    home_square_feet: i64,
    office_square_feet: i64,
) -> Result<NewHomeOffice, DeductionError> {
    if home_square_feet <= 0 {
        return Err(DeductionError::ZeroHomeArea(home_square_feet));
    }

    let percentage = round_half_up(
        Decimal::from(office_square_feet) / Decimal::from(home_square_feet)
            * Decimal::ONE_HUNDRED,
    );

    Ok(NewHomeOffice {
        method: HomeOfficeMethod::Actual,
        office_square_feet,
        home_square_feet: Some(home_square_feet),
        business_percentage: Some(percentage),
        annual_deduction: Decimal::ZERO,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn mileage_deduction_applies_standard_rate() {
        assert_eq!(mileage_deduction(dec!(100)), dec!(67.00));
    }

    #[test]
    fn mileage_deduction_rounds_to_cents() {
        // 12.5 × 0.67 = 8.375, rounds to 8.38
        assert_eq!(mileage_deduction(dec!(12.5)), dec!(8.38));
    }

    #[test]
    fn utility_deduction_splits_by_business_percentage() {
        let (monthly, annual) = utility_deduction(dec!(100.00), dec!(25));

        assert_eq!(monthly, dec!(25.00));
        assert_eq!(annual, dec!(300.00));
    }

    #[test]
    fn utility_deduction_rounds_monthly_before_annualizing() {
        // 89.99 × 0.33 = 29.6967, monthly rounds to 29.70
        let (monthly, annual) = utility_deduction(dec!(89.99), dec!(33));

        assert_eq!(monthly, dec!(29.70));
        assert_eq!(annual, dec!(356.40));
    }

    #[test]
    fn simplified_home_office_pays_five_dollars_per_square_foot() {
        let config = simplified_home_office(200);

        assert_eq!(config.method, HomeOfficeMethod::Simplified);
        assert_eq!(config.annual_deduction, dec!(1000));
        assert_eq!(config.business_percentage, None);
    }

    #[test]
    fn simplified_home_office_caps_at_1500() {
        assert_eq!(simplified_home_office(400).annual_deduction, dec!(1500));
    }

    #[test]
    fn actual_home_office_computes_business_percentage() {
        let config = actual_home_office(2000, 200).expect("positive home area");

        assert_eq!(config.method, HomeOfficeMethod::Actual);
        assert_eq!(config.business_percentage, Some(dec!(10.00)));
        assert_eq!(config.home_square_feet, Some(2000));
        assert_eq!(config.annual_deduction, dec!(0));
    }

    #[test]
    fn actual_home_office_rounds_percentage_to_two_places() {
        // 150 / 1750 × 100 = 8.5714..., rounds to 8.57
        let config = actual_home_office(1750, 150).expect("positive home area");

        assert_eq!(config.business_percentage, Some(dec!(8.57)));
    }

    #[test]
    fn actual_home_office_rejects_zero_home_area() {
        assert_eq!(
            actual_home_office(0, 200),
            Err(DeductionError::ZeroHomeArea(0))
        );
    }
}
