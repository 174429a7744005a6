//! Additional Medicare surtax: an extra 0.9% on income above a
//! filing-status-specific threshold.

use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;
use crate::models::FilingStatus;

fn surtax_rate() -> Decimal {
    Decimal::new(9, 3)
}

/// Income threshold above which the surtax applies.
pub fn surtax_threshold(status: FilingStatus) -> Decimal {
    let dollars = match status {
        FilingStatus::Single | FilingStatus::HeadOfHousehold => 200_000,
        FilingStatus::MarriedJoint => 250_000,
        FilingStatus::MarriedSeparate => 125_000,
    };
    Decimal::from(dollars)
}

/// Surtax owed on `total_income`: 0.9% of the amount over the threshold,
/// zero at or below it.
pub fn additional_medicare_tax(
    total_income: Decimal,
    status: FilingStatus,
) -> Decimal {
    let threshold = surtax_threshold(status);
    if total_income > threshold {
        round_half_up((total_income - threshold) * surtax_rate())
    } else {
        Decimal::ZERO
    }
}
