//! Progressive federal income tax.
//!
//! Classic marginal-rate walk: income is sliced across the ordered brackets
//! and each slice is taxed only at its own bracket's rate — the top rate is
//! never applied to the whole amount. One [`BracketDetail`] is emitted per
//! bracket actually reached, and the walk stops as soon as the income is
//! exhausted, so untouched upper brackets never appear in the output.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use bizfin_core::calculations::ProgressiveTax;
//! use bizfin_core::models::FilingStatus;
//! use bizfin_core::tables::TaxTableSet;
//!
//! let tables = TaxTableSet::builtin();
//! let resolved = tables.resolve(2024, FilingStatus::Single);
//! let result = ProgressiveTax::new(&resolved).calculate(dec!(92350));
//!
//! // 92350 - 14600 standard deduction = 77750 taxable
//! assert_eq!(result.taxable_income, dec!(77750));
//! // 11600×10% + 35550×12% + 30600×22%
//! assert_eq!(result.tax, dec!(12158.00));
//! assert_eq!(result.bracket_details.len(), 3);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{format_dollars, max, round_half_up};
use crate::models::BracketDetail;
use crate::tables::{RateBracket, ResolvedTable};

/// Result of a progressive tax computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxResult {
    /// Income remaining after the standard deduction, never negative.
    pub taxable_income: Decimal,
    /// Total tax across all brackets, rounded to cents at the end.
    pub tax: Decimal,
    /// One entry per bracket reached, in ascending order.
    pub bracket_details: Vec<BracketDetail>,
}

impl IncomeTaxResult {
    fn zero() -> Self {
        Self {
            taxable_income: Decimal::ZERO,
            tax: Decimal::ZERO,
            bracket_details: Vec::new(),
        }
    }
}

/// Calculator over one resolved bracket table.
#[derive(Debug, Clone)]
pub struct ProgressiveTax<'a> {
    standard_deduction: Decimal,
    brackets: &'a [RateBracket],
}

impl<'a> ProgressiveTax<'a> {
    pub fn new(table: &ResolvedTable<'a>) -> Self {
        Self {
            standard_deduction: table.standard_deduction,
            brackets: table.brackets,
        }
    }

    /// Computes tax on `total_income` (business profit plus other income).
    ///
    /// Zero or negative income yields zero tax and no details. Income fully
    /// absorbed by the standard deduction yields zero tax and a single
    /// synthetic detail recording that fact.
    pub fn calculate(
        &self,
        total_income: Decimal,
    ) -> IncomeTaxResult {
        if total_income <= Decimal::ZERO {
            return IncomeTaxResult::zero();
        }

        let taxable_income = max(total_income - self.standard_deduction, Decimal::ZERO);
        if taxable_income.is_zero() {
            return IncomeTaxResult {
                taxable_income,
                tax: Decimal::ZERO,
                bracket_details: vec![self.deduction_absorbed_detail()],
            };
        }

        let mut details = Vec::new();
        let mut total_tax = Decimal::ZERO;
        let mut previous_limit = Decimal::ZERO;
        let mut remaining = taxable_income;

        for bracket in self.brackets {
            let bracket_income = match bracket.upper_limit {
                Some(limit) => remaining.min(limit - previous_limit),
                None => remaining,
            };
            let bracket_tax = bracket_income * bracket.rate;

            total_tax += bracket_tax;
            remaining -= bracket_income;

            details.push(BracketDetail {
                label: bracket_label(bracket.rate),
                income_in_bracket: bracket_income,
                rate: bracket.rate,
                tax_in_bracket: round_half_up(bracket_tax),
                range: range_description(previous_limit, bracket.upper_limit),
            });

            if let Some(limit) = bracket.upper_limit {
                previous_limit = limit;
            }
            if remaining <= Decimal::ZERO {
                break;
            }
        }

        IncomeTaxResult {
            taxable_income,
            tax: round_half_up(total_tax),
            bracket_details: details,
        }
    }

    fn deduction_absorbed_detail(&self) -> BracketDetail {
        BracketDetail {
            label: "standard deduction".to_string(),
            income_in_bracket: Decimal::ZERO,
            rate: Decimal::ZERO,
            tax_in_bracket: Decimal::ZERO,
            range: format!(
                "standard deduction of {} absorbed all income",
                format_dollars(self.standard_deduction)
            ),
        }
    }
}

fn bracket_label(rate: Decimal) -> String {
    format!("{}% bracket", (rate * Decimal::ONE_HUNDRED).normalize())
}

fn range_description(
    lower: Decimal,
    upper: Option<Decimal>,
) -> String {
    match upper {
        Some(upper) => format!("{} - {}", format_dollars(lower), format_dollars(upper)),
        None => format!("{}+", format_dollars(lower)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::models::FilingStatus;
    use crate::tables::TaxTableSet;

    use super::*;

    fn calculate_2024_single(total_income: Decimal) -> IncomeTaxResult {
        let tables = TaxTableSet::builtin();
        let resolved = tables.resolve(2024, FilingStatus::Single);
        ProgressiveTax::new(&resolved).calculate(total_income)
    }

    #[test]
    fn zero_income_yields_zero_tax_and_no_details() {
        let result = calculate_2024_single(dec!(0));

        assert_eq!(result.tax, dec!(0));
        assert!(result.bracket_details.is_empty());
    }

    #[test]
    fn negative_income_yields_zero_tax_and_no_details() {
        let result = calculate_2024_single(dec!(-5000));

        assert_eq!(result.tax, dec!(0));
        assert!(result.bracket_details.is_empty());
    }

    #[test]
    fn income_below_deduction_yields_synthetic_detail() {
        let result = calculate_2024_single(dec!(10000));

        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.tax, dec!(0));
        assert_eq!(result.bracket_details.len(), 1);
        assert_eq!(result.bracket_details[0].label, "standard deduction");
        assert_eq!(result.bracket_details[0].tax_in_bracket, dec!(0));
        assert!(result.bracket_details[0].range.contains("$14,600"));
    }

    #[test]
    fn walk_matches_hand_computed_2024_single_example() {
        let result = calculate_2024_single(dec!(92350));

        assert_eq!(result.taxable_income, dec!(77750));
        // 11600×0.10 + 35550×0.12 + 30600×0.22 = 1160 + 4266 + 6732
        assert_eq!(result.tax, dec!(12158.00));

        let details = &result.bracket_details;
        assert_eq!(details.len(), 3);
        assert_eq!(details[0].income_in_bracket, dec!(11600));
        assert_eq!(details[0].tax_in_bracket, dec!(1160.00));
        assert_eq!(details[0].range, "$0 - $11,600");
        assert_eq!(details[1].income_in_bracket, dec!(35550));
        assert_eq!(details[1].tax_in_bracket, dec!(4266.00));
        assert_eq!(details[2].income_in_bracket, dec!(30600));
        assert_eq!(details[2].tax_in_bracket, dec!(6732.00));
        assert_eq!(details[2].label, "22% bracket");
    }

    #[test]
    fn bracket_incomes_sum_to_taxable_income() {
        let result = calculate_2024_single(dec!(92350));

        let summed: Decimal = result
            .bracket_details
            .iter()
            .map(|d| d.income_in_bracket)
            .sum();
        assert_eq!(summed, result.taxable_income);
        assert!(
            result
                .bracket_details
                .iter()
                .all(|d| d.income_in_bracket >= Decimal::ZERO)
        );
    }

    #[test]
    fn detail_taxes_sum_to_total_within_a_cent() {
        let result = calculate_2024_single(dec!(123456.78));

        let summed: Decimal = result
            .bracket_details
            .iter()
            .map(|d| d.tax_in_bracket)
            .sum();
        assert!((summed - result.tax).abs() <= dec!(0.01));
    }

    #[test]
    fn top_bracket_absorbs_everything_with_plus_range() {
        // 714600 - 14600 = 700000 taxable, well into the 37% bracket
        let result = calculate_2024_single(dec!(714600));

        assert_eq!(result.tax, dec!(217187.75));
        assert_eq!(result.bracket_details.len(), 7);

        let top = result.bracket_details.last().expect("top bracket reached");
        assert_eq!(top.range, "$609,350+");
        assert_eq!(top.income_in_bracket, dec!(90650));
        assert_eq!(top.tax_in_bracket, dec!(33540.50));
    }

    #[test]
    fn walk_stops_exactly_at_a_bracket_boundary() {
        // taxable income lands exactly on the first limit
        let result = calculate_2024_single(dec!(14600) + dec!(11600));

        assert_eq!(result.tax, dec!(1160.00));
        assert_eq!(result.bracket_details.len(), 1);
    }

    #[test]
    fn each_slice_taxed_at_its_own_rate_not_the_marginal_rate() {
        // 50000 income -> 35400 taxable, reaching the 12% bracket.
        // A flat 12% would charge 4248; the walk charges less.
        let result = calculate_2024_single(dec!(50000));

        assert_eq!(result.taxable_income, dec!(35400));
        // 11600×0.10 + 23800×0.12 = 1160 + 2856
        assert_eq!(result.tax, dec!(4016.00));
        assert!(result.tax < dec!(35400) * dec!(0.12));
    }
}
