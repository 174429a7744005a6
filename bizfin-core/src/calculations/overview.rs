//! Assembles the full [`TaxBreakdown`] from a ledger snapshot.
//!
//! Orchestrates the table provider, SE tax, progressive income tax, and
//! Medicare surtax over one [`FinancialSummary`] plus optional
//! [`TaxSettings`]. Without settings the result is the defined
//! "unconfigured" state: SE tax is still computed (against the default
//! year's wage base), income tax and the surtax are zero, and no bracket
//! details are emitted.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::calculations::income_tax::ProgressiveTax;
use crate::calculations::se_tax::{SeTax, SeTaxConfig};
use crate::calculations::surtax::additional_medicare_tax;
use crate::models::{FinancialSummary, TaxBreakdown, TaxSettings};
use crate::tables::TaxTableSet;

/// Errors when a detailed breakdown is requested.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BreakdownError {
    /// No tax settings are stored yet; a detailed breakdown needs a tax
    /// year and filing status.
    #[error("tax settings not configured")]
    SettingsNotConfigured,
}

/// Computes the overview breakdown. Always succeeds; an absent
/// configuration yields the unconfigured state rather than an error.
pub fn assemble_breakdown(
    summary: &FinancialSummary,
    settings: Option<&TaxSettings>,
    tables: &TaxTableSet,
) -> TaxBreakdown {
    let net_profit = summary.net_profit();

    let resolved = match settings {
        Some(s) => tables.resolve(s.tax_year, s.filing_status),
        None => tables.default_tables(),
    };

    let se = SeTax::new(SeTaxConfig::from_table(&resolved)).calculate(net_profit);

    let (income_tax, surtax, bracket_details) = match settings {
        Some(s) => {
            // Income tax applies to the SE-taxable earnings plus any other
            // income, and only when the business turned a profit.
            let income_for_tax = if net_profit > Decimal::ZERO {
                se.net_earnings + s.other_income
            } else {
                Decimal::ZERO
            };
            let income = ProgressiveTax::new(&resolved).calculate(income_for_tax);
            let surtax = additional_medicare_tax(income_for_tax, s.filing_status);
            (income.tax, surtax, income.bracket_details)
        }
        None => (Decimal::ZERO, Decimal::ZERO, Vec::new()),
    };

    TaxBreakdown {
        total_income: summary.total_income,
        total_expenses: summary.total_expenses,
        mileage_deductions: summary.mileage_deduction,
        home_office_deduction: summary.home_office_deduction,
        utility_deductions: summary.utility_deduction,
        net_profit,
        self_employment_tax: se.total,
        income_tax,
        additional_medicare_tax: surtax,
        total_tax: se.total + income_tax + surtax,
        bracket_details,
        tax_year: settings.map(|s| s.tax_year),
        filing_status: settings.map(|s| s.filing_status),
    }
}

/// Computes a detailed breakdown, which requires configured tax settings.
///
/// # Errors
///
/// Returns [`BreakdownError::SettingsNotConfigured`] when no settings are
/// stored.
pub fn detailed_breakdown(
    summary: &FinancialSummary,
    settings: Option<&TaxSettings>,
    tables: &TaxTableSet,
) -> Result<TaxBreakdown, BreakdownError> {
    let settings = settings.ok_or(BreakdownError::SettingsNotConfigured)?;
    Ok(assemble_breakdown(summary, Some(settings), tables))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::models::FilingStatus;

    use super::*;

    fn summary_with_net_profit_100k() -> FinancialSummary {
        FinancialSummary {
            total_income: dec!(120000.00),
            total_expenses: dec!(15000.00),
            mileage_deduction: dec!(2010.00),
            home_office_deduction: dec!(1500.00),
            utility_deduction: dec!(1490.00),
        }
    }

    fn settings(
        tax_year: i32,
        other_income: Decimal,
    ) -> TaxSettings {
        TaxSettings {
            business_name: Some("Acme Consulting".to_string()),
            tax_year,
            filing_status: FilingStatus::Single,
            other_income,
            prior_year_tax: dec!(0),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn configured_2024_single_matches_worked_example() {
        let tables = TaxTableSet::builtin();
        let breakdown = assemble_breakdown(
            &summary_with_net_profit_100k(),
            Some(&settings(2024, dec!(0))),
            &tables,
        );

        assert_eq!(breakdown.net_profit, dec!(100000.00));
        assert_eq!(breakdown.self_employment_tax, dec!(14129.55));
        // 92350 SE earnings - 14600 deduction = 77750 taxable
        assert_eq!(breakdown.income_tax, dec!(12158.00));
        assert_eq!(breakdown.additional_medicare_tax, dec!(0));
        assert_eq!(breakdown.total_tax, dec!(26287.55));
        assert_eq!(breakdown.bracket_details.len(), 3);
        assert_eq!(breakdown.tax_year, Some(2024));
        assert_eq!(breakdown.filing_status, Some(FilingStatus::Single));
    }

    #[test]
    fn unconfigured_state_computes_se_tax_only() {
        let tables = TaxTableSet::builtin();
        let breakdown = assemble_breakdown(&summary_with_net_profit_100k(), None, &tables);

        assert_eq!(breakdown.self_employment_tax, dec!(14129.55));
        assert_eq!(breakdown.income_tax, dec!(0));
        assert_eq!(breakdown.additional_medicare_tax, dec!(0));
        assert_eq!(breakdown.total_tax, dec!(14129.55));
        assert!(breakdown.bracket_details.is_empty());
        assert_eq!(breakdown.tax_year, None);
        assert_eq!(breakdown.filing_status, None);
    }

    #[test]
    fn loss_year_owes_no_tax_at_all() {
        let tables = TaxTableSet::builtin();
        let summary = FinancialSummary {
            total_income: dec!(5000.00),
            ..summary_with_net_profit_100k()
        };
        let breakdown =
            assemble_breakdown(&summary, Some(&settings(2024, dec!(50000))), &tables);

        assert_eq!(breakdown.net_profit, dec!(-15000.00));
        assert_eq!(breakdown.self_employment_tax, dec!(0));
        // other income alone is not taxed when the business ran at a loss
        assert_eq!(breakdown.income_tax, dec!(0));
        assert_eq!(breakdown.additional_medicare_tax, dec!(0));
        assert_eq!(breakdown.total_tax, dec!(0));
        assert!(breakdown.bracket_details.is_empty());
    }

    #[test]
    fn other_income_raises_the_tax_base() {
        let tables = TaxTableSet::builtin();
        // 92350 SE earnings + 157650 other = 250000, over the surtax threshold
        let breakdown = assemble_breakdown(
            &summary_with_net_profit_100k(),
            Some(&settings(2024, dec!(157650))),
            &tables,
        );

        assert_eq!(breakdown.additional_medicare_tax, dec!(450.00));
    }

    #[test]
    fn unknown_year_resolves_to_default_tables() {
        let tables = TaxTableSet::builtin();
        let with_2030 = assemble_breakdown(
            &summary_with_net_profit_100k(),
            Some(&settings(2030, dec!(0))),
            &tables,
        );
        let with_2024 = assemble_breakdown(
            &summary_with_net_profit_100k(),
            Some(&settings(2024, dec!(0))),
            &tables,
        );

        assert_eq!(with_2030.income_tax, with_2024.income_tax);
        assert_eq!(with_2030.self_employment_tax, with_2024.self_employment_tax);
        // the requested year is still reported back
        assert_eq!(with_2030.tax_year, Some(2030));
    }

    #[test]
    fn detailed_breakdown_requires_settings() {
        let tables = TaxTableSet::builtin();
        let result = detailed_breakdown(&summary_with_net_profit_100k(), None, &tables);

        assert_eq!(result, Err(BreakdownError::SettingsNotConfigured));
    }

    #[test]
    fn detailed_breakdown_succeeds_with_settings() {
        let tables = TaxTableSet::builtin();
        let result = detailed_breakdown(
            &summary_with_net_profit_100k(),
            Some(&settings(2024, dec!(0))),
            &tables,
        );

        assert_eq!(result.expect("settings present").total_tax, dec!(26287.55));
    }
}
