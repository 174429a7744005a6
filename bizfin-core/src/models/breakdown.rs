use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FilingStatus;

/// One progressive bracket actually reached during a computation.
/// Regenerated on every request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketDetail {
    pub label: String,
    pub income_in_bracket: Decimal,
    pub rate: Decimal,
    pub tax_in_bracket: Decimal,
    pub range: String,
}

/// Full tax picture for one request. Immutable and ephemeral.
///
/// `tax_year` and `filing_status` are `None` in the unconfigured state
/// (no tax settings stored yet); income tax and the surtax are then zero
/// and `bracket_details` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub mileage_deductions: Decimal,
    pub home_office_deduction: Decimal,
    pub utility_deductions: Decimal,
    pub net_profit: Decimal,
    pub self_employment_tax: Decimal,
    pub income_tax: Decimal,
    pub additional_medicare_tax: Decimal,
    pub total_tax: Decimal,
    pub bracket_details: Vec<BracketDetail>,
    pub tax_year: Option<i32>,
    pub filing_status: Option<FilingStatus>,
}
