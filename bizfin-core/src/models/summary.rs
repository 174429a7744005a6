use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregated view of the ledger, recomputed per request — never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub mileage_deduction: Decimal,
    pub home_office_deduction: Decimal,
    pub utility_deduction: Decimal,
}

impl FinancialSummary {
    pub fn total_deductions(&self) -> Decimal {
        self.total_expenses
            + self.mileage_deduction
            + self.home_office_deduction
            + self.utility_deduction
    }

    /// May be negative (a loss year); profit-dependent taxes are then zero.
    pub fn net_profit(&self) -> Decimal {
        self.total_income - self.total_deductions()
    }
}
