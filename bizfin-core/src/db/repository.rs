use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{
    ExpenseRecord, FinancialSummary, HomeOffice, IncomeRecord, MileageRecord, NewExpenseRecord,
    NewHomeOffice, NewIncomeRecord, NewMileageRecord, NewSavingsGoal, NewTaxPayment,
    NewTaxSettings, NewUtilityRecord, SavingsGoal, TaxPaymentRecord, TaxSettings, UtilityRecord,
};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// The ledger store: CRUD over the persistent record types, the aggregate
/// queries the tax engine reads, and the two single-slot configuration
/// values. Aggregates treat an empty table as zero.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    // Income
    async fn create_income(&self, record: NewIncomeRecord)
    -> Result<IncomeRecord, RepositoryError>;
    async fn get_income(&self, id: i64) -> Result<IncomeRecord, RepositoryError>;
    async fn update_income(&self, record: &IncomeRecord) -> Result<(), RepositoryError>;
    async fn delete_income(&self, id: i64) -> Result<(), RepositoryError>;
    async fn list_income(&self) -> Result<Vec<IncomeRecord>, RepositoryError>;
    async fn total_income(&self) -> Result<Decimal, RepositoryError>;

    // Expenses
    async fn create_expense(
        &self,
        record: NewExpenseRecord,
    ) -> Result<ExpenseRecord, RepositoryError>;
    async fn get_expense(&self, id: i64) -> Result<ExpenseRecord, RepositoryError>;
    async fn update_expense(&self, record: &ExpenseRecord) -> Result<(), RepositoryError>;
    async fn delete_expense(&self, id: i64) -> Result<(), RepositoryError>;
    async fn list_expenses(&self) -> Result<Vec<ExpenseRecord>, RepositoryError>;
    async fn total_expenses(&self) -> Result<Decimal, RepositoryError>;

    // Mileage
    async fn create_mileage(
        &self,
        record: NewMileageRecord,
    ) -> Result<MileageRecord, RepositoryError>;
    async fn get_mileage(&self, id: i64) -> Result<MileageRecord, RepositoryError>;
    async fn update_mileage(&self, record: &MileageRecord) -> Result<(), RepositoryError>;
    async fn delete_mileage(&self, id: i64) -> Result<(), RepositoryError>;
    async fn list_mileage(&self) -> Result<Vec<MileageRecord>, RepositoryError>;
    async fn total_mileage_deduction(&self) -> Result<Decimal, RepositoryError>;

    // Utilities
    async fn create_utility(
        &self,
        record: NewUtilityRecord,
    ) -> Result<UtilityRecord, RepositoryError>;
    async fn get_utility(&self, id: i64) -> Result<UtilityRecord, RepositoryError>;
    async fn update_utility(&self, record: &UtilityRecord) -> Result<(), RepositoryError>;
    async fn delete_utility(&self, id: i64) -> Result<(), RepositoryError>;
    async fn list_utilities(&self) -> Result<Vec<UtilityRecord>, RepositoryError>;
    async fn total_utility_deduction(&self) -> Result<Decimal, RepositoryError>;

    // Tax payments
    async fn create_tax_payment(
        &self,
        record: NewTaxPayment,
    ) -> Result<TaxPaymentRecord, RepositoryError>;
    async fn get_tax_payment(&self, id: i64) -> Result<TaxPaymentRecord, RepositoryError>;
    async fn update_tax_payment(&self, record: &TaxPaymentRecord) -> Result<(), RepositoryError>;
    async fn delete_tax_payment(&self, id: i64) -> Result<(), RepositoryError>;
    async fn list_tax_payments(&self) -> Result<Vec<TaxPaymentRecord>, RepositoryError>;

    // Savings goals
    async fn create_savings_goal(
        &self,
        record: NewSavingsGoal,
    ) -> Result<SavingsGoal, RepositoryError>;
    async fn get_savings_goal(&self, id: i64) -> Result<SavingsGoal, RepositoryError>;
    async fn update_savings_goal(&self, record: &SavingsGoal) -> Result<(), RepositoryError>;
    async fn delete_savings_goal(&self, id: i64) -> Result<(), RepositoryError>;
    async fn list_savings_goals(&self) -> Result<Vec<SavingsGoal>, RepositoryError>;

    // Single-slot configuration values
    async fn get_home_office(&self) -> Result<Option<HomeOffice>, RepositoryError>;
    async fn put_home_office(&self, config: NewHomeOffice)
    -> Result<HomeOffice, RepositoryError>;
    async fn get_tax_settings(&self) -> Result<Option<TaxSettings>, RepositoryError>;
    async fn put_tax_settings(
        &self,
        settings: NewTaxSettings,
    ) -> Result<TaxSettings, RepositoryError>;

    /// One aggregate snapshot for a calculation request. The individual
    /// reads are not transactional; slight staleness between them is
    /// acceptable for a single-user ledger.
    async fn financial_summary(&self) -> Result<FinancialSummary, RepositoryError> {
        Ok(FinancialSummary {
            total_income: self.total_income().await?,
            total_expenses: self.total_expenses().await?,
            mileage_deduction: self.total_mileage_deduction().await?,
            home_office_deduction: self
                .get_home_office()
                .await?
                .map(|h| h.annual_deduction)
                .unwrap_or(Decimal::ZERO),
            utility_deduction: self.total_utility_deduction().await?,
        })
    }
}
