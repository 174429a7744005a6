use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{
    FromRow,
    sqlite::{SqlitePool, SqlitePoolOptions},
};

use bizfin_core::{
    ExpenseRecord, FilingStatus, HomeOffice, HomeOfficeMethod, IncomeRecord, LedgerRepository,
    MileageRecord, NewExpenseRecord, NewHomeOffice, NewIncomeRecord, NewMileageRecord,
    NewSavingsGoal, NewTaxPayment, NewTaxSettings, NewUtilityRecord, RepositoryError, SavingsGoal,
    TaxPaymentRecord, TaxSettings, UtilityRecord,
};

/// SQLite-backed ledger store. Decimals are stored as TEXT and parsed on
/// read so amounts round-trip exactly; aggregate sums are computed over the
/// parsed decimals rather than in SQL to avoid float coercion.
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_url: &str) -> Result<Self, RepositoryError> {
        // One connection is plenty for a single-user ledger, and it keeps
        // `sqlite::memory:` databases coherent across queries.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        tracing::debug!("running sqlite migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Sums a single decimal TEXT column; an empty table sums to zero.
    async fn sum_column(&self, query: &str) -> Result<Decimal, RepositoryError> {
        let rows: Vec<(String,)> = sqlx::query_as(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let mut total = Decimal::ZERO;
        for (value,) in rows {
            total += parse_decimal(&value)?;
        }
        Ok(total)
    }
}

#[derive(FromRow)]
struct IncomeRow {
    id: i64,
    client: String,
    service_type: String,
    amount: String,
    date: String,
    expects_1099: bool,
    notes: Option<String>,
    created_at: String,
}

impl TryFrom<IncomeRow> for IncomeRecord {
    type Error = RepositoryError;

    fn try_from(row: IncomeRow) -> Result<Self, Self::Error> {
        Ok(IncomeRecord {
            id: row.id,
            client: row.client,
            service_type: row.service_type,
            amount: parse_decimal(&row.amount)?,
            date: parse_date(&row.date)?,
            expects_1099: row.expects_1099,
            notes: row.notes,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[derive(FromRow)]
struct ExpenseRow {
    id: i64,
    category: String,
    description: String,
    amount: String,
    date: String,
    business_purpose: String,
    created_at: String,
}

impl TryFrom<ExpenseRow> for ExpenseRecord {
    type Error = RepositoryError;

    fn try_from(row: ExpenseRow) -> Result<Self, Self::Error> {
        Ok(ExpenseRecord {
            id: row.id,
            category: row.category,
            description: row.description,
            amount: parse_decimal(&row.amount)?,
            date: parse_date(&row.date)?,
            business_purpose: row.business_purpose,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[derive(FromRow)]
struct MileageRow {
    id: i64,
    start_location: String,
    destination: String,
    miles: String,
    business_purpose: String,
    date: String,
    deduction_amount: String,
    created_at: String,
}

impl TryFrom<MileageRow> for MileageRecord {
    type Error = RepositoryError;

    fn try_from(row: MileageRow) -> Result<Self, Self::Error> {
        Ok(MileageRecord {
            id: row.id,
            start_location: row.start_location,
            destination: row.destination,
            miles: parse_decimal(&row.miles)?,
            business_purpose: row.business_purpose,
            date: parse_date(&row.date)?,
            deduction_amount: parse_decimal(&row.deduction_amount)?,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[derive(FromRow)]
struct UtilityRow {
    id: i64,
    utility_type: String,
    monthly_amount: String,
    business_percentage: String,
    monthly_deduction: String,
    annual_deduction: String,
    created_at: String,
}

impl TryFrom<UtilityRow> for UtilityRecord {
    type Error = RepositoryError;

    fn try_from(row: UtilityRow) -> Result<Self, Self::Error> {
        Ok(UtilityRecord {
            id: row.id,
            utility_type: row.utility_type,
            monthly_amount: parse_decimal(&row.monthly_amount)?,
            business_percentage: parse_decimal(&row.business_percentage)?,
            monthly_deduction: parse_decimal(&row.monthly_deduction)?,
            annual_deduction: parse_decimal(&row.annual_deduction)?,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[derive(FromRow)]
struct TaxPaymentRow {
    id: i64,
    quarter: String,
    amount: String,
    payment_date: String,
    payment_method: Option<String>,
    confirmation_number: Option<String>,
    created_at: String,
}

impl TryFrom<TaxPaymentRow> for TaxPaymentRecord {
    type Error = RepositoryError;

    fn try_from(row: TaxPaymentRow) -> Result<Self, Self::Error> {
        Ok(TaxPaymentRecord {
            id: row.id,
            quarter: row.quarter,
            amount: parse_decimal(&row.amount)?,
            payment_date: parse_date(&row.payment_date)?,
            payment_method: row.payment_method,
            confirmation_number: row.confirmation_number,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[derive(FromRow)]
struct SavingsGoalRow {
    id: i64,
    goal_name: String,
    target_amount: String,
    current_amount: String,
    target_date: Option<String>,
    goal_type: String,
    created_at: String,
}

impl TryFrom<SavingsGoalRow> for SavingsGoal {
    type Error = RepositoryError;

    fn try_from(row: SavingsGoalRow) -> Result<Self, Self::Error> {
        Ok(SavingsGoal {
            id: row.id,
            goal_name: row.goal_name,
            target_amount: parse_decimal(&row.target_amount)?,
            current_amount: parse_decimal(&row.current_amount)?,
            target_date: row.target_date.as_deref().map(parse_date).transpose()?,
            goal_type: row.goal_type,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[derive(FromRow)]
struct TaxSettingsRow {
    business_name: Option<String>,
    tax_year: i32,
    filing_status: String,
    other_income: String,
    prior_year_tax: String,
    updated_at: String,
}

impl TryFrom<TaxSettingsRow> for TaxSettings {
    type Error = RepositoryError;

    fn try_from(row: TaxSettingsRow) -> Result<Self, Self::Error> {
        Ok(TaxSettings {
            business_name: row.business_name,
            tax_year: row.tax_year,
            // Permissive by design: an unknown stored status resolves to
            // single rather than failing the read.
            filing_status: FilingStatus::parse_or_single(&row.filing_status),
            other_income: parse_decimal(&row.other_income)?,
            prior_year_tax: parse_decimal(&row.prior_year_tax)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct HomeOfficeRow {
    method: String,
    office_square_feet: i64,
    home_square_feet: Option<i64>,
    business_percentage: Option<String>,
    annual_deduction: String,
    updated_at: String,
}

impl TryFrom<HomeOfficeRow> for HomeOffice {
    type Error = RepositoryError;

    fn try_from(row: HomeOfficeRow) -> Result<Self, Self::Error> {
        let method = HomeOfficeMethod::parse(&row.method).ok_or_else(|| {
            RepositoryError::Database(format!("Invalid home office method: {}", row.method))
        })?;
        Ok(HomeOffice {
            method,
            office_square_feet: row.office_square_feet,
            home_square_feet: row.home_square_feet,
            business_percentage: row
                .business_percentage
                .as_deref()
                .map(parse_decimal)
                .transpose()?,
            annual_deduction: parse_decimal(&row.annual_deduction)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}

fn parse_decimal(s: &str) -> Result<Decimal, RepositoryError> {
    s.parse::<Decimal>()
        .map_err(|e| RepositoryError::Database(format!("Failed to parse decimal '{}': {}", s, e)))
}

fn parse_date(s: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| RepositoryError::Database(format!("Failed to parse date '{}': {}", s, e)))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    // SQLite stores timestamps in various formats, try common ones
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| RepositoryError::Database(format!("Failed to parse datetime '{}': {}", s, e)))
}

fn now_string() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn db_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

#[async_trait]
impl LedgerRepository for SqliteRepository {
    async fn create_income(
        &self,
        record: NewIncomeRecord,
    ) -> Result<IncomeRecord, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO income (client, service_type, amount, date, expects_1099, notes, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.client)
        .bind(&record.service_type)
        .bind(record.amount.to_string())
        .bind(record.date.to_string())
        .bind(record.expects_1099)
        .bind(&record.notes)
        .bind(now_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        self.get_income(result.last_insert_rowid()).await
    }

    async fn get_income(&self, id: i64) -> Result<IncomeRecord, RepositoryError> {
        let row: IncomeRow = sqlx::query_as(
            "SELECT id, client, service_type, amount, date, expects_1099, notes, created_at
             FROM income WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn update_income(&self, record: &IncomeRecord) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE income
             SET client = ?, service_type = ?, amount = ?, date = ?, expects_1099 = ?, notes = ?
             WHERE id = ?",
        )
        .bind(&record.client)
        .bind(&record.service_type)
        .bind(record.amount.to_string())
        .bind(record.date.to_string())
        .bind(record.expects_1099)
        .bind(&record.notes)
        .bind(record.id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_income(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM income WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_income(&self) -> Result<Vec<IncomeRecord>, RepositoryError> {
        let rows: Vec<IncomeRow> = sqlx::query_as(
            "SELECT id, client, service_type, amount, date, expects_1099, notes, created_at
             FROM income ORDER BY date DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn total_income(&self) -> Result<Decimal, RepositoryError> {
        self.sum_column("SELECT amount FROM income").await
    }

    async fn create_expense(
        &self,
        record: NewExpenseRecord,
    ) -> Result<ExpenseRecord, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO expenses (category, description, amount, date, business_purpose, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.category)
        .bind(&record.description)
        .bind(record.amount.to_string())
        .bind(record.date.to_string())
        .bind(&record.business_purpose)
        .bind(now_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        self.get_expense(result.last_insert_rowid()).await
    }

    async fn get_expense(&self, id: i64) -> Result<ExpenseRecord, RepositoryError> {
        let row: ExpenseRow = sqlx::query_as(
            "SELECT id, category, description, amount, date, business_purpose, created_at
             FROM expenses WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn update_expense(&self, record: &ExpenseRecord) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE expenses
             SET category = ?, description = ?, amount = ?, date = ?, business_purpose = ?
             WHERE id = ?",
        )
        .bind(&record.category)
        .bind(&record.description)
        .bind(record.amount.to_string())
        .bind(record.date.to_string())
        .bind(&record.business_purpose)
        .bind(record.id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_expense(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_expenses(&self) -> Result<Vec<ExpenseRecord>, RepositoryError> {
        let rows: Vec<ExpenseRow> = sqlx::query_as(
            "SELECT id, category, description, amount, date, business_purpose, created_at
             FROM expenses ORDER BY date DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn total_expenses(&self) -> Result<Decimal, RepositoryError> {
        self.sum_column("SELECT amount FROM expenses").await
    }

    async fn create_mileage(
        &self,
        record: NewMileageRecord,
    ) -> Result<MileageRecord, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO mileage (start_location, destination, miles, business_purpose, date, deduction_amount, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.start_location)
        .bind(&record.destination)
        .bind(record.miles.to_string())
        .bind(&record.business_purpose)
        .bind(record.date.to_string())
        .bind(record.deduction_amount.to_string())
        .bind(now_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        self.get_mileage(result.last_insert_rowid()).await
    }

    async fn get_mileage(&self, id: i64) -> Result<MileageRecord, RepositoryError> {
        let row: MileageRow = sqlx::query_as(
            "SELECT id, start_location, destination, miles, business_purpose, date, deduction_amount, created_at
             FROM mileage WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn update_mileage(&self, record: &MileageRecord) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE mileage
             SET start_location = ?, destination = ?, miles = ?, business_purpose = ?, date = ?, deduction_amount = ?
             WHERE id = ?",
        )
        .bind(&record.start_location)
        .bind(&record.destination)
        .bind(record.miles.to_string())
        .bind(&record.business_purpose)
        .bind(record.date.to_string())
        .bind(record.deduction_amount.to_string())
        .bind(record.id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_mileage(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM mileage WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_mileage(&self) -> Result<Vec<MileageRecord>, RepositoryError> {
        let rows: Vec<MileageRow> = sqlx::query_as(
            "SELECT id, start_location, destination, miles, business_purpose, date, deduction_amount, created_at
             FROM mileage ORDER BY date DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn total_mileage_deduction(&self) -> Result<Decimal, RepositoryError> {
        self.sum_column("SELECT deduction_amount FROM mileage").await
    }

    async fn create_utility(
        &self,
        record: NewUtilityRecord,
    ) -> Result<UtilityRecord, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO utilities (utility_type, monthly_amount, business_percentage, monthly_deduction, annual_deduction, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.utility_type)
        .bind(record.monthly_amount.to_string())
        .bind(record.business_percentage.to_string())
        .bind(record.monthly_deduction.to_string())
        .bind(record.annual_deduction.to_string())
        .bind(now_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        self.get_utility(result.last_insert_rowid()).await
    }

    async fn get_utility(&self, id: i64) -> Result<UtilityRecord, RepositoryError> {
        let row: UtilityRow = sqlx::query_as(
            "SELECT id, utility_type, monthly_amount, business_percentage, monthly_deduction, annual_deduction, created_at
             FROM utilities WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn update_utility(&self, record: &UtilityRecord) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE utilities
             SET utility_type = ?, monthly_amount = ?, business_percentage = ?, monthly_deduction = ?, annual_deduction = ?
             WHERE id = ?",
        )
        .bind(&record.utility_type)
        .bind(record.monthly_amount.to_string())
        .bind(record.business_percentage.to_string())
        .bind(record.monthly_deduction.to_string())
        .bind(record.annual_deduction.to_string())
        .bind(record.id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_utility(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM utilities WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_utilities(&self) -> Result<Vec<UtilityRecord>, RepositoryError> {
        let rows: Vec<UtilityRow> = sqlx::query_as(
            "SELECT id, utility_type, monthly_amount, business_percentage, monthly_deduction, annual_deduction, created_at
             FROM utilities ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn total_utility_deduction(&self) -> Result<Decimal, RepositoryError> {
        self.sum_column("SELECT annual_deduction FROM utilities").await
    }

    async fn create_tax_payment(
        &self,
        record: NewTaxPayment,
    ) -> Result<TaxPaymentRecord, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO tax_payments (quarter, amount, payment_date, payment_method, confirmation_number, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.quarter)
        .bind(record.amount.to_string())
        .bind(record.payment_date.to_string())
        .bind(&record.payment_method)
        .bind(&record.confirmation_number)
        .bind(now_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        self.get_tax_payment(result.last_insert_rowid()).await
    }

    async fn get_tax_payment(&self, id: i64) -> Result<TaxPaymentRecord, RepositoryError> {
        let row: TaxPaymentRow = sqlx::query_as(
            "SELECT id, quarter, amount, payment_date, payment_method, confirmation_number, created_at
             FROM tax_payments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn update_tax_payment(&self, record: &TaxPaymentRecord) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE tax_payments
             SET quarter = ?, amount = ?, payment_date = ?, payment_method = ?, confirmation_number = ?
             WHERE id = ?",
        )
        .bind(&record.quarter)
        .bind(record.amount.to_string())
        .bind(record.payment_date.to_string())
        .bind(&record.payment_method)
        .bind(&record.confirmation_number)
        .bind(record.id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_tax_payment(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM tax_payments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_tax_payments(&self) -> Result<Vec<TaxPaymentRecord>, RepositoryError> {
        let rows: Vec<TaxPaymentRow> = sqlx::query_as(
            "SELECT id, quarter, amount, payment_date, payment_method, confirmation_number, created_at
             FROM tax_payments ORDER BY payment_date DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn create_savings_goal(
        &self,
        record: NewSavingsGoal,
    ) -> Result<SavingsGoal, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO savings_goals (goal_name, target_amount, current_amount, target_date, goal_type, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.goal_name)
        .bind(record.target_amount.to_string())
        .bind(record.current_amount.to_string())
        .bind(record.target_date.map(|d| d.to_string()))
        .bind(&record.goal_type)
        .bind(now_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        self.get_savings_goal(result.last_insert_rowid()).await
    }

    async fn get_savings_goal(&self, id: i64) -> Result<SavingsGoal, RepositoryError> {
        let row: SavingsGoalRow = sqlx::query_as(
            "SELECT id, goal_name, target_amount, current_amount, target_date, goal_type, created_at
             FROM savings_goals WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn update_savings_goal(&self, record: &SavingsGoal) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE savings_goals
             SET goal_name = ?, target_amount = ?, current_amount = ?, target_date = ?, goal_type = ?
             WHERE id = ?",
        )
        .bind(&record.goal_name)
        .bind(record.target_amount.to_string())
        .bind(record.current_amount.to_string())
        .bind(record.target_date.map(|d| d.to_string()))
        .bind(&record.goal_type)
        .bind(record.id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_savings_goal(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM savings_goals WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_savings_goals(&self) -> Result<Vec<SavingsGoal>, RepositoryError> {
        let rows: Vec<SavingsGoalRow> = sqlx::query_as(
            "SELECT id, goal_name, target_amount, current_amount, target_date, goal_type, created_at
             FROM savings_goals ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn get_home_office(&self) -> Result<Option<HomeOffice>, RepositoryError> {
        let row: Option<HomeOfficeRow> = sqlx::query_as(
            "SELECT method, office_square_feet, home_square_feet, business_percentage, annual_deduction, updated_at
             FROM home_office WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(|r| r.try_into()).transpose()
    }

    async fn put_home_office(
        &self,
        config: NewHomeOffice,
    ) -> Result<HomeOffice, RepositoryError> {
        sqlx::query(
            "INSERT INTO home_office (id, method, office_square_feet, home_square_feet, business_percentage, annual_deduction, updated_at)
             VALUES (1, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                method = excluded.method,
                office_square_feet = excluded.office_square_feet,
                home_square_feet = excluded.home_square_feet,
                business_percentage = excluded.business_percentage,
                annual_deduction = excluded.annual_deduction,
                updated_at = excluded.updated_at",
        )
        .bind(config.method.as_str())
        .bind(config.office_square_feet)
        .bind(config.home_square_feet)
        .bind(config.business_percentage.map(|p| p.to_string()))
        .bind(config.annual_deduction.to_string())
        .bind(now_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        self.get_home_office().await?.ok_or_else(|| {
            RepositoryError::Database("home office slot empty after upsert".to_string())
        })
    }

    async fn get_tax_settings(&self) -> Result<Option<TaxSettings>, RepositoryError> {
        let row: Option<TaxSettingsRow> = sqlx::query_as(
            "SELECT business_name, tax_year, filing_status, other_income, prior_year_tax, updated_at
             FROM tax_settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(|r| r.try_into()).transpose()
    }

    async fn put_tax_settings(
        &self,
        settings: NewTaxSettings,
    ) -> Result<TaxSettings, RepositoryError> {
        sqlx::query(
            "INSERT INTO tax_settings (id, business_name, tax_year, filing_status, other_income, prior_year_tax, updated_at)
             VALUES (1, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                business_name = excluded.business_name,
                tax_year = excluded.tax_year,
                filing_status = excluded.filing_status,
                other_income = excluded.other_income,
                prior_year_tax = excluded.prior_year_tax,
                updated_at = excluded.updated_at",
        )
        .bind(&settings.business_name)
        .bind(settings.tax_year)
        .bind(settings.filing_status.as_str())
        .bind(settings.other_income.to_string())
        .bind(settings.prior_year_tax.to_string())
        .bind(now_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        self.get_tax_settings().await?.ok_or_else(|| {
            RepositoryError::Database("tax settings slot empty after upsert".to_string())
        })
    }
}
