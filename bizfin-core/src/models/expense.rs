use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: i64,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub business_purpose: String,
    pub created_at: DateTime<Utc>,
}

/// For creating new records (no id or timestamp)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpenseRecord {
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub business_purpose: String,
}
