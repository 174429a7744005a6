use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub id: i64,
    pub client: String,
    pub service_type: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub expects_1099: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// For creating new records (no id or timestamp)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIncomeRecord {
    pub client: String,
    pub service_type: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub expects_1099: bool,
    pub notes: Option<String>,
}
