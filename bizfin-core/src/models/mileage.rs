use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MileageRecord {
    pub id: i64,
    pub start_location: String,
    pub destination: String,
    pub miles: Decimal,
    pub business_purpose: String,
    pub date: NaiveDate,
    pub deduction_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// For creating new records (no id or timestamp).
/// `deduction_amount` is derived from miles via
/// [`crate::calculations::deductions::mileage_deduction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMileageRecord {
    pub start_location: String,
    pub destination: String,
    pub miles: Decimal,
    pub business_purpose: String,
    pub date: NaiveDate,
    pub deduction_amount: Decimal,
}
