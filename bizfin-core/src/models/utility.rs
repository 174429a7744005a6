use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilityRecord {
    pub id: i64,
    pub utility_type: String,
    pub monthly_amount: Decimal,
    pub business_percentage: Decimal,
    pub monthly_deduction: Decimal,
    pub annual_deduction: Decimal,
    pub created_at: DateTime<Utc>,
}

/// For creating new records (no id or timestamp).
/// The deduction fields are derived via
/// [`crate::calculations::deductions::utility_deduction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUtilityRecord {
    pub utility_type: String,
    pub monthly_amount: Decimal,
    pub business_percentage: Decimal,
    pub monthly_deduction: Decimal,
    pub annual_deduction: Decimal,
}
