use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FilingStatus;

/// Single-slot tax configuration. At most one value is active; replacing it
/// is an atomic upsert, never a delete followed by an insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSettings {
    pub business_name: Option<String>,
    pub tax_year: i32,
    pub filing_status: FilingStatus,
    pub other_income: Decimal,
    pub prior_year_tax: Decimal,
    pub updated_at: DateTime<Utc>,
}

/// For storing new settings (no timestamp)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTaxSettings {
    pub business_name: Option<String>,
    pub tax_year: i32,
    pub filing_status: FilingStatus,
    pub other_income: Decimal,
    pub prior_year_tax: Decimal,
}
