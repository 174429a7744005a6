use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeOfficeMethod {
    Simplified,
    Actual,
}

impl HomeOfficeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simplified => "simplified",
            Self::Actual => "actual",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "simplified" => Some(Self::Simplified),
            "actual" => Some(Self::Actual),
            _ => None,
        }
    }
}

/// Single-slot home office configuration. At most one value is active;
/// replacing it is an atomic upsert, never a delete followed by an insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeOffice {
    pub method: HomeOfficeMethod,
    pub office_square_feet: i64,
    pub home_square_feet: Option<i64>,
    pub business_percentage: Option<Decimal>,
    pub annual_deduction: Decimal,
    pub updated_at: DateTime<Utc>,
}

/// For storing a new configuration (no timestamp).
/// Built via [`crate::calculations::deductions::simplified_home_office`]
/// or [`crate::calculations::deductions::actual_home_office`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHomeOffice {
    pub method: HomeOfficeMethod,
    pub office_square_feet: i64,
    pub home_square_feet: Option<i64>,
    pub business_percentage: Option<Decimal>,
    pub annual_deduction: Decimal,
}
