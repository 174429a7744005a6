//! Estimated-tax payment schedule and reminders.
//!
//! Quarterly due dates follow the IRS calendar: April 15, June 15, and
//! September 15 of the tax year, then January 15 of the following year.
//! Reminders are computed against a caller-supplied `today` so the logic
//! stays a pure function.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    Future,
    DueSoon,
    Overdue,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Future => "future",
            Self::DueSoon => "due_soon",
            Self::Overdue => "overdue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReminder {
    pub quarter: String,
    pub due_date: NaiveDate,
    pub days_until_due: i64,
    pub status: ReminderStatus,
}

/// The four estimated-payment due dates for `tax_year`, in order.
pub fn quarterly_due_dates(tax_year: i32) -> [NaiveDate; 4] {
    let date = |year: i32, month: u32, day: u32| {
        // Fixed month/day pairs; only an absurd year outside chrono's range
        // could fail here.
        NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
    };
    [
        date(tax_year, 4, 15),
        date(tax_year, 6, 15),
        date(tax_year, 9, 15),
        date(tax_year + 1, 1, 15),
    ]
}

/// One reminder per quarter: overdue when past due, due soon within 30
/// days, future otherwise.
pub fn payment_reminders(
    tax_year: i32,
    today: NaiveDate,
) -> Vec<PaymentReminder> {
    quarterly_due_dates(tax_year)
        .into_iter()
        .enumerate()
        .map(|(i, due_date)| {
            let days_until_due = (due_date - today).num_days();
            let status = if days_until_due < 0 {
                ReminderStatus::Overdue
            } else if days_until_due <= 30 {
                ReminderStatus::DueSoon
            } else {
                ReminderStatus::Future
            };
            PaymentReminder {
                quarter: format!("Q{}", i + 1),
                due_date,
                days_until_due,
                status,
            }
        })
        .collect()
}
