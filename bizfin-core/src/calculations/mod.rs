//! The tax-calculation engine.
//!
//! Everything here is a pure function over values fetched from the ledger:
//! no I/O, no suspension points, deterministic for a given input snapshot.

pub mod common;
pub mod deductions;
pub mod income_tax;
pub mod overview;
pub mod schedule;
pub mod se_tax;
pub mod surtax;

pub use deductions::DeductionError;
pub use income_tax::{IncomeTaxResult, ProgressiveTax};
pub use overview::{BreakdownError, assemble_breakdown, detailed_breakdown};
pub use schedule::{PaymentReminder, ReminderStatus, payment_reminders, quarterly_due_dates};
pub use se_tax::{SeTax, SeTaxBreakdown, SeTaxConfig};
pub use surtax::{additional_medicare_tax, surtax_threshold};
