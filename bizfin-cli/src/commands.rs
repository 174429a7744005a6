use anyhow::Result;
use chrono::{Datelike, Utc};
use clap::Subcommand;
use rust_decimal::Decimal;

use bizfin_core::calculations::{
    assemble_breakdown, deductions, detailed_breakdown, payment_reminders,
};
use bizfin_core::{
    LedgerRepository, NewExpenseRecord, NewIncomeRecord, NewMileageRecord, NewSavingsGoal,
    NewTaxPayment, NewTaxSettings, NewUtilityRecord, TaxBreakdown, TaxTableSet,
};
use bizfin_core::models::FilingStatus;

use crate::util::{parse_flexible_date, usd};

#[derive(Subcommand, Debug)]
pub enum IncomeCommand {
    /// Record a payment received from a client
    Add {
        #[arg(long)]
        client: String,
        #[arg(long)]
        service_type: String,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        date: String,
        #[arg(long)]
        expects_1099: bool,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List income records, newest first
    List,
    /// Delete an income record by id
    Delete {
        #[arg(long)]
        id: i64,
    },
}

pub async fn income(
    repo: &dyn LedgerRepository,
    command: IncomeCommand,
) -> Result<()> {
    match command {
        IncomeCommand::Add {
            client,
            service_type,
            amount,
            date,
            expects_1099,
            notes,
        } => {
            let record = repo
                .create_income(NewIncomeRecord {
                    client,
                    service_type,
                    amount,
                    date: parse_flexible_date(&date)?,
                    expects_1099,
                    notes,
                })
                .await?;
            println!(
                "Recorded income #{}: {} from {}",
                record.id,
                usd(record.amount),
                record.client
            );
        }
        IncomeCommand::List => {
            for record in repo.list_income().await? {
                println!(
                    "#{:<4} {}  {:>12}  {}  ({})",
                    record.id,
                    record.date,
                    usd(record.amount),
                    record.client,
                    record.service_type
                );
            }
        }
        IncomeCommand::Delete { id } => {
            repo.delete_income(id).await?;
            println!("Deleted income #{id}");
        }
    }
    Ok(())
}

#[derive(Subcommand, Debug)]
pub enum ExpenseCommand {
    /// Record a business expense
    Add {
        #[arg(long)]
        category: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        date: String,
        #[arg(long)]
        purpose: String,
    },
    /// List expense records, newest first
    List,
    /// Delete an expense record by id
    Delete {
        #[arg(long)]
        id: i64,
    },
}

pub async fn expense(
    repo: &dyn LedgerRepository,
    command: ExpenseCommand,
) -> Result<()> {
    match command {
        ExpenseCommand::Add {
            category,
            description,
            amount,
            date,
            purpose,
        } => {
            let record = repo
                .create_expense(NewExpenseRecord {
                    category,
                    description,
                    amount,
                    date: parse_flexible_date(&date)?,
                    business_purpose: purpose,
                })
                .await?;
            println!(
                "Recorded expense #{}: {} ({})",
                record.id,
                usd(record.amount),
                record.category
            );
        }
        ExpenseCommand::List => {
            for record in repo.list_expenses().await? {
                println!(
                    "#{:<4} {}  {:>12}  {}  ({})",
                    record.id,
                    record.date,
                    usd(record.amount),
                    record.description,
                    record.category
                );
            }
        }
        ExpenseCommand::Delete { id } => {
            repo.delete_expense(id).await?;
            println!("Deleted expense #{id}");
        }
    }
    Ok(())
}

#[derive(Subcommand, Debug)]
pub enum MileageCommand {
    /// Log a business trip; the deduction is derived from the miles
    Add {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        miles: Decimal,
        #[arg(long)]
        purpose: String,
        #[arg(long)]
        date: String,
    },
    /// List mileage records, newest first
    List,
    /// Delete a mileage record by id
    Delete {
        #[arg(long)]
        id: i64,
    },
}

pub async fn mileage(
    repo: &dyn LedgerRepository,
    command: MileageCommand,
) -> Result<()> {
    match command {
        MileageCommand::Add {
            from,
            to,
            miles,
            purpose,
            date,
        } => {
            let deduction_amount = deductions::mileage_deduction(miles);
            let record = repo
                .create_mileage(NewMileageRecord {
                    start_location: from,
                    destination: to,
                    miles,
                    business_purpose: purpose,
                    date: parse_flexible_date(&date)?,
                    deduction_amount,
                })
                .await?;
            println!(
                "Logged trip #{}: {} miles, deduction {}",
                record.id,
                record.miles,
                usd(record.deduction_amount)
            );
        }
        MileageCommand::List => {
            for record in repo.list_mileage().await? {
                println!(
                    "#{:<4} {}  {:>8} mi  {:>10}  {} -> {}",
                    record.id,
                    record.date,
                    record.miles,
                    usd(record.deduction_amount),
                    record.start_location,
                    record.destination
                );
            }
        }
        MileageCommand::Delete { id } => {
            repo.delete_mileage(id).await?;
            println!("Deleted mileage record #{id}");
        }
    }
    Ok(())
}

#[derive(Subcommand, Debug)]
pub enum UtilityCommand {
    /// Add a utility with its business-use percentage
    Add {
        #[arg(long)]
        utility_type: String,
        #[arg(long)]
        monthly_amount: Decimal,
        #[arg(long)]
        business_percentage: Decimal,
    },
    /// List utilities
    List,
    /// Delete a utility by id
    Delete {
        #[arg(long)]
        id: i64,
    },
}

pub async fn utility(
    repo: &dyn LedgerRepository,
    command: UtilityCommand,
) -> Result<()> {
    match command {
        UtilityCommand::Add {
            utility_type,
            monthly_amount,
            business_percentage,
        } => {
            let (monthly_deduction, annual_deduction) =
                deductions::utility_deduction(monthly_amount, business_percentage);
            let record = repo
                .create_utility(NewUtilityRecord {
                    utility_type,
                    monthly_amount,
                    business_percentage,
                    monthly_deduction,
                    annual_deduction,
                })
                .await?;
            println!(
                "Added utility #{}: {} ({}% business), {} / year",
                record.id,
                record.utility_type,
                record.business_percentage,
                usd(record.annual_deduction)
            );
        }
        UtilityCommand::List => {
            for record in repo.list_utilities().await? {
                println!(
                    "#{:<4} {:<14} {:>10} / mo at {:>5}%  -> {:>10} / yr",
                    record.id,
                    record.utility_type,
                    usd(record.monthly_amount),
                    record.business_percentage,
                    usd(record.annual_deduction)
                );
            }
        }
        UtilityCommand::Delete { id } => {
            repo.delete_utility(id).await?;
            println!("Deleted utility #{id}");
        }
    }
    Ok(())
}

#[derive(Subcommand, Debug)]
pub enum PaymentCommand {
    /// Record an estimated tax payment
    Add {
        #[arg(long)]
        quarter: String,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        date: String,
        #[arg(long)]
        method: Option<String>,
        #[arg(long)]
        confirmation: Option<String>,
    },
    /// List tax payments, newest first
    List,
    /// Delete a tax payment by id
    Delete {
        #[arg(long)]
        id: i64,
    },
}

pub async fn payment(
    repo: &dyn LedgerRepository,
    command: PaymentCommand,
) -> Result<()> {
    match command {
        PaymentCommand::Add {
            quarter,
            amount,
            date,
            method,
            confirmation,
        } => {
            let record = repo
                .create_tax_payment(NewTaxPayment {
                    quarter,
                    amount,
                    payment_date: parse_flexible_date(&date)?,
                    payment_method: method,
                    confirmation_number: confirmation,
                })
                .await?;
            println!(
                "Recorded {} payment #{}: {}",
                record.quarter,
                record.id,
                usd(record.amount)
            );
        }
        PaymentCommand::List => {
            for record in repo.list_tax_payments().await? {
                println!(
                    "#{:<4} {}  {:<3} {:>12}  {}",
                    record.id,
                    record.payment_date,
                    record.quarter,
                    usd(record.amount),
                    record.payment_method.as_deref().unwrap_or("-")
                );
            }
        }
        PaymentCommand::Delete { id } => {
            repo.delete_tax_payment(id).await?;
            println!("Deleted tax payment #{id}");
        }
    }
    Ok(())
}

#[derive(Subcommand, Debug)]
pub enum GoalCommand {
    /// Add a savings goal
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        target: Decimal,
        #[arg(long, default_value = "0")]
        current: Decimal,
        #[arg(long)]
        target_date: Option<String>,
        #[arg(long, default_value = "general")]
        goal_type: String,
    },
    /// List savings goals
    List,
    /// Delete a savings goal by id
    Delete {
        #[arg(long)]
        id: i64,
    },
}

pub async fn goal(
    repo: &dyn LedgerRepository,
    command: GoalCommand,
) -> Result<()> {
    match command {
        GoalCommand::Add {
            name,
            target,
            current,
            target_date,
            goal_type,
        } => {
            let target_date = target_date
                .as_deref()
                .map(parse_flexible_date)
                .transpose()?;
            let record = repo
                .create_savings_goal(NewSavingsGoal {
                    goal_name: name,
                    target_amount: target,
                    current_amount: current,
                    target_date,
                    goal_type,
                })
                .await?;
            println!(
                "Added goal #{}: {} ({} of {})",
                record.id,
                record.goal_name,
                usd(record.current_amount),
                usd(record.target_amount)
            );
        }
        GoalCommand::List => {
            for record in repo.list_savings_goals().await? {
                let due = record
                    .target_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "open-ended".to_string());
                println!(
                    "#{:<4} {:<24} {:>10} of {:>10}  by {}",
                    record.id,
                    record.goal_name,
                    usd(record.current_amount),
                    usd(record.target_amount),
                    due
                );
            }
        }
        GoalCommand::Delete { id } => {
            repo.delete_savings_goal(id).await?;
            println!("Deleted savings goal #{id}");
        }
    }
    Ok(())
}

#[derive(Subcommand, Debug)]
pub enum HomeOfficeCommand {
    /// Use the simplified method: $5 per square foot, capped at $1,500
    SetSimplified {
        #[arg(long)]
        square_feet: i64,
    },
    /// Use the actual method: office share of the home's square footage
    SetActual {
        #[arg(long)]
        home_square_feet: i64,
        #[arg(long)]
        office_square_feet: i64,
    },
    /// Show the current home office configuration
    Show,
}

pub async fn home_office(
    repo: &dyn LedgerRepository,
    command: HomeOfficeCommand,
) -> Result<()> {
    match command {
        HomeOfficeCommand::SetSimplified { square_feet } => {
            let stored = repo
                .put_home_office(deductions::simplified_home_office(square_feet))
                .await?;
            println!(
                "Home office (simplified): {} sq ft, {} / year",
                stored.office_square_feet,
                usd(stored.annual_deduction)
            );
        }
        HomeOfficeCommand::SetActual {
            home_square_feet,
            office_square_feet,
        } => {
            let config = deductions::actual_home_office(home_square_feet, office_square_feet)?;
            let stored = repo.put_home_office(config).await?;
            let percentage = stored
                .business_percentage
                .map(|p| p.to_string())
                .unwrap_or_else(|| "0".to_string());
            println!(
                "Home office (actual): {} of {} sq ft, {}% business use",
                stored.office_square_feet,
                home_square_feet,
                percentage
            );
        }
        HomeOfficeCommand::Show => match repo.get_home_office().await? {
            Some(config) => {
                println!("Method:           {}", config.method.as_str());
                println!("Office area:      {} sq ft", config.office_square_feet);
                if let Some(home) = config.home_square_feet {
                    println!("Home area:        {home} sq ft");
                }
                if let Some(pct) = config.business_percentage {
                    println!("Business use:     {pct}%");
                }
                println!("Annual deduction: {}", usd(config.annual_deduction));
            }
            None => println!("No home office configured."),
        },
    }
    Ok(())
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Store the tax settings (replaces any previous value)
    Set {
        #[arg(long)]
        tax_year: i32,
        /// single, married-joint, married-separate, or head-of-household;
        /// anything else falls back to single
        #[arg(long)]
        filing_status: String,
        #[arg(long)]
        business_name: Option<String>,
        #[arg(long, default_value = "0")]
        other_income: Decimal,
        #[arg(long, default_value = "0")]
        prior_year_tax: Decimal,
    },
    /// Show the current tax settings
    Show,
}

pub async fn settings(
    repo: &dyn LedgerRepository,
    command: SettingsCommand,
) -> Result<()> {
    match command {
        SettingsCommand::Set {
            tax_year,
            filing_status,
            business_name,
            other_income,
            prior_year_tax,
        } => {
            let stored = repo
                .put_tax_settings(NewTaxSettings {
                    business_name,
                    tax_year,
                    filing_status: FilingStatus::parse_or_single(&filing_status),
                    other_income,
                    prior_year_tax,
                })
                .await?;
            println!(
                "Tax settings saved: {} filing {}",
                stored.tax_year, stored.filing_status
            );
        }
        SettingsCommand::Show => match repo.get_tax_settings().await? {
            Some(settings) => {
                if let Some(name) = &settings.business_name {
                    println!("Business:       {name}");
                }
                println!("Tax year:       {}", settings.tax_year);
                println!("Filing status:  {}", settings.filing_status);
                println!("Other income:   {}", usd(settings.other_income));
                println!("Prior year tax: {}", usd(settings.prior_year_tax));
            }
            None => println!("No tax settings configured."),
        },
    }
    Ok(())
}

pub async fn overview(
    repo: &dyn LedgerRepository,
    tables: &TaxTableSet,
) -> Result<()> {
    let summary = repo.financial_summary().await?;
    let settings = repo.get_tax_settings().await?;
    let breakdown = assemble_breakdown(&summary, settings.as_ref(), tables);
    print_breakdown(&breakdown, false);
    Ok(())
}

pub async fn breakdown(
    repo: &dyn LedgerRepository,
    tables: &TaxTableSet,
) -> Result<()> {
    let summary = repo.financial_summary().await?;
    let settings = repo.get_tax_settings().await?;
    let breakdown = detailed_breakdown(&summary, settings.as_ref(), tables)?;
    print_breakdown(&breakdown, true);
    Ok(())
}

pub async fn reminders(
    repo: &dyn LedgerRepository,
    year: Option<i32>,
) -> Result<()> {
    let today = Utc::now().date_naive();
    let year = match year {
        Some(year) => year,
        None => match repo.get_tax_settings().await? {
            Some(settings) => settings.tax_year,
            None => today.year(),
        },
    };

    println!("Estimated payment schedule for {year}:");
    for reminder in payment_reminders(year, today) {
        println!(
            "{}  due {}  {:>9}  ({} days)",
            reminder.quarter,
            reminder.due_date,
            reminder.status.as_str(),
            reminder.days_until_due
        );
    }
    Ok(())
}

fn print_breakdown(
    breakdown: &TaxBreakdown,
    detailed: bool,
) {
    println!("Income:                {:>14}", usd(breakdown.total_income));
    println!("Expenses:              {:>14}", usd(breakdown.total_expenses));
    println!("Mileage deduction:     {:>14}", usd(breakdown.mileage_deductions));
    println!("Home office deduction: {:>14}", usd(breakdown.home_office_deduction));
    println!("Utility deduction:     {:>14}", usd(breakdown.utility_deductions));
    println!("Net profit:            {:>14}", usd(breakdown.net_profit));
    println!();
    println!("Self-employment tax:   {:>14}", usd(breakdown.self_employment_tax));
    println!("Income tax:            {:>14}", usd(breakdown.income_tax));
    println!("Additional Medicare:   {:>14}", usd(breakdown.additional_medicare_tax));
    println!("Total tax:             {:>14}", usd(breakdown.total_tax));

    match (breakdown.tax_year, breakdown.filing_status) {
        (Some(year), Some(status)) => {
            println!();
            println!("Tax year {year}, filing {status}");
        }
        _ => {
            println!();
            println!("Tax settings not configured; income tax not estimated.");
        }
    }

    if detailed && !breakdown.bracket_details.is_empty() {
        println!();
        println!("{:<22} {:>14} {:>12}  range", "bracket", "income", "tax");
        for detail in &breakdown.bracket_details {
            println!(
                "{:<22} {:>14} {:>12}  {}",
                detail.label,
                usd(detail.income_in_bracket),
                usd(detail.tax_in_bracket),
                detail.range
            );
        }
    }
}
