mod commands;
mod util;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bizfin_core::db::{DbConfig, RepositoryRegistry};
use bizfin_core::{LedgerRepository, TaxTableSet};
use bizfin_data::TaxTableLoader;
use bizfin_db_sqlite::SqliteRepositoryFactory;

/// Schedule C finance tracker for the self-employed: income, expenses,
/// deductions, estimated payments, and the resulting tax picture.
#[derive(Parser, Debug)]
#[command(name = "bizfin")]
#[command(version, about, long_about = None)]
struct Cli {
    /// SQLite database URL
    #[arg(
        long,
        global = true,
        default_value = "sqlite:business_finance.db?mode=rwc"
    )]
    database: String,

    /// Tax tables CSV overriding the built-in 2024/2025 tables
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Financial overview with the current tax estimate
    Overview,
    /// Detailed tax breakdown with per-bracket figures (requires settings)
    Breakdown,
    /// Quarterly estimated-payment reminders
    Reminders {
        /// Tax year; defaults to the configured year, then the current one
        #[arg(long)]
        year: Option<i32>,
    },
    /// Income records
    #[command(subcommand)]
    Income(commands::IncomeCommand),
    /// Expense records
    #[command(subcommand)]
    Expense(commands::ExpenseCommand),
    /// Business mileage log
    #[command(subcommand)]
    Mileage(commands::MileageCommand),
    /// Utility deductions
    #[command(subcommand)]
    Utility(commands::UtilityCommand),
    /// Estimated tax payments
    #[command(subcommand)]
    Payment(commands::PaymentCommand),
    /// Savings goals
    #[command(subcommand)]
    Goal(commands::GoalCommand),
    /// Home office configuration
    #[command(subcommand)]
    HomeOffice(commands::HomeOfficeCommand),
    /// Tax settings
    #[command(subcommand)]
    Settings(commands::SettingsCommand),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_tables(path: Option<&PathBuf>) -> Result<TaxTableSet> {
    match path {
        Some(path) => TaxTableLoader::load_path(path, 2024)
            .with_context(|| format!("failed to load tax tables from: {}", path.display())),
        None => Ok(TaxTableSet::builtin()),
    }
}

async fn open_repository(database: &str) -> Result<Box<dyn LedgerRepository>> {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));

    let config = DbConfig {
        backend: "sqlite".to_string(),
        connection_string: database.to_string(),
    };
    tracing::debug!(database, "opening ledger database");
    registry
        .create(&config)
        .await
        .with_context(|| format!("failed to open database: {database}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let tables = load_tables(cli.tables.as_ref())?;
    let repo = open_repository(&cli.database).await?;
    let repo = repo.as_ref();

    match cli.command {
        Commands::Overview => commands::overview(repo, &tables).await,
        Commands::Breakdown => commands::breakdown(repo, &tables).await,
        Commands::Reminders { year } => commands::reminders(repo, year).await,
        Commands::Income(command) => commands::income(repo, command).await,
        Commands::Expense(command) => commands::expense(repo, command).await,
        Commands::Mileage(command) => commands::mileage(repo, command).await,
        Commands::Utility(command) => commands::utility(repo, command).await,
        Commands::Payment(command) => commands::payment(repo, command).await,
        Commands::Goal(command) => commands::goal(repo, command).await,
        Commands::HomeOffice(command) => commands::home_office(repo, command).await,
        Commands::Settings(command) => commands::settings(repo, command).await,
    }
}
