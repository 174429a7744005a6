//! Loads bracket and deduction tables from CSV files.
//!
//! Tables are configuration data: when the IRS publishes a new year, the
//! CSV grows four more bracket groups and the calculation code does not
//! change. One row per bracket, with these columns:
//!
//! - `tax_year`: the tax year (e.g. 2025)
//! - `filing_status`: `single`, `married-joint`, `married-separate`,
//!   or `head-of-household`
//! - `upper_limit`: the bracket's upper income limit (empty for the
//!   unbounded top bracket, which must be the last row of its group)
//! - `rate`: the marginal rate as a decimal (e.g. 0.10)
//! - `standard_deduction`: the standard deduction for this year/status,
//!   repeated on every row of the group
//! - `ss_wage_base`: the Social Security wage base for this year,
//!   repeated on every row of the year
//!
//! Loading is strict: every year must carry all four filing statuses,
//! limits must strictly increase, and the repeated columns must agree
//! within their group. A malformed table file is a configuration error,
//! not something to paper over at calculation time.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use bizfin_core::models::FilingStatus;
use bizfin_core::tables::{RateBracket, TaxTable, TaxTableSet, YearTables};

/// Errors that can occur when loading tax table data.
#[derive(Debug, Error)]
pub enum TaxTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown filing status '{0}'")]
    UnknownFilingStatus(String),

    #[error("No records in table file")]
    NoRecords,

    #[error("Tax year {tax_year} is missing the '{status}' filing status")]
    MissingFilingStatus {
        tax_year: i32,
        status: FilingStatus,
    },

    #[error("Tax year {tax_year}/{status}: bracket limits must strictly increase")]
    NonIncreasingLimits {
        tax_year: i32,
        status: FilingStatus,
    },

    #[error(
        "Tax year {tax_year}/{status}: exactly the last bracket must have an empty upper limit"
    )]
    BadUnboundedBracket {
        tax_year: i32,
        status: FilingStatus,
    },

    #[error("Tax year {tax_year}/{status}: standard_deduction differs between rows")]
    InconsistentDeduction {
        tax_year: i32,
        status: FilingStatus,
    },

    #[error("Tax year {tax_year}: ss_wage_base differs between rows")]
    InconsistentWageBase { tax_year: i32 },

    #[error("Default year {0} has no tables in the file")]
    MissingDefaultYear(i32),
}

impl From<csv::Error> for TaxTableLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single row from the tax tables CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxTableRecord {
    pub tax_year: i32,
    pub filing_status: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_limit: Option<Decimal>,
    pub rate: Decimal,
    pub standard_deduction: Decimal,
    pub ss_wage_base: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Per-group accumulator while building a year's tables.
struct StatusGroup {
    standard_deduction: Decimal,
    brackets: Vec<RateBracket>,
}

/// Loader for tax table data from CSV files.
pub struct TaxTableLoader;

impl TaxTableLoader {
    /// Parse table rows from a CSV reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxTableRecord>, TaxTableLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxTableRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Validate parsed rows and build a [`TaxTableSet`].
    pub fn build(
        records: &[TaxTableRecord],
        default_year: i32,
    ) -> Result<TaxTableSet, TaxTableLoaderError> {
        if records.is_empty() {
            return Err(TaxTableLoaderError::NoRecords);
        }

        // Group rows by year, then by status, preserving file order within
        // each bracket group.
        let mut years: BTreeMap<i32, (Decimal, HashMap<FilingStatus, StatusGroup>)> =
            BTreeMap::new();

        for record in records {
            let status = FilingStatus::parse(&record.filing_status).ok_or_else(|| {
                TaxTableLoaderError::UnknownFilingStatus(record.filing_status.clone())
            })?;

            let (wage_base, groups) = years
                .entry(record.tax_year)
                .or_insert_with(|| (record.ss_wage_base, HashMap::new()));

            if *wage_base != record.ss_wage_base {
                return Err(TaxTableLoaderError::InconsistentWageBase {
                    tax_year: record.tax_year,
                });
            }

            let group = groups.entry(status).or_insert_with(|| StatusGroup {
                standard_deduction: record.standard_deduction,
                brackets: Vec::new(),
            });

            if group.standard_deduction != record.standard_deduction {
                return Err(TaxTableLoaderError::InconsistentDeduction {
                    tax_year: record.tax_year,
                    status,
                });
            }

            group.brackets.push(RateBracket {
                upper_limit: record.upper_limit,
                rate: record.rate,
            });
        }

        let mut year_tables = BTreeMap::new();
        for (tax_year, (ss_wage_base, mut groups)) in years {
            let mut take = |status: FilingStatus| -> Result<TaxTable, TaxTableLoaderError> {
                let group = groups
                    .remove(&status)
                    .ok_or(TaxTableLoaderError::MissingFilingStatus { tax_year, status })?;
                validate_brackets(tax_year, status, &group.brackets)?;
                Ok(TaxTable {
                    standard_deduction: group.standard_deduction,
                    brackets: group.brackets,
                })
            };

            year_tables.insert(
                tax_year,
                YearTables {
                    ss_wage_base,
                    single: take(FilingStatus::Single)?,
                    married_joint: take(FilingStatus::MarriedJoint)?,
                    married_separate: take(FilingStatus::MarriedSeparate)?,
                    head_of_household: take(FilingStatus::HeadOfHousehold)?,
                },
            );
        }

        TaxTableSet::from_years(default_year, year_tables)
            .ok_or(TaxTableLoaderError::MissingDefaultYear(default_year))
    }

    /// Parse and build in one step.
    pub fn load<R: Read>(
        reader: R,
        default_year: i32,
    ) -> Result<TaxTableSet, TaxTableLoaderError> {
        let records = Self::parse(reader)?;
        Self::build(&records, default_year)
    }

    /// Load a table set from a CSV file on disk.
    pub fn load_path(
        path: &Path,
        default_year: i32,
    ) -> Result<TaxTableSet, TaxTableLoaderError> {
        let file = File::open(path)?;
        Self::load(file, default_year)
    }
}

fn validate_brackets(
    tax_year: i32,
    status: FilingStatus,
    brackets: &[RateBracket],
) -> Result<(), TaxTableLoaderError> {
    let Some((last, bounded)) = brackets.split_last() else {
        return Err(TaxTableLoaderError::MissingFilingStatus { tax_year, status });
    };

    if last.upper_limit.is_some() {
        return Err(TaxTableLoaderError::BadUnboundedBracket { tax_year, status });
    }

    let mut previous = Decimal::ZERO;
    for bracket in bounded {
        let Some(limit) = bracket.upper_limit else {
            return Err(TaxTableLoaderError::BadUnboundedBracket { tax_year, status });
        };
        if limit <= previous {
            return Err(TaxTableLoaderError::NonIncreasingLimits { tax_year, status });
        }
        previous = limit;
    }

    Ok(())
}
