//! Versioned bracket and deduction tables.
//!
//! Maps `(tax_year, filing_status)` to an ordered marginal-rate bracket
//! sequence, the standard deduction, and the Social Security wage base for
//! that year. Tables are plain data: future years are added by extending the
//! set (or loading an external file), not by changing calculation logic.
//!
//! Lookup never fails. Years without a table resolve to the default year
//! (2024); the resolution result carries [`ResolvedTable::used_default_year`]
//! so callers that care about precision can surface the fallback. An unknown
//! filing status is handled upstream by
//! [`FilingStatus::parse_or_single`](crate::models::FilingStatus::parse_or_single),
//! so every status reaching this module has a table.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::FilingStatus;

/// One marginal-rate step. `upper_limit` is `None` for the unbounded top
/// bracket, which must come last and absorbs all remaining income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBracket {
    pub upper_limit: Option<Decimal>,
    pub rate: Decimal,
}

/// Brackets plus standard deduction for one `(year, filing status)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTable {
    pub standard_deduction: Decimal,
    pub brackets: Vec<RateBracket>,
}

/// All tables for a single tax year, one per filing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearTables {
    pub ss_wage_base: Decimal,
    pub single: TaxTable,
    pub married_joint: TaxTable,
    pub married_separate: TaxTable,
    pub head_of_household: TaxTable,
}

impl YearTables {
    pub fn for_status(&self, status: FilingStatus) -> &TaxTable {
        match status {
            FilingStatus::Single => &self.single,
            FilingStatus::MarriedJoint => &self.married_joint,
            FilingStatus::MarriedSeparate => &self.married_separate,
            FilingStatus::HeadOfHousehold => &self.head_of_household,
        }
    }
}

/// The full versioned table set, keyed by tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTableSet {
    default_year: i32,
    default: YearTables,
    other_years: BTreeMap<i32, YearTables>,
}

/// Result of a table lookup. Borrows the bracket sequence from the set.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTable<'a> {
    /// The year the caller asked for.
    pub requested_year: i32,
    /// The year whose tables were actually used.
    pub year_used: i32,
    /// True when the requested year had no tables and the default year's
    /// tables were substituted. A deliberate policy, not an error.
    pub used_default_year: bool,
    pub standard_deduction: Decimal,
    pub ss_wage_base: Decimal,
    pub brackets: &'a [RateBracket],
}

fn bracket(upper: i64, rate_pct: i64) -> RateBracket {
    RateBracket {
        upper_limit: Some(Decimal::from(upper)),
        rate: Decimal::new(rate_pct, 2),
    }
}

fn top_bracket(rate_pct: i64) -> RateBracket {
    RateBracket {
        upper_limit: None,
        rate: Decimal::new(rate_pct, 2),
    }
}

fn table(standard_deduction: i64, brackets: Vec<RateBracket>) -> TaxTable {
    TaxTable {
        standard_deduction: Decimal::from(standard_deduction),
        brackets,
    }
}

fn year_2024() -> YearTables {
    YearTables {
        ss_wage_base: Decimal::from(160_200),
        single: table(
            14_600,
            vec![
                bracket(11_600, 10),
                bracket(47_150, 12),
                bracket(100_525, 22),
                bracket(191_950, 24),
                bracket(243_725, 32),
                bracket(609_350, 35),
                top_bracket(37),
            ],
        ),
        married_joint: table(
            29_200,
            vec![
                bracket(23_200, 10),
                bracket(94_300, 12),
                bracket(201_050, 22),
                bracket(383_900, 24),
                bracket(487_450, 32),
                bracket(731_200, 35),
                top_bracket(37),
            ],
        ),
        married_separate: table(
            14_600,
            vec![
                bracket(11_600, 10),
                bracket(47_150, 12),
                bracket(100_525, 22),
                bracket(191_950, 24),
                bracket(243_725, 32),
                bracket(365_600, 35),
                top_bracket(37),
            ],
        ),
        head_of_household: table(
            21_900,
            vec![
                bracket(16_550, 10),
                bracket(63_100, 12),
                bracket(100_500, 22),
                bracket(191_950, 24),
                bracket(243_700, 32),
                bracket(609_350, 35),
                top_bracket(37),
            ],
        ),
    }
}

fn year_2025() -> YearTables {
    YearTables {
        ss_wage_base: Decimal::from(176_100),
        single: table(
            15_000,
            vec![
                bracket(11_925, 10),
                bracket(48_475, 12),
                bracket(103_350, 22),
                bracket(197_300, 24),
                bracket(250_525, 32),
                bracket(626_350, 35),
                top_bracket(37),
            ],
        ),
        married_joint: table(
            30_000,
            vec![
                bracket(23_850, 10),
                bracket(96_950, 12),
                bracket(206_700, 22),
                bracket(394_600, 24),
                bracket(501_050, 32),
                bracket(751_600, 35),
                top_bracket(37),
            ],
        ),
        married_separate: table(
            15_000,
            vec![
                bracket(11_925, 10),
                bracket(48_475, 12),
                bracket(103_350, 22),
                bracket(197_300, 24),
                bracket(250_525, 32),
                bracket(375_800, 35),
                top_bracket(37),
            ],
        ),
        head_of_household: table(
            22_500,
            vec![
                bracket(17_000, 10),
                bracket(64_850, 12),
                bracket(103_350, 22),
                bracket(197_300, 24),
                bracket(250_500, 32),
                bracket(626_350, 35),
                top_bracket(37),
            ],
        ),
    }
}

impl TaxTableSet {
    /// The built-in table set: exact 2024 and 2025 IRS figures, with 2024
    /// as the default year for anything else.
    pub fn builtin() -> Self {
        let mut other_years = BTreeMap::new();
        other_years.insert(2025, year_2025());
        Self {
            default_year: 2024,
            default: year_2024(),
            other_years,
        }
    }

    /// Builds a set from externally loaded year tables. Returns `None` when
    /// the map has no entry for `default_year` — the default must always be
    /// resolvable.
    pub fn from_years(
        default_year: i32,
        mut years: BTreeMap<i32, YearTables>,
    ) -> Option<Self> {
        let default = years.remove(&default_year)?;
        Some(Self {
            default_year,
            default,
            other_years: years,
        })
    }

    pub fn default_year(&self) -> i32 {
        self.default_year
    }

    /// Years that have their own tables, ascending.
    pub fn known_years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.other_years.keys().copied().collect();
        years.push(self.default_year);
        years.sort_unstable();
        years
    }

    /// Looks up the table for `(tax_year, status)`.
    ///
    /// Never fails: an unknown year falls back to the default year's tables,
    /// flagged on the result and logged.
    pub fn resolve(
        &self,
        tax_year: i32,
        status: FilingStatus,
    ) -> ResolvedTable<'_> {
        let (year_used, year_tables) = if tax_year == self.default_year {
            (tax_year, &self.default)
        } else {
            match self.other_years.get(&tax_year) {
                Some(tables) => (tax_year, tables),
                None => {
                    warn!(
                        tax_year,
                        default_year = self.default_year,
                        "no tables for requested year; using default year tables"
                    );
                    (self.default_year, &self.default)
                }
            }
        };

        let table = year_tables.for_status(status);

        ResolvedTable {
            requested_year: tax_year,
            year_used,
            used_default_year: year_used != tax_year,
            standard_deduction: table.standard_deduction,
            ss_wage_base: year_tables.ss_wage_base,
            brackets: &table.brackets,
        }
    }

    /// The default year's single-filer table; used for the Social Security
    /// wage base when no tax settings are configured yet.
    pub fn default_tables(&self) -> ResolvedTable<'_> {
        self.resolve(self.default_year, FilingStatus::Single)
    }
}

impl Default for TaxTableSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn builtin_has_2024_and_2025() {
        assert_eq!(TaxTableSet::builtin().known_years(), vec![2024, 2025]);
    }

    #[test]
    fn resolve_2024_single_matches_irs_figures() {
        let tables = TaxTableSet::builtin();
        let resolved = tables.resolve(2024, FilingStatus::Single);

        assert!(!resolved.used_default_year);
        assert_eq!(resolved.standard_deduction, dec!(14600));
        assert_eq!(resolved.ss_wage_base, dec!(160200));
        assert_eq!(resolved.brackets.len(), 7);
        assert_eq!(resolved.brackets[0].upper_limit, Some(dec!(11600)));
        assert_eq!(resolved.brackets[0].rate, dec!(0.10));
        assert_eq!(resolved.brackets[6].upper_limit, None);
        assert_eq!(resolved.brackets[6].rate, dec!(0.37));
    }

    #[test]
    fn resolve_2025_married_joint_uses_2025_deduction() {
        let tables = TaxTableSet::builtin();
        let resolved = tables.resolve(2025, FilingStatus::MarriedJoint);

        assert!(!resolved.used_default_year);
        assert_eq!(resolved.standard_deduction, dec!(30000));
        assert_eq!(resolved.ss_wage_base, dec!(176100));
    }

    #[test]
    fn unknown_year_falls_back_to_2024_tables() {
        let tables = TaxTableSet::builtin();
        let resolved = tables.resolve(2030, FilingStatus::Single);

        assert!(resolved.used_default_year);
        assert_eq!(resolved.requested_year, 2030);
        assert_eq!(resolved.year_used, 2024);
        assert_eq!(resolved.standard_deduction, dec!(14600));
        assert_eq!(resolved.ss_wage_base, dec!(160200));
    }

    #[test]
    fn brackets_are_strictly_increasing_for_every_builtin_table() {
        let tables = TaxTableSet::builtin();
        for year in tables.known_years() {
            for status in FilingStatus::ALL {
                let resolved = tables.resolve(year, status);
                let mut previous = Decimal::ZERO;
                let (last, bounded) =
                    resolved.brackets.split_last().expect("table has brackets");
                for bracket in bounded {
                    let limit = bracket.upper_limit.expect("only the top is unbounded");
                    assert!(limit > previous, "{year}/{status}: limits must increase");
                    previous = limit;
                }
                assert_eq!(last.upper_limit, None, "{year}/{status}: top is unbounded");
            }
        }
    }

    #[test]
    fn from_years_requires_default_year_tables() {
        let mut years = BTreeMap::new();
        years.insert(2025, year_2025());

        assert!(TaxTableSet::from_years(2024, years.clone()).is_none());

        years.insert(2024, year_2024());
        let set = TaxTableSet::from_years(2024, years).expect("default year present");
        assert_eq!(set.known_years(), vec![2024, 2025]);
    }

    #[test]
    fn default_tables_is_2024_single() {
        let tables = TaxTableSet::builtin();
        let resolved = tables.default_tables();

        assert_eq!(resolved.year_used, 2024);
        assert_eq!(resolved.ss_wage_base, dec!(160200));
    }
}
