//! Self-employment tax.
//!
//! SE tax is the combined Social-Security and Medicare equivalent levied on
//! net self-employment earnings:
//!
//! 1. net earnings = net profit × 92.35%
//! 2. Social Security portion: 12.4% of net earnings, up to the wage base
//! 3. Medicare portion: 2.9% of all net earnings, uncapped
//!
//! A net loss (net profit ≤ 0) owes nothing. The total is rounded to cents
//! once at the end, not per portion.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use bizfin_core::calculations::{SeTax, SeTaxConfig};
//!
//! let se = SeTax::new(SeTaxConfig::with_wage_base(dec!(160200)));
//! let result = se.calculate(dec!(100000));
//!
//! assert_eq!(result.net_earnings, dec!(92350.00));
//! assert_eq!(result.social_security_tax, dec!(11451.40));
//! assert_eq!(result.medicare_tax, dec!(2678.15));
//! assert_eq!(result.total, dec!(14129.55));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::round_half_up;
use crate::tables::ResolvedTable;

/// Rates and limits for one SE tax computation. Only the wage base varies
/// by year; the rates have been stable and are filled in by the
/// constructors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeTaxConfig {
    /// Maximum earnings subject to the Social Security portion.
    pub ss_wage_base: Decimal,
    /// Combined employer and employee Social Security rate (12.4%).
    pub ss_tax_rate: Decimal,
    /// Combined employer and employee Medicare rate (2.9%).
    pub medicare_tax_rate: Decimal,
    /// Portion of net profit counted as net earnings (92.35%).
    pub net_earnings_factor: Decimal,
}

impl SeTaxConfig {
    /// Standard rates with the given Social Security wage base.
    pub fn with_wage_base(ss_wage_base: Decimal) -> Self {
        Self {
            ss_wage_base,
            ss_tax_rate: Decimal::new(124, 3),
            medicare_tax_rate: Decimal::new(29, 3),
            net_earnings_factor: Decimal::new(9235, 4),
        }
    }

    /// Standard rates with the wage base taken from a resolved year table.
    pub fn from_table(table: &ResolvedTable<'_>) -> Self {
        Self::with_wage_base(table.ss_wage_base)
    }
}

/// Result of an SE tax computation, with the portions exposed for
/// presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeTaxBreakdown {
    /// Net earnings after the 92.35% factor, rounded to cents.
    pub net_earnings: Decimal,
    /// Social Security portion, rounded to cents for display.
    pub social_security_tax: Decimal,
    /// Medicare portion, rounded to cents for display.
    pub medicare_tax: Decimal,
    /// Total SE tax: the unrounded portions summed, then rounded once.
    pub total: Decimal,
}

impl SeTaxBreakdown {
    fn zero() -> Self {
        Self {
            net_earnings: Decimal::ZERO,
            social_security_tax: Decimal::ZERO,
            medicare_tax: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }
}

/// Calculator for self-employment tax.
#[derive(Debug, Clone)]
pub struct SeTax {
    config: SeTaxConfig,
}

impl SeTax {
    pub fn new(config: SeTaxConfig) -> Self {
        Self { config }
    }

    /// Computes SE tax on `net_profit`. A loss or break-even year owes
    /// nothing.
    pub fn calculate(
        &self,
        net_profit: Decimal,
    ) -> SeTaxBreakdown {
        if net_profit <= Decimal::ZERO {
            debug!(%net_profit, "net profit is zero or a loss; no SE tax due");
            return SeTaxBreakdown::zero();
        }

        let net_earnings = net_profit * self.config.net_earnings_factor;
        let ss_taxable = net_earnings.min(self.config.ss_wage_base);
        let ss_tax = ss_taxable * self.config.ss_tax_rate;
        let medicare_tax = net_earnings * self.config.medicare_tax_rate;

        SeTaxBreakdown {
            net_earnings: round_half_up(net_earnings),
            social_security_tax: round_half_up(ss_tax),
            medicare_tax: round_half_up(medicare_tax),
            total: round_half_up(ss_tax + medicare_tax),
        }
    }
}
