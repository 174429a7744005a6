pub mod calculations;
pub mod db;
pub mod models;
pub mod tables;

pub use db::repository::{LedgerRepository, RepositoryError};
pub use models::*;
pub use tables::{RateBracket, ResolvedTable, TaxTable, TaxTableSet};
