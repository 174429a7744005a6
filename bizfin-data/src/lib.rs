pub mod loader;

pub use loader::{TaxTableLoader, TaxTableLoaderError, TaxTableRecord};
