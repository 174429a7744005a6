use async_trait::async_trait;

use bizfin_core::db::{DbConfig, RepositoryFactory};
use bizfin_core::{LedgerRepository, RepositoryError};

use crate::repository::SqliteRepository;

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`bizfin_core::db::RepositoryRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use bizfin_core::db::RepositoryRegistry;
/// use bizfin_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string` and run
    /// migrations on it.
    ///
    /// Accepted connection-string values are sqlx SQLite URLs:
    /// * `sqlite:business_finance.db?mode=rwc` — a file, created if missing.
    /// * `sqlite::memory:` — an ephemeral in-memory database (tests).
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn LedgerRepository>, RepositoryError> {
        let repo = SqliteRepository::new(&config.connection_string).await?;
        repo.run_migrations().await?;
        Ok(Box::new(repo))
    }
}

#[cfg(test)]
mod tests {
    use bizfin_core::db::{DbConfig, RepositoryFactory};

    use super::SqliteRepositoryFactory;

    #[test]
    fn backend_name_is_sqlite() {
        assert_eq!(SqliteRepositoryFactory.backend_name(), "sqlite");
    }

    /// Full round-trip: factory → SqliteRepository with an in-memory DB,
    /// including migrations.
    #[tokio::test]
    async fn creates_in_memory_repository() {
        let config = DbConfig {
            backend: "sqlite".to_string(),
            connection_string: "sqlite::memory:".to_string(),
        };

        let repo = SqliteRepositoryFactory
            .create(&config)
            .await
            .expect("in-memory repository");

        // migrations ran: the empty ledger sums to zero
        let summary = repo.financial_summary().await.expect("summary");
        assert!(summary.total_income.is_zero());
    }
}
