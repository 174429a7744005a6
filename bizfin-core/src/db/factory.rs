use std::collections::HashMap;

use async_trait::async_trait;

use super::repository::{LedgerRepository, RepositoryError};

/// Backend-agnostic connection configuration.
///
/// `backend` must match the [`RepositoryFactory::backend_name`] of a
/// registered factory. `connection_string` is passed through to that
/// factory unchanged — its meaning is entirely backend-specific.
///
/// | backend    | connection_string examples               |
/// |------------|------------------------------------------|
/// | `sqlite`   | `business_finance.db`, `sqlite::memory:` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"sqlite"`).
    pub backend: String,
    /// Opaque value forwarded to the factory's `create` method.
    pub connection_string: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: "sqlite::memory:".to_string(),
        }
    }
}

/// One implementation per database backend. Each backend crate exports a
/// single unit struct that implements this trait and is registered with a
/// [`RepositoryRegistry`] at startup.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Open (or create) a connection and return a ready-to-use repository.
    /// Implementations are free to run migrations or warm connection pools
    /// inside this method.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn LedgerRepository>, RepositoryError>;
}

/// Registry of [`RepositoryFactory`] instances, keyed by backend name.
///
/// Typical lifetime:
/// 1. Create with `RepositoryRegistry::new()`.
/// 2. Call `register` once per known backend.
/// 3. Call `create` whenever a new repository is needed.
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a backend factory.
    ///
    /// If a factory with the same [`RepositoryFactory::backend_name`] is
    /// already present it is silently replaced.
    pub fn register(&mut self, factory: Box<dyn RepositoryFactory>) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory that matches `config.backend` and return
    /// the repository it produces.
    ///
    /// # Errors
    /// * [`RepositoryError::Configuration`] — no factory is registered for
    ///   the requested backend name.
    /// * Any error the chosen factory itself returns.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn LedgerRepository>, RepositoryError> {
        let factory = self.factories.get(config.backend.as_str()).ok_or_else(|| {
            RepositoryError::Configuration(format!(
                "unknown backend '{}'; available: {:?}",
                config.backend,
                self.available_backends()
            ))
        })?;

        factory.create(config).await
    }
}

impl Default for RepositoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// tests
// ─────────────────────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use crate::models::{
        ExpenseRecord, HomeOffice, IncomeRecord, MileageRecord, NewExpenseRecord, NewHomeOffice,
        NewIncomeRecord, NewMileageRecord, NewSavingsGoal, NewTaxPayment, NewTaxSettings,
        NewUtilityRecord, SavingsGoal, TaxPaymentRecord, TaxSettings, UtilityRecord,
    };

    use super::{DbConfig, LedgerRepository, RepositoryError, RepositoryFactory,
        RepositoryRegistry};

    // ── stub repository ──────────────────────────────────────────────────
    // Every method is `unimplemented!()` — the tests never call them;
    // they only verify that the registry routes to the correct factory.
    struct StubRepository;

    #[rustfmt::skip]
    #[async_trait]
    impl LedgerRepository for StubRepository {
        async fn create_income(&self, _: NewIncomeRecord) -> Result<IncomeRecord, RepositoryError> { unimplemented!() }
        async fn get_income(&self, _: i64) -> Result<IncomeRecord, RepositoryError> { unimplemented!() }
        async fn update_income(&self, _: &IncomeRecord) -> Result<(), RepositoryError> { unimplemented!() }
        async fn delete_income(&self, _: i64) -> Result<(), RepositoryError> { unimplemented!() }
        async fn list_income(&self) -> Result<Vec<IncomeRecord>, RepositoryError> { unimplemented!() }
        async fn total_income(&self) -> Result<Decimal, RepositoryError> { unimplemented!() }
        async fn create_expense(&self, _: NewExpenseRecord) -> Result<ExpenseRecord, RepositoryError> { unimplemented!() }
        async fn get_expense(&self, _: i64) -> Result<ExpenseRecord, RepositoryError> { unimplemented!() }
        async fn update_expense(&self, _: &ExpenseRecord) -> Result<(), RepositoryError> { unimplemented!() }
        async fn delete_expense(&self, _: i64) -> Result<(), RepositoryError> { unimplemented!() }
        async fn list_expenses(&self) -> Result<Vec<ExpenseRecord>, RepositoryError> { unimplemented!() }
        async fn total_expenses(&self) -> Result<Decimal, RepositoryError> { unimplemented!() }
        async fn create_mileage(&self, _: NewMileageRecord) -> Result<MileageRecord, RepositoryError> { unimplemented!() }
        async fn get_mileage(&self, _: i64) -> Result<MileageRecord, RepositoryError> { unimplemented!() }
        async fn update_mileage(&self, _: &MileageRecord) -> Result<(), RepositoryError> { unimplemented!() }
        async fn delete_mileage(&self, _: i64) -> Result<(), RepositoryError> { unimplemented!() }
        async fn list_mileage(&self) -> Result<Vec<MileageRecord>, RepositoryError> { unimplemented!() }
        async fn total_mileage_deduction(&self) -> Result<Decimal, RepositoryError> { unimplemented!() }
        async fn create_utility(&self, _: NewUtilityRecord) -> Result<UtilityRecord, RepositoryError> { unimplemented!() }
        async fn get_utility(&self, _: i64) -> Result<UtilityRecord, RepositoryError> { unimplemented!() }
        async fn update_utility(&self, _: &UtilityRecord) -> Result<(), RepositoryError> { unimplemented!() }
        async fn delete_utility(&self, _: i64) -> Result<(), RepositoryError> { unimplemented!() }
        async fn list_utilities(&self) -> Result<Vec<UtilityRecord>, RepositoryError> { unimplemented!() }
        async fn total_utility_deduction(&self) -> Result<Decimal, RepositoryError> { unimplemented!() }
        async fn create_tax_payment(&self, _: NewTaxPayment) -> Result<TaxPaymentRecord, RepositoryError> { unimplemented!() }
        async fn get_tax_payment(&self, _: i64) -> Result<TaxPaymentRecord, RepositoryError> { unimplemented!() }
        async fn update_tax_payment(&self, _: &TaxPaymentRecord) -> Result<(), RepositoryError> { unimplemented!() }
        async fn delete_tax_payment(&self, _: i64) -> Result<(), RepositoryError> { unimplemented!() }
        async fn list_tax_payments(&self) -> Result<Vec<TaxPaymentRecord>, RepositoryError> { unimplemented!() }
        async fn create_savings_goal(&self, _: NewSavingsGoal) -> Result<SavingsGoal, RepositoryError> { unimplemented!() }
        async fn get_savings_goal(&self, _: i64) -> Result<SavingsGoal, RepositoryError> { unimplemented!() }
        async fn update_savings_goal(&self, _: &SavingsGoal) -> Result<(), RepositoryError> { unimplemented!() }
        async fn delete_savings_goal(&self, _: i64) -> Result<(), RepositoryError> { unimplemented!() }
        async fn list_savings_goals(&self) -> Result<Vec<SavingsGoal>, RepositoryError> { unimplemented!() }
        async fn get_home_office(&self) -> Result<Option<HomeOffice>, RepositoryError> { unimplemented!() }
        async fn put_home_office(&self, _: NewHomeOffice) -> Result<HomeOffice, RepositoryError> { unimplemented!() }
        async fn get_tax_settings(&self) -> Result<Option<TaxSettings>, RepositoryError> { unimplemented!() }
        async fn put_tax_settings(&self, _: NewTaxSettings) -> Result<TaxSettings, RepositoryError> { unimplemented!() }
    }

    // ── stub factory ─────────────────────────────────────────────────────
    /// A factory whose `create` flips an `AtomicBool` and returns a
    /// [`StubRepository`]. The flag lets tests prove that `create` was
    /// actually called.
    struct StubFactory {
        name: &'static str,
        called: Arc<AtomicBool>,
    }

    #[async_trait]
    impl RepositoryFactory for StubFactory {
        fn backend_name(&self) -> &'static str {
            self.name
        }
        async fn create(
            &self,
            _config: &DbConfig,
        ) -> Result<Box<dyn LedgerRepository>, RepositoryError> {
            self.called.store(true, Ordering::SeqCst);
            Ok(Box::new(StubRepository))
        }
    }

    /// A factory that always returns a `Connection` error — used to verify
    /// that the registry surfaces errors from the underlying factory.
    struct FailingFactory;

    #[async_trait]
    impl RepositoryFactory for FailingFactory {
        fn backend_name(&self) -> &'static str {
            "failing"
        }
        async fn create(
            &self,
            _config: &DbConfig,
        ) -> Result<Box<dyn LedgerRepository>, RepositoryError> {
            Err(RepositoryError::Connection(
                "intentional failure".to_string(),
            ))
        }
    }

    fn stub_factory(name: &'static str) -> (Box<dyn RepositoryFactory>, Arc<AtomicBool>) {
        let flag = Arc::new(AtomicBool::new(false));
        (
            Box::new(StubFactory {
                name,
                called: flag.clone(),
            }),
            flag,
        )
    }

    #[test]
    fn dbconfig_default_is_sqlite_memory() {
        let cfg = DbConfig::default();
        assert_eq!(cfg.backend, "sqlite");
        assert_eq!(cfg.connection_string, "sqlite::memory:");
    }

    #[test]
    fn new_registry_has_no_backends() {
        assert!(RepositoryRegistry::new().available_backends().is_empty());
    }

    #[test]
    fn register_single_backend() {
        let mut reg = RepositoryRegistry::new();
        let (factory, _) = stub_factory("sqlite");
        reg.register(factory);
        assert_eq!(reg.available_backends(), vec!["sqlite"]);
    }

    #[test]
    fn available_backends_is_sorted() {
        let mut reg = RepositoryRegistry::new();
        // Register in reverse alphabetical order on purpose.
        let (f1, _) = stub_factory("sqlite");
        let (f2, _) = stub_factory("postgres");
        reg.register(f1);
        reg.register(f2);
        assert_eq!(reg.available_backends(), vec!["postgres", "sqlite"]);
    }

    #[test]
    fn duplicate_registration_replaces_previous() {
        let mut reg = RepositoryRegistry::new();
        let (old, _) = stub_factory("sqlite");
        let (new, _) = stub_factory("sqlite");
        reg.register(old);
        reg.register(new);
        assert_eq!(reg.available_backends(), vec!["sqlite"]);
    }

    #[tokio::test]
    async fn create_calls_matching_factory() {
        let mut reg = RepositoryRegistry::new();
        let (factory, called) = stub_factory("sqlite");
        reg.register(factory);

        let config = DbConfig {
            backend: "sqlite".to_string(),
            connection_string: "sqlite::memory:".to_string(),
        };

        let result = reg.create(&config).await;
        assert!(result.is_ok());
        assert!(called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn create_unknown_backend_is_configuration_error() {
        let reg = RepositoryRegistry::new();
        let config = DbConfig {
            backend: "postgres".to_string(),
            connection_string: String::new(),
        };

        let err = reg.create(&config).await.err().expect("must fail");
        assert!(matches!(err, RepositoryError::Configuration(_)));
    }

    #[tokio::test]
    async fn create_surfaces_factory_errors() {
        let mut reg = RepositoryRegistry::new();
        reg.register(Box::new(FailingFactory));

        let config = DbConfig {
            backend: "failing".to_string(),
            connection_string: String::new(),
        };

        let err = reg.create(&config).await.err().expect("must fail");
        assert!(matches!(err, RepositoryError::Connection(_)));
    }
}
