use async_trait::async_trait;
use bollo_core::db::{DbConfig, RepositoryFactory};
use bollo_core::{GarageRepository, RepositoryError};

use crate::repository::SqliteGarageRepository;

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`bollo_core::db::RepositoryRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use bollo_core::db::RepositoryRegistry;
/// use bollo_db_sqlite::SqliteRepositoryFactory;
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

    /// Open the database described by `config.connection_string` and bring
    /// its schema up to date.
    ///
    /// Accepted connection strings:
    /// * A bare file path, e.g. `"garage.db"`. Created if missing.
    /// * A sqlx URL, e.g. `"sqlite://garage.db"`.
    /// * `":memory:"` for an ephemeral database.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn GarageRepository>, RepositoryError> {
        let repo = SqliteGarageRepository::new(&config.connection_string)
            .await
            .map_err(|e| RepositoryError::Connection(format!("{e:#}")))?;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;
        Ok(Box::new(repo))
    }
}
