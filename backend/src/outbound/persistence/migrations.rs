//! Embedded schema migrations.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::domain::ports::DeviceRepositoryError;

/// Migrations from `backend/migrations`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply pending migrations over a blocking connection to `database_url`.
///
/// Run it off the async runtime (for example in `spawn_blocking`).
///
/// # Errors
/// Connection failures map to [`DeviceRepositoryError::Connection`], failed
/// migrations to [`DeviceRepositoryError::Query`].
pub fn run_pending_migrations(database_url: &str) -> Result<(), DeviceRepositoryError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| DeviceRepositoryError::connection(err.to_string()))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| DeviceRepositoryError::query(format!("migration: {err}")))?;
    info!(count = applied.len(), "schema migrations applied");
    Ok(())
}
