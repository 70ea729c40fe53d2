/// Database migration runner
///
/// Migrations live in the `migrations/` directory at the workspace root and
/// are embedded into the binary at compile time, so a deployed server can
/// bring its schema up to date without shipping SQL files alongside it.
use sqlx::PgPool;
use tracing::info;

/// Runs all pending migrations
///
/// Already-applied migrations are skipped; sqlx tracks them in the
/// `_sqlx_migrations` table.
///
/// # Errors
///
/// Returns an error if a migration fails to apply or a previously applied
/// migration's checksum no longer matches.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    sqlx::migrate!("../migrations").run(pool).await?;

    info!("Database schema is up to date");
    Ok(())
}
