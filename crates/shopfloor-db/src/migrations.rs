//! # Database Migrations
//!
//! Embedded SQL migrations for Shopfloor.
//!
//! The SQL files under `migrations/postgres/` are compiled into the binary.
//! `Database::connect` applies any that `_sqlx_migrations` has not recorded
//! yet, in filename order, while holding an advisory lock, so several
//! processes starting at once don't race each other.
//!
//! ## New Migrations
//!
//! 1. Create a new file in `migrations/postgres/` with the next sequence number
//! 2. Name format: `NNNN_description.sql`
//! 3. **NEVER** modify existing migrations - always add new ones

use sqlx::PgPool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrations from the workspace `migrations/postgres` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/postgres");

/// Applies pending migrations. Already-applied ones are skipped, so calling
/// this on every start is fine.
pub async fn run_migrations(pool: &PgPool) -> DbResult<()> {
    info!(embedded = MIGRATOR.migrations.len(), "Applying pending migrations");

    MIGRATOR.run(pool).await?;

    info!("Schema is up to date");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)` for diagnostics.
pub async fn migration_status(pool: &PgPool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((total, usize::try_from(applied).unwrap_or(0)))
}
