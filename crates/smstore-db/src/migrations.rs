//! # Database Migrations
//!
//! Embedded SQL migrations for SMStore.
//!
//! ```text
//! Database::new
//!   └─ run_migrations
//!        ├─ _sqlx_migrations missing?  create it
//!        ├─ 001_initial_schema.sql     products, customers, sales, sale_items
//!        └─ record checksum of each applied file
//! ```
//!
//! New schema changes go in a new `migrations/sqlite/NNN_name.sql`; an
//! applied file is never edited, since sqlx refuses a changed checksum.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrations from the workspace `migrations/sqlite` directory.
///
/// The `sqlx::migrate!()` macro embeds the SQL files into the binary at
/// compile time, so the server needs no migration files at runtime.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies whatever embedded migrations the database has not seen yet.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!(
        available = MIGRATOR.migrations.len(),
        "Checking for pending migrations"
    );

    MIGRATOR.run(pool).await?;

    info!("Schema up to date");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)`.
///
/// Used by the seed binary to report what it found.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}
