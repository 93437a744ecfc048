//! Persistence layer for the classifieds service.
//!
//! - [`models`]: row structs and input DTOs
//! - [`repositories`]: PostgreSQL queries, one zero-sized repo per table
//! - [`store`]: the async traits handlers depend on, plus the bundle that
//!   wires a backend into the API
//! - [`memory`]: an in-memory backend with the same semantics, used by tests
//!   and by `STORE_BACKEND=memory`

pub mod memory;
pub mod models;
pub mod repositories;
pub mod store;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
