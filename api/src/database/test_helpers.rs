/// Shared test helpers for database tests
use super::Database;
use sqlx::sqlite::SqlitePoolOptions;

/// Set up a fresh in-memory database with all migrations applied.
/// A single connection keeps every query on the same in-memory database.
pub async fn setup_test_db() -> Database {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite database");

    Database::from_pool(pool)
        .await
        .expect("Migration failed")
}
