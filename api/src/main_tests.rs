use crate::check_schema_applied;
use crate::database::Database;
use sqlx::sqlite::SqlitePoolOptions;
use tempfile::TempDir;

#[tokio::test]
async fn test_check_schema_applied_with_empty_database() {
    // Fresh in-memory database: reachable, no tables
    let applied = check_schema_applied("sqlite::memory:").await.unwrap();
    assert!(!applied);
}

#[tokio::test]
async fn test_check_schema_applied_after_migration() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}?mode=rwc", dir.path().join("doctor.db").display());

    let pool = SqlitePoolOptions::new().connect(&url).await.unwrap();
    Database::from_pool(pool).await.unwrap();

    assert!(check_schema_applied(&url).await.unwrap());
}

#[tokio::test]
async fn test_check_schema_applied_with_missing_file() {
    let dir = TempDir::new().unwrap();
    // Without mode=rwc SQLite refuses to create the file
    let url = format!("sqlite:{}", dir.path().join("absent.db").display());
    let result = check_schema_applied(&url).await;
    assert!(
        result.is_err(),
        "Should return error for a database file that does not exist"
    );
}
