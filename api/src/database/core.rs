use super::types::Database;
use anyhow::Result;
use sqlx::SqlitePool;

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url).await?;
        Self::from_pool(pool).await
    }

    /// Wrap an already connected pool and bring its schema up to date
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::migrate!().run(&pool).await?;
        Ok(Self { pool })
    }

    /// Round-trip a trivial query to confirm the pool can still reach the store
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
