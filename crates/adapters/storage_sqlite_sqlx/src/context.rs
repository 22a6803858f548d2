//! Persistence context: one pooled connection, owned by one service
//! instance for the duration of a single load.

use std::future::Future;

use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

use flowkit_app::ports::{ContextFactory, PersistenceContext};
use flowkit_domain::error::FlowError;

use crate::error::StorageError;

/// A connection checked out of the pool; returned to it on drop.
pub struct SqliteContext {
    connection: PoolConnection<Sqlite>,
}

impl SqliteContext {
    /// Check a connection out of `pool`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Database`] when no connection can be acquired.
    pub async fn open(pool: &SqlitePool) -> Result<Self, StorageError> {
        let connection = pool.acquire().await?;
        Ok(Self { connection })
    }

    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.connection
    }
}

impl PersistenceContext for SqliteContext {
    fn kind(&self) -> &'static str {
        "sqlite"
    }
}

/// Opens a fresh [`SqliteContext`] per call.
#[derive(Clone)]
pub struct SqliteContextFactory {
    pool: SqlitePool,
}

impl SqliteContextFactory {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ContextFactory for SqliteContextFactory {
    type Context = SqliteContext;

    fn open(&self) -> impl Future<Output = Result<SqliteContext, FlowError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(SqliteContext::open(&pool).await?) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn pool() -> SqlitePool {
        Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap()
        .pool()
        .clone()
    }

    #[tokio::test]
    async fn should_hand_out_usable_connection_when_opened() {
        let factory = SqliteContextFactory::new(pool().await);

        let mut context = factory.open().await.unwrap();
        let (one,): (i64,) = sqlx::query_as("SELECT 1")
            .fetch_one(context.connection())
            .await
            .unwrap();

        assert_eq!(one, 1);
        assert_eq!(context.kind(), "sqlite");
    }

    #[tokio::test]
    async fn should_fail_when_pool_closed() {
        let pool = pool().await;
        pool.close().await;
        let factory = SqliteContextFactory::new(pool);

        assert!(matches!(factory.open().await, Err(FlowError::Storage(_))));
    }
}
