//! `SQLite` implementation of [`GroupRoleRepository`].

use std::future::Future;

use sqlx::SqlitePool;

use flowkit_app::ports::GroupRoleRepository;
use flowkit_domain::error::FlowError;
use flowkit_domain::group::GroupRole;
use flowkit_domain::id::GroupRoleId;

use crate::error::StorageError;
use crate::tables::Table;

/// `SQLite`-backed group role repository.
#[derive(Clone)]
pub struct SqliteGroupRoleRepository {
    pool: SqlitePool,
}

impl SqliteGroupRoleRepository {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl GroupRoleRepository for SqliteGroupRoleRepository {
    fn get_by_id(
        &self,
        id: GroupRoleId,
    ) -> impl Future<Output = Result<Option<GroupRole>, FlowError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row = sqlx::query(GroupRole::SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            let role = row
                .as_ref()
                .map(GroupRole::decode)
                .transpose()
                .map_err(StorageError::from)?;
            Ok(role)
        }
    }
}
