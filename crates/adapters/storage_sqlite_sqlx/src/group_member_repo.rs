//! `SQLite` implementation of [`GroupMemberRepository`].

use std::future::Future;

use sqlx::SqlitePool;

use flowkit_app::ports::GroupMemberRepository;
use flowkit_domain::error::FlowError;
use flowkit_domain::group::GroupMember;
use flowkit_domain::id::{GroupId, PersonId};

use crate::error::StorageError;
use crate::tables::Table;

const SELECT_BY_GROUP_AND_PERSON: &str =
    "SELECT * FROM group_members WHERE group_id = ? AND person_id = ? ORDER BY rowid";

/// `SQLite`-backed group membership repository.
#[derive(Clone)]
pub struct SqliteGroupMemberRepository {
    pool: SqlitePool,
}

impl SqliteGroupMemberRepository {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl GroupMemberRepository for SqliteGroupMemberRepository {
    fn find_by_group_and_person(
        &self,
        group_id: GroupId,
        person_id: PersonId,
    ) -> impl Future<Output = Result<Vec<GroupMember>, FlowError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows = sqlx::query(SELECT_BY_GROUP_AND_PERSON)
                .bind(group_id.to_string())
                .bind(person_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            let members = rows
                .iter()
                .map(GroupMember::decode)
                .collect::<Result<Vec<_>, _>>()
                .map_err(StorageError::from)?;
            Ok(members)
        }
    }
}
