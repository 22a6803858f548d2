//! `SQLite` implementation of [`ActivityTypeRepository`].
//!
//! Attribute keys and action templates are stored as JSON columns.

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use flowkit_app::ports::ActivityTypeRepository;
use flowkit_domain::error::FlowError;
use flowkit_domain::id::ActivityTypeId;
use flowkit_domain::workflow::ActivityType;

use crate::error::StorageError;
use crate::tables::id_column;

struct Wrapper(ActivityType);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let attribute_keys: String = row.try_get("attribute_keys")?;
        let actions: String = row.try_get("actions")?;

        Ok(Self(ActivityType {
            id: id_column(row, "id")?,
            name: row.try_get("name")?,
            attribute_keys: serde_json::from_str(&attribute_keys)
                .map_err(|err| sqlx::Error::Decode(Box::new(err)))?,
            actions: serde_json::from_str(&actions)
                .map_err(|err| sqlx::Error::Decode(Box::new(err)))?,
        }))
    }
}

const SELECT_BY_ID: &str = "SELECT * FROM activity_types WHERE id = ?";

/// `SQLite`-backed activity type repository.
#[derive(Clone)]
pub struct SqliteActivityTypeRepository {
    pool: SqlitePool,
}

impl SqliteActivityTypeRepository {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ActivityTypeRepository for SqliteActivityTypeRepository {
    fn get_by_id(
        &self,
        id: ActivityTypeId,
    ) -> impl Future<Output = Result<Option<ActivityType>, FlowError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|w| w.0))
        }
    }
}
