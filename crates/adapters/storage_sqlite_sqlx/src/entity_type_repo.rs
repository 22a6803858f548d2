//! `SQLite` implementation of [`EntityTypeRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use flowkit_app::ports::EntityTypeRepository;
use flowkit_domain::entity_type::EntityType;
use flowkit_domain::error::FlowError;
use flowkit_domain::id::EntityTypeId;

use crate::error::StorageError;
use crate::tables::id_column;

struct Wrapper(EntityType);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(EntityType {
            id: id_column(row, "id")?,
            name: row.try_get("name")?,
            friendly_name: row.try_get("friendly_name")?,
        }))
    }
}

const SELECT_BY_ID: &str = "SELECT * FROM entity_types WHERE id = ?";
const SELECT_BY_NAME: &str = "SELECT * FROM entity_types WHERE name = ?";

/// `SQLite`-backed entity type repository.
#[derive(Clone)]
pub struct SqliteEntityTypeRepository {
    pool: SqlitePool,
}

impl SqliteEntityTypeRepository {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl EntityTypeRepository for SqliteEntityTypeRepository {
    fn get_by_id(
        &self,
        id: EntityTypeId,
    ) -> impl Future<Output = Result<Option<EntityType>, FlowError>> + Send {
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

    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<EntityType>, FlowError>> + Send {
        let pool = self.pool.clone();
        let name = name.to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_NAME)
                .bind(name)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|w| w.0))
        }
    }
}
