//! `SQLite` implementation of [`AttributeRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use flowkit_app::ports::AttributeRepository;
use flowkit_domain::attribute::{AttributeDefinition, AttributeOwner, FieldType};
use flowkit_domain::error::FlowError;
use flowkit_domain::id::AttributeId;

use crate::error::StorageError;
use crate::tables::id_column;

/// Wrapper for converting database rows into domain [`AttributeDefinition`].
struct Wrapper(AttributeDefinition);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let owner: String = row.try_get("owner")?;
        let owner = match owner.as_str() {
            "workflow" => AttributeOwner::Workflow,
            "activity" => AttributeOwner::Activity,
            other => {
                return Err(sqlx::Error::Decode(
                    format!("unknown attribute owner {other:?}").into(),
                ));
            }
        };
        let field_type: String = row.try_get("field_type")?;

        Ok(Self(AttributeDefinition {
            id: id_column(row, "id")?,
            key: row.try_get("key")?,
            name: row.try_get("name")?,
            owner,
            field_type: FieldType::from_name(&field_type),
        }))
    }
}

const SELECT_BY_ID: &str = "SELECT * FROM attributes WHERE id = ?";

/// `SQLite`-backed attribute definition repository.
#[derive(Clone)]
pub struct SqliteAttributeRepository {
    pool: SqlitePool,
}

impl SqliteAttributeRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AttributeRepository for SqliteAttributeRepository {
    fn get_by_id(
        &self,
        id: AttributeId,
    ) -> impl Future<Output = Result<Option<AttributeDefinition>, FlowError>> + Send {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use crate::seed::Seeder;

    async fn setup() -> (SqliteAttributeRepository, Seeder) {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        (
            SqliteAttributeRepository::new(db.pool().clone()),
            Seeder::new(db.pool().clone()),
        )
    }

    #[tokio::test]
    async fn should_retrieve_attribute_when_stored() {
        let (repo, seeder) = setup().await;
        let attribute =
            AttributeDefinition::new("Requester", AttributeOwner::Activity, FieldType::Person)
                .unwrap()
                .with_name("Requested By");
        seeder.attribute(&attribute).await.unwrap();

        let fetched = repo.get_by_id(attribute.id).await.unwrap();

        assert_eq!(fetched, Some(attribute));
    }

    #[tokio::test]
    async fn should_keep_unknown_field_type_name() {
        let (repo, seeder) = setup().await;
        let attribute = AttributeDefinition::new(
            "Start",
            AttributeOwner::Workflow,
            FieldType::Other("date".to_string()),
        )
        .unwrap();
        seeder.attribute(&attribute).await.unwrap();

        let fetched = repo.get_by_id(attribute.id).await.unwrap().unwrap();

        assert_eq!(fetched.field_type, FieldType::Other("date".to_string()));
    }

    #[tokio::test]
    async fn should_return_none_when_attribute_not_found() {
        let (repo, _) = setup().await;
        assert!(repo.get_by_id(AttributeId::new()).await.unwrap().is_none());
    }
}
