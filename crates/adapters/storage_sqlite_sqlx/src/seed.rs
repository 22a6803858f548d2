//! Record writer used to load fixtures into the store.

use sqlx::SqlitePool;

use flowkit_domain::attribute::{AttributeDefinition, AttributeOwner};
use flowkit_domain::entity_type::EntityType;
use flowkit_domain::group::{Group, GroupMember, GroupRole};
use flowkit_domain::person::{Person, PersonAlias};
use flowkit_domain::workflow::ActivityType;

use crate::error::StorageError;

const UPSERT_PERSON: &str = "INSERT OR REPLACE INTO people (id, first_name, nick_name, last_name, email) VALUES (?, ?, ?, ?, ?)";
const UPSERT_ALIAS: &str = "INSERT OR REPLACE INTO person_aliases (id, person_id) VALUES (?, ?)";
const UPSERT_GROUP: &str =
    "INSERT OR REPLACE INTO group_records (id, name, description) VALUES (?, ?, ?)";
const UPSERT_ROLE: &str = "INSERT OR REPLACE INTO group_roles (id, name) VALUES (?, ?)";
const UPSERT_MEMBER: &str = "INSERT OR REPLACE INTO group_members (id, group_id, person_id, role_id, status) VALUES (?, ?, ?, ?, ?)";
const UPSERT_ENTITY_TYPE: &str =
    "INSERT OR REPLACE INTO entity_types (id, name, friendly_name) VALUES (?, ?, ?)";
const UPSERT_ATTRIBUTE: &str = "INSERT OR REPLACE INTO attributes (id, key, name, owner, field_type) VALUES (?, ?, ?, ?, ?)";
const UPSERT_ACTIVITY_TYPE: &str = "INSERT OR REPLACE INTO activity_types (id, name, attribute_keys, actions) VALUES (?, ?, ?, ?)";

pub(crate) fn owner_name(owner: AttributeOwner) -> &'static str {
    match owner {
        AttributeOwner::Workflow => "workflow",
        AttributeOwner::Activity => "activity",
    }
}

/// Inserts or replaces records by id.
#[derive(Clone)]
pub struct Seeder {
    pool: SqlitePool,
}

impl Seeder {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns [`StorageError::Database`] when the write fails.
    pub async fn person(&self, person: &Person) -> Result<(), StorageError> {
        sqlx::query(UPSERT_PERSON)
            .bind(person.id.to_string())
            .bind(&person.first_name)
            .bind(&person.nick_name)
            .bind(&person.last_name)
            .bind(&person.email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`StorageError::Database`] when the write fails, including
    /// when the aliased person does not exist.
    pub async fn alias(&self, alias: &PersonAlias) -> Result<(), StorageError> {
        sqlx::query(UPSERT_ALIAS)
            .bind(alias.id.to_string())
            .bind(alias.person_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`StorageError::Database`] when the write fails.
    pub async fn group(&self, group: &Group) -> Result<(), StorageError> {
        sqlx::query(UPSERT_GROUP)
            .bind(group.id.to_string())
            .bind(&group.name)
            .bind(&group.description)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`StorageError::Database`] when the write fails.
    pub async fn role(&self, role: &GroupRole) -> Result<(), StorageError> {
        sqlx::query(UPSERT_ROLE)
            .bind(role.id.to_string())
            .bind(&role.name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`StorageError::Database`] when the write fails, including
    /// when the group, person, or role does not exist.
    pub async fn member(&self, member: &GroupMember) -> Result<(), StorageError> {
        sqlx::query(UPSERT_MEMBER)
            .bind(member.id.to_string())
            .bind(member.group_id.to_string())
            .bind(member.person_id.to_string())
            .bind(member.role_id.to_string())
            .bind(member.status.code())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`StorageError::Database`] when the write fails, including
    /// when another entity type already has the name.
    pub async fn entity_type(&self, entity_type: &EntityType) -> Result<(), StorageError> {
        sqlx::query(UPSERT_ENTITY_TYPE)
            .bind(entity_type.id.to_string())
            .bind(&entity_type.name)
            .bind(&entity_type.friendly_name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`StorageError::Database`] when the write fails.
    pub async fn attribute(&self, attribute: &AttributeDefinition) -> Result<(), StorageError> {
        sqlx::query(UPSERT_ATTRIBUTE)
            .bind(attribute.id.to_string())
            .bind(&attribute.key)
            .bind(&attribute.name)
            .bind(owner_name(attribute.owner))
            .bind(attribute.field_type.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`StorageError::Json`] if the attribute keys or actions cannot
    /// be encoded, or [`StorageError::Database`] when the write fails.
    pub async fn activity_type(&self, activity_type: &ActivityType) -> Result<(), StorageError> {
        let attribute_keys = serde_json::to_string(&activity_type.attribute_keys)?;
        let actions = serde_json::to_string(&activity_type.actions)?;
        sqlx::query(UPSERT_ACTIVITY_TYPE)
            .bind(activity_type.id.to_string())
            .bind(&activity_type.name)
            .bind(attribute_keys)
            .bind(actions)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
