//! Entity type: the runtime descriptor of an entity kind.
//!
//! Workflow actions store an entity type guid in their settings; the guid is
//! resolved to an [`EntityType`] once per execution and the type's `name`
//! is what service registrations are matched against.

use serde::{Deserialize, Serialize};

use crate::error::{FlowError, ValidationError};
use crate::id::EntityTypeId;

/// Runtime handle identifying an entity kind such as `Person` or `Group`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityType {
    pub id: EntityTypeId,
    pub name: String,
    pub friendly_name: String,
}

impl EntityType {
    /// Create a builder for constructing an [`EntityType`].
    #[must_use]
    pub fn builder() -> EntityTypeBuilder {
        EntityTypeBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), FlowError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`EntityType`].
#[derive(Debug, Default)]
pub struct EntityTypeBuilder {
    id: Option<EntityTypeId>,
    name: Option<String>,
    friendly_name: Option<String>,
}

impl EntityTypeBuilder {
    #[must_use]
    pub fn id(mut self, id: EntityTypeId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn friendly_name(mut self, friendly_name: impl Into<String>) -> Self {
        self.friendly_name = Some(friendly_name.into());
        self
    }

    /// Consume the builder, validate, and return an [`EntityType`].
    ///
    /// The friendly name defaults to the name.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<EntityType, FlowError> {
        let name = self.name.unwrap_or_default();
        let entity_type = EntityType {
            id: self.id.unwrap_or_default(),
            friendly_name: self.friendly_name.unwrap_or_else(|| name.clone()),
            name,
        };
        entity_type.validate()?;
        Ok(entity_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_friendly_name_to_name() {
        let ty = EntityType::builder().name("Person").build().unwrap();
        assert_eq!(ty.friendly_name, "Person");
    }

    #[test]
    fn should_keep_explicit_friendly_name() {
        let ty = EntityType::builder()
            .name("GroupMember")
            .friendly_name("Group Member")
            .build()
            .unwrap();
        assert_eq!(ty.name, "GroupMember");
        assert_eq!(ty.friendly_name, "Group Member");
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = EntityType::builder().build();
        assert!(matches!(
            result,
            Err(FlowError::Validation(ValidationError::EmptyName))
        ));
    }
}
