//! Person and person alias.
//!
//! Person-typed workflow attributes store the guid of a [`PersonAlias`],
//! not of the person itself; the alias points at the current person record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::Entity;
use crate::error::{FlowError, ValidationError};
use crate::id::{PersonAliasId, PersonId};

/// A person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    pub nick_name: Option<String>,
    pub last_name: String,
    pub email: Option<String>,
}

impl Person {
    /// Create a builder for constructing a [`Person`].
    #[must_use]
    pub fn builder() -> PersonBuilder {
        PersonBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Validation`] when both names are empty.
    pub fn validate(&self) -> Result<(), FlowError> {
        if self.first_name.is_empty() && self.last_name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Display name, preferring the nick name over the first name.
    #[must_use]
    pub fn full_name(&self) -> String {
        let first = self.nick_name.as_deref().unwrap_or(&self.first_name);
        format!("{first} {}", self.last_name).trim().to_string()
    }
}

impl Entity for Person {
    const ENTITY_TYPE: &'static str = "Person";

    fn guid(&self) -> Uuid {
        self.id.as_uuid()
    }
}

/// Step-by-step builder for [`Person`].
#[derive(Debug, Default)]
pub struct PersonBuilder {
    id: Option<PersonId>,
    first_name: Option<String>,
    nick_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
}

impl PersonBuilder {
    #[must_use]
    pub fn id(mut self, id: PersonId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    #[must_use]
    pub fn nick_name(mut self, nick_name: impl Into<String>) -> Self {
        self.nick_name = Some(nick_name.into());
        self
    }

    #[must_use]
    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Consume the builder, validate, and return a [`Person`].
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Validation`] if no name was given.
    pub fn build(self) -> Result<Person, FlowError> {
        let person = Person {
            id: self.id.unwrap_or_default(),
            first_name: self.first_name.unwrap_or_default(),
            nick_name: self.nick_name,
            last_name: self.last_name.unwrap_or_default(),
            email: self.email,
        };
        person.validate()?;
        Ok(person)
    }
}

/// A stable handle onto a person, used by person-typed attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonAlias {
    pub id: PersonAliasId,
    pub person_id: PersonId,
}

impl PersonAlias {
    /// Create a fresh alias pointing at `person_id`.
    #[must_use]
    pub fn new(person_id: PersonId) -> Self {
        Self {
            id: PersonAliasId::new(),
            person_id,
        }
    }
}

impl Entity for PersonAlias {
    const ENTITY_TYPE: &'static str = "PersonAlias";

    fn guid(&self) -> Uuid {
        self.id.as_uuid()
    }
}
