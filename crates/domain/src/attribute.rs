//! Attribute definitions: the schema behind workflow attribute values.
//!
//! Action settings refer to attributes by guid. The definition says which
//! object holds the value (the workflow or the running activity), under
//! which key, and how the value should be interpreted.

use serde::{Deserialize, Serialize};

use crate::error::{FlowError, ValidationError};
use crate::id::AttributeId;

/// Which workflow object carries an attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeOwner {
    Workflow,
    Activity,
}

/// How an attribute value is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Boolean,
    Integer,
    /// Holds a person alias guid.
    Person,
    /// Holds a group guid.
    Group,
    Other(String),
}

impl FieldType {
    /// Stable storage name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Person => "person",
            Self::Group => "group",
            Self::Other(name) => name,
        }
    }

    /// Inverse of [`as_str`](Self::as_str); unknown names become [`FieldType::Other`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "text" => Self::Text,
            "boolean" => Self::Boolean,
            "integer" => Self::Integer,
            "person" => Self::Person,
            "group" => Self::Group,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Schema of a single workflow or activity attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub id: AttributeId,
    pub key: String,
    pub name: String,
    pub owner: AttributeOwner,
    pub field_type: FieldType,
}

impl AttributeDefinition {
    /// Create a definition with a fresh id. The display name defaults to the key.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Validation`] when `key` is empty.
    pub fn new(
        key: impl Into<String>,
        owner: AttributeOwner,
        field_type: FieldType,
    ) -> Result<Self, FlowError> {
        let key = key.into();
        let definition = Self {
            id: AttributeId::new(),
            name: key.clone(),
            key,
            owner,
            field_type,
        };
        definition.validate()?;
        Ok(definition)
    }

    /// Replace the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Validation`] when `key` is empty.
    pub fn validate(&self) -> Result<(), FlowError> {
        if self.key.is_empty() {
            return Err(ValidationError::EmptyKey.into());
        }
        Ok(())
    }
}
