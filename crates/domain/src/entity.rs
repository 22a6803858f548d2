//! Entity: a domain record addressable by a unique guid.
//!
//! Concrete entity kinds implement [`Entity`]. Once an entity has been
//! loaded through a runtime-selected service its concrete type is no longer
//! known to the caller, so it travels as a [`LoadedEntity`]: the kind name,
//! the guid, and the serialized field tree ready for templating.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted domain record of a known kind.
pub trait Entity: Serialize + DeserializeOwned {
    /// Name of the entity type this record belongs to (e.g. `"Person"`).
    const ENTITY_TYPE: &'static str;

    /// The record's unique guid.
    fn guid(&self) -> Uuid;
}

/// An entity whose concrete kind was selected at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedEntity {
    pub entity_type: String,
    pub guid: Uuid,
    pub fields: serde_json::Value,
}

impl LoadedEntity {
    /// Erase a typed entity.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the entity fails to serialize.
    pub fn from_entity<E: Entity>(entity: &E) -> Result<Self, serde_json::Error> {
        Ok(Self {
            entity_type: E::ENTITY_TYPE.to_string(),
            guid: entity.guid(),
            fields: serde_json::to_value(entity)?,
        })
    }

    /// Recover the typed entity, or `None` when this is a different kind
    /// or the fields no longer match its shape.
    #[must_use]
    pub fn decode<E: Entity>(&self) -> Option<E> {
        if self.entity_type != E::ENTITY_TYPE {
            return None;
        }
        serde_json::from_value(self.fields.clone()).ok()
    }

    /// Whether this entity is of the given kind.
    #[must_use]
    pub fn is(&self, entity_type: &str) -> bool {
        self.entity_type == entity_type
    }
}
