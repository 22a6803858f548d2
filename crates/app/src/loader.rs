//! Entity loader: load an entity whose kind is only known at runtime.
//!
//! Given an [`EntityType`] and a guid, the loader
//!
//! 1. scans the [`ServiceCatalog`] for the first registration that serves
//!    the entity type ([`matcher`]),
//! 2. opens a fresh persistence context and builds the service around it
//!    ([`constructor`]),
//! 3. calls the service's load-by-guid operation ([`invoker`]).
//!
//! Every stage that cannot produce a result degrades to "not found":
//! [`EntityLoader::load_entity`] never fails. [`EntityLoader::try_load_entity`]
//! reports which stage gave up, for diagnostics. The context and the
//! service live only for the duration of one call.

pub mod catalog;
pub mod constructor;
pub mod invoker;
pub mod matcher;

use std::sync::Arc;

use flowkit_domain::entity::{Entity, LoadedEntity};
use flowkit_domain::entity_type::EntityType;
use flowkit_domain::error::FlowError;
use uuid::Uuid;

pub use catalog::{CatalogBuilder, DEFAULT_EXCLUDED_NAMESPACES, ServiceCatalog, ServiceImplementation};
pub use constructor::{ContextBound, ContextConstructor, Unconstructible};
pub use matcher::ServiceDescriptor;

/// Build a [`ServiceDescriptor`] whose namespace is the calling module.
#[macro_export]
macro_rules! service_descriptor {
    ($name:expr) => {
        $crate::loader::ServiceDescriptor::new($name, module_path!())
    };
}

/// Why a load produced no entity.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no service implementation serves entity type {entity_type}")]
    UnresolvedEntityType { entity_type: String },

    #[error("service {service} has no context-accepting constructor")]
    NoEligibleConstructor { service: String },

    #[error("could not open a persistence context for {service}")]
    ContextUnavailable {
        service: String,
        #[source]
        source: FlowError,
    },

    #[error("service {service} exposes no load-by-guid operation")]
    NoEligibleLoadOperation { service: String },

    #[error("load operation of {service} failed")]
    InvocationFault {
        service: String,
        #[source]
        source: FlowError,
    },

    #[error("no {entity_type} with guid {guid}")]
    NotFound { entity_type: String, guid: Uuid },
}

/// Facade over catalog lookup, construction, and invocation.
///
/// Cheap to clone; clones share the same read-only catalog and may be used
/// concurrently.
#[derive(Clone)]
pub struct EntityLoader {
    catalog: Arc<ServiceCatalog>,
}

impl EntityLoader {
    #[must_use]
    pub fn new(catalog: Arc<ServiceCatalog>) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    /// Load the entity of kind `target` with the given guid.
    ///
    /// Returns `None` when the entity does not exist or when any stage of
    /// the resolution fails.
    pub async fn load_entity(&self, target: &EntityType, guid: Uuid) -> Option<LoadedEntity> {
        self.load_named(&target.name, guid).await
    }

    /// Typed convenience: load an entity of kind `E` by guid.
    pub async fn load_as<E: Entity>(&self, guid: Uuid) -> Option<E> {
        self.load_named(E::ENTITY_TYPE, guid)
            .await
            .and_then(|loaded| loaded.decode())
    }

    /// Like [`load_entity`](Self::load_entity) but reports why nothing was loaded.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadError`] of the first stage that produced no result.
    pub async fn try_load_entity(
        &self,
        target: &EntityType,
        guid: Uuid,
    ) -> Result<LoadedEntity, LoadError> {
        self.try_load_named(&target.name, guid).await
    }

    async fn load_named(&self, entity_type: &str, guid: Uuid) -> Option<LoadedEntity> {
        match self.try_load_named(entity_type, guid).await {
            Ok(entity) => Some(entity),
            Err(err) => {
                tracing::debug!(
                    entity_type,
                    %guid,
                    error = %err,
                    "entity load resolved to not found"
                );
                None
            }
        }
    }

    async fn try_load_named(&self, entity_type: &str, guid: Uuid) -> Result<LoadedEntity, LoadError> {
        let implementation = self.catalog.find(entity_type).ok_or_else(|| {
            LoadError::UnresolvedEntityType {
                entity_type: entity_type.to_string(),
            }
        })?;
        tracing::debug!(
            entity_type,
            service = implementation.descriptor().name(),
            "selected service implementation"
        );

        // The instance owns its context; both are dropped when this returns.
        let mut service = constructor::try_construct(implementation).await?;
        invoker::try_load(service.as_mut(), guid)
            .await?
            .ok_or_else(|| LoadError::NotFound {
                entity_type: entity_type.to_string(),
                guid,
            })
    }
}
