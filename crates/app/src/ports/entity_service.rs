//! Entity service port: per-kind data access, typed and erased.
//!
//! Adapters implement the typed [`EntityService`] for each entity kind.
//! The loader never sees those types: it works with [`ServiceInstance`]
//! trait objects and asks them for their [`LoadByGuid`] operation.
//! [`Loadable`] bridges the two.

use std::future::Future;
use std::pin::Pin;

use flowkit_domain::entity::{Entity, LoadedEntity};
use flowkit_domain::error::FlowError;
use uuid::Uuid;

/// Boxed, sendable future used at the object-safe seams.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Data access for one entity kind, bound to a persistence context.
pub trait EntityService: Send {
    type Entity: Entity + Send;

    /// Load the entity with the given guid, `None` when absent.
    fn get(
        &mut self,
        guid: Uuid,
    ) -> impl Future<Output = Result<Option<Self::Entity>, FlowError>> + Send;
}

/// A constructed service whose concrete type is known only at runtime.
pub trait ServiceInstance: Send {
    /// Name of the concrete service, for diagnostics.
    fn service_name(&self) -> &str;

    /// The service's load-by-guid operation, if it has one.
    fn load_by_guid(&mut self) -> Option<&mut dyn LoadByGuid> {
        None
    }
}

/// The "get by guid" operation, erased over the entity kind.
pub trait LoadByGuid: Send {
    fn get(&mut self, guid: Uuid) -> BoxFuture<'_, Result<Option<LoadedEntity>, FlowError>>;
}

/// Wraps a typed [`EntityService`] so the loader can drive it.
pub struct Loadable<S> {
    service: S,
}

impl<S: EntityService> Loadable<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Unwrap the typed service.
    pub fn into_inner(self) -> S {
        self.service
    }
}

impl<S: EntityService> ServiceInstance for Loadable<S> {
    fn service_name(&self) -> &str {
        std::any::type_name::<S>()
    }

    fn load_by_guid(&mut self) -> Option<&mut dyn LoadByGuid> {
        Some(self)
    }
}

impl<S: EntityService> LoadByGuid for Loadable<S> {
    fn get(&mut self, guid: Uuid) -> BoxFuture<'_, Result<Option<LoadedEntity>, FlowError>> {
        Box::pin(async move {
            let entity = self.service.get(guid).await?;
            let loaded = entity
                .map(|entity| LoadedEntity::from_entity(&entity))
                .transpose()?;
            Ok(loaded)
        })
    }
}
