//! Context-aware construction of service instances.
//!
//! A registration that can be built exposes a [`ContextConstructor`]: it
//! opens a fresh persistence context of its exact kind and hands it to the
//! registered factory. Registrations without one are [`Unconstructible`]
//! and resolve to "not found".

use crate::ports::{BoxFuture, ContextFactory, ServiceInstance};
use flowkit_domain::error::FlowError;

use super::LoadError;
use super::catalog::ServiceImplementation;
use super::matcher::ServiceDescriptor;

/// Builds a service instance around a newly opened persistence context.
pub trait ContextConstructor: Send + Sync {
    /// Type name of the context this constructor takes.
    fn context_kind(&self) -> &'static str;

    fn construct(&self) -> BoxFuture<'_, Result<Box<dyn ServiceInstance>, FlowError>>;
}

/// A registration pairing a context factory with a `(context) -> service`
/// factory.
pub struct ContextBound<F, B> {
    descriptor: ServiceDescriptor,
    contexts: F,
    build: B,
}

impl<F, B, S> ContextBound<F, B>
where
    F: ContextFactory,
    B: Fn(F::Context) -> S + Send + Sync,
    S: ServiceInstance + 'static,
{
    pub fn new(descriptor: ServiceDescriptor, contexts: F, build: B) -> Self {
        Self {
            descriptor,
            contexts,
            build,
        }
    }
}

impl<F, B, S> ContextConstructor for ContextBound<F, B>
where
    F: ContextFactory,
    B: Fn(F::Context) -> S + Send + Sync,
    S: ServiceInstance + 'static,
{
    fn context_kind(&self) -> &'static str {
        std::any::type_name::<F::Context>()
    }

    fn construct(&self) -> BoxFuture<'_, Result<Box<dyn ServiceInstance>, FlowError>> {
        Box::pin(async move {
            let context = self.contexts.open().await?;
            let service: Box<dyn ServiceInstance> = Box::new((self.build)(context));
            Ok(service)
        })
    }
}

impl<F, B, S> ServiceImplementation for ContextBound<F, B>
where
    F: ContextFactory,
    B: Fn(F::Context) -> S + Send + Sync,
    S: ServiceInstance + 'static,
{
    fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    fn constructor(&self) -> Option<&dyn ContextConstructor> {
        Some(self)
    }
}

/// A registration that declares what it serves but cannot be built from a
/// persistence context.
pub struct Unconstructible {
    descriptor: ServiceDescriptor,
}

impl Unconstructible {
    #[must_use]
    pub fn new(descriptor: ServiceDescriptor) -> Self {
        Self { descriptor }
    }
}

impl ServiceImplementation for Unconstructible {
    fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    fn constructor(&self) -> Option<&dyn ContextConstructor> {
        None
    }
}

/// Build an instance of `implementation` bound to a fresh context.
///
/// Returns `None` when the implementation has no context constructor or the
/// context could not be opened.
pub async fn construct(implementation: &dyn ServiceImplementation) -> Option<Box<dyn ServiceInstance>> {
    try_construct(implementation).await.ok()
}

pub(crate) async fn try_construct(
    implementation: &dyn ServiceImplementation,
) -> Result<Box<dyn ServiceInstance>, LoadError> {
    let service = implementation.descriptor().name();
    let constructor = implementation
        .constructor()
        .ok_or_else(|| LoadError::NoEligibleConstructor {
            service: service.to_string(),
        })?;
    tracing::trace!(service, context = constructor.context_kind(), "opening persistence context");
    constructor
        .construct()
        .await
        .map_err(|source| LoadError::ContextUnavailable {
            service: service.to_string(),
            source,
        })
}
