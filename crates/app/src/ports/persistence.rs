//! Persistence port: transactional/session handles.
//!
//! A [`PersistenceContext`] is what an entity service needs to talk to the
//! store. Contexts are opened through a [`ContextFactory`], one per load,
//! and are never shared between two service instances.

use std::future::Future;

use flowkit_domain::error::FlowError;

/// Capability marker: "can be used as a persistence context".
pub trait PersistenceContext: Send {
    /// Short name of the context kind, for diagnostics.
    fn kind(&self) -> &'static str;
}

/// Opens fresh persistence contexts of one exact kind.
pub trait ContextFactory: Send + Sync {
    type Context: PersistenceContext + 'static;

    /// Open a new context. Each call yields an independent context.
    fn open(&self) -> impl Future<Output = Result<Self::Context, FlowError>> + Send;
}
