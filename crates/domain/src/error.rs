//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`FlowError`]
//! via `From`. Adapter errors are boxed so the domain never names them.

/// Boxed error produced by an adapter (storage, template engine, …).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error for domain and application operations.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A record that was required does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The persistence layer failed.
    #[error("storage error")]
    Storage(#[source] BoxError),

    /// The template evaluator failed.
    #[error("template error")]
    Template(#[source] BoxError),

    /// A value could not be converted to or from its JSON form.
    #[error("serialization error")]
    Serialization(#[from] serde_json::Error),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("attribute key must not be empty")]
    EmptyKey,

    #[error("component must not be empty")]
    EmptyComponent,

    #[error("unknown group member status {0:?}")]
    UnknownMemberStatus(String),

    #[error("unknown action component {0:?}")]
    UnknownComponent(String),
}

/// A lookup that was expected to succeed found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
