//! Capability matching: does a service implementation serve an entity type?
//!
//! A [`ServiceDescriptor`] lists the entity types a service is parameterised
//! over. Services commonly reuse a generic base that carries the parameter,
//! so a descriptor may point at a `base` descriptor; matching walks that
//! chain up to the root.

use std::sync::Arc;

use flowkit_domain::entity_type::EntityType;

/// Declared identity of a service implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    name: String,
    namespace: String,
    type_params: Vec<String>,
    base: Option<Arc<ServiceDescriptor>>,
}

impl ServiceDescriptor {
    /// Describe a service named `name`, declared in `namespace`.
    ///
    /// Prefer the [`service_descriptor!`](crate::service_descriptor) macro,
    /// which fills in the namespace from the calling module.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            type_params: Vec::new(),
            base: None,
        }
    }

    /// Add an entity type parameter.
    #[must_use]
    pub fn over(mut self, entity_type: impl Into<String>) -> Self {
        self.type_params.push(entity_type.into());
        self
    }

    /// Declare the base this service builds on.
    #[must_use]
    pub fn extending(mut self, base: Arc<ServiceDescriptor>) -> Self {
        self.base = Some(base);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn type_params(&self) -> &[String] {
        &self.type_params
    }

    #[must_use]
    pub fn base(&self) -> Option<&ServiceDescriptor> {
        self.base.as_deref()
    }

    /// This descriptor followed by each of its bases, up to the root.
    pub fn lineage(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        std::iter::successors(Some(self), |descriptor| descriptor.base())
    }
}

/// Whether `candidate` (or one of its bases) is parameterised over `target`.
#[must_use]
pub fn matches(candidate: &ServiceDescriptor, target: &EntityType) -> bool {
    serves(candidate, &target.name)
}

/// Name-based form of [`matches`].
#[must_use]
pub fn serves(candidate: &ServiceDescriptor, entity_type: &str) -> bool {
    candidate.lineage().any(|descriptor| {
        descriptor
            .type_params
            .iter()
            .any(|param| param == entity_type)
    })
}
