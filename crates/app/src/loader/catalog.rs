//! Service catalog: the table of every registered service implementation.
//!
//! The catalog is assembled once at startup, is never mutated afterwards,
//! and is shared behind an `Arc` by every loader. Registrations keep their
//! insertion order; when two registrations serve the same entity type the
//! first one registered wins.

use std::sync::Arc;

use super::constructor::ContextConstructor;
use super::matcher::{self, ServiceDescriptor};

/// Namespaces that can never hold entity services.
pub const DEFAULT_EXCLUDED_NAMESPACES: &[&str] = &["std::", "core::", "alloc::"];

/// Capability marker for catalog candidates: anything that describes which
/// entity types it serves and, optionally, how to build an instance.
pub trait ServiceImplementation: Send + Sync {
    fn descriptor(&self) -> &ServiceDescriptor;

    /// The constructor taking a single persistence context, if any.
    fn constructor(&self) -> Option<&dyn ContextConstructor>;
}

/// Read-only, ordered set of service implementations.
pub struct ServiceCatalog {
    entries: Vec<Arc<dyn ServiceImplementation>>,
}

impl ServiceCatalog {
    /// Start a catalog that skips [`DEFAULT_EXCLUDED_NAMESPACES`].
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default().exclude_namespaces(DEFAULT_EXCLUDED_NAMESPACES.iter().copied())
    }

    /// Every candidate implementation, in registration order.
    pub fn candidates(&self) -> impl Iterator<Item = &(dyn ServiceImplementation + 'static)> {
        self.entries.iter().map(AsRef::as_ref)
    }

    /// First candidate serving `entity_type`.
    #[must_use]
    pub fn find(&self, entity_type: &str) -> Option<&dyn ServiceImplementation> {
        self.candidates()
            .find(|candidate| matcher::serves(candidate.descriptor(), entity_type))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects registrations, then freezes them into a [`ServiceCatalog`].
#[derive(Default)]
pub struct CatalogBuilder {
    excluded: Vec<String>,
    entries: Vec<Arc<dyn ServiceImplementation>>,
}

impl CatalogBuilder {
    /// Skip every registration declared under `namespace`.
    #[must_use]
    pub fn exclude_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.excluded.push(namespace.into());
        self
    }

    #[must_use]
    pub fn exclude_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(namespaces.into_iter().map(Into::into));
        self
    }

    /// Replace the excluded namespaces.
    #[must_use]
    pub fn with_excluded_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.clear();
        self.exclude_namespaces(namespaces)
    }

    /// Add an implementation after those already registered.
    #[must_use]
    pub fn register(mut self, implementation: impl ServiceImplementation + 'static) -> Self {
        self.entries.push(Arc::new(implementation));
        self
    }

    /// Add an already shared implementation.
    #[must_use]
    pub fn register_shared(mut self, implementation: Arc<dyn ServiceImplementation>) -> Self {
        self.entries.push(implementation);
        self
    }

    /// Drop excluded registrations and freeze the rest.
    #[must_use]
    pub fn build(self) -> ServiceCatalog {
        let excluded = self.excluded;
        let entries: Vec<_> = self
            .entries
            .into_iter()
            .filter(|entry| {
                let namespace = entry.descriptor().namespace();
                let skip = excluded
                    .iter()
                    .any(|prefix| in_namespace(namespace, prefix));
                if skip {
                    tracing::debug!(
                        service = entry.descriptor().name(),
                        namespace,
                        "skipping service in excluded namespace"
                    );
                }
                !skip
            })
            .collect();
        tracing::debug!(services = entries.len(), "service catalog built");
        ServiceCatalog { entries }
    }
}

/// `namespace` is `prefix` itself or nested below it (`::`-separated).
fn in_namespace(namespace: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches("::");
    if prefix.is_empty() {
        return false;
    }
    namespace == prefix
        || namespace
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with("::"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Unconstructible;

    fn entry(name: &str, namespace: &str, serves: &str) -> Unconstructible {
        Unconstructible::new(ServiceDescriptor::new(name, namespace).over(serves))
    }

    #[test]
    fn should_keep_registration_order() {
        let catalog = ServiceCatalog::builder()
            .register(entry("A", "app::services", "Person"))
            .register(entry("B", "app::services", "Group"))
            .register(entry("C", "app::services", "Person"))
            .build();

        let names: Vec<_> = catalog
            .candidates()
            .map(|c| c.descriptor().name().to_string())
            .collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn should_pick_first_registration_when_several_match() {
        let catalog = ServiceCatalog::builder()
            .register(entry("First", "app", "Person"))
            .register(entry("Second", "app", "Person"))
            .build();

        let found = catalog.find("Person").unwrap();
        assert_eq!(found.descriptor().name(), "First");
    }

    #[test]
    fn should_skip_default_platform_namespaces() {
        let catalog = ServiceCatalog::builder()
            .register(entry("Platform", "std::collections", "Person"))
            .register(entry("Core", "core", "Person"))
            .register(entry("Ours", "flowkit::services", "Person"))
            .build();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find("Person").unwrap().descriptor().name(), "Ours");
    }

    #[test]
    fn should_not_treat_prefix_lookalikes_as_excluded() {
        let catalog = ServiceCatalog::builder()
            .register(entry("Lookalike", "stdlib_ext::services", "Person"))
            .build();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn should_honour_configured_exclusions() {
        let catalog = ServiceCatalog::builder()
            .with_excluded_namespaces(["legacy"])
            .register(entry("Old", "legacy::services", "Person"))
            .register(entry("Std", "std::x", "Person"))
            .build();

        let names: Vec<_> = catalog
            .candidates()
            .map(|c| c.descriptor().name().to_string())
            .collect();
        assert_eq!(names, ["Std"]);
    }

    #[test]
    fn should_return_none_when_nothing_serves_type() {
        let catalog = ServiceCatalog::builder()
            .register(entry("A", "app", "Person"))
            .build();
        assert!(catalog.find("Group").is_none());
        assert!(!catalog.is_empty());
    }
}
