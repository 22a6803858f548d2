//! # flowkit-app
//!
//! Application layer: port definitions (traits), the runtime entity
//! loader, and the workflow action components.
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `PersistenceContext` / `ContextFactory`: transactional handles
//!   - `EntityService`: load one entity kind by guid
//!   - `AttributeRepository`, `EntityTypeRepository`, `ActivityTypeRepository`,
//!     `GroupMemberRepository`, `GroupRoleRepository`: record lookups
//!   - `TemplateResolver`: merge-field evaluation
//! - Provide the **entity loader**: resolve an entity type known only at
//!   runtime to the service registered for it, bind that service to a fresh
//!   persistence context, and load by guid
//! - Provide the **action components** that read settings, resolve templates,
//!   and write attributes on workflow objects
//!
//! ## Dependency rule
//! Depends on `flowkit-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod actions;
pub mod loader;
pub mod merge_fields;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;
