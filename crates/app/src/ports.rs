//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod entity_service;
pub mod persistence;
pub mod storage;
pub mod template;

pub use entity_service::{BoxFuture, EntityService, LoadByGuid, Loadable, ServiceInstance};
pub use persistence::{ContextFactory, PersistenceContext};
pub use storage::{
    ActivityTypeRepository, AttributeRepository, EntityTypeRepository, GroupMemberRepository,
    GroupRoleRepository,
};
pub use template::TemplateResolver;
