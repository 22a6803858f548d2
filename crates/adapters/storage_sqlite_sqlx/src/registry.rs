//! Registration of the `SQLite` entity services into the service catalog.
//!
//! Each kind is served by the generic [`SqliteService`], declared the same
//! way the concrete services are: a named service extending a generic base
//! that carries the entity type parameter.

use std::sync::Arc;

use sqlx::SqlitePool;

use flowkit_app::loader::{CatalogBuilder, ContextBound, ServiceDescriptor};
use flowkit_app::ports::Loadable;
use flowkit_app::service_descriptor;
use flowkit_domain::group::{Group, GroupMember, GroupRole};
use flowkit_domain::person::{Person, PersonAlias};

use crate::context::{SqliteContext, SqliteContextFactory};
use crate::entity_service::SqliteService;
use crate::tables::Table;

fn descriptor<E: Table>(name: &str) -> ServiceDescriptor {
    let base = service_descriptor!(format!("SqliteService<{}>", E::ENTITY_TYPE)).over(E::ENTITY_TYPE);
    service_descriptor!(name).extending(Arc::new(base))
}

fn register<E: Table>(builder: CatalogBuilder, pool: &SqlitePool, name: &str) -> CatalogBuilder {
    builder.register(ContextBound::new(
        descriptor::<E>(name),
        SqliteContextFactory::new(pool.clone()),
        |context: SqliteContext| Loadable::new(SqliteService::<E>::new(context)),
    ))
}

/// Register a load-by-guid service for every stored entity kind.
#[must_use]
pub fn register_services(builder: CatalogBuilder, pool: &SqlitePool) -> CatalogBuilder {
    let builder = register::<Person>(builder, pool, "PersonService");
    let builder = register::<PersonAlias>(builder, pool, "PersonAliasService");
    let builder = register::<Group>(builder, pool, "GroupService");
    let builder = register::<GroupRole>(builder, pool, "GroupRoleService");
    let builder = register::<GroupMember>(builder, pool, "GroupMemberService");
    tracing::debug!("registered sqlite entity services");
    builder
}
