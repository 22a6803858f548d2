//! Storage port: read-side repositories used by the action components.

use std::future::Future;
use std::sync::Arc;

use flowkit_domain::attribute::AttributeDefinition;
use flowkit_domain::entity_type::EntityType;
use flowkit_domain::error::FlowError;
use flowkit_domain::group::{GroupMember, GroupRole};
use flowkit_domain::id::{ActivityTypeId, AttributeId, EntityTypeId, GroupId, GroupRoleId, PersonId};
use flowkit_domain::workflow::ActivityType;

/// Lookup of attribute definitions by guid.
pub trait AttributeRepository {
    fn get_by_id(
        &self,
        id: AttributeId,
    ) -> impl Future<Output = Result<Option<AttributeDefinition>, FlowError>> + Send;
}

/// Lookup of entity type descriptors.
pub trait EntityTypeRepository {
    /// Get an entity type by its guid.
    fn get_by_id(
        &self,
        id: EntityTypeId,
    ) -> impl Future<Output = Result<Option<EntityType>, FlowError>> + Send;

    /// Get an entity type by its name (e.g. `"Person"`).
    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<EntityType>, FlowError>> + Send;
}

/// Lookup of activity type blueprints.
pub trait ActivityTypeRepository {
    fn get_by_id(
        &self,
        id: ActivityTypeId,
    ) -> impl Future<Output = Result<Option<ActivityType>, FlowError>> + Send;
}

/// Query of group memberships.
pub trait GroupMemberRepository {
    /// Every membership (in any role or status) of `person_id` in `group_id`.
    fn find_by_group_and_person(
        &self,
        group_id: GroupId,
        person_id: PersonId,
    ) -> impl Future<Output = Result<Vec<GroupMember>, FlowError>> + Send;
}

/// Lookup of group roles.
pub trait GroupRoleRepository {
    fn get_by_id(
        &self,
        id: GroupRoleId,
    ) -> impl Future<Output = Result<Option<GroupRole>, FlowError>> + Send;
}

impl<T: AttributeRepository + Send + Sync> AttributeRepository for Arc<T> {
    fn get_by_id(
        &self,
        id: AttributeId,
    ) -> impl Future<Output = Result<Option<AttributeDefinition>, FlowError>> + Send {
        (**self).get_by_id(id)
    }
}

impl<T: EntityTypeRepository + Send + Sync> EntityTypeRepository for Arc<T> {
    fn get_by_id(
        &self,
        id: EntityTypeId,
    ) -> impl Future<Output = Result<Option<EntityType>, FlowError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<EntityType>, FlowError>> + Send {
        (**self).get_by_name(name)
    }
}

impl<T: ActivityTypeRepository + Send + Sync> ActivityTypeRepository for Arc<T> {
    fn get_by_id(
        &self,
        id: ActivityTypeId,
    ) -> impl Future<Output = Result<Option<ActivityType>, FlowError>> + Send {
        (**self).get_by_id(id)
    }
}

impl<T: GroupMemberRepository + Send + Sync> GroupMemberRepository for Arc<T> {
    fn find_by_group_and_person(
        &self,
        group_id: GroupId,
        person_id: PersonId,
    ) -> impl Future<Output = Result<Vec<GroupMember>, FlowError>> + Send {
        (**self).find_by_group_and_person(group_id, person_id)
    }
}

impl<T: GroupRoleRepository + Send + Sync> GroupRoleRepository for Arc<T> {
    fn get_by_id(
        &self,
        id: GroupRoleId,
    ) -> impl Future<Output = Result<Option<GroupRole>, FlowError>> + Send {
        (**self).get_by_id(id)
    }
}
