//! Record a person's roles in a group into a workflow attribute.
//!
//! Settings:
//! - `Person`: guid of the attribute holding a person alias guid.
//! - `Group`: guid of the attribute holding a group guid.
//! - `GroupMemberStatus`: statuses to consider (default `1,2`).
//! - `GroupRole`: optional role guid restricting the memberships.
//! - `Attribute`: guid of the attribute receiving the result.
//! - `StoreAsId`: for text attributes, store role ids instead of names.

use flowkit_domain::attribute::{AttributeDefinition, FieldType};
use flowkit_domain::error::FlowError;
use flowkit_domain::group::{Group, GroupMember, GroupMemberStatus};
use flowkit_domain::id::{AttributeId, GroupRoleId, as_guid};
use flowkit_domain::person::{Person, PersonAlias};

use super::{ActionComponent, ActionContext, ActionOutcome, as_boolean};
use crate::loader::EntityLoader;
use crate::ports::{AttributeRepository, GroupMemberRepository, GroupRoleRepository};

const DEFAULT_STATUSES: &str = "1,2";

pub struct GroupMemberRoles<AR, MR, RR> {
    loader: EntityLoader,
    attributes: AR,
    members: MR,
    roles: RR,
}

impl<AR, MR, RR> GroupMemberRoles<AR, MR, RR>
where
    AR: AttributeRepository + Send + Sync,
    MR: GroupMemberRepository + Send + Sync,
    RR: GroupRoleRepository + Send + Sync,
{
    pub fn new(loader: EntityLoader, attributes: AR, members: MR, roles: RR) -> Self {
        Self {
            loader,
            attributes,
            members,
            roles,
        }
    }

    async fn attribute(&self, setting: &str) -> Result<Option<AttributeDefinition>, FlowError> {
        match as_guid(setting) {
            Some(guid) => self.attributes.get_by_id(AttributeId::from_uuid(guid)).await,
            None => Ok(None),
        }
    }

    async fn group(&self, context: &ActionContext<'_>) -> Result<Option<Group>, FlowError> {
        let Some(attribute) = self.attribute(context.setting("Group")).await? else {
            return Ok(None);
        };
        Ok(match as_guid(context.attribute_value(&attribute)) {
            Some(guid) => self.loader.load_as::<Group>(guid).await,
            None => None,
        })
    }

    /// Resolve the person through the alias stored in the `Person` attribute.
    async fn person(
        &self,
        context: &ActionContext<'_>,
        errors: &mut Vec<String>,
    ) -> Result<Option<Person>, FlowError> {
        let Some(attribute) = self.attribute(context.setting("Person")).await? else {
            return Ok(None);
        };
        let value = context.attribute_value(&attribute);
        if value.trim().is_empty() {
            return Ok(None);
        }
        if attribute.field_type != FieldType::Person {
            errors.push("The attribute used to provide the person was not of type 'Person'.".to_string());
            return Ok(None);
        }
        let Some(alias_guid) = as_guid(value) else {
            return Ok(None);
        };
        let Some(alias) = self.loader.load_as::<PersonAlias>(alias_guid).await else {
            return Ok(None);
        };
        Ok(self.loader.load_as::<Person>(alias.person_id.as_uuid()).await)
    }

    async fn memberships(
        &self,
        context: &ActionContext<'_>,
        group: &Group,
        person: &Person,
    ) -> Result<Result<Vec<GroupMember>, String>, FlowError> {
        let setting = context.setting("GroupMemberStatus");
        let setting = if setting.trim().is_empty() {
            DEFAULT_STATUSES
        } else {
            setting
        };
        let statuses = match GroupMemberStatus::parse_list(setting) {
            Ok(statuses) => statuses,
            Err(err) => return Ok(Err(err.to_string())),
        };

        let mut members = self
            .members
            .find_by_group_and_person(group.id, person.id)
            .await?;
        members.retain(|member| statuses.contains(&member.status));

        let role_setting = context.setting("GroupRole");
        if !role_setting.trim().is_empty() {
            let role = match as_guid(role_setting) {
                Some(guid) => self.roles.get_by_id(GroupRoleId::from_uuid(guid)).await?,
                None => None,
            };
            match role {
                Some(role) => members.retain(|member| member.role_id == role.id),
                None => members.clear(),
            }
        }
        Ok(Ok(members))
    }

    async fn role_names(&self, members: &[GroupMember]) -> Result<Vec<String>, FlowError> {
        let mut names = Vec::with_capacity(members.len());
        for member in members {
            if let Some(role) = self.roles.get_by_id(member.role_id).await? {
                names.push(role.name);
            }
        }
        Ok(names)
    }

    async fn store(
        &self,
        context: &mut ActionContext<'_>,
        members: &[GroupMember],
    ) -> Result<(), FlowError> {
        let setting = context.setting("Attribute").to_string();
        let Some(target) = self.attribute(&setting).await? else {
            return Ok(());
        };
        let value = match target.field_type {
            FieldType::Boolean => String::from(if members.is_empty() { "False" } else { "True" }),
            FieldType::Integer => String::from(if members.is_empty() { "0" } else { "1" }),
            FieldType::Text => {
                if as_boolean(context.setting("StoreAsId"), false) {
                    members
                        .iter()
                        .map(|member| member.role_id.to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                } else {
                    self.role_names(members).await?.join(",")
                }
            }
            _ => return Ok(()),
        };
        context.set_attribute_value(&target, value);
        Ok(())
    }
}

impl<AR, MR, RR> ActionComponent for GroupMemberRoles<AR, MR, RR>
where
    AR: AttributeRepository + Send + Sync,
    MR: GroupMemberRepository + Send + Sync,
    RR: GroupRoleRepository + Send + Sync,
{
    fn name(&self) -> &'static str {
        "group-member-roles"
    }

    async fn execute(&self, context: &mut ActionContext<'_>) -> Result<ActionOutcome, FlowError> {
        let mut errors = Vec::new();

        let group = self.group(context).await?;
        if group.is_none() {
            errors.push("No group was provided".to_string());
        }

        let person = self.person(context, &mut errors).await?;
        if person.is_none() {
            let selected = as_guid(context.setting("Person"))
                .map(|guid| guid.to_string())
                .unwrap_or_default();
            errors.push(format!(
                "Person could not be found for selected value ('{selected}')!"
            ));
        }

        if let (Some(group), Some(person), true) = (&group, &person, errors.is_empty()) {
            match self.memberships(context, group, person).await? {
                Ok(members) => {
                    tracing::debug!(
                        component = self.name(),
                        group = %group.id,
                        person = %person.id,
                        memberships = members.len(),
                        "matched group memberships"
                    );
                    self.store(context, &members).await?;
                }
                Err(message) => errors.push(message),
            }
        }

        for message in &errors {
            context.add_log_entry(message.clone(), true);
        }
        Ok(ActionOutcome::succeeded().with_errors(errors))
    }
}
