//! Groups, group roles, and group memberships.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::Entity;
use crate::error::{FlowError, ValidationError};
use crate::id::{GroupId, GroupMemberId, GroupRoleId, PersonId};

/// A named collection of people.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub description: Option<String>,
}

impl Group {
    /// Create a builder for constructing a [`Group`].
    #[must_use]
    pub fn builder() -> GroupBuilder {
        GroupBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), FlowError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

impl Entity for Group {
    const ENTITY_TYPE: &'static str = "Group";

    fn guid(&self) -> Uuid {
        self.id.as_uuid()
    }
}

/// Step-by-step builder for [`Group`].
#[derive(Debug, Default)]
pub struct GroupBuilder {
    id: Option<GroupId>,
    name: Option<String>,
    description: Option<String>,
}

impl GroupBuilder {
    #[must_use]
    pub fn id(mut self, id: GroupId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Consume the builder, validate, and return a [`Group`].
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<Group, FlowError> {
        let group = Group {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            description: self.description,
        };
        group.validate()?;
        Ok(group)
    }
}

/// A role a member can hold within a group (e.g. "Leader").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRole {
    pub id: GroupRoleId,
    pub name: String,
}

impl GroupRole {
    /// Create a role with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Validation`] when `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, FlowError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(Self {
            id: GroupRoleId::new(),
            name,
        })
    }
}

impl Entity for GroupRole {
    const ENTITY_TYPE: &'static str = "GroupRole";

    fn guid(&self) -> Uuid {
        self.id.as_uuid()
    }
}

/// Status of a membership. Discriminants match the stored integer codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupMemberStatus {
    Inactive = 0,
    Active = 1,
    Pending = 2,
}

impl GroupMemberStatus {
    /// Numeric code used in settings and storage.
    #[must_use]
    pub fn code(self) -> i64 {
        self as i64
    }

    /// Inverse of [`code`](Self::code).
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Inactive),
            1 => Some(Self::Active),
            2 => Some(Self::Pending),
            _ => None,
        }
    }

    /// Parse a comma-separated list of codes or names, e.g. `"1,2"`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownMemberStatus`] for any item that is
    /// neither a known code nor a known name.
    pub fn parse_list(text: &str) -> Result<Vec<Self>, ValidationError> {
        text.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(Self::from_str)
            .collect()
    }
}

impl FromStr for GroupMemberStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "inactive" => Ok(Self::Inactive),
            "1" | "active" => Ok(Self::Active),
            "2" | "pending" => Ok(Self::Pending),
            other => Err(ValidationError::UnknownMemberStatus(other.to_string())),
        }
    }
}

impl fmt::Display for GroupMemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => f.write_str("inactive"),
            Self::Active => f.write_str("active"),
            Self::Pending => f.write_str("pending"),
        }
    }
}

/// A person's membership in a group, in one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: GroupMemberId,
    pub group_id: GroupId,
    pub person_id: PersonId,
    pub role_id: GroupRoleId,
    pub status: GroupMemberStatus,
}

impl Entity for GroupMember {
    const ENTITY_TYPE: &'static str = "GroupMember";

    fn guid(&self) -> Uuid {
        self.id.as_uuid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_valid_group_when_name_provided() {
        let group = Group::builder().name("Choir").build().unwrap();
        assert_eq!(group.name, "Choir");
        assert!(group.description.is_none());
    }

    #[test]
    fn should_return_validation_error_when_group_name_is_empty() {
        let result = Group::builder().build();
        assert!(matches!(
            result,
            Err(FlowError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_reject_role_without_name() {
        assert!(GroupRole::new("").is_err());
    }

    #[test]
    fn should_parse_status_codes_and_names() {
        assert_eq!("1".parse::<GroupMemberStatus>(), Ok(GroupMemberStatus::Active));
        assert_eq!(
            "Pending".parse::<GroupMemberStatus>(),
            Ok(GroupMemberStatus::Pending)
        );
        assert_eq!(GroupMemberStatus::Inactive.code(), 0);
    }

    #[test]
    fn should_round_trip_status_code() {
        assert_eq!(GroupMemberStatus::from_code(2), Some(GroupMemberStatus::Pending));
        assert_eq!(GroupMemberStatus::from_code(7), None);
    }

    #[test]
    fn should_parse_default_status_list() {
        let statuses = GroupMemberStatus::parse_list("1,2").unwrap();
        assert_eq!(
            statuses,
            vec![GroupMemberStatus::Active, GroupMemberStatus::Pending]
        );
    }

    #[test]
    fn should_skip_blank_items_in_status_list() {
        let statuses = GroupMemberStatus::parse_list(" 0 , ,").unwrap();
        assert_eq!(statuses, vec![GroupMemberStatus::Inactive]);
    }

    #[test]
    fn should_reject_unknown_status() {
        let result = GroupMemberStatus::parse_list("1,7");
        assert_eq!(
            result,
            Err(ValidationError::UnknownMemberStatus("7".to_string()))
        );
    }
}
