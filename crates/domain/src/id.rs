//! Typed identifier newtypes backed by UUIDs.
//!
//! Every persisted record is addressed by a guid. The newtypes keep a
//! person guid from being passed where a group guid is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the inner UUID.
            #[must_use]
            pub fn as_uuid(self) -> Uuid {
                self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a [`Person`](crate::person::Person).
    PersonId
);

define_id!(
    /// Unique identifier for a [`PersonAlias`](crate::person::PersonAlias).
    PersonAliasId
);

define_id!(
    /// Unique identifier for a [`Group`](crate::group::Group).
    GroupId
);

define_id!(
    /// Unique identifier for a [`GroupRole`](crate::group::GroupRole).
    GroupRoleId
);

define_id!(
    /// Unique identifier for a [`GroupMember`](crate::group::GroupMember).
    GroupMemberId
);

define_id!(
    /// Unique identifier for an [`EntityType`](crate::entity_type::EntityType).
    EntityTypeId
);

define_id!(
    /// Unique identifier for an [`AttributeDefinition`](crate::attribute::AttributeDefinition).
    AttributeId
);

define_id!(
    /// Unique identifier for a [`Workflow`](crate::workflow::Workflow).
    WorkflowId
);

define_id!(
    /// Unique identifier for an [`Activity`](crate::workflow::Activity).
    ActivityId
);

define_id!(
    /// Unique identifier for an [`ActivityType`](crate::workflow::ActivityType).
    ActivityTypeId
);

define_id!(
    /// Unique identifier for a [`WorkflowAction`](crate::workflow::WorkflowAction).
    ActionId
);

/// Leniently parse a guid out of a stored attribute or setting value.
///
/// Blank, malformed, and nil values all yield `None`: configured values are
/// free text and an unset guid is indistinguishable from a bad one.
#[must_use]
pub fn as_guid(text: &str) -> Option<Uuid> {
    Uuid::parse_str(text.trim())
        .ok()
        .filter(|uuid| !uuid.is_nil())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_generate_unique_ids_when_called_twice() {
        let a = PersonId::new();
        let b = PersonId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn should_roundtrip_through_display_and_from_str() {
        let id = GroupId::new();
        let text = id.to_string();
        let parsed: GroupId = text.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn should_serialize_as_bare_uuid_string() {
        let id = WorkflowId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }

    #[test]
    fn should_return_error_when_parsing_invalid_uuid() {
        let result = AttributeId::from_str("not-a-uuid");
        assert!(result.is_err());
    }

    #[test]
    fn should_wrap_existing_uuid_when_using_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = EntityTypeId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
    }

    #[test]
    fn should_parse_guid_with_surrounding_whitespace() {
        let uuid = Uuid::new_v4();
        assert_eq!(as_guid(&format!("  {uuid} ")), Some(uuid));
    }

    #[test]
    fn should_reject_blank_malformed_and_nil_guids() {
        assert_eq!(as_guid(""), None);
        assert_eq!(as_guid("nope"), None);
        assert_eq!(as_guid(&Uuid::nil().to_string()), None);
    }
}
