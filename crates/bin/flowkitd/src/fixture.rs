//! JSON fixture files for `flowkitd seed`.

use serde::Deserialize;

use flowkit_adapter_storage_sqlite_sqlx::error::StorageError;
use flowkit_adapter_storage_sqlite_sqlx::seed::Seeder;
use flowkit_domain::attribute::AttributeDefinition;
use flowkit_domain::entity_type::EntityType;
use flowkit_domain::group::{Group, GroupMember, GroupRole};
use flowkit_domain::person::{Person, PersonAlias};
use flowkit_domain::workflow::ActivityType;

/// Records to import, in dependency order. Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub entity_types: Vec<EntityType>,
    pub people: Vec<Person>,
    pub aliases: Vec<PersonAlias>,
    pub groups: Vec<Group>,
    pub roles: Vec<GroupRole>,
    pub members: Vec<GroupMember>,
    pub attributes: Vec<AttributeDefinition>,
    pub activity_types: Vec<ActivityType>,
}

impl Fixture {
    /// Number of records across all sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entity_types.len()
            + self.people.len()
            + self.aliases.len()
            + self.groups.len()
            + self.roles.len()
            + self.members.len()
            + self.attributes.len()
            + self.activity_types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write every record through `seeder`, replacing existing rows.
    ///
    /// # Errors
    ///
    /// Returns the first [`StorageError`] raised by the store.
    pub async fn apply(&self, seeder: &Seeder) -> Result<(), StorageError> {
        for entity_type in &self.entity_types {
            seeder.entity_type(entity_type).await?;
        }
        for person in &self.people {
            seeder.person(person).await?;
        }
        for alias in &self.aliases {
            seeder.alias(alias).await?;
        }
        for group in &self.groups {
            seeder.group(group).await?;
        }
        for role in &self.roles {
            seeder.role(role).await?;
        }
        for member in &self.members {
            seeder.member(member).await?;
        }
        for attribute in &self.attributes {
            seeder.attribute(attribute).await?;
        }
        for activity_type in &self.activity_types {
            seeder.activity_type(activity_type).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_empty_fixture() {
        let fixture: Fixture = serde_json::from_str("{}").unwrap();
        assert!(fixture.is_empty());
    }

    #[test]
    fn should_count_records_across_sections() {
        let person = Person::builder().first_name("Ada").last_name("Lovelace").build().unwrap();
        let alias = PersonAlias::new(person.id);
        let group = Group::builder().name("Choir").build().unwrap();
        let fixture = Fixture {
            people: vec![person],
            aliases: vec![alias],
            groups: vec![group],
            ..Fixture::default()
        };
        let json = serde_json::json!({
            "people": fixture.people,
            "aliases": fixture.aliases,
            "groups": fixture.groups,
        });

        let parsed: Fixture = serde_json::from_value(json).unwrap();

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed.people, fixture.people);
        assert_eq!(parsed.groups[0].name, "Choir");
    }
}
