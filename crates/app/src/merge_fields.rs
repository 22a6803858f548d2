//! Merge fields: the named values a template is evaluated against.

use serde_json::{Map, Value, json};

use flowkit_domain::entity::LoadedEntity;
use flowkit_domain::workflow::{Activity, Workflow, WorkflowAction};

/// Named values in scope while resolving a template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeFields(Map<String, Value>);

impl MergeFields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard fields for an executing action: `Workflow`, `Activity`
    /// and `Action`, each with its id, name, and attribute values.
    #[must_use]
    pub fn for_action(workflow: &Workflow, activity: &Activity, action: &WorkflowAction) -> Self {
        let mut fields = Self::new();
        fields.insert(
            "Workflow",
            json!({
                "id": workflow.id,
                "name": workflow.name,
                "attributes": workflow.attributes,
            }),
        );
        fields.insert(
            "Activity",
            json!({
                "id": activity.id,
                "name": activity.name,
                "attributes": activity.attributes,
            }),
        );
        fields.insert(
            "Action",
            json!({
                "id": action.id,
                "name": action.name,
                "component": action.component,
            }),
        );
        fields
    }

    /// Insert or replace a named value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Insert a loaded entity's fields, or `null` when nothing was loaded.
    pub fn insert_entity(&mut self, name: impl Into<String>, entity: Option<&LoadedEntity>) {
        let value = entity.map_or(Value::Null, |entity| entity.fields.clone());
        self.insert(name, value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Borrow the underlying JSON object.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert into a JSON object value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowkit_domain::person::Person;
    use flowkit_domain::workflow::{ActionTemplate, ActivityType};

    fn running_workflow() -> Workflow {
        let mut workflow = Workflow::new("Intake").unwrap();
        workflow.set_attribute_value("Status", "Open");
        let ty = ActivityType::new("Start")
            .unwrap()
            .with_attribute("Note")
            .with_action(ActionTemplate::new("Render", "entity-template").unwrap());
        workflow.activate(&ty);
        workflow
    }

    #[test]
    fn should_expose_workflow_activity_and_action() {
        let workflow = running_workflow();
        let activity = &workflow.activities[0];
        let fields = MergeFields::for_action(&workflow, activity, &activity.actions[0]);

        assert_eq!(fields.get("Workflow").unwrap()["name"], "Intake");
        assert_eq!(
            fields.get("Workflow").unwrap()["attributes"]["Status"],
            "Open"
        );
        assert_eq!(fields.get("Activity").unwrap()["name"], "Start");
        assert_eq!(fields.get("Action").unwrap()["component"], "entity-template");
    }

    #[test]
    fn should_insert_null_when_entity_missing() {
        let mut fields = MergeFields::new();
        fields.insert_entity("Entity", None);
        assert_eq!(fields.get("Entity"), Some(&Value::Null));
    }

    #[test]
    fn should_insert_entity_fields_when_loaded() {
        let person = Person::builder().first_name("Ada").build().unwrap();
        let loaded = LoadedEntity::from_entity(&person).unwrap();

        let mut fields = MergeFields::new();
        fields.insert_entity("Entity", Some(&loaded));

        assert_eq!(fields.get("Entity").unwrap()["first_name"], "Ada");
        assert_eq!(fields.into_value()["Entity"]["first_name"], "Ada");
    }
}
