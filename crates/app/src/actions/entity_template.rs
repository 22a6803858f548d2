//! Render a template against an entity loaded by guid and store the result.
//!
//! Settings:
//! - `EntityType`: guid of the entity type to load.
//! - `EntityAttribute`: guid of the attribute holding the entity's guid.
//! - `Attribute`: guid of the attribute receiving the rendered text.
//! - `Value`: the template; the loaded entity is in scope as `Entity`.

use flowkit_domain::attribute::AttributeDefinition;
use flowkit_domain::error::FlowError;
use flowkit_domain::id::{AttributeId, EntityTypeId, as_guid};

use super::{ActionComponent, ActionContext, ActionOutcome};
use crate::loader::EntityLoader;
use crate::ports::{AttributeRepository, EntityTypeRepository, TemplateResolver};

pub struct EntityTemplate<AR, TR, T> {
    loader: EntityLoader,
    attributes: AR,
    entity_types: TR,
    templates: T,
}

impl<AR, TR, T> EntityTemplate<AR, TR, T>
where
    AR: AttributeRepository + Send + Sync,
    TR: EntityTypeRepository + Send + Sync,
    T: TemplateResolver,
{
    pub fn new(loader: EntityLoader, attributes: AR, entity_types: TR, templates: T) -> Self {
        Self {
            loader,
            attributes,
            entity_types,
            templates,
        }
    }

    async fn attribute(&self, setting: &str) -> Result<Option<AttributeDefinition>, FlowError> {
        match as_guid(setting) {
            Some(guid) => self.attributes.get_by_id(AttributeId::from_uuid(guid)).await,
            None => Ok(None),
        }
    }
}

impl<AR, TR, T> ActionComponent for EntityTemplate<AR, TR, T>
where
    AR: AttributeRepository + Send + Sync,
    TR: EntityTypeRepository + Send + Sync,
    T: TemplateResolver,
{
    fn name(&self) -> &'static str {
        "entity-template"
    }

    async fn execute(&self, context: &mut ActionContext<'_>) -> Result<ActionOutcome, FlowError> {
        let target_setting = context.setting("Attribute").to_string();
        let source_setting = context.setting("EntityAttribute").to_string();
        let (Some(target), Some(source)) = (
            self.attribute(&target_setting).await?,
            self.attribute(&source_setting).await?,
        ) else {
            tracing::debug!(component = self.name(), "attributes not configured, nothing to do");
            return Ok(ActionOutcome::succeeded());
        };

        let entity_guid = as_guid(context.attribute_value(&source));

        let entity_type = match as_guid(context.setting("EntityType")) {
            Some(guid) => {
                self.entity_types
                    .get_by_id(EntityTypeId::from_uuid(guid))
                    .await?
            }
            None => None,
        };
        let Some(entity_type) = entity_type else {
            tracing::debug!(component = self.name(), "entity type not found, nothing to do");
            return Ok(ActionOutcome::succeeded());
        };

        let entity = match entity_guid {
            Some(guid) => self.loader.load_entity(&entity_type, guid).await,
            None => None,
        };

        let mut fields = context.merge_fields();
        fields.insert_entity("Entity", entity.as_ref());

        match self.templates.resolve(context.setting("Value"), &fields) {
            Ok(value) => {
                context.set_attribute_value(&target, value.clone());
                context.add_log_entry(
                    format!("Set '{}' attribute to '{}'.", target.name, value),
                    false,
                );
                Ok(ActionOutcome::succeeded())
            }
            Err(err) => {
                let message = format!("Could not resolve template: {err}");
                context.add_log_entry(message.clone(), true);
                Ok(ActionOutcome::succeeded().with_errors(vec![message]))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use flowkit_domain::attribute::{AttributeOwner, FieldType};
    use flowkit_domain::entity_type::EntityType;
    use flowkit_domain::person::Person;
    use flowkit_domain::workflow::{ActionTemplate, ActivityType, Workflow};

    use crate::testing::{
        MemoryAttributes, MemoryEntityTypes, MemoryStore, PathTemplates, memory_catalog,
    };

    struct Fixture {
        store: Arc<MemoryStore>,
        person_type: EntityType,
        source: AttributeDefinition,
        target: AttributeDefinition,
        component: EntityTemplate<MemoryAttributes, MemoryEntityTypes, PathTemplates>,
    }

    fn fixture() -> Fixture {
        let store = MemoryStore::shared();
        let person_type = EntityType::builder().name("Person").build().unwrap();
        let source =
            AttributeDefinition::new("PersonGuid", AttributeOwner::Workflow, FieldType::Text)
                .unwrap();
        let target = AttributeDefinition::new("Greeting", AttributeOwner::Activity, FieldType::Text)
            .unwrap()
            .with_name("Greeting Text");
        let component = EntityTemplate::new(
            EntityLoader::new(Arc::new(memory_catalog(&store))),
            MemoryAttributes::default().with(&source).with(&target),
            MemoryEntityTypes::default().with(&person_type),
            PathTemplates,
        );
        Fixture {
            store,
            person_type,
            source,
            target,
            component,
        }
    }

    fn workflow(fixture: &Fixture, template: &str, entity_type: &str) -> Workflow {
        let action = ActionTemplate::new("Greet", "entity-template")
            .unwrap()
            .with_setting("EntityType", entity_type)
            .with_setting("EntityAttribute", fixture.source.id.to_string())
            .with_setting("Attribute", fixture.target.id.to_string())
            .with_setting("Value", template);
        let activity_type = ActivityType::new("Start")
            .unwrap()
            .with_attribute("Greeting")
            .with_action(action);
        let mut workflow = Workflow::new("Welcome").unwrap();
        workflow.activate(&activity_type);
        workflow
    }

    #[tokio::test]
    async fn should_store_rendered_template_when_entity_found() {
        let fixture = fixture();
        let person = Person::builder().first_name("Ada").build().unwrap();
        fixture.store.add_person(person.clone());
        let mut workflow = workflow(
            &fixture,
            "Hello {{ Entity.first_name }}",
            &fixture.person_type.id.to_string(),
        );
        workflow.set_attribute_value("PersonGuid", person.id.to_string());

        let mut context = ActionContext::new(&mut workflow, 0, 0).unwrap();
        let outcome = fixture.component.execute(&mut context).await.unwrap();

        assert_eq!(outcome, ActionOutcome::succeeded());
        let activity = &workflow.activities[0];
        assert_eq!(activity.attribute_value("Greeting"), "Hello Ada");
        assert_eq!(
            activity.actions[0].log[0].message,
            "Set 'Greeting Text' attribute to 'Hello Ada'."
        );
    }

    #[tokio::test]
    async fn should_render_with_null_entity_when_guid_unknown() {
        let fixture = fixture();
        let mut workflow = workflow(
            &fixture,
            "Hello {{ Entity.first_name }}!",
            &fixture.person_type.id.to_string(),
        );
        workflow.set_attribute_value("PersonGuid", uuid::Uuid::new_v4().to_string());

        let mut context = ActionContext::new(&mut workflow, 0, 0).unwrap();
        let outcome = fixture.component.execute(&mut context).await.unwrap();

        assert!(outcome.success);
        assert_eq!(workflow.activities[0].attribute_value("Greeting"), "Hello !");
    }

    #[tokio::test]
    async fn should_do_nothing_when_entity_type_unknown() {
        let fixture = fixture();
        let mut workflow = workflow(&fixture, "Hello", &uuid::Uuid::new_v4().to_string());

        let mut context = ActionContext::new(&mut workflow, 0, 0).unwrap();
        let outcome = fixture.component.execute(&mut context).await.unwrap();

        assert!(outcome.success);
        assert_eq!(workflow.activities[0].attribute_value("Greeting"), "");
        assert!(workflow.activities[0].actions[0].log.is_empty());
    }

    #[tokio::test]
    async fn should_do_nothing_when_attribute_setting_blank() {
        let fixture = fixture();
        let mut workflow = workflow(&fixture, "Hello", &fixture.person_type.id.to_string());
        workflow.activities[0].actions[0]
            .settings
            .insert("Attribute".to_string(), String::new());

        let mut context = ActionContext::new(&mut workflow, 0, 0).unwrap();
        let outcome = fixture.component.execute(&mut context).await.unwrap();

        assert!(outcome.success);
        assert!(workflow.activities[0].actions[0].log.is_empty());
    }

    #[tokio::test]
    async fn should_report_error_when_template_malformed() {
        let fixture = fixture();
        let mut workflow = workflow(&fixture, "Hello {{ Entity", &fixture.person_type.id.to_string());

        let mut context = ActionContext::new(&mut workflow, 0, 0).unwrap();
        let outcome = fixture.component.execute(&mut context).await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.error_messages.len(), 1);
        let log = &workflow.activities[0].actions[0].log;
        assert!(log[0].is_error);
        assert_eq!(workflow.activities[0].attribute_value("Greeting"), "");
    }
}
