//! Activate a new activity on the running workflow and seed its attributes.
//!
//! Settings:
//! - `Activity`: guid of the activity type to activate.
//! - `AttributeValues`: `key^value|key^value` list; each value is a template
//!   resolved against the current action's merge fields.

use flowkit_domain::error::FlowError;
use flowkit_domain::id::{ActivityTypeId, as_guid};

use super::{ActionComponent, ActionContext, ActionOutcome, parse_key_value_list};
use crate::ports::{ActivityTypeRepository, TemplateResolver};

const INVALID_ACTIVITY: &str = "Invalid Activity Property";

pub struct ActivateActivity<R, T> {
    activity_types: R,
    templates: T,
}

impl<R, T> ActivateActivity<R, T>
where
    R: ActivityTypeRepository + Send + Sync,
    T: TemplateResolver,
{
    pub fn new(activity_types: R, templates: T) -> Self {
        Self {
            activity_types,
            templates,
        }
    }
}

impl<R, T> ActionComponent for ActivateActivity<R, T>
where
    R: ActivityTypeRepository + Send + Sync,
    T: TemplateResolver,
{
    fn name(&self) -> &'static str {
        "activate-activity"
    }

    async fn execute(&self, context: &mut ActionContext<'_>) -> Result<ActionOutcome, FlowError> {
        let activity_type = match as_guid(context.setting("Activity")) {
            Some(guid) => {
                self.activity_types
                    .get_by_id(ActivityTypeId::from_uuid(guid))
                    .await?
            }
            None => None,
        };
        let Some(activity_type) = activity_type else {
            context.add_log_entry(INVALID_ACTIVITY, true);
            return Ok(ActionOutcome::failed());
        };

        let values = parse_key_value_list(context.setting("AttributeValues"));
        let fields = context.merge_fields();
        let index = context.activate(&activity_type);
        tracing::debug!(
            component = self.name(),
            activity_type = %activity_type.name,
            index,
            "activated activity"
        );

        let mut errors = Vec::new();
        for (key, value) in values {
            let Some(activity) = context.activity_at_mut(index) else {
                break;
            };
            if !activity.has_attribute(&key) {
                errors.push(format!(
                    "'{value}' is not an attribute key in the activated activity: '{}'",
                    activity_type.name
                ));
                continue;
            }
            match self.templates.resolve(&value, &fields) {
                Ok(resolved) => activity.set_attribute_value(key, resolved),
                Err(err) => errors.push(format!("Could not resolve value for '{key}': {err}")),
            }
        }

        context.add_log_entry(
            format!("Activated new '{}' activity", activity_type.name),
            false,
        );
        Ok(ActionOutcome::succeeded().with_errors(errors))
    }
}
