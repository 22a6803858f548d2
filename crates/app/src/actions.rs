//! Workflow actions: the steps a workflow executes.
//!
//! Each step of an activity names an action component. The [`ActionRunner`]
//! walks the workflow, resolves every pending step to an [`ActionKind`], and
//! hands it an [`ActionContext`] positioned on that step.

pub mod activate_activity;
pub mod entity_template;
pub mod group_member_roles;

use std::collections::BTreeMap;
use std::future::Future;
use std::str::FromStr;

use flowkit_domain::attribute::{AttributeDefinition, AttributeOwner};
use flowkit_domain::error::{FlowError, ValidationError};
use flowkit_domain::workflow::{Activity, ActivityType, Workflow, WorkflowAction};

use crate::merge_fields::MergeFields;

pub use activate_activity::ActivateActivity;
pub use entity_template::EntityTemplate;
pub use group_member_roles::GroupMemberRoles;

/// Upper bound on activities a single run may activate and then execute.
const MAX_ACTIVITIES: usize = 256;

/// Result of executing one action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    pub success: bool,
    pub error_messages: Vec<String>,
}

impl ActionOutcome {
    #[must_use]
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error_messages: Vec::new(),
        }
    }

    #[must_use]
    pub fn failed() -> Self {
        Self {
            success: false,
            error_messages: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_errors(mut self, error_messages: Vec<String>) -> Self {
        self.error_messages = error_messages;
        self
    }
}

/// A workflow positioned on the action being executed.
pub struct ActionContext<'w> {
    workflow: &'w mut Workflow,
    activity: usize,
    action: usize,
}

impl<'w> ActionContext<'w> {
    /// Position on action `action` of activity `activity`; `None` when
    /// either index is out of range.
    pub fn new(workflow: &'w mut Workflow, activity: usize, action: usize) -> Option<Self> {
        let exists = workflow
            .activities
            .get(activity)
            .is_some_and(|a| action < a.actions.len());
        exists.then_some(Self {
            workflow,
            activity,
            action,
        })
    }

    #[must_use]
    pub fn workflow(&self) -> &Workflow {
        self.workflow
    }

    #[must_use]
    pub fn activity(&self) -> &Activity {
        &self.workflow.activities[self.activity]
    }

    #[must_use]
    pub fn action(&self) -> &WorkflowAction {
        &self.activity().actions[self.action]
    }

    fn action_mut(&mut self) -> &mut WorkflowAction {
        &mut self.workflow.activities[self.activity].actions[self.action]
    }

    /// The action's configured value for `key`; empty when unset.
    #[must_use]
    pub fn setting(&self, key: &str) -> &str {
        self.action().setting(key)
    }

    pub fn add_log_entry(&mut self, message: impl Into<String>, is_error: bool) {
        self.action_mut().add_log_entry(message, is_error);
    }

    /// Value of `attribute`, read from the workflow or the current activity
    /// depending on who owns it.
    #[must_use]
    pub fn attribute_value(&self, attribute: &AttributeDefinition) -> &str {
        match attribute.owner {
            AttributeOwner::Workflow => self.workflow.attribute_value(&attribute.key),
            AttributeOwner::Activity => self.activity().attribute_value(&attribute.key),
        }
    }

    pub fn set_attribute_value(&mut self, attribute: &AttributeDefinition, value: impl Into<String>) {
        match attribute.owner {
            AttributeOwner::Workflow => self.workflow.set_attribute_value(&attribute.key, value),
            AttributeOwner::Activity => self.workflow.activities[self.activity]
                .set_attribute_value(&attribute.key, value),
        }
    }

    /// Start a new activity of `activity_type` on the workflow and return
    /// its index.
    pub fn activate(&mut self, activity_type: &ActivityType) -> usize {
        self.workflow.activate(activity_type)
    }

    /// Any activity of the workflow, by index.
    pub fn activity_at_mut(&mut self, index: usize) -> Option<&mut Activity> {
        self.workflow.activities.get_mut(index)
    }

    #[must_use]
    pub fn merge_fields(&self) -> MergeFields {
        MergeFields::for_action(self.workflow, self.activity(), self.action())
    }
}

/// One executable kind of workflow step.
pub trait ActionComponent: Send + Sync {
    fn name(&self) -> &'static str;

    /// Execute the step the context is positioned on.
    ///
    /// Problems with the workflow's own configuration are reported through
    /// the outcome and the action log; only infrastructure failures are
    /// returned as errors.
    fn execute(
        &self,
        context: &mut ActionContext<'_>,
    ) -> impl Future<Output = Result<ActionOutcome, FlowError>> + Send;
}

/// The action components a workflow may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    EntityTemplate,
    ActivateActivity,
    GroupMemberRoles,
}

impl ActionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EntityTemplate => "entity-template",
            Self::ActivateActivity => "activate-activity",
            Self::GroupMemberRoles => "group-member-roles",
        }
    }
}

impl FromStr for ActionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "entitytemplate" | "lavafromentity" | "lavafromgenericentity" => {
                Ok(Self::EntityTemplate)
            }
            "activateactivity" | "activateactivitywithattributes" => Ok(Self::ActivateActivity),
            "groupmemberroles" | "setattributetogroupmemberroles" => Ok(Self::GroupMemberRoles),
            _ => Err(ValidationError::UnknownComponent(s.to_string())),
        }
    }
}

/// Summary of one [`ActionRunner::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub executed: usize,
    pub failed: usize,
    pub error_messages: Vec<String>,
}

/// Executes pending workflow actions in order.
pub struct ActionRunner<E, A, G> {
    entity_template: E,
    activate_activity: A,
    group_member_roles: G,
}

impl<E, A, G> ActionRunner<E, A, G>
where
    E: ActionComponent,
    A: ActionComponent,
    G: ActionComponent,
{
    pub fn new(entity_template: E, activate_activity: A, group_member_roles: G) -> Self {
        Self {
            entity_template,
            activate_activity,
            group_member_roles,
        }
    }

    /// Run every action not yet completed, activity by activity, including
    /// activities activated while running. Each action is marked completed
    /// once executed.
    ///
    /// # Errors
    ///
    /// Returns the first infrastructure error raised by a component; actions
    /// executed before it stay completed.
    pub async fn run(&self, workflow: &mut Workflow) -> Result<RunReport, FlowError> {
        let mut report = RunReport::default();
        let limit = workflow.activities.len() + MAX_ACTIVITIES;
        let mut activity = 0;
        while activity < workflow.activities.len() {
            if activity >= limit {
                tracing::warn!(
                    workflow = %workflow.id,
                    limit = MAX_ACTIVITIES,
                    "activity limit reached, stopping run"
                );
                break;
            }
            for action in 0..workflow.activities[activity].actions.len() {
                if workflow.activities[activity].actions[action].is_completed() {
                    continue;
                }
                let outcome = self.execute_one(workflow, activity, action).await?;
                report.executed += 1;
                if !outcome.success {
                    report.failed += 1;
                }
                report.error_messages.extend(outcome.error_messages);
                workflow.activities[activity].actions[action].mark_completed();
            }
            activity += 1;
        }
        tracing::info!(
            workflow = %workflow.id,
            executed = report.executed,
            failed = report.failed,
            "workflow run finished"
        );
        Ok(report)
    }

    async fn execute_one(
        &self,
        workflow: &mut Workflow,
        activity: usize,
        action: usize,
    ) -> Result<ActionOutcome, FlowError> {
        let Some(mut context) = ActionContext::new(workflow, activity, action) else {
            return Ok(ActionOutcome::failed());
        };
        let kind = match context.action().component.parse::<ActionKind>() {
            Ok(kind) => kind,
            Err(err) => {
                let message = err.to_string();
                context.add_log_entry(message.clone(), true);
                return Ok(ActionOutcome::failed().with_errors(vec![message]));
            }
        };
        tracing::debug!(
            action = %context.action().name,
            kind = kind.as_str(),
            "executing action"
        );
        match kind {
            ActionKind::EntityTemplate => self.entity_template.execute(&mut context).await,
            ActionKind::ActivateActivity => self.activate_activity.execute(&mut context).await,
            ActionKind::GroupMemberRoles => self.group_member_roles.execute(&mut context).await,
        }
    }
}

/// Parse a `key^value|key^value` list. Entries without a `^` keep an empty
/// value; blank keys are skipped.
#[must_use]
pub fn parse_key_value_list(text: &str) -> BTreeMap<String, String> {
    text.split('|')
        .filter_map(|entry| {
            let (key, value) = entry.split_once('^').unwrap_or((entry, ""));
            let key = key.trim();
            (!key.is_empty()).then(|| (key.to_string(), value.to_string()))
        })
        .collect()
}

/// Lenient boolean parse of a setting value; anything unrecognised is `default`.
#[must_use]
pub fn as_boolean(text: &str, default: bool) -> bool {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "t" | "y" | "1" => true,
        "false" | "no" | "f" | "n" | "0" => false,
        _ => default,
    }
}
