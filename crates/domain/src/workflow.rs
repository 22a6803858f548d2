//! Workflow object model: workflows, activities, actions.
//!
//! A [`Workflow`] owns a list of [`Activity`] instances; each activity owns
//! the [`WorkflowAction`]s instantiated from its [`ActivityType`]. Workflows
//! and activities carry attribute values keyed by attribute key; actions
//! carry their configured settings and a log.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{FlowError, ValidationError};
use crate::id::{ActionId, ActivityId, ActivityTypeId, WorkflowId};
use crate::time::{Timestamp, now};

/// Attribute values keyed by attribute key.
pub type AttributeValues = BTreeMap<String, String>;

/// A running workflow instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: WorkflowId,
    pub name: String,
    #[serde(default)]
    pub attributes: AttributeValues,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Workflow {
    /// Create an empty workflow.
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
            id: WorkflowId::new(),
            name,
            attributes: AttributeValues::new(),
            activities: Vec::new(),
        })
    }

    /// Read a workflow attribute value (`""` when unset).
    #[must_use]
    pub fn attribute_value(&self, key: &str) -> &str {
        self.attributes.get(key).map_or("", String::as_str)
    }

    /// Set a workflow attribute value.
    pub fn set_attribute_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Activate a new activity of `activity_type` and return its index.
    pub fn activate(&mut self, activity_type: &ActivityType) -> usize {
        self.activities.push(Activity::from_type(activity_type));
        self.activities.len() - 1
    }
}

/// A running instance of an [`ActivityType`] inside a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub activity_type_id: ActivityTypeId,
    pub name: String,
    #[serde(default)]
    pub attributes: AttributeValues,
    #[serde(default)]
    pub actions: Vec<WorkflowAction>,
}

impl Activity {
    /// Instantiate an activity: every attribute key declared by the type
    /// starts empty and every action template becomes a pending action.
    #[must_use]
    pub fn from_type(activity_type: &ActivityType) -> Self {
        Self {
            id: ActivityId::new(),
            activity_type_id: activity_type.id,
            name: activity_type.name.clone(),
            attributes: activity_type
                .attribute_keys
                .iter()
                .map(|key| (key.clone(), String::new()))
                .collect(),
            actions: activity_type
                .actions
                .iter()
                .map(WorkflowAction::from_template)
                .collect(),
        }
    }

    /// Whether the activity declares an attribute with this key.
    #[must_use]
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Read an activity attribute value (`""` when unset).
    #[must_use]
    pub fn attribute_value(&self, key: &str) -> &str {
        self.attributes.get(key).map_or("", String::as_str)
    }

    /// Set an activity attribute value.
    pub fn set_attribute_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// An activity is complete once all of its actions are.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.actions.iter().all(WorkflowAction::is_completed)
    }
}

/// One configured step of an activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowAction {
    pub id: ActionId,
    pub name: String,
    /// Name of the action component that executes this step.
    pub component: String,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
    #[serde(default)]
    pub log: Vec<LogEntry>,
}

impl WorkflowAction {
    /// Instantiate a pending action from a template.
    #[must_use]
    pub fn from_template(template: &ActionTemplate) -> Self {
        Self {
            id: ActionId::new(),
            name: template.name.clone(),
            component: template.component.clone(),
            settings: template.settings.clone(),
            completed_at: None,
            log: Vec::new(),
        }
    }

    /// Configured setting value (`""` when unset).
    #[must_use]
    pub fn setting(&self, key: &str) -> &str {
        self.settings.get(key).map_or("", String::as_str)
    }

    /// Append a message to the action log.
    pub fn add_log_entry(&mut self, message: impl Into<String>, is_error: bool) {
        self.log.push(LogEntry {
            at: now(),
            message: message.into(),
            is_error,
        });
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Mark the action as completed now.
    pub fn mark_completed(&mut self) {
        self.completed_at = Some(now());
    }
}

/// A single line in an action's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub at: Timestamp,
    pub message: String,
    pub is_error: bool,
}

/// Blueprint of an activity: its attributes and the actions it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityType {
    pub id: ActivityTypeId,
    pub name: String,
    #[serde(default)]
    pub attribute_keys: Vec<String>,
    #[serde(default)]
    pub actions: Vec<ActionTemplate>,
}

impl ActivityType {
    /// Create an activity type with no attributes or actions.
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
            id: ActivityTypeId::new(),
            name,
            attribute_keys: Vec::new(),
            actions: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>) -> Self {
        self.attribute_keys.push(key.into());
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: ActionTemplate) -> Self {
        self.actions.push(action);
        self
    }
}

/// Blueprint of a single action inside an [`ActivityType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTemplate {
    pub name: String,
    pub component: String,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

impl ActionTemplate {
    /// Create a template running `component`.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Validation`] when `component` is empty.
    pub fn new(name: impl Into<String>, component: impl Into<String>) -> Result<Self, FlowError> {
        let component = component.into();
        if component.is_empty() {
            return Err(ValidationError::EmptyComponent.into());
        }
        Ok(Self {
            name: name.into(),
            component,
            settings: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }
}
