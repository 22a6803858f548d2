//! Template port: merge-field evaluation.

use flowkit_domain::error::FlowError;

use crate::merge_fields::MergeFields;

/// Renders template text against a set of named values.
pub trait TemplateResolver: Send + Sync {
    /// Resolve `template` with `fields` in scope.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Template`] when the template is malformed.
    fn resolve(&self, template: &str, fields: &MergeFields) -> Result<String, FlowError>;
}

impl<T: TemplateResolver + ?Sized> TemplateResolver for std::sync::Arc<T> {
    fn resolve(&self, template: &str, fields: &MergeFields) -> Result<String, FlowError> {
        (**self).resolve(template, fields)
    }
}
