//! Template-specific error type wrapping handlebars errors.

use flowkit_domain::error::FlowError;

/// Errors originating from the handlebars template engine.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The template failed to parse or render.
    #[error("template render error")]
    Render(#[from] handlebars::RenderError),
}

impl From<TemplateError> for FlowError {
    fn from(err: TemplateError) -> Self {
        Self::Template(Box::new(err))
    }
}
