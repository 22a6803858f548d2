//! # flowkit-adapter-template-handlebars
//!
//! [`TemplateResolver`] backed by [handlebars](https://docs.rs/handlebars).
//!
//! Merge fields are exposed as the template's root object, so a setting
//! such as `Hello {{Entity.first_name}}` reads the `first_name` field of
//! the loaded entity. Missing paths render as empty text. Output is not
//! HTML-escaped: results are stored in attributes, not rendered into pages.

pub mod error;

use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, no_escape,
};

use flowkit_app::merge_fields::MergeFields;
use flowkit_app::ports::TemplateResolver;
use flowkit_domain::error::FlowError;

use crate::error::TemplateError;

/// Handlebars registry configured for merge-field templates.
pub struct HandlebarsResolver {
    handlebars: Handlebars<'static>,
}

impl HandlebarsResolver {
    #[must_use]
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(no_escape);
        handlebars.register_helper("upcase", Box::new(upcase_helper));
        handlebars.register_helper("downcase", Box::new(downcase_helper));
        Self { handlebars }
    }
}

impl Default for HandlebarsResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateResolver for HandlebarsResolver {
    fn resolve(&self, template: &str, fields: &MergeFields) -> Result<String, FlowError> {
        let rendered = self
            .handlebars
            .render_template(template, fields.as_map())
            .map_err(TemplateError::from)?;
        Ok(rendered)
    }
}

fn first_param<'a>(h: &'a Helper) -> &'a str {
    h.param(0).and_then(|v| v.value().as_str()).unwrap_or("")
}

fn upcase_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    out.write(&first_param(h).to_uppercase())?;
    Ok(())
}

fn downcase_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    out.write(&first_param(h).to_lowercase())?;
    Ok(())
}
