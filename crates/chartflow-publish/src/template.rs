//! `{{name}}` placeholder substitution through handlebars

use crate::{Error, Result};
use handlebars::Handlebars;
use serde_json::{Map, Value};

/// A plain-text template with `{{name}}` placeholders
///
/// Rendering is strict: every placeholder needs a value. Values are
/// inserted verbatim, without HTML escaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
}

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Substitute every placeholder; an unknown name or malformed syntax fails
    pub fn render(&self, values: &TemplateValues) -> Result<String> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .render_template(&self.text, values.context())
            .map_err(|e| Error::Template(e.to_string()))
    }
}

/// Named values handed to a [`Template`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateValues {
    values: Map<String, Value>,
}

impl TemplateValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        self.values
            .insert(name.into(), Value::String(value.to_string()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    /// JSON object the template renders against
    pub fn context(&self) -> &Map<String, Value> {
        &self.values
    }
}
