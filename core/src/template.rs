#![deny(missing_docs)]

//! # Templates
//!
//! A small placeholder language for generated source:
//!
//! - `{{.Field}}` inserts a text field.
//! - `{{if .Flag}}...{{end}}` and `{{if .Flag}}...{{else}}...{{end}}` select on a flag.
//!
//! Conditionals do not nest. Templates can be overridden from a template home
//! directory laid out as `<home>/<category>/<name>`.

use crate::error::{AppError, AppResult};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::path::Path;

/// A value bound to a template field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValue {
    /// Inserted verbatim by `{{.Field}}`.
    Text(String),
    /// Tested by `{{if .Field}}`.
    Flag(bool),
}

/// Named values available to a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    values: BTreeMap<String, TemplateValue>,
}

impl TemplateContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a text field.
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.values
            .insert(name.to_string(), TemplateValue::Text(value.into()));
        self
    }

    /// Binds a flag.
    pub fn flag(mut self, name: &str, value: bool) -> Self {
        self.values
            .insert(name.to_string(), TemplateValue::Flag(value));
        self
    }

    fn get(&self, name: &str) -> AppResult<&TemplateValue> {
        self.values
            .get(name)
            .ok_or_else(|| AppError::Template(format!("unknown template field '.{}'", name)))
    }
}

/// Renders `template` against `ctx`.
pub fn render(template: &str, ctx: &TemplateContext) -> AppResult<String> {
    let conditional =
        Regex::new(r"(?s)\{\{if \.(\w+)\}\}(.*?)(?:\{\{else\}\}(.*?))?\{\{end\}\}")
            .map_err(|e| AppError::Template(e.to_string()))?;
    let field = Regex::new(r"\{\{\s*\.(\w+)\s*\}\}").map_err(|e| AppError::Template(e.to_string()))?;

    let mut failure = None;
    let selected = conditional.replace_all(template, |caps: &Captures| {
        match ctx.get(&caps[1]) {
            Ok(TemplateValue::Flag(true)) => caps[2].to_string(),
            Ok(TemplateValue::Flag(false)) => caps.get(3).map_or("", |m| m.as_str()).to_string(),
            Ok(TemplateValue::Text(_)) => {
                failure.get_or_insert_with(|| {
                    AppError::Template(format!("field '.{}' is not a flag", &caps[1]))
                });
                String::new()
            }
            Err(e) => {
                failure.get_or_insert(e);
                String::new()
            }
        }
    });
    if let Some(e) = failure {
        return Err(e);
    }

    if ["{{if", "{{else}}", "{{end}}"]
        .iter()
        .any(|tag| selected.contains(tag))
    {
        return Err(AppError::Template(
            "unbalanced or nested conditional block".to_string(),
        ));
    }

    let mut failure = None;
    let rendered = field.replace_all(&selected, |caps: &Captures| match ctx.get(&caps[1]) {
        Ok(TemplateValue::Text(text)) => text.clone(),
        Ok(TemplateValue::Flag(flag)) => flag.to_string(),
        Err(e) => {
            failure.get_or_insert(e);
            String::new()
        }
    });
    match failure {
        Some(e) => Err(e),
        None => Ok(rendered.into_owned()),
    }
}

/// Returns the template `<home>/<category>/<name>` when it exists, `default` otherwise.
pub fn load_template(
    home: Option<&Path>,
    category: &str,
    name: &str,
    default: &str,
) -> AppResult<String> {
    if let Some(home) = home {
        let path = home.join(category).join(name);
        if path.is_file() {
            log::debug!("using template override {}", path.display());
            return std::fs::read_to_string(&path).map_err(|e| {
                AppError::Template(format!("Failed to read template {}: {}", path.display(), e))
            });
        }
    }
    Ok(default.to_string())
}
