#![deny(missing_docs)]

//! # Import Aggregation
//!
//! Computes the `use` specifiers a handler file needs and renders the header
//! written at the top of a newly created handler file.

use crate::error::AppResult;
use crate::model::{Group, Route};
use crate::project::MODULE_SEP;
use crate::resolver::{folder_to_module, logic_folder};
use crate::template::{render, TemplateContext};
use indexmap::IndexSet;

/// Service context module, relative to the parent package.
pub const CONTEXT_MODULE: &str = "svc";

/// Shared request/response types module, relative to the parent package.
pub const TYPES_MODULE: &str = "types";

/// HTTP helper module. Absolute, never joined under the parent package.
pub const HTTPX_PATH: &str = "cdd_rest::httpx";

/// Local name generated handlers use for their logic module.
pub const LOGIC_ALIAS: &str = "logic";

/// Header of a newly created handler file.
pub const HEADER_TEMPLATE: &str = r#"//! HTTP handlers.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::response::Response;

{{.Imports}}
"#;

/// Joins module path segments with `::`, skipping empty ones.
pub fn join_modules(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(MODULE_SEP)
}

/// Import specifiers required by the handler of `route`, in emission order.
pub fn required_imports(group: &Group, route: &Route, parent_pkg: &str) -> Vec<String> {
    let logic_module = folder_to_module(&logic_folder(group, route));
    let logic_path = join_modules(&[parent_pkg, logic_module.as_str()]);
    let logic_import = if logic_path.ends_with(&format!("{}{}", MODULE_SEP, LOGIC_ALIAS)) {
        logic_path
    } else {
        format!("{} as {}", logic_path, LOGIC_ALIAS)
    };

    let mut imports = vec![logic_import, join_modules(&[parent_pkg, CONTEXT_MODULE])];
    if route.has_request() {
        imports.push(join_modules(&[parent_pkg, TYPES_MODULE]));
    }
    imports.push(HTTPX_PATH.to_string());
    imports
}

/// Ordered set of import specifiers; the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    items: IndexSet<String>,
}

impl ImportSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every specifier not already present, keeping first-seen order.
    pub fn extend(&mut self, specifiers: impl IntoIterator<Item = String>) {
        self.items.extend(specifiers);
    }

    /// Specifiers in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// One `use` line per specifier.
    pub fn render_block(&self) -> String {
        self.iter()
            .map(|item| format!("use {};", item))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Renders the new-file header carrying `imports`.
pub fn render_header(imports: &ImportSet) -> AppResult<String> {
    let ctx = TemplateContext::new().text("Imports", imports.render_block());
    render(HEADER_TEMPLATE, &ctx)
}
