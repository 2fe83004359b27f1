#![deny(missing_docs)]

//! # Route Location Resolver
//!
//! Maps a (group, route) pair onto the folder its handler lives in and the
//! symbol names the synthesized code uses.
//!
//! Folder lookups follow a fixed priority: route `server.group`, then group
//! `server.group`, then the default root. Resolution of folders never fails.

use crate::error::{AppError, AppResult};
use crate::model::{AnnotationKey, Group, Route};
use heck::{ToSnakeCase, ToUpperCamelCase};

/// Root folder of the crate sources, relative to the project directory.
pub const SOURCE_DIR: &str = "src";

/// Default folder for handler files.
pub const HANDLER_DIR: &str = "src/handler";

/// Default folder for logic modules.
pub const LOGIC_DIR: &str = "src/logic";

/// Suffix appended to every handler symbol.
pub const HANDLER_SUFFIX: &str = "_handler";

/// Suffix appended to every logic symbol.
pub const LOGIC_SUFFIX: &str = "Logic";

/// Which property a lookup resolves; each one has its own default root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderKind {
    /// Where handler files are written.
    Handler,
    /// Where the logic module a handler delegates to lives.
    Logic,
}

impl FolderKind {
    /// Default root used when no `server.group` annotation is present.
    pub fn root(self) -> &'static str {
        match self {
            FolderKind::Handler => HANDLER_DIR,
            FolderKind::Logic => LOGIC_DIR,
        }
    }
}

/// Returns the sub-folder annotation for a route, falling back to its group.
pub fn group_annotation<'a>(group: &'a Group, route: &'a Route) -> Option<&'a str> {
    route
        .annotations
        .get(AnnotationKey::GROUP)
        .or_else(|| group.annotations.get(AnnotationKey::GROUP))
}

/// Resolves the folder for `kind`, as a `/`-separated path relative to the project directory.
pub fn resolve_folder(kind: FolderKind, group: &Group, route: &Route) -> String {
    let root = kind.root();
    match group_annotation(group, route) {
        Some(sub) => join_folder(root, sub),
        None => root.to_string(),
    }
}

/// Destination folder of a route's handler.
pub fn handler_folder(group: &Group, route: &Route) -> String {
    resolve_folder(FolderKind::Handler, group, route)
}

/// Folder of the logic module a route's handler delegates to.
pub fn logic_folder(group: &Group, route: &Route) -> String {
    resolve_folder(FolderKind::Logic, group, route)
}

/// Joins a `server.group` value under `root`, cleaning it the way a path join would.
///
/// Empty and `.` segments are dropped, `..` pops the previous segment but never
/// climbs above `root`, and `-` becomes `_` so every folder is a valid module name.
fn join_folder(root: &str, sub: &str) -> String {
    let mut segments: Vec<String> = Vec::new();
    for segment in sub.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(module_segment(s)),
        }
    }

    if segments.is_empty() {
        return root.to_string();
    }
    format!("{}/{}", root, segments.join("/"))
}

fn module_segment(segment: &str) -> String {
    segment.replace('-', "_")
}

/// Converts a folder below [`SOURCE_DIR`] into a module path (`src/logic/order` -> `logic::order`).
pub fn folder_to_module(folder: &str) -> String {
    let rel = folder
        .strip_prefix(SOURCE_DIR)
        .map(|rest| rest.trim_start_matches('/'))
        .unwrap_or(folder);
    rel.split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .map(module_segment)
        .collect::<Vec<_>>()
        .join("::")
}

/// Whether handlers placed in `folder` are exported from their module.
///
/// Anything outside the default handler root is exported.
pub fn is_exported(folder: &str) -> bool {
    folder != HANDLER_DIR
}

/// Validated handler base name of a route, with any trailing `handler` suffix removed.
pub fn handler_base_name(route: &Route) -> AppResult<String> {
    let value = route.annotations.get(AnnotationKey::HANDLER).ok_or_else(|| {
        AppError::validation(&route.path, "", "missing server.handler annotation")
    })?;

    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::validation(
            &route.path,
            value,
            "handler name should only contain letters or digits",
        ));
    }

    let base = strip_suffix_ignore_case(value, "handler");
    if base.is_empty() {
        return Err(AppError::validation(
            &route.path,
            value,
            "handler name must not be empty",
        ));
    }

    Ok(base.to_string())
}

fn strip_suffix_ignore_case<'a>(value: &'a str, suffix: &str) -> &'a str {
    // Callers only pass ASCII, so slicing on a byte offset is safe.
    if value.len() >= suffix.len() {
        let split = value.len() - suffix.len();
        if value[split..].eq_ignore_ascii_case(suffix) {
            return &value[..split];
        }
    }
    value
}

/// Handler symbol of a route (`create` -> `create_handler`).
///
/// The destination folder only decides the visibility, see [`is_exported`].
pub fn handler_name(route: &Route) -> AppResult<String> {
    let base = handler_base_name(route)?;
    Ok(format!("{}{}", base.to_snake_case(), HANDLER_SUFFIX))
}

/// Logic symbol of a route (`create` -> `CreateLogic`).
pub fn logic_name(route: &Route) -> AppResult<String> {
    let base = handler_base_name(route)?;
    Ok(format!("{}{}", base.to_upper_camel_case(), LOGIC_SUFFIX))
}

/// Method the handler calls on its logic value: the handler symbol minus its suffix.
pub fn call_name(handler: &str) -> &str {
    handler.strip_suffix(HANDLER_SUFFIX).unwrap_or(handler)
}

/// Upper-cases the first character of a type name, leaving the rest untouched.
pub fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
