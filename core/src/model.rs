//! # Service Description Model
//!
//! Intermediate representation of the API description handed to the engine.
//!
//! These structs are read-only inputs: the engine never mutates a group or a route,
//! it only derives destinations and symbol names from them.

use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Annotation category used by every lookup the engine performs.
pub const SERVER_CATEGORY: &str = "server";

/// Typed key into an [`Annotations`] map: a category plus a property name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationKey {
    /// Category (e.g. `server`).
    pub category: &'static str,
    /// Property within the category (e.g. `handler`).
    pub key: &'static str,
}

impl AnnotationKey {
    /// `server.handler`: the handler base name of a route.
    pub const HANDLER: AnnotationKey = AnnotationKey {
        category: SERVER_CATEGORY,
        key: "handler",
    };

    /// `server.group`: the sub-folder a route (or a whole group) is placed in.
    pub const GROUP: AnnotationKey = AnnotationKey {
        category: SERVER_CATEGORY,
        key: "group",
    };
}

/// Ordered `category -> { key -> value }` annotation mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotations(IndexMap<String, IndexMap<String, String>>);

impl Annotations {
    /// Creates an empty annotation set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: AnnotationKey) -> Option<&str> {
        self.0
            .get(key.category)
            .and_then(|props| props.get(key.key))
            .map(String::as_str)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn insert(&mut self, key: AnnotationKey, value: impl Into<String>) {
        self.0
            .entry(key.category.to_string())
            .or_default()
            .insert(key.key.to_string(), value.into());
    }

    /// Builder-style variant of [`Annotations::insert`].
    pub fn with(mut self, key: AnnotationKey, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }
}

/// One HTTP endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Route {
    /// HTTP method ("get", "post", ...). Informational only.
    pub method: String,
    /// URL path (e.g. "/order").
    pub path: String,
    /// Route-level annotations.
    pub annotations: Annotations,
    /// Request type name; empty when the route has no request body.
    pub request_type: String,
    /// Response type name; empty when the route has no response body.
    pub response_type: String,
}

impl Route {
    /// Whether a request body is decoded for this route.
    pub fn has_request(&self) -> bool {
        !self.request_type.is_empty()
    }

    /// Whether the route answers with a body.
    pub fn has_response(&self) -> bool {
        !self.response_type.is_empty()
    }
}

/// A bundle of routes sharing optional annotations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    /// Group-level annotations (notably `server.group`).
    pub annotations: Annotations,
    /// Routes in declaration order.
    pub routes: Vec<Route>,
}

/// The service block of a description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    /// Service name. Informational only.
    pub name: String,
    /// Groups in declaration order.
    pub groups: Vec<Group>,
}

/// Top-level service description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDescription {
    /// The described service.
    pub service: Service,
}

impl ServiceDescription {
    /// Decodes a JSON description.
    pub fn from_json(text: &str) -> AppResult<Self> {
        serde_json::from_str(text).map_err(|e| AppError::Description(e.to_string()))
    }

    /// Decodes a YAML description.
    pub fn from_yaml(text: &str) -> AppResult<Self> {
        serde_yaml::from_str(text).map_err(|e| AppError::Description(e.to_string()))
    }

    /// Reads a description from disk, choosing the decoder by file extension
    /// (`.json` is JSON, anything else is YAML).
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::Description(format!("Failed to read {}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text),
            _ => Self::from_yaml(&text),
        }
    }
}
