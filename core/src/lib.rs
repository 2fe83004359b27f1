#![deny(missing_docs)]

//! # apimerge Core
//!
//! Incrementally synthesizes HTTP handler functions and merges them into a
//! project tree without clobbering hand-edited code.

/// Shared error types.
pub mod error;

/// Service description model (groups, routes, annotations).
pub mod model;

/// Destination folders and symbol names of routes.
pub mod resolver;

/// Detection of already declared functions.
pub mod parser;

/// Placeholder templates and template loading.
pub mod template;

/// Handler synthesis.
pub mod handler_generator;

/// Import aggregation and new-file headers.
pub mod imports;

/// Formatting of synthesized code.
pub mod format;

/// File naming styles.
pub mod naming;

/// Project context resolution.
pub mod project;

/// File access seam.
pub mod store;

/// Group merge orchestration.
pub mod merge;

pub use error::{AppError, AppResult};
pub use handler_generator::{render_handler, HandlerDescriptor};
pub use imports::{required_imports, ImportSet};
pub use merge::{
    merge_service, CleanupReport, MergeConfig, MergeEngine, MergeOutcome, MergeSession, RunReport,
};
pub use model::{AnnotationKey, Annotations, Group, Route, Service, ServiceDescription};
pub use naming::{file_naming_format, NamingStyle};
pub use parser::{declared_functions, DeclaredFunctions};
pub use project::ProjectContext;
pub use resolver::{handler_folder, handler_name, is_exported, logic_folder, logic_name};
pub use store::{DiskStore, FileStore, MemoryStore};
