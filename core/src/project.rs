#![deny(missing_docs)]

//! # Project Context
//!
//! Locates the crate enclosing a working directory and derives the module path
//! that generated imports are rooted at.

use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

/// Module path of a crate root in `use` statements.
pub const CRATE_ROOT: &str = "crate";

/// Separator between module path segments.
pub const MODULE_SEP: &str = "::";

#[derive(Debug, Deserialize)]
struct Manifest {
    package: Option<ManifestPackage>,
}

#[derive(Debug, Deserialize)]
struct ManifestPackage {
    name: String,
}

/// The crate a working directory belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    /// Folder holding the crate's `Cargo.toml`.
    pub dir: PathBuf,
    /// The (absolute) working directory the context was prepared for.
    pub work_dir: PathBuf,
    /// Package name from the manifest.
    pub name: String,
    /// Module path of the crate root.
    pub path: String,
}

impl ProjectContext {
    /// Resolves the context of `work_dir` by walking up to the nearest `Cargo.toml`
    /// that declares a `[package]`.
    pub fn prepare(work_dir: &Path) -> AppResult<Self> {
        let abs = work_dir.canonicalize().map_err(|e| {
            AppError::Project(format!("Cannot resolve {}: {}", work_dir.display(), e))
        })?;

        for dir in abs.ancestors() {
            let manifest_path = dir.join("Cargo.toml");
            if !manifest_path.is_file() {
                continue;
            }

            let text = std::fs::read_to_string(&manifest_path)?;
            let manifest: Manifest = toml::from_str(&text).map_err(|e| {
                AppError::Project(format!("Invalid manifest {}: {}", manifest_path.display(), e))
            })?;

            if let Some(package) = manifest.package {
                return Ok(ProjectContext {
                    dir: dir.to_path_buf(),
                    work_dir: abs.clone(),
                    name: package.name,
                    path: CRATE_ROOT.to_string(),
                });
            }
            log::debug!("{} has no [package], looking further up", manifest_path.display());
        }

        Err(AppError::Project(format!(
            "No Cargo.toml with a [package] found above {}",
            abs.display()
        )))
    }

    /// Module path of the working directory (`crate` at the crate root,
    /// `crate::api` for `<crate>/src/api`).
    pub fn parent_package(&self) -> String {
        let offset = self.work_dir.strip_prefix(&self.dir).unwrap_or(Path::new(""));

        let mut segments = vec![self.path.clone()];
        let mut components = offset.components().peekable();
        if let Some(Component::Normal(first)) = components.peek() {
            if *first == "src" {
                components.next();
            }
        }
        segments.extend(components.filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().replace('-', "_")),
            _ => None,
        }));

        segments.join(MODULE_SEP)
    }
}
