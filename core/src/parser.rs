#![deny(missing_docs)]

//! # Symbol Existence Checker
//!
//! Uses `ra_ap_syntax` to report which top-level functions a source file declares.

use crate::error::{AppError, AppResult};
use crate::store::FileStore;
use ra_ap_edition::Edition;
use ra_ap_syntax::ast::{self, HasModuleItem, HasName};
use ra_ap_syntax::SourceFile;
use std::collections::HashSet;
use std::path::Path;

/// Set of top-level function names declared by one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredFunctions {
    names: HashSet<String>,
}

impl DeclaredFunctions {
    /// Whether `name` is declared as a top-level function.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of declared functions.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no function is declared.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Parses `source` and collects its top-level `fn` names.
///
/// Functions nested in `impl` blocks, inline modules, or other function bodies do not count.
/// Any syntax error is reported as [`AppError::Parse`] against `file`.
pub fn parse_declared_functions(file: &str, source: &str) -> AppResult<DeclaredFunctions> {
    let parse = SourceFile::parse(source, Edition::Edition2021);

    if let Some(err) = parse.errors().into_iter().next() {
        return Err(AppError::Parse {
            file: file.to_string(),
            message: err.to_string(),
        });
    }

    let names = parse
        .tree()
        .items()
        .filter_map(|item| match item {
            ast::Item::Fn(f) => f.name().map(|n| n.text().to_string()),
            _ => None,
        })
        .collect();

    Ok(DeclaredFunctions { names })
}

/// Reads `path` through `store` and reports its declared functions.
///
/// An unreadable or missing file declares nothing; a file that reads but does not parse is fatal.
pub fn declared_functions(store: &dyn FileStore, path: &Path) -> AppResult<DeclaredFunctions> {
    let bytes = match store.read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::debug!("{} unreadable ({}), treating as empty", path.display(), e);
            return Ok(DeclaredFunctions::default());
        }
    };

    let source = String::from_utf8_lossy(&bytes);
    parse_declared_functions(&path.display().to_string(), &source)
}
